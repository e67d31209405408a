//! Unit tests for field extraction and decoding

use vla_codec::{
    CodecError, DelimiterPosition, Field, SequenceDecoder, SequenceEncoder, SequenceFields,
};
use vla_tokenizer::{Delimiters, Vocabulary};

fn visual_first_vocab() -> Vocabulary {
    let mut vocab = Vocabulary::new();
    vocab.register_visual_range(16).expect("visual range");
    vocab.register_action_range(8).expect("action range");
    vocab.register_delimiters(Delimiters::default());
    vocab
}

fn example_fields() -> SequenceFields<'static> {
    SequenceFields {
        task_description: "stack the cups",
        input_plan_description: " reach for the top cup",
        output_plan_description: "lower the cup onto the stack",
        input_visual: &[5, 9],
        input_action: &[16, 18],
        output_visual: &[1, 2, 3],
        output_action: &[17],
    }
}

#[test]
fn test_decode_recovers_all_fields() {
    let vocab = visual_first_vocab();
    let encoder = SequenceEncoder::new(&vocab).expect("encoder");
    let decoder = SequenceDecoder::new(&vocab).expect("decoder");

    let encoded = encoder.encode(&example_fields()).expect("encode failed");
    let decoded = decoder.decode(&encoded).expect("decode failed");

    assert_eq!(decoded.input_text, "stack the cups reach for the top cup");
    assert_eq!(decoded.input_visual, vec![5, 9]);
    assert_eq!(decoded.input_action, vec![16, 18]);
    assert_eq!(decoded.output_text, "lower the cup onto the stack");
    assert_eq!(decoded.output_visual, vec![1, 2, 3]);
    assert_eq!(decoded.output_action, vec![17]);
}

#[test]
fn test_scenario_visual_field_roundtrip() {
    let vocab = visual_first_vocab();
    let encoder = SequenceEncoder::new(&vocab).expect("encoder");
    let decoder = SequenceDecoder::new(&vocab).expect("decoder");

    let encoded = encoder.encode(&example_fields()).expect("encode failed");
    assert!(encoded.contains("<bov_i><v5><v9><eov_i>"));
    assert_eq!(decoder.input_visual_ids(&encoded).unwrap(), vec![5, 9]);
}

#[test]
fn test_missing_closing_delimiter_is_defined_failure() {
    let vocab = visual_first_vocab();
    let encoder = SequenceEncoder::new(&vocab).expect("encoder");
    let decoder = SequenceDecoder::new(&vocab).expect("decoder");

    let encoded = encoder.encode(&example_fields()).expect("encode failed");
    let truncated = encoded.replace("<eoa_o>", "");

    let err = decoder.output_action_ids(&truncated).unwrap_err();
    match &err {
        CodecError::MissingDelimiter {
            field,
            position,
            token,
        } => {
            assert_eq!(*field, Field::ActionOut);
            assert_eq!(*position, DelimiterPosition::Closing);
            assert_eq!(token, "<eoa_o>");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_malformed_generation());
}

#[test]
fn test_missing_opening_delimiter_is_defined_failure() {
    let vocab = visual_first_vocab();
    let decoder = SequenceDecoder::new(&vocab).expect("decoder");

    // Closing delimiter present, opening never emitted
    let err = decoder.output_text("some text<eot_o>").unwrap_err();
    assert!(matches!(
        err,
        CodecError::MissingDelimiter {
            position: DelimiterPosition::Opening,
            ..
        }
    ));
}

#[test]
fn test_extraction_tolerates_earlier_stray_opening_delimiter() {
    let vocab = visual_first_vocab();
    let encoder = SequenceEncoder::new(&vocab).expect("encoder");
    let decoder = SequenceDecoder::new(&vocab).expect("decoder");

    let encoded = encoder.encode(&example_fields()).expect("encode failed");
    // A generation that babbles an opening delimiter before the real stream
    let noisy = format!("<bov_o>noise{encoded}");

    assert_eq!(decoder.output_visual_ids(&noisy).unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_malformed_surface_chunk_is_defined_failure() {
    let vocab = visual_first_vocab();
    let decoder = SequenceDecoder::new(&vocab).expect("decoder");

    let err = decoder
        .output_visual_ids("<bov_o><v5x><eov_o>")
        .unwrap_err();
    assert!(matches!(err, CodecError::MalformedSurface { .. }));
    assert!(err.is_malformed_generation());
}

#[test]
fn test_decoded_id_outside_range_is_defined_failure() {
    let vocab = visual_first_vocab();
    let decoder = SequenceDecoder::new(&vocab).expect("decoder");

    let err = decoder
        .output_visual_ids("<bov_o><v4096><eov_o>")
        .unwrap_err();
    assert!(matches!(err, CodecError::IdOutOfRange { id: 4096, .. }));
}

#[test]
fn test_empty_span_decodes_to_empty_ids() {
    let vocab = visual_first_vocab();
    let decoder = SequenceDecoder::new(&vocab).expect("decoder");

    assert_eq!(decoder.output_action_ids("<boa_o><eoa_o>").unwrap(), Vec::<u32>::new());
}

#[test]
fn test_output_fields_decode_from_bare_completion() {
    let vocab = visual_first_vocab();
    let encoder = SequenceEncoder::new(&vocab).expect("encoder");
    let decoder = SequenceDecoder::new(&vocab).expect("decoder");

    // A generator may return only the continuation, without the prompt
    let split = encoder.encode_split(&example_fields()).expect("encode_split failed");

    assert_eq!(
        decoder.output_text(&split.completion).unwrap(),
        "lower the cup onto the stack"
    );
    assert_eq!(decoder.output_action_ids(&split.completion).unwrap(), vec![17]);
    // Input fields are absent from the completion by construction
    assert!(decoder.input_visual_ids(&split.completion).is_err());
}
