//! Property test: decoding an encoded example recovers every field

use proptest::prelude::*;
use vla_codec::{SequenceDecoder, SequenceEncoder, SequenceFields};
use vla_tokenizer::{Delimiters, Vocabulary};

const NUM_VISUAL: u32 = 64;
const NUM_ACTION: u32 = 32;

fn registered_vocab() -> Vocabulary {
    let mut vocab = Vocabulary::new();
    vocab.register_delimiters(Delimiters::default());
    vocab.register_visual_range(NUM_VISUAL).expect("visual range");
    vocab.register_action_range(NUM_ACTION).expect("action range");
    vocab
}

proptest! {
    #[test]
    fn roundtrip_recovers_all_fields(
        task in "[a-zA-Z0-9 ,.]{0,40}",
        plan_in in "[a-zA-Z0-9 ,.]{0,40}",
        plan_out in "[a-zA-Z0-9 ,.]{0,40}",
        input_visual in prop::collection::vec(0..NUM_VISUAL, 0..16),
        input_action in prop::collection::vec(0..NUM_ACTION, 0..8),
        output_visual in prop::collection::vec(0..NUM_VISUAL, 0..16),
        output_action in prop::collection::vec(0..NUM_ACTION, 0..8),
    ) {
        let vocab = registered_vocab();
        let encoder = SequenceEncoder::new(&vocab).expect("encoder");
        let decoder = SequenceDecoder::new(&vocab).expect("decoder");

        let visual_start = vocab.visual_range().expect("visual range").start();
        let action_start = vocab.action_range().expect("action range").start();

        let input_visual: Vec<u32> = input_visual.iter().map(|i| visual_start + i).collect();
        let output_visual: Vec<u32> = output_visual.iter().map(|i| visual_start + i).collect();
        let input_action: Vec<u32> = input_action.iter().map(|i| action_start + i).collect();
        let output_action: Vec<u32> = output_action.iter().map(|i| action_start + i).collect();

        let fields = SequenceFields {
            task_description: &task,
            input_plan_description: &plan_in,
            output_plan_description: &plan_out,
            input_visual: &input_visual,
            input_action: &input_action,
            output_visual: &output_visual,
            output_action: &output_action,
        };

        let encoded = encoder.encode(&fields).expect("encode failed");
        let decoded = decoder.decode(&encoded).expect("decode failed");

        prop_assert_eq!(decoded.input_text, format!("{task}{plan_in}"));
        prop_assert_eq!(decoded.output_text, plan_out);
        prop_assert_eq!(decoded.input_visual, input_visual);
        prop_assert_eq!(decoded.input_action, input_action);
        prop_assert_eq!(decoded.output_visual, output_visual);
        prop_assert_eq!(decoded.output_action, output_action);
    }
}
