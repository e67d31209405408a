//! Per-example prediction pipeline

use crate::generate::TextGenerator;
use crate::record::{PredictionRecord, PredictionWriter};
use crate::report::EvalSummary;
use anyhow::{Context, Result};
use vla_codec::{agreement_ratio, CodecError, ScoreError, SequenceDecoder, SequenceEncoder};
use vla_data::Example;

/// Result of evaluating one example
#[derive(Debug)]
pub enum PredictOutcome {
    /// The generation decoded cleanly and was scored
    Scored(Box<PredictionRecord>),
    /// The generation was malformed (missing delimiter, unparseable token
    /// span); recorded and skipped, never fatal
    Malformed {
        trajectory_id: String,
        error: CodecError,
    },
}

/// Output-side fields decoded from a generated continuation
struct PredictedFields {
    text: String,
    visual: Vec<u32>,
    action: Vec<u32>,
}

fn decode_prediction(
    decoder: &SequenceDecoder,
    generated: &str,
) -> std::result::Result<PredictedFields, CodecError> {
    Ok(PredictedFields {
        text: decoder.output_text(generated)?.to_string(),
        visual: decoder.output_visual_ids(generated)?,
        action: decoder.output_action_ids(generated)?,
    })
}

/// An undefined ratio (empty ground truth) is recorded as `None` instead of
/// failing the example
fn ratio_or_undefined(pred: &[u32], gt: &[u32]) -> Option<f64> {
    match agreement_ratio(pred, gt) {
        Ok(ratio) => Some(ratio),
        Err(ScoreError::EmptyGroundTruth) => None,
    }
}

/// Encode one example, obtain a generation for its prompt, and score the
/// decoded prediction against the ground truth
///
/// Decode failures on the generated text are returned as
/// [`PredictOutcome::Malformed`]; failures while encoding or while decoding
/// our own ground-truth text indicate a configuration or pipeline bug and
/// propagate as errors.
pub fn predict_example(
    encoder: &SequenceEncoder<'_>,
    decoder: &SequenceDecoder,
    generator: &mut dyn TextGenerator,
    example: &Example,
    max_new_tokens: usize,
) -> Result<PredictOutcome> {
    let encoded = encoder
        .encode_split(&example.fields())
        .context("Failed to encode example")?;

    let generated = generator
        .generate(&encoded.prompt, max_new_tokens)
        .context("Generation collaborator failed")?;

    // Input side and ground truth come from our own encodings; a decode
    // failure here is a pipeline bug, not a bad generation.
    let input_video_tokens = decoder
        .input_visual_ids(&encoded.prompt)
        .context("Failed to decode input visual tokens")?;
    let input_action_tokens = decoder
        .input_action_ids(&encoded.prompt)
        .context("Failed to decode input action tokens")?;
    let output_clip_description_gt = decoder
        .output_text(&encoded.completion)
        .context("Failed to decode ground-truth plan")?
        .to_string();
    let output_video_tokens_gt = decoder
        .output_visual_ids(&encoded.completion)
        .context("Failed to decode ground-truth visual tokens")?;
    let output_action_tokens_gt = decoder
        .output_action_ids(&encoded.completion)
        .context("Failed to decode ground-truth action tokens")?;

    let pred = match decode_prediction(decoder, &generated) {
        Ok(pred) => pred,
        Err(error) if error.is_malformed_generation() => {
            return Ok(PredictOutcome::Malformed {
                trajectory_id: example.trajectory_id.clone(),
                error,
            });
        }
        Err(error) => return Err(error.into()),
    };

    let identical_token_ratio_video = ratio_or_undefined(&pred.visual, &output_video_tokens_gt);
    let identical_token_ratio_action = ratio_or_undefined(&pred.action, &output_action_tokens_gt);

    Ok(PredictOutcome::Scored(Box::new(PredictionRecord {
        task_description: example.task_description.clone(),
        scene_description: example.scene_description.clone(),
        input_clip_description: example.input_plan_description.clone(),
        output_clip_description_pred: pred.text,
        output_clip_description_gt,
        output_clip_description_value_gt: example.gt_actions.clone(),
        trajectory_id: example.trajectory_id.clone(),
        view: example.view.clone(),
        identical_token_ratio_video,
        identical_token_ratio_action,
        input_video_tokens,
        output_video_tokens_pred: pred.visual,
        output_video_tokens_gt,
        input_action_tokens,
        output_action_tokens_pred: pred.action,
        output_action_tokens_gt,
    })))
}

/// Evaluate a whole split, appending records through `writer`
///
/// Pass `writer = None` on non-main processes; scoring still runs so the
/// summary is available everywhere, but only the main process persists
/// records. Malformed generations are counted and skipped.
pub fn run_split(
    split: &str,
    examples: &[Example],
    encoder: &SequenceEncoder<'_>,
    decoder: &SequenceDecoder,
    generator: &mut dyn TextGenerator,
    max_new_tokens: usize,
    mut writer: Option<&mut PredictionWriter>,
) -> Result<EvalSummary> {
    let mut scored = 0usize;
    let mut skipped_malformed = 0usize;
    let mut video_ratios = Vec::new();
    let mut action_ratios = Vec::new();

    for example in examples {
        match predict_example(encoder, decoder, generator, example, max_new_tokens)? {
            PredictOutcome::Scored(record) => {
                if let Some(ratio) = record.identical_token_ratio_video {
                    video_ratios.push(ratio);
                }
                if let Some(ratio) = record.identical_token_ratio_action {
                    action_ratios.push(ratio);
                }
                if let Some(w) = writer.as_mut() {
                    w.write_record(&record)?;
                }
                scored += 1;
            }
            PredictOutcome::Malformed {
                trajectory_id,
                error,
            } => {
                tracing::warn!(%trajectory_id, %error, "skipping malformed generation");
                skipped_malformed += 1;
            }
        }
    }

    if let Some(w) = writer {
        w.flush()?;
    }

    Ok(EvalSummary::new(
        split.to_string(),
        examples.len(),
        scored,
        skipped_malformed,
        &video_ratios,
        &action_ratios,
    ))
}
