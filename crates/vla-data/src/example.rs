//! The dataset record

use serde::{Deserialize, Serialize};
use vla_codec::SequenceFields;

/// One structured training/evaluation example from the dataset provider
///
/// The six description/token fields are what the sequence codec serializes;
/// `trajectory_id`, `view`, `gt_actions` and `scene_description` are
/// metadata carried alongside the example and passed through to the
/// persisted prediction record without being encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    /// Task prompt in natural language
    pub task_description: String,
    /// Input plan description in natural language
    pub input_plan_description: String,
    /// Output plan description in natural language
    pub output_plan_description: String,
    /// Input visual token ids (reserved visual range)
    pub input_visual: Vec<u32>,
    /// Input action token ids (reserved action range)
    pub input_action: Vec<u32>,
    /// Output visual token ids (reserved visual range)
    pub output_visual: Vec<u32>,
    /// Output action token ids (reserved action range)
    pub output_action: Vec<u32>,
    /// Trajectory this clip was sampled from
    pub trajectory_id: String,
    /// Camera view the clip was rendered from
    pub view: String,
    /// Ground-truth continuous action values for the output clip
    #[serde(default)]
    pub gt_actions: Vec<f64>,
    /// Scene description, when the dataset provides one
    #[serde(default)]
    pub scene_description: String,
}

impl Example {
    /// Borrowed view of the six fields the codec serializes
    pub fn fields(&self) -> SequenceFields<'_> {
        SequenceFields {
            task_description: &self.task_description,
            input_plan_description: &self.input_plan_description,
            output_plan_description: &self.output_plan_description,
            input_visual: &self.input_visual,
            input_action: &self.input_action,
            output_visual: &self.output_visual,
            output_action: &self.output_action,
        }
    }
}
