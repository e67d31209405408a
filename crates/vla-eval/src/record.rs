//! Persisted prediction records

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One evaluated example, persisted as a line of newline-delimited JSON
///
/// Agreement ratios are `None` (serialized as JSON `null`) when the
/// ground-truth token sequence was empty and the ratio is undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub task_description: String,
    pub scene_description: String,
    pub input_clip_description: String,
    pub output_clip_description_pred: String,
    pub output_clip_description_gt: String,
    pub output_clip_description_value_gt: Vec<f64>,
    pub trajectory_id: String,
    pub view: String,
    pub identical_token_ratio_video: Option<f64>,
    pub identical_token_ratio_action: Option<f64>,
    pub input_video_tokens: Vec<u32>,
    pub output_video_tokens_pred: Vec<u32>,
    pub output_video_tokens_gt: Vec<u32>,
    pub input_action_tokens: Vec<u32>,
    pub output_action_tokens_pred: Vec<u32>,
    pub output_action_tokens_gt: Vec<u32>,
}

/// Appends prediction records to a JSONL file, one object per line
#[derive(Debug)]
pub struct PredictionWriter {
    writer: BufWriter<std::fs::File>,
}

impl PredictionWriter {
    /// Open the predictions file for appending, creating parent directories
    /// as needed
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create predictions directory: {parent:?}"))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open predictions file: {path:?}"))?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Append one record as a JSON line
    pub fn write_record(&mut self, record: &PredictionRecord) -> Result<()> {
        let line = serde_json::to_string(record).context("Failed to serialize record")?;
        self.writer.write_all(line.as_bytes()).context("Failed to write record")?;
        self.writer.write_all(b"\n").context("Failed to write record")?;
        Ok(())
    }

    /// Flush buffered records to disk
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush predictions file")
    }
}
