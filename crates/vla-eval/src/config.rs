//! Evaluation configuration structures
//!
//! This module replaces kwargs-style argument objects with explicit,
//! validated configuration structs loaded from a JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vla_tokenizer::Vocabulary;

/// Complete evaluation configuration loaded from file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Model collaborator configuration
    pub model: ModelConfig,
    /// Dataset and sequence configuration
    pub data: DataConfig,
}

/// Model collaborator configuration
///
/// The model itself is owned by an external inference stack; this crate
/// only needs to know where its artifacts live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name or checkpoint path handed to the inference stack
    pub model_name_or_path: String,
    /// Directory holding the saved vocabulary (`vocab.json`)
    pub vocab_dir: PathBuf,
    /// Access credential for a gated model hub, if one is required.
    /// No default is shipped; supply it through the config file or leave it
    /// unset for local checkpoints.
    #[serde(default)]
    pub auth_token: Option<String>,
}

/// Dataset and sequence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory containing `{split}.jsonl` files
    pub dataset_dir: PathBuf,
    /// Size of the reserved visual token range
    pub num_visual_tokens: u32,
    /// Size of the reserved action token range
    pub num_action_tokens: u32,
    /// Model context length; the collator enforces it, the encoder does not
    pub max_seq_len: usize,
    /// Maximum tokens the generator may produce per prompt
    pub max_new_tokens: usize,
    /// Where prediction records are appended, one JSON object per line
    pub save_prediction_path: PathBuf,
    /// Seed for picking the logged sample example
    pub sample_seed: u64,
}

impl DataConfig {
    /// Check that a saved vocabulary's reserved ranges match this
    /// configuration
    ///
    /// A checkpoint's vocabulary wins over the config for ids, but a
    /// disagreement on range sizes means the config points at the wrong
    /// checkpoint; fail loudly instead of scoring with mismatched ranges.
    pub fn check_vocabulary(&self, vocab: &Vocabulary) -> Result<()> {
        let visual_len = vocab.visual_range()?.len();
        let action_len = vocab.action_range()?.len();

        if visual_len != self.num_visual_tokens {
            anyhow::bail!(
                "saved vocabulary has {visual_len} visual tokens but the config expects {}",
                self.num_visual_tokens
            );
        }
        if action_len != self.num_action_tokens {
            anyhow::bail!(
                "saved vocabulary has {action_len} action tokens but the config expects {}",
                self.num_action_tokens
            );
        }
        Ok(())
    }
}

impl EvalConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;
        let config: EvalConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {path:?}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration describes a usable vocabulary and
    /// sequence budget
    pub fn validate(&self) -> Result<()> {
        if self.data.num_visual_tokens == 0 {
            anyhow::bail!("num_visual_tokens must be positive");
        }
        if self.data.num_action_tokens == 0 {
            anyhow::bail!("num_action_tokens must be positive");
        }
        if self.data.max_seq_len == 0 {
            anyhow::bail!("max_seq_len must be positive");
        }
        if self.data.max_new_tokens == 0 {
            anyhow::bail!("max_new_tokens must be positive");
        }
        Ok(())
    }

    /// Default configuration matching the reference fine-tuning setup
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self {
            model: ModelConfig {
                model_name_or_path: "checkpoints/vla-base".to_string(),
                vocab_dir: PathBuf::from("checkpoints/vla-base"),
                auth_token: None,
            },
            data: DataConfig {
                dataset_dir: PathBuf::from("data"),
                num_visual_tokens: 2048,
                num_action_tokens: 256,
                max_seq_len: 2304,
                max_new_tokens: 1024,
                save_prediction_path: PathBuf::from("predictions/results.jsonl"),
                sample_seed: 42,
            },
        }
    }
}
