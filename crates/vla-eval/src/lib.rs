//! Evaluation pipeline for VLA sequence models
//!
//! This crate wires the sequence codec to an external generation stack:
//! - [`TextGenerator`] is the purely textual model boundary
//! - [`predict::predict_example`] encodes, generates, decodes and scores
//! - [`PredictionRecord`] is persisted as newline-delimited JSON
//! - [`EvalSummary`] aggregates a run for quick inspection

pub mod config;
pub mod generate;
pub mod launch;
pub mod predict;
pub mod record;
pub mod report;

pub use config::{DataConfig, EvalConfig, ModelConfig};
pub use generate::{EchoGenerator, ReplayGenerator, TextGenerator};
pub use launch::LaunchConfig;
pub use predict::{predict_example, run_split, PredictOutcome};
pub use record::{PredictionRecord, PredictionWriter};
pub use report::EvalSummary;
