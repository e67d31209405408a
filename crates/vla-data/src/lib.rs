//! Dataset provider for VLA sequence training and evaluation
//!
//! This crate provides:
//! - The [`Example`] record read from newline-delimited JSON splits
//! - Split loading and deterministic preprocessing into encoded sequences
//! - The [`SequenceBudget`] length arithmetic used by the training collator

pub mod budget;
pub mod dataset;
pub mod example;

pub use budget::SequenceBudget;
pub use dataset::{load_split, preprocess_split, sample_index};
pub use example::Example;
