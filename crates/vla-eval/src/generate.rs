//! Generation collaborator boundary

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Text-in, text-out boundary to the external model/generation stack
///
/// The pipeline never inspects model internals: it hands over the encoded
/// prompt (optionally pre-truncated by the caller) and receives a generated
/// continuation back as text.
pub trait TextGenerator {
    /// Generate a continuation of `prompt`, at most `max_new_tokens` long
    fn generate(&mut self, prompt: &str, max_new_tokens: usize) -> Result<String>;
}

/// One line of a pre-generated outputs file
#[derive(Debug, Clone, Deserialize)]
struct GeneratedLine {
    generated_text: String,
}

/// Replays continuations produced by an external inference stack
///
/// Reads a JSONL file of `{"generated_text": ...}` records, one per example
/// in split order, and hands them out sequentially. This keeps actual
/// generation (tensor-parallel inference, sampling) with the external
/// frameworks that own it.
#[derive(Debug)]
pub struct ReplayGenerator {
    outputs: Vec<String>,
    cursor: usize,
}

impl ReplayGenerator {
    /// Load pre-generated continuations from a JSONL file
    pub fn from_jsonl(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open generations file: {path:?}"))?;
        let reader = BufReader::new(file);

        let mut outputs = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line.context("Failed to read line")?;
            if line.trim().is_empty() {
                continue;
            }
            let parsed: GeneratedLine = serde_json::from_str(&line).with_context(|| {
                format!("Failed to parse generation at line {} in {:?}", line_num + 1, path)
            })?;
            outputs.push(parsed.generated_text);
        }

        Ok(Self { outputs, cursor: 0 })
    }

    /// Number of continuations left to replay
    pub fn remaining(&self) -> usize {
        self.outputs.len() - self.cursor
    }
}

impl TextGenerator for ReplayGenerator {
    fn generate(&mut self, _prompt: &str, _max_new_tokens: usize) -> Result<String> {
        let output = self
            .outputs
            .get(self.cursor)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Generations file exhausted after {} examples", self.cursor))?;
        self.cursor += 1;
        Ok(output)
    }
}

/// Hands out the ground-truth completions in example order
///
/// Useful for smoke-testing the pipeline end to end: every agreement ratio
/// comes out 1.0 when the generator echoes the ground truth. Completions
/// are replayed by a cursor, not looked up by prompt, so two examples with
/// identical input fields each still receive their own completion.
#[derive(Debug, Default)]
pub struct EchoGenerator {
    completions: Vec<String>,
    cursor: usize,
}

impl EchoGenerator {
    /// Build an echo generator from completions in example order
    pub fn new<I>(completions: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            completions: completions.into_iter().collect(),
            cursor: 0,
        }
    }
}

impl TextGenerator for EchoGenerator {
    fn generate(&mut self, _prompt: &str, _max_new_tokens: usize) -> Result<String> {
        let output = self
            .completions
            .get(self.cursor)
            .cloned()
            .ok_or_else(|| {
                anyhow::anyhow!("Ground-truth completions exhausted after {} examples", self.cursor)
            })?;
        self.cursor += 1;
        Ok(output)
    }
}
