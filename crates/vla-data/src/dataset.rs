//! Dataset loading and preprocessing

use crate::Example;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use vla_codec::{EncodedExample, SequenceEncoder};

/// Load one dataset split from `{split}.jsonl` in the dataset directory
///
/// Each line is one JSON-encoded [`Example`]; blank lines are skipped. File
/// order is preserved so preprocessing stays deterministic.
pub fn load_split(dataset_dir: &Path, split: &str) -> Result<Vec<Example>> {
    let path = dataset_dir.join(format!("{split}.jsonl"));
    let file =
        fs::File::open(&path).with_context(|| format!("Failed to open dataset file: {path:?}"))?;
    let reader = BufReader::new(file);

    let mut examples = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }

        let example: Example = serde_json::from_str(&line).with_context(|| {
            format!("Failed to parse example at line {} in {:?}", line_num + 1, path)
        })?;
        examples.push(example);
    }

    Ok(examples)
}

/// Encode every example of a split into prompt/completion pairs
///
/// The encoder is a pure function, so examples are mapped independently and
/// in input order; results align index-for-index with `examples`.
pub fn preprocess_split(
    examples: &[Example],
    encoder: &SequenceEncoder<'_>,
) -> Result<Vec<EncodedExample>> {
    examples
        .iter()
        .enumerate()
        .map(|(idx, example)| {
            encoder
                .encode_split(&example.fields())
                .with_context(|| format!("Failed to encode example {idx}"))
        })
        .collect()
}

/// Pick a reproducible sample index for logging one processed example
///
/// Seeded so that repeated runs over the same split log the same sample.
pub fn sample_index(len: usize, seed: u64) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Some(rng.gen_range(0..len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_index_is_deterministic() {
        assert_eq!(sample_index(100, 42), sample_index(100, 42));
        assert_eq!(sample_index(0, 42), None);
    }

    #[test]
    fn test_sample_index_in_bounds() {
        for seed in 0..32 {
            let idx = sample_index(7, seed).expect("non-empty");
            assert!(idx < 7);
        }
    }
}
