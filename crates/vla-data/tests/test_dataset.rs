//! Unit tests for dataset loading and preprocessing

use tempfile::TempDir;
use vla_codec::SequenceEncoder;
use vla_data::{load_split, preprocess_split, Example};
use vla_tokenizer::{Delimiters, Vocabulary};

fn registered_vocab() -> Vocabulary {
    let mut vocab = Vocabulary::new();
    vocab.register_delimiters(Delimiters::default());
    vocab.register_visual_range(64).expect("visual range");
    vocab.register_action_range(32).expect("action range");
    vocab
}

fn example_json(trajectory_id: &str, visual_id: u32, action_id: u32) -> String {
    format!(
        r#"{{"task_description": "pick up the block", "input_plan_description": " reach", "output_plan_description": "grasp", "input_visual": [{visual_id}], "input_action": [{action_id}], "output_visual": [{visual_id}], "output_action": [{action_id}], "trajectory_id": "{trajectory_id}", "view": "front", "gt_actions": [0.1, -0.2], "scene_description": "a table with blocks"}}"#
    )
}

fn write_split(dir: &TempDir, split: &str, lines: &[String]) {
    let path = dir.path().join(format!("{split}.jsonl"));
    std::fs::write(&path, lines.join("\n")).expect("Failed to write split file");
}

#[test]
fn test_load_split_reads_all_examples() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_split(
        &dir,
        "test",
        &[example_json("traj0", 14, 78), example_json("traj1", 15, 79)],
    );

    let examples = load_split(dir.path(), "test").expect("Failed to load split");

    assert_eq!(examples.len(), 2);
    assert_eq!(examples[0].trajectory_id, "traj0");
    assert_eq!(examples[1].input_visual, vec![15]);
    assert_eq!(examples[0].gt_actions, vec![0.1, -0.2]);
}

#[test]
fn test_load_split_skips_blank_lines() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_split(
        &dir,
        "test",
        &[
            example_json("traj0", 14, 78),
            String::new(),
            example_json("traj1", 15, 79),
        ],
    );

    let examples = load_split(dir.path(), "test").expect("Failed to load split");
    assert_eq!(examples.len(), 2);
}

#[test]
fn test_load_split_missing_file_fails() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    assert!(load_split(dir.path(), "train").is_err());
}

#[test]
fn test_load_split_rejects_bad_json() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_split(&dir, "test", &["not json at all".to_string()]);

    let err = load_split(dir.path(), "test").unwrap_err();
    assert!(format!("{err:#}").contains("line 1"));
}

#[test]
fn test_optional_metadata_defaults() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let line = r#"{"task_description": "t", "input_plan_description": "p", "output_plan_description": "o", "input_visual": [], "input_action": [], "output_visual": [], "output_action": [], "trajectory_id": "traj", "view": "top"}"#;
    write_split(&dir, "test", &[line.to_string()]);

    let examples = load_split(dir.path(), "test").expect("Failed to load split");
    assert!(examples[0].gt_actions.is_empty());
    assert!(examples[0].scene_description.is_empty());
}

#[test]
fn test_preprocess_split_aligns_with_examples() {
    let vocab = registered_vocab();
    let encoder = SequenceEncoder::new(&vocab).expect("encoder");

    let examples: Vec<Example> = vec![
        serde_json::from_str(&example_json("traj0", 14, 78)).expect("parse"),
        serde_json::from_str(&example_json("traj1", 15, 79)).expect("parse"),
    ];

    let encoded = preprocess_split(&examples, &encoder).expect("preprocess failed");

    assert_eq!(encoded.len(), 2);
    assert!(encoded[0].prompt.contains("<v14>"));
    assert!(encoded[1].prompt.contains("<v15>"));
    // Deterministic: same input, same output
    let again = preprocess_split(&examples, &encoder).expect("preprocess failed");
    assert_eq!(encoded, again);
}

#[test]
fn test_preprocess_split_surfaces_bad_ids() {
    let vocab = registered_vocab();
    let encoder = SequenceEncoder::new(&vocab).expect("encoder");

    // 999 is outside both reserved ranges
    let examples: Vec<Example> =
        vec![serde_json::from_str(&example_json("traj0", 999, 78)).expect("parse")];

    assert!(preprocess_split(&examples, &encoder).is_err());
}
