//! Evaluation binary: score generated VLA sequences against ground truth

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vla_codec::{SequenceDecoder, SequenceEncoder};
use vla_data::{load_split, preprocess_split, sample_index};
use vla_eval::{
    run_split, EchoGenerator, EvalConfig, LaunchConfig, PredictionWriter, ReplayGenerator,
    TextGenerator,
};
use vla_tokenizer::{Delimiters, Vocabulary};

/// Command-line arguments for evaluation
#[derive(Parser, Debug)]
#[command(name = "vla-eval")]
#[command(about = "Score generated VLA sequences against ground truth")]
struct Args {
    /// Path to the evaluation config JSON
    #[arg(long, short = 'c')]
    config: PathBuf,

    /// Dataset split to evaluate
    #[arg(long, default_value = "test")]
    split: String,

    /// JSONL file of pre-generated continuations, one per example in split
    /// order; the ground truth is echoed when omitted (smoke run)
    #[arg(long)]
    generations: Option<PathBuf>,

    /// Output directory for the summary report
    #[arg(long, short = 'o', default_value = "./eval_results")]
    output_dir: PathBuf,

    /// Rank of this process on its node
    #[arg(long, env = "LOCAL_RANK", default_value = "0")]
    local_rank: usize,

    /// Total number of processes in the launch
    #[arg(long, env = "WORLD_SIZE", default_value = "1")]
    world_size: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let launch = LaunchConfig::new(args.local_rank, args.world_size)?;
    let config = EvalConfig::from_file(&args.config)?;
    info!(
        model = %config.model.model_name_or_path,
        local_rank = launch.local_rank,
        world_size = launch.world_size,
        "loaded configuration"
    );

    // Reuse the saved vocabulary when the checkpoint ships one so ids line
    // up with training; otherwise register the ranges fresh.
    let vocab_file = config.model.vocab_dir.join("vocab.json");
    let vocab = if vocab_file.exists() {
        info!(path = ?vocab_file, "loading saved vocabulary");
        let vocab = Vocabulary::from_directory(&config.model.vocab_dir)?;
        config.data.check_vocabulary(&vocab)?;
        vocab
    } else {
        let mut vocab = Vocabulary::new();
        vocab.register_delimiters(Delimiters::default());
        vocab.register_visual_range(config.data.num_visual_tokens)?;
        vocab.register_action_range(config.data.num_action_tokens)?;
        vocab
    };
    info!(vocab_size = vocab.size(), "vocabulary ready");

    let encoder = SequenceEncoder::new(&vocab)?;
    let decoder = SequenceDecoder::new(&vocab)?;

    let examples = load_split(&config.data.dataset_dir, &args.split)?;
    info!(split = %args.split, examples = examples.len(), "loaded split");

    let encoded = preprocess_split(&examples, &encoder)?;
    if launch.is_main_process() {
        if let Some(index) = sample_index(encoded.len(), config.data.sample_seed) {
            info!(index, sample = %encoded[index].full(), "sample from the processed split");
        }
    }

    let mut generator: Box<dyn TextGenerator> = match &args.generations {
        Some(path) => {
            let replay = ReplayGenerator::from_jsonl(path)?;
            info!(generations = replay.remaining(), "replaying pre-generated continuations");
            Box::new(replay)
        }
        None => {
            info!("no generations file supplied; echoing ground truth");
            Box::new(EchoGenerator::new(encoded.iter().map(|e| e.completion.clone())))
        }
    };

    let mut writer = if launch.is_main_process() {
        Some(PredictionWriter::open(&config.data.save_prediction_path)?)
    } else {
        None
    };

    let start = std::time::Instant::now();
    let summary = run_split(
        &args.split,
        &examples,
        &encoder,
        &decoder,
        generator.as_mut(),
        config.data.max_new_tokens,
        writer.as_mut(),
    )?;
    info!(elapsed = ?start.elapsed(), "evaluation complete");

    if launch.is_main_process() {
        std::fs::create_dir_all(&args.output_dir)?;

        let json_path = args.output_dir.join("summary.json");
        std::fs::write(&json_path, serde_json::to_string_pretty(&summary)?)?;

        let md_path = args.output_dir.join("summary.md");
        std::fs::write(&md_path, summary.to_markdown())?;

        info!(
            predictions = ?config.data.save_prediction_path,
            summary = ?json_path,
            "results saved"
        );
        println!("{}", summary.to_markdown());
    }

    Ok(())
}
