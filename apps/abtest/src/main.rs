mod config;
mod errors;
mod eval;
mod extract;
mod llm;
mod prompts;
mod report;
mod runner;
mod samples;
mod task;

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::errors::AppError;
use crate::llm::OpenAiClient;
use crate::report::RAW_DIR;
use crate::runner::BatchRequest;
use crate::samples::load_samples;
use crate::task::parse_task_list;

/// A/B test a few-shot baseline model against a fine-tuned variant on
/// resume-bullet and cover-letter generation, and store scored results.
#[derive(Debug, Parser)]
#[command(name = "abtest", version, about)]
struct Args {
    /// Directory of sample subdirectories (each with jd.md and profile.md)
    #[arg(long, default_value = "data/samples")]
    samples_dir: PathBuf,

    /// Baseline model id (default: BASELINE_MODEL env or gpt-4o-mini)
    #[arg(long)]
    baseline_model: Option<String>,

    /// Fine-tuned model id, e.g. ft:... (default: GEN_MODEL env; empty skips tuned runs)
    #[arg(long)]
    tuned_model: Option<String>,

    /// Few-shot examples file (.txt, .md, or .pdf)
    #[arg(long)]
    fewshot: Option<PathBuf>,

    /// Comma-separated task list
    #[arg(long, default_value = "bullets,cover_letter")]
    tasks: String,

    /// Max samples to process (0 = all), taken in sorted directory order
    #[arg(long, default_value_t = 0)]
    limit: usize,

    /// Output directory (default: results/ab_run_<timestamp>)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also bundle tables and raw outputs into ab_run.zip
    #[arg(long)]
    archive: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let tasks = parse_task_list(&args.tasks)?;
    let baseline_model = args.baseline_model.unwrap_or(config.baseline_model);
    let tuned_model = args
        .tuned_model
        .filter(|m| !m.trim().is_empty())
        .or(config.tuned_model);

    let fewshot = match &args.fewshot {
        Some(path) => extract::extract_text(path)?,
        None => String::new(),
    };

    let out_dir = args.out.unwrap_or_else(|| {
        let ts = Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("results/ab_run_{ts}"))
    });
    fs::create_dir_all(&out_dir)?;

    println!("[ab] Baseline: {baseline_model}");
    println!("[ab] Tuned:    {}", tuned_model.as_deref().unwrap_or("(none)"));
    println!(
        "[ab] Tasks:    {}",
        tasks.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(",")
    );
    println!("[ab] Samples:  {}", args.samples_dir.display());

    let loaded = load_samples(&args.samples_dir, args.limit)?;
    if loaded.samples.is_empty() {
        return Err(AppError::Validation(format!(
            "No usable samples under {} ({} skipped)",
            args.samples_dir.display(),
            loaded.skipped
        ))
        .into());
    }

    let generator = OpenAiClient::new(config.openai_api_key);
    let request = BatchRequest {
        samples: &loaded.samples,
        tasks: &tasks,
        baseline_model: &baseline_model,
        tuned_model: tuned_model.as_deref(),
        fewshot: &fewshot,
    };

    let raw_dir = out_dir.join(RAW_DIR);
    let rows = runner::run_batch(&generator, &request, &raw_dir, |p| {
        info!("Progress: {:.0}%", p * 100.0);
    })
    .await?;

    report::write_results(&out_dir, &rows)?;
    let summary = report::summarize(&rows);
    report::write_summary(&out_dir, &summary)?;

    println!("\n[ab] Summary (means):");
    print!("{}", report::render_summary(&summary));

    if args.archive {
        report::write_archive(&out_dir)?;
    }

    println!("\n[ab] Wrote results to: {}", out_dir.display());
    Ok(())
}
