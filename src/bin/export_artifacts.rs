//! Export the frontend JSON summaries.
//!
//! Reads the dataset and a persisted search report, then writes the
//! dashboard's `head10.json` preview and `model_metrics.json` summary.
//!
//! ```bash
//! cargo run --release --bin export-artifacts -- --out-dir public/data
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cardioscope::dataset::Dataset;
use cardioscope::export::{write_head10, write_model_metrics};
use cardioscope::model::search::SearchReport;

#[derive(Parser, Debug)]
#[command(name = "export-artifacts")]
#[command(about = "Write the dashboard JSON summaries")]
#[command(version)]
struct CliArgs {
    /// Path to the clinical records CSV
    #[arg(long, default_value = "data/heart_failure_clinical_records_dataset.csv")]
    data: PathBuf,

    /// Path to the search report written by the train binary
    #[arg(long, default_value = "model/search_report.json")]
    report: PathBuf,

    /// Directory receiving the exported JSON files
    #[arg(long, default_value = "public/data")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let dataset = Dataset::from_csv(&args.data)
        .with_context(|| format!("failed to load dataset from {}", args.data.display()))?;

    let report_bytes = std::fs::read(&args.report).with_context(|| {
        format!(
            "failed to read search report {} (run the train binary first)",
            args.report.display()
        )
    })?;
    let report: SearchReport =
        serde_json::from_slice(&report_bytes).context("search report is corrupt")?;

    write_head10(&dataset, &args.out_dir.join("head10.json"))
        .context("failed to export dataset preview")?;
    write_model_metrics(&report, &args.out_dir.join("model_metrics.json"))
        .context("failed to export model metrics")?;

    info!(out_dir = %args.out_dir.display(), "Export complete");
    Ok(())
}
