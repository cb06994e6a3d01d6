//! CardioScope training pipeline.
//!
//! Loads the clinical-records CSV, splits it, ranks the individual
//! features, runs the cross-validated grid search over the model families,
//! and writes the selected model artifact plus the search report.
//!
//! ```bash
//! cargo run --release --bin train -- --data data/heart_failure_clinical_records_dataset.csv
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cardioscope::dataset::split::stratified_three_way;
use cardioscope::dataset::Dataset;
use cardioscope::model::artifact::{self, TrainedEstimator};
use cardioscope::model::search::{run_search, MODEL_SEED};
use cardioscope::ranking::rank_features;

#[derive(Parser, Debug)]
#[command(name = "train")]
#[command(about = "Train and select the heart-failure survival model")]
#[command(version)]
struct CliArgs {
    /// Path to the clinical records CSV
    #[arg(long, default_value = "data/heart_failure_clinical_records_dataset.csv")]
    data: PathBuf,

    /// Output path for the model artifact
    #[arg(long, default_value = "model/heart_failure_model.json")]
    artifact: PathBuf,

    /// Output path for the search report
    #[arg(long, default_value = "model/search_report.json")]
    report: PathBuf,

    /// Seed for the train/validation/test split
    #[arg(long, default_value_t = cardioscope::SPLIT_SEED)]
    seed: u64,
}

/// The worked example from the service docs, used as a post-training
/// smoke check.
const SAMPLE_PATIENT: [f64; 12] = [
    65.0, 0.0, 250.0, 1.0, 35.0, 1.0, 250_000.0, 1.9, 130.0, 1.0, 0.0, 120.0,
];

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

    for col in dataset.describe() {
        info!(
            column = col.name,
            mean = format!("{:.2}", col.mean),
            std = format!("{:.2}", col.std),
            min = col.min,
            max = col.max,
            "Column summary"
        );
    }

    let labels = dataset.labels();
    let split = stratified_three_way(&labels, args.seed);
    info!(
        train = split.train.len(),
        validation = split.validation.len(),
        test = split.test.len(),
        "Split dataset"
    );

    let (train_rows, train_labels) = dataset.subset(&split.train);
    let (test_rows, test_labels) = dataset.subset(&split.test);

    // Diagnostic only: the search below never consumes this report.
    let ranking = rank_features(&train_rows, &train_labels);
    for col in &ranking.columns {
        info!(
            feature = col.name,
            auc = format!("{:.4}", col.effective_auc),
            inverted = col.inverted,
            "Feature AUC"
        );
    }

    let outcome = run_search(&train_rows, &train_labels, &test_rows, &test_labels, MODEL_SEED)
        .context("grid search failed")?;

    let estimator = TrainedEstimator::new(outcome.selected.family.clone(), outcome.selected.pipeline);
    artifact::save_to_disk(&estimator, &args.artifact)
        .with_context(|| format!("failed to save artifact to {}", args.artifact.display()))?;

    if let Some(parent) = args.report.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let report_bytes =
        serde_json::to_vec_pretty(&outcome.report).context("failed to serialize search report")?;
    std::fs::write(&args.report, report_bytes)
        .with_context(|| format!("failed to write report to {}", args.report.display()))?;
    info!(path = %args.report.display(), "Wrote search report");

    // Smoke check: the saved estimator must classify a plausible patient.
    let smoke = estimator
        .predict(&SAMPLE_PATIENT)
        .context("smoke prediction failed")?;
    info!(
        prediction = smoke.prediction,
        probability_death = format!("{:.4}", smoke.probability_death),
        "Smoke prediction for sample patient"
    );

    Ok(())
}
