//! CardioScope: heart-failure survival modeling and serving.
//!
//! The crate covers the full path from the clinical-records CSV to a live
//! prediction endpoint:
//!
//! - **Dataset**: CSV loading with schema validation, summary statistics
//!   and a stratified train/validation/test split
//! - **Ranking**: per-feature ROC-AUC diagnostics
//! - **Model**: three classifier families behind one pipeline type, with
//!   cross-validated grid search and a versioned on-disk artifact
//! - **Export**: JSON summaries for the dashboard frontend
//! - **API**: Axum service loading the artifact and serving predictions

pub mod api;
pub mod dataset;
pub mod export;
pub mod metrics;
pub mod model;
pub mod ranking;
pub mod types;

// Re-export the types the binaries and tests touch most.
pub use api::{create_app, ServiceState};
pub use dataset::split::{stratified_three_way, Split, SPLIT_SEED};
pub use dataset::{Dataset, LoadError};
pub use model::artifact::{load_from_disk, save_to_disk, TrainedEstimator};
pub use model::search::{run_search, SearchOutcome, SearchReport, MODEL_SEED};
pub use ranking::{rank_features, RankingReport};
pub use types::{ClinicalRecord, PredictionResult, FEATURE_NAMES, NUM_FEATURES};
