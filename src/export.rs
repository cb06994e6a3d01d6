//! JSON summaries consumed by the dashboard frontend.
//!
//! Two files: a preview of the first rows of the dataset and a per-family
//! metrics summary derived from a persisted search report. Both are
//! written atomically so a crashed export never leaves a half-written
//! file for the frontend to pick up.

use std::io;
use std::path::Path;

use serde_json::json;
use thiserror::Error;
use tracing::info;

use crate::dataset::Dataset;
use crate::model::search::SearchReport;

/// Number of records in the dataset preview.
pub const PREVIEW_ROWS: usize = 10;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("export serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, bytes).map_err(io_err)?;
    std::fs::rename(&tmp_path, path).map_err(io_err)?;
    Ok(())
}

/// Write the first [`PREVIEW_ROWS`] records as a pretty-printed JSON array.
pub fn write_head10(dataset: &Dataset, path: &Path) -> Result<(), ExportError> {
    let head: Vec<_> = dataset.records().iter().take(PREVIEW_ROWS).collect();
    let bytes = serde_json::to_vec_pretty(&head)?;
    write_atomic(path, &bytes)?;
    info!(path = %path.display(), rows = head.len(), "Wrote dataset preview");
    Ok(())
}

/// Write the per-family test metrics and the selected family.
///
/// Shape: `{"models": {<family>: {accuracy, roc_auc, f1, best_params}},
/// "selected_model": <family>}`.
pub fn write_model_metrics(report: &SearchReport, path: &Path) -> Result<(), ExportError> {
    let mut models = serde_json::Map::new();
    for result in &report.results {
        models.insert(
            result.family.clone(),
            json!({
                "accuracy": result.accuracy,
                "roc_auc": result.roc_auc,
                "f1": result.f1,
                "best_params": result.best_params,
            }),
        );
    }

    let summary = json!({
        "models": models,
        "selected_model": report.selected_model,
    });
    let bytes = serde_json::to_vec_pretty(&summary)?;
    write_atomic(path, &bytes)?;
    info!(
        path = %path.display(),
        families = report.results.len(),
        selected = %report.selected_model,
        "Wrote model metrics"
    );
    Ok(())
}
