//! Persistence of the trained estimator.
//!
//! The artifact is a versioned serde_json blob written atomically (temp
//! file alongside the target, then rename). Consumers treat it as opaque;
//! the only contract is that it round-trips the scaling + classification
//! pipeline used to produce predictions.

use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::types::{PredictionResult, FEATURE_NAMES};

use super::estimator::Pipeline;
use super::ModelError;

/// Current artifact format version.
pub const ARTIFACT_VERSION: u32 = 1;

/// Errors raised while saving or loading the artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("artifact is corrupt: {0}")]
    Format(#[from] serde_json::Error),

    #[error("artifact version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },
}

/// The exported model: preprocessing + fitted classifier, plus enough
/// metadata to sanity-check a load. Immutable after creation; replaced by
/// overwriting the artifact file.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainedEstimator {
    /// Format version for forward compatibility.
    pub version: u32,
    /// Family identifier of the selected model.
    pub family: String,
    /// Feature names in the order the pipeline expects them.
    pub feature_names: Vec<String>,
    /// When the training run produced this artifact.
    pub trained_at: DateTime<Utc>,
    /// The fitted scaling + classification pipeline.
    pub pipeline: Pipeline,
}

impl TrainedEstimator {
    pub fn new(family: impl Into<String>, pipeline: Pipeline) -> Self {
        Self {
            version: ARTIFACT_VERSION,
            family: family.into(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            trained_at: Utc::now(),
            pipeline,
        }
    }

    /// Classify a single feature vector (in [`FEATURE_NAMES`] order).
    pub fn predict(&self, features: &[f64]) -> Result<PredictionResult, ModelError> {
        let (prediction, probability_death) = self.pipeline.predict_one(features)?;
        Ok(PredictionResult {
            prediction,
            probability_death,
        })
    }
}

/// Save the artifact atomically (temp file, then rename).
pub fn save_to_disk(estimator: &TrainedEstimator, path: &Path) -> Result<(), ArtifactError> {
    let bytes = serde_json::to_vec(estimator)?;

    let io_err = |source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &bytes).map_err(io_err)?;
    std::fs::rename(&tmp_path, path).map_err(io_err)?;

    info!(path = %path.display(), bytes = bytes.len(), "Saved model artifact");
    Ok(())
}

/// Load and version-check an artifact.
pub fn load_from_disk(path: &Path) -> Result<TrainedEstimator, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let estimator: TrainedEstimator = serde_json::from_slice(&bytes)?;

    if estimator.version != ARTIFACT_VERSION {
        return Err(ArtifactError::Version {
            found: estimator.version,
            expected: ARTIFACT_VERSION,
        });
    }

    info!(
        path = %path.display(),
        family = %estimator.family,
        trained_at = %estimator.trained_at,
        "Loaded model artifact"
    );
    Ok(estimator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::estimator::Pipeline;
    use crate::model::ParamSet;

    fn fitted_estimator() -> TrainedEstimator {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..40 {
            let dead = i % 2 == 0;
            let mut row = vec![0.0; 12];
            row[7] = if dead { 2.0 } else { 1.0 } + (i % 5) as f64 * 0.01;
            rows.push(row);
            labels.push(i32::from(dead));
        }
        let pipeline =
            Pipeline::fit(&rows, &labels, &ParamSet::Logistic { c: 1.0 }, 42).expect("fit");
        TrainedEstimator::new("logistic_regression", pipeline)
    }

    #[test]
    fn test_round_trip_preserves_predictions() {
        let est = fitted_estimator();
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = dir.path().join("model.json");

        save_to_disk(&est, &path).expect("save");
        let loaded = load_from_disk(&path).expect("load");

        assert_eq!(loaded.version, ARTIFACT_VERSION);
        assert_eq!(loaded.family, "logistic_regression");
        assert_eq!(loaded.feature_names.len(), 12);

        let mut features = vec![0.0; 12];
        features[7] = 2.1;
        let a = est.predict(&features).expect("predict original");
        let b = loaded.predict(&features).expect("predict loaded");
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_artifact_is_io_error() {
        let err = load_from_disk(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }

    #[test]
    fn test_corrupt_artifact_rejected() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = dir.path().join("model.json");
        std::fs::write(&path, b"not json at all").expect("write");
        let err = load_from_disk(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Format(_)));
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let est = fitted_estimator();
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = dir.path().join("model.json");

        let mut value = serde_json::to_value(&est).expect("to value");
        value["version"] = serde_json::json!(99);
        std::fs::write(&path, serde_json::to_vec(&value).expect("bytes")).expect("write");

        let err = load_from_disk(&path).unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::Version {
                found: 99,
                expected: ARTIFACT_VERSION
            }
        ));
    }

    #[test]
    fn test_predict_rejects_wrong_feature_count() {
        let est = fitted_estimator();
        let err = est.predict(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ModelError::FeatureShape { .. }));
    }
}
