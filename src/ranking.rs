//! Discriminative-power scan over individual feature columns.
//!
//! Each numeric column of the training partition is treated as a raw
//! prediction score for the death label and scored with ROC-AUC. Columns
//! that rank anti-correlated with the outcome (AUC < 0.5) are sign-inverted
//! so their effective AUC becomes `1 - AUC`.
//!
//! The report is diagnostic only: nothing feeds it back into feature
//! selection or model training. That is a deliberate, preserved property of
//! the pipeline — do not wire it in.

use serde::Serialize;
use tracing::info;

use crate::metrics::roc_auc;
use crate::types::{FEATURE_NAMES, NUM_FEATURES};

/// AUC result for one feature column.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureAuc {
    pub name: &'static str,
    /// AUC of the raw column values.
    pub auc: f64,
    /// AUC after the inversion policy (`1 - auc` when `auc < 0.5`).
    pub effective_auc: f64,
    /// Whether the column was sign-inverted.
    pub inverted: bool,
}

/// Full scan output, in [`FEATURE_NAMES`] order.
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub columns: Vec<FeatureAuc>,
}

impl RankingReport {
    /// The single feature with the highest effective AUC.
    pub fn best(&self) -> Option<&FeatureAuc> {
        self.columns
            .iter()
            .max_by(|a, b| {
                a.effective_auc
                    .partial_cmp(&b.effective_auc)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Score every feature column of the training partition against the label.
pub fn rank_features(rows: &[Vec<f64>], labels: &[i32]) -> RankingReport {
    let columns = (0..NUM_FEATURES)
        .map(|col| {
            let scores: Vec<f64> = rows.iter().map(|r| r[col]).collect();
            let auc = roc_auc(labels, &scores);
            let inverted = auc < 0.5;
            FeatureAuc {
                name: FEATURE_NAMES[col],
                auc,
                effective_auc: if inverted { 1.0 - auc } else { auc },
                inverted,
            }
        })
        .collect();

    let report = RankingReport { columns };
    if let Some(best) = report.best() {
        info!(
            feature = best.name,
            auc = format!("{:.4}", best.effective_auc),
            inverted = best.inverted,
            "Best feature by AUC"
        );
    }
    report
}
