//! Classification metrics computed over raw scores and hard labels.
//!
//! ROC-AUC here is the rank-based (Mann-Whitney) estimator with midrank tie
//! handling, so it can score any real-valued column or probability vector
//! against a binary label — the ranking scan and the cross-validation scorer
//! both rely on that. Accuracy comes from `smartcore::metrics::accuracy`
//! at the call sites; smartcore's own metric helpers only accept hard
//! predicted labels, which is why AUC and F1 live here.

use std::cmp::Ordering;

/// Area under the ROC curve for `scores` against binary `labels`.
///
/// Ties receive the average rank, matching the usual trapezoidal ROC
/// integral. Degenerate inputs (single-class labels, empty slices) return
/// 0.5 — no discriminative power either way.
///
/// With midrank ties, `roc_auc(labels, -scores) == 1 - roc_auc(labels,
/// scores)` holds up to floating-point rounding; the feature-inversion
/// policy depends on that identity.
pub fn roc_auc(labels: &[i32], scores: &[f64]) -> f64 {
    debug_assert_eq!(labels.len(), scores.len());

    let n_pos = labels.iter().filter(|&&y| y == 1).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(Ordering::Equal)
    });

    // Sum midranks over the positive class.
    let mut rank_sum_pos = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && scores[order[j]] == scores[order[i]] {
            j += 1;
        }
        // 1-based ranks i+1..=j share the average rank.
        let midrank = (i + 1 + j) as f64 / 2.0;
        for &k in &order[i..j] {
            if labels[k] == 1 {
                rank_sum_pos += midrank;
            }
        }
        i = j;
    }

    let n_pos_f = n_pos as f64;
    (rank_sum_pos - n_pos_f * (n_pos_f + 1.0) / 2.0) / (n_pos_f * n_neg as f64)
}

/// Harmonic mean of precision and recall for the positive class.
///
/// Returns 0.0 when precision and recall are both zero (no true positives).
pub fn f1_score(labels: &[i32], predictions: &[i32]) -> f64 {
    debug_assert_eq!(labels.len(), predictions.len());

    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut fn_ = 0usize;
    for (&y, &p) in labels.iter().zip(predictions.iter()) {
        match (y, p) {
            (1, 1) => tp += 1,
            (0, 1) => fp += 1,
            (1, 0) => fn_ += 1,
            _ => {}
        }
    }

    if tp == 0 {
        return 0.0;
    }
    let precision = tp as f64 / (tp + fp) as f64;
    let recall = tp as f64 / (tp + fn_) as f64;
    2.0 * precision * recall / (precision + recall)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auc_perfect_ranking() {
        let labels = [0, 0, 1, 1];
        let scores = [0.1, 0.2, 0.8, 0.9];
        assert!((roc_auc(&labels, &scores) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_auc_inverted_ranking() {
        let labels = [0, 0, 1, 1];
        let scores = [0.9, 0.8, 0.2, 0.1];
        assert!(roc_auc(&labels, &scores).abs() < 1e-12);
    }

    #[test]
    fn test_auc_no_discrimination() {
        let labels = [0, 1, 0, 1];
        let scores = [0.5, 0.5, 0.5, 0.5];
        assert!((roc_auc(&labels, &scores) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_auc_known_value() {
        // One discordant pair out of four (the 0.5 negative outranks the
        // 0.4 positive): AUC = 3/4.
        let labels = [0, 1, 0, 1];
        let scores = [0.1, 0.4, 0.5, 0.8];
        assert!((roc_auc(&labels, &scores) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_auc_negation_identity() {
        let labels = [0, 1, 1, 0, 1, 0, 0, 1];
        let scores = [1.2, 3.4, 3.4, 0.7, 5.1, 2.2, 3.4, 0.9];
        let forward = roc_auc(&labels, &scores);
        let negated: Vec<f64> = scores.iter().map(|v| -v).collect();
        let backward = roc_auc(&labels, &negated);
        assert!((forward + backward - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_auc_degenerate_single_class() {
        assert_eq!(roc_auc(&[1, 1, 1], &[0.1, 0.2, 0.3]), 0.5);
        assert_eq!(roc_auc(&[0, 0], &[0.1, 0.2]), 0.5);
        assert_eq!(roc_auc(&[], &[]), 0.5);
    }

    #[test]
    fn test_f1_perfect() {
        let labels = [1, 0, 1, 0];
        assert!((f1_score(&labels, &labels) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_f1_no_true_positives() {
        assert_eq!(f1_score(&[1, 1, 0], &[0, 0, 0]), 0.0);
        assert_eq!(f1_score(&[1, 1, 0], &[0, 0, 1]), 0.0);
    }

    #[test]
    fn test_f1_known_value() {
        // tp=1, fp=1, fn=1 -> precision=0.5, recall=0.5, f1=0.5
        let labels = [1, 1, 0, 0];
        let preds = [1, 0, 1, 0];
        assert!((f1_score(&labels, &preds) - 0.5).abs() < 1e-12);
    }
}
