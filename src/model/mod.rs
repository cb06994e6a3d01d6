//! Model families, hyperparameter grids, training and persistence.
//!
//! The family catalog is a registry table keyed by family identifier; the
//! search and selection logic never names a concrete family, so adding one
//! means adding a catalog entry and a [`ParamSet`] variant.

pub mod artifact;
pub mod estimator;
pub mod search;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Errors raised while fitting or scoring models.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to fit {family}: {detail}")]
    Fit { family: &'static str, detail: String },

    #[error("prediction failed: {0}")]
    Predict(String),

    #[error("feature vector has {found} values, expected {expected}")]
    FeatureShape { expected: usize, found: usize },
}

/// Decision-tree split criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeCriterion {
    Gini,
    Entropy,
}

impl TreeCriterion {
    fn as_str(self) -> &'static str {
        match self {
            TreeCriterion::Gini => "gini",
            TreeCriterion::Entropy => "entropy",
        }
    }
}

/// One hyperparameter configuration, tagged by model family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParamSet {
    /// Linear classifier; `c` is the inverse regularization strength.
    Logistic { c: f64 },
    /// Single decision tree.
    Tree {
        max_depth: Option<u16>,
        min_samples_split: usize,
        criterion: TreeCriterion,
    },
    /// Bagged ensemble of decision trees with soft voting.
    Forest {
        n_trees: u16,
        max_depth: Option<u16>,
        min_samples_split: usize,
    },
}

impl ParamSet {
    /// Family identifier this configuration belongs to.
    pub fn family(&self) -> &'static str {
        match self {
            ParamSet::Logistic { .. } => "logistic_regression",
            ParamSet::Tree { .. } => "decision_tree",
            ParamSet::Forest { .. } => "random_forest",
        }
    }

    /// `best_params` mapping for the summary export.
    pub fn to_params_json(&self) -> serde_json::Value {
        match *self {
            ParamSet::Logistic { c } => json!({ "C": c }),
            ParamSet::Tree {
                max_depth,
                min_samples_split,
                criterion,
            } => json!({
                "criterion": criterion.as_str(),
                "max_depth": max_depth,
                "min_samples_split": min_samples_split,
            }),
            ParamSet::Forest {
                n_trees,
                max_depth,
                min_samples_split,
            } => json!({
                "max_depth": max_depth,
                "min_samples_split": min_samples_split,
                "n_estimators": n_trees,
            }),
        }
    }
}

/// One model family: identifier plus its hyperparameter grid.
pub struct ModelFamily {
    pub name: &'static str,
    pub grid: Vec<ParamSet>,
}

/// The family registry. Order matters: when test ROC-AUC ties, the
/// first-listed family wins (stable sort in the search), which is the
/// documented tie-break policy.
pub fn catalog() -> Vec<ModelFamily> {
    let mut families = Vec::with_capacity(3);

    families.push(ModelFamily {
        name: "logistic_regression",
        grid: [0.01, 0.1, 1.0, 10.0]
            .iter()
            .map(|&c| ParamSet::Logistic { c })
            .collect(),
    });

    let mut tree_grid = Vec::new();
    for max_depth in [Some(3), Some(5), Some(7), None] {
        for min_samples_split in [2, 5, 10] {
            for criterion in [TreeCriterion::Gini, TreeCriterion::Entropy] {
                tree_grid.push(ParamSet::Tree {
                    max_depth,
                    min_samples_split,
                    criterion,
                });
            }
        }
    }
    families.push(ModelFamily {
        name: "decision_tree",
        grid: tree_grid,
    });

    let mut forest_grid = Vec::new();
    for n_trees in [100, 200] {
        for max_depth in [Some(5), Some(10), None] {
            for min_samples_split in [2, 5, 10] {
                forest_grid.push(ParamSet::Forest {
                    n_trees,
                    max_depth,
                    min_samples_split,
                });
            }
        }
    }
    families.push(ModelFamily {
        name: "random_forest",
        grid: forest_grid,
    });

    families
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_is_tie_break_order() {
        let names: Vec<&str> = catalog().iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["logistic_regression", "decision_tree", "random_forest"]
        );
    }

    #[test]
    fn test_grid_sizes() {
        let families = catalog();
        assert_eq!(families[0].grid.len(), 4); // C values
        assert_eq!(families[1].grid.len(), 4 * 3 * 2);
        assert_eq!(families[2].grid.len(), 2 * 3 * 3);
    }

    #[test]
    fn test_grid_entries_match_family() {
        for family in catalog() {
            for params in &family.grid {
                assert_eq!(params.family(), family.name);
            }
        }
    }

    #[test]
    fn test_params_json_shapes() {
        let lr = ParamSet::Logistic { c: 0.1 }.to_params_json();
        assert_eq!(lr["C"], 0.1);

        let forest = ParamSet::Forest {
            n_trees: 100,
            max_depth: Some(5),
            min_samples_split: 10,
        }
        .to_params_json();
        assert_eq!(forest["n_estimators"], 100);
        assert_eq!(forest["max_depth"], 5);

        let tree = ParamSet::Tree {
            max_depth: None,
            min_samples_split: 2,
            criterion: TreeCriterion::Entropy,
        }
        .to_params_json();
        assert_eq!(tree["criterion"], "entropy");
        assert!(tree["max_depth"].is_null());
    }
}
