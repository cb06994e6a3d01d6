//! Scaling + classification pipeline over smartcore estimators.
//!
//! Every family trains on standard-scaled features (the scaler is part of
//! the persisted artifact, so serving applies the exact transform the
//! model was fitted with).
//!
//! Probability semantics per family:
//! - logistic regression: sigmoid of the fitted linear score;
//! - decision tree / forest: Laplace-smoothed vote fraction `(k+1)/(n+2)`.
//!
//! The smoothing keeps death probabilities strictly inside (0, 1) and is
//! monotone in the vote count, so ROC-AUC ranking is unaffected.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use smartcore::linalg::basic::arrays::{Array, MutArray};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters, SplitCriterion,
};

use super::{ModelError, ParamSet, TreeCriterion};

type Lr = LogisticRegression<f64, i32, DenseMatrix<f64>, Vec<i32>>;
type Tree = DecisionTreeClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Build a smartcore matrix from row-major feature rows.
pub(crate) fn to_matrix(rows: &[Vec<f64>]) -> DenseMatrix<f64> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    let mut m: DenseMatrix<f64> = DenseMatrix::new(nrows, ncols, vec![0.0; nrows * ncols], true);
    for (r, row) in rows.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            m.set((r, c), v);
        }
    }
    m
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Per-column standardization fitted on the training partition
/// (population mean/std, zero stds clamped to 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let n = rows.len().max(1);
        let ncols = rows.first().map_or(0, Vec::len);

        let mut means = vec![0.0; ncols];
        for row in rows {
            for (c, &v) in row.iter().enumerate() {
                means[c] += v;
            }
        }
        for m in &mut means {
            *m /= n as f64;
        }

        let mut stds = vec![0.0; ncols];
        for row in rows {
            for (c, &v) in row.iter().enumerate() {
                stds[c] += (v - means[c]).powi(2);
            }
        }
        for s in &mut stds {
            *s = (*s / n as f64).sqrt();
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        Self { means, stds }
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.stds))
            .map(|(&v, (&m, &s))| (v - m) / s)
            .collect()
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| self.transform_row(r)).collect()
    }

    pub fn num_features(&self) -> usize {
        self.means.len()
    }
}

/// A fitted classifier, tagged by family.
#[derive(Debug, Serialize, Deserialize)]
pub enum ModelKind {
    Logistic(Box<Lr>),
    Tree(Box<Tree>),
    Forest(Vec<Tree>),
}

/// Composed transform-then-classify unit, treated as one estimator.
#[derive(Debug, Serialize, Deserialize)]
pub struct Pipeline {
    pub scaler: StandardScaler,
    pub model: ModelKind,
}

fn tree_parameters(
    max_depth: Option<u16>,
    min_samples_split: usize,
    criterion: TreeCriterion,
    seed: u64,
) -> DecisionTreeClassifierParameters {
    let mut p = DecisionTreeClassifierParameters::default()
        .with_criterion(match criterion {
            TreeCriterion::Gini => SplitCriterion::Gini,
            TreeCriterion::Entropy => SplitCriterion::Entropy,
        })
        .with_min_samples_split(min_samples_split);
    if let Some(d) = max_depth {
        p = p.with_max_depth(d);
    }
    p.seed = Some(seed);
    p
}

impl Pipeline {
    /// Fit the scaler on `rows`, then the configured classifier on the
    /// scaled features. `seed` drives tree tie-breaking and bootstrap
    /// sampling; a fixed seed makes the fit reproducible.
    pub fn fit(
        rows: &[Vec<f64>],
        labels: &[i32],
        params: &ParamSet,
        seed: u64,
    ) -> Result<Self, ModelError> {
        let scaler = StandardScaler::fit(rows);
        let scaled = scaler.transform(rows);
        let x = to_matrix(&scaled);
        let y: Vec<i32> = labels.to_vec();

        let model = match *params {
            ParamSet::Logistic { c } => {
                // smartcore's alpha is the L2 penalty weight, the inverse
                // of scikit-learn's C.
                let parameters = LogisticRegressionParameters::default().with_alpha(1.0 / c);
                let lr = LogisticRegression::fit(&x, &y, parameters).map_err(|e| {
                    ModelError::Fit {
                        family: "logistic_regression",
                        detail: e.to_string(),
                    }
                })?;
                ModelKind::Logistic(Box::new(lr))
            }
            ParamSet::Tree {
                max_depth,
                min_samples_split,
                criterion,
            } => {
                let parameters = tree_parameters(max_depth, min_samples_split, criterion, seed);
                let tree =
                    DecisionTreeClassifier::fit(&x, &y, parameters).map_err(|e| ModelError::Fit {
                        family: "decision_tree",
                        detail: e.to_string(),
                    })?;
                ModelKind::Tree(Box::new(tree))
            }
            ParamSet::Forest {
                n_trees,
                max_depth,
                min_samples_split,
            } => {
                let n = scaled.len();
                let mut rng = StdRng::seed_from_u64(seed);
                let mut trees = Vec::with_capacity(usize::from(n_trees));
                for t in 0..n_trees {
                    // Bootstrap sample with replacement.
                    let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                    let sample: Vec<Vec<f64>> =
                        indices.iter().map(|&i| scaled[i].clone()).collect();
                    let sample_y: Vec<i32> = indices.iter().map(|&i| y[i]).collect();

                    let parameters = tree_parameters(
                        max_depth,
                        min_samples_split,
                        TreeCriterion::Gini,
                        seed.wrapping_add(u64::from(t)),
                    );
                    let tree = DecisionTreeClassifier::fit(
                        &to_matrix(&sample),
                        &sample_y,
                        parameters,
                    )
                    .map_err(|e| ModelError::Fit {
                        family: "random_forest",
                        detail: e.to_string(),
                    })?;
                    trees.push(tree);
                }
                ModelKind::Forest(trees)
            }
        };

        Ok(Self { scaler, model })
    }

    /// Death probability for every row, strictly inside (0, 1).
    pub fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        let scaled = self.scaler.transform(rows);

        match &self.model {
            ModelKind::Logistic(lr) => {
                let (weights, intercept) = linear_weights(lr);
                Ok(scaled
                    .iter()
                    .map(|row| {
                        let z: f64 = row
                            .iter()
                            .zip(&weights)
                            .map(|(&v, &w)| v * w)
                            .sum::<f64>()
                            + intercept;
                        sigmoid(z)
                    })
                    .collect())
            }
            ModelKind::Tree(tree) => {
                let preds = tree
                    .predict(&to_matrix(&scaled))
                    .map_err(|e| ModelError::Predict(e.to_string()))?;
                Ok(preds
                    .iter()
                    .map(|&c| (f64::from(c) + 1.0) / 3.0)
                    .collect())
            }
            ModelKind::Forest(trees) => {
                let x = to_matrix(&scaled);
                let mut votes = vec![0u32; scaled.len()];
                for tree in trees {
                    let preds = tree
                        .predict(&x)
                        .map_err(|e| ModelError::Predict(e.to_string()))?;
                    for (v, &p) in votes.iter_mut().zip(preds.iter()) {
                        *v += p as u32;
                    }
                }
                let n = trees.len() as f64;
                Ok(votes
                    .iter()
                    .map(|&k| (f64::from(k) + 1.0) / (n + 2.0))
                    .collect())
            }
        }
    }

    /// Hard class per row: probability thresholded at 0.5, so class and
    /// probability are always consistent.
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i32>, ModelError> {
        Ok(self
            .predict_proba(rows)?
            .iter()
            .map(|&p| i32::from(p >= 0.5))
            .collect())
    }

    /// Class and death probability for a single feature vector.
    pub fn predict_one(&self, features: &[f64]) -> Result<(i32, f64), ModelError> {
        let expected = self.scaler.num_features();
        if features.len() != expected {
            return Err(ModelError::FeatureShape {
                expected,
                found: features.len(),
            });
        }
        let rows = vec![features.to_vec()];
        let proba = self.predict_proba(&rows)?;
        let p = proba[0];
        Ok((i32::from(p >= 0.5), p))
    }
}

/// Flatten the fitted logistic coefficients regardless of orientation.
fn linear_weights(lr: &Lr) -> (Vec<f64>, f64) {
    let coef = lr.coefficients();
    let (r, c) = coef.shape();
    let weights: Vec<f64> = if r == 1 {
        (0..c).map(|j| *coef.get((0, j))).collect()
    } else {
        (0..r).map(|i| *coef.get((i, 0))).collect()
    };
    let intercept = *lr.intercept().get((0, 0));
    (weights, intercept)
}
