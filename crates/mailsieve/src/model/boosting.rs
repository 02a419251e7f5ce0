//! Gradient-boosted tree ensemble with logistic loss.

use super::tree::{grow, GradientSet, GrowthLimits, RegressionTree};
use super::Hyperparameters;
use crate::error::{MailsieveError, Result};
use crate::features::FeatureVector;

/// A fitted boosted ensemble. The raw score is a log-odds value; a positive
/// score predicts an invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostedTrees {
    base_score: f64,
    trees: Vec<RegressionTree>,
}

impl BoostedTrees {
    /// Fit the ensemble on featurized rows and their labels.
    ///
    /// Fails with [`MailsieveError::TrainingData`] when there are no rows or
    /// every row carries the same label.
    pub fn fit(
        features: &[FeatureVector],
        labels: &[bool],
        params: &Hyperparameters,
    ) -> Result<Self> {
        params.validate()?;

        if features.is_empty() {
            return Err(MailsieveError::TrainingData(
                "training set is empty".to_string(),
            ));
        }
        if features.len() != labels.len() {
            return Err(MailsieveError::TrainingData(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }

        let positives = labels.iter().filter(|&&l| l).count();
        if positives == 0 || positives == labels.len() {
            let class = if positives == 0 { "non-invoice" } else { "invoice" };
            return Err(MailsieveError::TrainingData(format!(
                "all {} training examples are {}; both classes are required",
                labels.len(),
                class
            )));
        }

        let prior = positives as f64 / labels.len() as f64;
        let base_score = (prior / (1.0 - prior)).ln();
        let targets: Vec<f64> = labels.iter().map(|&l| if l { 1.0 } else { 0.0 }).collect();
        let mut scores = vec![base_score; features.len()];

        let dimension = features
            .iter()
            .filter_map(|row| row.entries().last())
            .map(|&(idx, _)| idx + 1)
            .max()
            .unwrap_or(0);
        let mut usage = vec![0usize; dimension];
        let limits = GrowthLimits {
            max_leaves: params.num_leaves,
            min_examples_per_leaf: params.min_examples_per_leaf,
            learning_rate: params.learning_rate,
        };

        let mut trees = Vec::with_capacity(params.num_trees);
        for _ in 0..params.num_trees {
            let probabilities: Vec<f64> = scores.iter().map(|&s| sigmoid(s)).collect();
            let gradients: Vec<f64> = targets
                .iter()
                .zip(&probabilities)
                .map(|(y, p)| y - p)
                .collect();
            let hessians: Vec<f64> = probabilities.iter().map(|p| p * (1.0 - p)).collect();

            let data = GradientSet {
                features,
                gradients: &gradients,
                hessians: &hessians,
            };
            let tree = grow(&data, &limits, &mut usage);

            for (score, row) in scores.iter_mut().zip(features) {
                *score += tree.predict(row);
            }
            trees.push(tree);
        }

        log::debug!(
            "Fitted {} trees on {} rows ({} positive), base score {:.4}",
            trees.len(),
            features.len(),
            positives,
            base_score
        );

        Ok(Self { base_score, trees })
    }

    /// Raw ensemble output (log-odds of the invoice class).
    pub fn score(&self, features: &FeatureVector) -> f64 {
        self.base_score + self.trees.iter().map(|t| t.predict(features)).sum::<f64>()
    }

    pub fn probability(&self, features: &FeatureVector) -> f64 {
        sigmoid(self.score(features))
    }

    pub fn predict(&self, features: &FeatureVector) -> bool {
        self.score(features) > 0.0
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
