//! Invoice classifier: a fitted text transform paired with a boosted tree
//! ensemble, rebuilt from scratch on every training round.

pub mod boosting;
pub mod metrics;
pub mod tree;

pub use boosting::BoostedTrees;
pub use metrics::{format_accuracy, format_percent, EvaluationReport};
pub use tree::RegressionTree;

use crate::error::{MailsieveError, Result};
use crate::features::{FeaturizerOptions, FittedTransform, TextFeaturizer};
use crate::store::Dataset;
use serde::{Deserialize, Serialize};

/// Ensemble configuration. Defaults match a moderate FastTree setup that
/// retrains in interactive time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// Number of boosting rounds (trees)
    pub num_trees: usize,
    /// Maximum leaves per tree
    pub num_leaves: usize,
    /// Minimum training examples in every leaf
    pub min_examples_per_leaf: usize,
    /// Shrinkage applied to each tree's output
    pub learning_rate: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            num_trees: 50,
            num_leaves: 50,
            min_examples_per_leaf: 1,
            learning_rate: 0.2,
        }
    }
}

impl Hyperparameters {
    pub fn validate(&self) -> Result<()> {
        if self.num_trees == 0 {
            return Err(MailsieveError::Config("num_trees must be at least 1".to_string()));
        }
        if self.num_leaves < 2 {
            return Err(MailsieveError::Config("num_leaves must be at least 2".to_string()));
        }
        if self.min_examples_per_leaf == 0 {
            return Err(MailsieveError::Config(
                "min_examples_per_leaf must be at least 1".to_string(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(MailsieveError::Config(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// Verdict for one subject line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: bool,
    /// Raw log-odds score from the ensemble
    pub score: f64,
    pub probability: f64,
}

impl Prediction {
    pub fn verdict(&self) -> &'static str {
        verdict_phrase(self.label)
    }
}

pub fn verdict_phrase(label: bool) -> &'static str {
    if label {
        "This is an Invoice"
    } else {
        "This is NOT an Invoice"
    }
}

/// One iteration's model. Test evaluation and live predictions go through
/// the same fitted transform the classifier was trained with.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    transform: FittedTransform,
    classifier: BoostedTrees,
}

impl TrainedModel {
    pub fn train(
        training: &Dataset,
        features: &FeaturizerOptions,
        params: &Hyperparameters,
    ) -> Result<Self> {
        if training.is_empty() {
            return Err(MailsieveError::TrainingData(
                "training set is empty".to_string(),
            ));
        }

        let featurizer = TextFeaturizer::new(*features);
        let (transform, rows) = featurizer.fit_transform(&training.texts());
        let classifier = BoostedTrees::fit(&rows, &training.labels(), params)?;

        log::info!(
            "Trained {} trees on {} examples ({} features)",
            classifier.tree_count(),
            training.len(),
            transform.dimension()
        );

        Ok(Self {
            transform,
            classifier,
        })
    }

    /// Score the held-out set. Fails with [`MailsieveError::EmptyDataset`]
    /// when `test` has no examples.
    pub fn evaluate(&self, test: &Dataset) -> Result<EvaluationReport> {
        if test.is_empty() {
            return Err(MailsieveError::EmptyDataset(
                "test set has no examples; accuracy is undefined".to_string(),
            ));
        }

        let report = EvaluationReport::from_outcomes(
            test.iter().map(|e| (self.predict(&e.text).label, e.label)),
        )?;
        log::info!(
            "Evaluated {} test examples: {} correct",
            report.total,
            report.correct()
        );
        Ok(report)
    }

    pub fn predict(&self, text: &str) -> Prediction {
        let row = self.transform.transform(text);
        Prediction {
            label: self.classifier.predict(&row),
            score: self.classifier.score(&row),
            probability: self.classifier.probability(&row),
        }
    }

    pub fn transform(&self) -> &FittedTransform {
        &self.transform
    }

    pub fn classifier(&self) -> &BoostedTrees {
        &self.classifier
    }
}
