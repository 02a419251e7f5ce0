use crate::error::{MailsieveError, Result};
use serde::{Deserialize, Serialize};

/// Binary classification metrics over a held-out test set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub total: usize,
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl EvaluationReport {
    /// Build a report from `(predicted, actual)` pairs.
    pub fn from_outcomes<I>(outcomes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (bool, bool)>,
    {
        let (mut tp, mut tn, mut fp, mut fn_) = (0, 0, 0, 0);
        for (predicted, actual) in outcomes {
            match (predicted, actual) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
            }
        }

        let total = tp + tn + fp + fn_;
        if total == 0 {
            return Err(MailsieveError::EmptyDataset(
                "test set has no examples; accuracy is undefined".to_string(),
            ));
        }

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Ok(Self {
            total,
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
            accuracy: ratio(tp + tn, total),
            precision,
            recall,
            f1,
        })
    }

    pub fn correct(&self) -> usize {
        self.true_positives + self.true_negatives
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Whole-number percentage, rounding halves away from zero (`0.125` → `13%`).
pub fn format_percent(value: f64) -> String {
    format!("{}%", (value * 100.0).round() as i64)
}

pub fn format_accuracy(accuracy: f64) -> String {
    format!("Accuracy of the Model = {}", format_percent(accuracy))
}
