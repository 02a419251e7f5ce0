use crate::model::{format_accuracy, EvaluationReport, Prediction};
use crate::store::LabeledExample;

/// Receives the session's reportable events. All methods default to no-ops.
pub trait SessionObserver {
    fn on_training(&mut self, _examples: usize) {}

    fn on_evaluated(&mut self, _report: &EvaluationReport) {}

    fn on_prediction(&mut self, _text: &str, _prediction: &Prediction) {}

    fn on_persisted(&mut self, _example: &LabeledExample) {}
}

impl SessionObserver for () {}

impl<O: SessionObserver + ?Sized> SessionObserver for &mut O {
    fn on_training(&mut self, examples: usize) {
        (**self).on_training(examples)
    }

    fn on_evaluated(&mut self, report: &EvaluationReport) {
        (**self).on_evaluated(report)
    }

    fn on_prediction(&mut self, text: &str, prediction: &Prediction) {
        (**self).on_prediction(text, prediction)
    }

    fn on_persisted(&mut self, example: &LabeledExample) {
        (**self).on_persisted(example)
    }
}

/// Keeps every reported line and persisted example in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub lines: Vec<String>,
    pub accuracies: Vec<f64>,
    pub predictions: Vec<(String, bool)>,
    pub persisted: Vec<LabeledExample>,
}

impl SessionObserver for RecordingObserver {
    fn on_evaluated(&mut self, report: &EvaluationReport) {
        self.accuracies.push(report.accuracy);
        self.lines.push(format_accuracy(report.accuracy));
    }

    fn on_prediction(&mut self, text: &str, prediction: &Prediction) {
        self.predictions.push((text.to_string(), prediction.label));
        self.lines.push(prediction.verdict().to_string());
    }

    fn on_persisted(&mut self, example: &LabeledExample) {
        self.persisted.push(example.clone());
    }
}
