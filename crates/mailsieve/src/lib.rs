pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod session;
pub mod source;
pub mod store;

pub use config::{Config, ConfigFile, ConfigOverrides};
pub use error::{MailsieveError, Result};
pub use features::{FeatureVector, FeaturizerOptions, FittedTransform, TextFeaturizer};
pub use model::{
    format_accuracy, format_percent, verdict_phrase, BoostedTrees, EvaluationReport,
    Hyperparameters, Prediction, RegressionTree, TrainedModel,
};
pub use session::{
    derive_label, FeedbackChannel, IterationOutcome, IterationRecord, RecordingObserver,
    ScriptedFeedback, Session, SessionObserver, SessionState, SessionSummary,
};
pub use source::{InboxSource, QueueSource, SubjectSource};
pub use store::{Dataset, LabelStore, LabeledExample};
