//! Active-learning loop controller.
//!
//! A session repeats one iteration until the subject source signals stop:
//!
//! ```text
//! Loading -> Training -> Evaluating -> AwaitingInput -> Predicting
//!         -> AwaitingFeedback -> Persisting -> Loading
//!
//! AwaitingInput -> Stopped    (source returned no subject)
//! ```
//!
//! Both datasets are reloaded in full at the start of every iteration, so the
//! label appended by the previous iteration is always part of the next
//! training round. Nothing is written before `Persisting`; an error in an
//! earlier state aborts the iteration and leaves the store untouched.

pub mod feedback;
pub mod observer;

pub use feedback::{FeedbackChannel, ScriptedFeedback};
pub use observer::{RecordingObserver, SessionObserver};

use crate::error::Result;
use crate::features::FeaturizerOptions;
use crate::model::{EvaluationReport, Hyperparameters, Prediction, TrainedModel};
use crate::source::SubjectSource;
use crate::store::{validate_text, LabelStore, LabeledExample};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Training,
    Evaluating,
    AwaitingInput,
    Predicting,
    AwaitingFeedback,
    Persisting,
    Stopped,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Loading => "loading",
            SessionState::Training => "training",
            SessionState::Evaluating => "evaluating",
            SessionState::AwaitingInput => "awaiting_input",
            SessionState::Predicting => "predicting",
            SessionState::AwaitingFeedback => "awaiting_feedback",
            SessionState::Persisting => "persisting",
            SessionState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The true label implied by the operator's verdict on a prediction.
pub fn derive_label(predicted: bool, affirmed: bool) -> bool {
    if affirmed {
        predicted
    } else {
        !predicted
    }
}

/// What one completed iteration did.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub report: EvaluationReport,
    pub text: String,
    pub prediction: Prediction,
    pub affirmed: bool,
    pub label: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IterationOutcome {
    Labeled(IterationRecord),
    Stopped,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Training rounds completed, including the one that ended in a stop
    pub iterations: usize,
    /// Records appended to the training store
    pub appended: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct Session<S, F, O> {
    training: LabelStore,
    test: LabelStore,
    features: FeaturizerOptions,
    params: Hyperparameters,
    source: S,
    feedback: F,
    observer: O,
    state: SessionState,
    iterations: usize,
    appended: usize,
}

impl<S, F, O> Session<S, F, O>
where
    S: SubjectSource,
    F: FeedbackChannel,
    O: SessionObserver,
{
    pub fn new(
        training: LabelStore,
        test: LabelStore,
        source: S,
        feedback: F,
        observer: O,
    ) -> Self {
        Self {
            training,
            test,
            features: FeaturizerOptions::default(),
            params: Hyperparameters::default(),
            source,
            feedback,
            observer,
            state: SessionState::Loading,
            iterations: 0,
            appended: 0,
        }
    }

    pub fn with_features(mut self, features: FeaturizerOptions) -> Self {
        self.features = features;
        self
    }

    pub fn with_hyperparameters(mut self, params: Hyperparameters) -> Self {
        self.params = params;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run iterations until the source signals stop. The first error aborts
    /// the session and is returned unchanged.
    pub fn run(&mut self) -> Result<SessionSummary> {
        let started_at = Utc::now();
        log::info!(
            "Starting session: training={}, test={}",
            self.training.path().display(),
            self.test.path().display()
        );

        while let IterationOutcome::Labeled(_) = self.step()? {}

        Ok(SessionSummary {
            iterations: self.iterations,
            appended: self.appended,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Run one full iteration, from `Loading` back to `Loading` or to `Stopped`.
    pub fn step(&mut self) -> Result<IterationOutcome> {
        if self.state == SessionState::Stopped {
            return Ok(IterationOutcome::Stopped);
        }

        self.state = SessionState::Loading;
        match self.iterate() {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                log::warn!("Iteration aborted while {}: {}", self.state, err);
                self.state = SessionState::Loading;
                Err(err)
            }
        }
    }

    fn iterate(&mut self) -> Result<IterationOutcome> {
        let training = self.training.load()?;
        let test = self.test.load()?;
        log::info!(
            "Loaded {} training and {} test examples",
            training.len(),
            test.len()
        );

        self.transition(SessionState::Training);
        self.observer.on_training(training.len());
        let model = TrainedModel::train(&training, &self.features, &self.params)?;

        self.transition(SessionState::Evaluating);
        let report = model.evaluate(&test)?;
        self.observer.on_evaluated(&report);
        self.iterations += 1;

        self.transition(SessionState::AwaitingInput);
        let Some(text) = self.source.next_subject()? else {
            self.transition(SessionState::Stopped);
            log::info!("Session stopped after {} appended labels", self.appended);
            return Ok(IterationOutcome::Stopped);
        };
        validate_text(&text)?;

        self.transition(SessionState::Predicting);
        let prediction = model.predict(&text);
        self.observer.on_prediction(&text, &prediction);

        self.transition(SessionState::AwaitingFeedback);
        let affirmed = self.feedback.confirm(&text, &prediction)?;
        let label = derive_label(prediction.label, affirmed);

        self.transition(SessionState::Persisting);
        self.training.append(&text, label)?;
        self.appended += 1;
        self.observer.on_persisted(&LabeledExample::new(text.clone(), label));

        self.transition(SessionState::Loading);
        Ok(IterationOutcome::Labeled(IterationRecord {
            report,
            text,
            prediction,
            affirmed,
            label,
        }))
    }

    fn transition(&mut self, next: SessionState) {
        log::debug!("Session state {} -> {}", self.state, next);
        self.state = next;
    }
}
