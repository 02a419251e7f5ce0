use crate::error::{MailsieveError, Result};
use crate::model::Prediction;
use std::collections::VecDeque;

/// The operator's answer to "was the prediction correct?".
pub trait FeedbackChannel {
    fn confirm(&mut self, text: &str, prediction: &Prediction) -> Result<bool>;
}

impl<F: FeedbackChannel + ?Sized> FeedbackChannel for Box<F> {
    fn confirm(&mut self, text: &str, prediction: &Prediction) -> Result<bool> {
        (**self).confirm(text, prediction)
    }
}

/// Pre-recorded answers, handed out in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFeedback {
    answers: VecDeque<bool>,
}

impl ScriptedFeedback {
    pub fn new<I: IntoIterator<Item = bool>>(answers: I) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl FeedbackChannel for ScriptedFeedback {
    fn confirm(&mut self, text: &str, _prediction: &Prediction) -> Result<bool> {
        self.answers.pop_front().ok_or_else(|| {
            MailsieveError::UserInput(format!("no scripted feedback left for {:?}", text))
        })
    }
}
