//! Where new subject lines come from.
//!
//! A source is asked for one subject at a time. Returning `Ok(None)` is the
//! stop signal that ends an active-learning session.

pub mod inbox;

pub use inbox::InboxSource;

use crate::error::Result;
use std::collections::VecDeque;

pub trait SubjectSource {
    /// Block until the next subject is available, or return `None` to stop.
    fn next_subject(&mut self) -> Result<Option<String>>;
}

impl<S: SubjectSource + ?Sized> SubjectSource for Box<S> {
    fn next_subject(&mut self) -> Result<Option<String>> {
        (**self).next_subject()
    }
}

/// In-memory FIFO of subjects; stops once drained.
#[derive(Debug, Clone, Default)]
pub struct QueueSource {
    pending: VecDeque<String>,
}

impl QueueSource {
    pub fn new<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pending: subjects.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, subject: impl Into<String>) {
        self.pending.push_back(subject.into());
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl SubjectSource for QueueSource {
    fn next_subject(&mut self) -> Result<Option<String>> {
        Ok(self.pending.pop_front())
    }
}
