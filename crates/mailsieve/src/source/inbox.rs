use super::SubjectSource;
use crate::error::Result;
use crate::store::DELIMITER;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Subjects read from a plain-text mailbox export, one per line.
///
/// Each request hands out the next unread subject; the source stops once the
/// export is exhausted. Delimiter characters are replaced with spaces so
/// every subject can later be stored as a labeled record.
#[derive(Debug, Clone)]
pub struct InboxSource {
    path: PathBuf,
    pending: VecDeque<String>,
    delivered: usize,
}

impl InboxSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path)?;
        let pending: VecDeque<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.replace(DELIMITER, " "))
            .collect();

        log::info!("Opened inbox {} with {} subjects", path.display(), pending.len());
        Ok(Self {
            path,
            pending,
            delivered: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

impl SubjectSource for InboxSource {
    fn next_subject(&mut self) -> Result<Option<String>> {
        let next = self.pending.pop_front();
        match &next {
            Some(subject) => {
                self.delivered += 1;
                log::debug!("Inbox message {}: {:?}", self.delivered, subject);
            }
            None => log::info!("Inbox {} exhausted", self.path.display()),
        }
        Ok(next)
    }
}
