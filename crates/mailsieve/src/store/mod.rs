//! Append-only labeled example store.
//!
//! Each backing file holds one `<text>|<label>` record per line. Files are
//! always read in full; new records are only ever appended to the end.

pub mod dataset;

pub use dataset::{label_token, Dataset, LabeledExample, DELIMITER, POSITIVE_TOKEN};

use crate::error::{MailsieveError, Result};
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A delimited text file of labeled examples.
#[derive(Debug, Clone)]
pub struct LabelStore {
    path: PathBuf,
}

impl LabelStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record from the backing file.
    ///
    /// Blank lines are skipped. A line without the delimiter fails the whole
    /// load with [`MailsieveError::Format`]; no partial dataset is returned.
    pub fn load(&self) -> Result<Dataset> {
        let content = fs::read_to_string(&self.path)?;
        let mut examples = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            if line.trim().is_empty() {
                continue;
            }

            let example = LabeledExample::parse_record(line).ok_or_else(|| MailsieveError::Format {
                path: self.path.clone(),
                line: idx + 1,
                content: line.to_string(),
            })?;
            examples.push(example);
        }

        log::debug!("Loaded {} records from {}", examples.len(), self.path.display());
        Ok(Dataset::new(examples))
    }

    /// Append one record to the end of the backing file, creating it if needed.
    pub fn append(&self, text: &str, label: bool) -> Result<()> {
        validate_text(text)?;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut record = String::new();
        if file.metadata()?.len() > 0 {
            file.seek(SeekFrom::End(-1))?;
            let mut last = [0u8; 1];
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                record.push('\n');
            }
        }
        record.push_str(&LabeledExample::new(text, label).to_record());

        file.write_all(record.as_bytes())?;
        file.flush()?;

        log::info!(
            "Appended {:?} as {} to {}",
            text,
            label_token(label),
            self.path.display()
        );
        Ok(())
    }

    /// Number of records currently stored.
    pub fn count(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }
}

/// Check that `text` can be stored and read back verbatim.
pub fn validate_text(text: &str) -> Result<()> {
    if text.contains(DELIMITER) || text.contains('\n') || text.contains('\r') {
        return Err(MailsieveError::InvalidText(text.to_string()));
    }
    Ok(())
}
