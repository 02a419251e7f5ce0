use serde::{Deserialize, Serialize};

/// Field separator between subject text and label token.
pub const DELIMITER: char = '|';

/// Label token (compared case-insensitively) that marks an invoice.
pub const POSITIVE_TOKEN: &str = "yes";

/// One subject line and whether it denotes an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub text: String,
    pub label: bool,
}

impl LabeledExample {
    pub fn new(text: impl Into<String>, label: bool) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }

    /// Parse one stored line. Returns `None` when the delimiter is missing.
    ///
    /// Only the segment between the first and second delimiter is read as
    /// the label token; anything after a second delimiter is ignored.
    pub fn parse_record(line: &str) -> Option<Self> {
        let mut parts = line.split(DELIMITER);
        let text = parts.next()?;
        let token = parts.next()?;

        Some(Self {
            text: text.to_string(),
            label: token.trim().eq_ignore_ascii_case(POSITIVE_TOKEN),
        })
    }

    /// Render in the stored line format, e.g. `Invoice due|Yes`.
    pub fn to_record(&self) -> String {
        format!("{}{}{}", self.text, DELIMITER, label_token(self.label))
    }
}

pub fn label_token(label: bool) -> &'static str {
    if label {
        "Yes"
    } else {
        "No"
    }
}

/// An ordered collection of labeled examples, rebuilt from its backing file
/// every iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    examples: Vec<LabeledExample>,
}

impl Dataset {
    pub fn new(examples: Vec<LabeledExample>) -> Self {
        Self { examples }
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledExample> {
        self.examples.iter()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.examples.iter().map(|e| e.text.as_str()).collect()
    }

    pub fn labels(&self) -> Vec<bool> {
        self.examples.iter().map(|e| e.label).collect()
    }

    pub fn positive_count(&self) -> usize {
        self.examples.iter().filter(|e| e.label).count()
    }

    pub fn negative_count(&self) -> usize {
        self.len() - self.positive_count()
    }
}

impl FromIterator<LabeledExample> for Dataset {
    fn from_iter<I: IntoIterator<Item = LabeledExample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a LabeledExample;
    type IntoIter = std::slice::Iter<'a, LabeledExample>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}
