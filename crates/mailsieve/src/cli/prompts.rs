//! Terminal collaborators for an interactive session.
//!
//! The operator either types each subject line or, with an inbox export,
//! presses enter to pull the next message. Typing `exit` at that prompt is
//! the only way to stop a session. After every prediction the operator
//! confirms or rejects it with a yes/no prompt.

use crate::util::create_spinner;
use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use indicatif::ProgressBar;
use mailsieve_lib::store::validate_text;
use mailsieve_lib::{
    format_accuracy, EvaluationReport, FeedbackChannel, InboxSource, LabeledExample, Prediction,
    Result, SessionObserver, SubjectSource,
};

const EXIT_WORD: &str = "exit";

/// Subjects typed by the operator or pulled from an inbox export.
pub struct PromptSource {
    term: Term,
    theme: ColorfulTheme,
    inbox: Option<InboxSource>,
}

impl PromptSource {
    pub fn typed() -> Self {
        Self {
            term: Term::stdout(),
            theme: ColorfulTheme::default(),
            inbox: None,
        }
    }

    pub fn from_inbox(inbox: InboxSource) -> Self {
        Self {
            term: Term::stdout(),
            theme: ColorfulTheme::default(),
            inbox: Some(inbox),
        }
    }

    fn is_exit(input: &str) -> bool {
        input.trim().eq_ignore_ascii_case(EXIT_WORD)
    }
}

impl SubjectSource for PromptSource {
    fn next_subject(&mut self) -> Result<Option<String>> {
        self.term.write_line("")?;

        let Some(inbox) = self.inbox.as_mut() else {
            let subject: String = Input::with_theme(&self.theme)
                .with_prompt("Enter an email subject or Exit to terminate")
                .validate_with(|input: &String| -> std::result::Result<(), String> {
                    validate_text(input).map_err(|e| e.to_string())
                })
                .interact_text_on(&self.term)?;

            if Self::is_exit(&subject) {
                return Ok(None);
            }
            return Ok(Some(subject));
        };

        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(format!(
                "Press Enter to continue ({} messages left) or type Exit to terminate",
                inbox.remaining()
            ))
            .allow_empty(true)
            .interact_text_on(&self.term)?;

        if Self::is_exit(&answer) {
            return Ok(None);
        }

        let next = inbox.next_subject()?;
        match &next {
            Some(subject) => self.term.write_line(&format!(
                "{} Message {}: {}",
                style("→").cyan(),
                inbox.delivered(),
                style(subject).bold()
            ))?,
            None => self.term.write_line(&format!(
                "{} No more messages in {}",
                style("·").dim(),
                inbox.path().display()
            ))?,
        }

        Ok(next)
    }
}

/// Yes/no confirmation of each prediction.
pub struct PromptFeedback {
    term: Term,
    theme: ColorfulTheme,
}

impl PromptFeedback {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl FeedbackChannel for PromptFeedback {
    fn confirm(&mut self, _text: &str, _prediction: &Prediction) -> Result<bool> {
        let correct = Confirm::with_theme(&self.theme)
            .with_prompt("Was the prediction correct?")
            .interact_on(&self.term)?;
        Ok(correct)
    }
}

/// Prints session events to stdout, with a spinner while a model trains.
pub struct ConsoleObserver {
    verbose: bool,
    spinner: Option<ProgressBar>,
}

impl ConsoleObserver {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            spinner: None,
        }
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl SessionObserver for ConsoleObserver {
    fn on_training(&mut self, examples: usize) {
        if !self.verbose {
            self.spinner = Some(create_spinner(&format!(
                "Training on {} labeled subjects",
                examples
            )));
        }
    }

    fn on_evaluated(&mut self, report: &EvaluationReport) {
        self.clear_spinner();
        println!(
            "\n{} {}",
            style(">>>").cyan(),
            style(format_accuracy(report.accuracy)).bold()
        );
    }

    fn on_prediction(&mut self, _text: &str, prediction: &Prediction) {
        let verdict = if prediction.label {
            style(prediction.verdict()).green().bold()
        } else {
            style(prediction.verdict()).yellow().bold()
        };
        println!("{}", verdict);
        if self.verbose {
            println!(
                "  {}",
                style(format!("p(invoice) = {:.3}", prediction.probability)).dim()
            );
        }
    }

    fn on_persisted(&mut self, example: &LabeledExample) {
        println!(
            "  {} Saved {}\n",
            style("✓").green(),
            style(example.to_record()).dim()
        );
    }
}

impl Drop for ConsoleObserver {
    fn drop(&mut self) {
        self.clear_spinner();
    }
}
