use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Run `work` behind a spinner unless `verbose` output is already streaming.
pub fn with_spinner<T>(message: &str, verbose: bool, work: impl FnOnce() -> T) -> T {
    if verbose {
        return work();
    }

    let spinner = create_spinner(message);
    let result = work();
    spinner.finish_and_clear();
    result
}
