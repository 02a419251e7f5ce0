use super::prompts::{ConsoleObserver, PromptFeedback, PromptSource};
use console::style;
use mailsieve_lib::{Config, InboxSource, Result, Session};

pub fn handle_run_command(config: &Config, verbose: bool) -> Result<()> {
    let source = match &config.inbox_path {
        Some(path) => {
            let inbox = InboxSource::open(path)?;
            if verbose {
                println!(
                    "{} Reading subjects from {} ({} messages)",
                    style(">>>").cyan(),
                    path.display(),
                    inbox.remaining()
                );
            }
            PromptSource::from_inbox(inbox)
        }
        None => PromptSource::typed(),
    };

    if verbose {
        println!(
            "{} Training data: {}",
            style(">>>").cyan(),
            config.training_path.display()
        );
        println!(
            "{} Test data: {}",
            style(">>>").cyan(),
            config.test_path.display()
        );
    }

    let mut session = Session::new(
        config.training_store(),
        config.test_store(),
        source,
        PromptFeedback::new(),
        ConsoleObserver::new(verbose),
    )
    .with_features(config.features)
    .with_hyperparameters(config.hyperparameters);

    let summary = session.run()?;

    println!("\nCompleted Execution.....");
    println!("  Training rounds: {}", style(summary.iterations).cyan());
    println!("  Labels added: {}", style(summary.appended).green());
    if verbose {
        let elapsed = summary.finished_at - summary.started_at;
        println!("  Duration: {}s", elapsed.num_seconds());
    }

    Ok(())
}
