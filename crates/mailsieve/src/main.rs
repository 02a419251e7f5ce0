mod cli;
mod util;

use clap::Parser;
use mailsieve_lib::Result;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = cli::load_config(&cli)?;

    match cli.command {
        cli::Commands::Run { .. } => {
            cli::run::handle_run_command(&config, cli.verbose)
        }

        cli::Commands::Evaluate { json } => {
            cli::evaluate::handle_evaluate_command(&config, json, cli.verbose)
        }

        cli::Commands::Predict { subjects } => {
            cli::predict::handle_predict_command(&config, &subjects, cli.verbose)
        }

        cli::Commands::Stats => {
            cli::stats::handle_stats_command(&config)
        }
    }
}
