pub mod evaluate;
pub mod predict;
pub mod prompts;
pub mod run;
pub mod stats;

use clap::{Parser, Subcommand};
use mailsieve_lib::{Config, ConfigOverrides, Result};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mailsieve")]
#[command(about = "Interactive invoice classifier for email subject lines", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to the training data file")]
    pub training: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to the test data file")]
    pub test: Option<PathBuf>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Train, predict and collect feedback until you type exit")]
    Run {
        #[arg(long, help = "Read subjects from a mailbox export instead of typing them")]
        inbox: Option<PathBuf>,
    },

    #[command(about = "Train once and report accuracy on the test set")]
    Evaluate {
        #[arg(long, help = "Print the evaluation report as JSON")]
        json: bool,
    },

    #[command(about = "Train once and classify the given subjects")]
    Predict {
        #[arg(required = true, help = "Subject lines to classify")]
        subjects: Vec<String>,
    },

    #[command(about = "Show record counts for the training and test data")]
    Stats,
}

pub fn load_config(cli: &Cli) -> Result<Config> {
    let inbox = match &cli.command {
        Commands::Run { inbox } => inbox.clone(),
        _ => None,
    };

    let config = Config::new(ConfigOverrides {
        config_file: cli.config.clone(),
        training: cli.training.clone(),
        test: cli.test.clone(),
        inbox,
    })?;
    config.ensure_data_directory()?;

    Ok(config)
}
