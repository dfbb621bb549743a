pub mod commands;

use clap::{Parser, Subcommand};
use crumb_core::config::AppConfig;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "crumb",
    about = "Crumb storefront assistant CLI",
    long_about = "Run one-off assistant messages, inspect effective configuration, \
                  and check readiness of the backend and generative endpoints.",
    after_help = "Examples:\n  crumb ask \"what products do you sell\"\n  crumb ask --auth-token $TOKEN \"my orders\"\n  crumb doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Send one message through the assistant pipeline and print the reply")]
    Ask {
        #[arg(help = "The user message to process")]
        text: String,
        #[arg(long, help = "Bearer token for an authenticated session")]
        auth_token: Option<String>,
    },
    #[command(about = "Inspect effective configuration values with secrets redacted")]
    Config,
    #[command(about = "Validate config and probe backend/generative readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn init_logging(config: &AppConfig) {
    use crumb_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Ask { text, auth_token } => commands::ask::run(&text, auth_token).await,
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json).await,
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
