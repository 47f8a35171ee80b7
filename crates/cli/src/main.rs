//! niagate CLI: the main entry point.
//!
//! Commands:
//! - `serve`    Start the guarded proxy HTTP server
//! - `ask`      Run one message through the full pipeline
//! - `check`    Classify a message offline
//! - `sanitize` Run the output sanitizer offline
//! - `import`   Load a curriculum snapshot into SQLite
//! - `config`   Show, locate or validate configuration
//! - `doctor`   Diagnose configuration and store health

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "niagate",
    about = "niagate: guarded curriculum chat proxy",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.niagate/config.toml)
    #[arg(short, long, global = true, env = "NIAGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send one message through the pipeline and print the reply
    Ask {
        /// The user message
        message: String,

        /// Curriculum program id
        #[arg(long)]
        program: Option<String>,

        /// Curriculum day number
        #[arg(long)]
        day: Option<f64>,

        /// Media URL the reply may mention (repeatable)
        #[arg(long = "allow")]
        allow: Vec<String>,
    },

    /// Classify a message against the input policy
    Check {
        /// The user message
        message: String,
    },

    /// Sanitize a model reply against the output policy
    Sanitize {
        /// Raw model text
        text: String,

        /// Media URL the reply may mention (repeatable)
        #[arg(long = "allow")]
        allow: Vec<String>,
    },

    /// Import a JSON curriculum snapshot into the SQLite store
    Import {
        /// Snapshot file ({ "program_days": [...], "practices": {...} })
        snapshot: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose configuration and store health
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Validate configuration and compile the policy
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(config_path, port).await?,
        Commands::Ask {
            message,
            program,
            day,
            allow,
        } => commands::ask::run(config_path, message, program, day, allow).await?,
        Commands::Check { message } => commands::check::run(config_path, &message).await?,
        Commands::Sanitize { text, allow } => {
            commands::sanitize::run(config_path, &text, allow).await?
        }
        Commands::Import { snapshot } => commands::import::run(config_path, &snapshot).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(config_path).await?,
            ConfigAction::Path => commands::config_cmd::path(config_path).await?,
            ConfigAction::Validate => commands::config_cmd::validate(config_path).await?,
        },
        Commands::Doctor => commands::doctor::run(config_path).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_sanitize_with_allowlist() {
        let cli = Cli::try_parse_from([
            "niagate",
            "sanitize",
            "see https://a.example/x",
            "--allow",
            "https://a.example/x",
            "--allow",
            "https://b.example/y",
        ])
        .unwrap();
        match cli.command {
            Commands::Sanitize { allow, .. } => assert_eq!(allow.len(), 2),
            _ => panic!("expected sanitize"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["niagate", "doctor", "-v", "--log-json", "--config", "x.toml"])
            .unwrap();
        assert!(cli.verbose);
        assert!(cli.log_json);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("x.toml")));
    }

    #[test]
    fn ask_takes_day_context() {
        let cli = Cli::try_parse_from([
            "niagate",
            "ask",
            "რა არის დღეს?",
            "--program",
            "wakeup_7_days",
            "--day",
            "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask { program, day, .. } => {
                assert_eq!(program.as_deref(), Some("wakeup_7_days"));
                assert_eq!(day, Some(3.0));
            }
            _ => panic!("expected ask"),
        }
    }
}
