//! Git Gandalf: LLM-backed commit gate.
//!
//! Pipe a diff in (`git diff --cached | gandalf review`); the exit status tells
//! a hook or CI step whether the change may proceed.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use gandalf::exit_codes;
use gandalf::io::config::{DEFAULT_CONFIG_PATH, GandalfConfig, load_config, write_config};
use gandalf::io::engine::CommandEngine;
use gandalf::logging;
use gandalf::report::{render_json, render_text};
use gandalf::review::run_review;

#[derive(Parser)]
#[command(
    name = "gandalf",
    version,
    about = "Review a diff with a local LLM and gate the commit on its risk"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Review the diff on stdin and exit non-zero if it should be blocked.
    Review {
        /// Config file to load (defaults apply when it does not exist).
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        /// Override the engine model identifier.
        #[arg(long)]
        model: Option<String>,
        /// Override the inference timeout in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Report format written to stdout.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Write a default config file.
    Init {
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("gandalf: {:#}", err);
            std::process::exit(exit_codes::FAILED);
        }
    }
}

fn run() -> Result<i32> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print()?;
            // `--help` and `--version` are reported through this path too.
            return Ok(if err.use_stderr() {
                exit_codes::FAILED
            } else {
                exit_codes::OK
            });
        }
    };
    match cli.command {
        Command::Review {
            config,
            model,
            timeout_ms,
            format,
        } => cmd_review(&config, model, timeout_ms, format),
        Command::Init { config, force } => cmd_init(&config, force),
    }
}

fn cmd_review(
    config_path: &Path,
    model: Option<String>,
    timeout_ms: Option<u64>,
    format: Format,
) -> Result<i32> {
    let mut config = load_config(config_path)?;
    if let Some(model) = model {
        config.engine.model = model;
    }
    if let Some(timeout_ms) = timeout_ms {
        config.engine.timeout_ms = timeout_ms;
    }
    config.validate()?;

    let engine = CommandEngine::from_config(&config.engine);
    let outcome = run_review(io::stdin().lock(), &engine, config.max_input_bytes)?;

    let report = match format {
        Format::Text => render_text(&outcome),
        Format::Json => render_json(&outcome)?,
    };
    print!("{report}");
    Ok(outcome.exit_code())
}

fn cmd_init(config_path: &Path, force: bool) -> Result<i32> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    write_config(config_path, &GandalfConfig::default())?;
    println!("wrote {}", config_path.display());
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_review_defaults() {
        let cli = Cli::parse_from(["gandalf", "review"]);
        match cli.command {
            Command::Review {
                config,
                model,
                timeout_ms,
                format,
            } => {
                assert_eq!(config, PathBuf::from(DEFAULT_CONFIG_PATH));
                assert_eq!(model, None);
                assert_eq!(timeout_ms, None);
                assert_eq!(format, Format::Text);
            }
            Command::Init { .. } => panic!("expected review"),
        }
    }

    #[test]
    fn parse_review_overrides() {
        let cli = Cli::parse_from([
            "gandalf",
            "review",
            "--model",
            "llama3.1:8b",
            "--timeout-ms",
            "500",
            "--format",
            "json",
        ]);
        assert!(matches!(
            cli.command,
            Command::Review {
                model: Some(ref m),
                timeout_ms: Some(500),
                format: Format::Json,
                ..
            } if m == "llama3.1:8b"
        ));
    }

    #[test]
    fn unknown_flag_is_a_usage_error() {
        let err = Cli::try_parse_from(["gandalf", "review", "--bogus"])
            .err()
            .expect("unknown flag should fail to parse");
        assert!(err.use_stderr());
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["gandalf", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true, .. }));
    }
}
