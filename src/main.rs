//! Conveyor CLI Entry Point
//!
//! This is the main binary entry point for the Conveyor CLI.
//! It provides the transfer operations as subcommands:
//! - `preview` - Validate a request and show the command without running it
//! - `run` - Validate, confirm, and execute a transfer
//! - `check` - Validate a single connection descriptor
//! - `suggest` - Recommend a parallelism method
//! - `combinations` - List supported source/target pairs
//! - `version` - Show binary and capability information
//! - `mcp` - MCP server mode (hidden, for AI agent integration)
//!
//! All output to stdout is JSON-only. Logs go to stderr.

use std::io::Read;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use tracing_subscriber::EnvFilter;

use conveyor::config::Settings;
use conveyor::error::{ConveyorError, Result};
use conveyor::model::{RawConnection, RawTransferRequest};
use conveyor::ops::{self, SuggestRequest};
use conveyor::output::{ErrorEnvelope, Metadata, SuccessEnvelope};
use conveyor::validate::Side;

/// Conveyor - validation and command synthesis for FastTransfer
#[derive(Parser)]
#[command(name = "conveyor")]
#[command(about = "Validate, preview, and run FastTransfer bulk data transfers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a transfer request and print the command without running it
    Preview {
        /// Path to the request JSON, or '-' for stdin
        #[arg(long, default_value = "-")]
        request: String,
    },

    /// Validate, confirm, and execute a transfer
    Run {
        /// Path to the request JSON, or '-' for stdin
        #[arg(long, default_value = "-")]
        request: String,

        /// Skip the interactive confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Validate a single connection descriptor
    Check {
        /// Which end the descriptor describes: source or target
        #[arg(long)]
        side: String,

        /// Path to the connection JSON, or '-' for stdin
        #[arg(long, default_value = "-")]
        connection: String,
    },

    /// Recommend a parallelism method for a table
    Suggest {
        /// Source connection type (wire value, e.g. pgsql)
        #[arg(long)]
        source_type: String,

        /// The table has a numeric key column
        #[arg(long)]
        numeric_key: bool,

        /// The table has a date or string key column
        #[arg(long)]
        date_or_string_key: bool,

        /// Approximate row count of the source table
        #[arg(long)]
        rows: u64,
    },

    /// List supported source/target combinations
    Combinations,

    /// Show binary path, detected version, and capabilities
    Version,

    /// Start MCP server (hidden from help, for AI agent integration)
    #[command(hide = true)]
    Mcp,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if matches!(cli.command, Commands::Mcp) {
        return match conveyor::mcp::serve().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("MCP server error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let op = op_name(&cli.command);
    match dispatch(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_json(&ErrorEnvelope::from_error(op, &e));
            ExitCode::FAILURE
        }
    }
}

const fn op_name(command: &Commands) -> &'static str {
    match command {
        Commands::Preview { .. } => "preview",
        Commands::Run { .. } => "run",
        Commands::Check { .. } => "check",
        Commands::Suggest { .. } => "suggest",
        Commands::Combinations => "combinations",
        Commands::Version => "version",
        Commands::Mcp => "mcp",
    }
}

async fn dispatch(command: Commands) -> Result<()> {
    let settings = Settings::from_env()?;
    let started = Instant::now();

    match command {
        Commands::Preview { request } => {
            let raw = read_request(&request)?;
            let (preview, warnings) = ops::preview(&raw, &settings).await?;
            let meta = Metadata::with_warnings(elapsed_ms(started), warnings);
            print_json(&SuccessEnvelope::new("preview", preview, meta));
        }

        Commands::Run { request, yes } => {
            let raw = read_request(&request)?;
            let (preview, warnings) = ops::preview(&raw, &settings).await?;

            if !yes {
                eprintln!("{}", preview.explanation);
                eprintln!("\n{}\n", preview.display);
                let confirmed = Confirm::new()
                    .with_prompt("Run this transfer?")
                    .default(false)
                    .interact()
                    .map_err(|e| ConveyorError::execution(format!("confirmation failed: {e}")))?;
                if !confirmed {
                    return Err(ConveyorError::execution("transfer cancelled"));
                }
            }

            let report = ops::run(&preview.tokens, &settings).await?;
            let meta = Metadata::with_warnings(elapsed_ms(started), warnings);
            print_json(&SuccessEnvelope::new("run", report, meta));
        }

        Commands::Check { side, connection } => {
            let side = Side::parse(&side).ok_or_else(|| {
                ConveyorError::schema(format!("'{side}' is not a side; use 'source' or 'target'"))
            })?;
            let raw: RawConnection = parse_json(&read_input(&connection)?)?;
            let data = ops::check_connection(&raw, side, &settings).await?;
            print_json(&SuccessEnvelope::new("check", data, Metadata::new(elapsed_ms(started))));
        }

        Commands::Suggest { source_type, numeric_key, date_or_string_key, rows } => {
            let params = SuggestRequest {
                source_type,
                has_numeric_key: numeric_key,
                has_date_or_string_key: date_or_string_key,
                approx_row_count: rows,
            };
            let suggestion = ops::suggest_method(&params, &settings).await?;
            print_json(&SuccessEnvelope::new(
                "suggest",
                suggestion,
                Metadata::new(elapsed_ms(started)),
            ));
        }

        Commands::Combinations => {
            let caps = ops::resolve_capabilities(&settings).await;
            let data = ops::supported_combinations(&caps);
            print_json(&SuccessEnvelope::new(
                "combinations",
                data,
                Metadata::new(elapsed_ms(started)),
            ));
        }

        Commands::Version => {
            let data = ops::version_info(&settings).await;
            print_json(&SuccessEnvelope::new("version", data, Metadata::new(elapsed_ms(started))));
        }

        Commands::Mcp => unreachable!("handled before dispatch"),
    }

    Ok(())
}

/// Read and parse a transfer request from a file or stdin
fn read_request(source: &str) -> Result<RawTransferRequest> {
    parse_json(&read_input(source)?)
}

/// Read raw input from a path, or stdin when the path is '-'
fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| ConveyorError::schema(format!("could not read stdin: {e}")))?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(source)
            .map_err(|e| ConveyorError::schema(format!("could not read '{source}': {e}")))
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| ConveyorError::schema(format!("invalid JSON: {e}")))
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("could not serialize output: {e}"),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
