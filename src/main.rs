// SPDX-License-Identifier: PMPL-1.0-or-later

//! postcode-check: validate postal codes against per-country formats

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use postcode_check::{PatternOverrides, Validator};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "postcode-check")]
#[command(version)]
#[command(about = "Validate postal codes against per-country formats")]
#[command(long_about = None)]
struct Cli {
    /// Pattern override file (JSON or YAML)
    #[arg(short, long, global = true, value_name = "FILE")]
    patterns: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check one postal code
    Check {
        /// ISO 3166-1 alpha-2 country code, or INTL
        #[arg(value_name = "COUNTRY")]
        country: String,

        /// Postal code to validate
        #[arg(value_name = "POSTAL_CODE")]
        postal_code: String,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported country codes and their patterns
    List {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile every pattern in the active table and report failures
    Verify,
}

#[derive(Serialize)]
struct ListedPattern<'a> {
    country: &'a str,
    pattern: &'a str,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_validator(patterns: Option<&PathBuf>) -> Result<Validator> {
    match patterns {
        Some(path) => {
            let overrides = PatternOverrides::load(path)?;
            Validator::from_overrides(overrides)
                .with_context(|| format!("applying pattern overrides {}", path.display()))
        }
        None => Ok(Validator::new()),
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let validator = build_validator(cli.patterns.as_ref())?;

    match cli.command {
        Commands::Check {
            country,
            postal_code,
            json,
        } => {
            let outcome = validator.check(&country, &postal_code);

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else if let Some(error) = &outcome.error {
                eprintln!("{} {}", "error:".red().bold(), error);
            } else if outcome.valid {
                println!(
                    "{} {} is a valid {} postal code",
                    "✓".green(),
                    outcome.postal_code,
                    outcome.country
                );
            } else {
                println!(
                    "{} {} is not a valid {} postal code",
                    "✗".red(),
                    outcome.postal_code,
                    outcome.country
                );
            }

            Ok(if outcome.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Commands::List { json } => {
            if json {
                let listed: Vec<ListedPattern<'_>> = validator
                    .table()
                    .iter()
                    .map(|(country, pattern)| ListedPattern { country, pattern })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listed)?);
            } else {
                for (country, pattern) in validator.table() {
                    println!("{:<5} {}", country.bold(), pattern);
                }
                println!("\n{} countries", validator.table().len());
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Verify => {
            let broken = validator.broken_patterns();
            if broken.is_empty() {
                println!(
                    "{} all {} patterns compile",
                    "✓".green(),
                    validator.table().len()
                );
                return Ok(ExitCode::SUCCESS);
            }

            for (country, message) in &broken {
                println!("{} {}: {}", "✗".red(), country.bold(), message);
            }
            Err(anyhow!("{} pattern(s) failed to compile", broken.len()))
        }
    }
}
