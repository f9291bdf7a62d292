//! # apportion CLI entry point
//!
//! Parses command-line arguments, loads the optional YAML config, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use apportion_cli::compute::{run_compute, ComputeArgs};
use apportion_cli::invoices::{run_invoices, InvoicesArgs};
use apportion_cli::reconcile::{run_reconcile, ReconcileArgs};
use apportion_cli::validate::{run_validate, ValidateArgs};
use apportion_cli::ApportionConfig;

/// Utility cost apportionment.
///
/// Splits a billing period's supplier invoices across tenants by
/// configured percentage, assigns the remainder to the company, and
/// reconciles the general meter against individual meters.
#[derive(Parser, Debug)]
#[command(name = "apportion", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate, compute, and print a period's allocation.
    Compute(ComputeArgs),

    /// Check a request without computing it.
    Validate(ValidateArgs),

    /// Print the general-meter reconciliation.
    Reconcile(ReconcileArgs),

    /// Finalize the allocation and print per-tenant invoices.
    Invoices(InvoicesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "apportion starting");

    let config = match ApportionConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let result = match cli.command {
        Commands::Compute(args) => run_compute(&args, &config),
        Commands::Validate(args) => run_validate(&args, &config),
        Commands::Reconcile(args) => run_reconcile(&args, &config),
        Commands::Invoices(args) => run_invoices(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
