//! # `apportion reconcile`
//!
//! Prints the general-meter vs. individual-meter reconciliation for a
//! request. Invoices and tenants are validated but not allocated.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use apportion_calc::compute_meter_reconciliation;

use crate::config::ApportionConfig;
use crate::input::load_input;
use crate::render::{render_reconciliation, OutputFormat};

/// Arguments for `apportion reconcile`.
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Allocation request JSON file.
    #[arg(long, short)]
    pub input: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Execute `apportion reconcile`.
pub fn run_reconcile(args: &ReconcileArgs, config: &ApportionConfig) -> Result<u8> {
    let input = load_input(&args.input, config)?;
    let reconciliation = compute_meter_reconciliation(&input.readings);
    if !input.readings.iter().any(|r| r.is_general) {
        tracing::info!(period = %input.period, "no general meter reading; reconciliation is zero");
    }
    match args.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&reconciliation)
                .context("failed to serialize reconciliation")?
        ),
        OutputFormat::Table => print!("{}", render_reconciliation(&reconciliation)),
    }
    Ok(0)
}
