//! # `apportion compute`
//!
//! Validates a request, applies percentage overrides, runs the allocation,
//! and prints the result as JSON or as a table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use apportion_calc::AllocationResult;

use crate::config::ApportionConfig;
use crate::input::compute_from_file;
use crate::render::{render_allocation, OutputFormat};

/// Arguments for `apportion compute`.
#[derive(Args, Debug)]
pub struct ComputeArgs {
    /// Allocation request JSON file.
    #[arg(long, short)]
    pub input: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Execute `apportion compute`.
pub fn run_compute(args: &ComputeArgs, config: &ApportionConfig) -> Result<u8> {
    let result = compute_from_file(&args.input, config)?;
    println!("{}", format_result(&result, args.format, config)?);
    Ok(0)
}

/// Render a result in the requested format.
pub fn format_result(
    result: &AllocationResult,
    format: OutputFormat,
    config: &ApportionConfig,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(result).context("failed to serialize allocation result")
        }
        OutputFormat::Table => {
            let digest = result.digest().context("failed to digest allocation result")?;
            let mut text = render_allocation(result, &config.display);
            text.push('\n');
            text.push_str(&format!("digest {digest}"));
            Ok(text)
        }
    }
}
