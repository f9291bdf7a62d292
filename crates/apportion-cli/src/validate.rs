//! # `apportion validate`
//!
//! Runs boundary validation only. Exit code 0 when the request is valid,
//! 2 when it is not. I/O and JSON syntax errors still exit 1.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use apportion_calc::{validate_request, AllocationInput, AllocationRequest, CalcError};

use crate::config::ApportionConfig;
use crate::input::load_request;

/// Exit code for a request that parsed but failed validation.
pub const EXIT_INVALID: u8 = 2;

/// Arguments for `apportion validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Allocation request JSON file.
    #[arg(long, short)]
    pub input: PathBuf,
}

/// Execute `apportion validate`.
pub fn run_validate(args: &ValidateArgs, config: &ApportionConfig) -> Result<u8> {
    let request = load_request(&args.input)?;
    match check_request(&request, config) {
        Ok(input) => {
            println!(
                "OK: {} ({} invoices, {} readings, {} active tenants, {} overrides)",
                input.period,
                input.invoices.len(),
                input.readings.len(),
                input.tenants.len(),
                input.overrides.len(),
            );
            Ok(0)
        }
        Err(e) => {
            println!("INVALID: {e}");
            Ok(EXIT_INVALID)
        }
    }
}

/// Validate a request, including that its overrides target active tenants.
pub fn check_request(
    request: &AllocationRequest,
    config: &ApportionConfig,
) -> Result<AllocationInput, CalcError> {
    let input = validate_request(request, &config.validation)?;
    input.effective_tenants()?;
    Ok(input)
}
