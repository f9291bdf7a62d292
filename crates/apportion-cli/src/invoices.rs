//! # `apportion invoices`
//!
//! Computes a request, takes it through DRAFT → FINALIZED →
//! INVOICES_GENERATED, and prints the tenant invoices as JSON.
//!
//! ```bash
//! apportion compute --input march.json --format table   # note the digest
//! apportion invoices --input march.json --expect-digest sha256:ab12...
//! ```
//!
//! With `--expect-digest`, finalization fails if the request no longer
//! produces the reviewed result.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use apportion_state::{generate_tenant_invoices, Calculation, TenantInvoiceDraft};

use crate::config::ApportionConfig;
use crate::input::load_input;

/// Arguments for `apportion invoices`.
#[derive(Args, Debug)]
pub struct InvoicesArgs {
    /// Allocation request JSON file.
    #[arg(long, short)]
    pub input: PathBuf,

    /// Digest of the reviewed result (hex, optionally `sha256:`-prefixed).
    #[arg(long)]
    pub expect_digest: Option<String>,
}

/// Printed output of `apportion invoices`.
#[derive(Debug, Serialize)]
pub struct InvoiceBatch {
    /// Digest of the finalized result, `sha256:`-prefixed hex.
    pub digest: String,
    /// One draft per tenant with a non-zero bill.
    pub invoices: Vec<TenantInvoiceDraft>,
}

/// Execute `apportion invoices`.
pub fn run_invoices(args: &InvoicesArgs, config: &ApportionConfig) -> Result<u8> {
    let batch = build_invoices(args, config)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&batch).context("failed to serialize invoices")?
    );
    Ok(0)
}

/// Compute, finalize, and fan out invoices for the request in `args`.
pub fn build_invoices(args: &InvoicesArgs, config: &ApportionConfig) -> Result<InvoiceBatch> {
    let input = load_input(&args.input, config)?;
    let result = input.compute().context("allocation failed")?;
    let over = result.over_allocated();
    if !over.is_empty() {
        let types: Vec<String> = over.iter().map(|o| o.utility_type.to_string()).collect();
        tracing::warn!(
            types = %types.join(","),
            "invoicing an over-allocated period; tenant totals exceed invoiced amounts"
        );
    }

    let mut calculation = Calculation::new_draft(result, input.overrides.clone())
        .context("failed to create calculation draft")?;
    calculation
        .finalize(args.expect_digest.as_deref(), "finalized from cli")
        .context("failed to finalize calculation")?;
    let invoices = generate_tenant_invoices(&mut calculation, &config.display)
        .context("failed to generate tenant invoices")?;

    Ok(InvoiceBatch {
        digest: calculation.digest.to_string(),
        invoices,
    })
}
