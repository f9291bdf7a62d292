//! # Request Loading
//!
//! Reads an allocation request JSON file and runs boundary validation.

use std::path::Path;

use anyhow::{Context, Result};

use apportion_calc::{validate_request, AllocationInput, AllocationRequest, AllocationResult};

use crate::config::ApportionConfig;

/// Read and parse a request file without validating it.
pub fn load_request(path: &Path) -> Result<AllocationRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request file: {}", path.display()))?;
    let request: AllocationRequest = serde_json::from_str(&text)
        .with_context(|| format!("malformed request JSON: {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        invoices = request.invoices.len(),
        readings = request.readings.len(),
        tenants = request.tenants.len(),
        "loaded allocation request"
    );
    Ok(request)
}

/// Read, parse, and validate a request file.
pub fn load_input(path: &Path, config: &ApportionConfig) -> Result<AllocationInput> {
    let request = load_request(path)?;
    let input = validate_request(&request, &config.validation)
        .with_context(|| format!("request failed validation: {}", path.display()))?;
    Ok(input)
}

/// Read, validate, and compute in one step.
pub fn compute_from_file(path: &Path, config: &ApportionConfig) -> Result<AllocationResult> {
    let input = load_input(path, config)?;
    let result = input.compute().context("allocation failed")?;
    Ok(result)
}
