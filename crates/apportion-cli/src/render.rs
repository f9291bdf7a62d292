//! # Plain-Text Rendering
//!
//! Human-readable tables for `--format table`. JSON output is produced
//! directly with `serde_json` by the handlers.

use std::fmt::Write as _;

use clap::ValueEnum;

use apportion_calc::{AllocationResult, MeterReconciliation};
use apportion_core::{format_money, format_percentage, UtilityType};
use apportion_state::DisplaySettings;

/// Output format for commands that print results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// Aligned plain-text table.
    Table,
}

/// Render a full allocation as text.
pub fn render_allocation(result: &AllocationResult, display: &DisplaySettings) -> String {
    let money = |d| format_money(d, display.scale, &display.currency);
    let mut out = String::new();

    let _ = writeln!(out, "Utility allocation for {}", result.period);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<14}{:>20}{:>12}{:>20}",
        "UTILITY", "INVOICED", "COMPANY %", "COMPANY"
    );
    for utility in UtilityType::all() {
        let company = result.company_portion[*utility];
        let _ = writeln!(
            out,
            "{:<14}{:>20}{:>12}{:>20}",
            utility.as_str(),
            money(result.invoice_totals.total_for(*utility)),
            format_percentage(company.percentage.value()),
            money(company.amount),
        );
    }

    for (tenant_id, allocation) in &result.tenant_allocations {
        let _ = writeln!(out);
        let label = match &allocation.name {
            Some(name) => format!("{tenant_id} ({name})"),
            None => tenant_id.to_string(),
        };
        let _ = writeln!(out, "{label:<46}total {}", money(allocation.total));
        for (utility, line) in allocation.lines.iter() {
            if line.percentage.is_zero() && line.amount.is_zero() {
                continue;
            }
            let _ = writeln!(
                out,
                "  {:<12}{:>12}{:>20}",
                utility.as_str(),
                format_percentage(line.percentage.value()),
                money(line.amount),
            );
        }
    }

    let _ = writeln!(out);
    out.push_str(&render_reconciliation(&result.meter_reconciliation));

    for over in result.over_allocated() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "WARNING: {} tenant shares sum to {}; company share clamped to 0% and amounts do not reconcile",
            over.utility_type,
            format_percentage(over.tenant_pct_sum),
        );
    }

    out
}

/// Render the meter reconciliation block.
pub fn render_reconciliation(reconciliation: &MeterReconciliation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Meter reconciliation");
    let _ = writeln!(out, "  {:<20}{:>16}", "general meter", reconciliation.general_consumption);
    let _ = writeln!(out, "  {:<20}{:>16}", "tenant meters", reconciliation.tenant_consumption_sum);
    let _ = writeln!(out, "  {:<20}{:>16}", "difference", reconciliation.difference);
    let _ = writeln!(
        out,
        "  {:<20}{:>16}",
        "unallocated",
        format_percentage(reconciliation.unallocated_percent)
    );
    out
}
