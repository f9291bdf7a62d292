//! # Tenant Invoice Fan-out
//!
//! Turns a finalized calculation into one invoice draft per tenant. This is
//! the only place amounts get rounded: each line is rounded to the currency
//! scale and the invoice total is the sum of the rounded lines, so a printed
//! invoice always adds up.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use apportion_calc::{AllocationResult, TenantAllocation};
use apportion_core::{round_money, BillingPeriod, Decimal, Percentage, TenantId, UtilityType};

use crate::calculation::{Calculation, CalculationError, CalculationState};

/// Currency label and rounding scale for money shown to people.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
    /// Currency label appended to amounts.
    pub currency: String,
    /// Decimal places amounts are rounded to.
    pub scale: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency: "RON".to_string(),
            scale: 2,
        }
    }
}

/// One utility line on a tenant invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantInvoiceLine {
    /// Utility type billed.
    pub utility_type: UtilityType,
    /// Share of the building invoice.
    pub percentage: Percentage,
    /// Rounded amount.
    pub amount: Decimal,
}

/// A tenant invoice ready to be issued by the invoicing collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantInvoiceDraft {
    /// `UTIL-<YYYY>-<MM>-<tenant id>`.
    pub invoice_number: String,
    /// Billed tenant.
    pub tenant_id: TenantId,
    /// Tenant display name, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    /// Billing period.
    pub period: BillingPeriod,
    /// First day of the service period.
    pub service_start: NaiveDate,
    /// Last day of the service period.
    pub service_end: NaiveDate,
    /// Currency label.
    pub currency: String,
    /// Non-zero lines in canonical utility order.
    pub lines: Vec<TenantInvoiceLine>,
    /// Σ of rounded line amounts.
    pub total: Decimal,
}

/// Invoice number for a tenant and period.
pub fn invoice_number(period: BillingPeriod, tenant_id: TenantId) -> String {
    format!(
        "UTIL-{:04}-{:02}-{}",
        period.year(),
        period.month(),
        tenant_id.get()
    )
}

/// Build invoice drafts from a result without touching any lifecycle.
///
/// Tenants whose rounded lines are all zero get no invoice.
pub fn draft_tenant_invoices(
    result: &AllocationResult,
    settings: &DisplaySettings,
) -> Vec<TenantInvoiceDraft> {
    result
        .tenant_allocations
        .iter()
        .filter_map(|(tenant_id, allocation)| {
            let draft = draft_one(result.period, *tenant_id, allocation, settings);
            if draft.lines.is_empty() {
                tracing::debug!(tenant = %tenant_id, "no billable amount; skipping invoice");
                None
            } else {
                Some(draft)
            }
        })
        .collect()
}

fn draft_one(
    period: BillingPeriod,
    tenant_id: TenantId,
    allocation: &TenantAllocation,
    settings: &DisplaySettings,
) -> TenantInvoiceDraft {
    let lines: Vec<TenantInvoiceLine> = allocation
        .lines
        .iter()
        .filter_map(|(utility_type, line)| {
            let amount = round_money(line.amount, settings.scale);
            (!amount.is_zero()).then_some(TenantInvoiceLine {
                utility_type,
                percentage: line.percentage,
                amount,
            })
        })
        .collect();
    let mut total: Decimal = lines.iter().map(|l| l.amount).sum();
    total.rescale(settings.scale);

    TenantInvoiceDraft {
        invoice_number: invoice_number(period, tenant_id),
        tenant_id,
        tenant_name: allocation.name.clone(),
        period,
        service_start: period.first_day(),
        service_end: period.last_day(),
        currency: settings.currency.clone(),
        lines,
        total,
    }
}

/// Generate invoices from a finalized calculation and mark it
/// INVOICES_GENERATED.
///
/// # Errors
///
/// `CalculationError::InvalidTransition` unless the calculation is FINALIZED.
pub fn generate_tenant_invoices(
    calculation: &mut Calculation,
    settings: &DisplaySettings,
) -> Result<Vec<TenantInvoiceDraft>, CalculationError> {
    if calculation.state != CalculationState::Finalized {
        return Err(CalculationError::InvalidTransition {
            from: calculation.state,
            to: CalculationState::InvoicesGenerated,
        });
    }
    let invoices = draft_tenant_invoices(&calculation.result, settings);
    calculation.mark_invoices_generated(&format!("{} tenant invoices generated", invoices.len()))?;
    tracing::info!(
        period = %calculation.period,
        invoices = invoices.len(),
        "tenant invoices generated"
    );
    Ok(invoices)
}
