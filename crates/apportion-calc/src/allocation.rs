//! # Allocation Result
//!
//! `compute_allocation()` composes the four calculator operations:
//!
//! ```text
//! invoices ──▶ aggregate_invoice_totals ──┬──▶ compute_tenant_allocation ──▶ tenant_allocations
//!                                          └──▶ compute_company_portion  ──▶ company_portion
//! tenants ─────────────────────────────────┘
//! readings ──▶ compute_meter_reconciliation ─────────────────────────────▶ meter_reconciliation
//! ```
//!
//! The computation is pure: no I/O, no shared state, no failure paths.
//! Missing data degrades to zeros. Results are keyed by utility type and
//! tenant id, never by input position, so permuting any input collection
//! yields a structurally equal result.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use apportion_core::{
    sha256_digest, BillingPeriod, CanonicalBytes, ContentDigest, CoreError, Decimal, TenantId,
    UtilityMap, UtilityType,
};
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate_invoice_totals, InvoiceTotals};
use crate::company::{
    compute_company_portion, find_over_allocations, tenant_percentage_sums, OverAllocation,
};
use crate::meter::{compute_meter_reconciliation, MeterReconciliation};
use crate::records::{MeterReadingRecord, TenantShares, UtilityInvoiceRecord};
use crate::tenant::{compute_tenant_allocation, AllocationLine, TenantAllocation};

/// The computed split of one period's utility costs.
///
/// Immutable once computed: a changed input produces a new result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// The billing period the inputs belong to.
    pub period: BillingPeriod,
    /// Invoice total per utility type present in the input.
    pub invoice_totals: InvoiceTotals,
    /// Per-tenant lines and totals, keyed by tenant id.
    pub tenant_allocations: BTreeMap<TenantId, TenantAllocation>,
    /// The company's remainder per utility type.
    pub company_portion: UtilityMap<AllocationLine>,
    /// General vs. individual meter consumption.
    pub meter_reconciliation: MeterReconciliation,
}

/// Compute the allocation for one period.
///
/// `tenants` must be the active tenants only. Ids should be unique; the
/// boundary layer rejects duplicates. When called directly with duplicate
/// ids, the last entry per id is used for the tenant lines and the company
/// share alike.
pub fn compute_allocation(
    period: BillingPeriod,
    invoices: &[UtilityInvoiceRecord],
    readings: &[MeterReadingRecord],
    tenants: &[TenantShares],
) -> AllocationResult {
    tracing::debug!(
        period = %period,
        invoices = invoices.len(),
        readings = readings.len(),
        tenants = tenants.len(),
        "computing utility allocation"
    );

    let tenants = unique_tenants(tenants);
    let tenants: &[TenantShares] = &tenants;
    let active: BTreeSet<TenantId> = tenants.iter().map(|t| t.tenant_id).collect();
    let invoice_totals = aggregate_invoice_totals(invoices);
    let tenant_allocations = compute_tenant_allocation(&invoice_totals, tenants);
    let company_portion = compute_company_portion(&invoice_totals, tenants, &active);
    let meter_reconciliation = compute_meter_reconciliation(readings);

    for over in find_over_allocations(&tenant_percentage_sums(tenants, &active)) {
        tracing::warn!(
            period = %period,
            utility_type = %over.utility_type,
            tenant_pct_sum = %over.tenant_pct_sum,
            "tenant percentages exceed 100%; company share clamped to 0%"
        );
    }

    AllocationResult {
        period,
        invoice_totals,
        tenant_allocations,
        company_portion,
        meter_reconciliation,
    }
}

fn unique_tenants(tenants: &[TenantShares]) -> Cow<'_, [TenantShares]> {
    let mut last: BTreeMap<TenantId, &TenantShares> = BTreeMap::new();
    for tenant in tenants {
        last.insert(tenant.tenant_id, tenant);
    }
    if last.len() == tenants.len() {
        return Cow::Borrowed(tenants);
    }
    tracing::warn!(
        tenants = tenants.len(),
        unique = last.len(),
        "duplicate tenant ids; keeping the last entry per id"
    );
    Cow::Owned(last.into_values().cloned().collect())
}

impl AllocationResult {
    /// The allocation for one tenant.
    pub fn tenant(&self, tenant_id: TenantId) -> Option<&TenantAllocation> {
        self.tenant_allocations.get(&tenant_id)
    }

    /// Σ of tenant amounts plus the company amount for `utility`.
    pub fn allocated_total(&self, utility: UtilityType) -> Decimal {
        let tenants: Decimal = self
            .tenant_allocations
            .values()
            .map(|t| t.lines[utility].amount)
            .sum();
        tenants + self.company_portion[utility].amount
    }

    /// Whether the allocated total for `utility` equals its invoice total.
    ///
    /// Holds whenever tenant percentages for the type sum to at most 100.
    pub fn is_conserved(&self, utility: UtilityType) -> bool {
        self.allocated_total(utility) == self.invoice_totals.total_for(utility)
    }

    /// Σ tenant percentages per utility type, as reflected in the result.
    pub fn tenant_percentage_sums(&self) -> UtilityMap<Decimal> {
        let mut sums = UtilityMap::<Decimal>::default();
        for allocation in self.tenant_allocations.values() {
            for (utility, line) in allocation.lines.iter() {
                sums[utility] += line.percentage.value();
            }
        }
        sums
    }

    /// Utility types whose tenant percentages exceed 100%. For these the
    /// company share was clamped and the amounts do not reconcile.
    pub fn over_allocated(&self) -> Vec<OverAllocation> {
        find_over_allocations(&self.tenant_percentage_sums())
    }

    /// Σ of all tenant totals.
    pub fn tenants_total(&self) -> Decimal {
        self.tenant_allocations.values().map(|t| t.total).sum()
    }

    /// Σ of all company amounts.
    pub fn company_total(&self) -> Decimal {
        self.company_portion.values().map(|line| line.amount).sum()
    }

    /// SHA-256 over the canonical JSON form of this result.
    pub fn digest(&self) -> Result<ContentDigest, CoreError> {
        let canonical = CanonicalBytes::new(self)?;
        Ok(sha256_digest(&canonical))
    }
}
