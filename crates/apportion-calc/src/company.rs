//! # Company Portion
//!
//! Whatever share of a utility the active tenants do not cover is borne by
//! the company: `company% = max(0, 100 − Σ tenant%)`.
//!
//! ## Over-allocation
//!
//! When tenant shares for a type add up to more than 100%, the company
//! share is clamped to 0% instead of going negative or rejecting the
//! configuration. Tenant amounts are left untouched, so the per-type
//! amounts then sum to more than the invoice total. [`find_over_allocations()`]
//! reports those types so callers can surface them.

use std::collections::BTreeSet;

use apportion_core::{Decimal, Percentage, TenantId, UtilityMap, UtilityType};
use serde::{Deserialize, Serialize};

use crate::aggregate::InvoiceTotals;
use crate::records::TenantShares;
use crate::tenant::AllocationLine;

/// A utility type whose tenant percentages exceed 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverAllocation {
    /// The affected utility type.
    pub utility_type: UtilityType,
    /// Raw sum of tenant percentages for that type.
    pub tenant_pct_sum: Decimal,
}

/// Σ of tenant percentages per utility type, counting only tenants in
/// `active_tenants`.
pub fn tenant_percentage_sums(
    tenants: &[TenantShares],
    active_tenants: &BTreeSet<TenantId>,
) -> UtilityMap<Decimal> {
    let mut sums = UtilityMap::<Decimal>::default();
    for tenant in tenants
        .iter()
        .filter(|t| active_tenants.contains(&t.tenant_id))
    {
        for (utility, pct) in tenant.percentages.iter() {
            sums[utility] += pct.value();
        }
    }
    sums
}

/// The company's line per utility type.
pub fn compute_company_portion(
    totals: &InvoiceTotals,
    tenants: &[TenantShares],
    active_tenants: &BTreeSet<TenantId>,
) -> UtilityMap<AllocationLine> {
    tenant_percentage_sums(tenants, active_tenants).map(|utility, sum| {
        AllocationLine::of(totals.total_for(utility), Percentage::remainder_after(*sum))
    })
}

/// Utility types whose percentage sums exceed 100, in canonical order.
pub fn find_over_allocations(sums: &UtilityMap<Decimal>) -> Vec<OverAllocation> {
    sums.iter()
        .filter(|(_, sum)| **sum > Decimal::ONE_HUNDRED)
        .map(|(utility_type, sum)| OverAllocation {
            utility_type,
            tenant_pct_sum: *sum,
        })
        .collect()
}
