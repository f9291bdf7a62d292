//! # Tenant Allocation
//!
//! Splits each utility type's invoice total across tenants by their
//! configured percentage: `amount = total × percentage / 100`. Every tenant
//! gets a line for every utility type, including 0% shares and types with
//! no invoices, so a zero amount is always present rather than missing.

use std::collections::BTreeMap;

use apportion_core::{Decimal, Percentage, TenantId, UtilityMap};
use serde::{Deserialize, Serialize};

use crate::aggregate::InvoiceTotals;
use crate::records::TenantShares;

/// One `(percentage, amount)` pair for a single utility type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllocationLine {
    /// Share applied to the invoice total.
    pub percentage: Percentage,
    /// Resulting amount, unrounded.
    pub amount: Decimal,
}

impl AllocationLine {
    /// Apply `percentage` to `total`.
    pub fn of(total: Decimal, percentage: Percentage) -> Self {
        Self {
            percentage,
            amount: percentage.of(total),
        }
    }
}

/// A tenant's allocation across all utility types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantAllocation {
    /// Display name carried over from the input, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// One line per utility type.
    pub lines: UtilityMap<AllocationLine>,
    /// Sum of `lines[*].amount`.
    pub total: Decimal,
}

/// Allocate invoice totals to every tenant in `tenants`.
///
/// Tenant ids must be unique; the boundary layer guarantees it.
pub fn compute_tenant_allocation(
    totals: &InvoiceTotals,
    tenants: &[TenantShares],
) -> BTreeMap<TenantId, TenantAllocation> {
    tenants
        .iter()
        .map(|tenant| (tenant.tenant_id, allocate_one(totals, tenant)))
        .collect()
}

fn allocate_one(totals: &InvoiceTotals, tenant: &TenantShares) -> TenantAllocation {
    let lines = tenant
        .percentages
        .map(|utility, pct| AllocationLine::of(totals.total_for(utility), *pct));
    let total = lines.values().map(|line| line.amount).sum();
    TenantAllocation {
        name: tenant.name.clone(),
        lines,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apportion_core::UtilityType;
    use rust_decimal_macros::dec;

    fn pct(v: Decimal) -> Percentage {
        Percentage::new(v).unwrap()
    }

    fn totals() -> InvoiceTotals {
        [
            (UtilityType::Electricity, dec!(800)),
            (UtilityType::Water, dec!(200)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_amount_is_total_times_percentage() {
        let tenants = vec![
            TenantShares::new(TenantId(1))
                .with_share(UtilityType::Electricity, pct(dec!(40)))
                .with_share(UtilityType::Water, pct(dec!(50))),
            TenantShares::new(TenantId(2)).with_share(UtilityType::Electricity, pct(dec!(30))),
        ];
        let result = compute_tenant_allocation(&totals(), &tenants);

        let t1 = &result[&TenantId(1)];
        assert_eq!(t1.lines[UtilityType::Electricity].amount, dec!(320));
        assert_eq!(t1.lines[UtilityType::Water].amount, dec!(100));
        assert_eq!(t1.total, dec!(420));

        let t2 = &result[&TenantId(2)];
        assert_eq!(t2.lines[UtilityType::Electricity].amount, dec!(240));
        assert_eq!(t2.lines[UtilityType::Water].amount, dec!(0));
        assert_eq!(t2.total, dec!(240));
    }

    #[test]
    fn test_zero_configured_tenant_still_present() {
        let tenants = vec![TenantShares::new(TenantId(9))];
        let result = compute_tenant_allocation(&totals(), &tenants);
        let t = &result[&TenantId(9)];
        assert!(t.lines.values().all(|line| line.amount.is_zero()));
        assert_eq!(t.total, Decimal::ZERO);
    }

    #[test]
    fn test_missing_invoice_type_gives_zero_amount() {
        let tenants =
            vec![TenantShares::new(TenantId(1)).with_share(UtilityType::Gas, pct(dec!(60)))];
        let result = compute_tenant_allocation(&totals(), &tenants);
        let line = result[&TenantId(1)].lines[UtilityType::Gas];
        assert_eq!(line.percentage.value(), dec!(60));
        assert_eq!(line.amount, Decimal::ZERO);
    }

    #[test]
    fn test_name_carried_over() {
        let tenants = vec![TenantShares::new(TenantId(3)).with_name("Pharmacy")];
        let result = compute_tenant_allocation(&totals(), &tenants);
        assert_eq!(result[&TenantId(3)].name.as_deref(), Some("Pharmacy"));
    }

    #[test]
    fn test_fractional_split_is_exact() {
        let totals: InvoiceTotals = [(UtilityType::Internet, dec!(100))].into_iter().collect();
        let tenants = vec![
            TenantShares::new(TenantId(1)).with_share(UtilityType::Internet, pct(dec!(33.33))),
        ];
        let result = compute_tenant_allocation(&totals, &tenants);
        assert_eq!(result[&TenantId(1)].lines[UtilityType::Internet].amount, dec!(33.33));
    }
}
