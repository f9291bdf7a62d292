//! # Invoice Aggregation
//!
//! Sums supplier invoice amounts per utility type. Decimal addition is exact,
//! so the result does not depend on the order of the input records.

use std::collections::BTreeMap;

use apportion_core::{Decimal, UtilityType};
use serde::{Deserialize, Serialize};

use crate::records::UtilityInvoiceRecord;

/// Invoice total per utility type.
///
/// Types with no invoices are absent; [`InvoiceTotals::total_for()`] reports
/// them as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceTotals(BTreeMap<UtilityType, Decimal>);

impl InvoiceTotals {
    /// The summed amount, or `None` if no invoice of that type was seen.
    pub fn get(&self, utility: UtilityType) -> Option<Decimal> {
        self.0.get(&utility).copied()
    }

    /// The summed amount, zero when absent.
    pub fn total_for(&self, utility: UtilityType) -> Decimal {
        self.get(utility).unwrap_or(Decimal::ZERO)
    }

    /// Sum across all utility types.
    pub fn grand_total(&self) -> Decimal {
        self.0.values().copied().sum()
    }

    /// Iterate present `(type, total)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (UtilityType, Decimal)> + '_ {
        self.0.iter().map(|(u, d)| (*u, *d))
    }

    /// Number of utility types with at least one invoice.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no invoices were aggregated.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(UtilityType, Decimal)> for InvoiceTotals {
    fn from_iter<I: IntoIterator<Item = (UtilityType, Decimal)>>(iter: I) -> Self {
        let mut totals = BTreeMap::new();
        for (utility, amount) in iter {
            *totals.entry(utility).or_insert(Decimal::ZERO) += amount;
        }
        Self(totals)
    }
}

/// Sum invoice amounts per utility type.
///
/// Zero and negative amounts pass through unchanged.
pub fn aggregate_invoice_totals(invoices: &[UtilityInvoiceRecord]) -> InvoiceTotals {
    invoices
        .iter()
        .map(|invoice| (invoice.utility_type, invoice.amount))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use apportion_core::{BillingPeriod, InvoiceId};
    use rust_decimal_macros::dec;

    fn invoice(id: u64, utility: UtilityType, amount: Decimal) -> UtilityInvoiceRecord {
        UtilityInvoiceRecord {
            id: InvoiceId(id),
            utility_type: utility,
            amount,
            period: BillingPeriod::new(2024, 3).unwrap(),
            provider_id: None,
        }
    }

    #[test]
    fn test_sums_per_type() {
        let totals = aggregate_invoice_totals(&[
            invoice(1, UtilityType::Electricity, dec!(500)),
            invoice(2, UtilityType::Electricity, dec!(300)),
            invoice(3, UtilityType::Water, dec!(120.40)),
        ]);
        assert_eq!(totals.get(UtilityType::Electricity), Some(dec!(800)));
        assert_eq!(totals.get(UtilityType::Water), Some(dec!(120.40)));
        assert_eq!(totals.len(), 2);
        assert_eq!(totals.grand_total(), dec!(920.40));
    }

    #[test]
    fn test_missing_types_absent_but_zero() {
        let totals = aggregate_invoice_totals(&[invoice(1, UtilityType::Gas, dec!(10))]);
        assert_eq!(totals.get(UtilityType::Internet), None);
        assert_eq!(totals.total_for(UtilityType::Internet), Decimal::ZERO);
    }

    #[test]
    fn test_empty_input() {
        let totals = aggregate_invoice_totals(&[]);
        assert!(totals.is_empty());
        assert_eq!(totals.grand_total(), Decimal::ZERO);
    }

    #[test]
    fn test_zero_and_negative_pass_through() {
        let totals = aggregate_invoice_totals(&[
            invoice(1, UtilityType::Other, dec!(0)),
            invoice(2, UtilityType::Gas, dec!(100)),
            invoice(3, UtilityType::Gas, dec!(-25)),
        ]);
        assert_eq!(totals.get(UtilityType::Other), Some(dec!(0)));
        assert_eq!(totals.get(UtilityType::Gas), Some(dec!(75)));
    }

    #[test]
    fn test_serializes_as_map() {
        let totals = aggregate_invoice_totals(&[invoice(1, UtilityType::Water, dec!(5))]);
        let json = serde_json::to_value(&totals).unwrap();
        assert_eq!(json, serde_json::json!({"water": "5"}));
    }
}
