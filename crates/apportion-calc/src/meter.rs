//! # Meter Reconciliation
//!
//! Compares the general meter against the sum of individual tenant meters
//! for the period. The figure is informational: it is displayed next to
//! the money split but never feeds into it. Monetary allocation is driven
//! by configured percentages only.

use apportion_core::Decimal;
use serde::{Deserialize, Serialize};

use crate::records::MeterReadingRecord;

/// General-meter vs. tenant-meter consumption for one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterReconciliation {
    /// Consumption on the general meter; zero when there is none.
    pub general_consumption: Decimal,
    /// Σ consumption over individual (non-general) meters.
    pub tenant_consumption_sum: Decimal,
    /// `general − tenants`. Negative when tenants report more than the
    /// general meter measured.
    pub difference: Decimal,
    /// `difference / general × 100`, or zero when general ≤ 0.
    pub unallocated_percent: Decimal,
}

/// Reconcile the general meter against individual meters.
///
/// Null consumption counts as zero. With no general reading everything
/// reports as zero. Figures outside the range of `Decimal` saturate at
/// `Decimal::MAX` / `Decimal::MIN`; validated input never gets there.
pub fn compute_meter_reconciliation(readings: &[MeterReadingRecord]) -> MeterReconciliation {
    let mut general_consumption = Decimal::ZERO;
    let mut tenant_consumption_sum = Decimal::ZERO;
    let mut has_general = false;

    // More than one general reading is rejected upstream; summing keeps the
    // result order-independent regardless.
    for reading in readings {
        if reading.is_general {
            has_general = true;
            general_consumption =
                general_consumption.saturating_add(reading.consumption_or_zero());
        } else {
            tenant_consumption_sum =
                tenant_consumption_sum.saturating_add(reading.consumption_or_zero());
        }
    }

    if !has_general {
        return MeterReconciliation::default();
    }

    let difference = general_consumption.saturating_sub(tenant_consumption_sum);
    let unallocated_percent = if general_consumption > Decimal::ZERO {
        difference
            .checked_div(general_consumption)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or_else(|| {
                tracing::warn!(
                    general = %general_consumption,
                    difference = %difference,
                    "unallocated consumption percentage out of range; saturating"
                );
                if difference.is_sign_negative() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                }
            })
    } else {
        Decimal::ZERO
    };

    MeterReconciliation {
        general_consumption,
        tenant_consumption_sum,
        difference,
        unallocated_percent,
    }
}
