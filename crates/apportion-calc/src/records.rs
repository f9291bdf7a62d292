//! # Input Records
//!
//! Typed, already-validated records the calculator consumes. They are
//! produced by [`crate::validation::validate_request()`] or built directly
//! by callers that hold typed data. The calculator trusts them: records are
//! assumed to be scoped to one period, tenant ids are unique, and at most
//! one reading is flagged as the general meter.

use apportion_core::{
    BillingPeriod, Decimal, InvoiceId, MeterId, Percentage, ProviderId, ReadingId, TenantId,
    UtilityMap, UtilityType,
};
use serde::{Deserialize, Serialize};

/// A supplier invoice for one utility type in one period.
///
/// Several invoices may share a utility type (several providers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityInvoiceRecord {
    /// Invoice identifier.
    pub id: InvoiceId,
    /// Which utility bucket the amount belongs to.
    pub utility_type: UtilityType,
    /// Invoice amount. Not range-checked here; see `ValidationPolicy`.
    pub amount: Decimal,
    /// Billing period of the invoice.
    pub period: BillingPeriod,
    /// Supplier, when known.
    pub provider_id: Option<ProviderId>,
}

/// A meter reading with its upstream-computed consumption delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterReadingRecord {
    /// Reading identifier.
    pub id: ReadingId,
    /// The physical meter that was read.
    pub meter_id: MeterId,
    /// Whether this is the building's general (main) meter.
    pub is_general: bool,
    /// Current minus previous index. `None` means not yet computed and
    /// counts as zero.
    pub consumption: Option<Decimal>,
    /// Billing period of the reading.
    pub period: BillingPeriod,
}

impl MeterReadingRecord {
    /// Consumption with `None` treated as zero.
    pub fn consumption_or_zero(&self) -> Decimal {
        self.consumption.unwrap_or(Decimal::ZERO)
    }
}

/// An active tenant and its standing percentage share per utility type.
///
/// Types the tenant is not configured for hold 0%.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantShares {
    /// Tenant identifier.
    pub tenant_id: TenantId,
    /// Display name, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Share of each utility type's invoice total.
    #[serde(default)]
    pub percentages: UtilityMap<Percentage>,
}

impl TenantShares {
    /// A tenant with 0% for every utility type.
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            name: None,
            percentages: UtilityMap::default(),
        }
    }

    /// Builder-style setter for one utility type.
    pub fn with_share(mut self, utility: UtilityType, percentage: Percentage) -> Self {
        self.percentages.set(utility, percentage);
        self
    }

    /// Builder-style setter for the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
