//! # Calculator Errors
//!
//! `ValidationError` is raised by the boundary check before any aggregation
//! begins. Each variant names the offending field or entity and the raw
//! value, so an upstream form can point at the exact input.
//!
//! `CalcError` wraps everything `AllocationInput::compute()` can fail with.

use apportion_core::{BillingPeriod, CoreError, InvoiceId, ReadingId, TenantId};
use thiserror::Error;

/// Malformed input rejected before computation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Period year/month absent, non-integer, or out of range.
    #[error("missing or invalid period field `{field}`: {value}")]
    MissingPeriod {
        /// Path of the offending field, e.g. `period.month`.
        field: String,
        /// Raw value as received, or `<absent>`.
        value: String,
    },

    /// Invoice amount non-numeric, too large, or negative under a policy
    /// that forbids negatives.
    #[error("invalid amount {value} on {invoice_id}: {reason}")]
    InvalidAmount {
        /// The invoice carrying the amount.
        invoice_id: InvoiceId,
        /// Raw value as received.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Percentage non-numeric or outside [0, 100].
    #[error("invalid percentage {value} for {tenant_id} / {utility_type}")]
    InvalidPercentage {
        /// The tenant carrying the percentage.
        tenant_id: TenantId,
        /// Utility type string as received.
        utility_type: String,
        /// Raw value as received.
        value: String,
    },

    /// Utility type outside the closed set.
    #[error("unknown utility type {value:?} on {entity}")]
    UnknownUtilityType {
        /// Entity carrying the type, e.g. `invoice:4` or `tenant:2`.
        entity: String,
        /// Raw type string.
        value: String,
    },

    /// Non-null consumption that is not a usable number.
    #[error("invalid consumption {value} on {reading_id}: {reason}")]
    InvalidConsumption {
        /// The reading carrying the value.
        reading_id: ReadingId,
        /// Raw value as received.
        value: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A record's period differs from the request period.
    #[error("{entity} belongs to period {found}, expected {expected}")]
    PeriodMismatch {
        /// Entity carrying the period.
        entity: String,
        /// The request period.
        expected: BillingPeriod,
        /// The record's period label.
        found: String,
    },

    /// The same tenant id appears more than once.
    #[error("duplicate tenant {tenant_id}")]
    DuplicateTenant {
        /// The repeated id.
        tenant_id: TenantId,
    },

    /// A tenant configures the same utility type more than once.
    #[error("{tenant_id} configures {utility_type} more than once")]
    DuplicateTenantUtility {
        /// The tenant.
        tenant_id: TenantId,
        /// The repeated utility type.
        utility_type: String,
    },

    /// More than one reading is flagged as the general meter.
    #[error("multiple general meter readings: {first} and {second}")]
    MultipleGeneralMeters {
        /// First general reading seen.
        first: ReadingId,
        /// Second general reading seen.
        second: ReadingId,
    },
}

/// Errors from resolving and computing an allocation.
#[derive(Error, Debug)]
pub enum CalcError {
    /// Input failed boundary validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An override names a tenant that is not in the active set.
    #[error("percentage override for {tenant_id}, which is not an active tenant")]
    UnknownOverrideTenant {
        /// The unknown tenant.
        tenant_id: TenantId,
    },

    /// Foundational type error (digest, canonicalization).
    #[error(transparent)]
    Core(#[from] CoreError),
}
