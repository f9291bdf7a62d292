//! # apportion-calc — Utility Allocation Calculator
//!
//! Splits a period's supplier invoices across tenants by configured
//! percentage, assigns the remainder to the company, and reconciles the
//! general meter against individual meters.
//!
//! ## Operations
//!
//! - [`aggregate_invoice_totals()`] — Σ invoice amount per utility type.
//! - [`compute_tenant_allocation()`] — `total × percentage / 100` per tenant and type.
//! - [`compute_company_portion()`] — `max(0, 100 − Σ tenant%)` per type.
//! - [`compute_meter_reconciliation()`] — general vs. individual consumption.
//! - [`compute_allocation()`] — composition of the four above.
//!
//! All five are pure and synchronous. They never fail: missing data
//! degrades to zeros. Malformed input is rejected earlier, by
//! [`validate_request()`], which turns a raw [`AllocationRequest`] into a
//! typed [`AllocationInput`].
//!
//! ## Crate Policy
//!
//! - No I/O, no global state, no caches.
//! - Meter consumption never influences money amounts.
//! - Over-allocated types (Σ tenant% > 100) clamp the company share to 0%
//!   and are reported through [`AllocationResult::over_allocated()`].

pub mod aggregate;
pub mod allocation;
pub mod company;
pub mod error;
pub mod meter;
pub mod overrides;
pub mod records;
pub mod tenant;
pub mod validation;

pub use aggregate::{aggregate_invoice_totals, InvoiceTotals};
pub use allocation::{compute_allocation, AllocationResult};
pub use company::{compute_company_portion, OverAllocation};
pub use error::{CalcError, ValidationError};
pub use meter::{compute_meter_reconciliation, MeterReconciliation};
pub use overrides::PercentageOverrides;
pub use records::{MeterReadingRecord, TenantShares, UtilityInvoiceRecord};
pub use tenant::{compute_tenant_allocation, AllocationLine, TenantAllocation};
pub use validation::{validate_request, AllocationInput, AllocationRequest, ValidationPolicy};
