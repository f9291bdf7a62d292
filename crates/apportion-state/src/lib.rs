//! # apportion-state — Calculation Lifecycle
//!
//! Persists what the calculator computes. A period's allocation moves
//! through a small state machine before tenant invoices are cut from it:
//!
//! - [`Calculation`] — DRAFT → FINALIZED → INVOICES_GENERATED, with
//!   digest-guarded finalization and a transition log.
//! - [`generate_tenant_invoices()`] — per-tenant invoice fan-out from a
//!   finalized calculation.
//!
//! ## Crate Policy
//!
//! - The calculator stays pure; all lifecycle rules live here.
//! - A finalized snapshot is never mutated.

pub mod calculation;
pub mod invoicing;

pub use calculation::{
    Calculation, CalculationError, CalculationState, CalculationTransitionRecord,
};
pub use invoicing::{
    draft_tenant_invoices, generate_tenant_invoices, invoice_number, DisplaySettings,
    TenantInvoiceDraft, TenantInvoiceLine,
};
