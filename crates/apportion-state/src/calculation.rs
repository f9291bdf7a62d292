//! # Calculation Lifecycle State Machine
//!
//! A `Calculation` is the persisted snapshot of one period's allocation.
//!
//! ## States
//!
//! ```text
//! Draft ──▶ Finalized ──▶ InvoicesGenerated
//!   │ ▲                      (terminal)
//!   └─┘ revise
//! ```
//!
//! A draft may be revised any number of times; each revision replaces the
//! result and recomputes the digest. Once finalized the snapshot can no
//! longer change. Finalization can be guarded by the digest the operator
//! reviewed, so a draft revised in the meantime is not finalized blindly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use apportion_calc::{AllocationResult, PercentageOverrides};
use apportion_core::{BillingPeriod, ContentDigest, CoreError};

// ─── Calculation State ───────────────────────────────────────────────

/// The lifecycle state of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationState {
    /// Editable; may be revised.
    Draft,
    /// Frozen; invoices may be generated.
    Finalized,
    /// Invoices were generated (terminal).
    InvoicesGenerated,
}

impl CalculationState {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::InvoicesGenerated)
    }

    /// Whether the snapshot may still change.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl std::fmt::Display for CalculationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Finalized => "FINALIZED",
            Self::InvoicesGenerated => "INVOICES_GENERATED",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from calculation lifecycle operations.
#[derive(Error, Debug)]
pub enum CalculationError {
    /// Attempted transition is not valid from the current state.
    #[error("invalid calculation transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: CalculationState,
        /// Attempted target state.
        to: CalculationState,
    },

    /// The snapshot can no longer be changed.
    #[error("calculation for {period} is {state} and can no longer be changed")]
    Immutable {
        /// Period of the calculation.
        period: BillingPeriod,
        /// Current state.
        state: CalculationState,
    },

    /// A revision carries a result for a different period.
    #[error("result for {found} cannot revise calculation for {expected}")]
    PeriodMismatch {
        /// Period of the calculation.
        expected: BillingPeriod,
        /// Period of the offered result.
        found: BillingPeriod,
    },

    /// The draft changed since the digest the caller reviewed.
    #[error("draft digest is {actual}, expected {expected}")]
    DigestMismatch {
        /// Digest the caller expected.
        expected: String,
        /// Digest of the current draft.
        actual: ContentDigest,
    },

    /// Digest computation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// ─── Transition Record ───────────────────────────────────────────────

/// Record of a lifecycle transition or draft revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationTransitionRecord {
    /// State before.
    pub from_state: CalculationState,
    /// State after. Equal to `from_state` for draft revisions.
    pub to_state: CalculationState,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
    /// Digest of the snapshot after the transition.
    pub digest: ContentDigest,
    /// Free-form note.
    pub reason: String,
}

// ─── Calculation ─────────────────────────────────────────────────────

/// A stored allocation snapshot with its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    /// Billing period; one calculation per period.
    pub period: BillingPeriod,
    /// Current lifecycle state.
    pub state: CalculationState,
    /// Overrides the result was computed with.
    pub overrides: PercentageOverrides,
    /// The allocation snapshot.
    pub result: AllocationResult,
    /// Digest of `result`.
    pub digest: ContentDigest,
    /// When the draft was created.
    pub created_at: DateTime<Utc>,
    /// Ordered log of revisions and transitions.
    pub transitions: Vec<CalculationTransitionRecord>,
}

impl Calculation {
    /// Create a draft from a computed result.
    pub fn new_draft(
        result: AllocationResult,
        overrides: PercentageOverrides,
    ) -> Result<Self, CalculationError> {
        let digest = result.digest()?;
        tracing::info!(period = %result.period, digest = %digest, "calculation draft created");
        Ok(Self {
            period: result.period,
            state: CalculationState::Draft,
            overrides,
            result,
            digest,
            created_at: Utc::now(),
            transitions: Vec::new(),
        })
    }

    /// Replace the draft's result (DRAFT → DRAFT).
    pub fn revise(
        &mut self,
        result: AllocationResult,
        overrides: PercentageOverrides,
        reason: &str,
    ) -> Result<(), CalculationError> {
        if !self.state.is_editable() {
            return Err(CalculationError::Immutable {
                period: self.period,
                state: self.state,
            });
        }
        if result.period != self.period {
            return Err(CalculationError::PeriodMismatch {
                expected: self.period,
                found: result.period,
            });
        }
        let digest = result.digest()?;
        self.result = result;
        self.overrides = overrides;
        self.digest = digest;
        self.record(CalculationState::Draft, reason);
        tracing::debug!(period = %self.period, digest = %self.digest, "calculation draft revised");
        Ok(())
    }

    /// Freeze the draft (DRAFT → FINALIZED).
    ///
    /// When `expected_digest` is given it must match the current draft.
    pub fn finalize(
        &mut self,
        expected_digest: Option<&str>,
        reason: &str,
    ) -> Result<(), CalculationError> {
        self.require_state(CalculationState::Draft, CalculationState::Finalized)?;
        if let Some(expected) = expected_digest {
            if !self.digest.matches_hex(expected) {
                return Err(CalculationError::DigestMismatch {
                    expected: expected.to_string(),
                    actual: self.digest,
                });
            }
        }
        self.record(CalculationState::Finalized, reason);
        tracing::info!(period = %self.period, digest = %self.digest, "calculation finalized");
        Ok(())
    }

    /// Mark invoices as generated (FINALIZED → INVOICES_GENERATED).
    pub fn mark_invoices_generated(&mut self, reason: &str) -> Result<(), CalculationError> {
        self.require_state(
            CalculationState::Finalized,
            CalculationState::InvoicesGenerated,
        )?;
        self.record(CalculationState::InvoicesGenerated, reason);
        Ok(())
    }

    /// Whether the snapshot is frozen.
    pub fn is_finalized(&self) -> bool {
        !self.state.is_editable()
    }

    fn require_state(
        &self,
        expected: CalculationState,
        target: CalculationState,
    ) -> Result<(), CalculationError> {
        if self.state != expected {
            return Err(CalculationError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }
        Ok(())
    }

    fn record(&mut self, to: CalculationState, reason: &str) {
        self.transitions.push(CalculationTransitionRecord {
            from_state: self.state,
            to_state: to,
            timestamp: Utc::now(),
            digest: self.digest,
            reason: reason.to_string(),
        });
        self.state = to;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
