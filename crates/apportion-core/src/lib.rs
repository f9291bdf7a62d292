//! # apportion-core — Foundational Types
//!
//! Leaf crate of the apportionment workspace. Defines the primitives every
//! other crate builds on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Single `UtilityType` enum.** One closed definition, exhaustive
//!    `match` everywhere. `UtilityMap<T>` holds exactly one value per type,
//!    so tenant allocation and company portion iterate the same key set.
//!
//! 2. **Exact decimals.** Amounts and percentages are `rust_decimal::Decimal`.
//!    `Percentage` is range-checked at construction.
//!
//! 3. **Validated periods.** `BillingPeriod` cannot hold month 13.
//!
//! 4. **Canonical digests.** `sha256_digest()` accepts only
//!    `&CanonicalBytes`, so snapshot fingerprints are order-independent.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `apportion-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod money;
pub mod period;
pub mod utility;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest};
pub use error::{CanonicalizationError, CoreError};
pub use identity::{InvoiceId, MeterId, ProviderId, ReadingId, TenantId};
pub use money::{format_money, format_percentage, round_money, Percentage};
pub use period::BillingPeriod;
pub use utility::{UtilityMap, UtilityType, UTILITY_TYPE_COUNT};

/// Re-exported so downstream crates name one decimal type.
pub use rust_decimal::Decimal;
