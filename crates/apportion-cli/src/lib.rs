//! # apportion-cli — Command-Line Front End
//!
//! Provides the `apportion` binary. Each subcommand reads one allocation
//! request JSON file:
//!
//! ```bash
//! apportion validate --input march.json
//! apportion compute --input march.json --format table
//! apportion reconcile --input march.json
//! apportion invoices --input march.json --expect-digest sha256:...
//! ```
//!
//! Handlers return the process exit code: 0 on success, 2 when
//! `validate` finds the request invalid. Any `Err` exits 1.

pub mod compute;
pub mod config;
pub mod input;
pub mod invoices;
pub mod reconcile;
pub mod render;
pub mod validate;

pub use config::ApportionConfig;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_modules_are_accessible() {
        let _ = std::any::type_name::<compute::ComputeArgs>();
        let _ = std::any::type_name::<invoices::InvoicesArgs>();
        let _ = std::any::type_name::<reconcile::ReconcileArgs>();
        let _ = std::any::type_name::<validate::ValidateArgs>();
        let _ = std::any::type_name::<render::OutputFormat>();
    }
}
