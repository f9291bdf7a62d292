//! # Percentage Overrides
//!
//! A calculation can adjust individual tenant shares without touching the
//! standing configuration. Applying overrides returns a fresh tenant list;
//! the input is never mutated.

use std::collections::BTreeMap;

use apportion_core::{Percentage, TenantId, UtilityType};
use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::records::TenantShares;

/// Per-calculation percentage overrides: tenant → utility type → share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentageOverrides(BTreeMap<TenantId, BTreeMap<UtilityType, Percentage>>);

impl PercentageOverrides {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override one tenant/type share. A later call for the same pair wins.
    pub fn set(&mut self, tenant_id: TenantId, utility: UtilityType, percentage: Percentage) {
        self.0.entry(tenant_id).or_default().insert(utility, percentage);
    }

    /// The override for a tenant/type pair, if any.
    pub fn get(&self, tenant_id: TenantId, utility: UtilityType) -> Option<Percentage> {
        self.0.get(&tenant_id)?.get(&utility).copied()
    }

    /// True if nothing is overridden.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }

    /// Number of overridden tenant/type pairs.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    /// Return `tenants` with overrides applied.
    ///
    /// # Errors
    ///
    /// `CalcError::UnknownOverrideTenant` if an override names a tenant not
    /// present in `tenants`.
    pub fn apply(&self, tenants: &[TenantShares]) -> Result<Vec<TenantShares>, CalcError> {
        if let Some(unknown) = self
            .0
            .keys()
            .find(|id| !tenants.iter().any(|t| t.tenant_id == **id))
        {
            return Err(CalcError::UnknownOverrideTenant { tenant_id: *unknown });
        }

        Ok(tenants
            .iter()
            .map(|tenant| {
                let mut adjusted = tenant.clone();
                if let Some(shares) = self.0.get(&tenant.tenant_id) {
                    for (utility, pct) in shares {
                        adjusted.percentages.set(*utility, *pct);
                    }
                }
                adjusted
            })
            .collect())
    }
}
