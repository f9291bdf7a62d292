//! # Configuration
//!
//! Optional YAML file passed with `--config`. Every section has defaults,
//! so an absent file and an empty file behave the same. Unknown keys are
//! rejected.
//!
//! ```yaml
//! validation:
//!   allow_negative_amounts: true
//!   enforce_period: true
//! display:
//!   currency: EUR
//!   scale: 2
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use apportion_calc::ValidationPolicy;
use apportion_state::DisplaySettings;

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApportionConfig {
    /// Boundary validation rules.
    pub validation: ValidationPolicy,
    /// Currency and rounding for human-facing output and invoices.
    pub display: DisplaySettings,
}

impl ApportionConfig {
    /// Load from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::debug!("no config file given; using defaults");
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Parse from YAML text. Blank text yields defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}
