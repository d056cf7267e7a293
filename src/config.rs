//! Engine configuration.

use std::path::Path;

use anyhow::{Context, ensure};
use serde::Deserialize;

use crate::rate::RateConvention;

/// Hard ceiling on the configurable term. Matches the financing form limit.
pub const MAX_TERM_MONTHS: u32 = 600;

/// Limits and conventions applied by [`AmortizationEngine`](crate::AmortizationEngine).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Longest accepted term, in months.
    #[serde(default = "default_max_term_months")]
    pub max_term_months: u32,
    /// Decimal places of the currency minor unit (2 for cents).
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    #[serde(default)]
    pub rate_convention: RateConvention,
}

fn default_max_term_months() -> u32 {
    MAX_TERM_MONTHS
}

fn default_decimal_places() -> u32 {
    2
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_term_months: default_max_term_months(),
            decimal_places: default_decimal_places(),
            rate_convention: RateConvention::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or a value is out of range.
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(raw).context("failed to parse engine configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or [`Self::from_json_str`] fails.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read engine configuration from {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Checks the values are usable.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first offending value.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (1..=MAX_TERM_MONTHS).contains(&self.max_term_months),
            "max_term_months must be between 1 and {MAX_TERM_MONTHS}, got {}",
            self.max_term_months
        );
        ensure!(
            self.decimal_places <= 8,
            "decimal_places must be at most 8, got {}",
            self.decimal_places
        );
        Ok(())
    }
}
