use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Engine tuning knobs. Every field has a default, so a partial JSON
/// object (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Approximate number of major ticks per axis
    pub target_tick_count: usize,

    /// Fraction of the data span added above and below when seeding value ranges
    pub value_padding_ratio: f64,

    /// Quiet period before a settled viewport change is committed
    pub commit_quiet_period_ms: u64,

    /// Window returns at or beyond this magnitude (in %) are emphasized
    pub significant_variation_pct: f64,

    /// HSL lightness floor (0..1) applied to palette colors
    pub min_lightness: f64,

    /// Base URL of the REST settings store, if one is used
    pub settings_base_url: Option<String>,
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Replace unusable values with defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.target_tick_count == 0 {
            self.target_tick_count = defaults.target_tick_count;
        }
        if !self.value_padding_ratio.is_finite() || self.value_padding_ratio < 0.0 {
            self.value_padding_ratio = defaults.value_padding_ratio;
        }
        if !self.significant_variation_pct.is_finite() {
            self.significant_variation_pct = defaults.significant_variation_pct;
        }
        if !(0.0..=1.0).contains(&self.min_lightness) {
            self.min_lightness = defaults.min_lightness;
        }
        self
    }

    pub fn commit_quiet_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.commit_quiet_period_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_tick_count: 8,
            value_padding_ratio: 0.1,
            commit_quiet_period_ms: 1000,
            significant_variation_pct: 5.0,
            min_lightness: 0.35,
            settings_base_url: None,
        }
    }
}
