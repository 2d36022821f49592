use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Performance of one entity over the currently selected date window.
///
/// Ephemeral: recomputed whenever the window or the data changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStats {
    /// pnl(end) - pnl(start)
    pub period_pnl: f64,

    /// Modified Dietz approximation in percent, or the backend MWR when the
    /// window starts at the beginning of history
    pub period_return_pct: f64,

    /// Market value on the window's last row
    pub end_market_value: f64,

    pub window_start_date: NaiveDate,

    pub window_end_date: NaiveDate,

    /// True when the window spans the whole table (life-of-account stats)
    pub is_full_range: bool,
}

impl WindowStats {
    /// Classify the window's return against the significant-variation threshold.
    pub fn emphasis(&self, threshold_pct: f64) -> VariationEmphasis {
        VariationEmphasis::classify(self.period_return_pct, threshold_pct)
    }
}

/// Emphasis coloring hint for a return figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariationEmphasis {
    Gain,
    Loss,
    Neutral,
}

impl VariationEmphasis {
    pub fn classify(return_pct: f64, threshold_pct: f64) -> Self {
        let threshold = threshold_pct.abs();
        if return_pct >= threshold {
            VariationEmphasis::Gain
        } else if return_pct <= -threshold {
            VariationEmphasis::Loss
        } else {
            VariationEmphasis::Neutral
        }
    }
}
