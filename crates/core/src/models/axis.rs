use serde::{Deserialize, Serialize};

/// Tick grid for one value axis.
///
/// Derived data: recomputed from the active value range on every render,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickPlan {
    /// Distance between major ticks (always > 0)
    pub major_step: f64,

    /// Major tick positions, ascending, inside the planned range
    pub major_ticks: Vec<f64>,

    /// Half-step ticks that do not coincide with a major tick
    pub minor_ticks: Vec<f64>,
}

impl TickPlan {
    pub fn minor_step(&self) -> f64 {
        self.major_step / 2.0
    }
}

/// Which side of the chart an axis (or a series bound to it) lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisSide {
    /// Left axis: percentage return, or asset values in Absolute mode
    Primary,
    /// Right axis: aggregate portfolio value in Absolute mode
    Secondary,
}

/// Tick plans for both axes of one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisPlans {
    pub primary: TickPlan,

    /// Only planned in Absolute mode
    pub secondary: Option<TickPlan>,
}
