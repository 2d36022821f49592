use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reserved display name of the aggregate portfolio column.
pub const PORTFOLIO_NAME: &str = "Portfolio";

/// A single observation of one entity (portfolio or asset) on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePoint {
    /// Observation date
    pub date: NaiveDate,

    /// Return-denominated figure (MWR-basis value or return-adjusted unit value)
    pub value: f64,

    /// Absolute position value in the account currency
    pub market_value: f64,

    /// Cumulative profit/loss up to this date
    pub pnl: f64,
}

impl TimePoint {
    pub fn new(date: NaiveDate, value: f64, market_value: f64, pnl: f64) -> Self {
        Self {
            date,
            value,
            market_value,
            pnl,
        }
    }

    /// A point is only usable when every field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.value.is_finite() && self.market_value.is_finite() && self.pnl.is_finite()
    }
}

/// Identifies one column of the aligned table.
///
/// The aggregate portfolio always uses the reserved `Portfolio` key so it
/// can never collide with an asset identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeriesKey {
    Portfolio,
    /// Asset identifier (usually an ISIN)
    Asset(String),
}

impl SeriesKey {
    pub fn asset(id: impl Into<String>) -> Self {
        SeriesKey::Asset(id.into())
    }

    pub fn is_portfolio(&self) -> bool {
        matches!(self, SeriesKey::Portfolio)
    }
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesKey::Portfolio => write!(f, "{PORTFOLIO_NAME}"),
            SeriesKey::Asset(id) => write!(f, "{id}"),
        }
    }
}

/// One entity's time series as delivered by the data-fetch collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub key: SeriesKey,

    /// Human-readable name (e.g., "iShares Core MSCI World")
    pub name: String,

    /// Explicit display color as `#rrggbb`, if the caller picked one
    #[serde(default)]
    pub color: Option<String>,

    /// Observations ordered by date
    pub points: Vec<TimePoint>,
}

impl Series {
    pub fn new(key: SeriesKey, name: impl Into<String>, points: Vec<TimePoint>) -> Self {
        Self {
            key,
            name: name.into(),
            color: None,
            points,
        }
    }

    /// Convenience constructor for an asset column.
    pub fn asset(id: impl Into<String>, name: impl Into<String>, points: Vec<TimePoint>) -> Self {
        Self::new(SeriesKey::asset(id), name, points)
    }

    /// Convenience constructor for the aggregate portfolio column.
    pub fn portfolio(points: Vec<TimePoint>) -> Self {
        Self::new(SeriesKey::Portfolio, PORTFOLIO_NAME, points)
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Everything fetched for one portfolio or asset selection.
///
/// Treated as read-only by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSource {
    #[serde(default)]
    pub portfolio_series: Vec<TimePoint>,

    #[serde(default)]
    pub asset_series_list: Vec<Series>,
}

impl SeriesSource {
    pub fn new(portfolio_series: Vec<TimePoint>, asset_series_list: Vec<Series>) -> Self {
        Self {
            portfolio_series,
            asset_series_list,
        }
    }

    /// Flatten into the aligner's input. The portfolio column comes first
    /// when requested and non-empty.
    pub fn series_list(&self, include_portfolio: bool) -> Vec<Series> {
        let mut list = Vec::with_capacity(self.asset_series_list.len() + 1);
        if include_portfolio && !self.portfolio_series.is_empty() {
            list.push(Series::portfolio(self.portfolio_series.clone()));
        }
        list.extend(self.asset_series_list.iter().cloned());
        list
    }

    pub fn is_empty(&self) -> bool {
        self.portfolio_series.is_empty() && self.asset_series_list.iter().all(Series::is_empty)
    }
}
