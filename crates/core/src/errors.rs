use thiserror::Error;

/// Unified error type for the entire wealth-chart-core library.
///
/// The chart engine itself never fails on data problems (empty series,
/// degenerate ranges, malformed settings all degrade to defaults).
/// Errors only come out of the collaborator seams: the settings store,
/// JSON decoding and color parsing.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Settings store / Network ────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("Settings API error ({store}): {message}")]
    Api {
        store: String,
        message: String,
    },

    #[error("Settings store error: {0}")]
    SettingsStore(String),

    #[error("Invalid settings scope: {0}")]
    InvalidScope(String),

    // ── Rendering ───────────────────────────────────────────────────
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query parameters: settings URLs may carry auth tokens.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
