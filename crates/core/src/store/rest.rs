use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::settings::{ChartSettings, SettingsCommit};
use super::traits::SettingsStore;

const STORE_NAME: &str = "RestSettings";

/// Settings store behind a JSON HTTP API.
///
/// - `GET  {base}/chart-settings/{scope}` → settings document (404 = none yet)
/// - `POST {base}/chart-settings/{scope}` ← flat commit payload
///
/// The response body is parsed leniently: unknown or malformed fields are
/// dropped rather than failing the read.
pub struct RestSettingsStore {
    client: Client,
    base_url: String,
}

impl RestSettingsStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint for `scope`. Scopes are portfolio/asset identifiers and
    /// must be URL-safe as-is.
    pub fn settings_url(&self, scope: &str) -> Result<String, CoreError> {
        validate_scope(scope)?;
        Ok(format!("{}/chart-settings/{scope}", self.base_url))
    }
}

#[async_trait]
impl SettingsStore for RestSettingsStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    async fn load(&self, scope: &str) -> Result<ChartSettings, CoreError> {
        let url = self.settings_url(scope)?;
        let resp = self.client.get(&url).send().await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(ChartSettings::default()),
            status if status.is_success() => {
                let body = resp.text().await?;
                if body.trim().is_empty() {
                    return Ok(ChartSettings::default());
                }
                ChartSettings::from_json(&body).map_err(|e| CoreError::Api {
                    store: STORE_NAME.into(),
                    message: format!("Failed to parse settings for '{scope}': {e}"),
                })
            }
            status => Err(CoreError::Api {
                store: STORE_NAME.into(),
                message: format!("GET settings for '{scope}' returned {status}"),
            }),
        }
    }

    async fn save(&self, scope: &str, commit: &SettingsCommit) -> Result<(), CoreError> {
        let url = self.settings_url(scope)?;
        let resp = self.client.post(&url).json(commit).send().await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(CoreError::Api {
                store: STORE_NAME.into(),
                message: format!("POST settings for '{scope}' returned {}", resp.status()),
            })
        }
    }
}

/// Scopes become a single path segment: ASCII alphanumerics plus `-`, `_`, `.`.
pub fn validate_scope(scope: &str) -> Result<(), CoreError> {
    let ok = !scope.is_empty()
        && scope != "."
        && scope != ".."
        && scope
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if ok {
        Ok(())
    } else {
        Err(CoreError::InvalidScope(scope.to_string()))
    }
}
