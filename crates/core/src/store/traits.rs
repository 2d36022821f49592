use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::settings::{ChartSettings, SettingsCommit};

/// Trait abstraction for the external chart-settings store.
///
/// Settings are an opaque per-scope document (one scope per portfolio or
/// asset). The engine reads it once per dataset load and writes debounced
/// commits back; it never depends on which backend sits behind the trait.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Human-readable name of this store (for logs/errors).
    fn name(&self) -> &str;

    /// Read the settings for `scope`. A scope never written before yields
    /// `ChartSettings::default()`.
    async fn load(&self, scope: &str) -> Result<ChartSettings, CoreError>;

    /// Upsert a commit for `scope`.
    async fn save(&self, scope: &str, commit: &SettingsCommit) -> Result<(), CoreError>;
}
