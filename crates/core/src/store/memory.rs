use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::errors::CoreError;
use crate::models::settings::{ChartSettings, SettingsCommit};
use super::traits::SettingsStore;

/// Settings store kept in process memory.
///
/// Used by offline hosts and tests. Commits are merged into the stored
/// document the same way the REST API upserts them.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    documents: Mutex<HashMap<String, ChartSettings>>,
    writes: Mutex<Vec<(String, SettingsCommit)>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a scope (e.g., settings written by an older client).
    pub fn with_settings(scope: impl Into<String>, settings: ChartSettings) -> Self {
        let mut documents = HashMap::new();
        documents.insert(scope.into(), settings);
        Self {
            documents: Mutex::new(documents),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Every commit received so far, oldest first.
    pub async fn writes(&self) -> Vec<(String, SettingsCommit)> {
        self.writes.lock().await.clone()
    }

    pub async fn write_count(&self) -> usize {
        self.writes.lock().await.len()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    fn name(&self) -> &str {
        "InMemory"
    }

    async fn load(&self, scope: &str) -> Result<ChartSettings, CoreError> {
        Ok(self
            .documents
            .lock()
            .await
            .get(scope)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, scope: &str, commit: &SettingsCommit) -> Result<(), CoreError> {
        self.documents
            .lock()
            .await
            .entry(scope.to_string())
            .or_default()
            .apply(commit);
        self.writes
            .lock()
            .await
            .push((scope.to_string(), commit.clone()));
        Ok(())
    }
}
