//! Location catalog with an on-disk offline cache
//!
//! Reports are filed against a catalog entry. The catalog lives on the
//! remote store; every successful fetch is mirrored to a JSON file under
//! the work directory so the picker still works while disconnected.

use shared::models::Location;
use shared::{AppError, AppResult};
use std::path::PathBuf;
use std::sync::Arc;

use crate::remote::RemoteStore;

#[derive(Clone)]
pub struct LocationCatalog {
    store: Arc<dyn RemoteStore>,
    cache_path: PathBuf,
}

impl LocationCatalog {
    pub fn new(store: Arc<dyn RemoteStore>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            cache_path: work_dir.into().join("locations.json"),
        }
    }

    /// Current catalog: fresh from the store when reachable, otherwise
    /// the last cached copy. With neither, the store error surfaces.
    pub async fn list(&self) -> AppResult<Vec<Location>> {
        match self.refresh().await {
            Ok(locations) => Ok(locations),
            Err(e) if e.is_retryable() => {
                tracing::debug!(error = %e, "catalog fetch failed, using cached copy");
                self.read_cache().await.map_err(|_| e)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch the catalog from the store and rewrite the cache.
    pub async fn refresh(&self) -> AppResult<Vec<Location>> {
        let locations = self.store.list_locations().await?;

        let json = serde_json::to_vec(&locations)?;
        if let Err(e) = tokio::fs::write(&self.cache_path, json).await {
            // A stale cache beats no catalog; keep going
            tracing::warn!(error = %e, path = %self.cache_path.display(), "failed to write location cache");
        }
        Ok(locations)
    }

    async fn read_cache(&self) -> AppResult<Vec<Location>> {
        let bytes = tokio::fs::read(&self.cache_path)
            .await
            .map_err(|e| AppError::storage(format!("location cache unavailable: {e}")))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
