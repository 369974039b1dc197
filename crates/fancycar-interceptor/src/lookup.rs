//! Generation lookup against the persistent generation registry.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::task;
use tracing::{debug, error};

use fancycar_storage::{GenerationStore, OLD_GENERATION};

/// Whether a client belongs to the old car generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    /// Old-generation car: its payloads must be rewritten.
    Legacy,
    /// Current-generation car: payloads pass through unchanged.
    Current,
    /// The registry had no record for this client, or could not be reached.
    /// The two causes are logged but deliberately not distinguished here.
    Unknown,
}

/// Source of generation records.
///
/// The redb-backed [`GenerationStore`] is the production implementation;
/// tests inject doubles to simulate outages and slow stores.
#[async_trait]
pub trait GenerationSource: Send + Sync {
    /// Fetch the generation flag for a client, or `None` when no record
    /// exists.
    async fn fetch_generation(&self, client_id: &str) -> Result<Option<i64>>;
}

#[async_trait]
impl GenerationSource for GenerationStore {
    async fn fetch_generation(&self, client_id: &str) -> Result<Option<i64>> {
        let store = self.clone();
        let client_id = client_id.to_owned();
        // redb reads are synchronous; keep them off the async workers.
        let generation = task::spawn_blocking(move || store.generation(&client_id)).await??;
        Ok(generation)
    }
}

/// Looks up generation status for a client, collapsing every failure mode to
/// [`GenerationStatus::Unknown`]. Never returns an error.
#[derive(Clone)]
pub struct GenerationLookup {
    source: Arc<dyn GenerationSource>,
}

impl GenerationLookup {
    pub fn new(source: Arc<dyn GenerationSource>) -> Self {
        Self { source }
    }

    /// Query the registry for `client_id`.
    ///
    /// Every call queries freshly; no caching, since generation assignment
    /// may change at any time and stale answers are not tolerated.
    pub async fn check_generation(&self, client_id: &str) -> GenerationStatus {
        debug!("Executing registry query to find if the client is of the old type.");

        match self.source.fetch_generation(client_id).await {
            Ok(Some(generation)) if generation == OLD_GENERATION => GenerationStatus::Legacy,
            Ok(Some(_)) => GenerationStatus::Current,
            Ok(None) => {
                debug!("No generation record for client {}", client_id);
                GenerationStatus::Unknown
            }
            Err(e) => {
                error!("Generation registry query failed: {:#}", e);
                GenerationStatus::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(Option<i64>);

    #[async_trait]
    impl GenerationSource for FixedSource {
        async fn fetch_generation(&self, _client_id: &str) -> Result<Option<i64>> {
            Ok(self.0)
        }
    }

    struct FailingSource;

    #[async_trait]
    impl GenerationSource for FailingSource {
        async fn fetch_generation(&self, _client_id: &str) -> Result<Option<i64>> {
            anyhow::bail!("registry unreachable")
        }
    }

    #[tokio::test]
    async fn test_old_generation_flag_is_legacy() {
        let lookup = GenerationLookup::new(Arc::new(FixedSource(Some(1))));
        assert_eq!(
            lookup.check_generation("car-1").await,
            GenerationStatus::Legacy
        );
    }

    #[tokio::test]
    async fn test_other_flags_are_current() {
        let lookup = GenerationLookup::new(Arc::new(FixedSource(Some(2))));
        assert_eq!(
            lookup.check_generation("car-1").await,
            GenerationStatus::Current
        );

        let lookup = GenerationLookup::new(Arc::new(FixedSource(Some(0))));
        assert_eq!(
            lookup.check_generation("car-1").await,
            GenerationStatus::Current
        );
    }

    #[tokio::test]
    async fn test_missing_record_is_unknown() {
        let lookup = GenerationLookup::new(Arc::new(FixedSource(None)));
        assert_eq!(
            lookup.check_generation("car-1").await,
            GenerationStatus::Unknown
        );
    }

    #[tokio::test]
    async fn test_failing_source_is_unknown() {
        let lookup = GenerationLookup::new(Arc::new(FailingSource));
        assert_eq!(
            lookup.check_generation("car-1").await,
            GenerationStatus::Unknown
        );
    }

    #[tokio::test]
    async fn test_store_backed_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let store = GenerationStore::open(dir.path().join("generation.redb")).unwrap();
        store.set_generation("old-car", OLD_GENERATION).unwrap();
        store.set_generation("new-car", 2).unwrap();

        let lookup = GenerationLookup::new(Arc::new(store));
        assert_eq!(
            lookup.check_generation("old-car").await,
            GenerationStatus::Legacy
        );
        assert_eq!(
            lookup.check_generation("new-car").await,
            GenerationStatus::Current
        );
        assert_eq!(
            lookup.check_generation("missing-car").await,
            GenerationStatus::Unknown
        );
    }
}
