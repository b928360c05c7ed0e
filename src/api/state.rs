use std::sync::Arc;
use std::time::Duration;

use crate::store::{CatalogStore, EngagementStore, LedgerStore, MemoryStore, ProfileStore};

/// Shared application state: store handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub engagement: Arc<dyn EngagementStore>,
    pub ledger: Arc<dyn LedgerStore>,
    /// Deadline for one personalized-recommendation request
    pub recommend_deadline: Duration,
}

impl AppState {
    /// Wires all four store seams to one shared in-memory store
    pub fn in_memory(recommend_deadline: Duration) -> Self {
        let store = MemoryStore::new();
        Self {
            profiles: Arc::new(store.clone()),
            catalog: Arc::new(store.clone()),
            engagement: Arc::new(store.clone()),
            ledger: Arc::new(store),
            recommend_deadline,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory(Duration::from_secs(10))
    }
}
