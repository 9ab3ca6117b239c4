use std::sync::Arc;
use std::time::Duration;

use crate::cache::CachedStore;
use crate::storage::JsonlFactStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CachedStore<JsonlFactStore>>,
    /// Deadline applied to every strategy query
    pub query_timeout: Duration,
}
