//! Store selection and service construction.

use std::sync::Arc;

use stockroom_infra::{
    EntityStore, InMemoryEntityStore, InventoryService, SqliteEntityStore, StoreResult,
};

use crate::config::DatabaseConfig;

/// Inventory service over a type-erased store, shared by all handlers.
pub type AppService = InventoryService<Arc<dyn EntityStore>>;

/// Open the configured store: in-memory for `memory`, SQLite otherwise.
pub async fn build_service(database: &DatabaseConfig) -> StoreResult<AppService> {
    let store: Arc<dyn EntityStore> = if database.is_memory() {
        tracing::warn!("using in-memory store; data is lost on shutdown");
        Arc::new(InMemoryEntityStore::new())
    } else {
        Arc::new(SqliteEntityStore::connect(&database.url).await?)
    };
    Ok(InventoryService::new(store))
}

/// In-memory service (tests/dev).
pub fn in_memory_service() -> AppService {
    InventoryService::new(Arc::new(InMemoryEntityStore::new()))
}
