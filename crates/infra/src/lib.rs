//! Infrastructure layer: entity storage backends and the inventory service.

pub mod service;
pub mod store;


pub use service::InventoryService;
pub use store::{
    EntityStore, InMemoryEntityStore, Snapshot, SqliteEntityStore, StoreError, StoreResult,
};
