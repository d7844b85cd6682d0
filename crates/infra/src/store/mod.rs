//! Entity store boundary.
//!
//! Durable storage and retrieval of products, locations and movements, with
//! primary-key uniqueness and foreign-key validity enforced by the store. Two
//! backends share one async trait:
//! - [`InMemoryEntityStore`]: lock-guarded maps, for tests/dev
//! - [`SqliteEntityStore`]: SQLite through sqlx, one transaction per operation

use std::sync::Arc;

use thiserror::Error;

use stockroom_core::{DomainError, LocationId, MovementId, ProductId};
use stockroom_locations::{EditLocation, Location};
use stockroom_movements::{EditMovement, Movement};
use stockroom_products::{EditProduct, Product};

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryEntityStore;
pub use sqlite::SqliteEntityStore;

/// Result type for store and service operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Entity store operation error.
///
/// Domain rejections (duplicate key, missing row, dangling reference) pass
/// through unchanged in `Domain`. Everything else is an infrastructure failure
/// and is never retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error in {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("corrupt {table} row: {message}")]
    CorruptRow { table: &'static str, message: String },

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn database(operation: &'static str, source: sqlx::Error) -> Self {
        Self::Database { operation, source }
    }
}

/// Every record in the store, read at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub products: Vec<Product>,
    pub locations: Vec<Location>,
    pub movements: Vec<Movement>,
}

/// Storage for the three record types.
///
/// Implementations must:
/// - reject creates whose id already exists (`DuplicateKey`)
/// - reject edits of ids that do not exist (`NotFound`)
/// - reject movements whose product or locations do not exist (`InvalidReference`)
/// - leave stored state unchanged when an operation fails
///
/// Lists are ordered by id (products, locations) and by (timestamp, id)
/// (movements).
#[async_trait::async_trait]
pub trait EntityStore: Send + Sync {
    async fn create_product(&self, product: Product) -> StoreResult<Product>;
    async fn get_product(&self, id: &ProductId) -> StoreResult<Option<Product>>;
    async fn update_product(&self, id: &ProductId, edit: EditProduct) -> StoreResult<Product>;
    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    async fn create_location(&self, location: Location) -> StoreResult<Location>;
    async fn get_location(&self, id: &LocationId) -> StoreResult<Option<Location>>;
    async fn update_location(&self, id: &LocationId, edit: EditLocation) -> StoreResult<Location>;
    async fn list_locations(&self) -> StoreResult<Vec<Location>>;

    async fn create_movement(&self, movement: Movement) -> StoreResult<Movement>;
    async fn get_movement(&self, id: &MovementId) -> StoreResult<Option<Movement>>;
    async fn update_movement(&self, id: &MovementId, edit: EditMovement) -> StoreResult<Movement>;
    async fn list_movements(&self) -> StoreResult<Vec<Movement>>;

    /// Consistent read of all three tables.
    async fn snapshot(&self) -> StoreResult<Snapshot>;
}

#[async_trait::async_trait]
impl<S> EntityStore for Arc<S>
where
    S: EntityStore + ?Sized,
{
    async fn create_product(&self, product: Product) -> StoreResult<Product> {
        (**self).create_product(product).await
    }

    async fn get_product(&self, id: &ProductId) -> StoreResult<Option<Product>> {
        (**self).get_product(id).await
    }

    async fn update_product(&self, id: &ProductId, edit: EditProduct) -> StoreResult<Product> {
        (**self).update_product(id, edit).await
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        (**self).list_products().await
    }

    async fn create_location(&self, location: Location) -> StoreResult<Location> {
        (**self).create_location(location).await
    }

    async fn get_location(&self, id: &LocationId) -> StoreResult<Option<Location>> {
        (**self).get_location(id).await
    }

    async fn update_location(&self, id: &LocationId, edit: EditLocation) -> StoreResult<Location> {
        (**self).update_location(id, edit).await
    }

    async fn list_locations(&self) -> StoreResult<Vec<Location>> {
        (**self).list_locations().await
    }

    async fn create_movement(&self, movement: Movement) -> StoreResult<Movement> {
        (**self).create_movement(movement).await
    }

    async fn get_movement(&self, id: &MovementId) -> StoreResult<Option<Movement>> {
        (**self).get_movement(id).await
    }

    async fn update_movement(&self, id: &MovementId, edit: EditMovement) -> StoreResult<Movement> {
        (**self).update_movement(id, edit).await
    }

    async fn list_movements(&self) -> StoreResult<Vec<Movement>> {
        (**self).list_movements().await
    }

    async fn snapshot(&self) -> StoreResult<Snapshot> {
        (**self).snapshot().await
    }
}

/// Sort key shared by both backends for movement listings.
pub(crate) fn sort_movements(movements: &mut [Movement]) {
    movements.sort_by(|a, b| {
        a.timestamp()
            .cmp(&b.timestamp())
            .then_with(|| a.movement_id().cmp(b.movement_id()))
    });
}
