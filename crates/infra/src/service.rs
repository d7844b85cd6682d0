//! Inventory service: the operations exposed to outer layers.
//!
//! Composes an [`EntityStore`] with the domain constructors and the balance
//! computation. It contains no IO itself; persistence goes through the store.
//!
//! ```text
//! Request DTO
//!   ↓ parse (CreateProduct / RecordMovement / ...)
//! validated command
//!   ↓ InventoryService
//! EntityStore (uniqueness + references, atomic)
//!   ↓
//! stored record / BalanceReport
//! ```

use chrono::Utc;
use tracing::{info, instrument, warn};

use stockroom_core::{LocationId, MovementId, ProductId};
use stockroom_locations::{CreateLocation, EditLocation, Location};
use stockroom_movements::{EditMovement, Movement, RecordMovement};
use stockroom_products::{CreateProduct, EditProduct, Product};
use stockroom_reports::{BalanceReport, compute_balance};

use crate::store::{EntityStore, StoreResult};

/// Inventory operations over any entity store.
#[derive(Debug, Clone)]
pub struct InventoryService<S> {
    store: S,
}

impl<S> InventoryService<S>
where
    S: EntityStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[instrument(skip_all, fields(product_id = %cmd.product_id))]
    pub async fn add_product(&self, cmd: CreateProduct) -> StoreResult<Product> {
        let product = self
            .store
            .create_product(Product::create(cmd))
            .await
            .inspect_err(|e| warn!(error = %e, "add_product rejected"))?;
        info!("product added");
        Ok(product)
    }

    #[instrument(skip(self, edit))]
    pub async fn edit_product(&self, product_id: &ProductId, edit: EditProduct) -> StoreResult<Product> {
        let product = self
            .store
            .update_product(product_id, edit)
            .await
            .inspect_err(|e| warn!(error = %e, "edit_product rejected"))?;
        info!("product edited");
        Ok(product)
    }

    pub async fn get_product(&self, product_id: &ProductId) -> StoreResult<Option<Product>> {
        self.store.get_product(product_id).await
    }

    pub async fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.store.list_products().await
    }

    #[instrument(skip_all, fields(location_id = %cmd.location_id))]
    pub async fn add_location(&self, cmd: CreateLocation) -> StoreResult<Location> {
        let location = self
            .store
            .create_location(Location::create(cmd))
            .await
            .inspect_err(|e| warn!(error = %e, "add_location rejected"))?;
        info!("location added");
        Ok(location)
    }

    #[instrument(skip(self, edit))]
    pub async fn edit_location(
        &self,
        location_id: &LocationId,
        edit: EditLocation,
    ) -> StoreResult<Location> {
        let location = self
            .store
            .update_location(location_id, edit)
            .await
            .inspect_err(|e| warn!(error = %e, "edit_location rejected"))?;
        info!("location edited");
        Ok(location)
    }

    pub async fn get_location(&self, location_id: &LocationId) -> StoreResult<Option<Location>> {
        self.store.get_location(location_id).await
    }

    pub async fn list_locations(&self) -> StoreResult<Vec<Location>> {
        self.store.list_locations().await
    }

    /// Record a movement. The timestamp defaults to the current time.
    #[instrument(skip_all, fields(movement_id = %cmd.movement_id, product_id = %cmd.product_id))]
    pub async fn add_movement(&self, cmd: RecordMovement) -> StoreResult<Movement> {
        let movement = Movement::record(cmd, Utc::now())
            .inspect_err(|e| warn!(error = %e, "add_movement rejected"))?;
        let movement = self
            .store
            .create_movement(movement)
            .await
            .inspect_err(|e| warn!(error = %e, "add_movement rejected"))?;
        info!(kind = movement.kind().as_str(), qty = movement.qty().get(), "movement recorded");
        Ok(movement)
    }

    /// Replace a movement's fields. Its effect on balances is replaced, not added.
    #[instrument(skip(self, edit))]
    pub async fn edit_movement(
        &self,
        movement_id: &MovementId,
        edit: EditMovement,
    ) -> StoreResult<Movement> {
        let movement = self
            .store
            .update_movement(movement_id, edit)
            .await
            .inspect_err(|e| warn!(error = %e, "edit_movement rejected"))?;
        info!(kind = movement.kind().as_str(), "movement edited");
        Ok(movement)
    }

    pub async fn get_movement(&self, movement_id: &MovementId) -> StoreResult<Option<Movement>> {
        self.store.get_movement(movement_id).await
    }

    pub async fn list_movements(&self) -> StoreResult<Vec<Movement>> {
        self.store.list_movements().await
    }

    /// Balance report over one consistent snapshot of the store.
    #[instrument(skip(self))]
    pub async fn report(&self) -> StoreResult<BalanceReport> {
        let snapshot = self.store.snapshot().await?;
        let movement_count = snapshot.movements.len();
        let report = compute_balance(snapshot.products, snapshot.locations, &snapshot.movements)
            .inspect_err(|e| warn!(error = %e, "balance computation failed"))?;
        info!(
            products = report.products().len(),
            locations = report.locations().len(),
            movements = movement_count,
            "balance report computed"
        );
        Ok(report)
    }
}
