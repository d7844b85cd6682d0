use std::collections::BTreeMap;
use std::sync::RwLock;

use stockroom_core::{
    DomainError, DomainResult, Entity, EntityKind, LocationId, MovementId, ProductId,
};
use stockroom_locations::{EditLocation, Location};
use stockroom_movements::{EditMovement, Movement};
use stockroom_products::{EditProduct, Product};

use super::{EntityStore, Snapshot, StoreError, StoreResult, sort_movements};

#[derive(Debug, Default)]
struct Tables {
    products: BTreeMap<ProductId, Product>,
    locations: BTreeMap<LocationId, Location>,
    movements: BTreeMap<MovementId, Movement>,
}

impl Tables {
    /// Foreign-key check for a movement's product and locations.
    fn check_references(
        &self,
        product_id: &ProductId,
        from: Option<&LocationId>,
        to: Option<&LocationId>,
    ) -> DomainResult<()> {
        if !self.products.contains_key(product_id) {
            return Err(DomainError::invalid_reference(EntityKind::Product, product_id.as_str()));
        }
        for location_id in from.into_iter().chain(to) {
            if !self.locations.contains_key(location_id) {
                return Err(DomainError::invalid_reference(
                    EntityKind::Location,
                    location_id.as_str(),
                ));
            }
        }
        Ok(())
    }

    fn sorted_movements(&self) -> Vec<Movement> {
        let mut movements: Vec<_> = self.movements.values().cloned().collect();
        sort_movements(&mut movements);
        movements
    }
}

/// Insert a record whose id must not exist yet.
fn insert_new<E>(table: &mut BTreeMap<E::Id, E>, record: E) -> DomainResult<E>
where
    E: Entity + Clone,
{
    if table.contains_key(record.id()) {
        return Err(DomainError::duplicate_key(E::KIND, record.id().to_string()));
    }
    table.insert(record.id().clone(), record.clone());
    Ok(record)
}

/// Look up a record for editing.
fn existing_mut<'a, E>(table: &'a mut BTreeMap<E::Id, E>, id: &E::Id) -> DomainResult<&'a mut E>
where
    E: Entity,
{
    table
        .get_mut(id)
        .ok_or_else(|| DomainError::not_found(E::KIND, id.to_string()))
}

/// In-memory entity store.
///
/// Intended for tests/dev. One lock scope per operation, so every operation is
/// atomic and `snapshot` is consistent.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    tables: RwLock<Tables>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> DomainResult<T>) -> StoreResult<T> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&tables)?)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> DomainResult<T>) -> StoreResult<T> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&mut tables)?)
    }
}

#[async_trait::async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn create_product(&self, product: Product) -> StoreResult<Product> {
        self.write(|t| insert_new(&mut t.products, product))
    }

    async fn get_product(&self, id: &ProductId) -> StoreResult<Option<Product>> {
        self.read(|t| Ok(t.products.get(id).cloned()))
    }

    async fn update_product(&self, id: &ProductId, edit: EditProduct) -> StoreResult<Product> {
        self.write(|t| {
            let product = existing_mut(&mut t.products, id)?;
            product.apply_edit(edit);
            Ok(product.clone())
        })
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.read(|t| Ok(t.products.values().cloned().collect()))
    }

    async fn create_location(&self, location: Location) -> StoreResult<Location> {
        self.write(|t| insert_new(&mut t.locations, location))
    }

    async fn get_location(&self, id: &LocationId) -> StoreResult<Option<Location>> {
        self.read(|t| Ok(t.locations.get(id).cloned()))
    }

    async fn update_location(&self, id: &LocationId, edit: EditLocation) -> StoreResult<Location> {
        self.write(|t| {
            let location = existing_mut(&mut t.locations, id)?;
            location.apply_edit(edit);
            Ok(location.clone())
        })
    }

    async fn list_locations(&self) -> StoreResult<Vec<Location>> {
        self.read(|t| Ok(t.locations.values().cloned().collect()))
    }

    async fn create_movement(&self, movement: Movement) -> StoreResult<Movement> {
        self.write(|t| {
            if t.movements.contains_key(movement.movement_id()) {
                return Err(DomainError::duplicate_key(
                    EntityKind::Movement,
                    movement.movement_id().as_str(),
                ));
            }
            t.check_references(
                movement.product_id(),
                movement.from_location(),
                movement.to_location(),
            )?;
            insert_new(&mut t.movements, movement)
        })
    }

    async fn get_movement(&self, id: &MovementId) -> StoreResult<Option<Movement>> {
        self.read(|t| Ok(t.movements.get(id).cloned()))
    }

    async fn update_movement(&self, id: &MovementId, edit: EditMovement) -> StoreResult<Movement> {
        self.write(|t| {
            if !t.movements.contains_key(id) {
                return Err(DomainError::not_found(EntityKind::Movement, id.as_str()));
            }
            t.check_references(
                &edit.product_id,
                edit.from_location.as_ref(),
                edit.to_location.as_ref(),
            )?;
            let movement = existing_mut(&mut t.movements, id)?;
            movement.apply_edit(edit)?;
            Ok(movement.clone())
        })
    }

    async fn list_movements(&self) -> StoreResult<Vec<Movement>> {
        self.read(|t| Ok(t.sorted_movements()))
    }

    async fn snapshot(&self) -> StoreResult<Snapshot> {
        self.read(|t| {
            Ok(Snapshot {
                products: t.products.values().cloned().collect(),
                locations: t.locations.values().cloned().collect(),
                movements: t.sorted_movements(),
            })
        })
    }
}
