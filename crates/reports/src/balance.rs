//! Balance report: on-hand quantity for every product at every location.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, EntityKind, LocationId, ProductId};
use stockroom_locations::Location;
use stockroom_movements::Movement;
use stockroom_products::Product;

/// Dense product × location quantity matrix.
///
/// Every (product, location) pair from the snapshot has a cell, including pairs
/// no movement ever touched (those are `0`). `products` and `locations` keep the
/// order they were supplied in, for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    products: Vec<Product>,
    locations: Vec<Location>,
    balance: BTreeMap<ProductId, BTreeMap<LocationId, i64>>,
}

impl BalanceReport {
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Quantity of `product_id` at `location_id`, or `None` for an unknown pair.
    pub fn quantity(&self, product_id: &ProductId, location_id: &LocationId) -> Option<i64> {
        self.balance.get(product_id)?.get(location_id).copied()
    }

    /// One product's cells, in location presentation order.
    pub fn row(&self, product_id: &ProductId) -> Option<Vec<(&Location, i64)>> {
        let cells = self.balance.get(product_id)?;
        Some(
            self.locations
                .iter()
                .map(|l| (l, cells.get(l.location_id()).copied().unwrap_or(0)))
                .collect(),
        )
    }

    /// Net quantity of a product summed across all tracked locations.
    ///
    /// Transfers cancel out, so this equals total inflow minus total outflow.
    pub fn product_total(&self, product_id: &ProductId) -> Option<i64> {
        self.balance.get(product_id).map(|cells| cells.values().sum())
    }

    /// Raw matrix keyed by product id, then location id.
    pub fn matrix(&self) -> &BTreeMap<ProductId, BTreeMap<LocationId, i64>> {
        &self.balance
    }

    pub fn is_empty(&self) -> bool {
        self.balance.values().all(BTreeMap::is_empty)
    }
}

/// Compute the balance report from a consistent snapshot.
///
/// 1. Seed a zero cell for every product × location pair.
/// 2. Fold each movement's stock effects into the matching cells.
///
/// A movement naming a product or location outside the snapshot is an integrity
/// fault and fails with `InvalidReference`; the matrix never grows. Summation is
/// order-independent, so the result does not depend on movement order.
pub fn compute_balance(
    products: Vec<Product>,
    locations: Vec<Location>,
    movements: &[Movement],
) -> DomainResult<BalanceReport> {
    let mut balance: BTreeMap<ProductId, BTreeMap<LocationId, i64>> = products
        .iter()
        .map(|p| {
            let cells = locations
                .iter()
                .map(|l| (l.location_id().clone(), 0i64))
                .collect();
            (p.product_id().clone(), cells)
        })
        .collect();

    for movement in movements {
        for effect in movement.effects() {
            let cells = balance.get_mut(&effect.product_id).ok_or_else(|| {
                DomainError::invalid_reference(EntityKind::Product, effect.product_id.as_str())
            })?;
            let cell = match cells.get_mut(&effect.location_id) {
                Some(cell) => cell,
                // An empty location list leaves every row empty; report the
                // location as the missing side.
                None => {
                    return Err(DomainError::invalid_reference(
                        EntityKind::Location,
                        effect.location_id.as_str(),
                    ));
                }
            };
            *cell = cell.checked_add(effect.delta).ok_or_else(|| {
                DomainError::invariant(format!(
                    "balance overflow for {} at {}",
                    effect.product_id, effect.location_id
                ))
            })?;
        }
    }

    Ok(BalanceReport {
        products,
        locations,
        balance,
    })
}
