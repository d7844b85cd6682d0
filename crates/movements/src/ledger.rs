//! Ledger semantics: how a movement changes stock levels.
//!
//! Stock levels are never materialized. A movement contributes at most two
//! signed effects to the (product, location) matrix:
//! - `from_location` set: `-qty` at (product, from)
//! - `to_location` set: `+qty` at (product, to)
//!
//! Effects are plain additive deltas, so applying a set of movements in any order
//! gives the same balances.

use serde::{Deserialize, Serialize};

use stockroom_core::{LocationId, ProductId};

use crate::movement::Movement;

/// One signed change to a single (product, location) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEffect {
    pub product_id: ProductId,
    pub location_id: LocationId,
    pub delta: i64,
}

/// Presentation classification of a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Stock enters the tracked system (destination only).
    Inflow,
    /// Stock leaves the tracked system (source only).
    Outflow,
    /// Stock relocates between two tracked locations.
    Transfer,
    /// Neither side set. Only reachable through legacy rows; has no effect.
    Void,
}

impl MovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Inflow => "inflow",
            MovementKind::Outflow => "outflow",
            MovementKind::Transfer => "transfer",
            MovementKind::Void => "void",
        }
    }
}

impl Movement {
    pub fn kind(&self) -> MovementKind {
        match (self.from_location(), self.to_location()) {
            (None, Some(_)) => MovementKind::Inflow,
            (Some(_), None) => MovementKind::Outflow,
            (Some(_), Some(_)) => MovementKind::Transfer,
            (None, None) => MovementKind::Void,
        }
    }

    /// Signed stock effects of this movement (zero, one or two).
    pub fn effects(&self) -> impl Iterator<Item = StockEffect> + '_ {
        let qty = self.qty().get();
        let outflow = self.from_location().map(|from| StockEffect {
            product_id: self.product_id().clone(),
            location_id: from.clone(),
            delta: -qty,
        });
        let inflow = self.to_location().map(|to| StockEffect {
            product_id: self.product_id().clone(),
            location_id: to.clone(),
            delta: qty,
        });
        [outflow, inflow].into_iter().flatten()
    }
}
