use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{
    DomainError, DomainResult, Entity, EntityKind, LocationId, MovementId, ProductId, Quantity,
};

/// Ledger record: Movement.
///
/// `qty` is a positive magnitude for every movement recorded or edited here;
/// rows restored from storage may carry other values. Direction is encoded by
/// which of `from_location` / `to_location` is set:
/// - only `to_location`: external inflow (stock enters the system)
/// - only `from_location`: external outflow (stock leaves the system)
/// - both: transfer between two locations (the same location on both sides
///   nets to zero)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    movement_id: MovementId,
    timestamp: DateTime<Utc>,
    from_location: Option<LocationId>,
    to_location: Option<LocationId>,
    product_id: ProductId,
    qty: Quantity,
}

impl Movement {
    /// Build a movement from a create request.
    ///
    /// `now` is used when the request carries no timestamp.
    pub fn record(cmd: RecordMovement, now: DateTime<Utc>) -> DomainResult<Self> {
        ensure_route(cmd.from_location.as_ref(), cmd.to_location.as_ref())?;
        Ok(Self {
            movement_id: cmd.movement_id,
            timestamp: cmd.timestamp.unwrap_or(now),
            from_location: cmd.from_location,
            to_location: cmd.to_location,
            product_id: cmd.product_id,
            qty: cmd.qty,
        })
    }

    /// Rehydrate a movement from storage.
    ///
    /// Route checks are skipped so rows written before they existed still load;
    /// such rows simply have no stock effect.
    pub fn restore(
        movement_id: MovementId,
        timestamp: DateTime<Utc>,
        from_location: Option<LocationId>,
        to_location: Option<LocationId>,
        product_id: ProductId,
        qty: Quantity,
    ) -> Self {
        Self {
            movement_id,
            timestamp,
            from_location,
            to_location,
            product_id,
            qty,
        }
    }

    pub fn movement_id(&self) -> &MovementId {
        &self.movement_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn from_location(&self) -> Option<&LocationId> {
        self.from_location.as_ref()
    }

    pub fn to_location(&self) -> Option<&LocationId> {
        self.to_location.as_ref()
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn qty(&self) -> Quantity {
        self.qty
    }

    /// Apply an edit. Every field except the id is replaced; the timestamp is
    /// kept unless the edit supplies one.
    ///
    /// On error the movement is left untouched.
    pub fn apply_edit(&mut self, edit: EditMovement) -> DomainResult<()> {
        ensure_route(edit.from_location.as_ref(), edit.to_location.as_ref())?;
        self.from_location = edit.from_location;
        self.to_location = edit.to_location;
        self.product_id = edit.product_id;
        self.qty = edit.qty;
        if let Some(ts) = edit.timestamp {
            self.timestamp = ts;
        }
        Ok(())
    }
}

impl Entity for Movement {
    type Id = MovementId;

    const KIND: EntityKind = EntityKind::Movement;

    fn id(&self) -> &Self::Id {
        &self.movement_id
    }
}

/// A movement must name at least one location.
fn ensure_route(from: Option<&LocationId>, to: Option<&LocationId>) -> DomainResult<()> {
    match (from, to) {
        (None, None) => Err(DomainError::invalid_movement(
            "a movement needs a source location, a destination location, or both",
        )),
        _ => Ok(()),
    }
}

/// Parse an optional location reference from boundary input.
///
/// Blank text means "no location" (an unselected form field).
pub fn parse_location(value: Option<&str>) -> DomainResult<Option<LocationId>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => LocationId::new(s).map(Some),
    }
}

/// Command: RecordMovement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMovement {
    pub movement_id: MovementId,
    pub from_location: Option<LocationId>,
    pub to_location: Option<LocationId>,
    pub product_id: ProductId,
    pub qty: Quantity,
    pub timestamp: Option<DateTime<Utc>>,
}

impl RecordMovement {
    /// Validate raw boundary input. A missing id gets a generated one.
    pub fn parse(
        movement_id: Option<&str>,
        from_location: Option<&str>,
        to_location: Option<&str>,
        product_id: &str,
        qty: Quantity,
        timestamp: Option<DateTime<Utc>>,
    ) -> DomainResult<Self> {
        let movement_id = match movement_id.map(str::trim) {
            None | Some("") => MovementId::generate(),
            Some(id) => MovementId::new(id)?,
        };
        let from_location = parse_location(from_location)?;
        let to_location = parse_location(to_location)?;
        ensure_route(from_location.as_ref(), to_location.as_ref())?;

        Ok(Self {
            movement_id,
            from_location,
            to_location,
            product_id: ProductId::new(product_id)?,
            qty,
            timestamp,
        })
    }
}

/// Command: EditMovement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditMovement {
    pub from_location: Option<LocationId>,
    pub to_location: Option<LocationId>,
    pub product_id: ProductId,
    pub qty: Quantity,
    pub timestamp: Option<DateTime<Utc>>,
}

impl EditMovement {
    pub fn parse(
        from_location: Option<&str>,
        to_location: Option<&str>,
        product_id: &str,
        qty: Quantity,
        timestamp: Option<DateTime<Utc>>,
    ) -> DomainResult<Self> {
        let from_location = parse_location(from_location)?;
        let to_location = parse_location(to_location)?;
        ensure_route(from_location.as_ref(), to_location.as_ref())?;

        Ok(Self {
            from_location,
            to_location,
            product_id: ProductId::new(product_id)?,
            qty,
            timestamp,
        })
    }
}
