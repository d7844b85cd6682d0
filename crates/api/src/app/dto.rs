use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use stockroom_core::{DomainResult, Quantity};
use stockroom_locations::{CreateLocation, EditLocation, Location};
use stockroom_movements::{EditMovement, Movement, RecordMovement};
use stockroom_products::{CreateProduct, EditProduct, Product};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub product_id: String,
    pub name: String,
    pub description: Option<String>,
}

impl CreateProductRequest {
    pub fn into_command(self) -> DomainResult<CreateProduct> {
        CreateProduct::parse(&self.product_id, &self.name, self.description)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: Option<String>,
}

impl UpdateProductRequest {
    pub fn into_command(self) -> DomainResult<EditProduct> {
        EditProduct::parse(&self.name, self.description)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    pub location_id: String,
    pub name: String,
}

impl CreateLocationRequest {
    pub fn into_command(self) -> DomainResult<CreateLocation> {
        CreateLocation::parse(&self.location_id, &self.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub name: String,
}

impl UpdateLocationRequest {
    pub fn into_command(self) -> DomainResult<EditLocation> {
        EditLocation::parse(&self.name)
    }
}

/// Quantity as sent by clients: a JSON number or a numeric string (form input).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QtyInput {
    Number(i64),
    Text(String),
}

impl QtyInput {
    pub fn into_quantity(self) -> DomainResult<Quantity> {
        match self {
            QtyInput::Number(n) => Quantity::new(n),
            QtyInput::Text(s) => Quantity::parse(&s),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMovementRequest {
    pub movement_id: Option<String>,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub product_id: String,
    pub qty: QtyInput,
    pub timestamp: Option<DateTime<Utc>>,
}

impl CreateMovementRequest {
    pub fn into_command(self) -> DomainResult<RecordMovement> {
        let qty = self.qty.into_quantity()?;
        RecordMovement::parse(
            self.movement_id.as_deref(),
            self.from_location.as_deref(),
            self.to_location.as_deref(),
            &self.product_id,
            qty,
            self.timestamp,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateMovementRequest {
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub product_id: String,
    pub qty: QtyInput,
    pub timestamp: Option<DateTime<Utc>>,
}

impl UpdateMovementRequest {
    pub fn into_command(self) -> DomainResult<EditMovement> {
        let qty = self.qty.into_quantity()?;
        EditMovement::parse(
            self.from_location.as_deref(),
            self.to_location.as_deref(),
            &self.product_id,
            qty,
            self.timestamp,
        )
    }
}

// -------------------------
// Response mapping
// -------------------------

pub fn product_to_json(p: &Product) -> serde_json::Value {
    json!({
        "product_id": p.product_id().as_str(),
        "name": p.name().as_str(),
        "description": p.description(),
    })
}

pub fn location_to_json(l: &Location) -> serde_json::Value {
    json!({
        "location_id": l.location_id().as_str(),
        "name": l.name().as_str(),
    })
}

pub fn movement_to_json(m: &Movement) -> serde_json::Value {
    json!({
        "movement_id": m.movement_id().as_str(),
        "timestamp": m.timestamp().to_rfc3339(),
        "from_location": m.from_location().map(|l| l.as_str()),
        "to_location": m.to_location().map(|l| l.as_str()),
        "product_id": m.product_id().as_str(),
        "qty": m.qty().get(),
        "kind": m.kind().as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::DomainError;

    #[test]
    fn qty_accepts_number_or_numeric_string() {
        let n: QtyInput = serde_json::from_value(json!(5)).unwrap();
        let s: QtyInput = serde_json::from_value(json!(" 7 ")).unwrap();

        assert_eq!(n.into_quantity().unwrap().get(), 5);
        assert_eq!(s.into_quantity().unwrap().get(), 7);
    }

    #[test]
    fn non_numeric_qty_is_invalid_quantity() {
        let q: QtyInput = serde_json::from_value(json!("ten")).unwrap();
        assert!(matches!(q.into_quantity(), Err(DomainError::InvalidQuantity(_))));

        let q: QtyInput = serde_json::from_value(json!(0)).unwrap();
        assert!(matches!(q.into_quantity(), Err(DomainError::InvalidQuantity(_))));
    }

    #[test]
    fn blank_locations_are_absent() {
        let req: CreateMovementRequest = serde_json::from_value(json!({
            "movement_id": "M1",
            "from_location": "  ",
            "to_location": "X",
            "product_id": "A",
            "qty": "3",
        }))
        .unwrap();

        let cmd = req.into_command().unwrap();
        assert_eq!(cmd.from_location, None);
        assert_eq!(cmd.to_location.as_ref().map(|l| l.as_str()), Some("X"));
    }

    #[test]
    fn movement_json_includes_kind() {
        let req: CreateMovementRequest = serde_json::from_value(json!({
            "movement_id": "M1",
            "from_location": "X",
            "to_location": "Y",
            "product_id": "A",
            "qty": 2,
            "timestamp": "2024-01-01T00:00:00Z",
        }))
        .unwrap();
        let movement = Movement::record(req.into_command().unwrap(), Utc::now()).unwrap();

        let json = movement_to_json(&movement);
        assert_eq!(json["kind"], "transfer");
        assert_eq!(json["qty"], 2);
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00+00:00");
    }
}
