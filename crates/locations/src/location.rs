use serde::{Deserialize, Serialize};

use stockroom_core::{DomainResult, Entity, EntityKind, LocationId, Name};

/// Catalog record: Location (warehouse, shelf, store, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    location_id: LocationId,
    name: Name,
}

impl Location {
    pub fn create(cmd: CreateLocation) -> Self {
        Self {
            location_id: cmd.location_id,
            name: cmd.name,
        }
    }

    /// Rehydrate a location from already-validated storage fields.
    pub fn restore(location_id: LocationId, name: Name) -> Self {
        Self { location_id, name }
    }

    pub fn location_id(&self) -> &LocationId {
        &self.location_id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn apply_edit(&mut self, edit: EditLocation) {
        self.name = edit.name;
    }
}

impl Entity for Location {
    type Id = LocationId;

    const KIND: EntityKind = EntityKind::Location;

    fn id(&self) -> &Self::Id {
        &self.location_id
    }
}

/// Command: CreateLocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLocation {
    pub location_id: LocationId,
    pub name: Name,
}

impl CreateLocation {
    pub fn parse(location_id: &str, name: &str) -> DomainResult<Self> {
        Ok(Self {
            location_id: LocationId::new(location_id)?,
            name: Name::new(name)?,
        })
    }
}

/// Command: EditLocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditLocation {
    pub name: Name,
}

impl EditLocation {
    pub fn parse(name: &str) -> DomainResult<Self> {
        Ok(Self {
            name: Name::new(name)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::DomainError;

    #[test]
    fn create_location_keeps_fields() {
        let location = Location::create(CreateLocation::parse("WH-1", "North warehouse").unwrap());
        assert_eq!(location.location_id().as_str(), "WH-1");
        assert_eq!(location.name().as_str(), "North warehouse");
    }

    #[test]
    fn create_location_rejects_empty_name() {
        assert!(matches!(
            CreateLocation::parse("WH-1", ""),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn edit_only_changes_name() {
        let mut location = Location::create(CreateLocation::parse("WH-1", "North").unwrap());
        location.apply_edit(EditLocation::parse("South").unwrap());
        assert_eq!(location.location_id().as_str(), "WH-1");
        assert_eq!(location.name().as_str(), "South");
    }
}
