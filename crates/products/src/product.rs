use serde::{Deserialize, Serialize};

use stockroom_core::value_object::normalize_text;
use stockroom_core::{DomainResult, Entity, EntityKind, Name, ProductId};

/// Catalog record: Product.
///
/// The id is fixed at creation; only name and description change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    product_id: ProductId,
    name: Name,
    description: Option<String>,
}

impl Product {
    /// Build a product from a validated create request.
    pub fn create(cmd: CreateProduct) -> Self {
        Self {
            product_id: cmd.product_id,
            name: cmd.name,
            description: cmd.description,
        }
    }

    /// Rehydrate a product from already-validated storage fields.
    pub fn restore(product_id: ProductId, name: Name, description: Option<String>) -> Self {
        Self {
            product_id,
            name,
            description: normalize_text(description),
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Apply an edit. Replaces name and description; the id never changes.
    pub fn apply_edit(&mut self, edit: EditProduct) {
        self.name = edit.name;
        self.description = edit.description;
    }
}

impl Entity for Product {
    type Id = ProductId;

    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> &Self::Id {
        &self.product_id
    }
}

/// Command: CreateProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub product_id: ProductId,
    pub name: Name,
    pub description: Option<String>,
}

impl CreateProduct {
    /// Validate raw boundary input.
    pub fn parse(
        product_id: &str,
        name: &str,
        description: Option<String>,
    ) -> DomainResult<Self> {
        Ok(Self {
            product_id: ProductId::new(product_id)?,
            name: Name::new(name)?,
            description: normalize_text(description),
        })
    }
}

/// Command: EditProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditProduct {
    pub name: Name,
    pub description: Option<String>,
}

impl EditProduct {
    /// Validate raw boundary input.
    pub fn parse(name: &str, description: Option<String>) -> DomainResult<Self> {
        Ok(Self {
            name: Name::new(name)?,
            description: normalize_text(description),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::DomainError;

    #[test]
    fn create_product_keeps_fields() {
        let cmd = CreateProduct::parse("SKU-1", "Widget", Some("Blue widget".to_string())).unwrap();
        let product = Product::create(cmd);

        assert_eq!(product.product_id().as_str(), "SKU-1");
        assert_eq!(product.name().as_str(), "Widget");
        assert_eq!(product.description(), Some("Blue widget"));
        assert_eq!(product.id(), product.product_id());
    }

    #[test]
    fn create_product_rejects_empty_name() {
        let result = CreateProduct::parse("SKU-1", "   ", None);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn create_product_rejects_empty_id() {
        let result = CreateProduct::parse("", "Widget", None);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn blank_description_is_absent() {
        let cmd = CreateProduct::parse("SKU-1", "Widget", Some("  ".to_string())).unwrap();
        assert_eq!(Product::create(cmd).description(), None);
    }

    #[test]
    fn edit_replaces_name_and_description_but_not_id() {
        let mut product =
            Product::create(CreateProduct::parse("SKU-1", "Widget", Some("old".to_string())).unwrap());

        product.apply_edit(EditProduct::parse("Gadget", None).unwrap());

        assert_eq!(product.product_id().as_str(), "SKU-1");
        assert_eq!(product.name().as_str(), "Gadget");
        assert_eq!(product.description(), None);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: edits never touch the identifier.
            #[test]
            fn edits_preserve_identity(
                id in "[A-Z0-9-]{1,50}",
                name in "[A-Za-z][A-Za-z0-9 ]{0,98}[A-Za-z0-9]",
                new_name in "[A-Za-z][A-Za-z0-9 ]{0,98}[A-Za-z0-9]"
            ) {
                let mut product = Product::create(CreateProduct::parse(&id, &name, None).unwrap());
                let before = product.product_id().clone();

                product.apply_edit(EditProduct::parse(&new_name, None).unwrap());

                prop_assert_eq!(product.product_id(), &before);
                prop_assert_eq!(product.name().as_str(), new_name.trim());
            }
        }
    }
}
