//! Fixtures
//!
//! The seed catalog used when no products have been persisted yet.

use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    fixtures::products::ProductsFixture,
    products::Product,
};

pub mod products;

/// Seed catalog shipped with the binary.
pub const SEED_CATALOG: &str = include_str!("catalog.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Price quoted in a currency other than the catalog's
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Catalog rejected the fixture products
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Build a catalog from a YAML products fixture.
///
/// # Errors
///
/// Returns an error if the YAML is malformed, a price cannot be parsed or is
/// not quoted in the catalog currency, or two products share an ID.
pub fn load_catalog(yaml: &str) -> Result<Catalog, FixtureError> {
    let fixture: ProductsFixture = serde_norway::from_str(yaml)?;

    let products = fixture
        .products
        .into_iter()
        .map(Product::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Catalog::from_products(products)?)
}

/// The built-in seed catalog.
///
/// # Errors
///
/// Returns an error if the embedded fixture is invalid.
pub fn seed_catalog() -> Result<Catalog, FixtureError> {
    load_catalog(SEED_CATALOG)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::products::ProductId;

    use super::*;

    #[test]
    fn seed_catalog_has_fifteen_products() -> TestResult {
        let catalog = seed_catalog()?;

        assert_eq!(catalog.len(), 15);
        assert_eq!(catalog.active().count(), 15);
        assert_eq!(catalog.next_id(), ProductId::new(16));

        let laptop = catalog.get_active(ProductId::new(1))?;

        assert_eq!(laptop.name, "Laptop");
        assert_eq!(laptop.price, Decimal::new(99_999, 2));
        assert_eq!(laptop.stock, 10);

        let earbuds = catalog.get_active(ProductId::new(15))?;

        assert_eq!(earbuds.name, "Wireless Earbuds");
        assert_eq!(earbuds.stock, 17);

        Ok(())
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let yaml = "\
products:
  - id: 1
    name: Mouse
    price: 49.99 USD
    description: A wireless mouse.
    stock: 1
  - id: 1
    name: Keyboard
    price: 79.99 USD
    description: A mechanical keyboard.
    stock: 1
";

        let result = load_catalog(yaml);

        assert!(
            matches!(result, Err(FixtureError::Catalog(_))),
            "expected Catalog error, got {result:?}"
        );
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let result = load_catalog("products: [");

        assert!(
            matches!(result, Err(FixtureError::Yaml(_))),
            "expected Yaml error, got {result:?}"
        );
    }
}
