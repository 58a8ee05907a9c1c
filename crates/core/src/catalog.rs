//! Catalog
//!
//! The catalog owns every [`Product`] and is the only place stock levels
//! change. Carts hold reservations by product ID; reserving decrements stock
//! and releasing gives it back, so for each product the stock plus every
//! outstanding reservation stays equal to the level last set by an admin.
//!
//! Removing a product leaves a tombstone behind: it is no longer listed or
//! reservable, but carts and purchase history can still resolve it.

use std::num::NonZeroU32;

use jiff::Timestamp;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::CartEntry,
    products::{NewProduct, Product, ProductId, ProductUpdate},
    repository::{RecordSet, Repository, RepositoryError},
};

/// Errors raised by catalog operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No product has the given ID.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// The product was removed from the catalog.
    #[error("product {0} is no longer available")]
    Removed(ProductId),

    /// Reservations need a quantity of at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Not enough stock to satisfy the reservation.
    #[error("only {available} of product {product} in stock, {requested} requested")]
    InsufficientStock {
        /// Product being reserved
        product: ProductId,
        /// Units requested
        requested: u32,
        /// Units available
        available: u32,
    },

    /// Releasing would overflow the stock counter.
    #[error("stock for product {0} would overflow")]
    StockOverflow(ProductId),

    /// Prices must lie between zero and [`MAX_PRICE`] with at most
    /// [`PRICE_SCALE`] decimal places.
    #[error(
        "invalid price {0}, prices must be between 0 and {max} with at most {scale} decimal places",
        max = MAX_PRICE,
        scale = PRICE_SCALE
    )]
    InvalidPrice(Decimal),

    /// Underlying repository error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Highest unit price a product can be given.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Most decimal places a unit price can have.
pub const PRICE_SCALE: u32 = 2;

/// Catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: RecordSet<Product>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from stored products, tombstones included.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] if two products share an ID.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Result<Self, CatalogError> {
        Ok(Self {
            products: RecordSet::from_records(products)?,
        })
    }

    /// Resolve a product by ID, including removed products.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Resolve a listed product by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for unknown and removed products.
    pub fn get_active(&self, id: ProductId) -> Result<&Product, CatalogError> {
        self.get(id)
            .filter(|product| product.is_active())
            .ok_or(CatalogError::NotFound(id))
    }

    /// Listed products, in insertion order.
    pub fn active(&self) -> impl Iterator<Item = &Product> {
        self.products.list().iter().filter(|product| product.is_active())
    }

    /// Every product record, tombstones included.
    pub fn products(&self) -> &[Product] {
        self.products.list()
    }

    /// Number of product records, tombstones included.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog holds no product records at all.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The ID the next added product will receive.
    ///
    /// IDs of removed products are never handed out again.
    pub fn next_id(&self) -> ProductId {
        self.products
            .list()
            .iter()
            .map(|product| product.id.get())
            .max()
            .map_or(ProductId::new(1), |max| ProductId::new(max.saturating_add(1)))
    }

    /// Reserve `quantity` units of a product.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CatalogError::NotFound`]: no product has the given ID.
    /// - [`CatalogError::Removed`]: the product was removed.
    /// - [`CatalogError::InsufficientStock`]: fewer than `quantity` units are in stock.
    pub fn reserve(&mut self, id: ProductId, quantity: u32) -> Result<CartEntry, CatalogError> {
        let quantity = NonZeroU32::new(quantity).ok_or(CatalogError::InvalidQuantity)?;

        let product = self
            .products
            .get_mut(&id)
            .ok_or(CatalogError::NotFound(id))?;

        if !product.is_active() {
            return Err(CatalogError::Removed(id));
        }

        if product.stock < quantity.get() {
            return Err(CatalogError::InsufficientStock {
                product: id,
                requested: quantity.get(),
                available: product.stock,
            });
        }

        product.stock -= quantity.get();

        debug!(
            product = %id,
            quantity = quantity.get(),
            remaining = product.stock,
            "reserved stock"
        );

        Ok(CartEntry::new(id, quantity))
    }

    /// Return `quantity` units to a product's stock.
    ///
    /// Removed products accept releases, since reservations can outlive removal.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`]: no product has the given ID.
    /// - [`CatalogError::StockOverflow`]: the stock counter would overflow.
    pub fn release(&mut self, id: ProductId, quantity: u32) -> Result<(), CatalogError> {
        let product = self
            .products
            .get_mut(&id)
            .ok_or(CatalogError::NotFound(id))?;

        product.stock = product
            .stock
            .checked_add(quantity)
            .ok_or(CatalogError::StockOverflow(id))?;

        debug!(product = %id, quantity, stock = product.stock, "released stock");

        Ok(())
    }

    /// Add a new product, assigning it the next free ID.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidPrice`]: the price is out of range or too precise.
    /// - [`CatalogError::Repository`]: the ID space is exhausted.
    pub fn add_product(&mut self, product: NewProduct) -> Result<&Product, CatalogError> {
        validate_price(product.price)?;

        let id = self.next_id();

        let added = self.products.add(Product {
            id,
            name: product.name,
            price: product.price,
            description: product.description,
            stock: product.stock,
            removed_at: None,
        })?;

        info!(product = %id, name = %added.name, stock = added.stock, "added product");

        Ok(added)
    }

    /// Apply an update to a listed product.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidPrice`]: the new price is out of range or too precise.
    /// - [`CatalogError::NotFound`]: the product is unknown or removed.
    pub fn modify_product(
        &mut self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<&Product, CatalogError> {
        if let Some(price) = update.price {
            validate_price(price)?;
        }

        let product = self
            .products
            .get_mut(&id)
            .filter(|product| product.is_active())
            .ok_or(CatalogError::NotFound(id))?;

        if let Some(name) = update.name {
            product.name = name;
        }

        if let Some(price) = update.price {
            product.price = price;
        }

        if let Some(description) = update.description {
            product.description = description;
        }

        if let Some(stock) = update.stock {
            product.stock = stock;
        }

        info!(product = %id, "modified product");

        Ok(&*product)
    }

    /// Withdraw a product from the catalog, leaving a tombstone.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the product is unknown or already removed.
    pub fn remove_product(&mut self, id: ProductId, at: Timestamp) -> Result<&Product, CatalogError> {
        let product = self
            .products
            .get_mut(&id)
            .filter(|product| product.is_active())
            .ok_or(CatalogError::NotFound(id))?;

        product.removed_at = Some(at);

        info!(product = %id, "removed product");

        Ok(&*product)
    }
}

/// Check that `price` is within range and has at most [`PRICE_SCALE`]
/// decimal places.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidPrice`] otherwise.
pub fn validate_price(price: Decimal) -> Result<(), CatalogError> {
    if price < Decimal::ZERO || price > MAX_PRICE || price.normalize().scale() > PRICE_SCALE {
        return Err(CatalogError::InvalidPrice(price));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn new_product(name: &str, stock: u32) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: Decimal::new(4_999, 2),
            description: format!("A {name}."),
            stock,
        }
    }

    fn catalog_with(stock: u32) -> Result<(Catalog, ProductId), CatalogError> {
        let mut catalog = Catalog::new();
        let id = catalog.add_product(new_product("Mouse", stock))?.id;

        Ok((catalog, id))
    }

    fn stock_of(catalog: &Catalog, id: ProductId) -> Option<u32> {
        catalog.get(id).map(|product| product.stock)
    }

    #[test]
    fn reserve_then_release_restores_stock() -> TestResult {
        let (mut catalog, id) = catalog_with(22)?;

        let entry = catalog.reserve(id, 5)?;
        assert_eq!(stock_of(&catalog, id), Some(17));

        catalog.release(entry.product_id(), entry.quantity())?;
        assert_eq!(stock_of(&catalog, id), Some(22));

        Ok(())
    }

    #[test]
    fn reserve_entire_stock_then_one_more_fails() -> TestResult {
        let (mut catalog, id) = catalog_with(10)?;

        catalog.reserve(id, 10)?;
        assert_eq!(stock_of(&catalog, id), Some(0));

        let result = catalog.reserve(id, 1);

        assert_eq!(
            result,
            Err(CatalogError::InsufficientStock {
                product: id,
                requested: 1,
                available: 0,
            })
        );

        Ok(())
    }

    #[test]
    fn reserve_more_than_stock_leaves_stock_untouched() -> TestResult {
        let (mut catalog, id) = catalog_with(3)?;

        let result = catalog.reserve(id, 4);

        assert!(
            matches!(result, Err(CatalogError::InsufficientStock { .. })),
            "expected InsufficientStock, got {result:?}"
        );
        assert_eq!(stock_of(&catalog, id), Some(3));

        Ok(())
    }

    #[test]
    fn reserve_zero_is_invalid() -> TestResult {
        let (mut catalog, id) = catalog_with(3)?;

        assert_eq!(catalog.reserve(id, 0), Err(CatalogError::InvalidQuantity));
        assert_eq!(stock_of(&catalog, id), Some(3));

        Ok(())
    }

    #[test]
    fn reserve_unknown_product_is_not_found() {
        let mut catalog = Catalog::new();

        let result = catalog.reserve(ProductId::new(42), 1);

        assert_eq!(result, Err(CatalogError::NotFound(ProductId::new(42))));
    }

    #[test]
    fn reserve_removed_product_fails() -> TestResult {
        let (mut catalog, id) = catalog_with(3)?;
        catalog.remove_product(id, Timestamp::UNIX_EPOCH)?;

        assert_eq!(catalog.reserve(id, 1), Err(CatalogError::Removed(id)));

        Ok(())
    }

    #[test]
    fn release_has_no_upper_bound() -> TestResult {
        let (mut catalog, id) = catalog_with(1)?;

        catalog.release(id, 10)?;

        assert_eq!(stock_of(&catalog, id), Some(11));

        Ok(())
    }

    #[test]
    fn release_overflow_is_rejected_without_mutation() -> TestResult {
        let (mut catalog, id) = catalog_with(u32::MAX)?;

        assert_eq!(catalog.release(id, 1), Err(CatalogError::StockOverflow(id)));
        assert_eq!(stock_of(&catalog, id), Some(u32::MAX));

        Ok(())
    }

    #[test]
    fn release_reaches_removed_products() -> TestResult {
        let (mut catalog, id) = catalog_with(5)?;
        let entry = catalog.reserve(id, 2)?;
        catalog.remove_product(id, Timestamp::UNIX_EPOCH)?;

        catalog.release(id, entry.quantity())?;

        assert_eq!(stock_of(&catalog, id), Some(5));

        Ok(())
    }

    #[test]
    fn ids_start_at_one_and_increase() -> TestResult {
        let mut catalog = Catalog::new();

        let first = catalog.add_product(new_product("Mouse", 1))?.id;
        let second = catalog.add_product(new_product("Keyboard", 1))?.id;

        assert_eq!(first, ProductId::new(1));
        assert_eq!(second, ProductId::new(2));

        Ok(())
    }

    #[test]
    fn ids_are_not_reused_after_removal() -> TestResult {
        let mut catalog = Catalog::new();
        catalog.add_product(new_product("Mouse", 1))?;
        let last = catalog.add_product(new_product("Keyboard", 1))?.id;

        catalog.remove_product(last, Timestamp::UNIX_EPOCH)?;
        let next = catalog.add_product(new_product("Monitor", 1))?.id;

        assert_eq!(next, ProductId::new(3));

        Ok(())
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut catalog = Catalog::new();
        let mut product = new_product("Mouse", 1);
        product.price = Decimal::new(-1, 0);

        let result = catalog.add_product(product);

        assert!(
            matches!(result, Err(CatalogError::InvalidPrice(_))),
            "expected InvalidPrice, got {result:?}"
        );
        assert!(catalog.is_empty());
    }

    #[test]
    fn prices_beyond_range_or_precision_are_rejected() -> TestResult {
        let (mut catalog, id) = catalog_with(1)?;

        for price in [
            Decimal::new(1_000_000_001, 0),
            Decimal::MAX,
            Decimal::new(12_345, 3),
        ] {
            let result = catalog.modify_product(
                id,
                ProductUpdate {
                    price: Some(price),
                    ..ProductUpdate::default()
                },
            );

            assert!(
                matches!(result, Err(CatalogError::InvalidPrice(_))),
                "expected InvalidPrice for {price}, got {result:?}"
            );
        }

        assert_eq!(catalog.get(id).map(|product| product.price), Some(Decimal::new(4_999, 2)));

        let mut product = new_product("Monitor", 1);
        product.price = MAX_PRICE;
        assert!(catalog.add_product(product).is_ok(), "the maximum price is accepted");

        let mut product = new_product("Cable", 1);
        product.price = Decimal::new(1_990, 3);
        assert!(catalog.add_product(product).is_ok(), "trailing zeros are not extra precision");

        Ok(())
    }

    #[test]
    fn modify_keeps_fields_that_are_not_updated() -> TestResult {
        let (mut catalog, id) = catalog_with(3)?;

        let product = catalog.modify_product(
            id,
            ProductUpdate {
                price: Some(Decimal::new(2_500, 2)),
                stock: Some(9),
                ..ProductUpdate::default()
            },
        )?;

        assert_eq!(product.name, "Mouse");
        assert_eq!(product.price, Decimal::new(2_500, 2));
        assert_eq!(product.stock, 9);

        Ok(())
    }

    #[test]
    fn modify_removed_product_is_not_found() -> TestResult {
        let (mut catalog, id) = catalog_with(3)?;
        catalog.remove_product(id, Timestamp::UNIX_EPOCH)?;

        let result = catalog.modify_product(id, ProductUpdate::default());

        assert_eq!(result.err(), Some(CatalogError::NotFound(id)));

        Ok(())
    }

    #[test]
    fn removed_products_are_unlisted_but_resolvable() -> TestResult {
        let (mut catalog, id) = catalog_with(3)?;

        catalog.remove_product(id, Timestamp::UNIX_EPOCH)?;

        assert_eq!(catalog.active().count(), 0);
        assert!(catalog.get(id).is_some());
        assert_eq!(catalog.get_active(id).err(), Some(CatalogError::NotFound(id)));
        assert_eq!(
            catalog.remove_product(id, Timestamp::UNIX_EPOCH).err(),
            Some(CatalogError::NotFound(id))
        );

        Ok(())
    }

    #[test]
    fn from_products_rejects_duplicate_ids() -> TestResult {
        let (catalog, _) = catalog_with(1)?;
        let mut products = catalog.products().to_vec();
        products.extend(catalog.products().iter().cloned());

        let result = Catalog::from_products(products);

        assert!(
            matches!(result, Err(CatalogError::Repository(RepositoryError::AlreadyExists(_)))),
            "expected duplicate error, got {result:?}"
        );

        Ok(())
    }
}
