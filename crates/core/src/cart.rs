//! Cart
//!
//! A cart is an ordered list of stock reservations. Adding the same product
//! twice produces two entries; nothing is merged.

use std::{mem, num::NonZeroU32};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    orders::PurchaseItem,
    products::ProductId,
};

/// Errors related to cart operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Wrapped catalog error, e.g. insufficient stock.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The product has no entry in the cart.
    #[error("product {0} not found in cart")]
    NotInCart(ProductId),

    /// There is no saved cart to load.
    #[error("no saved cart found")]
    NothingSaved,

    /// A cart entry refers to a product the catalog does not know.
    #[error("cart entry refers to unknown product {0}")]
    DanglingReference(ProductId),

    /// The cart's value does not fit in a [`Decimal`].
    #[error("cart total is too large")]
    TotalOverflow,
}

/// A reservation of `quantity` units of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    product_id: ProductId,
    quantity: NonZeroU32,
}

impl CartEntry {
    pub(crate) const fn new(product_id: ProductId, quantity: NonZeroU32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }

    /// Reserved product
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Reserved units
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }
}

/// Priced snapshot of a cart's contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// One line per cart entry, in cart order.
    pub items: Vec<PurchaseItem>,

    /// Sum of every line total.
    pub total: Decimal,
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(rename = "items")]
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `quantity` units of a product and append the reservation.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Catalog`] if the reservation fails; the cart and
    /// the catalog are left untouched.
    pub fn add(
        &mut self,
        catalog: &mut Catalog,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartEntry, CartError> {
        let entry = catalog.reserve(product, quantity)?;

        self.entries.push(entry);

        Ok(entry)
    }

    /// Remove the first entry for `product` and release its stock.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotInCart`]: the cart has no entry for the product.
    /// - [`CartError::Catalog`]: the stock could not be released.
    pub fn remove(
        &mut self,
        catalog: &mut Catalog,
        product: ProductId,
    ) -> Result<CartEntry, CartError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.product_id == product)
            .ok_or(CartError::NotInCart(product))?;

        let entry = self
            .entries
            .get(index)
            .copied()
            .ok_or(CartError::NotInCart(product))?;

        catalog.release(entry.product_id, entry.quantity())?;

        self.entries.remove(index);

        Ok(entry)
    }

    /// Drop every entry without releasing stock.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Move every entry out of the cart, keeping their reservations.
    pub fn take(&mut self) -> Vec<CartEntry> {
        mem::take(&mut self.entries)
    }

    pub(crate) fn append(&mut self, entries: Vec<CartEntry>) {
        self.entries.extend(entries);
    }

    /// Total price of the cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::DanglingReference`]: an entry's product is unknown.
    /// - [`CartError::TotalOverflow`]: the total does not fit in a [`Decimal`].
    pub fn total(&self, catalog: &Catalog) -> Result<Decimal, CartError> {
        self.entries.iter().try_fold(Decimal::ZERO, |total, entry| {
            let product = catalog
                .get(entry.product_id)
                .ok_or(CartError::DanglingReference(entry.product_id))?;

            product
                .line_total(entry.quantity())
                .and_then(|line_total| total.checked_add(line_total))
                .ok_or(CartError::TotalOverflow)
        })
    }

    /// Snapshot the cart's lines at current catalog prices.
    ///
    /// # Errors
    ///
    /// - [`CartError::DanglingReference`]: an entry's product is unknown.
    /// - [`CartError::TotalOverflow`]: a line or the total does not fit in a
    ///   [`Decimal`].
    pub fn quote(&self, catalog: &Catalog) -> Result<Quote, CartError> {
        let items = self
            .entries
            .iter()
            .map(|entry| {
                let product = catalog
                    .get(entry.product_id)
                    .ok_or(CartError::DanglingReference(entry.product_id))?;

                Ok(PurchaseItem {
                    name: product.name.clone(),
                    quantity: entry.quantity(),
                    line_total: product
                        .line_total(entry.quantity())
                        .ok_or(CartError::TotalOverflow)?,
                })
            })
            .collect::<Result<Vec<_>, CartError>>()?;

        let total = items
            .iter()
            .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.line_total))
            .ok_or(CartError::TotalOverflow)?;

        Ok(Quote { items, total })
    }

    /// Drop entries whose product the catalog does not know, returning them.
    pub fn retain_resolvable(&mut self, catalog: &Catalog) -> Vec<CartEntry> {
        let (kept, dropped) = mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| catalog.get(entry.product_id).is_some());

        self.entries = kept;

        dropped
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cart has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
