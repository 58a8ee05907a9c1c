//! Products

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::repository::Keyed;

/// Product identifier, unique within a catalog and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    /// Create a product ID from its numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the numeric value of the ID.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ProductId {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID
    #[serde(rename = "product_id")]
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,

    /// Product description
    pub description: String,

    /// Units available for reservation
    pub stock: u32,

    /// When the product was withdrawn from the catalog, if it has been.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_at: Option<Timestamp>,
}

impl Product {
    /// Whether the product is listed and can be reserved.
    pub fn is_active(&self) -> bool {
        self.removed_at.is_none()
    }

    /// Price of `quantity` units of this product, or `None` if it does not
    /// fit in a [`Decimal`].
    pub fn line_total(&self, quantity: u32) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(quantity))
    }
}

impl Keyed for Product {
    type Key = ProductId;

    fn key(&self) -> &ProductId {
        &self.id
    }
}

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Product name
    pub name: String,

    /// Unit price
    pub price: Decimal,

    /// Product description
    pub description: String,

    /// Initial stock level
    pub stock: u32,
}

/// Product Update Data
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    /// New name
    pub name: Option<String>,

    /// New unit price
    pub price: Option<Decimal>,

    /// New description
    pub description: Option<String>,

    /// New stock level
    pub stock: Option<u32>,
}

impl ProductUpdate {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.stock.is_none()
    }
}
