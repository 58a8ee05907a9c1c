//! Users
//!
//! A shopper with an active cart, a saved cart and a purchase history. Moving
//! entries between the two carts keeps their reservations, so stock only
//! changes when an entry is added to or removed from the active cart.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartEntry, CartError},
    catalog::Catalog,
    checkout::{self, CheckoutError, Confirmation},
    credentials::Credential,
    orders::{OrderHistory, Purchase},
    products::ProductId,
    repository::Keyed,
};

/// Which of a user's carts an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartKind {
    /// The cart being shopped with
    Active,

    /// The cart set aside with "save cart"
    Saved,
}

/// New User Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Delivery address
    pub address: String,

    /// Login name, unique among users
    pub username: String,
}

/// User
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Delivery address
    pub address: String,

    username: String,
    credential: Credential,

    #[serde(default)]
    cart: Cart,

    #[serde(default)]
    saved_cart: Cart,

    #[serde(default)]
    order_history: OrderHistory,
}

impl User {
    /// Create a user with empty carts and no history.
    #[must_use]
    pub fn new(user: NewUser, credential: Credential) -> Self {
        Self {
            first_name: user.first_name,
            last_name: user.last_name,
            address: user.address,
            username: user.username,
            credential,
            cart: Cart::new(),
            saved_cart: Cart::new(),
            order_history: OrderHistory::new(),
        }
    }

    /// Login name
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Stored password verifier
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Active cart
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Saved cart
    pub fn saved_cart(&self) -> &Cart {
        &self.saved_cart
    }

    /// Purchase history
    pub fn order_history(&self) -> &OrderHistory {
        &self.order_history
    }

    /// Reserve stock and add it to the active cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Catalog`] if the stock cannot be reserved.
    pub fn add_to_cart(
        &mut self,
        catalog: &mut Catalog,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartEntry, CartError> {
        self.cart.add(catalog, product, quantity)
    }

    /// Remove the first active cart entry for `product`, releasing its stock.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if the active cart has no such entry.
    pub fn remove_from_cart(
        &mut self,
        catalog: &mut Catalog,
        product: ProductId,
    ) -> Result<CartEntry, CartError> {
        self.cart.remove(catalog, product)
    }

    /// Replace the saved cart with the active cart's entries.
    ///
    /// Entries already in the saved cart are dropped and their stock is
    /// released. Returns the number of entries moved; saving an empty cart
    /// changes nothing and returns 0.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Catalog`] if the replaced entries cannot be
    /// released; nothing changes in that case.
    pub fn save_cart(&mut self, catalog: &mut Catalog) -> Result<usize, CartError> {
        if self.cart.is_empty() {
            return Ok(0);
        }

        // Release into a copy so a failure leaves stock untouched.
        let mut released = catalog.clone();

        for entry in self.saved_cart.iter() {
            released.release(entry.product_id(), entry.quantity())?;
        }

        *catalog = released;

        let replaced = self.saved_cart.take().len();
        let entries = self.cart.take();
        let moved = entries.len();

        self.saved_cart.append(entries);

        debug!(user = %self.username, moved, replaced, "saved cart");

        Ok(moved)
    }

    /// Move every saved entry to the end of the active cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NothingSaved`] if the saved cart is empty.
    pub fn load_saved_cart(&mut self) -> Result<usize, CartError> {
        if self.saved_cart.is_empty() {
            return Err(CartError::NothingSaved);
        }

        let entries = self.saved_cart.take();
        let moved = entries.len();

        self.cart.append(entries);

        debug!(user = %self.username, moved, "loaded saved cart");

        Ok(moved)
    }

    /// Buy everything in the active cart.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: the active cart is empty.
    /// - [`CheckoutError::Declined`]: the address was not confirmed.
    /// - [`CheckoutError::Cart`]: a cart entry could not be resolved.
    pub fn checkout(
        &mut self,
        catalog: &Catalog,
        confirmation: Confirmation,
        at: Timestamp,
    ) -> Result<Purchase, CheckoutError> {
        checkout::checkout(
            &mut self.cart,
            &mut self.order_history,
            catalog,
            confirmation,
            at,
        )
    }

    /// Drop cart entries the catalog cannot resolve, returning them.
    pub fn resolve_carts(&mut self, catalog: &Catalog) -> Vec<(CartKind, CartEntry)> {
        let active = self.cart.retain_resolvable(catalog);
        let saved = self.saved_cart.retain_resolvable(catalog);

        let dropped: Vec<(CartKind, CartEntry)> = active
            .into_iter()
            .map(|entry| (CartKind::Active, entry))
            .chain(saved.into_iter().map(|entry| (CartKind::Saved, entry)))
            .collect();

        for (kind, entry) in &dropped {
            warn!(
                user = %self.username,
                cart = ?kind,
                product = %entry.product_id(),
                quantity = entry.quantity(),
                "dropped cart entry for unknown product"
            );
        }

        dropped
    }
}

impl Keyed for User {
    type Key = str;

    fn key(&self) -> &str {
        &self.username
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{payment::PaymentDetails, products::NewProduct};

    use super::*;

    fn user() -> User {
        User::new(
            NewUser {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                address: "12 Analytical Row".to_string(),
                username: "ada".to_string(),
            },
            Credential::new("00", "ff"),
        )
    }

    fn catalog() -> Result<(Catalog, ProductId, ProductId), CartError> {
        let mut catalog = Catalog::new();

        let laptop = catalog
            .add_product(NewProduct {
                name: "Laptop".to_string(),
                price: Decimal::new(99_999, 2),
                description: "A high-performance laptop.".to_string(),
                stock: 10,
            })?
            .id;

        let mouse = catalog
            .add_product(NewProduct {
                name: "Mouse".to_string(),
                price: Decimal::new(4_999, 2),
                description: "A wireless mouse.".to_string(),
                stock: 22,
            })?
            .id;

        Ok((catalog, laptop, mouse))
    }

    fn confirmation(address_confirmed: bool) -> Result<Confirmation, crate::payment::PaymentError> {
        Ok(Confirmation {
            payment: PaymentDetails::new("1234567890123", "1228", "123")?,
            address_confirmed,
            feedback: "Fast delivery".to_string(),
        })
    }

    fn stock_of(catalog: &Catalog, id: ProductId) -> Option<u32> {
        catalog.get(id).map(|product| product.stock)
    }

    #[test]
    fn save_then_load_restores_cart_without_touching_stock() -> TestResult {
        let (mut catalog, laptop, mouse) = catalog()?;
        let mut user = user();

        user.add_to_cart(&mut catalog, laptop, 1)?;
        user.add_to_cart(&mut catalog, mouse, 2)?;
        let before = user.cart().clone();

        assert_eq!(user.save_cart(&mut catalog)?, 2);
        assert!(user.cart().is_empty());
        assert_eq!(user.saved_cart(), &before);

        assert_eq!(user.load_saved_cart()?, 2);
        assert_eq!(user.cart(), &before);
        assert!(user.saved_cart().is_empty());

        assert_eq!(stock_of(&catalog, laptop), Some(9));
        assert_eq!(stock_of(&catalog, mouse), Some(20));

        Ok(())
    }

    #[test]
    fn saving_again_replaces_the_saved_cart() -> TestResult {
        let (mut catalog, laptop, mouse) = catalog()?;
        let mut user = user();

        user.add_to_cart(&mut catalog, laptop, 1)?;
        user.save_cart(&mut catalog)?;
        user.add_to_cart(&mut catalog, mouse, 2)?;
        let before = user.cart().clone();

        assert_eq!(user.save_cart(&mut catalog)?, 1);
        assert_eq!(user.saved_cart(), &before);
        assert_eq!(stock_of(&catalog, laptop), Some(10));
        assert_eq!(stock_of(&catalog, mouse), Some(20));

        user.load_saved_cart()?;

        assert_eq!(user.cart(), &before);

        Ok(())
    }

    #[test]
    fn saving_an_empty_cart_keeps_the_saved_cart() -> TestResult {
        let (mut catalog, laptop, _) = catalog()?;
        let mut user = user();

        user.add_to_cart(&mut catalog, laptop, 1)?;
        user.save_cart(&mut catalog)?;

        assert_eq!(user.save_cart(&mut catalog)?, 0);
        assert_eq!(user.saved_cart().len(), 1);
        assert_eq!(stock_of(&catalog, laptop), Some(9));

        Ok(())
    }

    #[test]
    fn loading_appends_to_current_cart() -> TestResult {
        let (mut catalog, laptop, mouse) = catalog()?;
        let mut user = user();

        user.add_to_cart(&mut catalog, laptop, 1)?;
        user.save_cart(&mut catalog)?;
        user.add_to_cart(&mut catalog, mouse, 1)?;

        user.load_saved_cart()?;

        let active: Vec<ProductId> = user.cart().iter().map(CartEntry::product_id).collect();

        assert_eq!(active, [mouse, laptop]);

        Ok(())
    }

    #[test]
    fn loading_with_nothing_saved_fails() {
        let mut user = user();

        assert_eq!(user.load_saved_cart(), Err(CartError::NothingSaved));
    }

    #[test]
    fn checkout_records_purchase_and_empties_cart() -> TestResult {
        let (mut catalog, laptop, mouse) = catalog()?;
        let mut user = user();

        user.add_to_cart(&mut catalog, laptop, 1)?;
        user.add_to_cart(&mut catalog, mouse, 2)?;
        let total = user.cart().total(&catalog)?;

        let purchase = user.checkout(&catalog, confirmation(true)?, Timestamp::UNIX_EPOCH)?;

        assert_eq!(purchase.total_price, total);
        assert_eq!(purchase.total_price, Decimal::new(109_997, 2));
        assert_eq!(purchase.items.len(), 2);
        assert_eq!(purchase.feedback, "Fast delivery");
        assert!(user.cart().is_empty());
        assert_eq!(user.order_history().len(), 1);
        assert_eq!(user.order_history().latest(), Some(&purchase));
        assert_eq!(stock_of(&catalog, laptop), Some(9));
        assert_eq!(stock_of(&catalog, mouse), Some(20));

        Ok(())
    }

    #[test]
    fn checkout_snapshot_survives_catalog_changes() -> TestResult {
        let (mut catalog, laptop, _) = catalog()?;
        let mut user = user();

        user.add_to_cart(&mut catalog, laptop, 1)?;
        user.checkout(&catalog, confirmation(true)?, Timestamp::UNIX_EPOCH)?;

        catalog.modify_product(
            laptop,
            crate::products::ProductUpdate {
                name: Some("Old Laptop".to_string()),
                price: Some(Decimal::ONE),
                ..crate::products::ProductUpdate::default()
            },
        )?;

        let item = user
            .order_history()
            .latest()
            .and_then(|purchase| purchase.items.first())
            .map(|item| (item.name.clone(), item.line_total));

        assert_eq!(item, Some(("Laptop".to_string(), Decimal::new(99_999, 2))));

        Ok(())
    }

    #[test]
    fn checkout_with_empty_cart_records_nothing() -> TestResult {
        let (catalog, _, _) = catalog()?;
        let mut user = user();

        let result = user.checkout(&catalog, confirmation(true)?, Timestamp::UNIX_EPOCH);

        assert_eq!(result, Err(CheckoutError::EmptyCart));
        assert!(user.order_history().is_empty());

        Ok(())
    }

    #[test]
    fn declined_checkout_changes_nothing() -> TestResult {
        let (mut catalog, laptop, _) = catalog()?;
        let mut user = user();
        user.add_to_cart(&mut catalog, laptop, 3)?;

        let result = user.checkout(&catalog, confirmation(false)?, Timestamp::UNIX_EPOCH);

        assert_eq!(result, Err(CheckoutError::Declined));
        assert_eq!(user.cart().len(), 1);
        assert!(user.order_history().is_empty());
        assert_eq!(stock_of(&catalog, laptop), Some(7));

        Ok(())
    }

    #[test]
    fn checkout_resolves_removed_products() -> TestResult {
        let (mut catalog, laptop, _) = catalog()?;
        let mut user = user();
        user.add_to_cart(&mut catalog, laptop, 1)?;
        catalog.remove_product(laptop, Timestamp::UNIX_EPOCH)?;

        let purchase = user.checkout(&catalog, confirmation(true)?, Timestamp::UNIX_EPOCH)?;

        assert_eq!(purchase.total_price, Decimal::new(99_999, 2));

        Ok(())
    }

    #[test]
    fn resolve_carts_reports_unknown_entries_from_both_carts() -> TestResult {
        let (mut catalog, laptop, _) = catalog()?;
        let mut user = user();
        let ghost = ProductId::new(77);

        user.add_to_cart(&mut catalog, laptop, 1)?;
        user.cart.append(vec![CartEntry::new(ghost, NonZeroU32::MIN)]);
        user.saved_cart.append(vec![CartEntry::new(ghost, NonZeroU32::MIN)]);

        let dropped = user.resolve_carts(&catalog);

        let kinds: Vec<CartKind> = dropped.iter().map(|(kind, _)| *kind).collect();

        assert_eq!(kinds, [CartKind::Active, CartKind::Saved]);
        assert_eq!(user.cart().len(), 1);
        assert!(user.saved_cart().is_empty());

        Ok(())
    }

    #[test]
    fn deserializes_without_carts_or_history() -> TestResult {
        let yaml = "\
first_name: Ada
last_name: Lovelace
address: 12 Analytical Row
username: ada
credential:
  salt: '00'
  hash: ff
";

        let parsed: User = serde_norway::from_str(yaml)?;

        assert_eq!(parsed, user());

        Ok(())
    }
}
