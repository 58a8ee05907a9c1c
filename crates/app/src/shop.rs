//! Shop service
//!
//! Owns the catalog, the accounts and their stores, and is the only thing the
//! console talks to. Every operation is keyed by username so callers never
//! hold references into the shop between calls.

use emporium::{
    accounts::{AccountError, Accounts},
    admins::Admin,
    cart::{CartEntry, CartError, Quote},
    catalog::{Catalog, CatalogError},
    checkout::{CheckoutError, Confirmation},
    credentials::{PasswordHasher, Sha256Hasher},
    orders::Purchase,
    products::{NewProduct, Product, ProductId, ProductUpdate},
    users::{NewUser, User},
};
use jiff::Timestamp;
use thiserror::Error;
use tracing::{error, info};

use crate::{
    audit::AuditLog,
    state::{self, LoadReport, StateError},
    storage::{StoreError, Stores},
};

/// Errors raised by shop operations.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Persisted state could not be loaded.
    #[error(transparent)]
    State(#[from] StateError),

    /// A store could not be written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Account lookup or login failed.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Catalog operation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// Shop
#[derive(Debug)]
pub struct Shop<H = Sha256Hasher> {
    catalog: Catalog,
    accounts: Accounts<H>,
    stores: Stores,
    audit: AuditLog,
    report: LoadReport,
}

impl<H: PasswordHasher> Shop<H> {
    /// Load state from `stores` and make sure the default admin exists.
    ///
    /// The admin store is written when the default admin had to be created.
    ///
    /// # Errors
    ///
    /// Returns a [`ShopError`] if loading fails, stored usernames collide, or
    /// the admins cannot be saved.
    pub fn open(
        stores: Stores,
        audit: AuditLog,
        hasher: H,
        admin_username: &str,
        admin_password: &str,
    ) -> Result<Self, ShopError> {
        let loaded = state::load(&stores)?;

        let mut accounts = Accounts::with_records(hasher, loaded.users, loaded.admins)?;

        if accounts.ensure_admin(admin_username, admin_password)? {
            stores.admins.save(accounts.admins())?;
        }

        Ok(Self {
            catalog: loaded.catalog,
            accounts,
            stores,
            audit,
            report: loaded.report,
        })
    }

    /// The product catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// What happened while loading.
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// Look up a user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`] if no user has that username.
    pub fn user(&self, username: &str) -> Result<&User, ShopError> {
        Ok(self.accounts.user(username)?)
    }

    /// Register a user and save the users store.
    ///
    /// A failed save leaves the change in memory; it is written again by the
    /// next save or by [`Shop::persist`].
    ///
    /// # Errors
    ///
    /// Returns a [`ShopError`] if the username is invalid or taken, or the
    /// users cannot be saved.
    pub fn register_user(&mut self, user: NewUser, password: &str) -> Result<(), ShopError> {
        self.accounts.register(user, password)?;

        self.save_users()
    }

    /// Check a user's password.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] on failure.
    pub fn login_user(&self, username: &str, password: &str) -> Result<&User, ShopError> {
        let user = self.accounts.authenticate_user(username, password)?;

        info!(user = %username, "user logged in");

        Ok(user)
    }

    /// Check an admin's password.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] on failure.
    pub fn login_admin(&self, username: &str, password: &str) -> Result<&Admin, ShopError> {
        let admin = self.accounts.authenticate_admin(username, password)?;

        info!(admin = %username, "admin logged in");

        Ok(admin)
    }

    /// Reserve stock into a user's cart.
    ///
    /// # Errors
    ///
    /// Returns a [`ShopError`] if the user is unknown or the stock cannot be
    /// reserved.
    pub fn add_to_cart(
        &mut self,
        username: &str,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartEntry, ShopError> {
        let user = self.accounts.user_mut(username)?;

        Ok(user.add_to_cart(&mut self.catalog, product, quantity)?)
    }

    /// Remove a product from a user's cart, releasing its stock.
    ///
    /// # Errors
    ///
    /// Returns a [`ShopError`] if the user is unknown or the product is not
    /// in the cart.
    pub fn remove_from_cart(
        &mut self,
        username: &str,
        product: ProductId,
    ) -> Result<CartEntry, ShopError> {
        let user = self.accounts.user_mut(username)?;

        Ok(user.remove_from_cart(&mut self.catalog, product)?)
    }

    /// Price a user's active cart.
    ///
    /// # Errors
    ///
    /// Returns a [`ShopError`] if the user is unknown or a cart entry cannot
    /// be resolved.
    pub fn quote(&self, username: &str) -> Result<Quote, ShopError> {
        let user = self.accounts.user(username)?;

        Ok(user.cart().quote(&self.catalog)?)
    }

    /// Replace a user's saved cart with their active cart.
    ///
    /// # Errors
    ///
    /// Returns a [`ShopError`] if the user is unknown or the replaced saved
    /// entries cannot be released.
    pub fn save_cart(&mut self, username: &str) -> Result<usize, ShopError> {
        let user = self.accounts.user_mut(username)?;

        Ok(user.save_cart(&mut self.catalog)?)
    }

    /// Move a user's saved cart back into their active cart.
    ///
    /// # Errors
    ///
    /// Returns a [`ShopError`] if the user is unknown or nothing is saved.
    pub fn load_saved_cart(&mut self, username: &str) -> Result<usize, ShopError> {
        Ok(self.accounts.user_mut(username)?.load_saved_cart()?)
    }

    /// Complete a user's purchase and append it to the audit log.
    ///
    /// A failed audit append is logged and does not undo the purchase.
    ///
    /// # Errors
    ///
    /// Returns a [`ShopError`] if the user is unknown or checkout fails.
    pub fn checkout(
        &mut self,
        username: &str,
        confirmation: Confirmation,
    ) -> Result<Purchase, ShopError> {
        let user = self.accounts.user_mut(username)?;

        let purchase = user.checkout(&self.catalog, confirmation, Timestamp::now())?;

        if let Err(audit_error) = self.audit.append(&purchase) {
            error!(error = %audit_error, "failed to record purchase in audit log");
        }

        Ok(purchase)
    }

    /// End a user's session, saving products and users.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`]; both stores are attempted.
    pub fn logout_user(&mut self, username: &str) -> Result<(), ShopError> {
        info!(user = %username, "user logged out");

        let products = self.save_products();
        let users = self.save_users();

        products.and(users)
    }

    /// Add a product and save the catalog.
    ///
    /// A failed save leaves the change in memory; it is written again by the
    /// next save or by [`Shop::persist`].
    ///
    /// # Errors
    ///
    /// Returns a [`ShopError`] if the product is invalid or the catalog
    /// cannot be saved.
    pub fn add_product(&mut self, product: NewProduct) -> Result<Product, ShopError> {
        let added = self.catalog.add_product(product)?.clone();

        self.save_products()?;

        Ok(added)
    }

    /// Modify a product and save the catalog.
    ///
    /// A failed save leaves the change in memory; it is written again by the
    /// next save or by [`Shop::persist`].
    ///
    /// # Errors
    ///
    /// Returns a [`ShopError`] if the product is unknown, the update is
    /// invalid, or the catalog cannot be saved.
    pub fn modify_product(
        &mut self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ShopError> {
        let modified = self.catalog.modify_product(id, update)?.clone();

        self.save_products()?;

        Ok(modified)
    }

    /// Withdraw a product and save the catalog.
    ///
    /// A failed save leaves the change in memory; it is written again by the
    /// next save or by [`Shop::persist`].
    ///
    /// # Errors
    ///
    /// Returns a [`ShopError`] if the product is unknown or the catalog
    /// cannot be saved.
    pub fn remove_product(&mut self, id: ProductId) -> Result<Product, ShopError> {
        let removed = self.catalog.remove_product(id, Timestamp::now())?.clone();

        self.save_products()?;

        Ok(removed)
    }

    /// Save every store.
    ///
    /// Every store is attempted even when an earlier one fails; the first
    /// error is returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] encountered.
    pub fn persist(&self) -> Result<(), ShopError> {
        let products = self.save_products();
        let users = self.save_users();
        let admins = self.stores.admins.save(self.accounts.admins()).map_err(ShopError::from);

        products.and(users).and(admins)
    }

    fn save_products(&self) -> Result<(), ShopError> {
        self.stores.products.save(self.catalog.products())?;

        Ok(())
    }

    fn save_users(&self) -> Result<(), ShopError> {
        self.stores.users.save(self.accounts.users())?;

        Ok(())
    }
}
