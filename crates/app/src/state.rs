//! Startup state loading
//!
//! Products load first so that every user's carts can be checked against
//! the catalog they will be used with.

use emporium::{
    admins::Admin,
    catalog::{Catalog, CatalogError},
    fixtures::{FixtureError, seed_catalog},
    products::ProductId,
    users::{CartKind, User},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::storage::{StoreError, Stores};

/// Errors raised while loading persisted state.
#[derive(Debug, Error)]
pub enum StateError {
    /// A store could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The seed catalog is invalid.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// The stored products are inconsistent.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A cart entry dropped on load because its product no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingEntry {
    /// Owner of the cart
    pub username: String,

    /// Cart the entry was in
    pub cart: CartKind,

    /// Unknown product
    pub product_id: ProductId,

    /// Reserved units that were dropped
    pub quantity: u32,
}

/// What happened while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Whether the catalog came from the seed fixture
    pub seeded_catalog: bool,

    /// Entries dropped from users' carts
    pub dangling: Vec<DanglingEntry>,
}

/// Everything read from the stores.
#[derive(Debug)]
pub struct LoadedState {
    /// Product catalog
    pub catalog: Catalog,

    /// Users, with carts resolved against `catalog`
    pub users: Vec<User>,

    /// Admins
    pub admins: Vec<Admin>,

    /// Load summary
    pub report: LoadReport,
}

/// Read products, users and admins.
///
/// # Errors
///
/// Returns a [`StateError`] if a store fails or the catalog is invalid.
pub fn load(stores: &Stores) -> Result<LoadedState, StateError> {
    let mut report = LoadReport::default();

    let catalog = if let Some(products) = stores.products.load()? {
        Catalog::from_products(products)?
    } else {
        report.seeded_catalog = true;

        info!("no stored products, using seed catalog");

        seed_catalog()?
    };

    let mut users = stores.users.load()?.unwrap_or_default();

    for user in &mut users {
        report.dangling.extend(user.resolve_carts(&catalog).into_iter().map(
            |(cart, entry)| DanglingEntry {
                username: user.username().to_string(),
                cart,
                product_id: entry.product_id(),
                quantity: entry.quantity(),
            },
        ));
    }

    if !report.dangling.is_empty() {
        warn!(
            count = report.dangling.len(),
            "dropped cart entries for unknown products"
        );
    }

    let admins = stores.admins.load()?.unwrap_or_default();

    info!(
        products = catalog.len(),
        users = users.len(),
        admins = admins.len(),
        "loaded state"
    );

    Ok(LoadedState {
        catalog,
        users,
        admins,
        report,
    })
}
