//! Emporium prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    accounts::{AccountError, Accounts},
    admins::Admin,
    cart::{Cart, CartEntry, CartError, Quote},
    catalog::{Catalog, CatalogError},
    checkout::{CheckoutError, Confirmation},
    credentials::{Credential, PasswordHasher, Sha256Hasher},
    fixtures::{FixtureError, seed_catalog},
    money::format_amount,
    orders::{OrderHistory, Purchase, PurchaseItem},
    payment::{PaymentDetails, PaymentError},
    products::{NewProduct, Product, ProductId, ProductUpdate},
    repository::{Keyed, RecordSet, Repository, RepositoryError},
    users::{CartKind, NewUser, User},
};
