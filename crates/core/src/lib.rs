//! Emporium
//!
//! Emporium is the domain model of a console shopping cart: a product catalog
//! with stock reservation, carts that hold those reservations, checkout into
//! an immutable purchase history, and user and admin accounts.
//!
//! Everything here is synchronous and in-memory. Persistence and the
//! interactive menu live in the `emporium-app` crate.

pub mod accounts;
pub mod admins;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod credentials;
pub mod fixtures;
pub mod money;
pub mod orders;
pub mod payment;
pub mod prelude;
pub mod products;
pub mod repository;
pub mod users;
