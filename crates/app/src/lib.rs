//! Console front end for the emporium shop.
//!
//! Wires the domain types from the `emporium` crate to JSON file stores, the
//! purchase audit log and an interactive terminal menu.

pub mod audit;
pub mod cli;
pub mod config;
pub mod observability;
pub mod shop;
pub mod state;
pub mod storage;
