//! StreetStyle Core - Storefront domain logic.
//!
//! This crate holds everything the storefront knows about products, carts
//! and orders:
//! - [`catalog`] - The read-only product catalog with filtering and sorting
//! - [`cart`] - The per-session shopping cart and its totals
//! - [`checkout`] - Order totals and checkout form validation
//! - [`types`] - Newtype wrappers for IDs, prices and emails
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no session handling. The `storefront` crate owns a [`Catalog`] in its
//! application state and stores one [`Cart`] per visitor session.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use cart::{Cart, CartError, CartLineItem, LineKey};
pub use catalog::{ALL_CATEGORIES, Catalog, CatalogError, Product, SortOrder};
pub use checkout::{CheckoutError, CheckoutForm, CustomerDetails, OrderTotals};
pub use types::*;
