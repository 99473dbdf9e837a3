//! Business logic services for storefront.
//!
//! - `checkout` - Turns a validated form and a cart into a placed order

pub mod checkout;

pub use checkout::{OrderLine, PlacedOrder, SimulatedCheckout};
