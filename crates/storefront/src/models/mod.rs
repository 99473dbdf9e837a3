//! Types kept in the visitor's session.

pub mod session;

pub use session::{cart_count, keys as session_keys, load_cart, store_cart};
