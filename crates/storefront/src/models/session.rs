//! Session-stored shopping state.
//!
//! The cart lives in the visitor's session as a serialized [`Cart`]; there is
//! no server-side cart table. The last placed order is kept alongside it so
//! the confirmation page survives a refresh.

use streetstyle_core::Cart;
use tower_sessions::Session;

/// Session keys for shopping data.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the most recently placed order.
    pub const LAST_ORDER: &str = "last_order";
}

/// Load the cart from the session, starting empty if none is stored.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored value cannot be
/// decoded.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn store_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

/// Number of units in the visitor's cart, for the header badge.
///
/// Session failures are logged and reported as an empty cart.
pub async fn cart_count(session: &Session) -> u64 {
    match load_cart(session).await {
        Ok(cart) => cart.total_items(),
        Err(e) => {
            tracing::warn!("Failed to load cart for badge: {e}");
            0
        }
    }
}
