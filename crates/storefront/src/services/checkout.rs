//! Simulated order placement.
//!
//! No payment provider is contacted. Placing an order snapshots the cart,
//! assigns an order number and records the order in the logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use streetstyle_core::{
    Cart, CartLineItem, CheckoutError, CustomerDetails, OrderId, OrderTotals, Price, ProductId,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::add_breadcrumb;

/// One purchased line, frozen at the moment the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_price: Price,
}

impl From<&CartLineItem> for OrderLine {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.product.id.clone(),
            product_name: item.product.name.clone(),
            size: item.size.clone(),
            color: item.color.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price(),
            line_price: item.line_price(),
        }
    }
}

/// An order accepted by the simulated checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub customer: CustomerDetails,
    pub lines: Vec<OrderLine>,
    pub totals: OrderTotals,
}

impl PlacedOrder {
    /// Units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

/// Checkout that accepts any validated form without charging a card.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedCheckout;

impl SimulatedCheckout {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Place an order for everything in `cart`.
    ///
    /// The cart itself is left untouched; callers clear it once the order is
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    #[instrument(skip(self, customer, cart), fields(items = cart.total_items()))]
    pub fn place_order(
        &self,
        customer: CustomerDetails,
        cart: &Cart,
    ) -> Result<PlacedOrder, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order = PlacedOrder {
            id: OrderId::new(Uuid::new_v4().to_string()),
            placed_at: Utc::now(),
            lines: cart.items().iter().map(OrderLine::from).collect(),
            totals: cart.totals(),
            customer,
        };

        tracing::info!(
            order_id = %order.id,
            email = %order.customer.email,
            items = order.item_count(),
            total = %order.totals.total,
            "Order placed (payment simulated)"
        );
        add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[("order_id", order.id.as_str())]),
        );

        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use streetstyle_core::{Catalog, CheckoutForm, ProductId};

    use super::*;

    fn customer() -> CustomerDetails {
        CheckoutForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 Analytical Way".to_string(),
            city: "London".to_string(),
            zip_code: "10001".to_string(),
            card_number: "4242 4242 4242 4242".to_string(),
            expiry_date: "09/29".to_string(),
            cvv: "123".to_string(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_place_order_snapshots_cart() {
        let catalog = Catalog::builtin().unwrap();
        let shirt = catalog.get_by_id(&ProductId::from("1")).unwrap();
        let mut cart = Cart::new();
        cart.add_item(shirt, "M", "Black", 2).unwrap();

        let order = SimulatedCheckout::new()
            .place_order(customer(), &cart)
            .unwrap();

        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.lines[0].product_name, shirt.name);
        assert_eq!(order.lines[0].line_price, shirt.price * 2_u32);
        assert_eq!(order.totals, cart.totals());
        assert_eq!(order.customer.card_last_four, "4242");
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_order_ids_are_unique() {
        let catalog = Catalog::builtin().unwrap();
        let shirt = catalog.get_by_id(&ProductId::from("2")).unwrap();
        let mut cart = Cart::new();
        cart.add_item(shirt, &shirt.sizes[0], &shirt.colors[0], 1)
            .unwrap();

        let checkout = SimulatedCheckout::new();
        let first = checkout.place_order(customer(), &cart).unwrap();
        let second = checkout.place_order(customer(), &cart).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let result = SimulatedCheckout::new().place_order(customer(), &Cart::new());
        assert_eq!(result.unwrap_err(), CheckoutError::EmptyCart);
    }
}
