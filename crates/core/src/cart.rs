//! Shopping cart state.
//!
//! A [`Cart`] is owned by exactly one visitor session. It holds at most one
//! line item per `(product, size, color)` variant, keeps lines in the order
//! they were first added, and never holds a line with quantity zero.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;
use crate::checkout::OrderTotals;
use crate::types::{Price, ProductId};

/// Errors raised when adding to the cart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The size is not offered for this product.
    #[error("size {size} is not available for {product_id}")]
    UnknownSize { product_id: ProductId, size: String },

    /// The color is not offered for this product.
    #[error("color {color} is not available for {product_id}")]
    UnknownColor { product_id: ProductId, color: String },

    /// Adding would push the line past the maximum quantity.
    #[error("quantity for {0} is too large")]
    QuantityOverflow(ProductId),
}

/// Identifies one variant line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
}

impl LineKey {
    /// Build a key from its parts.
    #[must_use]
    pub fn new(product_id: ProductId, size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            product_id,
            size: size.into(),
            color: color.into(),
        }
    }
}

/// One product variant and how many of it are in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product as it was when added.
    pub product: Product,
    pub size: String,
    pub color: String,
    /// Always at least one.
    pub quantity: u32,
}

impl CartLineItem {
    /// Price of one unit.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.product.price
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.product.price * self.quantity
    }

    /// The variant key for this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product.id.clone(), &self.size, &self.color)
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product.id == key.product_id && self.size == key.size && self.color == key.color
    }
}

/// The shopping cart for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add `quantity` of a product variant.
    ///
    /// If the same `(product, size, color)` is already in the cart its
    /// quantity is increased; otherwise a new line is appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if `quantity` is zero, `size` or `color` is not
    /// offered for the product, or the line quantity would overflow.
    pub fn add_item(
        &mut self,
        product: &Product,
        size: &str,
        color: &str,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if !product.has_size(size) {
            return Err(CartError::UnknownSize {
                product_id: product.id.clone(),
                size: size.to_owned(),
            });
        }
        if !product.has_color(color) {
            return Err(CartError::UnknownColor {
                product_id: product.id.clone(),
                color: color.to_owned(),
            });
        }

        let key = LineKey::new(product.id.clone(), size, color);
        if let Some(line) = self.items.iter_mut().find(|line| line.matches(&key)) {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| CartError::QuantityOverflow(product.id.clone()))?;
        } else {
            self.items.push(CartLineItem {
                product: product.clone(),
                size: key.size,
                color: key.color,
                quantity,
            });
        }
        Ok(())
    }

    /// Remove every line for `product_id`, whatever its size or color.
    ///
    /// Does nothing if the product is not in the cart.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.items.retain(|line| &line.product.id != product_id);
    }

    /// Remove the single line identified by `key`.
    ///
    /// Does nothing if no line matches.
    pub fn remove_line(&mut self, key: &LineKey) {
        self.items.retain(|line| !line.matches(key));
    }

    /// Set the quantity of every line for `product_id`.
    ///
    /// A quantity of zero or less removes those lines.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        for line in self
            .items
            .iter_mut()
            .filter(|line| &line.product.id == product_id)
        {
            line.quantity = quantity;
        }
    }

    /// Set the quantity of the line identified by `key`.
    ///
    /// A quantity of zero or less removes the line.
    pub fn update_line_quantity(&mut self, key: &LineKey, quantity: i64) {
        if quantity <= 0 {
            self.remove_line(key);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.items.iter_mut().find(|line| line.matches(key)) {
            line.quantity = quantity;
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Line items in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of unit price times quantity across all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartLineItem::line_price).sum()
    }

    /// Subtotal, shipping, tax and grand total for the current contents.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        OrderTotals::for_subtotal(self.total_price())
    }
}
