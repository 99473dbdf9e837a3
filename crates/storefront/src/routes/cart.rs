//! Cart route handlers.
//!
//! The cart is stored in the session. Mutations are plain form posts that
//! redirect back to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use streetstyle_core::{Cart, CartError, CartLineItem, LineKey, OrderTotals, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::{load_cart, store_cart};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub image_url: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub decrement_quantity: i64,
    pub increment_quantity: i64,
    pub price: String,
    pub line_price: String,
}

impl From<&CartLineItem> for CartItemView {
    fn from(item: &CartLineItem) -> Self {
        let quantity = i64::from(item.quantity);
        Self {
            product_id: item.product.id.to_string(),
            name: item.product.name.clone(),
            image_url: item.product.image_url.clone(),
            size: item.size.clone(),
            color: item.color.clone(),
            quantity: item.quantity,
            decrement_quantity: quantity - 1,
            increment_quantity: quantity + 1,
            price: item.unit_price().display(),
            line_price: item.line_price().display(),
        }
    }
}

/// Formatted order summary.
#[derive(Clone)]
pub struct TotalsView {
    pub subtotal: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
}

impl From<&OrderTotals> for TotalsView {
    fn from(totals: &OrderTotals) -> Self {
        Self {
            subtotal: totals.subtotal.display(),
            shipping: totals.shipping.display(),
            tax: totals.tax.display(),
            total: totals.total.display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub totals: TotalsView,
    pub item_count: u64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            totals: TotalsView::from(&cart.totals()),
            item_count: cart.total_items(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    /// Raw field; blank means one.
    pub quantity: Option<String>,
}

impl AddToCartForm {
    /// Requested quantity. A blank field adds one unit.
    fn quantity(&self) -> std::result::Result<u32, CartError> {
        match self.quantity.as_deref().map(str::trim) {
            None | Some("") => Ok(1),
            Some(raw) => raw.parse().map_err(|_| CartError::InvalidQuantity),
        }
    }
}

/// Update cart form data.
///
/// With `size` and `color` the single matching line is updated; without them
/// every line for the product is.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub quantity: String,
}

impl UpdateCartForm {
    /// Requested quantity, which may be zero or negative.
    fn quantity(&self) -> Result<i64> {
        self.quantity
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid quantity: {:?}", self.quantity)))
    }
}

/// Remove from cart form data. Variant fields behave as in [`UpdateCartForm`].
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
}

/// Line key when both variant fields were submitted.
fn variant_key(product_id: &ProductId, size: &str, color: &str) -> Option<LineKey> {
    let (size, color) = (size.trim(), color.trim());
    (!size.is_empty() && !color.is_empty()).then(|| LineKey::new(product_id.clone(), size, color))
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u64,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart_count: u64,
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;

    Ok(CartShowTemplate {
        cart: CartView::from(&cart),
        cart_count: cart.total_items(),
    })
}

/// Add item to cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<impl IntoResponse> {
    let product_id = ProductId::new(form.product_id.trim());
    let product = state
        .catalog()
        .get_by_id(&product_id)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let quantity = form.quantity()?;

    let mut cart = load_cart(&session).await?;
    cart.add_item(product, form.size.trim(), form.color.trim(), quantity)?;
    store_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[
            ("product_id", product_id.as_str()),
            ("size", form.size.trim()),
            ("color", form.color.trim()),
        ]),
    );
    tracing::debug!(%product_id, quantity, "Added to cart");

    Ok(Redirect::to("/cart"))
}

/// Update cart line quantity. Zero or less removes the line.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<impl IntoResponse> {
    let product_id = ProductId::new(form.product_id.trim());
    let quantity = form.quantity()?;

    let mut cart = load_cart(&session).await?;
    match variant_key(&product_id, &form.size, &form.color) {
        Some(key) => cart.update_line_quantity(&key, quantity),
        None => cart.update_quantity(&product_id, quantity),
    }
    store_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart"))
}

/// Remove item from cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<impl IntoResponse> {
    let product_id = ProductId::new(form.product_id.trim());

    let mut cart = load_cart(&session).await?;
    match variant_key(&product_id, &form.size, &form.color) {
        Some(key) => cart.remove_line(&key),
        None => cart.remove_item(&product_id),
    }
    store_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<impl IntoResponse> {
    store_cart(&session, &Cart::new()).await?;
    add_breadcrumb("cart", "Cleared cart", None);
    Ok(Redirect::to("/cart"))
}

/// Get cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    Ok(CartCountTemplate {
        cart_count: cart.total_items(),
    })
}
