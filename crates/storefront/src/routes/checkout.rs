//! Checkout route handlers.
//!
//! `POST /checkout` validates the form, places a simulated order, stores it in
//! the session and redirects to the confirmation page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use streetstyle_core::CheckoutForm;
use tower_sessions::Session;
use tracing::instrument;

use super::cart::{CartView, TotalsView};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::{load_cart, session_keys, store_cart};
use crate::services::PlacedOrder;
use crate::state::AppState;

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub form: CheckoutForm,
    pub error: Option<String>,
    pub cart_count: u64,
}

/// Purchased line display data.
#[derive(Clone)]
pub struct OrderLineView {
    pub name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub line_price: String,
}

/// Placed order display data.
#[derive(Clone)]
pub struct OrderView {
    pub id: String,
    pub placed_at: String,
    pub customer_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub card_last_four: String,
    pub lines: Vec<OrderLineView>,
    pub totals: TotalsView,
}

impl From<&PlacedOrder> for OrderView {
    fn from(order: &PlacedOrder) -> Self {
        let customer = &order.customer;
        Self {
            id: order.id.to_string(),
            placed_at: order.placed_at.format("%B %-d, %Y at %H:%M UTC").to_string(),
            customer_name: customer.full_name(),
            email: customer.email.to_string(),
            address: customer.address.clone(),
            city: customer.city.clone(),
            zip_code: customer.zip_code.clone(),
            card_last_four: customer.card_last_four.clone(),
            lines: order
                .lines
                .iter()
                .map(|line| OrderLineView {
                    name: line.product_name.clone(),
                    size: line.size.clone(),
                    color: line.color.clone(),
                    quantity: line.quantity,
                    line_price: line.line_price.display(),
                })
                .collect(),
            totals: TotalsView::from(&order.totals),
        }
    }
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub order: OrderView,
    pub cart_count: u64,
}

/// Display checkout page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;

    Ok(CheckoutTemplate {
        cart: CartView::from(&cart),
        form: CheckoutForm::default(),
        error: None,
        cart_count: cart.total_items(),
    })
}

/// Validate the checkout form and place the order.
///
/// An empty cart sends the visitor back to `/cart`. Invalid input re-renders
/// the form with status 422, keeping everything but the payment fields.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let customer = match form.validate() {
        Ok(customer) => customer,
        Err(e) => {
            tracing::debug!(error = %e, "Checkout form rejected");
            let page = CheckoutTemplate {
                cart: CartView::from(&cart),
                form: form.without_payment(),
                error: Some(e.to_string()),
                cart_count: cart.total_items(),
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let order = state.checkout().place_order(customer, &cart)?;

    session.insert(session_keys::LAST_ORDER, &order).await?;
    cart.clear();
    store_cart(&session, &cart).await?;

    add_breadcrumb(
        "checkout",
        "Cart cleared after order",
        Some(&[("order_id", order.id.as_str())]),
    );

    Ok(Redirect::to("/checkout/complete").into_response())
}

/// Display the confirmation for the last placed order.
///
/// Without an order in the session the visitor is sent to the products page.
#[instrument(skip(session))]
pub async fn complete(session: Session) -> Result<Response> {
    let Some(order) = session
        .get::<PlacedOrder>(session_keys::LAST_ORDER)
        .await?
    else {
        return Ok(Redirect::to("/products").into_response());
    };
    let cart_count = load_cart(&session).await?.total_items();

    Ok(ConfirmationTemplate {
        order: OrderView::from(&order),
        cart_count,
    }
    .into_response())
}
