//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. Route handlers return `Result<T, AppError>`.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use streetstyle_core::{CartError, CatalogError, CheckoutError};
use thiserror::Error;
use tower_sessions::Session;

use crate::filters;
use crate::models::cart_count;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Catalog lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart rejected the requested change.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout could not be completed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Not-found page, rendered for unknown products and routes.
#[derive(Template)]
#[template(path = "errors/not_found.html")]
pub struct NotFoundPage {
    message: String,
    cart_count: u64,
}

impl NotFoundPage {
    /// Page with the visitor's cart badge.
    pub async fn for_session(session: &Session, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cart_count: cart_count(session).await,
        }
    }
}

impl IntoResponse for NotFoundPage {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
            Err(e) => AppError::Internal(format!("not-found page failed to render: {e}"))
                .into_response(),
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Catalog(CatalogError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Cart(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Checkout(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Message safe to show to the client.
    fn public_message(&self) -> String {
        match self {
            Self::Session(_) | Self::Internal(_) | Self::Catalog(_)
                if self.status().is_server_error() =>
            {
                "Internal server error".to_string()
            }
            Self::Catalog(CatalogError::NotFound(_)) => "Product not found".to_string(),
            Self::Cart(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Client error");
        }

        let message = self.public_message();

        if status == StatusCode::NOT_FOUND {
            return NotFoundPage {
                message,
                cart_count: 0,
            }
            .into_response();
        }

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

/// Fallback handler for unknown routes.
pub async fn not_found(session: Session) -> NotFoundPage {
    tracing::debug!("No route matched");
    NotFoundPage::for_session(&session, "The page you are looking for does not exist.").await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use streetstyle_core::ProductId;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Catalog(CatalogError::NotFound(ProductId::from("9")))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Catalog(CatalogError::DuplicateId(ProductId::from("9")))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::InvalidQuantity)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::EmptyCart)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Internal("db password leaked".to_string());
        assert_eq!(err.public_message(), "Internal server error");

        let err = AppError::Catalog(CatalogError::DuplicateId(ProductId::from("9")));
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_not_found_page_shows_badge() {
        let page = NotFoundPage {
            message: "Product not found".to_string(),
            cart_count: 2,
        };
        let html = page.render().unwrap();
        assert!(html.contains("Product not found"));
        assert!(html.contains(r#"<span class="cart-count""#));

        let resp = page.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_client_errors_keep_details() {
        let err = AppError::Cart(CartError::InvalidQuantity);
        assert_eq!(err.public_message(), "quantity must be at least 1");

        let err = AppError::Catalog(CatalogError::NotFound(ProductId::from("9")));
        assert_eq!(err.public_message(), "Product not found");
    }
}
