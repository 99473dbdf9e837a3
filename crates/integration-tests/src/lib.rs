//! Test harness for the StreetStyle storefront.
//!
//! [`TestApp::spawn`] serves the full storefront router on an ephemeral port
//! and returns clients that share one cookie jar, so a test behaves like a
//! single browser session.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p streetstyle-integration-tests
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::{Client, Response, cookie::Jar, redirect::Policy};
use streetstyle_storefront::{app, config::StorefrontConfig, state::AppState};
use tokio::net::TcpListener;

/// A running storefront plus a browser-like client.
pub struct TestApp {
    pub base_url: String,
    /// Follows redirects, like a browser after a form post.
    pub client: Client,
    /// Same cookies, but returns redirects as-is.
    pub no_redirect: Client,
}

impl TestApp {
    /// Start the storefront on `127.0.0.1` with a random port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind or the catalog fails to load.
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let mut config = StorefrontConfig::local();
        config.port = addr.port();
        config.base_url = format!("http://{addr}");
        config.static_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/static");

        let state = AppState::new(config).expect("Failed to load catalog");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()
            .expect("Failed to build client");
        let no_redirect = Client::builder()
            .cookie_provider(jar)
            .redirect(Policy::none())
            .build()
            .expect("Failed to build client");

        Self {
            base_url: format!("http://{addr}"),
            client,
            no_redirect,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path`, following redirects.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// GET `path` and return the body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not text.
    pub async fn get_text(&self, path: &str) -> String {
        self.get(path).await.text().await.expect("Body was not text")
    }

    /// POST a form to `path`, following redirects.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// POST a form to `path` without following the redirect.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form_no_redirect(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.no_redirect
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Add a product variant to the cart.
    pub async fn add_to_cart(&self, product_id: &str, size: &str, color: &str, quantity: u32) -> Response {
        let quantity = quantity.to_string();
        self.post_form(
            "/cart/add",
            &[
                ("product_id", product_id),
                ("size", size),
                ("color", color),
                ("quantity", &quantity),
            ],
        )
        .await
    }

    /// Contents of the cart count badge fragment.
    pub async fn cart_badge(&self) -> String {
        self.get_text("/cart/count").await
    }
}

/// A checkout form that passes validation.
#[must_use]
pub fn valid_checkout_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("first_name", "Ada"),
        ("last_name", "Lovelace"),
        ("email", "ada@example.com"),
        ("address", "12 Analytical Way"),
        ("city", "London"),
        ("zip_code", "10001"),
        ("card_number", "4242 4242 4242 4242"),
        ("expiry_date", "09/29"),
        ("cvv", "123"),
    ]
}
