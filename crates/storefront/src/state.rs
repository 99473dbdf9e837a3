//! Application state shared across handlers.

use std::sync::Arc;

use streetstyle_core::{Catalog, CatalogError};

use crate::config::StorefrontConfig;
use crate::services::SimulatedCheckout;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// product catalog, the checkout service and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    checkout: SimulatedCheckout,
}

impl AppState {
    /// Create application state backed by the built-in product line.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in catalog fails validation.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        Ok(Self::with_catalog(config, Catalog::builtin()?))
    }

    /// Create application state around an already-built catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                checkout: SimulatedCheckout::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &SimulatedCheckout {
        &self.inner.checkout
    }
}
