//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use streetstyle_core::SortOrder;
use tower_sessions::Session;
use tracing::instrument;

use super::products::{CategoryLinkView, ProductCardView, listing_href};
use crate::filters;
use crate::models::cart_count;
use crate::state::AppState;

/// Number of products shown in the featured grid.
const FEATURED_COUNT: usize = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured: Vec<ProductCardView>,
    pub categories: Vec<CategoryLinkView>,
    pub cart_count: u64,
}

/// Display home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let catalog = state.catalog();

    let featured = catalog
        .featured(FEATURED_COUNT)
        .iter()
        .map(ProductCardView::from)
        .collect();

    let categories = catalog
        .categories()
        .into_iter()
        .map(|category| CategoryLinkView {
            label: category.to_string(),
            href: listing_href(category, SortOrder::Featured),
            active: false,
        })
        .collect();

    HomeTemplate {
        featured,
        categories,
        cart_count: cart_count(&session).await,
    }
}
