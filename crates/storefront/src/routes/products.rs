//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use streetstyle_core::{ALL_CATEGORIES, CatalogError, Product, ProductId, SortOrder};
use tower_sessions::Session;
use tracing::instrument;
use url::form_urlencoded;

use crate::error::{NotFoundPage, Result};
use crate::filters;
use crate::models::cart_count;
use crate::state::AppState;

/// Product card data for listings.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub rating: String,
    pub image_url: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.display(),
            rating: product.rating.to_string(),
            image_url: product.image_url.clone(),
        }
    }
}

/// Full product data for the detail page.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub rating: String,
    pub image_url: String,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price.display(),
            rating: product.rating.to_string(),
            image_url: product.image_url.clone(),
            sizes: product.sizes.clone(),
            colors: product.colors.clone(),
        }
    }
}

/// Category filter link.
#[derive(Clone)]
pub struct CategoryLinkView {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Sort menu entry.
#[derive(Clone)]
pub struct SortOptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub categories: Vec<CategoryLinkView>,
    pub sort_options: Vec<SortOptionView>,
    pub category: String,
    pub cart_count: u64,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
    pub related: Vec<ProductCardView>,
    pub cart_count: u64,
}

/// Build a `/products` URL for a category and sort order.
pub(crate) fn listing_href(category: &str, sort: SortOrder) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if !category.eq_ignore_ascii_case(ALL_CATEGORIES) {
        query.append_pair("category", category);
    }
    if sort != SortOrder::Featured {
        query.append_pair("sort", sort.as_str());
    }
    let query = query.finish();
    if query.is_empty() {
        "/products".to_string()
    } else {
        format!("/products?{query}")
    }
}

fn category_links(categories: &[&str], active: &str, sort: SortOrder) -> Vec<CategoryLinkView> {
    std::iter::once(ALL_CATEGORIES)
        .chain(categories.iter().copied())
        .map(|category| CategoryLinkView {
            label: if category == ALL_CATEGORIES {
                "All".to_string()
            } else {
                category.to_string()
            },
            href: listing_href(category, sort),
            active: category.eq_ignore_ascii_case(active),
        })
        .collect()
}

/// Display product listing, filtered by category and sorted.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListingQuery>,
) -> impl IntoResponse {
    let catalog = state.catalog();

    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(ALL_CATEGORIES)
        .to_string();
    let sort = query.sort.as_deref().map(SortOrder::parse).unwrap_or_default();

    let products = catalog
        .sort_by(sort, catalog.filter_by_category(&category))
        .into_iter()
        .map(ProductCardView::from)
        .collect();

    let sort_options = SortOrder::ALL
        .iter()
        .map(|order| SortOptionView {
            value: order.as_str(),
            label: order.label(),
            selected: *order == sort,
        })
        .collect();

    ProductsIndexTemplate {
        products,
        categories: category_links(&catalog.categories(), &category, sort),
        sort_options,
        category,
        cart_count: cart_count(&session).await,
    }
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let catalog = state.catalog();
    let product = match catalog.get_by_id(&ProductId::new(id)) {
        Ok(product) => product,
        Err(CatalogError::NotFound(id)) => {
            tracing::debug!(%id, "Unknown product");
            return Ok(NotFoundPage::for_session(&session, "Product not found")
                .await
                .into_response());
        }
        Err(e) => return Err(e.into()),
    };

    // Same category first, then the rest of the line.
    let (same, other): (Vec<&Product>, Vec<&Product>) = catalog
        .get_all()
        .iter()
        .filter(|p| p.id != product.id)
        .partition(|p| p.in_category(&product.category));
    let related = same
        .into_iter()
        .chain(other)
        .take(3)
        .map(ProductCardView::from)
        .collect();

    Ok(ProductShowTemplate {
        product: ProductDetailView::from(product),
        related,
        cart_count: cart_count(&session).await,
    }
    .into_response())
}
