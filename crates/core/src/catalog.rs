//! Read-only product catalog.
//!
//! The catalog is built once at startup and shared by every request. It
//! supports lookup by id, case-insensitive category filtering and stable
//! sorting for the product listing page.

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, ProductId};

/// Category filter value that matches every product.
pub const ALL_CATEGORIES: &str = "all";

/// Highest rating a product can carry.
const MAX_RATING: i64 = 5;

/// Errors raised by catalog lookups and construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No product has the requested id.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// Two products share an id.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),

    /// A product violates a catalog invariant.
    #[error("invalid product {id}: {reason}")]
    InvalidProduct {
        /// Offending product.
        id: ProductId,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub price: Price,
    /// Available size labels, in display order.
    pub sizes: Vec<String>,
    /// Available color labels, in display order.
    pub colors: Vec<String>,
    /// Average review score in `[0, 5]`.
    pub rating: Decimal,
}

impl Product {
    /// Whether `size` is one of this product's sizes.
    #[must_use]
    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// Whether `color` is one of this product's colors.
    #[must_use]
    pub fn has_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }

    /// Whether the product belongs to `category`, ignoring case.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }

    /// Check the catalog invariants for a single product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidProduct`] if sizes or colors are empty,
    /// the price is negative, or the rating is outside `[0, 5]`.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason| CatalogError::InvalidProduct {
            id: self.id.clone(),
            reason,
        };

        if self.sizes.is_empty() {
            return Err(invalid("sizes must not be empty"));
        }
        if self.colors.is_empty() {
            return Err(invalid("colors must not be empty"));
        }
        if self.price.is_negative() {
            return Err(invalid("price must not be negative"));
        }
        if self.rating < Decimal::ZERO || self.rating > Decimal::from(MAX_RATING) {
            return Err(invalid("rating must be between 0 and 5"));
        }
        Ok(())
    }
}

/// Ordering applied to the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Featured,
    PriceLowToHigh,
    PriceHighToLow,
    /// Highest rated first.
    Rating,
}

impl SortOrder {
    /// All orders in the sequence the sort menu shows them.
    pub const ALL: [Self; 4] = [
        Self::Featured,
        Self::PriceLowToHigh,
        Self::PriceHighToLow,
        Self::Rating,
    ];

    /// Parse a query-string value. Unknown values fall back to `Featured`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-low" => Self::PriceLowToHigh,
            "price-high" => Self::PriceHighToLow,
            "rating" => Self::Rating,
            _ => Self::Featured,
        }
    }

    /// Query-string value for this order.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLowToHigh => "price-low",
            Self::PriceHighToLow => "price-high",
            Self::Rating => "rating",
        }
    }

    /// Human-readable label for the sort menu.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::PriceLowToHigh => "Price: Low to High",
            Self::PriceHighToLow => "Price: High to Low",
            Self::Rating => "Top Rated",
        }
    }

    /// Return `items` reordered by this criterion.
    ///
    /// The sort is stable, so products that compare equal keep their input
    /// order.
    #[must_use]
    pub fn sort<'a>(self, items: impl IntoIterator<Item = &'a Product>) -> Vec<&'a Product> {
        let mut sorted: Vec<&Product> = items.into_iter().collect();
        match self {
            Self::Featured => {}
            Self::PriceLowToHigh => sorted.sort_by(|a, b| a.price.amount.cmp(&b.price.amount)),
            Self::PriceHighToLow => sorted.sort_by(|a, b| b.price.amount.cmp(&a.price.amount)),
            Self::Rating => sorted.sort_by(|a, b| b.rating.cmp(&a.rating)),
        }
        sorted
    }
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// The fixed set of products offered by the store.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from products, in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if any product is invalid or two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            product.validate()?;
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// The StreetStyle t-shirt collection.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in data breaks a catalog invariant.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(builtin_products())
    }

    /// Every product, in catalog order.
    #[must_use]
    pub fn get_all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no product has this id.
    pub fn get_by_id(&self, id: &ProductId) -> Result<&Product, CatalogError> {
        self.products
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Products in `category` (case-insensitive), in catalog order.
    ///
    /// `"all"` in any case, or an empty string, returns every product.
    #[must_use]
    pub fn filter_by_category(&self, category: &str) -> Vec<&Product> {
        let category = category.trim();
        if category.is_empty() || category.eq_ignore_ascii_case(ALL_CATEGORIES) {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| p.in_category(category))
            .collect()
    }

    /// Reorder `items` by `order`. See [`SortOrder::sort`].
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn sort_by<'a>(
        &self,
        order: SortOrder,
        items: impl IntoIterator<Item = &'a Product>,
    ) -> Vec<&'a Product> {
        order.sort(items)
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| seen.insert(c.to_lowercase()))
            .collect()
    }

    /// The first `count` products, for the home page.
    #[must_use]
    pub fn featured(&self, count: usize) -> &[Product] {
        let end = count.min(self.products.len());
        self.products.get(..end).unwrap_or_default()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    description: &str,
    cents: i64,
    sizes: &[&str],
    colors: &[&str],
    category: &str,
    rating_tenths: i64,
) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_owned(),
        description: description.to_owned(),
        category: category.to_owned(),
        image_url: format!("/static/images/tshirt{id}.svg"),
        price: Price::usd_cents(cents),
        sizes: sizes.iter().map(|s| (*s).to_owned()).collect(),
        colors: colors.iter().map(|c| (*c).to_owned()).collect(),
        rating: Decimal::new(rating_tenths, 1),
    }
}

#[allow(clippy::too_many_lines)]
fn builtin_products() -> Vec<Product> {
    vec![
        product(
            "1",
            "Classic White Tee",
            "Premium cotton t-shirt with a comfortable fit and durable construction.",
            2499,
            &["S", "M", "L", "XL"],
            &["White", "Black", "Gray"],
            "Basic",
            45,
        ),
        product(
            "2",
            "Graphic Print Tee",
            "Eye-catching graphic print on high-quality fabric for a bold statement.",
            2999,
            &["S", "M", "L", "XL", "XXL"],
            &["Black", "White"],
            "Graphic",
            47,
        ),
        product(
            "3",
            "V-Neck Summer Shirt",
            "Lightweight v-neck t-shirt perfect for warm weather and casual outings.",
            2799,
            &["S", "M", "L", "XL"],
            &["Navy", "White", "Red"],
            "Summer",
            43,
        ),
        product(
            "4",
            "Pocket Crew Neck",
            "Classic crew neck with chest pocket for a timeless casual look.",
            2699,
            &["S", "M", "L", "XL", "XXL"],
            &["Green", "Blue", "Black"],
            "Casual",
            46,
        ),
        product(
            "5",
            "Slim Fit Polo",
            "Slim fit polo shirt with a soft texture and breathable fabric.",
            3499,
            &["S", "M", "L", "XL"],
            &["Pink", "Blue", "White"],
            "Formal",
            48,
        ),
        product(
            "6",
            "Oversized Comfort Tee",
            "Extra roomy fit for ultimate comfort and relaxed style.",
            3199,
            &["M", "L", "XL", "XXL"],
            &["Black", "Gray", "White"],
            "Comfort",
            44,
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// A minimal valid product for tests.
    pub(crate) fn sample(id: &str, cents: i64, rating_tenths: i64, category: &str) -> Product {
        product(
            id,
            &format!("Shirt {id}"),
            "",
            cents,
            &["S", "M"],
            &["Black"],
            category,
            rating_tenths,
        )
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.get_all().first().unwrap().name, "Classic White Tee");
    }

    #[test]
    fn test_get_all_preserves_insertion_order() {
        let catalog = Catalog::builtin().unwrap();
        let ids: Vec<&str> = catalog.get_all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_get_by_id() {
        let catalog = Catalog::builtin().unwrap();
        let product = catalog.get_by_id(&ProductId::from("5")).unwrap();
        assert_eq!(product.name, "Slim Fit Polo");
        assert_eq!(product.price, Price::usd_cents(3499));
    }

    #[test]
    fn test_get_by_id_not_found() {
        let catalog = Catalog::builtin().unwrap();
        let err = catalog.get_by_id(&ProductId::from("99")).unwrap_err();
        assert_eq!(err, CatalogError::NotFound(ProductId::from("99")));
    }

    #[test]
    fn test_filter_by_category_case_insensitive() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(ids(&catalog.filter_by_category("graphic")), ["2"]);
        assert_eq!(ids(&catalog.filter_by_category("GRAPHIC")), ["2"]);
    }

    #[test]
    fn test_filter_by_category_all_sentinel() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.filter_by_category("all").len(), 6);
        assert_eq!(catalog.filter_by_category("All").len(), 6);
        assert_eq!(catalog.filter_by_category("").len(), 6);
    }

    #[test]
    fn test_filter_by_unknown_category_is_empty() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.filter_by_category("hoodies").is_empty());
    }

    #[test]
    fn test_sort_featured_is_identity() {
        let catalog = Catalog::builtin().unwrap();
        let sorted = catalog.sort_by(SortOrder::Featured, catalog.get_all());
        assert_eq!(ids(&sorted), ["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_sort_price_low_to_high() {
        let catalog = Catalog::builtin().unwrap();
        let sorted = catalog.sort_by(SortOrder::PriceLowToHigh, catalog.get_all());
        assert_eq!(ids(&sorted), ["1", "4", "3", "2", "6", "5"]);
        assert!(sorted.windows(2).all(|w| w[0].price <= w[1].price));
    }

    #[test]
    fn test_sort_price_high_to_low() {
        let catalog = Catalog::builtin().unwrap();
        let sorted = catalog.sort_by(SortOrder::PriceHighToLow, catalog.get_all());
        assert_eq!(ids(&sorted), ["5", "6", "2", "3", "4", "1"]);
        assert!(sorted.windows(2).all(|w| w[0].price >= w[1].price));
    }

    #[test]
    fn test_sort_rating_descending() {
        let catalog = Catalog::builtin().unwrap();
        let sorted = catalog.sort_by(SortOrder::Rating, catalog.get_all());
        assert_eq!(ids(&sorted), ["5", "2", "4", "1", "6", "3"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let products = vec![
            sample("a", 1000, 40, "Basic"),
            sample("b", 500, 45, "Basic"),
            sample("c", 1000, 40, "Basic"),
            sample("d", 1000, 45, "Basic"),
        ];
        let catalog = Catalog::new(products).unwrap();

        let by_price = catalog.sort_by(SortOrder::PriceLowToHigh, catalog.get_all());
        assert_eq!(ids(&by_price), ["b", "a", "c", "d"]);

        let by_price_desc = catalog.sort_by(SortOrder::PriceHighToLow, catalog.get_all());
        assert_eq!(ids(&by_price_desc), ["a", "c", "d", "b"]);

        let by_rating = catalog.sort_by(SortOrder::Rating, catalog.get_all());
        assert_eq!(ids(&by_rating), ["b", "d", "a", "c"]);
    }

    #[test]
    fn test_sort_after_filter() {
        let products = vec![
            sample("a", 3000, 40, "Basic"),
            sample("b", 500, 45, "Graphic"),
            sample("c", 1000, 40, "basic"),
        ];
        let catalog = Catalog::new(products).unwrap();
        let basics = catalog.filter_by_category("Basic");
        let sorted = catalog.sort_by(SortOrder::PriceLowToHigh, basics);
        assert_eq!(ids(&sorted), ["c", "a"]);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("price-low"), SortOrder::PriceLowToHigh);
        assert_eq!(SortOrder::parse("price-high"), SortOrder::PriceHighToLow);
        assert_eq!(SortOrder::parse("rating"), SortOrder::Rating);
        assert_eq!(SortOrder::parse("featured"), SortOrder::Featured);
        assert_eq!(SortOrder::parse("bogus"), SortOrder::Featured);
        for order in SortOrder::ALL {
            assert_eq!(SortOrder::parse(order.as_str()), order);
        }
    }

    #[test]
    fn test_categories_in_first_appearance_order() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            catalog.categories(),
            ["Basic", "Graphic", "Summer", "Casual", "Formal", "Comfort"]
        );
    }

    #[test]
    fn test_categories_deduplicate_ignoring_case() {
        let products = vec![
            sample("a", 100, 40, "Basic"),
            sample("b", 100, 40, "basic"),
            sample("c", 100, 40, "Graphic"),
        ];
        let catalog = Catalog::new(products).unwrap();
        assert_eq!(catalog.categories(), ["Basic", "Graphic"]);
    }

    #[test]
    fn test_featured() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.featured(3).len(), 3);
        assert_eq!(catalog.featured(100).len(), 6);
        assert!(catalog.featured(0).is_empty());
    }

    #[test]
    fn test_new_rejects_duplicate_ids() {
        let products = vec![sample("a", 100, 40, "Basic"), sample("a", 200, 40, "Basic")];
        assert_eq!(
            Catalog::new(products).unwrap_err(),
            CatalogError::DuplicateId(ProductId::from("a"))
        );
    }

    #[test]
    fn test_new_rejects_invalid_products() {
        let mut no_sizes = sample("a", 100, 40, "Basic");
        no_sizes.sizes.clear();
        assert!(matches!(
            Catalog::new(vec![no_sizes]),
            Err(CatalogError::InvalidProduct { .. })
        ));

        let mut no_colors = sample("b", 100, 40, "Basic");
        no_colors.colors.clear();
        assert!(Catalog::new(vec![no_colors]).is_err());

        assert!(Catalog::new(vec![sample("c", -1, 40, "Basic")]).is_err());
        assert!(Catalog::new(vec![sample("d", 100, 51, "Basic")]).is_err());
        assert!(Catalog::new(vec![sample("e", 100, -1, "Basic")]).is_err());
        assert!(Catalog::new(vec![sample("f", 0, 50, "Basic")]).is_ok());
    }
}
