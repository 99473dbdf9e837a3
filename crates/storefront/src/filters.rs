//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the stylesheet URL, fingerprinted when a build-time hash exists.
///
/// Usage in templates: `{{ ""|stylesheet_url }}`
#[askama::filter_fn]
pub fn stylesheet_url(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(stylesheet_path(env!("CSS_HASH")))
}

fn stylesheet_path(hash: &str) -> String {
    if hash.is_empty() {
        "/static/css/main.css".to_string()
    } else {
        format!("/static/css/derived/main.{hash}.css")
    }
}

/// Renders a rating out of five as filled and empty stars, e.g. `★★★★☆`.
///
/// Usage in templates: `{{ product.rating|stars }}`
#[askama::filter_fn]
pub fn stars(rating: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(star_string(&rating.to_string()))
}

fn star_string(rating: &str) -> String {
    let filled = rating
        .parse::<Decimal>()
        .ok()
        .and_then(|r| {
            r.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .clamp(Decimal::ZERO, Decimal::from(5))
                .to_usize()
        })
        .unwrap_or(0);
    let mut stars = "★".repeat(filled);
    stars.push_str(&"☆".repeat(5 - filled));
    stars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_path() {
        assert_eq!(stylesheet_path(""), "/static/css/main.css");
        assert_eq!(
            stylesheet_path("abcd1234"),
            "/static/css/derived/main.abcd1234.css"
        );
    }

    #[test]
    fn test_star_string() {
        assert_eq!(star_string("4.5"), "★★★★★");
        assert_eq!(star_string("4.2"), "★★★★☆");
        assert_eq!(star_string("0"), "☆☆☆☆☆");
        assert_eq!(star_string("7"), "★★★★★");
        assert_eq!(star_string("n/a"), "☆☆☆☆☆");
    }
}
