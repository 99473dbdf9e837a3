//! Checkout flow over HTTP.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use streetstyle_integration_tests::{TestApp, valid_checkout_form};

fn form_with(field: &'static str, value: &'static str) -> Vec<(&'static str, &'static str)> {
    valid_checkout_form()
        .into_iter()
        .map(|(k, v)| if k == field { (k, value) } else { (k, v) })
        .collect()
}

#[tokio::test]
async fn test_checkout_page_with_empty_cart() {
    let app = TestApp::spawn().await;

    let body = app.get_text("/checkout").await;
    assert!(body.contains("Your cart is empty."));
    assert!(!body.contains(r#"action="/checkout""#));
}

#[tokio::test]
async fn test_checkout_page_shows_summary() {
    let app = TestApp::spawn().await;
    app.add_to_cart("1", "M", "White", 2).await;

    let body = app.get_text("/checkout").await;
    assert!(body.contains(r#"action="/checkout""#));
    assert!(body.contains("Classic White Tee"));
    assert!(body.contains("$59.97"));
}

#[tokio::test]
async fn test_submit_with_empty_cart_redirects_to_cart() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form_no_redirect("/checkout", &valid_checkout_form())
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/cart");
}

#[tokio::test]
async fn test_invalid_form_is_rerendered_without_payment_fields() {
    let app = TestApp::spawn().await;
    app.add_to_cart("1", "M", "White", 1).await;

    let resp = app
        .post_form("/checkout", &form_with("card_number", "1234"))
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = resp.text().await.unwrap();
    assert!(body.contains("card number must be 12 to 19 digits"));
    assert!(body.contains(r#"value="Ada""#));
    assert!(!body.contains("1234\""));
    // Nothing was ordered.
    assert!(app.cart_badge().await.contains(">1<"));
}

#[tokio::test]
async fn test_each_field_is_validated() {
    let app = TestApp::spawn().await;
    app.add_to_cart("2", "S", "Black", 1).await;

    let cases = [
        (form_with("first_name", " "), "First name is required"),
        (form_with("email", "ada.example.com"), "invalid email"),
        (form_with("expiry_date", "13/30"), "MM/YY"),
        (form_with("cvv", "12"), "CVV must be 3 or 4 digits"),
    ];
    for (form, message) in cases {
        let resp = app.post_form("/checkout", &form).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(resp.text().await.unwrap().contains(message), "{message}");
    }
}

#[tokio::test]
async fn test_successful_order_clears_cart_and_confirms() {
    let app = TestApp::spawn().await;
    app.add_to_cart("1", "M", "White", 2).await;

    let resp = app
        .post_form_no_redirect("/checkout", &valid_checkout_form())
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/checkout/complete");

    let body = app.get_text("/checkout/complete").await;
    assert!(body.contains("Thank you, Ada Lovelace!"));
    assert!(body.contains("Classic White Tee"));
    assert!(body.contains("$59.97"));
    assert!(body.contains("ending in 4242"));

    assert!(!app.cart_badge().await.contains("cart-count"));
    assert!(app.get_text("/cart").await.contains("Your cart is empty."));

    // The confirmation survives a refresh.
    assert!(
        app.get_text("/checkout/complete")
            .await
            .contains("Thank you, Ada Lovelace!")
    );
}

#[tokio::test]
async fn test_confirmation_without_order_redirects() {
    let app = TestApp::spawn().await;

    let resp = app
        .no_redirect
        .get(app.url("/checkout/complete"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/products");
}
