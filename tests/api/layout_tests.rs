//! Layout Shell Tests
//!
//! Authenticated sections and public profile pages served end to end.

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::*;

fn server(app: &TestApp) -> TestServer {
    TestServer::new(app.router.clone()).unwrap()
}

#[tokio::test]
async fn test_anonymous_section_redirects_to_signin_without_fetching() {
    let app = TestApp::new();
    let server = server(&app);

    let response = server.get("/documents").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header(header::LOCATION), "/signin");
    assert_eq!(app.site_settings_calls(), 0);
    assert!(app.limits_calls().is_empty());
}

#[tokio::test]
async fn test_signed_in_section_renders_layout() {
    let app = TestApp::new();
    let server = server(&app);

    let response = server
        .get("/templates/12/edit")
        .add_header(header::COOKIE, HeaderValue::from_static(VERIFIED_COOKIE))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["header"]["user"]["email"], "test@example.com");
    assert_eq!(body["header"]["teams"][0]["url"], "contracts");
    assert_eq!(body["limits"]["teamId"], 21);
    assert_eq!(body["limits"]["initialValue"]["remaining"]["documents"], 24);
    assert_eq!(body["appBanner"]["data"]["content"], "New signing flow available");
    assert_eq!(body["verifyEmailBanner"], Value::Null);
    assert_eq!(body["main"]["path"], "/templates/12/edit");
}

#[tokio::test]
async fn test_limits_request_carries_caller_headers_and_team() {
    let app = TestApp::new();
    let server = server(&app);

    server
        .get("/settings")
        .add_header(header::COOKIE, HeaderValue::from_static(VERIFIED_COOKIE))
        .await
        .assert_status_ok();

    assert_eq!(app.site_settings_calls(), 1);
    assert_eq!(
        app.limits_calls(),
        vec![(Some(21), Some(VERIFIED_COOKIE.to_string()))]
    );
}

#[tokio::test]
async fn test_unverified_user_sees_verify_email_banner() {
    let app = TestApp::new();
    let server = server(&app);

    let response = server
        .get("/inbox")
        .add_header(header::COOKIE, HeaderValue::from_static(UNVERIFIED_COOKIE))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["verifyEmailBanner"]["email"], "test@example.com");
}

#[tokio::test]
async fn test_public_profile_for_anonymous_visitor() {
    let app = TestApp::new();
    let server = server(&app);

    let response = server.get("/p/known").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["header"]["variant"], "public");
    assert_eq!(body["header"]["bordered"], false);
    assert_eq!(body["header"]["callToAction"]["href"], "/signup");
    assert_eq!(body["main"]["name"], "Known Person");
}

#[tokio::test]
async fn test_public_profile_for_signed_in_visitor() {
    let app = TestApp::new();
    let server = server(&app);

    let response = server
        .get("/p/known")
        .add_header(header::COOKIE, HeaderValue::from_static(VERIFIED_COOKIE))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["header"]["variant"], "authenticated");
    assert_eq!(body["header"]["user"]["id"], 4);
    // The profile layout does not load limits or banners.
    assert_eq!(app.site_settings_calls(), 0);
    assert!(app.limits_calls().is_empty());
}

#[tokio::test]
async fn test_unknown_profile_renders_not_found_view() {
    let app = TestApp::new();
    let server = server(&app);

    let response = server.get("/p/nobody").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["statusLabel"], "404 Profile not found");
    assert_eq!(body["title"], "Oops! Something went wrong.");
    assert_eq!(body["recovery"]["label"], "Go Back");
    assert_eq!(body["recovery"]["href"], "/");
}
