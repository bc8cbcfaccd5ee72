//! Authentication Fixture Tests
//!
//! Runs the fixture against a local stand-in for the auth service.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use fake::{faker::internet::en::SafeEmail, faker::internet::en::Password, Fake};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::net::TcpListener;

use docsign_web::testing::{AuthFixture, BrowserPage, FixtureError, HttpPage, LoginOptions};

const SESSION_COOKIE: &str = "next-auth.session-token=signed-in";

type Posts = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

#[derive(Clone)]
struct MockAuth {
    csrf_token: Option<&'static str>,
    posts: Posts,
}

async fn csrf(State(auth): State<MockAuth>) -> Json<serde_json::Value> {
    match auth.csrf_token {
        Some(token) => Json(json!({ "csrfToken": token })),
        None => Json(json!({})),
    }
}

async fn credentials(
    State(auth): State<MockAuth>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    auth.posts.lock().push(("credentials".into(), form));
    (
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
        Json(json!({ "url": "/" })),
    )
        .into_response()
}

async fn signout(State(auth): State<MockAuth>, Form(form): Form<HashMap<String, String>>) -> Response {
    auth.posts.lock().push(("signout".into(), form));
    (
        [(
            header::SET_COOKIE,
            "next-auth.session-token=; Path=/; Max-Age=0".to_string(),
        )],
        Json(json!({ "url": "/signin" })),
    )
        .into_response()
}

/// Signed-in pages bounce anonymous visitors to `/signin`.
async fn protected(headers: HeaderMap) -> Response {
    let signed_in = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|cookie| cookie.contains(SESSION_COOKIE));

    if signed_in {
        "page".into_response()
    } else {
        Redirect::to("/signin").into_response()
    }
}

async fn spawn_auth_server(csrf_token: Option<&'static str>) -> (String, Posts) {
    let posts: Posts = Arc::default();
    let state = MockAuth {
        csrf_token,
        posts: posts.clone(),
    };

    let app = Router::new()
        .route("/api/auth/csrf", get(csrf))
        .route("/api/auth/callback/credentials", post(credentials))
        .route("/api/auth/signout", post(signout))
        .route("/documents", get(protected))
        .route("/templates", get(protected))
        .route("/signin", get(|| async { "sign in" }))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), posts)
}

#[tokio::test]
async fn test_sign_in_posts_credentials_and_lands_on_documents() {
    let (base_url, posts) = spawn_auth_server(Some("abc")).await;
    let fixture = AuthFixture::new(&base_url);
    let page = HttpPage::new().unwrap();

    let email: String = SafeEmail().fake();
    let password: String = Password(8..16).fake();
    let options = LoginOptions {
        email: email.clone(),
        password: password.clone(),
        ..LoginOptions::default()
    };

    fixture.sign_in(&page, &options).await.unwrap();

    let posts = posts.lock().clone();
    assert_eq!(posts.len(), 1);
    let (endpoint, form) = &posts[0];
    assert_eq!(endpoint, "credentials");
    assert_eq!(form["csrfToken"], "abc");
    assert_eq!(form["email"], email);
    assert_eq!(form["password"], password);
    assert_eq!(form["json"], "true");

    assert_eq!(page.url(), Some(format!("{}/documents", base_url)));
}

#[tokio::test]
async fn test_sign_in_with_default_options() {
    let (base_url, posts) = spawn_auth_server(Some("abc")).await;
    let fixture = AuthFixture::new(&base_url);
    let page = HttpPage::new().unwrap();

    fixture
        .sign_in(&page, &LoginOptions::default())
        .await
        .unwrap();

    let posts = posts.lock().clone();
    assert_eq!(posts[0].1["email"], "example@documenso.com");
    assert_eq!(posts[0].1["password"], "password");
}

#[tokio::test]
async fn test_sign_in_honours_redirect_path() {
    let (base_url, _posts) = spawn_auth_server(Some("abc")).await;
    let fixture = AuthFixture::new(&base_url);
    let page = HttpPage::new().unwrap();

    let options = LoginOptions {
        redirect_path: "/templates".into(),
        ..LoginOptions::default()
    };
    fixture.sign_in(&page, &options).await.unwrap();

    assert_eq!(page.url(), Some(format!("{}/templates", base_url)));
}

#[tokio::test]
async fn test_missing_csrf_token_fails_before_posting() {
    let (base_url, posts) = spawn_auth_server(None).await;
    let fixture = AuthFixture::new(&base_url);
    let page = HttpPage::new().unwrap();

    let result = fixture.sign_in(&page, &LoginOptions::default()).await;

    assert!(matches!(result, Err(FixtureError::InvalidSession)));
    assert!(posts.lock().is_empty());
    assert!(page.url().is_none());
}

#[tokio::test]
async fn test_empty_csrf_token_is_rejected() {
    let (base_url, posts) = spawn_auth_server(Some("")).await;
    let fixture = AuthFixture::new(&base_url);
    let page = HttpPage::new().unwrap();

    let result = fixture.sign_out(&page).await;

    assert!(matches!(result, Err(FixtureError::InvalidSession)));
    assert!(posts.lock().is_empty());
}

#[tokio::test]
async fn test_sign_out_posts_token_and_lands_on_signin() {
    let (base_url, posts) = spawn_auth_server(Some("xyz")).await;
    let fixture = AuthFixture::new(&base_url);
    let page = HttpPage::new().unwrap();

    fixture
        .sign_in(&page, &LoginOptions::default())
        .await
        .unwrap();
    fixture.sign_out(&page).await.unwrap();

    let posts = posts.lock().clone();
    assert_eq!(posts.len(), 2);
    let (endpoint, form) = &posts[1];
    assert_eq!(endpoint, "signout");
    assert_eq!(form["csrfToken"], "xyz");
    assert_eq!(form["json"], "true");

    assert_eq!(page.url(), Some(format!("{}/signin", base_url)));

    // The cleared cookie means signed-in pages bounce again.
    page.goto(&format!("{}/documents", base_url)).await.unwrap();
    assert_eq!(page.url(), Some(format!("{}/signin", base_url)));
}
