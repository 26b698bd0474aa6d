//! Black-box tests: the real router on an ephemeral port, driven over HTTP.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use reqwest::StatusCode;
use serde_json::json;

use signet_api::app::{AppServices, build_app};
use signet_api::provider::{IdentityProvider, InMemoryIdentityProvider};
use signet_auth::{Role, TokenConfig, TokenIssuer};

const SECRET: &str = "an-integration-test-secret-of-32+";
const ISSUER: &str = "signet-tests";
const AUDIENCE: &str = "signet-clients";
const EXPIRATION_HOURS: i64 = 2;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(provider: Arc<InMemoryIdentityProvider>) -> Self {
        let config =
            TokenConfig::new(SECRET.as_bytes().to_vec(), ISSUER, AUDIENCE, EXPIRATION_HOURS)
                .expect("test token config");
        let app = build_app(AppServices {
            provider,
            issuer: TokenIssuer::new(config),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn decode_token(token: &str) -> serde_json::Value {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_audience(&[AUDIENCE]);

    jsonwebtoken::decode::<serde_json::Value>(
        token,
        &DecodingKey::from_secret(SECRET.as_bytes()),
        &validation,
    )
    .expect("issued token must verify with the shared secret")
    .claims
}

async fn register(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(format!("{base_url}/new-account"))
        .json(&json!({
            "email": email,
            "password": password,
            "confirmedPassword": password,
        }))
        .send()
        .await
        .unwrap()
}

async fn login(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(format!("{base_url}/authenticate"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn register_issues_an_independently_verifiable_token() {
    let srv = TestServer::spawn(Arc::new(InMemoryIdentityProvider::new())).await;
    let client = reqwest::Client::new();

    let res = register(&client, &srv.base_url, "alice@example.com", "hunter2!").await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body.get("errors").is_none());

    let data = &body["data"];
    let token = data["accessToken"].as_str().unwrap();
    assert!(!token.is_empty());
    assert_eq!(
        data["expiresInSeconds"].as_i64().unwrap(),
        EXPIRATION_HOURS * 3600
    );
    assert_eq!(data["email"], "alice@example.com");

    // Stateless verification: signature, issuer, audience, expiry all check
    // out with nothing but the shared secret.
    let claims = decode_token(token);
    assert_eq!(claims["sub"], data["principalId"]);
    assert_eq!(claims["email"], "alice@example.com");
    assert!(claims["jti"].is_string());
    assert_eq!(
        claims["nbf"].as_str().unwrap(),
        claims["iat"].as_i64().unwrap().to_string()
    );
}

#[tokio::test]
async fn register_rejects_malformed_input_with_all_field_errors() {
    let srv = TestServer::spawn(Arc::new(InMemoryIdentityProvider::new())).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/new-account", srv.base_url))
        .json(&json!({
            "email": "not-an-email",
            "password": "abc",
            "confirmedPassword": "different",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body.get("data").is_none());

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0], "email is in an invalid format");
    assert_eq!(errors[1], "password must be between 6 and 100 characters");
    assert_eq!(errors[2], "passwords do not match");
}

#[tokio::test]
async fn duplicate_email_registration_fails_without_a_token() {
    let srv = TestServer::spawn(Arc::new(InMemoryIdentityProvider::new())).await;
    let client = reqwest::Client::new();

    let first = register(&client, &srv.base_url, "dup@example.com", "hunter2!").await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = register(&client, &srv.base_url, "dup@example.com", "hunter2!").await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = second.json().await.unwrap();
    assert!(body.get("data").is_none());
    let errors = body["errors"].as_array().unwrap();
    assert!(errors[0].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn login_returns_roles_and_stored_claims_in_provider_order() {
    let provider = Arc::new(InMemoryIdentityProvider::new());
    let id = provider
        .create_account("carol@example.com", "hunter2!")
        .unwrap();
    provider.assign_roles(id, vec![Role::new("admin"), Role::new("auditor")]);

    let srv = TestServer::spawn(provider).await;
    let client = reqwest::Client::new();

    let res = login(&client, &srv.base_url, "carol@example.com", "hunter2!").await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    let claims = body["data"]["claims"].as_array().unwrap();
    let roles: Vec<&str> = claims
        .iter()
        .filter(|c| c["type"] == "role")
        .map(|c| c["value"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["admin", "auditor"]);

    let token_claims = decode_token(body["data"]["accessToken"].as_str().unwrap());
    assert_eq!(token_claims["role"], json!(["admin", "auditor"]));
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let provider = Arc::new(InMemoryIdentityProvider::new());
    provider
        .create_account("dave@example.com", "hunter2!")
        .unwrap();

    let srv = TestServer::spawn(provider).await;
    let client = reqwest::Client::new();

    let wrong_password = login(&client, &srv.base_url, "dave@example.com", "bad-pass").await;
    let unknown_email = login(&client, &srv.base_url, "ghost@example.com", "bad-pass").await;
    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_email.status(), StatusCode::BAD_REQUEST);

    let a: serde_json::Value = wrong_password.json().await.unwrap();
    let b: serde_json::Value = unknown_email.json().await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a["errors"], json!(["invalid credentials"]));
}

#[tokio::test]
async fn repeated_failures_switch_to_the_lockout_message() {
    let provider = Arc::new(InMemoryIdentityProvider::with_lockout_threshold(3));
    provider
        .create_account("eve@example.com", "hunter2!")
        .unwrap();

    let srv = TestServer::spawn(provider).await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let res = login(&client, &srv.base_url, "eve@example.com", "bad-pass").await;
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["errors"], json!(["invalid credentials"]));
    }

    let res = login(&client, &srv.base_url, "eve@example.com", "bad-pass").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["errors"],
        json!(["account temporarily locked due to repeated invalid attempts"])
    );

    // Correct credentials stay rejected while the lock holds.
    let res = login(&client, &srv.base_url, "eve@example.com", "hunter2!").await;
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["errors"],
        json!(["account temporarily locked due to repeated invalid attempts"])
    );
}

#[tokio::test]
async fn consecutive_logins_issue_distinct_tokens() {
    let provider = Arc::new(InMemoryIdentityProvider::new());
    provider
        .create_account("frank@example.com", "hunter2!")
        .unwrap();

    let srv = TestServer::spawn(provider).await;
    let client = reqwest::Client::new();

    let first: serde_json::Value = login(&client, &srv.base_url, "frank@example.com", "hunter2!")
        .await
        .json()
        .await
        .unwrap();
    let second: serde_json::Value = login(&client, &srv.base_url, "frank@example.com", "hunter2!")
        .await
        .json()
        .await
        .unwrap();

    let t1 = first["data"]["accessToken"].as_str().unwrap();
    let t2 = second["data"]["accessToken"].as_str().unwrap();
    assert_ne!(t1, t2);
    assert_ne!(decode_token(t1)["jti"], decode_token(t2)["jti"]);
}

#[tokio::test]
async fn health_endpoint_is_open() {
    let srv = TestServer::spawn(Arc::new(InMemoryIdentityProvider::new())).await;
    let res = reqwest::get(format!("{}/health", srv.base_url))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
