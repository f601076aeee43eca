//! Identity resolution through the full cookie -> token -> base auth stack

use actix_web::dev::Service;
use actix_web::http::{header::COOKIE, StatusCode};
use actix_web::{test, web, App, HttpResponse};
use async_trait::async_trait;
use cookie_token_auth::auth::{Claims, Identity, TokenDecoder, TOKEN_ALGORITHM};
use cookie_token_auth::error::{AppError, DatabaseError};
use cookie_token_auth::middleware::TokenAuthStack;
use cookie_token_auth::users::{InMemoryUserStore, User, UserStore};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const SECRET: &str = "test-secret-key-at-least-32-characters-long";

fn user(id: i64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{}@example.com", username),
        is_active: true,
        is_staff: false,
        date_joined: chrono::Utc::now(),
    }
}

fn sign(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::new(TOKEN_ALGORITHM),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign token")
}

fn expiring_in(user_id: i64, seconds: i64) -> Claims {
    Claims {
        user_id,
        exp: Some(chrono::Utc::now().timestamp() + seconds),
    }
}

fn not_yet_valid(user_id: i64) -> String {
    encode(
        &Header::new(TOKEN_ALGORITHM),
        &serde_json::json!({
            "user_id": user_id,
            "nbf": chrono::Utc::now().timestamp() + 3600,
        }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("Failed to sign token")
}

fn credential(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (COOKIE, format!("user-token={}", token))
}

/// Counts how often the application handler is reached.
#[derive(Default)]
struct Hits(AtomicUsize);

async fn whoami(identity: Identity, hits: web::Data<Hits>) -> HttpResponse {
    hits.0.fetch_add(1, Ordering::SeqCst);
    match identity {
        Identity::User(user) => HttpResponse::Ok().body(format!("user:{}", user.id)),
        Identity::Anonymous => HttpResponse::Ok().body("anonymous"),
    }
}

macro_rules! app_with_store {
    ($store:expr, $hits:expr) => {
        test::init_service(
            App::new()
                .app_data($hits.clone())
                .wrap(TokenAuthStack::new(
                    TokenDecoder::new(SECRET),
                    $store,
                    "user-token",
                ))
                .route("/", web::get().to(whoami)),
        )
        .await
    };
}

fn default_store() -> Arc<dyn UserStore> {
    Arc::new(InMemoryUserStore::with_users([user(7, "alice")]))
}

#[actix_web::test]
async fn absent_cookie_falls_back_to_base_default() {
    let hits = web::Data::new(Hits::default());
    let app = app_with_store!(default_store(), hits);

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert_eq!(body, "anonymous");
    assert_eq!(hits.0.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn unrelated_cookies_do_not_resolve_identity() {
    let hits = web::Data::new(Hits::default());
    let app = app_with_store!(default_store(), hits);

    let token = sign(&Claims::new(7), SECRET);
    let req = test::TestRequest::get()
        .uri("/")
        .insert_header((COOKIE, format!("session-token={}; theme=dark", token)))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert_eq!(body, "anonymous");
}

#[actix_web::test]
async fn valid_token_for_existing_user_resolves_user() {
    let hits = web::Data::new(Hits::default());
    let app = app_with_store!(default_store(), hits);

    let token = sign(&expiring_in(7, 3600), SECRET);
    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(credential(&token))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert_eq!(body, "user:7");
}

#[actix_web::test]
async fn valid_token_for_missing_user_is_anonymous() {
    let hits = web::Data::new(Hits::default());
    let app = app_with_store!(default_store(), hits);

    let token = sign(&expiring_in(999, 3600), SECRET);
    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(credential(&token))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert_eq!(body, "anonymous");
    assert_eq!(hits.0.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn user_deleted_after_issuance_is_anonymous() {
    let store = Arc::new(InMemoryUserStore::with_users([user(7, "alice")]));
    let hits = web::Data::new(Hits::default());
    let app = app_with_store!(store.clone(), hits);

    let token = sign(&Claims::new(7), SECRET);
    store.remove(7);

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(credential(&token))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert_eq!(body, "anonymous");
}

#[actix_web::test]
async fn rejected_tokens_never_reach_the_handler() {
    let hits = web::Data::new(Hits::default());
    let app = app_with_store!(default_store(), hits);

    let test_cases = vec![
        ("not-a-token".to_string(), "corrupted token string"),
        (sign(&Claims::new(7), "some-other-secret"), "invalid signature"),
        (format!("{}X", sign(&Claims::new(7), SECRET)), "tampered signature"),
        (sign(&expiring_in(7, -3600), SECRET), "expired token"),
        (not_yet_valid(7), "token not yet valid"),
    ];

    for (token, reason) in test_cases {
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(credential(&token))
            .to_request();

        let err = match app.call(req).await {
            Ok(_) => panic!("Request with {} should fail", reason),
            Err(err) => err,
        };
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED,
            "Unexpected status for {}",
            reason
        );
    }

    assert_eq!(hits.0.load(Ordering::SeqCst), 0);
}

struct UnavailableStore;

#[async_trait]
impl UserStore for UnavailableStore {
    async fn find_by_id(&self, _id: i64) -> Result<Option<User>, AppError> {
        Err(AppError::Database(DatabaseError::ConnectionPool(
            "pool timed out".to_string(),
        )))
    }
}

#[actix_web::test]
async fn store_errors_propagate() {
    let hits = web::Data::new(Hits::default());
    let app = app_with_store!(Arc::new(UnavailableStore), hits);

    let token = sign(&Claims::new(7), SECRET);
    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(credential(&token))
        .to_request();

    let err = match app.call(req).await {
        Ok(_) => panic!("Store failure should abort the request"),
        Err(err) => err,
    };
    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(hits.0.load(Ordering::SeqCst), 0);
}
