use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::get,
    Extension, Json, Router,
};
use internlink_backend::middleware::auth::{require_bearer_auth, AuthUser, Claims};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

const TEST_SECRET: &str = "test_secret_key";

fn init_test_config() {
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("DATABASE_URL", "postgres://localhost/internlink_test");
    env::set_var("JWT_SECRET", TEST_SECRET);
    env::set_var("API_RPS", "100");
    let _ = internlink_backend::config::init_config();
}

async fn whoami(Extension(user): Extension<AuthUser>) -> Json<JsonValue> {
    Json(json!({ "id": user.id, "role": user.role }))
}

fn app() -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .layer(axum::middleware::from_fn(require_bearer_auth))
}

fn make_token(sub: &str, role: &str, exp_offset_secs: i64) -> String {
    let exp = (chrono::Utc::now().timestamp() + exp_offset_secs) as usize;
    let claims = Claims {
        sub: sub.to_string(),
        exp,
        role: Some(role.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("encode token")
}

#[tokio::test]
async fn missing_authorization_is_rejected() {
    init_test_config();
    let req = Request::builder()
        .uri("/whoami")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    init_test_config();
    let req = Request::builder()
        .uri("/whoami")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    init_test_config();
    let req = Request::builder()
        .uri("/whoami")
        .header("authorization", "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    init_test_config();
    let token = make_token(&Uuid::new_v4().to_string(), "student", -3600);
    let req = Request::builder()
        .uri("/whoami")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_uuid_subject_is_rejected() {
    init_test_config();
    let token = make_token("not-a-uuid", "student", 3600);
    let req = Request::builder()
        .uri("/whoami")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_yields_identity() {
    init_test_config();
    let id = Uuid::new_v4();
    let token = make_token(&id.to_string(), "recruiter", 3600);
    let req = Request::builder()
        .uri("/whoami")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["id"], json!(id.to_string()));
    assert_eq!(body["role"], json!("recruiter"));
}
