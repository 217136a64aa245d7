//! HTTP-level tests for code login, token endpoints and user management.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    body_json, create_user_with_token, delete_auth, get, get_auth, post_json, put_json_auth,
};
use inkwell_api::auth::jwt::{validate_token, Claims};
use inkwell_core::verification::MAX_CODE_ATTEMPTS;
use inkwell_db::repositories::{UserRepo, VerificationCodeRepo};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Request a code through the API and read it back from the database.
async fn request_code(pool: &PgPool, email: &str) -> String {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/user/send-code", serde_json::json!({ "email": email })).await;
    assert_eq!(response.status(), StatusCode::OK);

    VerificationCodeRepo::find(pool, &email.trim().to_lowercase())
        .await
        .unwrap()
        .expect("a code should be stored")
        .code
}

async fn login(pool: &PgPool, email: &str, code: &str) -> axum::http::Response<axum::body::Body> {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/user/login-or-register",
        serde_json::json!({ "email": email, "code": code }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Code login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn send_code_stores_code_and_reports_ttl(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/user/send-code",
        serde_json::json!({ "email": "  New@Example.com " }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "new@example.com");
    assert_eq!(json["data"]["expires_in"], 600);
    assert!(json["data"].get("code").is_none(), "code must not be echoed");

    let stored = VerificationCodeRepo::find(&pool, "new@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.code.len(), 6);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn send_code_rejects_invalid_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/user/send-code",
        serde_json::json!({ "email": "not-an-email" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_login_registers_a_user(pool: PgPool) {
    let code = request_code(&pool, "fresh@example.com").await;
    let response = login(&pool, "fresh@example.com", &code).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_new_user"], true);
    assert_eq!(json["data"]["user"]["email"], "fresh@example.com");
    assert_eq!(json["data"]["user"]["role"], "user");
    assert!(json["data"]["token"].is_string());

    let token = json["data"]["token"].as_str().unwrap();
    let claims = validate_token(token, &common::test_config().jwt).unwrap();
    assert_eq!(claims.email, "fresh@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_login_finds_existing_user(pool: PgPool) {
    let user = UserRepo::create(&pool, "known@example.com", "admin")
        .await
        .unwrap();

    let code = request_code(&pool, "known@example.com").await;
    let response = login(&pool, "known@example.com", &code).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_new_user"], false);
    assert_eq!(json["data"]["user"]["id"], user.id);
    assert_eq!(json["data"]["user"]["role"], "admin");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn code_cannot_be_reused(pool: PgPool) {
    let code = request_code(&pool, "once@example.com").await;
    assert_eq!(login(&pool, "once@example.com", &code).await.status(), StatusCode::OK);

    let response = login(&pool, "once@example.com", &code).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_code_is_rejected_and_right_code_still_works(pool: PgPool) {
    let code = request_code(&pool, "typo@example.com").await;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let response = login(&pool, "typo@example.com", wrong).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");

    assert_eq!(login(&pool, "typo@example.com", &code).await.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_wrong_codes_invalidate_the_code(pool: PgPool) {
    let code = request_code(&pool, "guess@example.com").await;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for _ in 0..MAX_CODE_ATTEMPTS {
        let response = login(&pool, "guess@example.com", wrong).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
    assert!(VerificationCodeRepo::find(&pool, "guess@example.com")
        .await
        .unwrap()
        .is_none());

    let response = login(&pool, "guess@example.com", &code).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No verification code was requested for this email");

    let fresh = request_code(&pool, "guess@example.com").await;
    assert_eq!(login(&pool, "guess@example.com", &fresh).await.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_code_is_rejected(pool: PgPool) {
    VerificationCodeRepo::upsert(
        &pool,
        "late@example.com",
        "123456",
        Utc::now() - Duration::minutes(1),
    )
    .await
    .unwrap();

    let response = login(&pool, "late@example.com", "123456").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Verification code has expired");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_code_is_a_validation_error(pool: PgPool) {
    let response = login(&pool, "x@example.com", "12ab").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_account_cannot_log_in(pool: PgPool) {
    let user = UserRepo::create(&pool, "gone@example.com", "user")
        .await
        .unwrap();
    UserRepo::soft_delete(&pool, user.id).await.unwrap();

    let code = request_code(&pool, "gone@example.com").await;
    let response = login(&pool, "gone@example.com", &code).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Token endpoints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn validate_token_reports_claims(pool: PgPool) {
    let (user, token) = create_user_with_token(&pool, "v@example.com", "user").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/user/validate-token", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], true);
    assert_eq!(json["data"]["user_id"], user.id);
    assert_eq!(json["data"]["email"], "v@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/user/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_query_parameter_is_accepted(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "q@example.com", "user").await;
    let app = common::build_test_app(pool);

    let response = get(app, &format!("/user/me?token={token}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_token_can_be_refreshed(pool: PgPool) {
    let user = UserRepo::create(&pool, "r@example.com", "user")
        .await
        .unwrap();
    let config = common::test_config();
    let past = Utc::now().timestamp() - 3600;
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.clone(),
        exp: past,
        iat: past - 3600,
        jti: "old".to_string(),
    };
    let expired = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt.secret.as_bytes()),
    )
    .unwrap();

    let app = common::build_test_app(pool.clone());
    assert_eq!(
        get_auth(app, "/user/me", &expired).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/user/refresh-token",
        serde_json::json!({ "token": expired }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let fresh = json["data"]["token"].as_str().unwrap();
    let claims = validate_token(fresh, &config.jwt).unwrap();
    assert_eq!(claims.sub, user.id);
    assert!(claims.exp > Utc::now().timestamp());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_signs_the_current_role(pool: PgPool) {
    let (demoted, old_token) =
        create_user_with_token(&pool, "was-admin@example.com", "admin").await;
    let (_, admin_token) = create_user_with_token(&pool, "boss@example.com", "admin").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/user/{}", demoted.id),
        serde_json::json!({ "role": "user" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/user/refresh-token",
        serde_json::json!({ "token": old_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["role"], "user");
    let fresh = json["data"]["token"].as_str().unwrap().to_string();

    let claims = validate_token(&fresh, &common::test_config().jwt).unwrap();
    assert_eq!(claims.sub, demoted.id);
    assert_eq!(claims.role, "user");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/user", &fresh).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rejects_tokens_of_deleted_users(pool: PgPool) {
    let (user, token) = create_user_with_token(&pool, "del@example.com", "user").await;
    UserRepo::soft_delete(&pool, user.id).await.unwrap();

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/user/refresh-token",
        serde_json::json!({ "token": token }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Profile and admin management
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_self_changes_email_and_reissues_token(pool: PgPool) {
    let (user, token) = create_user_with_token(&pool, "old@example.com", "user").await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        "/user/self",
        serde_json::json!({ "email": "New@Example.com" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["id"], user.id);
    assert_eq!(json["data"]["user"]["email"], "new@example.com");
    let claims = validate_token(
        json["data"]["token"].as_str().unwrap(),
        &common::test_config().jwt,
    )
    .unwrap();
    assert_eq!(claims.email, "new@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_self_to_taken_email_conflicts(pool: PgPool) {
    create_user_with_token(&pool, "taken@example.com", "user").await;
    let (_, token) = create_user_with_token(&pool, "me@example.com", "user").await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        "/user/self",
        serde_json::json!({ "email": "taken@example.com" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_list_requires_admin(pool: PgPool) {
    let (_, user_token) = create_user_with_token(&pool, "plain@example.com", "user").await;
    let (_, admin_token) = create_user_with_token(&pool, "boss@example.com", "admin").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/user", &user_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/user", &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_can_change_role_and_soft_delete(pool: PgPool) {
    let (target, _) = create_user_with_token(&pool, "target@example.com", "user").await;
    let (_, admin_token) = create_user_with_token(&pool, "boss@example.com", "admin").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/user/{}", target.id),
        serde_json::json!({ "role": "admin" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "admin");

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/user/{}", target.id),
        serde_json::json!({ "role": "superuser" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/user/{}", target.id), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/user/{}", target.id), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let row = UserRepo::find_by_email_include_deleted(&pool, "target@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(row.is_deleted());
}
