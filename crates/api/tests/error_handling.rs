//! Error response shape and status mapping across the API.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    body_json, create_user_with_token, get, get_auth, post_json_auth, put_json_auth,
};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn not_found_has_json_error_body(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "u@example.com", "user").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/blog/987654", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Blog with id 987654 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_authorization_header_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .uri("/user/me")
        .header("Authorization", "Token abc")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_signed_with_another_secret_is_401(pool: PgPool) {
    let (user, _) = create_user_with_token(&pool, "u@example.com", "user").await;
    let foreign = inkwell_api::auth::jwt::generate_token(
        user.id,
        &user.email,
        "admin",
        &inkwell_api::auth::jwt::JwtConfig {
            secret: "some-other-secret".to_string(),
            expiry_hours: 1,
        },
    )
    .unwrap();
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/user", &foreign).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn optional_auth_ignores_bad_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/wenjuans", "garbage").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_numeric_id_on_owned_route_is_400(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "u@example.com", "user").await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        "/tasks/abc",
        serde_json::json!({ "title": "x" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_numeric_id_on_plain_route_is_400_json(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "u@example.com", "user").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/blog/abc", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_body_field_is_400_json(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "u@example.com", "user").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/blog",
        serde_json::json!({ "content": "no title" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("title"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_content_type_is_400_json(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "u@example.com", "user").await;
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .method("POST")
        .uri("/tasks")
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "text/plain")
        .body(Body::from(r#"{"title":"t"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mistyped_query_parameter_is_400_json(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "u@example.com", "user").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/tasks?page=abc", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_check_runs_before_validation(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "u@example.com", "user").await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        "/user/1",
        serde_json::json!({ "role": "nonsense" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Admin role required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_routes_need_no_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/wenjuans/categories").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}
