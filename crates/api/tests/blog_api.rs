//! HTTP-level tests for the `/blog` resource.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user_with_token, delete_auth, get, get_auth, post_auth, post_json_auth,
    put_json_auth,
};
use sqlx::PgPool;

async fn create_blog(pool: &PgPool, token: &str, title: &str) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/blog",
        serde_json::json!({
            "title": title,
            "content": "Some words.",
            "category": "notes",
            "tags": "rust,axum",
        }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_blog_records_author_and_defaults(pool: PgPool) {
    let (user, token) = create_user_with_token(&pool, "author@example.com", "user").await;

    let blog = create_blog(&pool, &token, "Hello").await;

    assert_eq!(blog["title"], "Hello");
    assert_eq!(blog["user_id"], user.id);
    assert_eq!(blog["user_email"], "author@example.com");
    assert_eq!(blog["status"], "draft");
    assert_eq!(blog["likes"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_blog_requires_title(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "author@example.com", "user").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/blog",
        serde_json::json!({ "title": "  ", "content": "body" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blog_list_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/blog").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blog_list_paginates_and_filters_by_keyword(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "author@example.com", "user").await;
    for title in ["Rust tips", "Axum notes", "More Rust", "Cooking"] {
        create_blog(&pool, &token, title).await;
    }

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/blog?page=1&page_size=3", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 4);
    assert_eq!(json["data"]["total_pages"], 2);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 3);
    // Newest first.
    assert_eq!(json["data"]["items"][0]["title"], "Cooking");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/blog?keyword=rust", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_owner_or_admin_can_update(pool: PgPool) {
    let (_, owner_token) = create_user_with_token(&pool, "owner@example.com", "user").await;
    let (_, other_token) = create_user_with_token(&pool, "other@example.com", "user").await;
    let (_, admin_token) = create_user_with_token(&pool, "admin@example.com", "admin").await;
    let blog = create_blog(&pool, &owner_token, "Mine").await;
    let uri = format!("/blog/{}", blog["id"]);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &uri,
        serde_json::json!({ "title": "Hijacked" }),
        &other_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &uri,
        serde_json::json!({ "status": "published" }),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "published");
    assert_eq!(json["data"]["title"], "Mine");

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &uri,
        serde_json::json!({ "title": "Moderated" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_blog_is_gone(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "owner@example.com", "user").await;
    let blog = create_blog(&pool, &token, "Short lived").await;
    let uri = format!("/blog/{}", blog["id"]);

    let app = common::build_test_app(pool.clone());
    assert_eq!(delete_auth(app, &uri, &token).await.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    assert_eq!(get_auth(app, &uri, &token).await.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    assert_eq!(delete_auth(app, &uri, &token).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn likes_count_up_and_floor_at_zero(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "owner@example.com", "user").await;
    let (_, fan_token) = create_user_with_token(&pool, "fan@example.com", "user").await;
    let blog = create_blog(&pool, &token, "Likeable").await;
    let id = blog["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &format!("/blog/{id}/like"), &fan_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["likes"], 1);

    for expected in [0, 0] {
        let app = common::build_test_app(pool.clone());
        let response = post_auth(app, &format!("/blog/{id}/dislike"), &fan_token).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["likes"], expected);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn like_on_missing_blog_is_404(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "fan@example.com", "user").await;
    let app = common::build_test_app(pool);

    let response = post_auth(app, "/blog/999999/like", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
