//! Handlers for the `/blog` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::blog::{
    validate_blog_content, validate_blog_labels, validate_blog_status, validate_blog_title,
};
use inkwell_core::error::CoreError;
use inkwell_core::pagination::Page;
use inkwell_core::types::DbId;
use inkwell_db::models::blog::{Blog, BlogLikes, CreateBlog, UpdateBlog};
use inkwell_db::repositories::BlogRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::ownership::{BlogResource, RequireOwner};
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /blog?page=&page_size=&keyword=
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppQuery(params): AppQuery<PageParams>,
) -> AppResult<Json<DataResponse<Page<Blog>>>> {
    let page = params.page_request();
    let keyword = params.keyword();

    let total = BlogRepo::count(&state.pool, keyword).await?;
    let items = BlogRepo::list(&state.pool, keyword, page.limit(), page.offset()).await?;

    Ok(Json(DataResponse {
        data: Page::new(items, total, page),
    }))
}

/// POST /blog
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateBlog>,
) -> AppResult<(StatusCode, Json<DataResponse<Blog>>)> {
    validate_blog_title(&input.title).map_err(CoreError::validation)?;
    validate_blog_content(&input.content).map_err(CoreError::validation)?;
    validate_blog_labels(input.category.as_deref(), input.tags.as_deref())
        .map_err(CoreError::validation)?;
    if let Some(status) = input.status.as_deref() {
        validate_blog_status(status).map_err(CoreError::validation)?;
    }

    let blog = BlogRepo::create(&state.pool, auth.user_id, &auth.email, &input).await?;

    tracing::info!(blog_id = blog.id, user_id = auth.user_id, "Blog created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: blog })))
}

/// GET /blog/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Blog>>> {
    let blog = BlogRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Blog", id))?;
    Ok(Json(DataResponse { data: blog }))
}

/// PUT /blog/{id}
///
/// Partial update. Owner or admin only.
pub async fn update(
    State(state): State<AppState>,
    owner: RequireOwner<BlogResource>,
    AppJson(input): AppJson<UpdateBlog>,
) -> AppResult<Json<DataResponse<Blog>>> {
    if let Some(title) = input.title.as_deref() {
        validate_blog_title(title).map_err(CoreError::validation)?;
    }
    if let Some(content) = input.content.as_deref() {
        validate_blog_content(content).map_err(CoreError::validation)?;
    }
    if let Some(status) = input.status.as_deref() {
        validate_blog_status(status).map_err(CoreError::validation)?;
    }
    validate_blog_labels(input.category.as_deref(), input.tags.as_deref())
        .map_err(CoreError::validation)?;

    let blog = BlogRepo::update(&state.pool, owner.id, &input)
        .await?
        .ok_or(AppError::not_found("Blog", owner.id))?;

    tracing::info!(blog_id = blog.id, user_id = owner.user.user_id, "Blog updated");

    Ok(Json(DataResponse { data: blog }))
}

/// DELETE /blog/{id}
pub async fn delete(
    State(state): State<AppState>,
    owner: RequireOwner<BlogResource>,
) -> AppResult<StatusCode> {
    if !BlogRepo::soft_delete(&state.pool, owner.id).await? {
        return Err(AppError::not_found("Blog", owner.id));
    }

    tracing::info!(blog_id = owner.id, user_id = owner.user.user_id, "Blog deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /blog/{id}/like
pub async fn like(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<BlogLikes>>> {
    let likes = BlogRepo::like(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Blog", id))?;

    tracing::debug!(blog_id = id, likes = likes.likes, user_id = auth.user_id, "Blog liked");
    Ok(Json(DataResponse { data: likes }))
}

/// POST /blog/{id}/dislike
pub async fn dislike(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<BlogLikes>>> {
    let likes = BlogRepo::dislike(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Blog", id))?;

    tracing::debug!(blog_id = id, likes = likes.likes, user_id = auth.user_id, "Blog disliked");
    Ok(Json(DataResponse { data: likes }))
}
