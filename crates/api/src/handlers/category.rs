//! Handlers for survey categories (`/categories`).
//!
//! Reads accept anonymous callers; writes require the admin role.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::category::validate_category_name;
use inkwell_core::error::CoreError;
use inkwell_core::types::DbId;
use inkwell_db::models::category::{Category, CategoryWithCount, CreateCategory, UpdateCategory};
use inkwell_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::MaybeAuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /categories
pub async fn list(
    State(state): State<AppState>,
    _viewer: MaybeAuthUser,
) -> AppResult<Json<DataResponse<Vec<CategoryWithCount>>>> {
    let categories = CategoryRepo::list_with_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _viewer: MaybeAuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<CategoryWithCount>>> {
    let category = CategoryRepo::find_with_count(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Category", id))?;
    Ok(Json(DataResponse { data: category }))
}

/// POST /categories
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(mut input): AppJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    validate_category_name(&input.name).map_err(CoreError::validation)?;
    input.name = input.name.trim().to_string();

    let category = CategoryRepo::create(&state.pool, &input).await?;

    tracing::info!(
        category_id = category.id,
        name = %category.name,
        user_id = admin.user_id,
        "Category created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /categories/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
    AppJson(mut input): AppJson<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    if let Some(name) = input.name.as_deref() {
        validate_category_name(name).map_err(CoreError::validation)?;
    }
    input.name = input.name.map(|n| n.trim().to_string());

    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Category", id))?;

    tracing::info!(category_id = id, user_id = admin.user_id, "Category updated");

    Ok(Json(DataResponse { data: category }))
}

/// DELETE /categories/{id}
///
/// Removes the category and its survey links. Surveys are kept.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Category", id));
    }

    tracing::info!(category_id = id, user_id = admin.user_id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
