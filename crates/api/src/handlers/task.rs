//! Handlers for the `/tasks` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::error::CoreError;
use inkwell_core::pagination::Page;
use inkwell_core::task::{validate_priority, validate_task_status, validate_task_title};
use inkwell_core::types::DbId;
use inkwell_db::models::task::{CreateTask, Task, UpdateTask};
use inkwell_db::repositories::TaskRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::ownership::{RequireOwner, TaskResource};
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /tasks?page=&page_size=&keyword=
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppQuery(params): AppQuery<PageParams>,
) -> AppResult<Json<DataResponse<Page<Task>>>> {
    list_page(&state, &params, None).await
}

/// GET /tasks/mine?page=&page_size=&keyword=
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(params): AppQuery<PageParams>,
) -> AppResult<Json<DataResponse<Page<Task>>>> {
    list_page(&state, &params, Some(auth.user_id)).await
}

/// POST /tasks
///
/// Priority defaults to `medium` and status to `pending`.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    validate_task_title(&input.title).map_err(CoreError::validation)?;
    validate_fields(input.priority.as_deref(), input.status.as_deref())?;

    let task = TaskRepo::create(&state.pool, auth.user_id, &auth.email, &input).await?;

    tracing::info!(task_id = task.id, user_id = auth.user_id, "Task created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Task", id))?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    owner: RequireOwner<TaskResource>,
    AppJson(input): AppJson<UpdateTask>,
) -> AppResult<Json<DataResponse<Task>>> {
    if let Some(title) = input.title.as_deref() {
        validate_task_title(title).map_err(CoreError::validation)?;
    }
    validate_fields(input.priority.as_deref(), input.status.as_deref())?;

    let task = TaskRepo::update(&state.pool, owner.id, &input)
        .await?
        .ok_or(AppError::not_found("Task", owner.id))?;

    tracing::info!(
        task_id = task.id,
        status = %task.status,
        user_id = owner.user.user_id,
        "Task updated"
    );

    Ok(Json(DataResponse { data: task }))
}

/// DELETE /tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    owner: RequireOwner<TaskResource>,
) -> AppResult<StatusCode> {
    if !TaskRepo::soft_delete(&state.pool, owner.id).await? {
        return Err(AppError::not_found("Task", owner.id));
    }

    tracing::info!(task_id = owner.id, user_id = owner.user.user_id, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn list_page(
    state: &AppState,
    params: &PageParams,
    creator_id: Option<DbId>,
) -> AppResult<Json<DataResponse<Page<Task>>>> {
    let page = params.page_request();
    let keyword = params.keyword();

    let total = TaskRepo::count(&state.pool, keyword, creator_id).await?;
    let items =
        TaskRepo::list(&state.pool, keyword, creator_id, page.limit(), page.offset()).await?;

    Ok(Json(DataResponse {
        data: Page::new(items, total, page),
    }))
}

fn validate_fields(priority: Option<&str>, status: Option<&str>) -> AppResult<()> {
    if let Some(priority) = priority {
        validate_priority(priority).map_err(CoreError::validation)?;
    }
    if let Some(status) = status {
        validate_task_status(status).map_err(CoreError::validation)?;
    }
    Ok(())
}
