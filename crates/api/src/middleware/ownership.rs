//! Resource ownership extractor.
//!
//! [`RequireOwner<R>`] authenticates the caller, parses the `{id}` path
//! segment and checks that the caller owns that row of resource `R`. Admins
//! pass without a lookup.

use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use inkwell_core::types::DbId;
use inkwell_db::repositories::{BlogRepo, SurveyRepo, TaskRepo};
use sqlx::PgPool;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// A table whose rows have a single owning user column.
pub trait OwnedResource {
    /// Entity name used in 404 and 403 messages.
    const ENTITY: &'static str;

    /// Owner of the live row `id`, or `None` if it does not exist.
    fn find_owner(
        pool: &PgPool,
        id: DbId,
    ) -> impl Future<Output = Result<Option<DbId>, sqlx::Error>> + Send;
}

/// `blogs.user_id`
pub struct BlogResource;

impl OwnedResource for BlogResource {
    const ENTITY: &'static str = "Blog";

    fn find_owner(
        pool: &PgPool,
        id: DbId,
    ) -> impl Future<Output = Result<Option<DbId>, sqlx::Error>> + Send {
        BlogRepo::find_owner_id(pool, id)
    }
}

/// `tasks.creator_id`
pub struct TaskResource;

impl OwnedResource for TaskResource {
    const ENTITY: &'static str = "Task";

    fn find_owner(
        pool: &PgPool,
        id: DbId,
    ) -> impl Future<Output = Result<Option<DbId>, sqlx::Error>> + Send {
        TaskRepo::find_owner_id(pool, id)
    }
}

/// `surveys.creator_id`
pub struct SurveyResource;

impl OwnedResource for SurveyResource {
    const ENTITY: &'static str = "Survey";

    fn find_owner(
        pool: &PgPool,
        id: DbId,
    ) -> impl Future<Output = Result<Option<DbId>, sqlx::Error>> + Send {
        SurveyRepo::find_owner_id(pool, id)
    }
}

/// Caller owns resource `R` identified by the `{id}` path segment, or is an admin.
///
/// Rejections, in order:
/// - 401 when the caller is not authenticated;
/// - 400 when `{id}` is not an integer;
/// - 404 when a non-admin targets a missing or soft-deleted row;
/// - 403 when a non-admin targets someone else's row.
///
/// ```ignore
/// async fn delete(owner: RequireOwner<BlogResource>, ...) -> AppResult<StatusCode> {
///     BlogRepo::soft_delete(&state.pool, owner.id).await?;
///     ...
/// }
/// ```
pub struct RequireOwner<R> {
    pub user: AuthUser,
    /// The parsed `{id}` path parameter.
    pub id: DbId,
    _resource: PhantomData<fn() -> R>,
}

impl<R> std::fmt::Debug for RequireOwner<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequireOwner")
            .field("user", &self.user)
            .field("id", &self.id)
            .finish()
    }
}

/// Read the `{id}` path parameter as a database id.
async fn path_id(parts: &mut Parts, state: &AppState) -> Result<DbId, AppError> {
    let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?;

    let raw = params
        .get("id")
        .ok_or_else(|| AppError::InternalError("Route has no {id} parameter".into()))?;

    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid id '{raw}': expected an integer")))
}

impl<R: OwnedResource> FromRequestParts<AppState> for RequireOwner<R> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let id = path_id(parts, state).await?;

        if !user.is_admin() {
            let owner = R::find_owner(&state.pool, id)
                .await?
                .ok_or(AppError::not_found(R::ENTITY, id))?;

            if owner != user.user_id {
                tracing::debug!(
                    entity = R::ENTITY,
                    id,
                    user_id = user.user_id,
                    owner_id = owner,
                    "Ownership check failed"
                );
                return Err(AppError::forbidden(format!(
                    "You do not have permission to modify this {}",
                    R::ENTITY.to_lowercase()
                )));
            }
        }

        Ok(RequireOwner {
            user,
            id,
            _resource: PhantomData,
        })
    }
}
