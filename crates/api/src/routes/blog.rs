//! Route definitions for the `/blog` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::blog;
use crate::state::AppState;

/// Routes mounted at `/blog`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update (owner or admin)
/// DELETE /{id}          -> delete (owner or admin)
/// POST   /{id}/like     -> like
/// POST   /{id}/dislike  -> dislike
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::list).post(blog::create))
        .route(
            "/{id}",
            get(blog::get_by_id).put(blog::update).delete(blog::delete),
        )
        .route("/{id}/like", post(blog::like))
        .route("/{id}/dislike", post(blog::dislike))
}
