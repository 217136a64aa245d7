//! Route definitions for surveys, their answers and survey categories.
//!
//! Everything is mounted at `/wenjuans`. Static segments such as `/search`
//! and `/categories` take priority over `/{id}`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{category, export, survey};
use crate::state::AppState;

/// Routes mounted at `/wenjuans`.
///
/// ```text
/// GET    /                                   -> list
/// POST   /                                   -> create
/// GET    /search                             -> search
/// GET    /{id}                               -> get_by_id
/// PUT    /{id}                               -> update
/// DELETE /{id}                               -> delete
/// POST   /{id}/pin                           -> pin
/// POST   /{id}/unpin                         -> unpin
/// POST   /{id}/categories/{category_id}      -> add_category
/// DELETE /{id}/categories/{category_id}      -> remove_category
/// GET    /{id}/answers                       -> list_answers
/// POST   /{id}/answers                       -> submit_answer
/// GET    /{id}/answers/{answer_id}           -> get_answer
/// PUT    /{id}/answers/{answer_id}           -> update_answer
/// DELETE /{id}/answers/{answer_id}           -> delete_answer
/// GET    /{id}/stats                         -> stats
/// GET    /{id}/export/pdf                    -> export::pdf
/// GET    /{id}/export/csv                    -> export::csv
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(survey::list).post(survey::create))
        .route("/search", get(survey::search))
        .nest("/categories", categories_router())
        .route(
            "/{id}",
            get(survey::get_by_id)
                .put(survey::update)
                .delete(survey::delete),
        )
        .route("/{id}/pin", post(survey::pin))
        .route("/{id}/unpin", post(survey::unpin))
        .route(
            "/{id}/categories/{category_id}",
            post(survey::add_category).delete(survey::remove_category),
        )
        .route(
            "/{id}/answers",
            get(survey::list_answers).post(survey::submit_answer),
        )
        .route(
            "/{id}/answers/{answer_id}",
            get(survey::get_answer)
                .put(survey::update_answer)
                .delete(survey::delete_answer),
        )
        .route("/{id}/stats", get(survey::stats))
        .route("/{id}/export/pdf", get(export::pdf))
        .route("/{id}/export/csv", get(export::csv))
}

/// Category routes nested at `/wenjuans/categories`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create (admin)
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update (admin)
/// DELETE /{id}   -> delete (admin)
/// ```
fn categories_router() -> Router<AppState> {
    Router::new()
        .route("/", get(category::list).post(category::create))
        .route(
            "/{id}",
            get(category::get_by_id)
                .put(category::update)
                .delete(category::delete),
        )
}
