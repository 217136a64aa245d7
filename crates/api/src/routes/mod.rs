pub mod blog;
pub mod health;
pub mod survey;
pub mod task;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree. Mounted at the root next to `/health`.
///
/// Route hierarchy:
///
/// ```text
/// /user/send-code                                  request login code (public)
/// /user/login-or-register                          exchange code for token (public)
/// /user/refresh-token                              re-issue token (public)
/// /user/validate-token                             token info
/// /user/me                                         own profile
/// /user/self                                       change own email
/// /user                                            list (admin only)
/// /user/{id}                                       get, update (admin), delete (admin)
///
/// /blog                                            list, create
/// /blog/{id}                                       get, update, delete
/// /blog/{id}/like                                  like (POST)
/// /blog/{id}/dislike                               dislike (POST)
///
/// /tasks                                           list, create
/// /tasks/mine                                      caller's tasks
/// /tasks/{id}                                      get, update, delete
///
/// /wenjuans                                        list, create
/// /wenjuans/search                                 title search
/// /wenjuans/categories                             list, create (admin)
/// /wenjuans/categories/{id}                        get, update (admin), delete (admin)
/// /wenjuans/{id}                                   get, update, delete
/// /wenjuans/{id}/pin                               pin (POST)
/// /wenjuans/{id}/unpin                             unpin (POST)
/// /wenjuans/{id}/categories/{category_id}          link (POST), unlink (DELETE)
/// /wenjuans/{id}/answers                           list (owner), submit
/// /wenjuans/{id}/answers/{answer_id}               get, update, delete
/// /wenjuans/{id}/stats                             per-question tallies
/// /wenjuans/{id}/export/pdf                        PDF download
/// /wenjuans/{id}/export/csv                        CSV download
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/user", user::router())
        .nest("/blog", blog::router())
        .nest("/tasks", task::router())
        .nest("/wenjuans", survey::router())
}
