//! Route definitions for the `/user` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// POST   /send-code          -> send_code (public)
/// POST   /login-or-register  -> login_or_register (public)
/// POST   /refresh-token      -> refresh_token (public)
/// GET    /validate-token     -> validate_token
/// GET    /me                 -> me
/// PUT    /self               -> update_self
/// GET    /                   -> list (admin)
/// GET    /{id}               -> get_by_id
/// PUT    /{id}               -> update (admin)
/// DELETE /{id}               -> delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-code", post(user::send_code))
        .route("/login-or-register", post(user::login_or_register))
        .route("/refresh-token", post(user::refresh_token))
        .route("/validate-token", get(user::validate_token))
        .route("/me", get(user::me))
        .route("/self", put(user::update_self))
        .route("/", get(user::list))
        .route(
            "/{id}",
            get(user::get_by_id).put(user::update).delete(user::delete),
        )
}
