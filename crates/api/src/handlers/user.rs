//! Handlers for the `/user` resource: code login, tokens and user management.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use inkwell_core::error::CoreError;
use inkwell_core::roles::validate_role;
use inkwell_core::types::DbId;
use inkwell_core::verification::{
    codes_match, generate_code, is_well_formed_code, normalize_email, CODE_LENGTH,
    MAX_CODE_ATTEMPTS,
};
use inkwell_db::models::user::{UpdateSelf, UpdateUser, User};
use inkwell_db::repositories::{UserRepo, VerificationCodeRepo};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail};

use crate::auth::jwt::{decode_ignoring_expiry, generate_token};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /user/send-code`.
#[derive(Debug, Deserialize, Validate)]
pub struct SendCodeRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Response for `POST /user/send-code`.
#[derive(Debug, Serialize)]
pub struct SendCodeResponse {
    pub email: String,
    /// Seconds until the code expires.
    pub expires_in: i64,
}

/// Request body for `POST /user/login-or-register`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub code: String,
}

/// Request body for `POST /user/refresh-token`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub token: String,
}

/// Successful authentication response returned by login, refresh and email change.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
    /// `true` when the login registered a new account.
    pub is_new_user: bool,
}

/// Response for `GET /user/validate-token`.
#[derive(Debug, Serialize)]
pub struct TokenInfo {
    pub valid: bool,
    pub user_id: DbId,
    pub email: String,
    pub role: String,
    pub expires_at: i64,
}

// ---------------------------------------------------------------------------
// Public auth endpoints
// ---------------------------------------------------------------------------

/// POST /user/send-code
///
/// Issue a fresh verification code for an email and deliver it. Replaces any
/// earlier code for the same address.
pub async fn send_code(
    State(state): State<AppState>,
    AppJson(input): AppJson<SendCodeRequest>,
) -> AppResult<Json<DataResponse<SendCodeResponse>>> {
    let input = SendCodeRequest {
        email: normalize_email(&input.email),
    };
    input.validate()?;
    let email = input.email;

    let purged = VerificationCodeRepo::purge_expired(&state.pool).await?;
    if purged > 0 {
        tracing::debug!(purged, "Purged expired verification codes");
    }

    let ttl_mins = state.config.verification_code_ttl_mins;
    let code = generate_code();
    let expires_at = Utc::now() + chrono::Duration::minutes(ttl_mins);
    VerificationCodeRepo::upsert(&state.pool, &email, &code, expires_at).await?;

    let delivery = state
        .mailer
        .send_code(&email, &code, ttl_mins)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to send verification email: {e}")))?;

    tracing::info!(email = %email, ?delivery, "Verification code issued");

    Ok(Json(DataResponse {
        data: SendCodeResponse {
            email,
            expires_in: ttl_mins * 60,
        },
    }))
}

/// POST /user/login-or-register
///
/// Exchange an emailed code for a token. Registers the user on first login.
pub async fn login_or_register(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let input = LoginRequest {
        email: normalize_email(&input.email),
        code: input.code.trim().to_string(),
    };
    input.validate()?;
    let email = input.email.as_str();
    let code = input.code.as_str();

    if !is_well_formed_code(code) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Verification code must be {CODE_LENGTH} digits"
        ))));
    }

    // 1. Check the pending code for a precise error message.
    let stored = VerificationCodeRepo::find(&state.pool, email)
        .await?
        .ok_or_else(|| {
            AppError::unauthorized("No verification code was requested for this email")
        })?;

    if stored.expires_at <= Utc::now() {
        return Err(AppError::unauthorized("Verification code has expired"));
    }
    if !codes_match(code, &stored.code) {
        let remaining =
            VerificationCodeRepo::record_failed_attempt(&state.pool, email, MAX_CODE_ATTEMPTS)
                .await?;
        tracing::info!(email = %email, remaining, "Verification code mismatch");
        if remaining == 0 {
            return Err(AppError::unauthorized(
                "Too many failed attempts, request a new verification code",
            ));
        }
        return Err(AppError::unauthorized("Invalid verification code"));
    }

    // 2. Consume the code and find or create the user atomically.
    let outcome = UserRepo::login_with_code(&state.pool, email, code)
        .await?
        .ok_or_else(|| AppError::unauthorized("Verification code has already been used"))?;

    if outcome.user.is_deleted() {
        return Err(AppError::forbidden("Account has been deleted"));
    }

    let token = issue_token(&state, &outcome.user)?;

    tracing::info!(
        user_id = outcome.user.id,
        created = outcome.created,
        "User logged in"
    );

    Ok(Json(DataResponse {
        data: AuthResponse {
            token,
            expires_in: state.config.jwt.expiry_secs(),
            user: outcome.user,
            is_new_user: outcome.created,
        },
    }))
}

/// POST /user/refresh-token
///
/// Re-issue a token with a fresh expiry. The old token may be expired but
/// its signature must verify and its user must still exist. Email and role
/// come from the current user row, not from the old claims.
pub async fn refresh_token(
    State(state): State<AppState>,
    AppJson(input): AppJson<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let claims = decode_ignoring_expiry(input.token.trim(), &state.config.jwt)
        .map_err(|_| AppError::unauthorized("Invalid token"))?;

    let user = UserRepo::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;

    let token = issue_token(&state, &user)?;
    if user.role != claims.role {
        tracing::info!(
            user_id = user.id,
            role = %user.role,
            "Refreshed token carries updated role"
        );
    }

    tracing::info!(user_id = user.id, "Token refreshed");

    Ok(Json(DataResponse {
        data: AuthResponse {
            token,
            expires_in: state.config.jwt.expiry_secs(),
            user,
            is_new_user: false,
        },
    }))
}

/// GET /user/validate-token
pub async fn validate_token(auth: AuthUser) -> AppResult<Json<DataResponse<TokenInfo>>> {
    Ok(Json(DataResponse {
        data: TokenInfo {
            valid: true,
            user_id: auth.user_id,
            email: auth.email,
            role: auth.role,
            expires_at: auth.expires_at,
        },
    }))
}

// ---------------------------------------------------------------------------
// Own profile
// ---------------------------------------------------------------------------

/// GET /user/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<User>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::not_found("User", auth.user_id))?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /user/self
///
/// Change the caller's own email. Returns a new token carrying the new address.
pub async fn update_self(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<UpdateSelf>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let email = normalize_email(&input.email);
    check_email(&email)?;

    let update = UpdateUser {
        email: Some(email),
        role: None,
    };
    let user = UserRepo::update(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::not_found("User", auth.user_id))?;

    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = user.id, "User changed own email");

    Ok(Json(DataResponse {
        data: AuthResponse {
            token,
            expires_in: state.config.jwt.expiry_secs(),
            user,
            is_new_user: false,
        },
    }))
}

// ---------------------------------------------------------------------------
// User management
// ---------------------------------------------------------------------------

/// GET /user
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<User>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /user/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /user/{id}
///
/// Admin update of a user's email and/or role.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
    AppJson(mut input): AppJson<UpdateUser>,
) -> AppResult<Json<DataResponse<User>>> {
    if let Some(email) = input.email.as_deref() {
        let email = normalize_email(email);
        check_email(&email)?;
        input.email = Some(email);
    }
    if let Some(role) = input.role.as_deref() {
        validate_role(role).map_err(CoreError::validation)?;
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("User", id))?;

    tracing::info!(
        target_user_id = id,
        role = %user.role,
        user_id = admin.user_id,
        "User updated"
    );

    Ok(Json(DataResponse { data: user }))
}

/// DELETE /user/{id}
///
/// Soft-delete a user. Their tokens stop working for endpoints that look the
/// user up, and code login is refused.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if !UserRepo::soft_delete(&state.pool, id).await? {
        return Err(AppError::not_found("User", id));
    }

    tracing::info!(target_user_id = id, user_id = admin.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_email(email: &str) -> AppResult<()> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(
            "Invalid email address".into(),
        )))
    }
}

fn issue_token(state: &AppState, user: &User) -> AppResult<String> {
    generate_token(user.id, &user.email, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))
}
