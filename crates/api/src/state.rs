use std::sync::Arc;

use crate::auth::email::CodeMailer;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: inkwell_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Delivers verification codes (SMTP, or the log in development).
    pub mailer: Arc<CodeMailer>,
}

impl AppState {
    pub fn new(pool: inkwell_db::DbPool, config: ServerConfig) -> Self {
        let mailer = Arc::new(CodeMailer::new(config.email.clone()));
        Self {
            pool,
            config: Arc::new(config),
            mailer,
        }
    }
}
