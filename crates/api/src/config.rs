use crate::auth::email::EmailConfig;
use crate::auth::jwt::JwtConfig;

/// Default lifetime of an emailed login code, in minutes.
const DEFAULT_CODE_TTL_MINS: i64 = inkwell_core::verification::DEFAULT_CODE_TTL_MINS;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Lifetime of verification codes in minutes (default: `10`).
    pub verification_code_ttl_mins: i64,
    /// JWT signing configuration.
    pub jwt: JwtConfig,
    /// SMTP settings. `None` means codes are logged instead of mailed.
    pub email: Option<EmailConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                    |
    /// |------------------------------|----------------------------|
    /// | `HOST`                       | `0.0.0.0`                  |
    /// | `PORT`                       | `8080`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                       |
    /// | `VERIFICATION_CODE_TTL_MINS` | `10`                       |
    ///
    /// JWT and SMTP variables are documented on [`JwtConfig::from_env`] and
    /// [`EmailConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let verification_code_ttl_mins: i64 = std::env::var("VERIFICATION_CODE_TTL_MINS")
            .unwrap_or_else(|_| DEFAULT_CODE_TTL_MINS.to_string())
            .parse()
            .expect("VERIFICATION_CODE_TTL_MINS must be a valid i64");
        assert!(
            verification_code_ttl_mins > 0,
            "VERIFICATION_CODE_TTL_MINS must be positive"
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            verification_code_ttl_mins,
            jwt: JwtConfig::from_env(),
            email: EmailConfig::from_env(),
        }
    }
}
