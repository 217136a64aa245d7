//! Delivery of emailed login codes via SMTP.
//!
//! [`CodeMailer`] wraps the `lettre` async SMTP transport. Configuration is
//! loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and codes are written to the log
//! instead, which is the expected setup for local development.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(#[from] lettre::error::Error),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@inkwell.local";

/// Configuration for the SMTP transport.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set.
    ///
    /// | Variable        | Required | Default                  |
    /// |-----------------|----------|--------------------------|
    /// | `SMTP_HOST`     | yes      | --                       |
    /// | `SMTP_PORT`     | no       | `587`                    |
    /// | `SMTP_FROM`     | no       | `noreply@inkwell.local`  |
    /// | `SMTP_USER`     | no       | --                       |
    /// | `SMTP_PASSWORD` | no       | --                       |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// CodeMailer
// ---------------------------------------------------------------------------

/// How a code reached (or failed to reach) the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Sent over SMTP.
    Sent,
    /// SMTP is not configured; the code was written to the log.
    Logged,
}

/// Sends verification codes by email.
pub struct CodeMailer {
    config: Option<EmailConfig>,
}

impl CodeMailer {
    /// Create a mailer. `None` puts it in log-only mode.
    pub fn new(config: Option<EmailConfig>) -> Self {
        Self { config }
    }

    /// Whether codes are actually mailed.
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Send `code` to `to_email`, mentioning its lifetime.
    pub async fn send_code(
        &self,
        to_email: &str,
        code: &str,
        ttl_mins: i64,
    ) -> Result<Delivery, EmailError> {
        let Some(config) = &self.config else {
            tracing::warn!(to = to_email, code, "SMTP not configured, logging verification code");
            return Ok(Delivery::Logged);
        };

        let email = Message::builder()
            .from(config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject("Your Inkwell login code")
            .header(ContentType::TEXT_PLAIN)
            .body(verification_body(code, ttl_mins))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, "Verification code email sent");
        Ok(Delivery::Sent)
    }
}

/// Plain-text body of the verification email.
fn verification_body(code: &str, ttl_mins: i64) -> String {
    format!(
        "Your login code is: {code}\n\n\
         It expires in {ttl_mins} minutes and can be used once.\n\
         If you did not request this code you can ignore this email."
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
