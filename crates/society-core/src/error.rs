// ── Core error types ──
//
// User-facing errors from society-core. The `From<society_api::Error>`
// impl translates transport-layer failures into domain variants so the
// CLI can pick exit codes without inspecting HTTP details.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Auth errors ──────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Cannot {action} {entity} in status '{from}'")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        action: String,
    },

    #[error("Only the creator of alert {alert_id} can resolve it")]
    NotAlertCreator { alert_id: String },

    #[error("Request rejected by server: {message}")]
    Rejected { message: String, errors: Vec<String> },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
        errors: Vec<String>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a single-field validation failure.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation(ValidationErrors::single(field, message))
    }

    /// Field messages the server attached, if any.
    pub fn server_errors(&self) -> &[String] {
        match self {
            Self::Rejected { errors, .. } | Self::Api { errors, .. } => errors,
            _ => &[],
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<society_api::Error> for CoreError {
    fn from(err: society_api::Error) -> Self {
        use society_api::Error as ApiError;

        match err {
            ApiError::Unauthorized { message } => CoreError::AuthenticationFailed { message },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                        errors: Vec::new(),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::Api {
                status: 403,
                message,
                ..
            } => CoreError::Forbidden { message },
            ApiError::Api {
                status: 404,
                message,
                ..
            } => CoreError::NotFound { message },
            ApiError::Api {
                status,
                message,
                errors,
            } => CoreError::Api {
                message,
                status: Some(status),
                errors,
            },
            ApiError::Rejected { message, errors } => CoreError::Rejected { message, errors },
            ApiError::MissingData { endpoint } => {
                CoreError::Internal(format!("{endpoint} returned no data"))
            }
            ApiError::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            ApiError::TokenStorage(msg) => CoreError::Config {
                message: format!("Token storage: {msg}"),
            },
        }
    }
}
