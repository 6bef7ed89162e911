//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable process exit code.

use miette::Diagnostic;
use thiserror::Error;

use society_config::ConfigError;
use society_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(society::connection_failed),
        help(
            "Check that the server is reachable and the URL includes the API root.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(society::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(society::auth_failed),
        help("Sign in again with: society auth login")
    )]
    AuthFailed { message: String },

    #[error("Not signed in")]
    #[diagnostic(
        code(society::not_signed_in),
        help("Sign in with: society auth login")
    )]
    NotSignedIn,

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(society::no_credentials),
        help(
            "Store one with: society config set-password --profile {profile}\n\
             Or set the SOCIETY_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(society::forbidden),
        help("This action needs a different role, usually admin.")
    )]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Not found: {message}")]
    #[diagnostic(code(society::not_found))]
    NotFound { message: String },

    // ── Domain rules ─────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(society::validation))]
    Validation(String),

    #[error("Cannot {action} {entity} in status '{from}'")]
    #[diagnostic(code(society::invalid_transition))]
    InvalidTransition {
        entity: String,
        from: String,
        action: String,
    },

    #[error("Only the creator of alert {alert_id} can resolve it")]
    #[diagnostic(
        code(society::not_alert_creator),
        help("Post an update or escalate instead: society alerts update {alert_id} <message>")
    )]
    NotAlertCreator { alert_id: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(society::api_error), help("{details}"))]
    Api { message: String, details: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(society::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: society config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No server configured")]
    #[diagnostic(
        code(society::no_config),
        help(
            "Create a profile with: society config init\n\
             Or pass --server / set SOCIETY_SERVER.\n\
             Config file: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(society::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(society::usage))]
    Usage { field: String, reason: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(society::io))]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(society::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotSignedIn | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::Forbidden { .. } | Self::NotAlertCreator { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation(_) | Self::Usage { .. } | Self::InvalidTransition { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::NotAuthenticated => Self::NotSignedIn,
            CoreError::Forbidden { message } => Self::Forbidden { message },
            CoreError::NotFound { message } => Self::NotFound { message },
            CoreError::Validation(errors) => Self::Validation(errors.to_string()),
            CoreError::InvalidTransition {
                entity,
                from,
                action,
            } => Self::InvalidTransition {
                entity: entity.into(),
                from,
                action,
            },
            CoreError::NotAlertCreator { alert_id } => Self::NotAlertCreator { alert_id },
            CoreError::Rejected { message, errors } => Self::Api {
                message,
                details: errors.join("\n"),
            },
            CoreError::Api {
                message,
                status,
                errors,
            } => {
                let mut lines: Vec<String> = status
                    .map(|s| format!("HTTP status {s}"))
                    .into_iter()
                    .collect();
                lines.extend(errors);
                Self::Api {
                    message,
                    details: lines.join("\n"),
                }
            }
            CoreError::Config { message } => Self::Config { message },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Usage { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}
