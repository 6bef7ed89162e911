use thiserror::Error;

/// Top-level error type for the `society-api` crate.
///
/// Covers every failure mode of a call against the Society Ease backend:
/// transport, HTTP status, envelope rejection, and malformed payloads.
/// `society-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// HTTP 401 -- missing, expired, or revoked bearer token.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response. `message` comes from the envelope when the server
    /// supplied one, otherwise from the HTTP reason phrase.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        errors: Vec<String>,
    },

    /// 2xx response whose envelope carried `success: false`.
    #[error("Request rejected: {message}")]
    Rejected { message: String, errors: Vec<String> },

    /// 2xx success envelope without the `data` payload the endpoint promises.
    #[error("Response from {endpoint} carried no data")]
    MissingData { endpoint: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Tokens ──────────────────────────────────────────────────────
    /// The token store could not persist or clear tokens.
    #[error("Token storage error: {0}")]
    TokenStorage(String),
}

impl Error {
    /// Returns `true` if this error indicates the session is no longer
    /// valid and a token refresh might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if this is a transient transport failure.
    ///
    /// Nothing in this crate retries on its own; callers decide.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status code, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Field-level messages the server attached to the envelope.
    pub fn server_errors(&self) -> &[String] {
        match self {
            Self::Api { errors, .. } | Self::Rejected { errors, .. } => errors,
            _ => &[],
        }
    }
}
