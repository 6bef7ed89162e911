// Bearer token storage
//
// The backend issues an access/refresh JWT pair on login. Where the pair
// lives is the caller's business: the CLI persists it to disk, tests and
// embedded callers keep it in memory. `ApiClient` only ever reads the
// access token through this trait.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// An access token and the refresh token issued alongside it.
#[derive(Clone)]
pub struct TokenPair {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: refresh_token.map(SecretString::from),
        }
    }

    /// `true` when the access token is blank (some servers answer a failed
    /// refresh with an empty string instead of an error).
    pub fn is_blank(&self) -> bool {
        self.access_token.expose_secret().trim().is_empty()
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"****")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "****"),
            )
            .finish()
    }
}

/// Storage backend for the session's token pair.
pub trait TokenStore: Send + Sync {
    /// The currently stored pair, if any.
    fn load(&self) -> Option<TokenPair>;

    /// Replace the stored pair.
    fn save(&self, tokens: &TokenPair) -> Result<(), Error>;

    /// Forget the stored pair (logout).
    fn clear(&self) -> Result<(), Error>;

    /// The access token, ignoring blank values.
    fn access_token(&self) -> Option<SecretString> {
        self.load()
            .filter(|t| !t.is_blank())
            .map(|t| t.access_token)
    }

    /// The refresh token, if one was issued.
    fn refresh_token(&self) -> Option<SecretString> {
        self.load().and_then(|t| t.refresh_token)
    }
}

/// In-memory token store. Lost when the process exits.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: ArcSwapOption<TokenPair>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with `tokens`.
    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: ArcSwapOption::from_pointee(tokens),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<TokenPair> {
        self.tokens.load_full().map(|t| TokenPair::clone(&t))
    }

    fn save(&self, tokens: &TokenPair) -> Result<(), Error> {
        self.tokens.store(Some(Arc::new(tokens.clone())));
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        self.tokens.store(None);
        Ok(())
    }
}
