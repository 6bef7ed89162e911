// ── Authenticated session ──
//
// Owns the API client and publishes the signed-in user on a watch channel.
// Front-ends subscribe instead of reading a global. Creator checks rely on
// the user returned by `/auth/me`; tokens are never decoded locally.

use std::sync::Arc;

use society_api::types::User;
use society_api::{ApiClient, Error as ApiError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::validation::{LoginForm, RegistrationForm};

pub struct Session {
    client: Arc<ApiClient>,
    user: watch::Sender<Option<User>>,
}

impl Session {
    pub fn new(client: Arc<ApiClient>) -> Self {
        let (user, _) = watch::channel(None);
        Self { client, user }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Restore the session from stored tokens.
    ///
    /// With no access token this is a no-op. An expired token is refreshed
    /// once and `/auth/me` retried once. If the server still rejects the
    /// credentials the stored tokens are cleared and the session is signed
    /// out. Any other failure is returned and the tokens are kept.
    pub async fn init(&self) -> Result<Option<User>, CoreError> {
        if !self.client.has_access_token() {
            debug!("no stored access token");
            self.user.send_replace(None);
            return Ok(None);
        }

        match self.fetch_me().await {
            Ok(user) => {
                info!(user = %user.email, role = %user.role, "session restored");
                self.user.send_replace(Some(user.clone()));
                Ok(Some(user))
            }
            Err(e) if e.is_auth_expired() => {
                warn!(error = %e, "stored credentials rejected; clearing tokens");
                self.sign_out_locally()?;
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "could not restore session");
                Err(e.into())
            }
        }
    }

    async fn fetch_me(&self) -> Result<User, ApiError> {
        match self.client.me().await {
            Err(e) if e.is_auth_expired() && self.client.tokens().refresh_token().is_some() => {
                debug!("access token rejected; refreshing once");
                self.client.refresh_tokens().await?;
                self.client.me().await
            }
            other => other,
        }
    }

    pub async fn login(&self, form: &LoginForm) -> Result<User, CoreError> {
        let request = form.validate()?;
        let auth = self.client.login(&request).await?;
        self.user.send_replace(Some(auth.user.clone()));
        Ok(auth.user)
    }

    pub async fn register(&self, form: &RegistrationForm) -> Result<User, CoreError> {
        let request = form.validate()?;
        let auth = self.client.register(&request).await?;
        self.user.send_replace(Some(auth.user.clone()));
        Ok(auth.user)
    }

    /// Best-effort server logout, then local sign-out.
    ///
    /// Only a failure to clear stored tokens is reported; a failed server
    /// call has already been logged by the client.
    pub async fn logout(&self) -> Result<(), CoreError> {
        let result = self.client.logout().await;
        self.user.send_replace(None);
        match result {
            Err(ApiError::TokenStorage(msg)) => Err(CoreError::Config {
                message: format!("Token storage: {msg}"),
            }),
            _ => Ok(()),
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    pub fn require_user(&self) -> Result<User, CoreError> {
        self.current_user().ok_or(CoreError::NotAuthenticated)
    }

    /// The signed-in user, restoring the session from stored tokens first
    /// when nothing has been published yet.
    pub async fn ensure_user(&self) -> Result<User, CoreError> {
        if let Some(user) = self.current_user() {
            return Ok(user);
        }
        self.init().await?;
        self.require_user()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    fn sign_out_locally(&self) -> Result<(), CoreError> {
        self.user.send_replace(None);
        self.client.tokens().clear().map_err(CoreError::from)
    }
}
