// Authentication endpoints
//
// Login, registration and refresh persist the returned tokens into the
// client's `TokenStore`; logout always clears it.

use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::ApiClient;
use crate::error::Error;
use crate::tokens::TokenPair;
use crate::types::{
    AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, TokenRefreshResponse, User,
};

/// `/auth/me` answers either with the user or with `{ "user": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum MePayload {
    Wrapped { user: User },
    Bare(User),
}

impl ApiClient {
    /// Authenticate with email and password.
    ///
    /// `POST /auth/login`
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, Error> {
        debug!(email = %request.email, "logging in");
        let auth: AuthResponse = self.post(&["auth", "login"], request).await?;
        self.store_auth(&auth)?;
        info!(user = %auth.user.email, role = %auth.user.role, "logged in");
        Ok(auth)
    }

    /// Create a resident account. The server logs the new user in.
    ///
    /// `POST /auth/register`
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, Error> {
        debug!(email = %request.email, "registering");
        let auth: AuthResponse = self.post(&["auth", "register"], request).await?;
        self.store_auth(&auth)?;
        info!(user = %auth.user.email, "registered");
        Ok(auth)
    }

    /// The user the current access token belongs to.
    ///
    /// `GET /auth/me`
    pub async fn me(&self) -> Result<User, Error> {
        let payload: MePayload = self.get(&["auth", "me"]).await?;
        Ok(match payload {
            MePayload::Wrapped { user } | MePayload::Bare(user) => user,
        })
    }

    /// Exchange the stored refresh token for a new token pair.
    ///
    /// `POST /auth/refresh-token`
    ///
    /// Fails with `Unauthorized` without a request when no refresh token is
    /// stored. A response without a new refresh token keeps the old one.
    pub async fn refresh_tokens(&self) -> Result<(), Error> {
        let Some(refresh) = self.tokens.refresh_token() else {
            return Err(Error::Unauthorized {
                message: "no refresh token available".into(),
            });
        };

        debug!("refreshing access token");
        let body = RefreshRequest {
            refresh_token: refresh.expose_secret(),
        };
        let fresh: TokenRefreshResponse = self.post(&["auth", "refresh-token"], &body).await?;

        let refresh_token = fresh
            .refresh_token
            .or_else(|| Some(refresh.expose_secret().to_owned()));
        self.tokens
            .save(&TokenPair::new(fresh.access_token, refresh_token))
    }

    /// End the session server-side and drop the stored tokens.
    ///
    /// `POST /auth/logout`
    ///
    /// Tokens are cleared even when the server call fails; the server error
    /// is still returned so callers can log it.
    pub async fn logout(&self) -> Result<(), Error> {
        let result = if self.has_access_token() {
            self.post_empty(&["auth", "logout"]).await
        } else {
            Ok(())
        };
        if let Err(e) = &result {
            warn!(error = %e, "server-side logout failed");
        }
        self.tokens.clear()?;
        info!("logged out");
        result
    }

    fn store_auth(&self, auth: &AuthResponse) -> Result<(), Error> {
        self.tokens.save(&TokenPair::new(
            auth.access_token.clone(),
            auth.refresh_token.clone(),
        ))
    }
}
