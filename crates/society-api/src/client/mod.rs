// Society Ease REST client
//
// Wraps `reqwest::Client` with base-URL path building, bearer-token
// attachment, and envelope unwrapping. Endpoint groups (auth, alerts,
// parking, billing, users) are inherent methods in sibling files so this
// module stays focused on transport mechanics.

mod alerts;
mod auth;
mod billing;
mod parking;
mod users;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::tokens::TokenStore;
use crate::transport::TransportConfig;
use crate::types::{Envelope, ErrorBody, Page};

/// Async client for the Society Ease backend.
///
/// Every call sends `Authorization: Bearer <token>` when the token store
/// holds an access token and omits the header otherwise. Responses are
/// unwrapped from the `{ success, message, data, errors }` envelope before
/// the caller sees them. Nothing is retried.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Build a client from a `TransportConfig`.
    ///
    /// `base_url` is the API root, e.g. `https://society.example/api`.
    pub fn new(
        base_url: Url,
        transport: &TransportConfig,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, tokens))
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            base_url,
            tokens,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The token store this client reads from.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// `true` when an access token is available to attach.
    pub fn has_access_token(&self) -> bool {
        self.tokens.access_token().is_some()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL. Segments are percent-encoded,
    /// so ids can be passed through unchecked.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{method} {url}");
        let builder = self.http.request(method, url);
        match self.tokens.access_token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let url = self.url(segments)?;
        let resp = self.request(Method::GET, url.clone()).send().await?;
        require_data(handle_envelope(resp).await?, &url)
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &Q,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        let resp = self
            .request(Method::GET, url.clone())
            .query(query)
            .send()
            .await?;
        require_data(handle_envelope(resp).await?, &url)
    }

    /// GET a list endpoint that answers with either a bare array or a page.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<Vec<T>, Error> {
        let payload: ListPayload<T> = self.get(segments).await?;
        Ok(payload.into_vec())
    }

    /// GET a body that is not wrapped in the envelope (file exports).
    pub(crate) async fn get_raw<Q: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &Q,
    ) -> Result<Vec<u8>, Error> {
        let url = self.url(segments)?;
        let resp = self.request(Method::GET, url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error(status, resp).await);
        }
        Ok(resp.bytes().await?.to_vec())
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        let resp = self
            .request(Method::POST, url.clone())
            .json(body)
            .send()
            .await?;
        require_data(handle_envelope(resp).await?, &url)
    }

    /// POST without a body, ignoring any `data` in the reply.
    pub(crate) async fn post_empty(&self, segments: &[&str]) -> Result<(), Error> {
        let url = self.url(segments)?;
        let resp = self.request(Method::POST, url).send().await?;
        handle_envelope::<serde_json::Value>(resp).await?;
        Ok(())
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        let resp = self
            .request(Method::PUT, url.clone())
            .json(body)
            .send()
            .await?;
        require_data(handle_envelope(resp).await?, &url)
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        let resp = self
            .request(Method::PATCH, url.clone())
            .json(body)
            .send()
            .await?;
        require_data(handle_envelope(resp).await?, &url)
    }

    pub(crate) async fn delete(&self, segments: &[&str]) -> Result<(), Error> {
        let url = self.url(segments)?;
        let resp = self.request(Method::DELETE, url).send().await?;
        handle_envelope::<serde_json::Value>(resp).await?;
        Ok(())
    }
}

// ── Response handling ────────────────────────────────────────────────

/// Unwrap the envelope of a response, returning its (optional) `data`.
///
/// An empty 2xx body (e.g. 204) counts as success without data.
async fn handle_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Option<T>, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error(status, resp).await);
    }

    let body = resp.text().await?;
    if body.trim().is_empty() {
        return Ok(None);
    }

    let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })?;

    if envelope.success {
        Ok(envelope.data)
    } else {
        Err(Error::Rejected {
            message: envelope
                .message
                .unwrap_or_else(|| "request was not successful".into()),
            errors: envelope.errors,
        })
    }
}

fn require_data<T>(data: Option<T>, url: &Url) -> Result<T, Error> {
    data.ok_or_else(|| Error::MissingData {
        endpoint: url.path().to_owned(),
    })
}

async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&raw).unwrap_or_default();

    let message = body
        .message
        .or(body.error)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| status.to_string(), str::to_owned)
        });

    if status == StatusCode::UNAUTHORIZED {
        Error::Unauthorized { message }
    } else {
        Error::Api {
            status: status.as_u16(),
            message,
            errors: body.errors,
        }
    }
}

/// Some list endpoints return a bare array, others a page.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ListPayload<T> {
    List(Vec<T>),
    Page(Page<T>),
}

impl<T> ListPayload<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::List(items) => items,
            Self::Page(page) => page.items,
        }
    }
}
