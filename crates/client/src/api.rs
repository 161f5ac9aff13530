//! REST API client for the shop backend.
//!
//! Thin wrapper over `reqwest` that attaches the session's bearer token,
//! speaks JSON, and turns non-2xx answers into [`ClientError::Api`] with the
//! server's `message`. It never retries and sets no timeout of its own.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::session::{SessionStore, TokenKind};

/// Backend REST client.
///
/// Cheap to clone; clones share the connection pool and the session handle.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    session: SessionStore,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the HTTP client cannot be built
    /// (for example when no TLS backend is available).
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("fierce-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_url.clone(),
                session,
            }),
        })
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Absolute URL of an API path (leading `/` optional).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Url` if the path cannot be joined onto the base.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Issue a request and return the parsed JSON body.
    ///
    /// The bearer token of `kind` is attached when the session holds one and
    /// omitted otherwise; rejecting anonymous calls is the server's job. An
    /// empty 2xx body is returned as `Value::Null`.
    ///
    /// # Errors
    ///
    /// - `ClientError::Api` for non-2xx responses, carrying the body's
    ///   `message` field or the status text.
    /// - `ClientError::Transport` when no response arrives.
    /// - `ClientError::Decode` when a 2xx body is not JSON.
    #[instrument(skip(self, body), fields(method = %method))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        kind: TokenKind,
    ) -> Result<Value> {
        let url = self.endpoint(path)?;

        let mut request = self
            .inner
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = self.inner.session.get_token(kind) {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.inspect_err(|err| {
            tracing::warn!(error = %err, "API request failed before a response arrived");
        })?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            tracing::debug!(%status, bytes = bytes.len(), "API request succeeded");
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let message = error_message(status, &bytes);
        tracing::warn!(%status, %message, "API request rejected");
        Err(ClientError::Api { status, message })
    }

    /// `GET` a path and deserialize the body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`]; a body of the wrong shape is
    /// `ClientError::Decode`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, kind: TokenKind) -> Result<T> {
        let body = self.request(Method::GET, path, None, kind).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// `POST` a JSON body and deserialize the answer.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<B, T>(&self, path: &str, body: &B, kind: TokenKind) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let answer = self.request(Method::POST, path, Some(&body), kind).await?;
        Ok(serde_json::from_value(answer)?)
    }

    /// `PUT` without a body and deserialize the answer.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put<T: DeserializeOwned>(&self, path: &str, kind: TokenKind) -> Result<T> {
        let answer = self.request(Method::PUT, path, None, kind).await?;
        Ok(serde_json::from_value(answer)?)
    }
}

/// Message for a rejected request: the body's `message`, else the status text.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|value| value.get("message"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map_or_else(
            || {
                status
                    .canonical_reason()
                    .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned)
            },
            str::to_owned,
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let config =
            ClientConfig::from_lookup(|key| (key == "FIERCE_API_URL").then(|| base.to_string()))
                .unwrap();
        ApiClient::new(&config, SessionStore::in_memory()).unwrap()
    }

    #[test]
    fn test_endpoint_appends_to_base_path() {
        let api = client("http://127.0.0.1:5000/api/v1");
        assert_eq!(
            api.endpoint("/admin/orders/42/approve").unwrap().as_str(),
            "http://127.0.0.1:5000/api/v1/admin/orders/42/approve"
        );
        assert_eq!(
            api.endpoint("admin/products").unwrap().as_str(),
            "http://127.0.0.1:5000/api/v1/admin/products"
        );
    }

    #[test]
    fn test_error_message_prefers_body_message() {
        let message = error_message(StatusCode::NOT_FOUND, br#"{"message":"Order not found"}"#);
        assert_eq!(message, "Order not found");
    }

    #[test]
    fn test_error_message_falls_back_to_status_text() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>"),
            "Internal Server Error"
        );
        assert_eq!(
            error_message(StatusCode::FORBIDDEN, br#"{"error":"nope"}"#),
            "Forbidden"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, br#"{"message":"  "}"#),
            "Bad Request"
        );
        assert_eq!(
            error_message(StatusCode::from_u16(599).unwrap(), b""),
            "HTTP 599"
        );
    }

    #[test]
    fn test_debug_hides_session() {
        let api = client("http://shop.test/api/v1");
        let debug = format!("{api:?}");
        assert!(debug.contains("http://shop.test/api/v1/"));
    }
}
