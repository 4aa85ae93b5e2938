//! Authenticated transport.
//!
//! Every outbound API call goes through here. The session credential is
//! attached as a bearer token, except on the sign-in endpoints, which are
//! sent bare. A 401 is reported to the [`SessionGuard`] once, before the
//! failure is returned to the caller.

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::foundation::RemoteError;
use crate::ports::{ActiveCredential, SessionGuard};

/// Endpoints that never carry a credential.
const PUBLIC_ENDPOINTS: &[&str] = &["auth/login", "auth/register", "auth/reset-password"];

/// Endpoints whose 401 does not count as a session rejection. An expired
/// credential being refused on sign-out is the expected outcome.
const UNREPORTED_ENDPOINTS: &[&str] = &["auth/logout"];

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest server error body kept in [`RemoteError::Server`].
const MAX_ERROR_BODY: usize = 512;

fn normalize(path: &str) -> &str {
    path.trim_start_matches('/')
}

fn is_public(path: &str) -> bool {
    PUBLIC_ENDPOINTS.contains(&normalize(path))
}

fn reports_rejection(path: &str) -> bool {
    !UNREPORTED_ENDPOINTS.contains(&normalize(path))
}

/// Configuration for the API transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl TransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

pub struct AuthenticatedTransport {
    client: Client,
    base_url: String,
    guard: Arc<dyn SessionGuard>,
}

impl AuthenticatedTransport {
    pub fn new(config: TransportConfig, guard: Arc<dyn SessionGuard>) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| RemoteError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            guard,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, RemoteError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        decode(response).await
    }

    /// POST whose response body is ignored.
    pub async fn post_unit<B>(&self, path: &str, body: Option<&B>) -> Result<(), RemoteError>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.send(Method::POST, path, body).await?;
        Ok(())
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, RemoteError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PATCH, path, Some(body)).await?;
        decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), RemoteError> {
        self.send(Method::DELETE, path, None::<&()>).await?;
        Ok(())
    }

    /// Sends one request and classifies the outcome.
    ///
    /// Without a credential, a protected endpoint fails with `Unauthorized`
    /// before anything is sent. That failure is not reported: the session is
    /// already gone.
    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response, RemoteError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let active = if is_public(path) {
            None
        } else {
            match self.guard.active_credential().await {
                Some(active) => Some(active),
                None => {
                    debug!(%method, path, "no session credential, not sending");
                    return Err(RemoteError::Unauthorized);
                }
            }
        };

        let request_id = Uuid::new_v4().to_string();
        let url = format!("{}/{}", self.base_url, normalize(path));
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(REQUEST_ID_HEADER, &request_id);
        if let Some(active) = &active {
            request = request.bearer_auth(active.credential.expose());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, path, request_id = %request_id, "sending API request");
        let response = request.send().await.map_err(classify_send_error)?;
        let status = response.status();
        debug!(%method, path, request_id = %request_id, status = status.as_u16(), "API response");

        if status.is_success() {
            return Ok(response);
        }
        Err(self.classify_failure(path, active, response).await)
    }

    async fn classify_failure(
        &self,
        path: &str,
        active: Option<ActiveCredential>,
        response: Response,
    ) -> RemoteError {
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => {
                if let Some(active) = active.filter(|_| reports_rejection(path)) {
                    if self.guard.report_unauthorized(active.epoch).await {
                        info!(path, epoch = %active.epoch, "credential rejected, session invalidated");
                    }
                }
                RemoteError::Unauthorized
            }
            StatusCode::NOT_FOUND => RemoteError::NotFound,
            _ => {
                let body = response.text().await.unwrap_or_default();
                RemoteError::server(status.as_u16(), error_message(status, &body))
            }
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    let status = response.status();
    response.json::<T>().await.map_err(|e| {
        RemoteError::server(status.as_u16(), format!("undecodable response body: {}", e))
    })
}

fn classify_send_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::network("request timed out")
    } else if e.is_connect() {
        RemoteError::network(format!("connection failed: {}", e))
    } else if e.is_builder() {
        RemoteError::server(0, format!("request could not be built: {}", e))
    } else {
        RemoteError::network(e.to_string())
    }
}

/// Prefers the API's `message`/`error` field over the raw body.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        });

    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
        None => body.chars().take(MAX_ERROR_BODY).collect(),
    }
}
