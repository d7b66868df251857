mod error;
mod params;
mod resources;
mod schema;
mod transport;
mod types;
mod webhook;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

pub use error::{CallWhizError, Result};
pub use params::{
    CreateAgentParams, CreateApiKeyParams, CreateWebhookParams, ListAgentsParams,
    ListCallsParams, ListConversationsParams, StartCallParams, UpdateAgentParams,
    UpdateWebhookParams, UsageParams,
};
pub use reqwest::Method;
pub use schema::{validate, SchemaKind};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
pub use types::{
    Agent, AgentSettings, ApiKey, Call, CallWhizConfig, LlmConfig, RetryPolicy, VoiceConfig,
    Webhook, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS,
};
pub use webhook::{sign_webhook_payload, verify_webhook_signature};

use types::Envelope;

const API_KEY_HEADER: &str = "X-API-Key";

/// Client for the CallWhiz voice agent API.
///
/// Each method issues at most one request and resolves to the `data` part of
/// the response envelope, or to a typed [`CallWhizError`]. Nothing is cached
/// and nothing is retried; the client holds only immutable configuration and
/// a shared transport handle, so clones can be used concurrently.
#[derive(Clone)]
pub struct CallWhiz {
    transport: Arc<dyn Transport>,
    config: Arc<CallWhizConfig>,
}

impl fmt::Debug for CallWhiz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallWhiz")
            .field("base_url", &self.config.base_url)
            .field("timeout_ms", &self.config.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl CallWhiz {
    /// Creates a client using the default `reqwest` transport.
    pub fn new(config: CallWhizConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_millis(config.timeout_ms))
            .map_err(|e| CallWhizError::api(format!("Request failed: {e}"), None))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client from `CALLWHIZ_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(CallWhizConfig::from_env()?)
    }

    /// Creates a client that sends every request through `transport`.
    pub fn with_transport(config: CallWhizConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(CallWhizError::validation("API key is required"));
        }
        if reqwest::header::HeaderValue::from_str(&config.api_key).is_err() {
            return Err(CallWhizError::validation(
                "API key contains characters not allowed in a header",
            ));
        }

        Ok(Self {
            transport,
            config: Arc::new(config),
        })
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &CallWhizConfig {
        &self.config
    }

    /// Releases this handle's share of the transport.
    pub fn close(self) {
        debug!(base_url = %self.config.base_url, "closing client");
    }

    /// See [`verify_webhook_signature`].
    pub fn verify_webhook_signature(payload: impl AsRef<[u8]>, signature: &str, secret: &str) -> bool {
        verify_webhook_signature(payload, signature, secret)
    }

    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<T> {
        let data = self.dispatch(method, path, query, body).await?;
        serde_json::from_value(data)
            .map_err(|e| CallWhizError::api(format!("Invalid response data: {e}"), None))
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!(method = %method, path, query_params = query.len(), "dispatching request");

        let request = HttpRequest {
            method,
            url,
            headers: vec![
                (API_KEY_HEADER.to_string(), self.config.api_key.clone()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            query,
            body,
            timeout: Duration::from_millis(self.config.timeout_ms),
        };

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(path, error = %e, "transport failure");
            CallWhizError::api(format!("Request failed: {e}"), None)
        })?;

        if !(200..300).contains(&response.status) {
            let err = classify(&response);
            warn!(path, status = response.status, error = %err, "request rejected");
            return Err(err);
        }

        unwrap_envelope(&response).map_err(|err| {
            warn!(path, error = %err, "request failed");
            err
        })
    }
}

/// Fails with a validation error before any request if `id` is blank, and
/// otherwise returns it percent-encoded as a single path segment.
pub(crate) fn require_id<'a>(id: &'a str, label: &str) -> Result<Cow<'a, str>> {
    if id.trim().is_empty() {
        return Err(CallWhizError::validation(format!("{label} ID is required")));
    }
    Ok(urlencoding::encode(id))
}

fn raw_body(response: &HttpResponse) -> Option<Value> {
    if response.body.is_empty() {
        return None;
    }
    serde_json::from_slice(&response.body)
        .ok()
        .or_else(|| Some(Value::String(String::from_utf8_lossy(&response.body).into_owned())))
}

/// Maps a non-2xx response to its error kind. The status decides the kind;
/// the body only contributes the message.
fn classify(response: &HttpResponse) -> CallWhizError {
    let status = response.status;
    let body = raw_body(response);
    let message = body
        .as_ref()
        .and_then(|b| {
            b.pointer("/error/message")
                .and_then(Value::as_str)
                .or_else(|| b.get("message").and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status code {status}"));

    match status {
        401 => CallWhizError::authentication("Invalid API key"),
        404 => CallWhizError::api("Resource not found", Some(404)),
        400 | 422 => CallWhizError::Validation { message, status },
        429 => {
            let retry_after = response
                .headers
                .get("retry-after")
                .and_then(|v| v.trim().parse().ok());
            CallWhizError::rate_limit("Rate limit exceeded", retry_after)
        }
        _ => CallWhizError::Api {
            message: format!("HTTP {status}: {message}"),
            status: Some(status),
            response: body,
        },
    }
}

fn unwrap_envelope(response: &HttpResponse) -> Result<Value> {
    let envelope: Envelope = serde_json::from_slice(&response.body).map_err(|e| {
        CallWhizError::Api {
            message: format!("Invalid response body: {e}"),
            status: Some(response.status),
            response: raw_body(response),
        }
    })?;

    if !envelope.success {
        let message = envelope
            .error
            .and_then(|e| e.message)
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(CallWhizError::api(message, None));
    }

    Ok(envelope.data.unwrap_or(Value::Null))
}
