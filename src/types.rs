use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CallWhizError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/v1/api/developer/v1";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Connection settings for a [`crate::CallWhiz`] client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallWhizConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl CallWhizConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Reads `CALLWHIZ_API_KEY`, `CALLWHIZ_BASE_URL` and `CALLWHIZ_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("CALLWHIZ_API_KEY")
            .map_err(|_| CallWhizError::validation("API key is required"))?;
        let mut config = Self::new(api_key);

        if let Ok(base_url) = std::env::var("CALLWHIZ_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("CALLWHIZ_TIMEOUT_MS") {
            config.timeout_ms = timeout.trim().parse().map_err(|_| {
                CallWhizError::validation(format!("Invalid CALLWHIZ_TIMEOUT_MS: {timeout}"))
            })?;
        }

        Ok(config)
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Voice synthesis settings. Fields are optional so the same record serves
/// create payloads, partial updates and server responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VoiceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
}

impl VoiceConfig {
    pub fn new(provider: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
            voice_id: Some(voice_id.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i64>,
}

impl LlmConfig {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
            model: Some(model.into()),
            ..Default::default()
        }
    }
}

/// Call-handling behaviour of an agent. Durations are in seconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_call_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_interruptions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silence_timeout: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_delay: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RetryPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff_multiplier: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub voice: Option<VoiceConfig>,
    pub llm: Option<LlmConfig>,
    pub prompt: Option<String>,
    pub first_message: Option<String>,
    pub settings: Option<AgentSettings>,
    pub status: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Call {
    pub id: String,
    pub agent_id: String,
    pub phone_number: String,
    pub status: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: Option<String>,
    pub completed_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Webhook {
    #[serde(alias = "webhook_id")]
    pub id: String,
    pub url: String,
    pub events: Vec<String>,
    pub description: Option<String>,
    pub agent_ids: Option<Vec<String>>,
    pub active: Option<bool>,
    pub retry_policy: Option<RetryPolicy>,
    pub headers: Option<Map<String, Value>>,
    /// Signing secret, only present on creation responses.
    pub secret: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    /// The secret is only returned once, by the create call.
    pub key: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response wrapper every endpoint returns.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<EnvelopeError>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EnvelopeError {
    #[serde(default)]
    pub message: Option<String>,
}
