//! Per-operation arguments.
//!
//! Every field is an `Option`: `None` means "not provided" and is never sent,
//! while `Some` is sent as given, even if empty, and left for the schema to
//! judge.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{AgentSettings, LlmConfig, RetryPolicy, VoiceConfig};

pub(crate) const DEFAULT_PAGE: u32 = 1;
pub(crate) const DEFAULT_LIMIT: u32 = 20;
pub(crate) const DEFAULT_USAGE_PERIOD: &str = "month";

/// Arguments for [`crate::CallWhiz::create_agent`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateAgentParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<AgentSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl CreateAgentParams {
    /// The four fields an agent cannot be created without.
    pub fn new(
        name: impl Into<String>,
        voice: VoiceConfig,
        llm: LlmConfig,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            voice: Some(voice),
            llm: Some(llm),
            prompt: Some(prompt.into()),
            ..Default::default()
        }
    }
}

/// Partial agent update; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAgentParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<AgentSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Paging and status filter for [`crate::CallWhiz::list_agents`].
#[derive(Debug, Clone, Default)]
pub struct ListAgentsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
}

/// Arguments for [`crate::CallWhiz::start_call`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct StartCallParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl StartCallParams {
    pub fn new(agent_id: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            agent_id: Some(agent_id.into()),
            phone_number: Some(phone_number.into()),
            ..Default::default()
        }
    }
}

/// Paging and filters for [`crate::CallWhiz::list_calls`].
#[derive(Debug, Clone, Default)]
pub struct ListCallsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub agent_id: Option<String>,
    pub status: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Arguments for [`crate::CallWhiz::create_webhook`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateWebhookParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_ids: Option<Vec<String>>,
    /// Defaults to `true` when left unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<RetryPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl CreateWebhookParams {
    pub fn new<I, S>(url: impl Into<String>, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: Some(url.into()),
            events: Some(events.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }
}

/// Partial webhook update; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateWebhookParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<RetryPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Paging and filters for [`crate::CallWhiz::list_conversations`].
#[derive(Debug, Clone, Default)]
pub struct ListConversationsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub agent_id: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Reporting window for [`crate::CallWhiz::get_usage`].
#[derive(Debug, Clone, Default)]
pub struct UsageParams {
    /// Defaults to `"month"`.
    pub period: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Arguments for [`crate::CallWhiz::create_api_key`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateApiKeyParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl CreateApiKeyParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Accumulates query parameters, dropping filters that were not supplied.
#[derive(Debug, Default)]
pub(crate) struct Query(Vec<(String, String)>);

impl Query {
    pub fn paged(page: Option<u32>, limit: Option<u32>) -> Self {
        let mut query = Self::default();
        query.push("page", page.unwrap_or(DEFAULT_PAGE));
        query.push("limit", limit.unwrap_or(DEFAULT_LIMIT));
        query
    }

    pub fn push(&mut self, key: &str, value: impl ToString) {
        self.0.push((key.to_string(), value.to_string()));
    }

    pub fn push_opt(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.push(key, value);
        }
    }

    pub fn push_date(&mut self, key: &str, value: Option<NaiveDate>) {
        if let Some(date) = value {
            self.push(key, date.format("%Y-%m-%d"));
        }
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}
