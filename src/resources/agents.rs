use reqwest::Method;

use super::validated;
use crate::error::Result;
use crate::params::{CreateAgentParams, ListAgentsParams, Query, UpdateAgentParams};
use crate::schema::SchemaKind;
use crate::types::Agent;
use crate::{require_id, CallWhiz};

impl CallWhiz {
    /// Creates a voice agent. `name`, `voice`, `llm` and `prompt` are required;
    /// unset voice, llm and settings values are filled with their defaults.
    pub async fn create_agent(&self, params: CreateAgentParams) -> Result<Agent> {
        let body = validated(SchemaKind::AgentCreate, &params)?;
        self.request(Method::POST, "/agents", Vec::new(), Some(body))
            .await
    }

    /// Fetches a single agent by id.
    pub async fn get_agent(&self, agent_id: &str) -> Result<Agent> {
        let agent_id = require_id(agent_id, "Agent")?;
        self.request(Method::GET, &format!("/agents/{agent_id}"), Vec::new(), None)
            .await
    }

    /// Lists agents, one page at a time (page 1, 20 per page by default).
    pub async fn list_agents(&self, params: ListAgentsParams) -> Result<Vec<Agent>> {
        let mut query = Query::paged(params.page, params.limit);
        query.push_opt("status", params.status.as_deref());
        self.request(Method::GET, "/agents", query.into_pairs(), None)
            .await
    }

    /// Sends only the fields set in `params`; at least one must be set.
    pub async fn update_agent(&self, agent_id: &str, params: UpdateAgentParams) -> Result<Agent> {
        let agent_id = require_id(agent_id, "Agent")?;
        let body = validated(SchemaKind::AgentUpdate, &params)?;
        self.request(
            Method::PUT,
            &format!("/agents/{agent_id}"),
            Vec::new(),
            Some(body),
        )
        .await
    }

    /// Deactivates an agent.
    pub async fn delete_agent(&self, agent_id: &str) -> Result<bool> {
        let agent_id = require_id(agent_id, "Agent")?;
        self.request::<serde_json::Value>(
            Method::DELETE,
            &format!("/agents/{agent_id}"),
            Vec::new(),
            None,
        )
        .await?;
        Ok(true)
    }
}
