use reqwest::Method;
use serde_json::Value;

use crate::error::Result;
use crate::params::{ListConversationsParams, Query};
use crate::{require_id, CallWhiz};

impl CallWhiz {
    /// Lists conversation history, optionally for one agent.
    pub async fn list_conversations(&self, params: ListConversationsParams) -> Result<Value> {
        let mut query = Query::paged(params.page, params.limit);
        query.push_opt("agent_id", params.agent_id.as_deref());
        query.push_date("from_date", params.from_date);
        query.push_date("to_date", params.to_date);
        self.request(Method::GET, "/conversations", query.into_pairs(), None)
            .await
    }

    /// Full conversation record, including turns and analysis.
    pub async fn get_conversation(&self, conversation_id: &str) -> Result<Value> {
        let conversation_id = require_id(conversation_id, "Conversation")?;
        self.request(
            Method::GET,
            &format!("/conversations/{conversation_id}"),
            Vec::new(),
            None,
        )
        .await
    }
}
