use reqwest::Method;
use serde_json::Value;

use super::validated;
use crate::error::Result;
use crate::params::{ListCallsParams, Query, StartCallParams};
use crate::schema::SchemaKind;
use crate::types::Call;
use crate::{require_id, CallWhiz};

impl CallWhiz {
    /// Places an outbound call from `agent_id` to `phone_number`.
    pub async fn start_call(&self, params: StartCallParams) -> Result<Call> {
        let body = validated(SchemaKind::CallCreate, &params)?;
        self.request(Method::POST, "/calls", Vec::new(), Some(body))
            .await
    }

    /// Fetches the status and details of a call.
    pub async fn get_call(&self, call_id: &str) -> Result<Call> {
        let call_id = require_id(call_id, "Call")?;
        self.request(Method::GET, &format!("/calls/{call_id}"), Vec::new(), None)
            .await
    }

    /// Lists calls, optionally filtered by agent, status and date range.
    pub async fn list_calls(&self, params: ListCallsParams) -> Result<Vec<Call>> {
        let mut query = Query::paged(params.page, params.limit);
        query.push_opt("agent_id", params.agent_id.as_deref());
        query.push_opt("status", params.status.as_deref());
        query.push_date("from_date", params.from_date);
        query.push_date("to_date", params.to_date);
        self.request(Method::GET, "/calls", query.into_pairs(), None)
            .await
    }

    /// Fetches the transcript of a finished call.
    pub async fn get_call_transcript(&self, call_id: &str) -> Result<Value> {
        let call_id = require_id(call_id, "Call")?;
        self.request(
            Method::GET,
            &format!("/calls/{call_id}/transcript"),
            Vec::new(),
            None,
        )
        .await
    }

    /// Returns the recording descriptor, including its download URL.
    pub async fn get_call_recording(&self, call_id: &str) -> Result<Value> {
        let call_id = require_id(call_id, "Call")?;
        self.request(
            Method::GET,
            &format!("/calls/{call_id}/recording"),
            Vec::new(),
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::resources::test_support::{client, query};
    use crate::transport::mock::MockTransport;
    use crate::{CallWhizError, ListCallsParams, StartCallParams};

    #[tokio::test]
    async fn start_call_posts_validated_body() {
        let transport = MockTransport::ok(json!({
            "id": "c1",
            "agent_id": "a1",
            "phone_number": "+1234567890",
            "status": "queued"
        }));
        let params = StartCallParams {
            context: Some("Follow up on order 42".into()),
            ..StartCallParams::new("a1", "+1234567890")
        };

        let call = client(&transport).start_call(params).await.unwrap();
        assert_eq!(call.status.as_deref(), Some("queued"));

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://api.test/v1/calls");
        assert_eq!(
            request.body.unwrap(),
            json!({
                "agent_id": "a1",
                "phone_number": "+1234567890",
                "context": "Follow up on order 42"
            })
        );
    }

    #[tokio::test]
    async fn bad_phone_number_never_dispatches() {
        let transport = MockTransport::ok(json!({}));
        let err = client(&transport)
            .start_call(StartCallParams::new("a1", "0123456789"))
            .await
            .unwrap_err();
        assert!(matches!(err, CallWhizError::Validation { .. }));
        assert!(err.message().contains("phone_number"));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn bad_callback_url_never_dispatches() {
        let transport = MockTransport::ok(json!({}));
        let params = StartCallParams {
            webhook_url: Some("ftp://example.com/cb".into()),
            ..StartCallParams::new("a1", "+1234567890")
        };
        assert!(client(&transport).start_call(params).await.is_err());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn list_calls_includes_only_supplied_filters() {
        let transport = MockTransport::ok(json!([]));
        let params = ListCallsParams {
            agent_id: Some("a1".into()),
            status: Some(String::new()),
            from_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };

        let calls = client(&transport).list_calls(params).await.unwrap();
        assert!(calls.is_empty());
        assert_eq!(
            transport.last_request().unwrap().query,
            query(&[
                ("page", "1"),
                ("limit", "20"),
                ("agent_id", "a1"),
                ("from_date", "2024-01-01")
            ])
        );
    }

    #[tokio::test]
    async fn transcript_and_recording_paths() {
        let transport = MockTransport::ok(json!({"url": "https://cdn.test/c1.mp3"}));
        let sdk = client(&transport);

        sdk.get_call_transcript("c1").await.unwrap();
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://api.test/v1/calls/c1/transcript"
        );

        let recording = sdk.get_call_recording("c1").await.unwrap();
        assert_eq!(recording["url"], "https://cdn.test/c1.mp3");
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://api.test/v1/calls/c1/recording"
        );
    }

    #[tokio::test]
    async fn call_id_is_required() {
        let transport = MockTransport::ok(json!({}));
        let sdk = client(&transport);
        let expected = CallWhizError::validation("Call ID is required");

        assert_eq!(sdk.get_call("").await.unwrap_err(), expected);
        assert_eq!(sdk.get_call_transcript("").await.unwrap_err(), expected);
        assert_eq!(sdk.get_call_recording("").await.unwrap_err(), expected);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn rate_limited_call_is_not_retried() {
        let transport = MockTransport::json(429, json!({}));
        let err = client(&transport).get_call("c1").await.unwrap_err();
        assert!(matches!(err, CallWhizError::RateLimit { .. }));
        assert_eq!(transport.calls(), 1);
    }
}
