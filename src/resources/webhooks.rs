use reqwest::Method;
use serde_json::Value;

use super::validated;
use crate::error::Result;
use crate::params::{CreateWebhookParams, UpdateWebhookParams};
use crate::schema::SchemaKind;
use crate::types::Webhook;
use crate::{require_id, CallWhiz};

impl CallWhiz {
    /// Registers a webhook endpoint. The response carries the signing secret.
    pub async fn create_webhook(&self, params: CreateWebhookParams) -> Result<Webhook> {
        let body = validated(SchemaKind::WebhookCreate, &params)?;
        self.request(Method::POST, "/webhooks", Vec::new(), Some(body))
            .await
    }

    /// Lists all registered webhooks.
    pub async fn list_webhooks(&self) -> Result<Vec<Webhook>> {
        self.request(Method::GET, "/webhooks", Vec::new(), None)
            .await
    }

    /// Fetches a single webhook by id.
    pub async fn get_webhook(&self, webhook_id: &str) -> Result<Webhook> {
        let webhook_id = require_id(webhook_id, "Webhook")?;
        self.request(
            Method::GET,
            &format!("/webhooks/{webhook_id}"),
            Vec::new(),
            None,
        )
        .await
    }

    /// Sends only the fields set in `params`; at least one must be set.
    pub async fn update_webhook(
        &self,
        webhook_id: &str,
        params: UpdateWebhookParams,
    ) -> Result<Webhook> {
        let webhook_id = require_id(webhook_id, "Webhook")?;
        let body = validated(SchemaKind::WebhookUpdate, &params)?;
        self.request(
            Method::PUT,
            &format!("/webhooks/{webhook_id}"),
            Vec::new(),
            Some(body),
        )
        .await
    }

    /// Removes a webhook.
    pub async fn delete_webhook(&self, webhook_id: &str) -> Result<bool> {
        let webhook_id = require_id(webhook_id, "Webhook")?;
        self.request::<Value>(
            Method::DELETE,
            &format!("/webhooks/{webhook_id}"),
            Vec::new(),
            None,
        )
        .await?;
        Ok(true)
    }

    /// Lists the event names a webhook can subscribe to.
    pub async fn get_available_webhook_events(&self) -> Result<Value> {
        self.request(Method::GET, "/webhooks/events", Vec::new(), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::resources::test_support::client;
    use crate::transport::mock::MockTransport;
    use crate::{CallWhizError, CreateWebhookParams, RetryPolicy, UpdateWebhookParams};

    #[tokio::test]
    async fn create_defaults_active_and_keeps_options() {
        let transport = MockTransport::ok(json!({
            "webhook_id": "wh_1",
            "url": "https://example.com/hook",
            "events": ["call.started", "call.completed"],
            "secret": "whsec_abc"
        }));
        let params = CreateWebhookParams {
            agent_ids: Some(vec!["a1".into()]),
            retry_policy: Some(RetryPolicy {
                max_retries: Some(3),
                retry_delay: Some(60.0),
                backoff_multiplier: Some(2.0),
            }),
            ..CreateWebhookParams::new("https://example.com/hook", ["call.started", "call.completed"])
        };

        let webhook = client(&transport).create_webhook(params).await.unwrap();
        assert_eq!(webhook.id, "wh_1");
        assert_eq!(webhook.secret.as_deref(), Some("whsec_abc"));

        let body = transport.last_request().unwrap().body.unwrap();
        assert_eq!(body["active"], json!(true));
        assert_eq!(body["agent_ids"], json!(["a1"]));
        assert_eq!(body["retry_policy"]["max_retries"], json!(3));
    }

    #[tokio::test]
    async fn non_http_url_never_dispatches() {
        let transport = MockTransport::ok(json!({}));
        let err = client(&transport)
            .create_webhook(CreateWebhookParams::new("ftp://example.com", ["call.started"]))
            .await
            .unwrap_err();
        assert!(err.message().contains("\"url\" must be a valid uri"));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn empty_events_never_dispatch() {
        let transport = MockTransport::ok(json!({}));
        let params = CreateWebhookParams::new("https://example.com/hook", Vec::<String>::new());
        let err = client(&transport).create_webhook(params).await.unwrap_err();
        assert!(err.message().contains("\"events\" must contain at least 1 items"));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn update_requires_a_field() {
        let transport = MockTransport::ok(json!({}));
        let sdk = client(&transport);

        let err = sdk
            .update_webhook("wh_1", UpdateWebhookParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CallWhizError::Validation { .. }));
        assert_eq!(transport.calls(), 0);

        sdk.update_webhook(
            "wh_1",
            UpdateWebhookParams {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://api.test/v1/webhooks/wh_1");
        assert_eq!(request.body.unwrap(), json!({"active": false}));
    }

    #[tokio::test]
    async fn list_get_delete_and_events() {
        let transport = MockTransport::ok(json!([]));
        let sdk = client(&transport);

        assert!(sdk.list_webhooks().await.unwrap().is_empty());
        assert!(transport.last_request().unwrap().query.is_empty());

        sdk.get_available_webhook_events().await.unwrap();
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://api.test/v1/webhooks/events"
        );

        assert!(sdk.delete_webhook("wh_1").await.unwrap());
        assert_eq!(
            sdk.get_webhook(" ").await.unwrap_err(),
            CallWhizError::validation("Webhook ID is required")
        );
        assert_eq!(transport.calls(), 3);
    }
}
