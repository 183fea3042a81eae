//! Message endpoints

use serde::Serialize;
use serde_json::Value;

use crate::client::api::{to_body, BriqClient};
use crate::error::BriqResult;
use crate::utils::payload::non_empty;

/// Payload for `POST message/send-instant`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstantMessage {
    pub content: String,
    /// Phone numbers with country code
    pub recipients: Vec<String>,
    /// Registered sender ID name
    pub sender_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
}

impl InstantMessage {
    /// Message with no campaign or workspace attached
    pub fn new(
        content: impl Into<String>,
        recipients: Vec<String>,
        sender_id: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            recipients,
            sender_id: sender_id.into(),
            campaign_id: None,
            workspace_id: None,
        }
    }

    /// Attaches the message to a campaign; blank ids are ignored
    pub fn campaign_id(mut self, campaign_id: impl Into<String>) -> Self {
        self.campaign_id = non_empty(campaign_id);
        self
    }

    /// Sends on behalf of a workspace; blank ids are ignored
    pub fn workspace_id(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = non_empty(workspace_id);
        self
    }
}

/// Payload for `POST message/send-campaign`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignMessage {
    pub campaign_id: String,
    pub group_id: String,
    pub content: String,
    pub sender_id: String,
}

impl CampaignMessage {
    /// Message to every contact in `group_id` under `campaign_id`
    pub fn new(
        campaign_id: impl Into<String>,
        group_id: impl Into<String>,
        content: impl Into<String>,
        sender_id: impl Into<String>,
    ) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            group_id: group_id.into(),
            content: content.into(),
            sender_id: sender_id.into(),
        }
    }
}

/// Message endpoints, obtained from [`BriqClient::message`].
///
/// Every call returns the decoded JSON response as-is.
pub struct MessageApi<'a> {
    client: &'a BriqClient,
}

impl<'a> MessageApi<'a> {
    pub(crate) fn new(client: &'a BriqClient) -> Self {
        Self { client }
    }

    /// Sends a message right away. `POST message/send-instant`
    pub async fn send_instant(&self, message: InstantMessage) -> BriqResult<Value> {
        let body = to_body(&message)?;
        self.client.post("message/send-instant", Some(body)).await
    }

    /// Sends a message to a campaign group. `POST message/send-campaign`
    pub async fn send_campaign(&self, message: CampaignMessage) -> BriqResult<Value> {
        let body = to_body(&message)?;
        self.client.post("message/send-campaign", Some(body)).await
    }

    /// Delivery logs. `GET message/logs`
    pub async fn get_logs(&self) -> BriqResult<Value> {
        self.client.get("message/logs", None).await
    }

    /// Sent message history. `GET message/history`
    pub async fn get_history(&self) -> BriqResult<Value> {
        self.client.get("message/history", None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::api_key_client;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn recipients(numbers: &[&str]) -> Vec<String> {
        numbers.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_send_instant_with_campaign() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/message/send-instant"))
            .and(body_json(json!({
                "content": "Hello, this is a test message",
                "recipients": ["255788344348", "255712345678"],
                "sender_id": "test-sender",
                "campaign_id": "campaign-1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = api_key_client(&server, "k1");
        let message = InstantMessage::new(
            "Hello, this is a test message",
            recipients(&["255788344348", "255712345678"]),
            "test-sender",
        )
        .campaign_id("campaign-1");

        let result = client.message().send_instant(message).await.unwrap();
        assert_eq!(result["status"], "queued");
    }

    #[tokio::test]
    async fn test_send_instant_without_campaign() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/message/send-instant"))
            .and(body_json(json!({
                "content": "Hello, this is a test message",
                "recipients": ["255788344348"],
                "sender_id": "test-sender"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = api_key_client(&server, "k1");
        let message = InstantMessage::new(
            "Hello, this is a test message",
            recipients(&["255788344348"]),
            "test-sender",
        )
        .campaign_id("");

        client.message().send_instant(message).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_campaign() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/message/send-campaign"))
            .and(body_json(json!({
                "campaign_id": "campaign-1",
                "group_id": "group-1",
                "content": "Campaign message",
                "sender_id": "test-sender"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sent": 42})))
            .expect(1)
            .mount(&server)
            .await;

        let client = api_key_client(&server, "k1");
        let result = client
            .message()
            .send_campaign(CampaignMessage::new("campaign-1", "group-1", "Campaign message", "test-sender"))
            .await
            .unwrap();

        assert_eq!(result["sent"], 42);
    }

    #[tokio::test]
    async fn test_logs_and_history() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/message/logs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "log-1"}])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/message/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "msg-1"}])))
            .expect(1)
            .mount(&server)
            .await;

        let client = api_key_client(&server, "k1");
        let logs = client.message().get_logs().await.unwrap();
        let history = client.message().get_history().await.unwrap();

        assert_eq!(logs, json!([{"id": "log-1"}]));
        assert_eq!(history, json!([{"id": "msg-1"}]));
    }
}
