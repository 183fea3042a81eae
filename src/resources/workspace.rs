//! Workspace endpoints

use serde::Serialize;
use serde_json::Value;

use crate::client::api::{to_body, BriqClient};
use crate::error::BriqResult;
use crate::utils::payload::{non_empty, path_segment};

/// Payload for `POST workspace/create/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWorkspace {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewWorkspace {
    /// Workspace with a name and no description
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = non_empty(description);
        self
    }
}

impl From<&str> for NewWorkspace {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for NewWorkspace {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Partial update for `PATCH workspace/update/{id}`; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkspaceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WorkspaceUpdate {
    /// Update that changes nothing; chain setters to add fields
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(name);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = non_empty(description);
        self
    }

    /// True when no field would be sent
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Workspace endpoints, obtained from [`BriqClient::workspace`].
///
/// Every call returns the decoded JSON response as-is.
pub struct WorkspaceApi<'a> {
    client: &'a BriqClient,
}

impl<'a> WorkspaceApi<'a> {
    pub(crate) fn new(client: &'a BriqClient) -> Self {
        Self { client }
    }

    /// Creates a workspace. `POST workspace/create/`
    ///
    /// Accepts a name directly (`"Acme"`) or a [`NewWorkspace`].
    pub async fn create(&self, workspace: impl Into<NewWorkspace>) -> BriqResult<Value> {
        let body = to_body(&workspace.into())?;
        self.client.post("workspace/create/", Some(body)).await
    }

    /// Lists all workspaces. `GET workspace/all/`
    pub async fn list(&self) -> BriqResult<Value> {
        self.client.get("workspace/all/", None).await
    }

    /// Fetches one workspace. `GET workspace/{id}`
    pub async fn get(&self, workspace_id: &str) -> BriqResult<Value> {
        self.client
            .get(&format!("workspace/{}", path_segment(workspace_id)), None)
            .await
    }

    /// Sends only the fields set in `changes`. `PATCH workspace/update/{id}`
    pub async fn update(&self, workspace_id: &str, changes: WorkspaceUpdate) -> BriqResult<Value> {
        let body = to_body(&changes)?;
        self.client
            .patch(&format!("workspace/update/{}", path_segment(workspace_id)), Some(body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::api_key_client;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_update_payload_omits_missing_fields() {
        let only_name = serde_json::to_value(WorkspaceUpdate::new().name("Updated Name")).unwrap();
        assert_eq!(only_name, json!({"name": "Updated Name"}));

        let blank = serde_json::to_value(WorkspaceUpdate::new().name("").description("  ")).unwrap();
        assert_eq!(blank, json!({}));
        assert!(WorkspaceUpdate::new().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_name_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/workspace/create/"))
            .and(header("X-API-Key", "k1"))
            .and(body_json(json!({"name": "Acme"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"workspace_id": "w1", "name": "Acme"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = api_key_client(&server, "k1");
        let created = client.workspace().create("Acme").await.unwrap();

        assert_eq!(created["workspace_id"], "w1");
    }

    #[tokio::test]
    async fn test_create_with_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/workspace/create/"))
            .and(body_json(json!({"name": "Acme", "description": "Marketing"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"workspace_id": "w1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = api_key_client(&server, "k1");
        client
            .workspace()
            .create(NewWorkspace::new("Acme").description("Marketing"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/workspace/all/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "workspace-1", "name": "Workspace 1"},
                {"id": "workspace-2", "name": "Workspace 2"}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/workspace/workspace-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "workspace-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = api_key_client(&server, "k1");
        let all = client.workspace().list().await.unwrap();
        let one = client.workspace().get("workspace-1").await.unwrap();

        assert_eq!(all.as_array().map(Vec::len), Some(2));
        assert_eq!(one["id"], "workspace-1");
    }

    #[tokio::test]
    async fn test_update_sends_only_changed_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/workspace/update/workspace-1"))
            .and(body_json(json!({"description": "Updated Description"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "workspace-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = api_key_client(&server, "k1");
        client
            .workspace()
            .update("workspace-1", WorkspaceUpdate::new().description("Updated Description"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_without_changes_sends_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/workspace/update/workspace-1"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = api_key_client(&server, "k1");
        let result = client
            .workspace()
            .update("workspace-1", WorkspaceUpdate::new())
            .await
            .unwrap();

        assert_eq!(result, json!({}));
    }
}
