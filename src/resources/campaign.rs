//! Campaign endpoints

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::client::api::{to_body, BriqClient};
use crate::error::BriqResult;
use crate::utils::payload::{non_empty, path_segment, serialize_iso_datetime};

/// Payload for `POST campaign/create/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCampaign {
    pub workspace_id: String,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sent as `YYYY-MM-DDTHH:MM:SS`
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_iso_datetime"
    )]
    pub launch_date: Option<NaiveDateTime>,
}

impl NewCampaign {
    /// Campaign in `workspace_id` with no description or launch date
    pub fn new(workspace_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            name: name.into(),
            description: None,
            launch_date: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = non_empty(description);
        self
    }

    pub fn launch_date(mut self, launch_date: NaiveDateTime) -> Self {
        self.launch_date = Some(launch_date);
        self
    }
}

/// Partial update for `PATCH campaign/update/{id}`; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CampaignUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_iso_datetime"
    )]
    pub launch_date: Option<NaiveDateTime>,
}

impl CampaignUpdate {
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

    pub fn launch_date(mut self, launch_date: NaiveDateTime) -> Self {
        self.launch_date = Some(launch_date);
        self
    }

    /// True when no field would be sent
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.launch_date.is_none()
    }
}

/// Campaign endpoints, obtained from [`BriqClient::campaign`].
///
/// Every call returns the decoded JSON response as-is.
pub struct CampaignApi<'a> {
    client: &'a BriqClient,
}

impl<'a> CampaignApi<'a> {
    pub(crate) fn new(client: &'a BriqClient) -> Self {
        Self { client }
    }

    /// Creates a campaign. `POST campaign/create/`
    pub async fn create(&self, campaign: NewCampaign) -> BriqResult<Value> {
        let body = to_body(&campaign)?;
        self.client.post("campaign/create/", Some(body)).await
    }

    /// Lists all campaigns. `GET campaign/all/`
    pub async fn list(&self) -> BriqResult<Value> {
        self.client.get("campaign/all/", None).await
    }

    /// Fetches one campaign. `GET campaign/{id}/`
    pub async fn get(&self, campaign_id: &str) -> BriqResult<Value> {
        self.client
            .get(&format!("campaign/{}/", path_segment(campaign_id)), None)
            .await
    }

    /// Sends only the fields set in `changes`. `PATCH campaign/update/{id}`
    pub async fn update(&self, campaign_id: &str, changes: CampaignUpdate) -> BriqResult<Value> {
        let body = to_body(&changes)?;
        self.client
            .patch(&format!("campaign/update/{}", path_segment(campaign_id)), Some(body))
            .await
    }
}
