use reqwest::Method;
use serde::Serialize;

use super::{ApiClient, ApiError, segment};
use crate::models::{
    Campaign, CampaignFilters, CampaignsListResponse, CreateCampaign, DataResponse,
    MessageResponse, UpdateCampaign,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CloseCampaign<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    closed_reason: Option<&'a str>,
}

impl ApiClient {
    /// list_campaigns
    ///
    /// The backend scopes the result by the caller: anonymous and donor callers get
    /// approved campaigns, organizers their own, admins everything.
    pub async fn list_campaigns(
        &self,
        filters: &CampaignFilters,
    ) -> Result<CampaignsListResponse, ApiError> {
        self.get_with("/api/campaigns", filters).await
    }

    pub async fn campaign(&self, id: &str) -> Result<DataResponse<Campaign>, ApiError> {
        self.get(&format!("/api/campaigns/{}", segment(id))).await
    }

    pub async fn create_campaign(
        &self,
        campaign: &CreateCampaign,
    ) -> Result<DataResponse<Campaign>, ApiError> {
        self.send_json(Method::POST, "/api/campaigns", campaign)
            .await
    }

    pub async fn update_campaign(
        &self,
        id: &str,
        update: &UpdateCampaign,
    ) -> Result<DataResponse<Campaign>, ApiError> {
        self.send_json(Method::PUT, &format!("/api/campaigns/{}", segment(id)), update)
            .await
    }

    pub async fn close_campaign(
        &self,
        id: &str,
        closed_reason: Option<&str>,
    ) -> Result<DataResponse<Campaign>, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("/api/campaigns/{}/close", segment(id)),
            &CloseCampaign { closed_reason },
        )
        .await
    }

    /// delete_campaign
    ///
    /// Refused by the backend once the campaign has received donations.
    pub async fn delete_campaign(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.send_empty(Method::DELETE, &format!("/api/campaigns/{}", segment(id)))
            .await
    }

    pub async fn approve_campaign(&self, id: &str) -> Result<DataResponse<Campaign>, ApiError> {
        self.send_empty(
            Method::PATCH,
            &format!("/api/campaigns/{}/approve", segment(id)),
        )
        .await
    }
}
