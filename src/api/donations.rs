use reqwest::Method;
use serde::Serialize;

use super::{ApiClient, ApiError, segment};
use crate::models::{
    CreateDonation, DataResponse, Donation, DonationFilters, DonationStats, DonationStatus,
    DonationsListResponse, PageParams, PaymentDetails,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusUpdate<'a> {
    status: DonationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_details: Option<&'a PaymentDetails>,
}

impl ApiClient {
    pub async fn create_donation(
        &self,
        donation: &CreateDonation,
    ) -> Result<DataResponse<Donation>, ApiError> {
        self.send_json(Method::POST, "/api/donations", donation)
            .await
    }

    /// my_donations
    ///
    /// Donation history of the session's donor.
    pub async fn my_donations(&self, page: PageParams) -> Result<DonationsListResponse, ApiError> {
        self.get_with("/api/donations/my-donations", &page).await
    }

    pub async fn donation_stats(&self) -> Result<DataResponse<DonationStats>, ApiError> {
        self.get("/api/donations/stats").await
    }

    pub async fn campaign_donations(
        &self,
        campaign_id: &str,
        page: PageParams,
    ) -> Result<DonationsListResponse, ApiError> {
        self.get_with(
            &format!("/api/donations/campaign/{}", segment(campaign_id)),
            &page,
        )
        .await
    }

    pub async fn campaign_stats(
        &self,
        campaign_id: &str,
    ) -> Result<DataResponse<DonationStats>, ApiError> {
        self.get(&format!("/api/donations/stats/{}", segment(campaign_id)))
            .await
    }

    pub async fn list_donations(
        &self,
        filters: &DonationFilters,
    ) -> Result<DonationsListResponse, ApiError> {
        self.get_with("/api/donations", filters).await
    }

    pub async fn update_donation_status(
        &self,
        id: &str,
        status: DonationStatus,
        payment_details: Option<&PaymentDetails>,
    ) -> Result<DataResponse<Donation>, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("/api/donations/{}/status", segment(id)),
            &StatusUpdate {
                status,
                payment_details,
            },
        )
        .await
    }
}
