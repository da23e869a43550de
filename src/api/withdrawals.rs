use reqwest::Method;
use serde::Serialize;

use super::{ApiClient, ApiError, segment};
use crate::models::{
    CreateWithdrawal, DataResponse, WithdrawalFilters, WithdrawalRequest, WithdrawalsListResponse,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Review<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_message: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Payment<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_reference: Option<&'a str>,
}

impl ApiClient {
    pub async fn create_withdrawal(
        &self,
        withdrawal: &CreateWithdrawal,
    ) -> Result<DataResponse<WithdrawalRequest>, ApiError> {
        self.send_json(Method::POST, "/api/withdrawals", withdrawal)
            .await
    }

    pub async fn my_withdrawals(
        &self,
        filters: &WithdrawalFilters,
    ) -> Result<WithdrawalsListResponse, ApiError> {
        self.get_with("/api/withdrawals/my-withdrawals", filters)
            .await
    }

    pub async fn withdrawal(&self, id: &str) -> Result<DataResponse<WithdrawalRequest>, ApiError> {
        self.get(&format!("/api/withdrawals/{}", segment(id))).await
    }

    pub async fn list_withdrawals(
        &self,
        filters: &WithdrawalFilters,
    ) -> Result<WithdrawalsListResponse, ApiError> {
        self.get_with("/api/withdrawals", filters).await
    }

    pub async fn approve_withdrawal(
        &self,
        id: &str,
        admin_message: Option<&str>,
    ) -> Result<DataResponse<WithdrawalRequest>, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("/api/withdrawals/{}/approve", segment(id)),
            &Review { admin_message },
        )
        .await
    }

    /// reject_withdrawal
    ///
    /// Unlike approval, a rejection always has to explain itself to the organizer.
    pub async fn reject_withdrawal(
        &self,
        id: &str,
        admin_message: &str,
    ) -> Result<DataResponse<WithdrawalRequest>, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("/api/withdrawals/{}/reject", segment(id)),
            &Review {
                admin_message: Some(admin_message),
            },
        )
        .await
    }

    pub async fn mark_withdrawal_paid(
        &self,
        id: &str,
        payment_reference: Option<&str>,
    ) -> Result<DataResponse<WithdrawalRequest>, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("/api/withdrawals/{}/mark-paid", segment(id)),
            &Payment { payment_reference },
        )
        .await
    }
}
