use reqwest::Method;
use serde::Serialize;

use super::{ApiClient, ApiError};
use crate::models::{
    AuthResponse, DataResponse, LoginInput, MessageResponse, OtpData, OtpPurpose, Principal,
    ProfileUpdate, RegisterInput,
};

#[derive(Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
    purpose: OtpPurpose,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OtpVerification<'a> {
    email: &'a str,
    otp_code: &'a str,
    purpose: OtpPurpose,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordReset<'a> {
    email: &'a str,
    new_password: &'a str,
    otp_code: &'a str,
}

impl ApiClient {
    /// register
    ///
    /// Creates the account and makes the backend e-mail a registration OTP. The
    /// account is usable only after `verify_otp`.
    pub async fn register(&self, input: &RegisterInput) -> Result<MessageResponse, ApiError> {
        self.send_json(Method::POST, "/api/auth/register", input)
            .await
    }

    pub async fn login(&self, input: &LoginInput) -> Result<AuthResponse, ApiError> {
        self.send_json(Method::POST, "/api/auth/login", input).await
    }

    pub async fn request_otp(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<DataResponse<OtpData>, ApiError> {
        self.send_json(
            Method::POST,
            "/api/auth/request-otp",
            &OtpRequest { email, purpose },
        )
        .await
    }

    pub async fn verify_otp(
        &self,
        email: &str,
        otp_code: &str,
        purpose: OtpPurpose,
    ) -> Result<MessageResponse, ApiError> {
        self.send_json(
            Method::POST,
            "/api/auth/verify-otp",
            &OtpVerification {
                email,
                otp_code,
                purpose,
            },
        )
        .await
    }

    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
        otp_code: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.send_json(
            Method::POST,
            "/api/auth/reset-password",
            &PasswordReset {
                email,
                new_password,
                otp_code,
            },
        )
        .await
    }

    pub async fn profile(&self) -> Result<DataResponse<Principal>, ApiError> {
        self.get("/api/auth/profile").await
    }

    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<DataResponse<Principal>, ApiError> {
        self.send_json(Method::PUT, "/api/auth/profile", update)
            .await
    }
}
