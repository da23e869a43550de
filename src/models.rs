use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};

use crate::paths;

// --- Identity ---

/// Role
///
/// The closed set of roles a platform account can hold. Every role has exactly one
/// landing page (`home_path`), so adding a role forces the mapping to be extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Donor,
    Organizer,
    Admin,
}

impl Role {
    /// home_path
    ///
    /// The default landing page for the role. Used whenever the gate has to pick a
    /// redirect target without a more specific destination.
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Admin => paths::ADMIN_DASHBOARD,
            Role::Organizer => paths::ORGANIZER_DASHBOARD,
            Role::Donor => paths::DONOR_DASHBOARD,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Organizer => "organizer",
            Role::Admin => "admin",
        }
    }

    /// from_claim
    ///
    /// Maps a stored role claim onto the closed set. Unrecognized values fall back to
    /// `Donor`, the least privileged role.
    pub fn from_claim(claim: &str) -> Role {
        match claim {
            "admin" => Role::Admin,
            "organizer" => Role::Organizer,
            "donor" => Role::Donor,
            other => {
                tracing::warn!(role = %other, "unrecognized role claim, treating as donor");
                Role::Donor
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// The role must be present and must be a string; its value is mapped leniently.
fn deserialize_role_claim<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    let claim = String::deserialize(deserializer)?;
    Ok(Role::from_claim(&claim))
}

// Profile fields never decide whether a stored principal is usable. A value of the
// wrong shape, such as null or a date without a time, falls back to the default.
fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Principal
///
/// The identity record the backend returns on login (its `user` object) and that the
/// portal keeps in the session next to the opaque token. Only `role` matters for
/// gating. Every profile field is optional and tolerant of malformed values, so a
/// record parses as long as it is an object with a string `role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Principal {
    #[serde(rename = "_id", default, deserialize_with = "deserialize_lenient")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub email: String,
    #[serde(deserialize_with = "deserialize_role_claim")]
    pub role: Role,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone_number: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub is_organizer_approved: bool,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub is_organizer_revoked: bool,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

// --- Response Envelopes ---

/// DataResponse
///
/// The backend wraps single resources as `{ success, message?, data }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: T,
}

/// MessageResponse
///
/// Envelope for endpoints that only acknowledge an action (deletes, OTP requests).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthData {
    pub user: Principal,
    pub token: String,
}

pub type AuthResponse = DataResponse<AuthData>;

/// OtpData
///
/// `otp_code` is only echoed back by development backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpData {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub otp_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

// --- Enumerations ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DonationMethod {
    Paypal,
    Crypto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum DonationStatus {
    Completed,
    Pending,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CryptoCurrency {
    Eth,
    Usdt,
    Btc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

/// OtpPurpose
///
/// The same OTP endpoints serve account verification and password recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OtpPurpose {
    Register,
    ForgetPassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationType {
    Nonprofit,
    Charity,
    Individual,
    Business,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutMethod {
    Bank,
    Paypal,
    Crypto,
}

// --- Auth Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// ProfileUpdate
///
/// Partial update for `PUT /api/auth/profile`; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

// --- Campaigns ---

/// Campaign
///
/// A fundraising campaign. Campaigns only become publicly listed once an admin
/// approves them; `raised` is maintained by the backend as donations complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub target: f64,
    #[serde(default)]
    pub raised: f64,
    pub owner: String,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub closed_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignsListResponse {
    pub success: bool,
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCampaign {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    pub target: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCampaign {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

/// CampaignFilters
///
/// Query parameters for `GET /api/campaigns`. The backend scopes the listing by the
/// caller's role (public sees approved only, organizers their own, admins all).
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct CampaignFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_approved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_closed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// PageParams
///
/// Plain pagination for listings that take no other filter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

// --- Donations ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    #[serde(rename = "_id")]
    pub id: String,
    pub campaign: String,
    pub donor: String,
    pub donor_email: String,
    pub amount: f64,
    pub method: DonationMethod,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub payer_email: Option<String>,
    #[serde(default)]
    pub payer_name: Option<String>,
    #[serde(default)]
    pub payer_country: Option<String>,
    // Raw capture payload from the payment provider, stored verbatim.
    #[serde(default)]
    pub capture_details: Option<serde_json::Value>,
    #[serde(default)]
    pub crypto_currency: Option<CryptoCurrency>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationsListResponse {
    pub success: bool,
    pub donations: Vec<Donation>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationStats {
    pub total_amount: f64,
    pub total_donations: u64,
    pub avg_donation: f64,
    pub max_donation: f64,
    pub min_donation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonation {
    pub campaign: String,
    pub amount: f64,
    pub method: DonationMethod,
    pub donor_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crypto_currency: Option<CryptoCurrency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DonationFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DonationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<DonationMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

// --- Organizer Applications ---

/// SubmitApplication
///
/// Text fields of the organizer application. Supporting documents travel as
/// separate multipart parts (see `api::organizers::Document`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplication {
    pub organization_name: String,
    pub description: String,
    pub contact_email: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub organization_type: Option<OrganizationType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerApplication {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub organization_name: String,
    pub description: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub organization_type: Option<OrganizationType>,
    #[serde(default)]
    pub documents: Option<serde_json::Value>,
    #[serde(default)]
    pub documents_verified: bool,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationsListResponse {
    pub success: bool,
    pub applications: Vec<OrganizerApplication>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// OrganizersListResponse
///
/// Organizer accounts are plain user records with the organizer flags set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizersListResponse {
    pub success: bool,
    #[serde(default)]
    pub organizers: Vec<Principal>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApplicationFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

// --- Withdrawals ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swift_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

/// CreateWithdrawal
///
/// Payout request for funds raised by one campaign. Only the details block matching
/// `payout_method` is expected to be filled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWithdrawal {
    pub campaign: String,
    pub amount_requested: f64,
    pub payout_method: PayoutMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<BankDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paypal_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crypto_details: Option<CryptoDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub organizer: String,
    pub campaign: String,
    pub amount_requested: f64,
    pub payout_method: PayoutMethod,
    #[serde(default)]
    pub bank_details: Option<BankDetails>,
    #[serde(default)]
    pub paypal_email: Option<String>,
    #[serde(default)]
    pub crypto_details: Option<CryptoDetails>,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: WithdrawalStatus,
    #[serde(default)]
    pub admin_message: Option<String>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalsListResponse {
    pub success: bool,
    pub withdrawals: Vec<WithdrawalRequest>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WithdrawalFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WithdrawalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

// --- Portal Output Schemas ---

/// PageView
///
/// What the portal hands to the rendering layer once the gate allows a navigation:
/// which page to draw, for whom, and any data the page was able to load.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageView {
    pub page: String,
    pub title: String,
    pub principal: Option<Principal>,
    #[ts(type = "unknown")]
    #[schema(value_type = Object)]
    pub data: Option<serde_json::Value>,
}

/// ActionMessage
///
/// JSON body for form actions that do not navigate, and for every failed action.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ActionMessage {
    pub success: bool,
    pub message: String,
}
