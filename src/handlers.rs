use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::{ApiClient, ApiError},
    auth::PageSession,
    error::PortalError,
    models::{
        ActionMessage, ApplicationFilters, CampaignFilters, DonationFilters, LoginInput,
        OtpPurpose, PageParams, PageView, RegisterInput, WithdrawalFilters,
    },
    paths,
    session::{SessionStore, persist_login},
};

// --- Form Payloads ---

/// LoginForm
///
/// `from` is the location the gate redirected away from, echoed back by the login
/// page so the visitor lands there after signing in.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub from: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
}

/// OtpForm
///
/// The e-mail may be omitted when the OTP was requested from this browser.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OtpForm {
    pub email: Option<String>,
    pub otp_code: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmailForm {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordForm {
    pub email: Option<String>,
    pub otp_code: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginQuery {
    pub from: Option<String>,
}

// --- Helpers ---

fn view(
    page: &str,
    title: &str,
    session: &PageSession,
    data: Option<serde_json::Value>,
) -> Json<PageView> {
    Json(PageView {
        page: page.to_string(),
        title: title.to_string(),
        principal: session.principal.clone(),
        data,
    })
}

fn data_of<T: Serialize>(value: &T) -> Result<Option<serde_json::Value>, PortalError> {
    Ok(Some(serde_json::to_value(value)?))
}

/// Only same-origin absolute paths are accepted as post-login destinations.
fn is_local_path(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.contains('\\')
        && !target.chars().any(|c| c.is_ascii_control())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// The e-mail typed into the form wins over the one remembered in the cookie.
fn otp_email(session: &PageSession, typed: Option<String>) -> Result<String, PortalError> {
    non_empty(typed)
        .or_else(|| session.store.pending_email())
        .ok_or_else(|| PortalError::BadRequest("Email is required".to_string()))
}

// --- Navigation ---

/// home
///
/// The root has no page of its own and always hands over to the login flow.
pub async fn home() -> Redirect {
    Redirect::to(paths::LOGIN)
}

/// not_found
///
/// Fallback for every unknown path. The page links back to login.
pub async fn not_found(session: PageSession) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        view(
            "not-found",
            "Page not found",
            &session,
            Some(json!({ "link": paths::LOGIN })),
        ),
    )
}

// --- Public-Only Pages ---

/// login_page
///
/// [Public-Only Page] Sign-in form. Receives the gate's `from` context and passes it
/// on to the form.
#[utoipa::path(
    get,
    path = "/login",
    params(LoginQuery),
    responses(
        (status = 200, description = "Login page", body = PageView),
        (status = 303, description = "Already signed in, redirected to the role's home")
    )
)]
pub async fn login_page(session: PageSession, Query(query): Query<LoginQuery>) -> Json<PageView> {
    let from = query.from.filter(|from| is_local_path(from));
    view("login", "Sign in", &session, Some(json!({ "from": from })))
}

#[utoipa::path(
    get,
    path = "/register",
    responses(
        (status = 200, description = "Registration page", body = PageView),
        (status = 303, description = "Already signed in, redirected to the role's home")
    )
)]
pub async fn register_page(session: PageSession) -> Json<PageView> {
    view("register", "Create account", &session, None)
}

#[utoipa::path(
    get,
    path = "/forgot-password",
    responses(
        (status = 200, description = "Password recovery page", body = PageView),
        (status = 303, description = "Already signed in, redirected to the role's home")
    )
)]
pub async fn forgot_password_page(session: PageSession) -> Json<PageView> {
    view("forgot-password", "Forgot password", &session, None)
}

// --- Open Pages ---

/// verify_otp_page
///
/// [Open Page] OTP entry after registration. Shows the e-mail the code was sent to.
#[utoipa::path(
    get,
    path = "/verify-otp",
    responses((status = 200, description = "OTP verification page", body = PageView))
)]
pub async fn verify_otp_page(session: PageSession) -> Json<PageView> {
    let email = session.store.pending_email();
    view("verify-otp", "Verify email", &session, Some(json!({ "email": email })))
}

#[utoipa::path(
    get,
    path = "/reset-password",
    responses((status = 200, description = "Password reset page", body = PageView))
)]
pub async fn reset_password_page(session: PageSession) -> Json<PageView> {
    let email = session.store.pending_email();
    view("reset-password", "Reset password", &session, Some(json!({ "email": email })))
}

// --- Auth Actions ---

/// login
///
/// [Action] Exchanges credentials for a token, stores token and principal together
/// and navigates to `from` (when it is a local path) or to the role's home.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Signed in"),
        (status = 401, description = "Invalid credentials", body = ActionMessage),
        (status = 502, description = "Backend unreachable", body = ActionMessage)
    )
)]
pub async fn login(
    State(api): State<ApiClient>,
    session: PageSession,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, PortalError> {
    let input = LoginInput {
        email: form.email,
        password: form.password,
    };
    let response = api.login(&input).await.map_err(|e| match e {
        ApiError::Unauthorized(message) => PortalError::InvalidCredentials(message),
        other => PortalError::Api(other),
    })?;

    let auth = response.data;
    persist_login(session.store.as_ref(), &auth.token, &auth.user)?;
    tracing::info!(role = %auth.user.role, "login succeeded");

    let target = form
        .from
        .filter(|from| is_local_path(from))
        .unwrap_or_else(|| auth.user.role.home_path().to_string());
    Ok(Redirect::to(&target))
}

/// register
///
/// [Action] Creates the account; the backend e-mails a registration OTP. The address
/// is remembered for the verification page.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "OTP sent, continue on /verify-otp"),
        (status = 400, description = "Rejected by the backend", body = ActionMessage)
    )
)]
pub async fn register(
    State(api): State<ApiClient>,
    session: PageSession,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, PortalError> {
    let input = RegisterInput {
        name: form.name,
        email: form.email,
        password: form.password,
        phone_number: non_empty(form.phone_number),
    };
    api.register(&input).await?;
    session.store.set_pending_email(&input.email);
    Ok(Redirect::to(paths::OTP_VERIFICATION))
}

#[utoipa::path(
    post,
    path = "/auth/verify-otp",
    request_body(content = OtpForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Email verified, continue on /login"),
        (status = 400, description = "Missing email or rejected code", body = ActionMessage)
    )
)]
pub async fn verify_otp(
    State(api): State<ApiClient>,
    session: PageSession,
    Form(form): Form<OtpForm>,
) -> Result<Redirect, PortalError> {
    let email = otp_email(&session, form.email)?;
    api.verify_otp(&email, form.otp_code.trim(), OtpPurpose::Register)
        .await?;
    session.store.clear_pending_email();
    Ok(Redirect::to(paths::LOGIN))
}

#[utoipa::path(
    post,
    path = "/auth/resend-otp",
    request_body(content = EmailForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "OTP resent", body = ActionMessage),
        (status = 400, description = "Missing email", body = ActionMessage)
    )
)]
pub async fn resend_otp(
    State(api): State<ApiClient>,
    session: PageSession,
    Form(form): Form<EmailForm>,
) -> Result<Json<ActionMessage>, PortalError> {
    let email = otp_email(&session, form.email)?;
    api.request_otp(&email, OtpPurpose::Register).await?;
    Ok(Json(ActionMessage {
        success: true,
        message: "OTP resent to your email".to_string(),
    }))
}

/// forgot_password
///
/// [Action] Requests a password-recovery OTP and continues on the reset page.
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body(content = EmailForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "OTP sent, continue on /reset-password"),
        (status = 400, description = "Missing email", body = ActionMessage)
    )
)]
pub async fn forgot_password(
    State(api): State<ApiClient>,
    session: PageSession,
    Form(form): Form<EmailForm>,
) -> Result<Redirect, PortalError> {
    let email = non_empty(form.email)
        .ok_or_else(|| PortalError::BadRequest("Email is required".to_string()))?;
    api.request_otp(&email, OtpPurpose::ForgetPassword).await?;
    session.store.set_pending_email(&email);
    Ok(Redirect::to(paths::RESET_PASSWORD))
}

#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body(content = ResetPasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Password changed, continue on /login"),
        (status = 400, description = "Missing email or rejected code", body = ActionMessage)
    )
)]
pub async fn reset_password(
    State(api): State<ApiClient>,
    session: PageSession,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Redirect, PortalError> {
    let email = otp_email(&session, form.email)?;
    api.reset_password(&email, &form.new_password, form.otp_code.trim())
        .await?;
    session.store.clear_pending_email();
    Ok(Redirect::to(paths::LOGIN))
}

/// logout
///
/// [Action] Clears token and principal together.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 303, description = "Signed out, continue on /login"))
)]
pub async fn logout(session: PageSession) -> Redirect {
    session.store.clear();
    Redirect::to(paths::LOGIN)
}

// --- Donor Pages ---

pub async fn donor_index() -> Redirect {
    Redirect::to(paths::DONOR_HOMEPAGE)
}

#[utoipa::path(
    get,
    path = "/donor/homepage",
    responses((status = 200, description = "Donor homepage", body = PageView))
)]
pub async fn donor_homepage(session: PageSession) -> Json<PageView> {
    view("donor-homepage", "Home", &session, None)
}

#[utoipa::path(
    get,
    path = "/donor/aboutus",
    responses((status = 200, description = "About us", body = PageView))
)]
pub async fn donor_about_us(session: PageSession) -> Json<PageView> {
    view("donor-aboutus", "About us", &session, None)
}

/// donor_dashboard
///
/// [Donor Page] Overall donation statistics.
#[utoipa::path(
    get,
    path = "/donor/dashboard",
    responses(
        (status = 200, description = "Donor dashboard", body = PageView),
        (status = 303, description = "Redirected by the access gate")
    )
)]
pub async fn donor_dashboard(
    State(api): State<ApiClient>,
    session: PageSession,
) -> Result<Json<PageView>, PortalError> {
    let stats = session.api(&api).donation_stats().await?;
    Ok(view("donor-dashboard", "Dashboard", &session, data_of(&stats.data)?))
}

/// donor_donations
///
/// [Donor Page] The donor's own donation history, paginated.
#[utoipa::path(
    get,
    path = "/donor/donations",
    params(PageParams),
    responses(
        (status = 200, description = "Donation history", body = PageView),
        (status = 303, description = "Redirected by the access gate")
    )
)]
pub async fn donor_donations(
    State(api): State<ApiClient>,
    session: PageSession,
    Query(page): Query<PageParams>,
) -> Result<Json<PageView>, PortalError> {
    let donations = session.api(&api).my_donations(page).await?;
    Ok(view("donor-donations", "My donations", &session, data_of(&donations)?))
}

#[utoipa::path(
    get,
    path = "/donor/profile",
    responses(
        (status = 200, description = "Donor profile", body = PageView),
        (status = 303, description = "Redirected by the access gate")
    )
)]
pub async fn donor_profile(
    State(api): State<ApiClient>,
    session: PageSession,
) -> Result<Json<PageView>, PortalError> {
    let profile = session.api(&api).profile().await?;
    Ok(view("donor-profile", "Profile", &session, data_of(&profile.data)?))
}

// --- Organizer Pages ---

pub async fn organizer_index() -> Redirect {
    Redirect::to(paths::ORGANIZER_DASHBOARD)
}

#[utoipa::path(
    get,
    path = "/organizer/dashboard",
    responses(
        (status = 200, description = "Organizer dashboard", body = PageView),
        (status = 303, description = "Redirected by the access gate")
    )
)]
pub async fn organizer_dashboard(
    State(api): State<ApiClient>,
    session: PageSession,
) -> Result<Json<PageView>, PortalError> {
    let stats = session.api(&api).donation_stats().await?;
    Ok(view("organizer-dashboard", "Dashboard", &session, data_of(&stats.data)?))
}

/// organizer_campaigns
///
/// [Organizer Page] The organizer's campaigns; the backend scopes the listing to the
/// caller.
#[utoipa::path(
    get,
    path = "/organizer/campaigns",
    params(CampaignFilters),
    responses(
        (status = 200, description = "Own campaigns", body = PageView),
        (status = 303, description = "Redirected by the access gate")
    )
)]
pub async fn organizer_campaigns(
    State(api): State<ApiClient>,
    session: PageSession,
    Query(filters): Query<CampaignFilters>,
) -> Result<Json<PageView>, PortalError> {
    let campaigns = session.api(&api).list_campaigns(&filters).await?;
    Ok(view("organizer-campaigns", "My campaigns", &session, data_of(&campaigns)?))
}

#[utoipa::path(
    get,
    path = "/organizer/campaigns/create",
    responses((status = 200, description = "Campaign creation form", body = PageView))
)]
pub async fn organizer_create_campaign(session: PageSession) -> Json<PageView> {
    view("organizer-create-campaign", "Create campaign", &session, None)
}

#[utoipa::path(
    get,
    path = "/organizer/campaigns/{id}/edit",
    params(("id" = String, Path, description = "Campaign ID")),
    responses(
        (status = 200, description = "Campaign edit form", body = PageView),
        (status = 404, description = "Unknown campaign", body = ActionMessage)
    )
)]
pub async fn organizer_edit_campaign(
    State(api): State<ApiClient>,
    session: PageSession,
    Path(id): Path<String>,
) -> Result<Json<PageView>, PortalError> {
    let campaign = session.api(&api).campaign(&id).await?;
    Ok(view("organizer-edit-campaign", "Edit campaign", &session, data_of(&campaign.data)?))
}

#[utoipa::path(
    get,
    path = "/organizer/withdrawals",
    params(WithdrawalFilters),
    responses(
        (status = 200, description = "Own withdrawal requests", body = PageView),
        (status = 303, description = "Redirected by the access gate")
    )
)]
pub async fn organizer_withdrawals(
    State(api): State<ApiClient>,
    session: PageSession,
    Query(filters): Query<WithdrawalFilters>,
) -> Result<Json<PageView>, PortalError> {
    let withdrawals = session.api(&api).my_withdrawals(&filters).await?;
    Ok(view("organizer-withdrawals", "Withdrawals", &session, data_of(&withdrawals)?))
}

#[utoipa::path(
    get,
    path = "/organizer/profile",
    responses(
        (status = 200, description = "Organizer profile", body = PageView),
        (status = 303, description = "Redirected by the access gate")
    )
)]
pub async fn organizer_profile(
    State(api): State<ApiClient>,
    session: PageSession,
) -> Result<Json<PageView>, PortalError> {
    let profile = session.api(&api).profile().await?;
    Ok(view("organizer-profile", "Profile", &session, data_of(&profile.data)?))
}

// --- Admin Pages ---

pub async fn admin_index() -> Redirect {
    Redirect::to(paths::ADMIN_DASHBOARD)
}

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    responses(
        (status = 200, description = "Admin dashboard", body = PageView),
        (status = 303, description = "Redirected by the access gate")
    )
)]
pub async fn admin_dashboard(
    State(api): State<ApiClient>,
    session: PageSession,
) -> Result<Json<PageView>, PortalError> {
    let stats = session.api(&api).donation_stats().await?;
    Ok(view("admin-dashboard", "Dashboard", &session, data_of(&stats.data)?))
}

#[utoipa::path(
    get,
    path = "/admin/users",
    responses((status = 200, description = "User management", body = PageView))
)]
pub async fn admin_users(session: PageSession) -> Json<PageView> {
    view("admin-users", "Users", &session, None)
}

/// admin_campaigns
///
/// [Admin Page] Every campaign, approved or not.
#[utoipa::path(
    get,
    path = "/admin/campaigns",
    params(CampaignFilters),
    responses(
        (status = 200, description = "All campaigns", body = PageView),
        (status = 303, description = "Redirected by the access gate")
    )
)]
pub async fn admin_campaigns(
    State(api): State<ApiClient>,
    session: PageSession,
    Query(filters): Query<CampaignFilters>,
) -> Result<Json<PageView>, PortalError> {
    let campaigns = session.api(&api).list_campaigns(&filters).await?;
    Ok(view("admin-campaigns", "Campaigns", &session, data_of(&campaigns)?))
}

/// admin_organizers
///
/// [Admin Page] Organizer applications awaiting or past review.
#[utoipa::path(
    get,
    path = "/admin/organizers",
    params(ApplicationFilters),
    responses(
        (status = 200, description = "Organizer applications", body = PageView),
        (status = 303, description = "Redirected by the access gate")
    )
)]
pub async fn admin_organizers(
    State(api): State<ApiClient>,
    session: PageSession,
    Query(filters): Query<ApplicationFilters>,
) -> Result<Json<PageView>, PortalError> {
    let applications = session.api(&api).list_applications(&filters).await?;
    Ok(view("admin-organizers", "Organizers", &session, data_of(&applications)?))
}

#[utoipa::path(
    get,
    path = "/admin/donations",
    params(DonationFilters),
    responses(
        (status = 200, description = "All donations", body = PageView),
        (status = 303, description = "Redirected by the access gate")
    )
)]
pub async fn admin_donations(
    State(api): State<ApiClient>,
    session: PageSession,
    Query(filters): Query<DonationFilters>,
) -> Result<Json<PageView>, PortalError> {
    let donations = session.api(&api).list_donations(&filters).await?;
    Ok(view("admin-donations", "Donations", &session, data_of(&donations)?))
}

#[utoipa::path(
    get,
    path = "/admin/withdrawals",
    params(WithdrawalFilters),
    responses(
        (status = 200, description = "All withdrawal requests", body = PageView),
        (status = 303, description = "Redirected by the access gate")
    )
)]
pub async fn admin_withdrawals(
    State(api): State<ApiClient>,
    session: PageSession,
    Query(filters): Query<WithdrawalFilters>,
) -> Result<Json<PageView>, PortalError> {
    let withdrawals = session.api(&api).list_withdrawals(&filters).await?;
    Ok(view("admin-withdrawals", "Withdrawals", &session, data_of(&withdrawals)?))
}
