use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Access decision core.
pub mod gate;
pub mod paths;
pub mod session;

// Backend access and its data model.
pub mod api;
pub mod models;

// HTTP portal.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;

// Routers grouped by page classification (public, donor, organizer, admin).
pub mod routes;
use routes::{admin, donor, organizer, public};

// --- Public Re-exports ---

pub use api::{ApiClient, ApiError};
pub use config::AppConfig;
pub use gate::{RouteAccess, Verdict, evaluate, guard_protected, guard_public_only};
pub use models::{Principal, Role};
pub use session::{MemorySessionStore, SessionState, SessionStore, StoredSession};

/// ApiDoc
///
/// OpenAPI document for the portal's pages and form actions, served at
/// `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login_page, handlers::register_page, handlers::forgot_password_page,
        handlers::verify_otp_page, handlers::reset_password_page,
        handlers::login, handlers::register, handlers::verify_otp, handlers::resend_otp,
        handlers::forgot_password, handlers::reset_password, handlers::logout,
        handlers::donor_homepage, handlers::donor_about_us, handlers::donor_dashboard,
        handlers::donor_donations, handlers::donor_profile,
        handlers::organizer_dashboard, handlers::organizer_campaigns,
        handlers::organizer_create_campaign, handlers::organizer_edit_campaign,
        handlers::organizer_withdrawals, handlers::organizer_profile,
        handlers::admin_dashboard, handlers::admin_users, handlers::admin_campaigns,
        handlers::admin_organizers, handlers::admin_donations, handlers::admin_withdrawals
    ),
    components(
        schemas(
            models::PageView, models::ActionMessage, models::Principal, models::Role,
            handlers::LoginForm, handlers::RegisterForm, handlers::OtpForm,
            handlers::EmailForm, handlers::ResetPasswordForm,
        )
    ),
    tags(
        (name = "hopeon-portal", description = "Hopeon donation portal pages and actions")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Shared by every request: the unbound backend client and the loaded configuration.
/// Handlers bind the client to their own session through `PageSession::api`.
#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub config: AppConfig,
}

impl FromRef<AppState> for ApiClient {
    fn from_ref(app_state: &AppState) -> ApiClient {
        app_state.api.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// gated
///
/// Wraps every route of `router` in `page_gate` for the given classification.
fn gated(router: Router<AppState>, access: RouteAccess) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(access, auth::page_gate))
}

/// create_router
///
/// Assembles the page routers, each behind the gate for its classification, installs
/// the cookie session around all of them and adds the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::open_routes())
        .merge(gated(public::public_only_routes(), RouteAccess::PublicOnly))
        .merge(gated(donor::donor_routes(), RouteAccess::protected([Role::Donor])))
        .merge(gated(
            organizer::organizer_routes(),
            RouteAccess::protected([Role::Organizer]),
        ))
        .merge(gated(admin::admin_routes(), RouteAccess::protected([Role::Admin])))
        .fallback(handlers::not_found)
        // Outside the gates: the gate and the handlers share one store per request.
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth::session_layer,
        ))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one request, correlated by the `x-request-id` set above.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
