use crate::{AppState, handlers, paths};
use axum::{
    Router,
    routing::{get, post},
};

/// Public-Only Router
///
/// Sign-in and account recovery pages. A visitor who already holds a valid session is
/// sent to their role's home instead of seeing these.
pub fn public_only_routes() -> Router<AppState> {
    Router::new()
        .route(paths::LOGIN, get(handlers::login_page))
        .route(paths::REGISTER, get(handlers::register_page))
        .route(paths::FORGOT_PASSWORD, get(handlers::forgot_password_page))
}

/// Open Router
///
/// Reachable by anyone; the gate is never consulted.
pub fn open_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check for load balancers.
        .route("/health", get(|| async { "ok" }))
        .route(paths::HOME, get(handlers::home))
        // OTP pages are reached right after register / forgot-password, before any
        // session exists, and must stay reachable afterwards too.
        .route(paths::OTP_VERIFICATION, get(handlers::verify_otp_page))
        .route(paths::RESET_PASSWORD, get(handlers::reset_password_page))
        // --- Form actions ---
        .route("/auth/login", post(handlers::login))
        .route("/auth/register", post(handlers::register))
        .route("/auth/verify-otp", post(handlers::verify_otp))
        .route("/auth/resend-otp", post(handlers::resend_otp))
        .route("/auth/forgot-password", post(handlers::forgot_password))
        .route("/auth/reset-password", post(handlers::reset_password))
        .route("/auth/logout", post(handlers::logout))
}
