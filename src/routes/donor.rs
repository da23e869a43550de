use crate::{AppState, handlers, paths};
use axum::{Router, routing::get};

/// Donor Router Module
///
/// Every route here sits behind `page_gate` with `RouteAccess::Protected([Donor])`.
/// Admins pass as well; organizers are sent to their own dashboard.
pub fn donor_routes() -> Router<AppState> {
    Router::new()
        .route(paths::DONOR_INDEX, get(handlers::donor_index))
        .route(paths::DONOR_HOMEPAGE, get(handlers::donor_homepage))
        .route(paths::DONOR_ABOUT_US, get(handlers::donor_about_us))
        .route(paths::DONOR_DASHBOARD, get(handlers::donor_dashboard))
        .route(paths::DONOR_DONATIONS, get(handlers::donor_donations))
        .route(paths::DONOR_PROFILE, get(handlers::donor_profile))
}
