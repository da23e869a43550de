use crate::{AppState, handlers, paths};
use axum::{Router, routing::get};

/// Organizer Router Module
///
/// Gated with `RouteAccess::Protected([Organizer])`. Campaign and withdrawal data is
/// loaded with the caller's token, so the backend scopes it to that organizer.
pub fn organizer_routes() -> Router<AppState> {
    Router::new()
        .route(paths::ORGANIZER_INDEX, get(handlers::organizer_index))
        .route(paths::ORGANIZER_DASHBOARD, get(handlers::organizer_dashboard))
        .route(paths::ORGANIZER_CAMPAIGNS, get(handlers::organizer_campaigns))
        .route(
            paths::ORGANIZER_CREATE_CAMPAIGN,
            get(handlers::organizer_create_campaign),
        )
        // GET /organizer/campaigns/{id}/edit
        // 404 from the backend surfaces as a 404 message body.
        .route(
            paths::ORGANIZER_EDIT_CAMPAIGN,
            get(handlers::organizer_edit_campaign),
        )
        .route(paths::ORGANIZER_WITHDRAWALS, get(handlers::organizer_withdrawals))
        .route(paths::ORGANIZER_PROFILE, get(handlers::organizer_profile))
}
