use crate::{AppState, handlers, paths};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Moderation and oversight pages, gated with `RouteAccess::Protected([Admin])`.
/// Any other role is redirected to its own home before a handler runs; the backend
/// enforces the same restriction again on every list it returns.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(paths::ADMIN_INDEX, get(handlers::admin_index))
        .route(paths::ADMIN_DASHBOARD, get(handlers::admin_dashboard))
        .route(paths::ADMIN_USERS, get(handlers::admin_users))
        .route(paths::ADMIN_CAMPAIGNS, get(handlers::admin_campaigns))
        // GET /admin/organizers
        // Organizer applications, filterable by status.
        .route(paths::ADMIN_ORGANIZERS, get(handlers::admin_organizers))
        .route(paths::ADMIN_DONATIONS, get(handlers::admin_donations))
        .route(paths::ADMIN_WITHDRAWALS, get(handlers::admin_withdrawals))
}
