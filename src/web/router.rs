use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Group routes served by the profile tab.
///
/// `create` is matched before any group slug, so it cannot name a group.
/// Step URLs are generated with a trailing slash; the bare form is kept for
/// hand-written links.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::healthcheck))
        .route(
            "/groups/create/step/:step",
            get(handlers::create_screen).post(handlers::save_create),
        )
        .route(
            "/groups/create/step/:step/",
            get(handlers::create_screen).post(handlers::save_create),
        )
        .route(
            "/groups/:group_slug/admin/:ext_slug",
            get(handlers::edit_screen).post(handlers::save_edit),
        )
        .route("/groups/:group_slug/:ext_slug", get(handlers::display_screen))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
