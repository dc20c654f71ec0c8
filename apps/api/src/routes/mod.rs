pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::describe::handlers as describe;
use crate::live::handlers as live;
use crate::opportunities::handlers as opportunities;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Opportunities
        .route(
            "/api/v1/opportunities",
            get(opportunities::handle_list_opportunities)
                .post(opportunities::handle_create_opportunity),
        )
        .route(
            "/api/v1/opportunities/locations",
            get(opportunities::handle_list_locations),
        )
        .route(
            "/api/v1/opportunities/:id",
            get(opportunities::handle_get_opportunity),
        )
        .route(
            "/api/v1/opportunities/:id/applications",
            get(applications::handle_list_for_opportunity).post(applications::handle_apply),
        )
        // Applications
        .route(
            "/api/v1/applications/lookup",
            post(applications::handle_lookup),
        )
        .route(
            "/api/v1/admin/applications",
            get(applications::handle_admin_list),
        )
        .route(
            "/api/v1/admin/applications/:id/status",
            patch(applications::handle_set_status),
        )
        // Description generator
        .route(
            "/api/v1/descriptions/generate",
            post(describe::handle_generate),
        )
        // Live queries (SSE)
        .route(
            "/api/v1/live/opportunities",
            get(live::handle_live_opportunities),
        )
        .route(
            "/api/v1/live/applications",
            get(live::handle_live_applications),
        )
        .route(
            "/api/v1/live/admin/applications",
            get(live::handle_live_admin_applications),
        )
        .with_state(state)
}
