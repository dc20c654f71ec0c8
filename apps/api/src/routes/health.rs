use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and store reachability.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let store_available = state.store.is_available().await;
    Json(json!({
        "status": if store_available { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "service": "volunteer-api",
        "store": if store_available { "available" } else { "unavailable" },
    }))
}
