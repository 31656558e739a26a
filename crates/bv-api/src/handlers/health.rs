use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::SharedState;

const READY_CHECK_TIMEOUT: Duration = Duration::from_secs(1);

/// Process liveness only. Never touches the database.
pub async fn livez() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "alive" })))
}

/// Readiness: not draining, and the pool can produce a working connection
/// within the check timeout.
pub async fn readyz(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    if !state.readiness.load(Ordering::SeqCst) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "draining" })),
        );
    }

    let ping = async {
        let client = state.pool.get().await.ok()?;
        client.simple_query("SELECT 1").await.ok()
    };

    match tokio::time::timeout(READY_CHECK_TIMEOUT, ping).await {
        Ok(Some(_)) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        _ => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "database unavailable" })),
        ),
    }
}
