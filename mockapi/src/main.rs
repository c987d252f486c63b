mod model;
mod store;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::env;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    store: Arc<store::Store>,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TelemetryQuery {
    id: Option<String>,
    start: Option<i64>,
    end: Option<i64>,
}

#[tokio::main]
async fn main() {
    let http_addr = env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8081".to_string());
    let api_key = env::var("API_KEY").unwrap_or_else(|_| "dev-key".to_string());
    let devices: usize = env::var("DEVICES")
        .unwrap_or_else(|_| "3".to_string())
        .parse()
        .unwrap_or(3);
    let history_days: i64 = env::var("HISTORY_DAYS")
        .unwrap_or_else(|_| "30".to_string())
        .parse()
        .unwrap_or(30);

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting mock telemetry API");
    info!("Devices: {}, history: {} days", devices, history_days);

    let mut rng = rand::thread_rng();
    let store = Arc::new(store::Store::seed(&mut rng, Utc::now(), devices, history_days));
    info!("Seeded {} readings", store.len());

    let state = AppState { store, api_key };
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", http_addr, e);
            std::process::exit(1);
        });

    info!("HTTP server listening on {}", http_addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("HTTP server error: {}", e);
    }
}

fn app(state: AppState) -> Router {
    Router::new().route("/", get(get_readings)).with_state(state)
}

/// GET `/?id=<device>&start=<secs>&end=<secs>`, gated by `X-Api-Key`.
/// `id` is required; `start`/`end` default to the last 30 days.
async fn get_readings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<TelemetryQuery>,
) -> Response {
    let presented = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    if presented != Some(state.api_key.as_str()) {
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "message": "Forbidden" })),
        )
            .into_response();
    }

    let Some(id) = params.id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Missing required query parameter" })),
        )
            .into_response();
    };

    let now = Utc::now();
    let end = params.end.unwrap_or_else(|| now.timestamp());
    let start = params
        .start
        .unwrap_or_else(|| (now - Duration::days(30)).timestamp());

    Json(state.store.query(&id, start, end)).into_response()
}
