use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Local;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error};

use crate::api::client_ip::extract_client_ip;
use crate::models::{NewVisit, RecordVisitRequest};
use crate::stats::{Period, StatsEngine, StatsResult};
use crate::storage::EventStore;

pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub engine: StatsEngine,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
}

fn internal_error(message: String) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
}

/// Record a single page visit
pub async fn record_visit(
    State(state): State<Arc<AppState>>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<RecordVisitRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    // Missing or wrong-typed required fields are rejected, not coerced
    let Json(payload) = payload
        .map_err(|rejection| bad_request(format!("malformed visit event: {}", rejection.body_text())))?;

    if payload.hour > 23 {
        return Err(bad_request(format!(
            "hour must be between 0 and 23, got {}",
            payload.hour
        )));
    }

    let ip_address = extract_client_ip(&headers, remote.ip());

    let visit = NewVisit {
        timestamp: payload.timestamp,
        date: payload.date,
        hour: payload.hour,
        user_agent: payload.user_agent.unwrap_or_default(),
        referrer: payload.referrer.unwrap_or_default(),
        url: payload.url.unwrap_or_default(),
        ip_address: ip_address.to_string(),
    };

    match state.store.append(&visit).await {
        Ok(id) => {
            debug!(id, url = %visit.url, "recorded visit");
            Ok(Json(SuccessResponse {
                message: "visit recorded".to_string(),
            }))
        }
        Err(e) => {
            error!("Failed to record visit: {}", e);
            Err(internal_error(format!("failed to record visit: {}", e)))
        }
    }
}

/// Aggregate statistics for a period (`day`, `week`, `month` or `all`)
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(period): Path<String>,
) -> Result<Json<StatsResult>, ApiError> {
    let period = Period::parse(&period).map_err(|e| bad_request(e.to_string()))?;

    match state.engine.compute(period, Local::now()).await {
        Ok(stats) => Ok(Json(stats)),
        Err(e) => {
            error!("Failed to compute stats: {}", e);
            Err(internal_error(format!("failed to compute stats: {}", e)))
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}
