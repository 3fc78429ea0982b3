//! HTTP control plane for the pool governor.
//!
//! Exposes the governor's operations to an operator:
//!
//! - `GET  /status`   — pool phase, generation, live worker count
//! - `POST /start`    — start a new generation (`{"workers": n}`)
//! - `POST /stop`     — fire the stop signal and begin draining
//! - `POST /scale-up` — add workers (`{"count": k}`)
//! - `POST /scale-to` — add workers up to a target (`{"target": n}`)
//!
//! Commands arrive from arbitrary concurrent callers with no ordering
//! guarantee; the governor serializes them internally. An operation that is
//! invalid in the current phase maps to `409 Conflict`, a bad worker count
//! to `400 Bad Request` — pool state is unchanged either way.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use floodgate::downstream::HttpDownstream;
use floodgate::pool::{PoolError, PoolGovernor, PoolStatus};
use serde::{Deserialize, Serialize};

type Governor = PoolGovernor<u64, HttpDownstream>;

#[derive(Debug, Deserialize)]
struct StartRequest {
    workers: usize,
}

#[derive(Debug, Deserialize)]
struct ScaleUpRequest {
    count: usize,
}

#[derive(Debug, Deserialize)]
struct ScaleToRequest {
    target: usize,
}

#[derive(Debug, Serialize)]
struct StartResponse {
    generation: u64,
}

#[derive(Debug, Serialize)]
struct ScaleToResponse {
    added: usize,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Builds the control-plane router over a governor.
pub fn router(governor: Governor) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/start", post(start))
        .route("/stop", post(stop))
        .route("/scale-up", post(scale_up))
        .route("/scale-to", post(scale_to))
        .with_state(governor)
}

fn reject(err: PoolError) -> (StatusCode, Json<ErrorResponse>) {
    let code = match err {
        PoolError::InvalidTransition { .. } => StatusCode::CONFLICT,
        PoolError::InvalidWorkerCount(_) => StatusCode::BAD_REQUEST,
    };
    (
        code,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

async fn status(State(governor): State<Governor>) -> Json<PoolStatus> {
    Json(governor.status())
}

async fn start(
    State(governor): State<Governor>,
    Json(req): Json<StartRequest>,
) -> Result<Json<StartResponse>, (StatusCode, Json<ErrorResponse>)> {
    governor
        .start(req.workers)
        .map(|generation| Json(StartResponse { generation }))
        .map_err(reject)
}

async fn stop(
    State(governor): State<Governor>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    governor.stop().map(|_| StatusCode::NO_CONTENT).map_err(reject)
}

async fn scale_up(
    State(governor): State<Governor>,
    Json(req): Json<ScaleUpRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    governor
        .scale_up(req.count)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(reject)
}

async fn scale_to(
    State(governor): State<Governor>,
    Json(req): Json<ScaleToRequest>,
) -> Result<Json<ScaleToResponse>, (StatusCode, Json<ErrorResponse>)> {
    governor
        .scale_to(req.target)
        .map(|added| Json(ScaleToResponse { added }))
        .map_err(reject)
}
