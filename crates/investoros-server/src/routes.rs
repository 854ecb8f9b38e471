use axum::extract::rejection::JsonRejection;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use investoros_core::underwriting::{self, DealInput, UnderwritingResult};

use crate::config::{CorsOrigins, ServerConfig};
use crate::error::ApiError;

pub const UNDERWRITE_PATH: &str = "/ai/deals/underwrite";
pub const HEALTH_PATH: &str = "/healthz";

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Build the application router with CORS and request tracing.
pub fn router(config: &ServerConfig) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(UNDERWRITE_PATH, post(underwrite_deal))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::any(),
        CorsOrigins::List(list) => AllowOrigin::list(list.clone()),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn underwrite_deal(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UnderwritingResult>, ApiError> {
    let Json(body) = payload?;
    let deal = DealInput::from_json_value(&body)?;
    let result = underwriting::underwrite(&deal)?;

    debug!(
        purchase_price = %deal.purchase_price,
        loan_amount = %result.loan_amount,
        cash_on_cash_roi = %result.cash_on_cash_roi,
        "deal underwritten"
    );

    Ok(Json(result))
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "not found" }))).into_response()
}
