// HTTP request handlers
use crate::domain::reading::Metric;
use crate::domain::telemetry::Canvas;
use crate::domain::time_window::TimeWindow;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::HttpError;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct DeviceListQuery {
    pub product_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct OverviewQuery {
    #[serde(default)]
    pub window: TimeWindow,
}

#[derive(Deserialize)]
pub struct ChartQuery {
    #[serde(default)]
    pub metric: Metric,
    #[serde(default)]
    pub window: TimeWindow,
    #[serde(default)]
    pub canvas: Canvas,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List sensor devices, optionally for one product
pub async fn list_devices(
    Query(query): Query<DeviceListQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpError> {
    let devices = state.chart_service.list_devices(query.product_id).await?;
    Ok(respond(&devices, &headers).await)
}

/// Device metadata plus a summary tile per metric
pub async fn device_overview(
    Path(id): Path<i64>,
    Query(query): Query<OverviewQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpError> {
    let overview = state.chart_service.device_overview(id, query.window).await?;
    Ok(respond(&overview, &headers).await)
}

/// Chart-ready series for one metric of a device
pub async fn device_chart(
    Path(id): Path<i64>,
    Query(query): Query<ChartQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpError> {
    let chart = state
        .chart_service
        .build_chart(id, query.metric, query.window, query.canvas)
        .await?;
    Ok(respond(&chart, &headers).await)
}

async fn respond<T: Serialize>(data: &T, headers: &HeaderMap) -> Response {
    match json_response(StatusCode::OK, data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
