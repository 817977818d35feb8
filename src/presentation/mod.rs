// Presentation layer - HTTP routes
pub mod app_state;
pub mod error;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{device_chart, device_overview, health_check, list_devices};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/devices", get(list_devices))
        .route("/devices/:id", get(device_overview))
        .route("/devices/:id/chart", get(device_chart))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chart_service::tests::{reading_at, FakeRepository};
    use crate::application::chart_service::ChartService;
    use crate::application::error::ApiError;
    use crate::domain::reading::Metric;
    use serde_json::Value;

    async fn serve(repo: FakeRepository) -> String {
        let state = Arc::new(AppState {
            chart_service: ChartService::new(Arc::new(repo)),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn sample_repo() -> FakeRepository {
        FakeRepository::new(vec![
            reading_at(0).with_value(Metric::Ph, 6.5),
            reading_at(60_000).with_value(Metric::Ph, 6.52),
        ])
    }

    #[tokio::test]
    async fn test_health_check() {
        let base = serve(sample_repo()).await;
        let body = reqwest::get(format!("{}/healthz", base)).await.unwrap().text().await.unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_chart_endpoint() {
        let base = serve(sample_repo()).await;
        let response = reqwest::get(format!("{}/devices/1/chart?metric=ph&window=1h&canvas=narrow", base))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let chart: Value = response.json().await.unwrap();
        assert_eq!(chart["metric"], "ph");
        assert_eq!(chart["window"], "1h");
        assert_eq!(chart["canvas"]["width"], 308.0);
        assert_eq!(chart["points"].as_array().unwrap().len(), 2);
        assert!(chart["path"].as_str().unwrap().starts_with("M "));
    }

    #[tokio::test]
    async fn test_invalid_window_is_rejected() {
        let base = serve(sample_repo()).await;
        let response = reqwest::get(format!("{}/devices/1/chart?window=3d", base)).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_not_authenticated_maps_to_401() {
        let repo = sample_repo();
        *repo.fail_with.lock().unwrap() = Some(ApiError::NotAuthenticated);
        let base = serve(repo).await;

        let response = reqwest::get(format!("{}/devices/1/chart", base)).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "not_authenticated");
    }

    #[tokio::test]
    async fn test_overview_endpoint() {
        let base = serve(sample_repo()).await;
        let overview: Value = reqwest::get(format!("{}/devices/4?window=7d", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(overview["device"]["id"], 4);
        assert_eq!(overview["reading_count"], 2);
        assert_eq!(overview["tiles"][0]["metric"], "ph");
    }

    #[tokio::test]
    async fn test_device_list_endpoint() {
        let base = serve(sample_repo()).await;
        let devices: Value = reqwest::get(format!("{}/devices?product_id=3", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(devices.as_array().unwrap().len(), 1);
    }
}
