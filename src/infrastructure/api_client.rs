// Marketplace REST API repository implementation
use crate::application::error::ApiError;
use crate::application::sensor_repository::SensorRepository;
use crate::application::token_store::TokenStore;
use crate::domain::device::SensorDevice;
use crate::domain::reading::{decode_readings, Reading};
use crate::domain::time_window::TimeWindow;
use crate::infrastructure::config::ApiSettings;
use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const REFRESH_PATH: &str = "/api/auth/refresh";

#[derive(Clone)]
pub struct ApiSensorRepository {
    base_url: String,
    client: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    access_token: Option<String>,
}

impl ApiSensorRepository {
    pub fn new(settings: &ApiSettings, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
            tokens,
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, url: &str, token: Option<&str>) -> Result<reqwest::Response, ApiError> {
        let mut request = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.map_err(|e| {
            tracing::warn!("Request to {} failed: {}", url, e);
            ApiError::Transport(e.to_string())
        })
    }

    /// GET `path` and return the body of a 2xx response.
    ///
    /// A 401 triggers one token refresh; the request is retried once with
    /// the new token.
    async fn get_text(&self, path: &str) -> Result<String, ApiError> {
        let url = self.build_url(path);
        let mut response = self.send(&url, self.tokens.get().as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(token) = self.refresh_token().await {
                response = self.send(&url, Some(&token)).await?;
            }
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!("GET {} returned {}", path, status);
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.get_text(path).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Exchange the refresh cookie for a new access token. Network errors
    /// are swallowed so the caller sees the original 401.
    async fn refresh_token(&self) -> Option<String> {
        let response = match self.client.post(self.build_url(REFRESH_PATH)).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Token refresh request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::info!("Token refresh rejected with {}, clearing token", response.status());
            self.tokens.set(None);
            return None;
        }

        let token = response
            .json::<RefreshResponse>()
            .await
            .ok()
            .and_then(|r| r.access_token)
            .filter(|t| !t.is_empty())?;
        self.tokens.set(Some(token.clone()));
        Some(token)
    }
}

fn readings_path(device_id: i64, window: TimeWindow) -> String {
    format!(
        "/api/sensors/devices/{}/readings?{}",
        device_id,
        window.query_string()
    )
}

fn devices_path(product_id: Option<i64>) -> String {
    match product_id {
        Some(id) => format!("/api/sensors/devices?product_id={}", id),
        None => "/api/sensors/devices".to_string(),
    }
}

#[async_trait]
impl SensorRepository for ApiSensorRepository {
    async fn fetch_readings(
        &self,
        device_id: i64,
        window: TimeWindow,
    ) -> Result<Vec<Reading>, ApiError> {
        let body = self.get_text(&readings_path(device_id, window)).await?;
        // Anything that is not a JSON array degrades to an empty series.
        let payload = serde_json::from_str::<Value>(&body).unwrap_or(Value::Null);
        let readings = decode_readings(&payload);

        tracing::debug!(
            "Fetched {} readings for device {} ({})",
            readings.len(),
            device_id,
            window
        );
        Ok(readings)
    }

    async fn fetch_device(&self, device_id: i64) -> Result<SensorDevice, ApiError> {
        self.get_json(&format!("/api/sensors/devices/{}", device_id))
            .await
    }

    async fn list_devices(&self, product_id: Option<i64>) -> Result<Vec<SensorDevice>, ApiError> {
        self.get_json(&devices_path(product_id)).await
    }
}
