// Repository trait for sensor data access
use crate::application::error::ApiError;
use crate::domain::device::SensorDevice;
use crate::domain::reading::Reading;
use crate::domain::time_window::TimeWindow;
use async_trait::async_trait;

#[async_trait]
pub trait SensorRepository: Send + Sync {
    /// Readings recorded by a device within the window. Records that cannot
    /// be decoded are already dropped.
    async fn fetch_readings(
        &self,
        device_id: i64,
        window: TimeWindow,
    ) -> Result<Vec<Reading>, ApiError>;

    /// Display metadata for one device
    async fn fetch_device(&self, device_id: i64) -> Result<SensorDevice, ApiError>;

    /// Devices visible to the caller, optionally restricted to one product
    async fn list_devices(&self, product_id: Option<i64>) -> Result<Vec<SensorDevice>, ApiError>;
}
