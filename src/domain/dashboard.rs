// Device overview domain model
use super::device::SensorDevice;
use super::telemetry::MetricTile;
use super::time_window::TimeWindow;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DeviceOverview {
    pub device: SensorDevice,
    pub window: TimeWindow,
    pub reading_count: usize,
    pub tiles: Vec<MetricTile>,
}

impl DeviceOverview {
    pub fn new(
        device: SensorDevice,
        window: TimeWindow,
        reading_count: usize,
        tiles: Vec<MetricTile>,
    ) -> Self {
        Self {
            device,
            window,
            reading_count,
            tiles,
        }
    }
}
