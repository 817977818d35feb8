// Chart service - Use cases for building sensor charts and device overviews
use crate::application::aggregation::{aggregate, extract_points};
use crate::application::axis::axis_labels;
use crate::application::error::ApiError;
use crate::application::path_builder::{build_path, to_svg_path};
use crate::application::scale::series_stats;
use crate::application::sensor_repository::SensorRepository;
use crate::domain::dashboard::DeviceOverview;
use crate::domain::device::SensorDevice;
use crate::domain::reading::{Metric, Reading};
use crate::domain::telemetry::{Canvas, MetricTile, SensorChart};
use crate::domain::time_window::TimeWindow;
use std::sync::Arc;

#[derive(Clone)]
pub struct ChartService {
    repository: Arc<dyn SensorRepository>,
}

impl ChartService {
    pub fn new(repository: Arc<dyn SensorRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_devices(&self, product_id: Option<i64>) -> Result<Vec<SensorDevice>, ApiError> {
        self.repository.list_devices(product_id).await
    }

    pub async fn build_chart(
        &self,
        device_id: i64,
        metric: Metric,
        window: TimeWindow,
        canvas: Canvas,
    ) -> Result<SensorChart, ApiError> {
        let readings = self.repository.fetch_readings(device_id, window).await?;
        tracing::debug!(
            "Building {} chart for device {} ({}): {} readings",
            metric,
            device_id,
            window,
            readings.len()
        );
        Ok(chart_from_readings(device_id, &readings, metric, window, canvas))
    }

    pub async fn device_overview(
        &self,
        device_id: i64,
        window: TimeWindow,
    ) -> Result<DeviceOverview, ApiError> {
        let (device, readings) = tokio::try_join!(
            self.repository.fetch_device(device_id),
            self.repository.fetch_readings(device_id, window),
        )?;

        let tiles = Metric::ALL
            .iter()
            .filter_map(|&metric| metric_tile(&readings, metric))
            .collect();

        Ok(DeviceOverview::new(device, window, readings.len(), tiles))
    }
}

/// Run the extract → aggregate → scale → path pipeline over decoded readings.
pub fn chart_from_readings(
    device_id: i64,
    readings: &[Reading],
    metric: Metric,
    window: TimeWindow,
    canvas: Canvas,
) -> SensorChart {
    let series = aggregate(extract_points(readings, metric), window);
    let stats = series_stats(&series.points);
    let size = canvas.size();

    let (path, labels) = match stats {
        Some(stats) => (
            to_svg_path(&build_path(&series.points, stats.range(), size)),
            axis_labels(&series.points, stats.range(), window),
        ),
        None => (String::new(), None),
    };

    SensorChart {
        device_id,
        metric,
        label: metric.label(),
        unit: metric.unit(),
        window,
        canvas: size,
        points: series.points,
        bucket_width_ms: series.bucket_width_ms,
        interval_widened: series.interval_widened,
        stats,
        path,
        labels,
    }
}

fn metric_tile(readings: &[Reading], metric: Metric) -> Option<MetricTile> {
    let mut points = extract_points(readings, metric);
    points.sort_by_key(|p| p.time_ms);
    let last = points.last()?;

    let values = points.iter().map(|p| p.value);
    let min_value = values.clone().fold(f64::INFINITY, f64::min);
    let max_value = values.clone().fold(f64::NEG_INFINITY, f64::max);
    let avg_value = values.sum::<f64>() / points.len() as f64;

    Some(MetricTile {
        metric,
        title: metric.label(),
        unit: metric.unit(),
        last_value: last.value,
        avg_value,
        min_value,
        max_value,
        samples: points.len(),
    })
}
