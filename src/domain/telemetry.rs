// Chart-ready telemetry domain models
use super::reading::Metric;
use super::time_window::TimeWindow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

/// Output of the time-bucket aggregator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedSeries {
    pub points: Vec<TimeSeriesPoint>,
    /// `None` when points were plotted without bucketing.
    pub bucket_width_ms: Option<i64>,
    /// Set when the bucket width had to grow to respect the bucket cap.
    pub interval_widened: bool,
}

impl AggregatedSeries {
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            bucket_width_ms: None,
            interval_widened: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Summary figures shown next to a chart. `min_value`/`max_value` are the
/// padded render range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub min_value: f64,
    pub max_value: f64,
    pub avg_value: f64,
    pub last_value: f64,
}

impl SeriesStats {
    pub fn range(&self) -> ValueRange {
        ValueRange {
            min: self.min_value,
            max: self.max_value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Canvas {
    #[default]
    Wide,
    Narrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Canvas {
    pub fn size(self) -> CanvasSize {
        match self {
            Canvas::Wide => CanvasSize {
                width: 620.0,
                height: 120.0,
                padding: 8.0,
            },
            Canvas::Narrow => CanvasSize {
                width: 308.0,
                height: 120.0,
                padding: 8.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PathCommand {
    Move { x: f64, y: f64 },
    Line { x: f64, y: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabels {
    /// Top to bottom: max, mid, min.
    pub values: Vec<String>,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorChart {
    pub device_id: i64,
    pub metric: Metric,
    pub label: &'static str,
    pub unit: &'static str,
    pub window: TimeWindow,
    pub canvas: CanvasSize,
    pub points: Vec<TimeSeriesPoint>,
    pub bucket_width_ms: Option<i64>,
    pub interval_widened: bool,
    pub stats: Option<SeriesStats>,
    pub path: String,
    pub labels: Option<AxisLabels>,
}

/// Latest-value tile for one metric of a device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTile {
    pub metric: Metric,
    pub title: &'static str,
    pub unit: &'static str,
    pub last_value: f64,
    pub avg_value: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub samples: usize,
}
