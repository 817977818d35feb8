// Metric extraction and time-bucket aggregation
use crate::domain::reading::{Metric, Reading};
use crate::domain::telemetry::{AggregatedSeries, TimeSeriesPoint};
use crate::domain::time_window::TimeWindow;

/// Upper bound on buckets laid out for one series.
pub const MAX_BUCKETS: i64 = 20_000;

/// Half-open `[start_ms, end_ms)` interval collecting raw values.
#[derive(Debug, Clone)]
struct Bucket {
    start_ms: i64,
    end_ms: i64,
    values: Vec<f64>,
}

impl Bucket {
    fn timestamp(&self) -> i64 {
        self.start_ms + (self.end_ms - self.start_ms) / 2
    }

    fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

/// Collect `(timestamp, value)` pairs for one metric. Readings without a
/// value for the metric contribute nothing.
pub fn extract_points(readings: &[Reading], metric: Metric) -> Vec<TimeSeriesPoint> {
    readings
        .iter()
        .filter_map(|r| r.value(metric).map(|v| TimeSeriesPoint::new(r.timestamp_ms(), v)))
        .collect()
}

/// Reduce points to one mean per time bucket.
///
/// `1h` windows are returned point-for-point, sorted by time. Other windows
/// lay out contiguous buckets from the earliest timestamp; empty buckets are
/// omitted and each remaining one is plotted at its midpoint.
pub fn aggregate(mut points: Vec<TimeSeriesPoint>, window: TimeWindow) -> AggregatedSeries {
    points.sort_by_key(|p| p.time_ms);

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return AggregatedSeries::empty();
    };
    let (min_ts, max_ts) = (first.time_ms, last.time_ms);
    let span = max_ts - min_ts;

    let Some(width) = window.bucket_width_ms(span) else {
        return AggregatedSeries {
            points,
            bucket_width_ms: None,
            interval_widened: false,
        };
    };

    let (width, interval_widened) = fit_bucket_width(span, width);
    if interval_widened {
        tracing::info!(
            "Widened {} bucket width to {}ms to stay within {} buckets",
            window,
            width,
            MAX_BUCKETS
        );
    }

    let mut buckets: Vec<Bucket> = (0..=span / width)
        .map(|i| {
            let start_ms = min_ts + i * width;
            Bucket {
                start_ms,
                end_ms: start_ms + width,
                values: Vec::new(),
            }
        })
        .collect();

    for point in &points {
        let idx = ((point.time_ms - min_ts) / width) as usize;
        buckets[idx].values.push(point.value);
    }

    let points = buckets
        .iter()
        .filter(|b| !b.values.is_empty())
        .map(|b| TimeSeriesPoint::new(b.timestamp(), b.mean()))
        .collect();

    AggregatedSeries {
        points,
        bucket_width_ms: Some(width),
        interval_widened,
    }
}

/// Grow `width` to the smallest whole second that keeps the bucket count
/// covering `span` within `MAX_BUCKETS`.
fn fit_bucket_width(span: i64, width: i64) -> (i64, bool) {
    if span / width < MAX_BUCKETS {
        return (width, false);
    }
    let min_width = (span + MAX_BUCKETS - 2) / (MAX_BUCKETS - 1);
    let widened = (min_width + 999) / 1000 * 1000;
    (widened.max(width), true)
}
