// Value axis range and series summary
use crate::domain::telemetry::{SeriesStats, TimeSeriesPoint, ValueRange};

/// Render range for the series, padded so near-constant data keeps a
/// visible height. `None` for an empty series.
pub fn value_range(points: &[TimeSeriesPoint]) -> Option<ValueRange> {
    let first = points.first()?;
    let (min, max) = points
        .iter()
        .fold((first.value, first.value), |(lo, hi), p| (lo.min(p.value), hi.max(p.value)));

    let pad = match max - min {
        span if span < 0.1 => (min.abs() * 0.1).max(0.05),
        span if span < 1.0 => 0.2,
        _ => 0.0,
    };

    Some(ValueRange {
        min: min - pad,
        max: max + pad,
    })
}

pub fn series_stats(points: &[TimeSeriesPoint]) -> Option<SeriesStats> {
    let range = value_range(points)?;
    let last = points.last()?;
    let avg_value = points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64;

    Some(SeriesStats {
        min_value: range.min,
        max_value: range.max,
        avg_value,
        last_value: last.value,
    })
}
