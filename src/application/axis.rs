// Axis labels for rendered charts
use crate::domain::telemetry::{AxisLabels, TimeSeriesPoint, ValueRange};
use crate::domain::time_window::TimeWindow;
use chrono::{TimeZone, Utc};

pub fn axis_labels(
    points: &[TimeSeriesPoint],
    range: ValueRange,
    window: TimeWindow,
) -> Option<AxisLabels> {
    let (first, last) = (points.first()?, points.last()?);
    let digits = if range.span() < 1.0 { 2 } else { 1 };
    let mid = range.min + range.span() / 2.0;

    Some(AxisLabels {
        values: [range.max, mid, range.min]
            .iter()
            .map(|v| format!("{:.*}", digits, v))
            .collect(),
        start: format_time(first.time_ms, window),
        end: format_time(last.time_ms, window),
    })
}

fn format_time(time_ms: i64, window: TimeWindow) -> String {
    let format = match window {
        TimeWindow::LastHour | TimeWindow::LastDay => "%H:%M",
        TimeWindow::LastWeek => "%d.%m %H:%M",
        TimeWindow::All => "%d.%m.%Y",
    };
    Utc.timestamp_millis_opt(time_ms)
        .single()
        .map(|t| t.format(format).to_string())
        .unwrap_or_default()
}
