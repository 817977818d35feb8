// Maps aggregated series onto a fixed drawing surface
use crate::domain::telemetry::{CanvasSize, PathCommand, TimeSeriesPoint, ValueRange};
use std::fmt::Write;

/// Build move/line commands for `points` on `canvas`.
///
/// x follows the timestamp between the first and last point; a series whose
/// points share one instant is spread by index instead. y follows the value
/// over `range`, inverted so larger values render higher. Coordinates that
/// are non-finite or far outside the canvas are dropped.
pub fn build_path(
    points: &[TimeSeriesPoint],
    range: ValueRange,
    canvas: CanvasSize,
) -> Vec<PathCommand> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    let (min_ts, max_ts) = points
        .iter()
        .fold((first.time_ms, last.time_ms), |(lo, hi), p| (lo.min(p.time_ms), hi.max(p.time_ms)));

    let inner_width = canvas.width - 2.0 * canvas.padding;
    let inner_height = canvas.height - 2.0 * canvas.padding;
    let value_span = range.span();

    let x_at = |index: usize, time_ms: i64| -> f64 {
        let fraction = if max_ts == min_ts {
            if points.len() > 1 {
                index as f64 / (points.len() - 1) as f64
            } else {
                0.5
            }
        } else {
            (time_ms - min_ts) as f64 / (max_ts - min_ts) as f64
        };
        canvas.padding + fraction * inner_width
    };
    let y_at = |value: f64| -> f64 {
        let fraction = if value_span > 0.0 {
            (value - range.min) / value_span
        } else {
            0.5
        };
        canvas.padding + (1.0 - fraction) * inner_height
    };

    let mut commands = Vec::with_capacity(points.len());
    for (index, point) in points.iter().enumerate() {
        let (x, y) = (x_at(index, point.time_ms), y_at(point.value));
        if !within_bounds(x, y, canvas) {
            continue;
        }
        commands.push(if commands.is_empty() {
            PathCommand::Move { x, y }
        } else {
            PathCommand::Line { x, y }
        });
    }
    commands
}

fn within_bounds(x: f64, y: f64, canvas: CanvasSize) -> bool {
    x.is_finite()
        && y.is_finite()
        && (-canvas.width..=2.0 * canvas.width).contains(&x)
        && (-canvas.height..=2.0 * canvas.height).contains(&y)
}

/// Render commands as an SVG path `d` attribute.
pub fn to_svg_path(commands: &[PathCommand]) -> String {
    let mut path = String::new();
    for command in commands {
        if !path.is_empty() {
            path.push(' ');
        }
        let (op, x, y) = match *command {
            PathCommand::Move { x, y } => ('M', x, y),
            PathCommand::Line { x, y } => ('L', x, y),
        };
        let _ = write!(path, "{} {:.2} {:.2}", op, x, y);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::Canvas;

    fn coords(commands: &[PathCommand]) -> Vec<(f64, f64)> {
        commands
            .iter()
            .map(|c| match *c {
                PathCommand::Move { x, y } | PathCommand::Line { x, y } => (x, y),
            })
            .collect()
    }

    #[test]
    fn test_corners_map_to_padded_canvas() {
        let points = vec![TimeSeriesPoint::new(0, 0.0), TimeSeriesPoint::new(100, 10.0)];
        let range = ValueRange { min: 0.0, max: 10.0 };
        let commands = build_path(&points, range, Canvas::Wide.size());

        assert!(matches!(commands[0], PathCommand::Move { .. }));
        assert!(matches!(commands[1], PathCommand::Line { .. }));
        assert_eq!(coords(&commands), vec![(8.0, 112.0), (612.0, 8.0)]);
    }

    #[test]
    fn test_single_instant_spreads_by_index() {
        let points = vec![
            TimeSeriesPoint::new(50, 1.0),
            TimeSeriesPoint::new(50, 2.0),
            TimeSeriesPoint::new(50, 3.0),
        ];
        let range = ValueRange { min: 0.0, max: 4.0 };
        let xs: Vec<f64> = coords(&build_path(&points, range, Canvas::Narrow.size()))
            .into_iter()
            .map(|(x, _)| x)
            .collect();
        assert_eq!(xs, vec![8.0, 154.0, 300.0]);
    }

    #[test]
    fn test_single_point_is_centred() {
        let points = vec![TimeSeriesPoint::new(0, 5.0)];
        let range = ValueRange { min: 4.5, max: 5.5 };
        assert_eq!(
            coords(&build_path(&points, range, Canvas::Narrow.size())),
            vec![(154.0, 60.0)]
        );
    }

    #[test]
    fn test_out_of_bounds_points_are_dropped() {
        let points = vec![
            TimeSeriesPoint::new(0, 1.0),
            TimeSeriesPoint::new(10, 1e9),
            TimeSeriesPoint::new(20, 2.0),
        ];
        let range = ValueRange { min: 0.0, max: 3.0 };
        let commands = build_path(&points, range, Canvas::Wide.size());

        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], PathCommand::Move { .. }));
        assert!(matches!(commands[1], PathCommand::Line { .. }));
    }

    #[test]
    fn test_first_kept_point_becomes_move() {
        let points = vec![TimeSeriesPoint::new(0, f64::NAN), TimeSeriesPoint::new(10, 1.0)];
        let range = ValueRange { min: 0.0, max: 2.0 };
        let commands = build_path(&points, range, Canvas::Wide.size());
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], PathCommand::Move { .. }));
    }

    #[test]
    fn test_svg_path_string() {
        let commands = vec![
            PathCommand::Move { x: 8.0, y: 112.0 },
            PathCommand::Line { x: 612.0, y: 8.126 },
        ];
        assert_eq!(to_svg_path(&commands), "M 8.00 112.00 L 612.00 8.13");
        assert_eq!(to_svg_path(&[]), "");
    }
}
