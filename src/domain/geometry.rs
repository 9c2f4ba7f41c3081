// Geometry primitives shared by every chart family
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// A position on the drawing surface (viewBox units, y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned rectangle in drawing-surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Corners in top-left, top-right, bottom-left, bottom-right order.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x, self.y + self.height),
            Point::new(self.x + self.width, self.y + self.height),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    ArcTo {
        radius: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
    Close,
}

/// Immutable sequence of drawing instructions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathSpec {
    commands: Vec<PathCommand>,
}

impl PathSpec {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    #[cfg(test)]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Returns a copy with `extra` appended, used to close an outline.
    pub fn extended(&self, extra: impl IntoIterator<Item = PathCommand>) -> Self {
        let mut commands = self.commands.clone();
        commands.extend(extra);
        Self { commands }
    }

    /// Render as SVG path data (`M x y L x y A r r 0 f 1 x y Z`).
    pub fn to_svg_data(&self) -> String {
        let mut out = String::new();
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            // Writing into a String cannot fail.
            let _ = match cmd {
                PathCommand::MoveTo(p) => write!(out, "M {} {}", fmt_num(p.x), fmt_num(p.y)),
                PathCommand::LineTo(p) => write!(out, "L {} {}", fmt_num(p.x), fmt_num(p.y)),
                PathCommand::ArcTo {
                    radius,
                    large_arc,
                    sweep,
                    to,
                } => write!(
                    out,
                    "A {r} {r} 0 {} {} {} {}",
                    u8::from(*large_arc),
                    u8::from(*sweep),
                    fmt_num(to.x),
                    fmt_num(to.y),
                    r = fmt_num(*radius)
                ),
                PathCommand::Close => write!(out, "Z"),
            };
        }
        out
    }
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
pub fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Angle 0 points to 12 o'clock and grows clockwise.
pub fn polar_to_cartesian(cx: f64, cy: f64, r: f64, angle_deg: f64) -> Point {
    let rad = (angle_deg - 90.0).to_radians();
    Point::new(cx + r * rad.cos(), cy + r * rad.sin())
}

/// Filled wedge from the centre to the arc between the two angles.
pub fn pie_slice_path(cx: f64, cy: f64, r: f64, start_angle: f64, end_angle: f64) -> PathSpec {
    let end = polar_to_cartesian(cx, cy, r, end_angle);
    let start = polar_to_cartesian(cx, cy, r, start_angle);
    PathSpec::new(vec![
        PathCommand::MoveTo(Point::new(cx, cy)),
        PathCommand::LineTo(start),
        PathCommand::ArcTo {
            radius: r,
            large_arc: end_angle - start_angle > 180.0,
            sweep: true,
            to: end,
        },
        PathCommand::Close,
    ])
}

/// Polyline through `points` in order; never smoothed.
pub fn points_to_path(points: &[Point]) -> PathSpec {
    let commands = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if i == 0 {
                PathCommand::MoveTo(*p)
            } else {
                PathCommand::LineTo(*p)
            }
        })
        .collect();
    PathSpec::new(commands)
}

pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(v))
}

/// Result of nice-tick selection: tick values from zero up to `nice_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiceTicks {
    pub ticks: Vec<f64>,
    pub nice_max: f64,
    pub step: f64,
}

/// Picks human-friendly axis ticks (1/2/5/10 x 10^k) covering `data_max`.
pub fn generate_nice_ticks(data_max: f64) -> NiceTicks {
    if !data_max.is_finite() || data_max <= 1.0 {
        return NiceTicks {
            ticks: vec![0.0, 1.0],
            nice_max: 1.0,
            step: 1.0,
        };
    }

    const TARGET_TICKS: f64 = 4.0;
    let rough_step = data_max / (TARGET_TICKS - 1.0);
    let magnitude = 10f64.powi(rough_step.log10().floor() as i32);
    let residual = rough_step / magnitude;

    let step = if residual > 5.0 {
        10.0 * magnitude
    } else if residual > 2.0 {
        5.0 * magnitude
    } else if residual > 1.0 {
        2.0 * magnitude
    } else {
        magnitude
    };

    let intervals = (data_max / step).ceil();
    let nice_max = intervals * step;
    // Stepping by index avoids float drift dropping the final tick.
    let ticks = (0..=intervals as usize).map(|i| i as f64 * step).collect();

    NiceTicks {
        ticks,
        nice_max,
        step,
    }
}

/// One labelled axis position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub position: f64,
}

/// Axis ticks projected into drawing space.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSet {
    pub ticks: Vec<Tick>,
    pub nice_max: f64,
}

impl TickSet {
    pub fn project(nice: &NiceTicks, to_position: impl Fn(f64) -> f64) -> Self {
        Self {
            ticks: nice
                .ticks
                .iter()
                .map(|&value| Tick {
                    value,
                    position: to_position(value),
                })
                .collect(),
            nice_max: nice.nice_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_polar_zero_points_up() {
        let p = polar_to_cartesian(50.0, 50.0, 10.0, 0.0);
        assert!(approx(p.x, 50.0));
        assert!(approx(p.y, 40.0));

        let p = polar_to_cartesian(50.0, 50.0, 10.0, 90.0);
        assert!(approx(p.x, 60.0));
        assert!(approx(p.y, 50.0));
    }

    #[test]
    fn test_pie_slice_large_arc_flag() {
        let half = pie_slice_path(0.0, 0.0, 10.0, 0.0, 180.0);
        let more = pie_slice_path(0.0, 0.0, 10.0, 0.0, 181.0);
        let flag = |p: &PathSpec| match p.commands()[2] {
            PathCommand::ArcTo { large_arc, sweep, .. } => {
                assert!(sweep);
                large_arc
            }
            _ => panic!("expected arc"),
        };
        assert!(!flag(&half));
        assert!(flag(&more));
        assert!(half.to_svg_data().contains("A 10 10 0 0 1"));
    }

    #[test]
    fn test_degenerate_slice_is_tolerated() {
        let p = pie_slice_path(5.0, 5.0, 4.0, 30.0, 30.0);
        assert_eq!(p.commands().len(), 4);
        assert_eq!(p.to_svg_data(), "M 5 5 L 7 1.536 A 4 4 0 0 1 7 1.536 Z");
    }

    #[test]
    fn test_points_to_path_shape() {
        let pts: Vec<Point> = (0..5).map(|i| Point::new(i as f64, 1.0)).collect();
        let path = points_to_path(&pts);
        assert!(matches!(path.commands()[0], PathCommand::MoveTo(_)));
        assert_eq!(
            path.commands()[1..]
                .iter()
                .filter(|c| matches!(c, PathCommand::LineTo(_)))
                .count(),
            4
        );
        assert!(points_to_path(&[]).commands().is_empty());
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(250.0, 0.0, 200.0), 200.0);
        assert_eq!(clamp(-3.0, 0.0, 200.0), 0.0);
        assert_eq!(clamp(7.0, 0.0, 200.0), 7.0);
    }

    #[test]
    fn test_nice_ticks_small_max() {
        for max in [-5.0, 0.0, 0.5, 1.0] {
            let nice = generate_nice_ticks(max);
            assert_eq!(nice.ticks, vec![0.0, 1.0]);
            assert_eq!(nice.nice_max, 1.0);
        }
    }

    #[test]
    fn test_nice_ticks_ladder() {
        let nice = generate_nice_ticks(260.0);
        assert_eq!(nice.ticks, vec![0.0, 100.0, 200.0, 300.0]);
        assert_eq!(nice.nice_max, 300.0);

        let nice = generate_nice_ticks(45.0);
        assert_eq!(nice.ticks, vec![0.0, 20.0, 40.0, 60.0]);

        let nice = generate_nice_ticks(7.0);
        assert_eq!(nice.ticks, vec![0.0, 5.0, 10.0]);

        let nice = generate_nice_ticks(3.0);
        assert_eq!(nice.step, 1.0);
        assert_eq!(nice.nice_max, 3.0);
    }

    #[test]
    fn test_nice_ticks_properties() {
        for max in [1.5, 2.0, 9.99, 13.0, 101.0, 999.0, 1234.5, 88_000.0] {
            let nice = generate_nice_ticks(max);
            assert!(nice.nice_max >= max, "{max}");
            let ratio = nice.nice_max / nice.step;
            assert!(approx(ratio, ratio.round()), "{max}");
            assert!(approx(*nice.ticks.last().unwrap(), nice.nice_max));
            for pair in nice.ticks.windows(2) {
                assert!(approx(pair[1] - pair[0], nice.step));
            }
            assert_eq!(generate_nice_ticks(max), nice);
        }
    }

    #[test]
    fn test_tick_projection() {
        let nice = generate_nice_ticks(260.0);
        let set = TickSet::project(&nice, |v| 100.0 - v / 3.0);
        assert_eq!(set.ticks.len(), 4);
        assert_eq!(set.ticks[3].position, 0.0);
        assert_eq!(set.nice_max, 300.0);
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(1.25), "1.25");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(f64::NAN), "0");
    }
}
