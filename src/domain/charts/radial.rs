// Radar, polar-area and pie renderers. Angles start at 12 o'clock.
use super::{Drawing, Paint, Shape, Style, TextAnchor, positive_or};
use crate::domain::geometry::{Point, clamp, pie_slice_path, polar_to_cartesian};
use crate::domain::series::{Series, max_with_floor, sanitize};
use crate::domain::theme::ThemeToken;
use serde::{Deserialize, Serialize};

const POLAR_INNER_RADIUS: f64 = 20.0;
const POLAR_VALUE_CEILING: f64 = 100.0;

/// Ring proportions. `Chart` is the standalone radar; `Panel` is the
/// roomier variant drawn inside the metric-averages section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadarPreset {
    #[default]
    Chart,
    Panel,
}

struct RadarStyle {
    label_margin: f64,
    label_offset: f64,
    fill_opacity: f64,
    stroke_width: f64,
}

impl RadarPreset {
    fn style(self) -> RadarStyle {
        match self {
            RadarPreset::Chart => RadarStyle {
                label_margin: 18.0,
                label_offset: 14.0,
                fill_opacity: 0.14,
                stroke_width: 1.2,
            },
            RadarPreset::Panel => RadarStyle {
                label_margin: 24.0,
                label_offset: 12.0,
                fill_opacity: 0.25,
                stroke_width: 1.5,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarSpec {
    pub axes: Vec<String>,
    pub values: Series,
    pub size: f64,
    /// Fixed value ceiling; `None` scales against `max(values, 1)`.
    pub scale: Option<f64>,
    pub preset: RadarPreset,
}

impl Default for RadarSpec {
    fn default() -> Self {
        Self {
            axes: Vec::new(),
            values: Vec::new(),
            size: 220.0,
            scale: None,
            preset: RadarPreset::default(),
        }
    }
}

impl RadarSpec {
    pub fn normalized(self) -> Self {
        Self {
            axes: self.axes,
            values: sanitize(&self.values),
            size: positive_or(self.size, Self::default().size),
            scale: self.scale.filter(|s| s.is_finite() && *s > 0.0),
            preset: self.preset,
        }
    }

    fn outer_radius(&self) -> f64 {
        (self.size / 2.0 - self.preset.style().label_margin).max(0.0)
    }

    fn axis_angle(&self, index: usize) -> f64 {
        index as f64 * 360.0 / self.axes.len().max(1) as f64
    }
}

/// One point per axis; missing values count as zero, extra values are ignored.
pub fn radar_points(spec: &RadarSpec) -> Vec<Point> {
    let c = spec.size / 2.0;
    let r = spec.outer_radius();
    let ceiling = spec
        .scale
        .unwrap_or_else(|| max_with_floor(&spec.values, 1.0));

    (0..spec.axes.len())
        .map(|i| {
            let v = spec.values.get(i).copied().unwrap_or(0.0);
            let ratio = clamp(v / ceiling, 0.0, 1.0);
            polar_to_cartesian(c, c, ratio * r, spec.axis_angle(i))
        })
        .collect()
}

pub fn render_radar(spec: &RadarSpec) -> Drawing {
    if spec.axes.is_empty() {
        return Drawing::empty(spec.size, spec.size);
    }
    let c = spec.size / 2.0;
    let r = spec.outer_radius();
    let style = spec.preset.style();
    let rim: Vec<Point> = (0..spec.axes.len())
        .map(|i| polar_to_cartesian(c, c, r, spec.axis_angle(i)))
        .collect();

    let mut shapes = vec![Shape::Polygon {
        points: rim.clone(),
        style: Style::stroke(Paint::Token(ThemeToken::Border), 0.6),
    }];
    shapes.extend(rim.iter().map(|p| Shape::Line {
        from: Point::new(c, c),
        to: *p,
        style: Style::stroke(Paint::Token(ThemeToken::Border), 0.8),
    }));
    shapes.push(Shape::Polygon {
        points: radar_points(spec),
        style: Style::fill(Paint::Token(ThemeToken::AccentGreen))
            .with_fill_opacity(style.fill_opacity)
            .with_stroke(Paint::Token(ThemeToken::AccentGreen), style.stroke_width),
    });
    shapes.extend(spec.axes.iter().enumerate().map(|(i, axis)| Shape::Text {
        at: polar_to_cartesian(c, c, r + style.label_offset, spec.axis_angle(i)),
        content: axis.clone(),
        size: 11.0,
        anchor: TextAnchor::Middle,
        style: Style::fill(Paint::Token(ThemeToken::Subtext)),
    }));

    Drawing {
        width: spec.size,
        height: spec.size,
        shapes,
    }
}

/// Wedge shape; a full turn becomes a circle since its arc endpoints coincide.
fn wedge(c: f64, r: f64, start: f64, end: f64, style: Style) -> Shape {
    if end - start >= 360.0 {
        Shape::Circle {
            center: Point::new(c, c),
            r,
            style,
        }
    } else {
        Shape::Path {
            path: pie_slice_path(c, c, r, start, end),
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarSpec {
    pub values: Series,
    pub size: f64,
}

impl Default for PolarSpec {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            size: 200.0,
        }
    }
}

impl PolarSpec {
    pub fn normalized(self) -> Self {
        Self {
            values: sanitize(&self.values),
            size: positive_or(self.size, Self::default().size),
        }
    }
}

/// Equal-angle wedges whose radius maps `value` (0..=100) onto `[inner, outer]`.
pub fn polar_radii(spec: &PolarSpec) -> Vec<f64> {
    let outer = spec.size / 2.0;
    spec.values
        .iter()
        .map(|v| {
            POLAR_INNER_RADIUS
                + clamp(*v, 0.0, POLAR_VALUE_CEILING) / POLAR_VALUE_CEILING
                    * (outer - POLAR_INNER_RADIUS)
        })
        .collect()
}

pub fn render_polar(spec: &PolarSpec) -> Drawing {
    let n = spec.values.len() as f64;
    let c = spec.size / 2.0;
    let shapes = polar_radii(spec)
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let start = i as f64 / n * 360.0;
            let end = (i + 1) as f64 / n * 360.0;
            wedge(
                c,
                r,
                start,
                end,
                Style::fill(Paint::Token(ThemeToken::Palette(i)))
                    .with_stroke(Paint::Token(ThemeToken::Card), 0.6),
            )
        })
        .collect();
    Drawing {
        width: spec.size,
        height: spec.size,
        shapes,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donut {
    pub inner_radius: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieSpec {
    pub values: Series,
    /// Per-wedge colours; falls back to the theme palette when absent.
    pub colors: Vec<String>,
    pub size: f64,
    pub donut: Option<Donut>,
}

impl Default for PieSpec {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            colors: Vec::new(),
            size: 120.0,
            donut: None,
        }
    }
}

impl PieSpec {
    pub fn normalized(self) -> Self {
        Self {
            values: sanitize(&self.values)
                .into_iter()
                .map(|v| v.max(0.0))
                .collect(),
            size: positive_or(self.size, Self::default().size),
            ..self
        }
    }
}

/// `(start, end)` angles of consecutive wedges sized by share of the total.
pub fn pie_angles(values: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = values.iter().map(|v| v.max(0.0)).sum();
    let total = if total > 0.0 { total } else { 1.0 };
    let mut angle = 0.0;
    values
        .iter()
        .map(|v| {
            let start = angle;
            angle += v.max(0.0) / total * 360.0;
            (start, angle)
        })
        .collect()
}

pub fn render_pie(spec: &PieSpec) -> Drawing {
    let c = spec.size / 2.0;
    let r = (c - 2.0).max(0.0);
    let mut shapes: Vec<Shape> = pie_angles(&spec.values)
        .into_iter()
        .enumerate()
        .map(|(i, (start, end))| {
            let fill = match spec.colors.get(i % spec.colors.len().max(1)) {
                Some(color) => Paint::Fixed(color.clone()),
                None => Paint::Token(ThemeToken::Palette(i)),
            };
            wedge(
                c,
                r,
                start,
                end,
                Style::fill(fill).with_stroke(Paint::Token(ThemeToken::Card), 0.5),
            )
        })
        .collect();

    if let Some(donut) = spec.donut.as_ref().filter(|_| !shapes.is_empty()) {
        shapes.push(Shape::Circle {
            center: Point::new(c, c),
            r: donut.inner_radius,
            style: Style::fill(Paint::Token(ThemeToken::Card)),
        });
        if !donut.label.is_empty() {
            shapes.push(Shape::Text {
                at: Point::new(c, c + 6.0),
                content: donut.label.clone(),
                size: 13.0,
                anchor: TextAnchor::Middle,
                style: Style::fill(Paint::Token(ThemeToken::Text)),
            });
        }
    }

    Drawing {
        width: spec.size,
        height: spec.size,
        shapes,
    }
}
