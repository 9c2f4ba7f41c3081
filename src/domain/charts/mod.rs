// Chart renderers: one tagged variant per chart family, each a pure
// mapping from its input schema to a drawable shape set.
pub mod cartesian;
pub mod radial;
pub mod scatter;

use crate::domain::geometry::{PathSpec, Point, Rect};
use crate::domain::theme::ThemeToken;
use serde::{Deserialize, Serialize};

pub use cartesian::{BarSpec, LineSpec, MixedSpec, SparklineSpec};
pub use radial::{Donut, PieSpec, PolarSpec, RadarPreset, RadarSpec};
pub use scatter::{BubbleSpec, ScatterSpec};

/// Colour reference resolved against a theme at output time.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    None,
    Token(ThemeToken),
    Fixed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: Paint,
    pub fill_opacity: f64,
    pub stroke: Paint,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Style {
    pub fn fill(paint: Paint) -> Self {
        Self {
            fill: paint,
            fill_opacity: 1.0,
            stroke: Paint::None,
            stroke_width: 0.0,
            opacity: 1.0,
        }
    }

    pub fn stroke(paint: Paint, width: f64) -> Self {
        Self {
            fill: Paint::None,
            fill_opacity: 1.0,
            stroke: paint,
            stroke_width: width,
            opacity: 1.0,
        }
    }

    pub fn with_stroke(mut self, paint: Paint, width: f64) -> Self {
        self.stroke = paint;
        self.stroke_width = width;
        self
    }

    pub fn with_fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = opacity;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Path {
        path: PathSpec,
        style: Style,
    },
    Rect {
        rect: Rect,
        rx: f64,
        style: Style,
    },
    Circle {
        center: Point,
        r: f64,
        style: Style,
    },
    Polygon {
        points: Vec<Point>,
        style: Style,
    },
    Line {
        from: Point,
        to: Point,
        style: Style,
    },
    Text {
        at: Point,
        content: String,
        size: f64,
        anchor: TextAnchor,
        style: Style,
    },
}

/// Shape set addressed in a `width x height` viewBox.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
}

impl Drawing {
    pub fn empty(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    /// A single centred "No data" marker.
    pub fn placeholder(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            shapes: vec![Shape::Text {
                at: Point::new(width / 2.0, height / 2.0),
                content: "No data".to_string(),
                size: 12.0,
                anchor: TextAnchor::Middle,
                style: Style::fill(Paint::Token(ThemeToken::Subtext)),
            }],
        }
    }

    #[cfg(test)]
    pub fn is_placeholder(&self) -> bool {
        matches!(self.shapes.as_slice(), [Shape::Text { content, .. }] if content == "No data")
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Line(LineSpec),
    Area(LineSpec),
    Sparkline(SparklineSpec),
    Bar(BarSpec),
    MixedBarLine(MixedSpec),
    Radar(RadarSpec),
    Polar(PolarSpec),
    Pie(PieSpec),
    Scatter(ScatterSpec),
    Bubble(BubbleSpec),
}

impl ChartSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            ChartSpec::Line(_) => "line",
            ChartSpec::Area(_) => "area",
            ChartSpec::Sparkline(_) => "sparkline",
            ChartSpec::Bar(_) => "bar",
            ChartSpec::MixedBarLine(_) => "mixed_bar_line",
            ChartSpec::Radar(_) => "radar",
            ChartSpec::Polar(_) => "polar",
            ChartSpec::Pie(_) => "pie",
            ChartSpec::Scatter(_) => "scatter",
            ChartSpec::Bubble(_) => "bubble",
        }
    }

    /// Replaces non-finite numbers and non-positive sizes with safe defaults.
    pub fn normalized(self) -> Self {
        match self {
            ChartSpec::Line(s) => ChartSpec::Line(s.normalized()),
            ChartSpec::Area(s) => ChartSpec::Area(s.normalized()),
            ChartSpec::Sparkline(s) => ChartSpec::Sparkline(s.normalized()),
            ChartSpec::Bar(s) => ChartSpec::Bar(s.normalized()),
            ChartSpec::MixedBarLine(s) => ChartSpec::MixedBarLine(s.normalized()),
            ChartSpec::Radar(s) => ChartSpec::Radar(s.normalized()),
            ChartSpec::Polar(s) => ChartSpec::Polar(s.normalized()),
            ChartSpec::Pie(s) => ChartSpec::Pie(s.normalized()),
            ChartSpec::Scatter(s) => ChartSpec::Scatter(s.normalized()),
            ChartSpec::Bubble(s) => ChartSpec::Bubble(s.normalized()),
        }
    }

    pub fn render(&self) -> Drawing {
        match self {
            ChartSpec::Line(s) => cartesian::render_line(s),
            ChartSpec::Area(s) => cartesian::render_area(s),
            ChartSpec::Sparkline(s) => cartesian::render_sparkline(s),
            ChartSpec::Bar(s) => cartesian::render_bar(s),
            ChartSpec::MixedBarLine(s) => cartesian::render_mixed(s),
            ChartSpec::Radar(s) => radial::render_radar(s),
            ChartSpec::Polar(s) => radial::render_polar(s),
            ChartSpec::Pie(s) => radial::render_pie(s),
            ChartSpec::Scatter(s) => scatter::render_scatter(s),
            ChartSpec::Bubble(s) => scatter::render_bubble(s),
        }
    }
}

/// Memoises the last rendered drawing, keyed on the full input spec.
#[derive(Debug, Default, Clone)]
pub struct ChartCache {
    entry: Option<(ChartSpec, Drawing)>,
    renders: usize,
}

impl ChartCache {
    pub fn render(&mut self, spec: &ChartSpec) -> &Drawing {
        let stale = !matches!(&self.entry, Some((cached, _)) if cached == spec);
        if stale {
            self.renders += 1;
            self.entry = None;
        }
        let (_, drawing) = self
            .entry
            .get_or_insert_with(|| (spec.clone(), spec.render()));
        drawing
    }

    #[cfg(test)]
    pub fn render_count(&self) -> usize {
        self.renders
    }
}

pub(crate) fn positive_or(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { default }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_empty_specs() -> Vec<ChartSpec> {
        vec![
            ChartSpec::Line(LineSpec::default()),
            ChartSpec::Area(LineSpec::default()),
            ChartSpec::Sparkline(SparklineSpec::default()),
            ChartSpec::Bar(BarSpec::default()),
            ChartSpec::MixedBarLine(MixedSpec::default()),
            ChartSpec::Radar(RadarSpec::default()),
            ChartSpec::Polar(PolarSpec::default()),
            ChartSpec::Pie(PieSpec::default()),
            ChartSpec::Scatter(ScatterSpec::default()),
            ChartSpec::Bubble(BubbleSpec::default()),
        ]
    }

    #[test]
    fn test_empty_series_degrade() {
        for spec in all_empty_specs() {
            let drawing = spec.render();
            assert!(
                drawing.shapes.is_empty() || drawing.is_placeholder(),
                "{} rendered {} shapes",
                spec.kind(),
                drawing.shapes.len()
            );
        }
    }

    #[test]
    fn test_tagged_spec_defaults() {
        let spec: ChartSpec = serde_json::from_str(r#"{"kind":"bar","data":[1,2,3]}"#).unwrap();
        match spec {
            ChartSpec::Bar(bar) => {
                assert_eq!(bar.data, vec![1.0, 2.0, 3.0]);
                assert_eq!(bar.width, 320.0);
                assert_eq!(bar.height, 140.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_normalized_repairs_sizes() {
        let spec = ChartSpec::Bar(BarSpec {
            data: vec![f64::NAN, 2.0],
            width: -1.0,
            height: 0.0,
        })
        .normalized();
        let ChartSpec::Bar(bar) = spec else {
            panic!("kind changed");
        };
        assert_eq!(bar.data, vec![0.0, 2.0]);
        assert_eq!(bar.width, 320.0);
        assert_eq!(bar.height, 140.0);
    }

    #[test]
    fn test_cache_rerenders_only_on_change() {
        let mut cache = ChartCache::default();
        let a = ChartSpec::Bar(BarSpec {
            data: vec![1.0, 2.0],
            ..BarSpec::default()
        });
        let b = ChartSpec::Bar(BarSpec {
            data: vec![1.0, 3.0],
            ..BarSpec::default()
        });
        cache.render(&a);
        cache.render(&a);
        assert_eq!(cache.render_count(), 1);
        let drawing = cache.render(&b).clone();
        assert_eq!(cache.render_count(), 2);
        assert_eq!(drawing, b.render());
    }
}
