// Line, area, sparkline, bar and mixed bar+line renderers
use super::{Drawing, Paint, Shape, Style, TextAnchor, positive_or};
use crate::domain::geometry::{
    PathCommand, Point, Rect, TickSet, clamp, generate_nice_ticks, points_to_path,
};
use crate::domain::series::{Series, max_with_floor, sanitize};
use crate::domain::theme::ThemeToken;
use serde::{Deserialize, Serialize};

const AXIS_PAD_X: f64 = 30.0;
const AXIS_PAD_Y: f64 = 20.0;
const MAX_X_LABELS: usize = 7;
const BAR_PAD: f64 = 14.0;
const BAR_GAP: f64 = 8.0;
const MIXED_PAD: f64 = 40.0;
const MIXED_HEADROOM: f64 = 20.0;
const SPARK_PAD: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSpec {
    pub data: Series,
    pub labels: Vec<String>,
    pub width: f64,
    pub height: f64,
}

impl Default for LineSpec {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            labels: Vec::new(),
            width: 320.0,
            height: 140.0,
        }
    }
}

impl LineSpec {
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            data: sanitize(&self.data),
            labels: self.labels,
            width: positive_or(self.width, defaults.width),
            height: positive_or(self.height, defaults.height),
        }
    }
}

/// Plot area of an axis-decorated line/area chart.
struct AxisFrame {
    width: f64,
    height: f64,
    graph_width: f64,
    graph_height: f64,
    nice_max: f64,
}

impl AxisFrame {
    fn new(spec: &LineSpec) -> (Self, TickSet) {
        let data_max = spec.data.iter().copied().fold(f64::MIN, f64::max);
        let nice = generate_nice_ticks(data_max);
        let frame = Self {
            width: spec.width,
            height: spec.height,
            graph_width: spec.width - AXIS_PAD_X,
            graph_height: spec.height - AXIS_PAD_Y,
            nice_max: nice.nice_max,
        };
        let ticks = TickSet::project(&nice, |v| frame.y(v));
        (frame, ticks)
    }

    fn x(&self, index: usize, count: usize) -> f64 {
        let span = self.graph_width - 10.0;
        if count <= 1 {
            return AXIS_PAD_X + 5.0 + span / 2.0;
        }
        (index as f64 / (count - 1) as f64) * span + AXIS_PAD_X + 5.0
    }

    fn y(&self, value: f64) -> f64 {
        let ratio = clamp(value / self.nice_max, 0.0, 1.0);
        self.graph_height - ratio * (self.graph_height - 10.0) - 5.0
    }

    fn points(&self, data: &[f64]) -> Vec<Point> {
        data.iter()
            .enumerate()
            .map(|(i, v)| Point::new(self.x(i, data.len()), self.y(*v)))
            .collect()
    }

    fn decorations(&self, ticks: &TickSet, labels: &[String]) -> (Vec<Shape>, Vec<Shape>) {
        let mut grid = Vec::with_capacity(ticks.ticks.len() * 2);
        for tick in &ticks.ticks {
            grid.push(Shape::Text {
                at: Point::new(AXIS_PAD_X - 8.0, tick.position + 4.0),
                content: format_tick(tick.value),
                size: 10.0,
                anchor: TextAnchor::End,
                style: Style::fill(Paint::Token(ThemeToken::Subtext)),
            });
            grid.push(Shape::Line {
                from: Point::new(AXIS_PAD_X, tick.position),
                to: Point::new(self.width, tick.position),
                style: Style::stroke(Paint::Token(ThemeToken::Border), 0.5),
            });
        }

        let interval = labels.len().div_ceil(MAX_X_LABELS).max(1);
        let x_labels = labels
            .iter()
            .enumerate()
            .filter(|(i, _)| *i == 0 || i % interval == 0 || *i == labels.len() - 1)
            .map(|(i, label)| Shape::Text {
                at: Point::new(self.x(i, labels.len()), self.height - 5.0),
                content: label.clone(),
                size: 10.0,
                anchor: TextAnchor::Middle,
                style: Style::fill(Paint::Token(ThemeToken::Subtext)),
            })
            .collect();
        (grid, x_labels)
    }
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Drawing-space points of a line/area series, scaled against the nice axis ceiling.
#[cfg(test)]
pub fn line_points(spec: &LineSpec) -> Vec<Point> {
    let (frame, _) = AxisFrame::new(spec);
    frame.points(&spec.data)
}

pub fn render_line(spec: &LineSpec) -> Drawing {
    if spec.data.is_empty() {
        return Drawing::placeholder(spec.width, spec.height);
    }
    let (frame, ticks) = AxisFrame::new(spec);
    let path = points_to_path(&frame.points(&spec.data));
    let (mut shapes, labels) = frame.decorations(&ticks, &spec.labels);

    shapes.push(Shape::Path {
        path: path.clone(),
        style: Style::stroke(Paint::Token(ThemeToken::MidBlue), 3.0).with_opacity(0.12),
    });
    shapes.push(Shape::Path {
        path,
        style: Style::stroke(Paint::Token(ThemeToken::AccentBlue), 2.0),
    });
    shapes.extend(labels);

    Drawing {
        width: spec.width,
        height: spec.height,
        shapes,
    }
}

pub fn render_area(spec: &LineSpec) -> Drawing {
    if spec.data.is_empty() {
        return Drawing::placeholder(spec.width, spec.height);
    }
    let (frame, ticks) = AxisFrame::new(spec);
    let top = points_to_path(&frame.points(&spec.data));
    let baseline = spec.height - AXIS_PAD_Y;
    let outline = top.extended([
        PathCommand::LineTo(Point::new(spec.width, baseline)),
        PathCommand::LineTo(Point::new(AXIS_PAD_X, baseline)),
        PathCommand::Close,
    ]);
    let (mut shapes, labels) = frame.decorations(&ticks, &spec.labels);

    shapes.push(Shape::Path {
        path: outline,
        style: Style::fill(Paint::Token(ThemeToken::AccentGreen)).with_fill_opacity(0.45),
    });
    shapes.push(Shape::Path {
        path: top,
        style: Style::stroke(Paint::Token(ThemeToken::DarkGreen), 1.25),
    });
    shapes.extend(labels);

    Drawing {
        width: spec.width,
        height: spec.height,
        shapes,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparklineSpec {
    pub data: Series,
    pub width: f64,
    pub height: f64,
}

impl Default for SparklineSpec {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            width: 140.0,
            height: 36.0,
        }
    }
}

impl SparklineSpec {
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            data: sanitize(&self.data),
            width: positive_or(self.width, defaults.width),
            height: positive_or(self.height, defaults.height),
        }
    }
}

/// Min-max normalised points; a flat series sits on the bottom line.
pub fn sparkline_points(spec: &SparklineSpec) -> Vec<Point> {
    let (w, h) = (spec.width, spec.height);
    let min = spec.data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = spec.data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max - min > 0.0 { max - min } else { 1.0 };
    let intervals = spec.data.len().saturating_sub(1).max(1) as f64;

    spec.data
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let x = (i as f64 / intervals) * (w - SPARK_PAD * 2.0) + SPARK_PAD;
            let y = h - ((d - min) / range) * (h - SPARK_PAD * 2.0) - SPARK_PAD;
            Point::new(x, y)
        })
        .collect()
}

pub fn render_sparkline(spec: &SparklineSpec) -> Drawing {
    let points = sparkline_points(spec);
    let Some(last) = points.last().copied() else {
        return Drawing::empty(spec.width, spec.height);
    };
    Drawing {
        width: spec.width,
        height: spec.height,
        shapes: vec![
            Shape::Path {
                path: points_to_path(&points),
                style: Style::stroke(Paint::Token(ThemeToken::AccentGreen), 2.0),
            },
            Shape::Circle {
                center: last,
                r: 3.0,
                style: Style::fill(Paint::Token(ThemeToken::AccentGreen)),
            },
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarSpec {
    pub data: Series,
    pub width: f64,
    pub height: f64,
}

impl Default for BarSpec {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            width: 320.0,
            height: 140.0,
        }
    }
}

impl BarSpec {
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            data: sanitize(&self.data),
            width: positive_or(self.width, defaults.width),
            height: positive_or(self.height, defaults.height),
        }
    }
}

/// Bar rectangles; heights are `value / max(series, 1)` of the plot height.
pub fn bar_rects(spec: &BarSpec) -> Vec<Rect> {
    let count = spec.data.len().max(1) as f64;
    let bar_width = ((spec.width - BAR_PAD * 2.0) / count - BAR_GAP).max(0.0);
    let max = max_with_floor(&spec.data, 1.0);
    let plot_height = spec.height - BAR_PAD * 2.0;

    spec.data
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let bar_height = clamp(v / max, 0.0, 1.0) * plot_height;
            Rect::new(
                BAR_PAD + i as f64 * (bar_width + BAR_GAP),
                spec.height - BAR_PAD - bar_height,
                bar_width,
                bar_height,
            )
        })
        .collect()
}

pub fn render_bar(spec: &BarSpec) -> Drawing {
    Drawing {
        width: spec.width,
        height: spec.height,
        shapes: bar_rects(spec)
            .into_iter()
            .map(|rect| Shape::Rect {
                rect,
                rx: 4.0,
                style: Style::fill(Paint::Token(ThemeToken::BarPrimary)),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixedSpec {
    pub bars: Series,
    pub line: Series,
    pub width: f64,
    pub height: f64,
}

impl Default for MixedSpec {
    fn default() -> Self {
        Self {
            bars: Vec::new(),
            line: Vec::new(),
            width: 700.0,
            height: 220.0,
        }
    }
}

impl MixedSpec {
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            bars: sanitize(&self.bars),
            line: sanitize(&self.line),
            width: positive_or(self.width, defaults.width),
            height: positive_or(self.height, defaults.height),
        }
    }
}

/// Bars and line are scaled independently, each against its own maximum.
pub fn mixed_geometry(spec: &MixedSpec) -> (Vec<Rect>, Vec<Point>) {
    let (w, h) = (spec.width, spec.height);
    let plot_height = h - MIXED_PAD - MIXED_HEADROOM;
    let bar_width = ((w - MIXED_PAD * 2.0) / spec.bars.len().max(1) as f64 - BAR_GAP).max(0.0);
    let bar_max = max_with_floor(&spec.bars, 1.0);
    let line_max = max_with_floor(&spec.line, 1.0);

    let rects = spec
        .bars
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let bar_height = clamp(v / bar_max, 0.0, 1.0) * plot_height;
            Rect::new(
                MIXED_PAD + i as f64 * (bar_width + BAR_GAP),
                h - MIXED_PAD - bar_height,
                bar_width,
                bar_height,
            )
        })
        .collect();

    let step = (w - MIXED_PAD * 2.0) / spec.line.len().saturating_sub(1).max(1) as f64;
    let points = spec
        .line
        .iter()
        .enumerate()
        .map(|(i, v)| {
            Point::new(
                MIXED_PAD + i as f64 * step,
                h - MIXED_PAD - clamp(v / line_max, 0.0, 1.0) * plot_height,
            )
        })
        .collect();

    (rects, points)
}

pub fn render_mixed(spec: &MixedSpec) -> Drawing {
    let (rects, points) = mixed_geometry(spec);
    let mut shapes: Vec<Shape> = rects
        .into_iter()
        .map(|rect| Shape::Rect {
            rect,
            rx: 3.0,
            style: Style::fill(Paint::Token(ThemeToken::BarSecondary)),
        })
        .collect();
    if !points.is_empty() {
        shapes.push(Shape::Path {
            path: points_to_path(&points),
            style: Style::stroke(Paint::Token(ThemeToken::AccentBlue), 3.0),
        });
    }
    Drawing {
        width: spec.width,
        height: spec.height,
        shapes,
    }
}
