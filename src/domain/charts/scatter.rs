// Scatter and bubble renderers over fixed data domains
use super::{Drawing, Paint, Shape, Style, positive_or};
use crate::domain::geometry::{Point, clamp};
use crate::domain::theme::ThemeToken;
use serde::{Deserialize, Serialize};

/// Hour-of-day domain of the scatter x axis.
const SCATTER_X_MAX: f64 = 23.0;
/// Both bubble axes share a 0..=110 domain.
const BUBBLE_DOMAIN: f64 = 110.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterSpec {
    pub points: Vec<ScatterPoint>,
    pub width: f64,
    pub height: f64,
}

impl Default for ScatterSpec {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            width: 400.0,
            height: 160.0,
        }
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

impl ScatterSpec {
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            points: self
                .points
                .into_iter()
                .map(|p| ScatterPoint {
                    x: finite_or_zero(p.x),
                    y: finite_or_zero(p.y),
                })
                .collect(),
            width: positive_or(self.width, defaults.width),
            height: positive_or(self.height, defaults.height),
        }
    }
}

/// Circles placed by hour (x) and raw magnitude (y), clamped into the surface.
pub fn scatter_circles(spec: &ScatterSpec) -> Vec<(Point, f64)> {
    spec.points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = clamp(p.x, 0.0, SCATTER_X_MAX) / SCATTER_X_MAX * (spec.width - 40.0) + 20.0;
            let y = spec.height - clamp(p.y, 0.0, spec.height);
            (Point::new(x, y), 3.0 + (i % 3) as f64)
        })
        .collect()
}

pub fn render_scatter(spec: &ScatterSpec) -> Drawing {
    Drawing {
        width: spec.width,
        height: spec.height,
        shapes: scatter_circles(spec)
            .into_iter()
            .map(|(center, r)| Shape::Circle {
                center,
                r,
                style: Style::fill(Paint::Token(ThemeToken::AccentBlue)).with_fill_opacity(0.9),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleSpec {
    pub bubbles: Vec<Bubble>,
    pub width: f64,
    pub height: f64,
}

impl Default for BubbleSpec {
    fn default() -> Self {
        Self {
            bubbles: Vec::new(),
            width: 220.0,
            height: 140.0,
        }
    }
}

impl BubbleSpec {
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            bubbles: self
                .bubbles
                .into_iter()
                .map(|b| Bubble {
                    x: finite_or_zero(b.x),
                    y: finite_or_zero(b.y),
                    r: finite_or_zero(b.r).max(0.0),
                })
                .collect(),
            width: positive_or(self.width, defaults.width),
            height: positive_or(self.height, defaults.height),
        }
    }
}

/// Radius comes straight from the datum; only the position is mapped.
pub fn bubble_circles(spec: &BubbleSpec) -> Vec<(Point, f64)> {
    spec.bubbles
        .iter()
        .map(|b| {
            let x = clamp(b.x, 0.0, BUBBLE_DOMAIN) / BUBBLE_DOMAIN * (spec.width - 20.0) + 10.0;
            let y = spec.height - clamp(b.y, 0.0, BUBBLE_DOMAIN) / BUBBLE_DOMAIN * (spec.height - 20.0);
            (Point::new(x, y), b.r.max(0.0))
        })
        .collect()
}

pub fn render_bubble(spec: &BubbleSpec) -> Drawing {
    Drawing {
        width: spec.width,
        height: spec.height,
        shapes: bubble_circles(spec)
            .into_iter()
            .enumerate()
            .map(|(i, (center, r))| Shape::Circle {
                center,
                r,
                style: Style::fill(Paint::Token(ThemeToken::Palette(i))).with_fill_opacity(0.92),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scatter_maps_hours_and_clamps() {
        let spec = ScatterSpec {
            points: vec![
                ScatterPoint { x: 0.0, y: 10.0 },
                ScatterPoint { x: 23.0, y: 500.0 },
                ScatterPoint { x: 40.0, y: -5.0 },
            ],
            ..ScatterSpec::default()
        };
        let circles = scatter_circles(&spec);
        assert_eq!(circles[0], (Point::new(20.0, 150.0), 3.0));
        assert_eq!(circles[1], (Point::new(380.0, 0.0), 4.0));
        assert_eq!(circles[2], (Point::new(380.0, 160.0), 5.0));
    }

    #[test]
    fn test_bubble_radius_passes_through() {
        let spec = BubbleSpec {
            bubbles: vec![Bubble {
                x: 110.0,
                y: 0.0,
                r: 17.5,
            }],
            ..BubbleSpec::default()
        };
        let circles = bubble_circles(&spec);
        assert_eq!(circles, vec![(Point::new(210.0, 140.0), 17.5)]);
        assert_eq!(render_bubble(&spec).len(), 1);
    }
}
