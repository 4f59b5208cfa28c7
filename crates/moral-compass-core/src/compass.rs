//! Compass geometry: where a decision lands on the radial graphic.
//!
//! Two angular conventions live here and must not be mixed:
//!
//! - **Dimension axes** span the full circle. Axis `i` of `n` sits at
//!   `i * 2π / n`, starting at angle 0 with no north offset, and points are
//!   placed with `x = cos`, `y = sin` (a radar chart).
//! - **The goodness arrow** spans only the upper semicircle. Goodness 1 maps
//!   to angle 0 (north), -1 to π (south), and points are placed with
//!   `x = sin`, `y = -cos` (screen coordinates, y grows downward).
//!
//! Nothing here draws. Callers supply the canvas and hand the resulting
//! points to whatever rendering surface they use.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_6, PI};

use crate::config::{BlendWeights, GeometryConfig};
use crate::decision::{Decision, MAX_SCORE, MIN_SCORE};
use crate::types::{MoralDimension, PhilosophicalScores};

/// A point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Drawing surface size, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    #[serde(default = "default_canvas_side")]
    pub width: f64,

    #[serde(default = "default_canvas_side")]
    pub height: f64,
}

fn default_canvas_side() -> f64 {
    400.0
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
        }
    }
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Largest radius that fits the canvas after leaving `margin` on the
    /// shorter side. Never negative.
    pub fn radius(&self, margin: f64) -> f64 {
        let center = self.center();
        (center.x.min(center.y) - margin).max(0.0)
    }
}

/// Angle of dimension axis `index` when `total` axes share the circle.
/// With no axes there is no circle to share, and the angle is 0.
pub fn dimension_angle(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    index as f64 * 2.0 * PI / total as f64
}

/// Rescale a dimension score from [-10, 10] to [0, 1].
pub fn normalize_score(score: f64) -> f64 {
    (score - MIN_SCORE) / (MAX_SCORE - MIN_SCORE)
}

/// Radar-chart point for a score along an axis.
///
/// Distance from `center` is `radius` times the normalized score, so -10
/// sits on the center and 10 at the full radius.
pub fn dimension_point(angle: f64, score: f64, radius: f64, center: Point) -> Point {
    let reach = radius * normalize_score(score);
    Point::new(
        center.x + angle.cos() * reach,
        center.y + angle.sin() * reach,
    )
}

/// Arrow angle for a goodness value: 1 → 0 (north), 0 → π/2, -1 → π (south).
pub fn decision_angle(goodness: f64) -> f64 {
    PI * (1.0 - goodness) / 2.0
}

/// Arrow tip for an arrow angle, using the north-up convention.
pub fn arrow_tip(angle: f64, radius: f64, center: Point) -> Point {
    Point::new(
        center.x + angle.sin() * radius,
        center.y - angle.cos() * radius,
    )
}

/// Triangle for the arrowhead: the tip, then its two trailing corners.
pub fn arrowhead(tip: Point, angle: f64, size: f64) -> [Point; 3] {
    let left = angle - FRAC_PI_6;
    let right = angle + FRAC_PI_6;
    [
        tip,
        Point::new(tip.x - size * left.cos(), tip.y - size * left.sin()),
        Point::new(tip.x - size * right.cos(), tip.y - size * right.sin()),
    ]
}

/// Anchor for a dimension label, `offset` past the end of its axis.
pub fn label_anchor(angle: f64, radius: f64, offset: f64, center: Point) -> Point {
    let reach = radius + offset;
    Point::new(
        center.x + angle.cos() * reach,
        center.y + angle.sin() * reach,
    )
}

/// Goodness blended with the mean philosophy score.
///
/// Not clamped: philosophy scores can reach twice their base weight, so the
/// blend can leave [-1, 1].
pub fn blended_goodness(goodness: f64, scores: &PhilosophicalScores, weights: &BlendWeights) -> f64 {
    goodness * weights.decision + scores.mean() * weights.philosophy
}

/// Projection of one dimension onto its axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisProjection {
    pub dimension: MoralDimension,
    pub angle: f64,
    pub score: f64,
    pub normalized: f64,
    pub point: Point,
    pub label_anchor: Point,
}

/// The goodness arrow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrowGeometry {
    pub angle: f64,
    pub tip: Point,
    pub head: [Point; 3],
}

/// Everything a renderer needs to draw one decision's compass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompassLayout {
    pub canvas: Canvas,
    pub center: Point,
    pub axis_radius: f64,
    pub arrow_radius: f64,
    /// One entry per dimension, in canonical order
    pub axes: Vec<AxisProjection>,
    pub arrow: ArrowGeometry,
}

impl CompassLayout {
    /// Project a decision onto a canvas.
    ///
    /// Unscored dimensions are drawn at score 0, i.e. halfway out.
    pub fn project(decision: &Decision, canvas: Canvas, geometry: &GeometryConfig) -> Self {
        let center = canvas.center();
        let axis_radius = canvas.radius(geometry.axis_margin);
        let arrow_radius = canvas.radius(geometry.arrow_margin);
        let total = MoralDimension::ALL.len();

        let axes = MoralDimension::ALL
            .into_iter()
            .map(|dimension| {
                let angle = dimension_angle(dimension.index(), total);
                let score = decision.dimension_score(dimension);
                AxisProjection {
                    dimension,
                    angle,
                    score,
                    normalized: normalize_score(score),
                    point: dimension_point(angle, score, axis_radius, center),
                    label_anchor: label_anchor(angle, axis_radius, geometry.label_offset, center),
                }
            })
            .collect();

        let angle = decision_angle(decision.goodness());
        let tip = arrow_tip(angle, arrow_radius, center);
        let arrow = ArrowGeometry {
            angle,
            tip,
            head: arrowhead(tip, angle, geometry.arrowhead_size),
        };

        tracing::debug!(
            decision = %decision.name(),
            axis_radius,
            arrow_angle = angle,
            "Projected compass layout"
        );

        Self {
            canvas,
            center,
            axis_radius,
            arrow_radius,
            axes,
            arrow,
        }
    }
}
