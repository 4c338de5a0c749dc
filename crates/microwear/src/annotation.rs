//! Annotated microwear features.
//!
//! An [`Annotation`] pairs a [`Category`] with exactly one [`Shape`]. The
//! JSON form follows the annotation tool's flat layout:
//!
//! ```json
//! { "type": "circle", "catId": "lp", "x": 10.0, "y": 12.0, "r": 3.0, "widthVal": 5.5 }
//! ```
//!
//! Unknown `type` or `catId` strings are rejected during deserialization, so
//! the statistics engine never sees an item it cannot classify.

use crate::category::{Category, FeatureClass};
use crate::geometry::Segment;

/// Geometry of a single annotation, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Pit marked by a click; diameter is assumed.
    Point { x: f64, y: f64 },
    /// Pit with a drawn radius.
    Circle {
        x: f64,
        y: f64,
        #[serde(default)]
        r: f64,
        /// Measured diameter in physical units; overrides `2r / ppu`.
        #[serde(rename = "widthVal", default, skip_serializing_if = "Option::is_none")]
        width_val: Option<f64>,
    },
    /// Scratch segment.
    #[serde(alias = "line_fs")]
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        /// Measured width in physical units; overrides the standard width.
        #[serde(rename = "widthVal", default, skip_serializing_if = "Option::is_none")]
        width_val: Option<f64>,
    },
}

impl Shape {
    pub fn class(&self) -> FeatureClass {
        match self {
            Self::Point { .. } | Self::Circle { .. } => FeatureClass::Pit,
            Self::Line { .. } => FeatureClass::Scratch,
        }
    }

    /// Pit center or scratch midpoint.
    pub fn center(&self) -> [f64; 2] {
        match *self {
            Self::Point { x, y } | Self::Circle { x, y, .. } => [x, y],
            Self::Line { x1, y1, x2, y2, .. } => [(x1 + x2) * 0.5, (y1 + y2) * 0.5],
        }
    }

    /// Largest x and y coordinate the shape reaches for scene sizing.
    ///
    /// Pits contribute their center; lines the larger endpoint coordinate.
    pub fn max_xy(&self) -> [f64; 2] {
        match *self {
            Self::Point { x, y } | Self::Circle { x, y, .. } => [x, y],
            Self::Line { x1, y1, x2, y2, .. } => [x1.max(x2), y1.max(y2)],
        }
    }

    /// User-measured size in physical units, when present and positive.
    pub fn measured_width(&self) -> Option<f64> {
        match *self {
            Self::Point { .. } => None,
            Self::Circle { width_val, .. } | Self::Line { width_val, .. } => {
                width_val.filter(|w| w.is_finite() && *w > 0.0)
            }
        }
    }

    /// Segment for line shapes.
    pub fn segment(&self) -> Option<Segment> {
        match *self {
            Self::Line { x1, y1, x2, y2, .. } => Some(Segment::new([x1, y1], [x2, y2])),
            _ => None,
        }
    }
}

/// A categorized feature drawn on a micrograph.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Annotation {
    #[serde(rename = "catId")]
    pub category: Category,
    #[serde(flatten)]
    pub shape: Shape,
}

impl Annotation {
    pub fn new(category: Category, shape: Shape) -> Self {
        Self { category, shape }
    }

    /// Point pit with the standard diameter.
    pub fn point(category: Category, x: f64, y: f64) -> Self {
        Self::new(category, Shape::Point { x, y })
    }

    /// Circle pit with a pixel radius.
    pub fn circle(category: Category, x: f64, y: f64, r: f64) -> Self {
        Self::new(
            category,
            Shape::Circle {
                x,
                y,
                r,
                width_val: None,
            },
        )
    }

    /// Scratch from `a` to `b` in pixels.
    pub fn line(category: Category, a: [f64; 2], b: [f64; 2]) -> Self {
        Self::new(
            category,
            Shape::Line {
                x1: a[0],
                y1: a[1],
                x2: b[0],
                y2: b[1],
                width_val: None,
            },
        )
    }

    /// Attach a measured width (scratches) or diameter (circles).
    ///
    /// Points have no measurable size and are returned unchanged.
    pub fn with_width(mut self, width: f64) -> Self {
        match &mut self.shape {
            Shape::Circle { width_val, .. } | Shape::Line { width_val, .. } => {
                *width_val = Some(width);
            }
            Shape::Point { .. } => {}
        }
        self
    }

    pub fn is_statistically_relevant(&self) -> bool {
        self.category.is_statistically_relevant()
    }
}
