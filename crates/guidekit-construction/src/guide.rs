//! Guide, guide-group, and construction-point entities.
//!
//! Guides are auxiliary reference lines consulted while placing drawing
//! entities; they are never exported with the final drawing. Construction
//! points are discrete snap candidates independent of any guide.

use chrono::{DateTime, Utc};
use guidekit_core::geometry::Point;
use serde::{Deserialize, Serialize};

/// Orientation of an infinite (offset-based) guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Vertical line at `x = offset`.
    Vertical,
    /// Horizontal line at `y = offset`.
    Horizontal,
}

/// Guide placement.
///
/// Infinite guides carry only a signed offset; diagonal guides are finite
/// segments with both endpoints. A vertical guide carrying endpoints is
/// unrepresentable by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Axis {
    /// Infinite vertical line at `x = offset`.
    Vertical { offset: f64 },
    /// Infinite horizontal line at `y = offset`.
    Horizontal { offset: f64 },
    /// Finite diagonal segment.
    Diagonal { start: Point, end: Point },
}

impl Axis {
    /// Builds the offset axis for an orientation.
    pub fn from_orientation(orientation: Orientation, offset: f64) -> Self {
        match orientation {
            Orientation::Vertical => Axis::Vertical { offset },
            Orientation::Horizontal => Axis::Horizontal { offset },
        }
    }

    /// The orientation of an offset guide, `None` for diagonals.
    pub fn orientation(&self) -> Option<Orientation> {
        match self {
            Axis::Vertical { .. } => Some(Orientation::Vertical),
            Axis::Horizontal { .. } => Some(Orientation::Horizontal),
            Axis::Diagonal { .. } => None,
        }
    }

    /// The signed offset of an infinite guide, `None` for diagonals.
    pub fn offset(&self) -> Option<f64> {
        match self {
            Axis::Vertical { offset } | Axis::Horizontal { offset } => Some(*offset),
            Axis::Diagonal { .. } => None,
        }
    }

    /// The endpoints of a diagonal guide, `None` otherwise.
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        match self {
            Axis::Diagonal { start, end } => Some((*start, *end)),
            _ => None,
        }
    }

    pub fn is_diagonal(&self) -> bool {
        matches!(self, Axis::Diagonal { .. })
    }
}

/// Per-guide rendering override. Interpretation belongs to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideStyle {
    pub color: String,
    pub width: f64,
    pub dashed: bool,
}

impl Default for GuideStyle {
    fn default() -> Self {
        Self {
            color: "#4a90d9".to_string(),
            width: 1.0,
            dashed: true,
        }
    }
}

/// An auxiliary construction line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub id: u64,
    pub axis: Axis,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub style: Option<GuideStyle>,
    pub visible: bool,
    pub locked: bool,
    pub created_at: DateTime<Utc>,
    /// The guide this one was offset from. A reference, not ownership:
    /// deleting the parent leaves this guide in place.
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub group_id: Option<u64>,
}

impl Guide {
    pub fn new(id: u64, axis: Axis) -> Self {
        Self {
            id,
            axis,
            label: None,
            style: None,
            visible: true,
            locked: false,
            created_at: Utc::now(),
            parent_id: None,
            group_id: None,
        }
    }
}

/// A named collection of guides with cascading lock/visibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideGroup {
    pub id: u64,
    pub name: String,
    pub color: String,
    pub locked: bool,
    pub visible: bool,
}

impl GuideGroup {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: "#4a90d9".to_string(),
            locked: false,
            visible: true,
        }
    }
}

/// A discrete snap point, independent of guides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionPoint {
    pub id: u64,
    pub point: Point,
    #[serde(default)]
    pub label: Option<String>,
    pub visible: bool,
    /// Shared by all points inserted in one batch operation, so the batch
    /// can be undone atomically.
    #[serde(default)]
    pub batch_id: Option<u64>,
}
