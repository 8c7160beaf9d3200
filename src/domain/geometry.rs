//! Geometric primitives for text regions.

use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A bounding box represented by a collection of points.
///
/// Recognition engines report regions in whatever shape they produce;
/// axis-aligned rectangles use four corner points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// The points that define the bounding box.
    pub points: Vec<Point>,
}

impl BoundingBox {
    /// Creates a new bounding box from a vector of points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates an axis-aligned rectangular bounding box from corner
    /// coordinates.
    pub fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            points: vec![
                Point::new(x1, y1),
                Point::new(x2, y1),
                Point::new(x2, y2),
                Point::new(x1, y2),
            ],
        }
    }

    /// Returns true if the box has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
