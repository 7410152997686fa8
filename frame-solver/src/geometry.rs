//! Plain geometric primitives exchanged with the modelling host.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A straight segment between two points, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub from: Point3<f64>,
    pub to: Point3<f64>,
}

impl Line {
    pub fn new(from: Point3<f64>, to: Point3<f64>) -> Self {
        Self { from, to }
    }

    /// Build a line from raw coordinate triples
    pub fn from_coords(from: [f64; 3], to: [f64; 3]) -> Self {
        Self::new(Point3::from(from), Point3::from(to))
    }

    pub fn direction(&self) -> Vector3<f64> {
        self.to - self.from
    }

    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    /// Unit tangent from `from` to `to`; `None` for a zero-length line
    pub fn unit_tangent(&self) -> Option<Vector3<f64>> {
        self.direction().try_normalize(f64::EPSILON)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// Box enclosing every point; `None` when the iterator is empty
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bb = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bb.union(p);
        }
        Some(bb)
    }

    /// Grow the box to include `p`
    pub fn union(&mut self, p: &Point3<f64>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn extent(&self) -> Vector3<f64> {
        self.max - self.min
    }
}

/// An orthonormal local frame attached to an element start point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalFrame {
    pub origin: Point3<f64>,
    pub x: Vector3<f64>,
    pub y: Vector3<f64>,
    pub z: Vector3<f64>,
}
