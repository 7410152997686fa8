//! Structural node - a deduplicated point shared by element ends

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A node of the assembled model.
///
/// Nodes are created by the model build from element end points; callers
/// never construct them directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub point: Point3<f64>,
    /// Dense id 0..N-1 in creation order
    pub id: usize,
    /// Bucket indices of the point inside the model bounding box
    pub bucket: [usize; 3],
    /// Index of the support attached to this node
    pub support: Option<usize>,

    /// Displacements per load case [DX, DY, DZ, RX, RY, RZ] in m and rad
    #[serde(skip)]
    pub(crate) displacements: Vec<[f64; 6]>,
}

impl Node {
    pub(crate) fn new(point: Point3<f64>, id: usize, bucket: [usize; 3]) -> Self {
        Self {
            point,
            id,
            bucket,
            support: None,
            displacements: Vec::new(),
        }
    }

    pub fn coords(&self) -> [f64; 3] {
        [self.point.x, self.point.y, self.point.z]
    }

    pub fn distance_to(&self, p: &Point3<f64>) -> f64 {
        nalgebra::distance(&self.point, p)
    }

    /// Displacement for the load case at position `case_index`
    pub fn displacement(&self, case_index: usize) -> Option<[f64; 6]> {
        self.displacements.get(case_index).copied()
    }

    pub fn is_supported(&self) -> bool {
        self.support.is_some()
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node, {}, {},{},{}",
            self.id, self.point.x, self.point.y, self.point.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_distance() {
        let n = Node::new(Point3::new(0.0, 0.0, 0.0), 0, [0, 0, 0]);
        assert!((n.distance_to(&Point3::new(3.0, 4.0, 0.0)) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_unsolved_node_has_no_displacement() {
        let n = Node::new(Point3::new(1.0, 2.0, 3.0), 4, [1, 2, 3]);
        assert!(n.displacement(0).is_none());
        assert!(!n.is_supported());
        assert_eq!(n.coords(), [1.0, 2.0, 3.0]);
    }
}
