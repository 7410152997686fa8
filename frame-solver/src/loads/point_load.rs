//! Concentrated nodal loads

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A force and moment applied at a point, in global axes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointLoad {
    pub point: Point3<f64>,
    /// [FX, FY, FZ] in kN followed by [MX, MY, MZ] in kNm
    pub values: [f64; 6],
    /// Load case id
    pub case: i32,
    /// Index of the node the load is attached to
    pub node: Option<usize>,
}

impl PointLoad {
    /// Create a point load from a force vector (kN) and a moment vector (kNm)
    pub fn new(point: Point3<f64>, force: Vector3<f64>, moment: Vector3<f64>, case: i32) -> Self {
        Self {
            point,
            values: [force.x, force.y, force.z, moment.x, moment.y, moment.z],
            case,
            node: None,
        }
    }

    /// Pure force
    pub fn force(point: Point3<f64>, force: Vector3<f64>, case: i32) -> Self {
        Self::new(point, force, Vector3::zeros(), case)
    }

    /// Pure moment
    pub fn moment(point: Point3<f64>, moment: Vector3<f64>, case: i32) -> Self {
        Self::new(point, Vector3::zeros(), moment, case)
    }
}

/// Loads understood by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Load {
    Point(PointLoad),
}

impl Load {
    pub fn case(&self) -> i32 {
        match self {
            Load::Point(p) => p.case,
        }
    }
}

impl From<PointLoad> for Load {
    fn from(p: PointLoad) -> Self {
        Load::Point(p)
    }
}

impl std::fmt::Display for Load {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Load::Point(p) => write!(
                f,
                "Point Load at {},{},{} (LC {})",
                p.point.x, p.point.y, p.point.z, p.case
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_load_components() {
        let p = PointLoad::new(
            Point3::origin(),
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
            2,
        );
        assert_eq!(p.values, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let load: Load = p.into();
        assert_eq!(load.case(), 2);
        match load {
            Load::Point(q) => assert_eq!(q.values[5], 6.0),
        }
    }
}
