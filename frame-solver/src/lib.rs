//! Frame Solver - linear static analysis of 3D beam frames
//!
//! Two-node, six-DOF-per-node Euler-Bernoulli elements with end releases,
//! assembled into a sparse global system and solved for any number of load
//! cases. On top of the analysis:
//! - effective buckling lengths from the element connectivity
//! - Eurocode 3 cross-section and member buckling utilization
//! - iterative section sizing against an ordered catalog
//!
//! Units at the API: geometry in m, section dimensions in mm, E/G/Fy in MPa,
//! unit weight in kN/m³, loads in kN and kNm.
//!
//! ## Example
//! ```rust
//! use frame_solver::prelude::*;
//! use nalgebra::{Point3, Vector3};
//! use std::sync::Arc;
//!
//! let steel = Arc::new(Material::s235());
//! let section = Arc::new(Section::i_section("IPE200", steel, 200.0, 100.0, 5.6, 8.5));
//!
//! let beam = Element::new(
//!     Line::from_coords([0.0, 0.0, 0.0], [4.0, 0.0, 0.0]),
//!     "beam",
//!     section,
//!     None,
//! )
//! .unwrap();
//!
//! let model = Model::new(
//!     vec![beam],
//!     vec![Support::new(Point3::new(0.0, 0.0, 0.0), "111111")],
//!     vec![PointLoad::force(Point3::new(4.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -5.0), 1).into()],
//! );
//!
//! let solved = model.analyze(&AnalysisOptions::default()).unwrap();
//! let tip = solved.node_displacement(1, 1).unwrap();
//! assert!(tip.dz < 0.0);
//! ```

pub mod analysis;
pub mod constants;
pub mod design;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod loads;
pub mod math;
pub mod model;
pub mod registry;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisOptions, Solution};
    pub use crate::design::{
        apply_buckling_lengths, buckling_lengths, utilizations, DesignOptions, MemberCheck,
        OptimizationReport, SectionOptimizer,
    };
    pub use crate::elements::{
        Element, EndReleases, Material, Node, Restraints, Section, SectionShape, Support,
    };
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::geometry::{BoundingBox, Line, LocalFrame};
    pub use crate::loads::{Load, LoadCases, PointLoad};
    pub use crate::math::FillOrdering;
    pub use crate::model::{Model, ValidationIssue};
    pub use crate::results::{
        AnalysisSummary, ElementEndForces, ElementForces, NodeDisplacement, Reactions,
    };
}
