//! Fixed numerical constants shared across the solver.

/// Standard gravity in m/s², used to turn kN weights into kg.
pub const GRAVITY: f64 = 9.81;

/// Distance below which two points are the same structural node (m).
pub const NODE_TOLERANCE: f64 = 0.001;

/// Number of bucket cells per bounding-box axis for node lookup.
pub const BBOX_SEGMENTS: usize = 100;

/// Degrees of freedom per node: Tx, Ty, Tz, Rx, Ry, Rz.
pub const DOF_PER_NODE: usize = 6;

/// Millimetre-based section quantities to SI.
pub const MM_TO_M: f64 = 1e-3;
pub const MM2_TO_M2: f64 = 1e-6;
pub const MM4_TO_M4: f64 = 1e-12;

/// kN / kNm at the host boundary to N / Nm internally.
pub const KN_TO_N: f64 = 1e3;
