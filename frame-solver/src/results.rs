//! Result types for frame analysis

use serde::{Deserialize, Serialize};

use crate::constants::KN_TO_N;

/// Displacement results at a node, in m and rad
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, DZ, RX, RY, RZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
            dz: arr[2],
            rx: arr[3],
            ry: arr[4],
            rz: arr[5],
        }
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }

    /// Get rotation magnitude
    pub fn rotation_magnitude(&self) -> f64 {
        (self.rx.powi(2) + self.ry.powi(2) + self.rz.powi(2)).sqrt()
    }
}

/// Support reactions in kN and kNm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
    pub mx: f64,
    pub my: f64,
    pub mz: f64,
}

impl Reactions {
    /// Create from an internal [FX, FY, FZ, MX, MY, MZ] array in N and Nm
    pub fn from_si(arr: [f64; 6]) -> Self {
        Self {
            fx: arr[0] / KN_TO_N,
            fy: arr[1] / KN_TO_N,
            fz: arr[2] / KN_TO_N,
            mx: arr[3] / KN_TO_N,
            my: arr[4] / KN_TO_N,
            mz: arr[5] / KN_TO_N,
        }
    }

    pub fn force_magnitude(&self) -> f64 {
        (self.fx.powi(2) + self.fy.powi(2) + self.fz.powi(2)).sqrt()
    }

    pub fn moment_magnitude(&self) -> f64 {
        (self.mx.powi(2) + self.my.powi(2) + self.mz.powi(2)).sqrt()
    }
}

/// Sectional forces at one element end, in kN and kNm.
///
/// Axial force is positive in tension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementForces {
    pub n: f64,
    pub vy: f64,
    pub vz: f64,
    pub mx: f64,
    pub my: f64,
    pub mz: f64,
}

impl ElementForces {
    /// Sectional forces at the start from local end forces in N and Nm
    pub fn from_start(forces: &[f64; 12]) -> Self {
        Self {
            n: -forces[0] / KN_TO_N,
            vy: -forces[1] / KN_TO_N,
            vz: -forces[2] / KN_TO_N,
            mx: -forces[3] / KN_TO_N,
            my: -forces[4] / KN_TO_N,
            mz: -forces[5] / KN_TO_N,
        }
    }

    /// Sectional forces at the end from local end forces in N and Nm
    pub fn from_end(forces: &[f64; 12]) -> Self {
        Self {
            n: forces[6] / KN_TO_N,
            vy: forces[7] / KN_TO_N,
            vz: forces[8] / KN_TO_N,
            mx: forces[9] / KN_TO_N,
            my: forces[10] / KN_TO_N,
            mz: forces[11] / KN_TO_N,
        }
    }
}

/// Sectional forces at both ends of an element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementEndForces {
    pub start: ElementForces,
    pub end: ElementForces,
}

impl ElementEndForces {
    pub fn from_local(forces: &[f64; 12]) -> Self {
        Self {
            start: ElementForces::from_start(forces),
            end: ElementForces::from_end(forces),
        }
    }

    /// Larger absolute axial force of the two ends
    pub fn max_axial(&self) -> f64 {
        self.start.n.abs().max(self.end.n.abs())
    }

    /// Larger absolute bending moment of the two ends
    pub fn max_moment(&self) -> f64 {
        [self.start.my, self.start.mz, self.end.my, self.end.mz]
            .iter()
            .fold(0.0_f64, |m, v| m.max(v.abs()))
    }
}

/// Summary of one load case
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub load_case: i32,
    /// Maximum translation in m
    pub max_displacement: f64,
    pub max_disp_node: usize,
    /// Maximum reaction force in kN
    pub max_reaction: f64,
    pub max_reaction_support: usize,
    /// Maximum element axial force in kN
    pub max_axial: f64,
    pub max_axial_element: String,
    /// Maximum element bending moment in kNm
    pub max_moment: f64,
    pub max_moment_element: String,
    pub num_nodes: usize,
    pub num_elements: usize,
    pub num_supports: usize,
    pub num_load_cases: usize,
    pub total_dofs: usize,
    pub free_dofs: usize,
    /// Total self weight in kg
    pub weight: f64,
}
