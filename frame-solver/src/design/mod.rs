//! Member design: buckling lengths, Eurocode 3 checks and section sizing

mod buckling;
mod ec3;
mod optimizer;

use serde::{Deserialize, Serialize};

pub use buckling::{apply_buckling_lengths, buckling_lengths};
pub use ec3::{check_member, governing_utilization, member_checks, utilizations, MemberCheck};
pub use optimizer::{OptimizationReport, SectionOptimizer};

/// Partial safety factors for the Eurocode 3 checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignOptions {
    /// Cross-section resistance
    pub gamma_m0: f64,
    /// Member buckling resistance
    pub gamma_m1: f64,
}

impl Default for DesignOptions {
    fn default() -> Self {
        Self {
            gamma_m0: 1.0,
            gamma_m1: 1.0,
        }
    }
}

impl DesignOptions {
    pub fn new(gamma_m0: f64, gamma_m1: f64) -> Self {
        Self { gamma_m0, gamma_m1 }
    }
}
