//! Analysis options and the linear static solver

mod linear;

use serde::{Deserialize, Serialize};

use crate::math::FillOrdering;

pub use linear::{analyze_linear, Solution};

/// Options for structural analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Fill-reducing ordering used by the sparse factorization
    pub ordering: FillOrdering,
    /// Relative pivot magnitude below which the stiffness matrix is singular
    pub pivot_tolerance: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            ordering: FillOrdering::MinimumDegree,
            pivot_tolerance: 1e-11,
        }
    }
}

impl AnalysisOptions {
    /// Create options for linear analysis
    pub fn linear() -> Self {
        Self::default()
    }

    pub fn with_ordering(mut self, ordering: FillOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }
}
