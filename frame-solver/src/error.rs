//! Error types for the frame solver

use thiserror::Error;

/// Main error type for frame analysis and design operations
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Invalid support code '{0}': expected six '0'/'1' characters (Tx,Ty,Tz,Rx,Ry,Rz)")]
    InvalidSupportCode(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Model is invalid: {0}")]
    InvalidModel(String),

    #[error("Singular stiffness matrix at DOF {dof} - model may be unstable or have insufficient supports")]
    SingularMatrix { dof: usize },

    #[error("Element '{0}' not found in model")]
    ElementNotFound(String),

    #[error("Load case {0} not found in model")]
    LoadCaseNotFound(i32),

    #[error("Index {index} out of range for {kind} (len {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Model not analyzed - run analyze() first")]
    NotAnalyzed,

    #[error("Section catalog is empty")]
    EmptyCatalog,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for frame operations
pub type FrameResult<T> = Result<T, FrameError>;
