//! Load types and load cases

mod load_case;
mod point_load;

pub use load_case::LoadCases;
pub use point_load::{Load, PointLoad};
