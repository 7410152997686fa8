//! Load cases

use serde::{Deserialize, Serialize};

use super::Load;
use crate::error::{FrameError, FrameResult};

/// Distinct load case ids in the order they first appear in the load list.
///
/// The position of an id is the column of the global load matrix and the
/// index used for per-case results on nodes and supports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadCases {
    ids: Vec<i32>,
}

impl LoadCases {
    pub fn from_loads(loads: &[Load]) -> Self {
        let mut ids = Vec::new();
        for load in loads {
            let case = load.case();
            if !ids.contains(&case) {
                ids.push(case);
            }
        }
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[i32] {
        &self.ids
    }

    /// Column index of a load case id
    pub fn index_of(&self, case: i32) -> FrameResult<usize> {
        self.ids
            .iter()
            .position(|&c| c == case)
            .ok_or(FrameError::LoadCaseNotFound(case))
    }
}
