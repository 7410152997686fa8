//! Support conditions

use std::str::FromStr;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Restraint flags for the six nodal DOFs, `true` = restrained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Restraints {
    pub tx: bool,
    pub ty: bool,
    pub tz: bool,
    pub rx: bool,
    pub ry: bool,
    pub rz: bool,
}

impl Restraints {
    pub fn new(tx: bool, ty: bool, tz: bool, rx: bool, ry: bool, rz: bool) -> Self {
        Self {
            tx,
            ty,
            tz,
            rx,
            ry,
            rz,
        }
    }

    /// All six DOFs restrained
    pub fn fixed() -> Self {
        Self::new(true, true, true, true, true, true)
    }

    /// Translations restrained, rotations free
    pub fn pinned() -> Self {
        Self::new(true, true, true, false, false, false)
    }

    pub fn as_array(&self) -> [bool; 6] {
        [self.tx, self.ty, self.tz, self.rx, self.ry, self.rz]
    }

    /// Get list of restrained DOF indices (0-5)
    pub fn restrained_dofs(&self) -> Vec<usize> {
        self.as_array()
            .iter()
            .enumerate()
            .filter_map(|(i, &r)| r.then_some(i))
            .collect()
    }

    pub fn num_restrained(&self) -> usize {
        self.as_array().iter().filter(|&&r| r).count()
    }
}

impl FromStr for Restraints {
    type Err = FrameError;

    /// Parse a six character code such as `"111000"`, in the order
    /// Tx, Ty, Tz, Rx, Ry, Rz.
    fn from_str(code: &str) -> FrameResult<Self> {
        let chars: Vec<char> = code.chars().collect();
        if chars.len() != 6 {
            return Err(FrameError::InvalidSupportCode(code.to_string()));
        }
        let mut flags = [false; 6];
        for (flag, c) in flags.iter_mut().zip(&chars) {
            *flag = match c {
                '0' => false,
                '1' => true,
                _ => return Err(FrameError::InvalidSupportCode(code.to_string())),
            };
        }
        let [tx, ty, tz, rx, ry, rz] = flags;
        Ok(Self::new(tx, ty, tz, rx, ry, rz))
    }
}

impl std::fmt::Display for Restraints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in self.as_array() {
            write!(f, "{}", if r { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// A support placed at a point of the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Support {
    pub point: Point3<f64>,
    /// `None` when the restraint code could not be parsed
    pub conditions: Option<Restraints>,
    /// Index of the node this support is attached to
    pub node: Option<usize>,

    /// Reactions per load case [FX, FY, FZ, MX, MY, MZ] in N and Nm
    #[serde(skip)]
    pub(crate) reactions: Vec<[f64; 6]>,
}

impl Support {
    /// Support from a restraint code. A malformed code is kept as a support
    /// without conditions so the model can report it.
    pub fn new(point: Point3<f64>, code: &str) -> Self {
        Self::with_restraints(point, code.parse().ok())
    }

    pub fn with_restraints(point: Point3<f64>, conditions: Option<Restraints>) -> Self {
        Self {
            point,
            conditions,
            node: None,
            reactions: Vec::new(),
        }
    }

    pub fn fixed(point: Point3<f64>) -> Self {
        Self::with_restraints(point, Some(Restraints::fixed()))
    }

    pub fn pinned(point: Point3<f64>) -> Self {
        Self::with_restraints(point, Some(Restraints::pinned()))
    }

    pub fn is_valid(&self) -> bool {
        self.conditions.is_some()
    }

    /// Reaction for the load case at position `case_index`, in N and Nm
    pub fn reaction(&self, case_index: usize) -> Option<[f64; 6]> {
        self.reactions.get(case_index).copied()
    }
}

impl std::fmt::Display for Support {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.conditions {
            Some(r) => write!(f, "Support, {}", r),
            None => write!(f, "Support, error in support condition"),
        }
    }
}
