//! Element - 2-node 3D frame element (beam/column)

use std::sync::Arc;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::section::Section;
use crate::constants::{GRAVITY, MM2_TO_M2, MM4_TO_M4};
use crate::error::FrameResult;
use crate::geometry::{Line, LocalFrame};
use crate::math::{
    direction_cosines, expand_rotation, member_local_stiffness, roll_rotation,
    signed_angle, Fixity, Mat12, Mat3, Vec12, Vec3,
};

/// Moment releases (hinges) at the element ends, `true` = released
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndReleases {
    pub start_my: bool,
    pub start_mz: bool,
    pub end_my: bool,
    pub end_mz: bool,
}

impl EndReleases {
    /// Fully continuous element
    pub fn none() -> Self {
        Self::default()
    }

    /// Hinge at the start point about both bending axes
    pub fn pin_start() -> Self {
        Self {
            start_my: true,
            start_mz: true,
            ..Self::default()
        }
    }

    /// Hinge at the end point about both bending axes
    pub fn pin_end() -> Self {
        Self {
            end_my: true,
            end_mz: true,
            ..Self::default()
        }
    }

    /// Hinges at both ends
    pub fn pin_both() -> Self {
        Self {
            start_my: true,
            start_mz: true,
            end_my: true,
            end_mz: true,
        }
    }

    pub fn fixity_y(&self) -> Fixity {
        Fixity::from_releases(self.start_my, self.end_my)
    }

    pub fn fixity_z(&self) -> Fixity {
        Fixity::from_releases(self.start_mz, self.end_mz)
    }
}

/// A 3D frame element between two points.
///
/// Geometry, section, releases and orientation are the inputs; the local
/// frame, matrices and weight are derived and rebuilt from scratch by every
/// builder method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub line: Line,
    pub tag: String,
    pub section: Arc<Section>,
    /// Reference vector for local z, projected normal to the element axis
    pub local_z: Option<Vector3<f64>>,
    pub releases: EndReleases,
    /// Effective buckling length in m; the element length until assigned
    pub buckling_length: f64,

    /// Dense id in model order
    pub(crate) id: Option<usize>,
    /// Start and end node indices, set by the model build
    pub(crate) nodes: Option<[usize; 2]>,

    /// Roll angle about local x in radians
    pub(crate) beta: f64,
    pub(crate) frame: LocalFrame,
    pub(crate) k_local: Mat12,
    pub(crate) transform: Mat12,
    pub(crate) k_global: Mat12,
    /// Self weight in kg
    pub(crate) weight: f64,
}

impl Element {
    /// Create an element along `line`; a zero-length line is rejected.
    pub fn new(
        line: Line,
        tag: impl Into<String>,
        section: Arc<Section>,
        local_z: Option<Vector3<f64>>,
    ) -> FrameResult<Self> {
        let mut elem = Self {
            buckling_length: line.length(),
            line,
            tag: tag.into(),
            section,
            local_z,
            releases: EndReleases::none(),
            id: None,
            nodes: None,
            beta: 0.0,
            frame: LocalFrame {
                origin: line.from,
                x: Vector3::x(),
                y: Vector3::y(),
                z: Vector3::z(),
            },
            k_local: Mat12::zeros(),
            transform: Mat12::identity(),
            k_global: Mat12::zeros(),
            weight: 0.0,
        };
        elem.rebuild()?;
        Ok(elem)
    }

    /// Same element with new end releases
    pub fn with_releases(mut self, releases: EndReleases) -> FrameResult<Self> {
        self.releases = releases;
        self.rebuild()?;
        Ok(self)
    }

    /// Same element with another section
    pub fn with_section(mut self, section: Arc<Section>) -> FrameResult<Self> {
        self.section = section;
        self.rebuild()?;
        Ok(self)
    }

    pub fn with_buckling_length(mut self, length: f64) -> Self {
        self.buckling_length = length;
        self
    }

    /// Recompute orientation, matrices and weight from the inputs
    fn rebuild(&mut self) -> FrameResult<()> {
        let from = self.line.from.coords.into();
        let to = self.line.to.coords.into();
        let base = direction_cosines(&from, &to)?;

        self.beta = roll_angle(&base, self.local_z.as_ref()) + self.section.theta;

        let r = roll_rotation(self.beta) * base;
        self.frame = LocalFrame {
            origin: self.line.from,
            x: r.row(0).transpose(),
            y: r.row(1).transpose(),
            z: r.row(2).transpose(),
        };

        self.k_local = self.local_stiffness();
        self.transform = expand_rotation(&r);
        self.k_global = self.transform.transpose() * self.k_local * self.transform;
        // kN -> kg
        let area = self.section.props.a * MM2_TO_M2;
        self.weight = self.line.length() * area * self.section.material.gamma * 1000.0 / GRAVITY;
        Ok(())
    }

    fn local_stiffness(&self) -> Mat12 {
        let props = &self.section.props;
        let mat = &self.section.material;

        // MPa * mm² = N; MPa * mm⁴ = 1e-6 Nm²
        let to_nm2 = 1e6 * MM4_TO_M4;
        member_local_stiffness(
            mat.e * props.a,
            mat.g * props.j * to_nm2,
            mat.e * props.iy * to_nm2,
            mat.e * props.iz * to_nm2,
            self.line.length(),
            self.releases.fixity_y(),
            self.releases.fixity_z(),
        )
    }

    pub fn id(&self) -> Option<usize> {
        self.id
    }

    /// Start and end node indices once the element belongs to a model
    pub fn nodes(&self) -> Option<[usize; 2]> {
        self.nodes
    }

    pub fn length(&self) -> f64 {
        self.line.length()
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn local_frame(&self) -> &LocalFrame {
        &self.frame
    }

    /// Local stiffness matrix in N/m, N, Nm units
    pub fn local_stiffness_matrix(&self) -> &Mat12 {
        &self.k_local
    }

    pub fn transformation_matrix(&self) -> &Mat12 {
        &self.transform
    }

    /// Global-oriented stiffness `Tᵗ K T`
    pub fn global_stiffness_matrix(&self) -> &Mat12 {
        &self.k_global
    }

    /// Self weight in kg
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Local end forces `K T U` from the global displacements of both ends.
    ///
    /// Returns [N, Vy, Vz, T, My, Mz] at the start followed by the end, in N
    /// and Nm, acting on the element.
    pub fn end_forces(&self, d_start: &[f64; 6], d_end: &[f64; 6]) -> [f64; 12] {
        let u = Vec12::from_iterator(d_start.iter().chain(d_end).copied());
        let f = self.k_local * (self.transform * u);
        f.into()
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Element, {}, {}", self.tag, self.section.tag)
    }
}

/// Roll of the actual local z (reference projected normal to x) away from the
/// default local z. A missing, zero or axis-parallel reference keeps the
/// default orientation.
fn roll_angle(base: &Mat3, reference: Option<&Vector3<f64>>) -> f64 {
    let x: Vec3 = base.row(0).transpose();
    let z0: Vec3 = base.row(2).transpose();

    let Some(v) = reference.filter(|v| v.iter().all(|c| c.is_finite())) else {
        return 0.0;
    };
    let projected = v - x * v.dot(&x);
    if projected.norm() <= 1e-12 * v.norm().max(f64::MIN_POSITIVE) {
        return 0.0;
    }
    signed_angle(&z0, &projected, &x)
}
