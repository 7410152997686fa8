//! Matrix kernels for 3D frame elements

pub mod sparse;

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

use crate::constants::NODE_TOLERANCE;
use crate::error::{FrameError, FrameResult};

pub use sparse::{
    minimum_degree_ordering, reverse_cuthill_mckee, sparse_matvec, FillOrdering,
    SparseLu, SparseMatrixBuilder,
};

pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// 12x12 matrix for member stiffness
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for member forces/displacements
pub type Vec12 = SVector<f64, 12>;

/// Rotational continuity factors of one bending plane, 1 = fixed, 0 = hinge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixity {
    pub start: f64,
    pub end: f64,
}

impl Fixity {
    pub const FIXED: Fixity = Fixity {
        start: 1.0,
        end: 1.0,
    };

    pub fn from_releases(start_released: bool, end_released: bool) -> Self {
        let f = |released: bool| if released { 0.0 } else { 1.0 };
        Self {
            start: f(start_released),
            end: f(end_released),
        }
    }
}

/// Local stiffness matrix of a 3D Euler-Bernoulli frame element
///
/// Section rigidities are SI: `ea` in N, `eiy`, `eiz`, `gj` in Nm².
/// End hinges are condensed in closed form through the fixity factors of
/// the y and z bending planes.
///
/// DOF order per end: [UX, UY, UZ, RX, RY, RZ]
#[allow(clippy::too_many_arguments)]
pub fn member_local_stiffness(
    ea: f64,
    gj: f64,
    eiy: f64,
    eiz: f64,
    length: f64,
    fy: Fixity,
    fz: Fixity,
) -> Mat12 {
    let l = length;
    let a = ea / l;
    let b = eiz / l.powi(3);
    let c = eiy / l.powi(3);
    let d = gj / l;

    let mut k = Mat12::zeros();

    // axial
    k[(0, 0)] = a;
    k[(0, 6)] = -a;
    k[(6, 0)] = -a;
    k[(6, 6)] = a;

    // torsion
    k[(3, 3)] = d;
    k[(3, 9)] = -d;
    k[(9, 3)] = -d;
    k[(9, 9)] = d;

    // bending about local z: UY, RZ
    let (zi, zj) = (fz.start, fz.end);
    let zb = 1.0 + zi + zj;
    let v = 6.0 * b * (zi + zj + 4.0 * zi * zj) / zb;
    let vi = 6.0 * l * b * zi * (1.0 + 2.0 * zj) / zb;
    let vj = 6.0 * l * b * zj * (1.0 + 2.0 * zi) / zb;
    set_bending_block(
        &mut k,
        [1, 5, 7, 11],
        v,
        vi,
        vj,
        6.0 * l * l * b * zi * (1.0 + zj) / zb,
        6.0 * l * l * b * zj * (1.0 + zi) / zb,
        6.0 * l * l * b * zi * zj / zb,
    );

    // bending about local y: UZ, RY; coupling terms change sign
    let (yi, yj) = (fy.start, fy.end);
    let yb = 1.0 + yi + yj;
    let w = 6.0 * c * (yi + yj + 4.0 * yi * yj) / yb;
    let wi = -6.0 * l * c * yi * (1.0 + 2.0 * yj) / yb;
    let wj = -6.0 * l * c * yj * (1.0 + 2.0 * yi) / yb;
    set_bending_block(
        &mut k,
        [2, 4, 8, 10],
        w,
        wi,
        wj,
        6.0 * l * l * c * yi * (1.0 + yj) / yb,
        6.0 * l * l * c * yj * (1.0 + yi) / yb,
        6.0 * l * l * c * yi * yj / yb,
    );

    k
}

/// Fill one bending plane. `dofs` = [shear i, rotation i, shear j, rotation j].
#[allow(clippy::too_many_arguments)]
fn set_bending_block(
    k: &mut Mat12,
    dofs: [usize; 4],
    shear: f64,
    coupling_i: f64,
    coupling_j: f64,
    rot_i: f64,
    rot_j: f64,
    rot_ij: f64,
) {
    let [s_i, r_i, s_j, r_j] = dofs;

    k[(s_i, s_i)] = shear;
    k[(s_j, s_j)] = shear;
    k[(s_i, s_j)] = -shear;
    k[(s_j, s_i)] = -shear;

    for (r, c) in [(s_i, r_i), (r_i, s_i)] {
        k[(r, c)] = coupling_i;
    }
    for (r, c) in [(r_i, s_j), (s_j, r_i)] {
        k[(r, c)] = -coupling_i;
    }
    for (r, c) in [(s_i, r_j), (r_j, s_i)] {
        k[(r, c)] = coupling_j;
    }
    for (r, c) in [(s_j, r_j), (r_j, s_j)] {
        k[(r, c)] = -coupling_j;
    }

    k[(r_i, r_i)] = rot_i;
    k[(r_j, r_j)] = rot_j;
    k[(r_i, r_j)] = rot_ij;
    k[(r_j, r_i)] = rot_ij;
}

/// True when a segment runs parallel to global Z within the node tolerance
pub fn is_vertical(from: &[f64; 3], to: &[f64; 3]) -> bool {
    (to[0] - from[0]).abs() < NODE_TOLERANCE && (to[1] - from[1]).abs() < NODE_TOLERANCE
}

/// Direction cosine matrix of the default (un-rolled) local triad
///
/// Rows are the local x, y, z axes in global coordinates. A vertical element
/// gets local y = (n, 0, 0) and local z = global Y; any other element gets
/// local y = Z × x and local z = x × y.
pub fn direction_cosines(from: &[f64; 3], to: &[f64; 3]) -> FrameResult<Mat3> {
    let dx = to[0] - from[0];
    let dy = to[1] - from[1];
    let dz = to[2] - from[2];
    let length = (dx * dx + dy * dy + dz * dz).sqrt();

    if length < f64::EPSILON {
        return Err(FrameError::InvalidGeometry(format!(
            "zero-length element at ({}, {}, {})",
            from[0], from[1], from[2]
        )));
    }

    let (l, m, n) = (dx / length, dy / length, dz / length);

    let r = if is_vertical(from, to) {
        Mat3::new(
            0.0, 0.0, n, //
            n, 0.0, 0.0, //
            0.0, 1.0, 0.0,
        )
    } else {
        let lm = (l * l + m * m).sqrt();
        Mat3::new(
            l, m, n, //
            -m / lm, l / lm, 0.0, //
            -l * n / lm, -m * n / lm, lm,
        )
    };

    Ok(r)
}

/// Rotation of the local y/z axes by `angle` about local x
pub fn roll_rotation(angle: f64) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::new(
        1.0, 0.0, 0.0, //
        0.0, c, s, //
        0.0, -s, c,
    )
}

/// Replicate a 3x3 rotation into the four diagonal blocks of a 12x12 matrix
pub fn expand_rotation(r: &Mat3) -> Mat12 {
    let mut t = Mat12::zeros();
    for block in 0..4 {
        t.fixed_view_mut::<3, 3>(3 * block, 3 * block).copy_from(r);
    }
    t
}

/// Signed angle from `a` to `b` about `axis`.
///
/// The magnitude is `acos` of the unit dot product (NaN maps to 0); the sign
/// follows the right-hand rule about `axis`.
pub fn signed_angle(a: &Vec3, b: &Vec3, axis: &Vec3) -> f64 {
    let (Some(a), Some(b)) = (a.try_normalize(f64::EPSILON), b.try_normalize(f64::EPSILON)) else {
        return 0.0;
    };
    let mut angle = a.dot(&b).acos();
    if angle.is_nan() {
        angle = 0.0;
    }
    if a.cross(&b).dot(axis) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Maximum relative asymmetry |K - Kᵗ| / max|K|
pub fn asymmetry(k: &Mat12) -> f64 {
    let scale = k.amax();
    if scale == 0.0 {
        return 0.0;
    }
    (k - k.transpose()).amax() / scale
}
