//! Eurocode 3 cross-section and member buckling checks
//!
//! Forces come from the local end force vector in N and Nm; section
//! properties stay in mm so resistances are formed in N and Nmm and moments
//! are scaled by 1e-3 to Nm.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::DesignOptions;
use crate::constants::MM_TO_M;
use crate::elements::Element;
use crate::error::{FrameError, FrameResult};
use crate::model::Model;

const C_MY: f64 = 0.9;
const C_MZ: f64 = 0.9;
const CHI_LT: f64 = 1.0;

/// Utilization of one member for one load case
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberCheck {
    /// Both ends carry tension or no axial force
    pub tension: bool,
    /// Linear cross-section interaction
    pub cross_section: f64,
    /// Interaction formula 6.61 (buckling about y)
    pub eq_6_61: f64,
    /// Interaction formula 6.62 (buckling about z)
    pub eq_6_62: f64,
    pub chi_y: f64,
    pub chi_z: f64,
}

impl MemberCheck {
    /// Governing value for this load case
    pub fn utilization(&self) -> f64 {
        if self.tension {
            self.cross_section
        } else {
            self.cross_section.max(self.eq_6_61).max(self.eq_6_62)
        }
    }
}

/// Imperfection factor for flexural buckling
fn imperfection(fy: f64) -> f64 {
    if fy < 460.0 {
        0.21
    } else {
        0.13
    }
}

/// Flexural buckling reduction factor for a non-dimensional slenderness
fn reduction_factor(slenderness: f64, alpha: f64) -> f64 {
    let phi = 0.5 * (1.0 + alpha * (slenderness - 0.2) + slenderness * slenderness);
    let chi = 1.0 / (phi + (phi * phi - slenderness * slenderness).sqrt());
    chi.min(1.0)
}

/// Check one element against its local end forces `[F0..F11]`
pub fn check_member(element: &Element, forces: &[f64; 12], options: &DesignOptions) -> MemberCheck {
    let section = &element.section;
    let props = &section.props;
    let fy = section.material.fy;
    let e = section.material.e;

    let n_ed = forces[0].abs().max(forces[6].abs());
    let my_ed = forces[4].abs().max(forces[10].abs());
    let mz_ed = forces[5].abs().max(forces[11].abs());

    // design resistances, N and Nm
    let n_rd = props.a * fy / options.gamma_m0;
    let my_rd = props.wy * fy / options.gamma_m0 * 1e-3;
    let mz_rd = props.wz * fy / options.gamma_m0 * 1e-3;
    let cross_section = n_ed / n_rd + my_ed / my_rd + mz_ed / mz_rd;

    // characteristic resistances
    let n_rk = props.a * fy;
    let my_rk = props.wpy * fy * 1e-3;
    let mz_rk = props.wpz * fy * 1e-3;

    let l_cr = element.buckling_length / MM_TO_M;
    // slenderness about y uses i_y and about z uses i_z, never crossed
    let lambda_1 = PI * (e / fy).sqrt();
    let slender_y = l_cr / (section.iy_radius() * lambda_1);
    let slender_z = l_cr / (section.iz_radius() * lambda_1);

    let alpha = imperfection(fy);
    let chi_y = reduction_factor(slender_y, alpha);
    let chi_z = reduction_factor(slender_z, alpha);

    let n_y = n_ed / (chi_y * n_rk / options.gamma_m1);
    let n_z = n_ed / (chi_z * n_rk / options.gamma_m1);
    let k_yy = (C_MY * (1.0 + (slender_y - 0.2) * n_y)).min(C_MY * (1.0 + 0.8 * n_y));
    let k_zz = (C_MZ * (1.0 + (slender_z - 0.2) * n_z)).min(C_MZ * (1.0 + 0.8 * n_z));
    let k_yz = 0.6 * k_zz;
    let k_zy = 0.6 * k_yy;

    let my_term = my_ed / (CHI_LT * my_rk / options.gamma_m1);
    let mz_term = mz_ed / (mz_rk / options.gamma_m1);

    MemberCheck {
        tension: -forces[0] >= 0.0 && forces[6] >= 0.0,
        cross_section,
        eq_6_61: n_y + k_yy * my_term + k_yz * mz_term,
        eq_6_62: n_z + k_zy * my_term + k_zz * mz_term,
        chi_y,
        chi_z,
    }
}

/// Checks of one element for every load case of a solved model
pub fn member_checks(
    model: &Model,
    element: usize,
    options: &DesignOptions,
) -> FrameResult<Vec<MemberCheck>> {
    (0..model.load_cases().len())
        .map(|lc| {
            let forces = model.end_forces_by_index(element, lc)?;
            Ok(check_member(&model.elements[element], &forces, options))
        })
        .collect()
}

/// Largest utilization of one element over all load cases
pub fn governing_utilization(
    model: &Model,
    element: usize,
    options: &DesignOptions,
) -> FrameResult<f64> {
    if !model.is_analyzed() {
        return Err(FrameError::NotAnalyzed);
    }
    if element >= model.elements.len() {
        return Err(FrameError::IndexOutOfRange {
            kind: "element",
            index: element,
            len: model.elements.len(),
        });
    }
    Ok(member_checks(model, element, options)?
        .iter()
        .map(MemberCheck::utilization)
        .fold(0.0, f64::max))
}

/// Governing utilization of every element, in element order
pub fn utilizations(model: &Model, options: &DesignOptions) -> FrameResult<Vec<f64>> {
    (0..model.elements.len())
        .map(|i| governing_utilization(model, i, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Section};
    use crate::geometry::Line;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn column(length: f64) -> Element {
        let section = Arc::new(Section::i_section(
            "IPE200",
            Arc::new(Material::s235()),
            200.0,
            100.0,
            5.6,
            8.5,
        ));
        Element::new(Line::from_coords([0.0; 3], [0.0, 0.0, length]), "C", section, None).unwrap()
    }

    fn axial(n: f64) -> [f64; 12] {
        // tension positive: start pulled back, end pulled forward
        let mut f = [0.0; 12];
        f[0] = -n;
        f[6] = n;
        f
    }

    #[test]
    fn test_pure_tension_is_cross_section_only() {
        let elem = column(3.0);
        let n = 200.0e3;
        let check = check_member(&elem, &axial(n), &DesignOptions::default());
        assert!(check.tension);
        let a = elem.section.props.a;
        assert_relative_eq!(check.utilization(), n / (a * 235.0), max_relative = 1e-12);
    }

    #[test]
    fn test_compression_uses_buckling() {
        let elem = column(3.0);
        let check = check_member(&elem, &axial(-200.0e3), &DesignOptions::default());
        assert!(!check.tension);
        assert!(check.chi_z < check.chi_y);
        assert!(check.chi_y <= 1.0);
        assert!(check.utilization() > check.cross_section);
        assert_relative_eq!(check.utilization(), check.eq_6_62);
    }

    #[test]
    fn test_stocky_member_has_no_reduction() {
        let elem = column(0.1);
        let check = check_member(&elem, &axial(-10.0e3), &DesignOptions::default());
        assert_relative_eq!(check.chi_y, 1.0);
        assert_relative_eq!(check.chi_z, 1.0);
    }

    #[test]
    fn test_reduction_factor_reference_values() {
        // curve a (alpha 0.21) at slenderness 1.0
        assert_relative_eq!(reduction_factor(1.0, 0.21), 0.6656, epsilon = 1e-3);
        assert_relative_eq!(reduction_factor(0.2, 0.21), 1.0, epsilon = 1e-12);
        assert_relative_eq!(imperfection(460.0), 0.13);
    }

    #[test]
    fn test_combined_interaction_values() {
        // IPE200 S235, 3 m: 100 kN compression, My 10 kNm, Mz 2 kNm
        let elem = column(3.0);
        let mut f = axial(-100.0e3);
        f[4] = 10.0e3;
        f[10] = -8.0e3;
        f[5] = 2.0e3;
        let check = check_member(&elem, &f, &DesignOptions::default());

        assert!(!check.tension);
        assert_relative_eq!(check.chi_y, 0.955879, max_relative = 1e-5);
        assert_relative_eq!(check.chi_z, 0.418072, max_relative = 1e-5);
        assert_relative_eq!(check.cross_section, 0.686546, max_relative = 1e-5);
        assert_relative_eq!(check.eq_6_61, 0.487524, max_relative = 1e-5);
        assert_relative_eq!(check.eq_6_62, 0.712957, max_relative = 1e-5);
        assert_relative_eq!(check.utilization(), check.eq_6_62);
    }

    #[test]
    fn test_partial_factor_scales_cross_section() {
        let elem = column(3.0);
        let f = axial(100.0e3);
        let base = check_member(&elem, &f, &DesignOptions::default());
        let factored = check_member(&elem, &f, &DesignOptions::new(1.1, 1.0));
        assert_relative_eq!(factored.cross_section, 1.1 * base.cross_section, max_relative = 1e-12);
    }
}
