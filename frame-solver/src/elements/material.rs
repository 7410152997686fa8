//! Material properties

use serde::{Deserialize, Serialize};

use crate::constants::GRAVITY;

/// Linear elastic material in the engineering units of the modelling host.
///
/// Moduli and yield strength are in MPa (N/mm²), unit weight in kN/m³.
/// A material never changes once built; sections share it through an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub tag: String,
    /// Modulus of elasticity in MPa
    pub e: f64,
    /// Shear modulus in MPa
    pub g: f64,
    /// Unit weight in kN/m³
    pub gamma: f64,
    /// Coefficient of linear thermal expansion in 1/K
    pub alpha: f64,
    /// Yield strength in MPa
    pub fy: f64,
}

impl Material {
    pub fn new(tag: impl Into<String>, e: f64, g: f64, gamma: f64, alpha: f64, fy: f64) -> Self {
        Self {
            tag: tag.into(),
            e,
            g,
            gamma,
            alpha,
            fy,
        }
    }

    /// Structural steel with the given yield strength in MPa
    pub fn steel(tag: impl Into<String>, fy: f64) -> Self {
        Self::new(tag, 210_000.0, 81_000.0, 78.5, 1.2e-5, fy)
    }

    /// EN 10025 S235
    pub fn s235() -> Self {
        Self::steel("S235", 235.0)
    }

    /// EN 10025 S355
    pub fn s355() -> Self {
        Self::steel("S355", 355.0)
    }

    /// Mass density in kg/m³ derived from the unit weight
    pub fn density(&self) -> f64 {
        self.gamma * 1000.0 / GRAVITY
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::s235()
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Material, {}", self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_steel_presets() {
        let s = Material::s355();
        assert_eq!(s.tag, "S355");
        assert_eq!(s.fy, 355.0);
        assert_eq!(s.e, 210_000.0);
    }

    #[test]
    fn test_density_from_unit_weight() {
        let s = Material::s235();
        assert_relative_eq!(s.density(), 78.5 * 1000.0 / 9.81, epsilon = 1e-9);
    }

    #[test]
    fn test_display() {
        assert_eq!(Material::s235().to_string(), "Material, S235");
    }
}
