//! Cross-section families and their geometric properties
//!
//! All dimensions and properties are kept in millimetre units (mm, mm², mm³,
//! mm⁴). Conversion to SI happens only where the stiffness matrix is built.

use std::f64::consts::PI;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::material::Material;

/// Geometry of a cross-section family, dimensions in mm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SectionShape {
    Rectangular { b: f64, h: f64 },
    Circular { d: f64 },
    I { h: f64, w: f64, tw: f64, tf: f64 },
    Rhs { h: f64, w: f64, tw: f64, tf: f64 },
    Chs { d: f64, t: f64 },
}

impl SectionShape {
    /// Short family name
    pub fn kind(&self) -> &'static str {
        match self {
            SectionShape::Rectangular { .. } => "Rectangular",
            SectionShape::Circular { .. } => "Circular",
            SectionShape::I { .. } => "I",
            SectionShape::Rhs { .. } => "RHS",
            SectionShape::Chs { .. } => "CHS",
        }
    }

    /// Closed-form properties for this family
    pub fn properties(&self) -> SectionProperties {
        match *self {
            SectionShape::Rectangular { b, h } => rectangular(b, h),
            SectionShape::Circular { d } => circular(d),
            SectionShape::I { h, w, tw, tf } => i_section(h, w, tw, tf),
            SectionShape::Rhs { h, w, tw, tf } => rhs(h, w, tw, tf),
            SectionShape::Chs { d, t } => chs(d, t),
        }
    }
}

/// Section property record in mm units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionProperties {
    /// Area in mm²
    pub a: f64,
    /// Second moment of area about local y in mm⁴
    pub iy: f64,
    /// Second moment of area about local z in mm⁴
    pub iz: f64,
    /// Torsional constant in mm⁴
    pub j: f64,
    /// Elastic section moduli in mm³
    pub wy: f64,
    pub wz: f64,
    /// Plastic section moduli in mm³
    pub wpy: f64,
    pub wpz: f64,
}

fn rectangular(b: f64, h: f64) -> SectionProperties {
    let iy = b * h.powi(3) / 12.0;
    let iz = h * b.powi(3) / 12.0;
    // a, b are the half lengths of the longer and shorter side
    let ha = 0.5 * b.max(h);
    let hb = 0.5 * b.min(h);
    let j = ha
        * hb.powi(3)
        * (16.0 / 3.0 - 3.36 * hb / ha * (1.0 - hb.powi(4) / (12.0 * ha.powi(4))));

    SectionProperties {
        a: b * h,
        iy,
        iz,
        j,
        wy: iy / (0.5 * h),
        wz: iz / (0.5 * b),
        wpy: b * h * h / 4.0,
        wpz: h * b * b / 4.0,
    }
}

fn circular(d: f64) -> SectionProperties {
    let i = PI / 64.0 * d.powi(4);
    let w = i / (0.5 * d);
    let wp = d.powi(3) / 6.0;

    SectionProperties {
        a: 0.25 * PI * d * d,
        iy: i,
        iz: i,
        j: PI / 32.0 * d.powi(4),
        wy: w,
        wz: w,
        wpy: wp,
        wpz: wp,
    }
}

fn i_section(h: f64, w: f64, tw: f64, tf: f64) -> SectionProperties {
    let hw = h - 2.0 * tf;
    let iy = (w * h.powi(3) - (w - tw) * hw.powi(3)) / 12.0;
    let iz = (2.0 * tf * w.powi(3) + hw * tw.powi(3)) / 12.0;

    SectionProperties {
        a: w * h - (w - tw) * hw,
        iy,
        iz,
        j: (2.0 * w * tf.powi(3) + hw * tw.powi(3)) / 3.0,
        wy: iy / (0.5 * h),
        wz: iz / (0.5 * w),
        wpy: w * tf * (h - tf) + tw * hw * hw / 4.0,
        wpz: tf * w * w / 2.0 + hw * tw * tw / 4.0,
    }
}

fn rhs(h: f64, w: f64, tw: f64, tf: f64) -> SectionProperties {
    let hi = h - 2.0 * tf;
    let wi = w - 2.0 * tw;
    let iy = (w * h.powi(3) - wi * hi.powi(3)) / 12.0;
    let iz = (h * w.powi(3) - hi * wi.powi(3)) / 12.0;
    // Bredt's thin-walled closed section
    let j = 2.0 * ((w - tw) * (h - tf)).powi(2) / ((w - tw) / tf + (h - tf) / tw);

    SectionProperties {
        a: w * h - wi * hi,
        iy,
        iz,
        j,
        wy: iy / (0.5 * h),
        wz: iz / (0.5 * w),
        wpy: (w * h * h - wi * hi * hi) / 4.0,
        wpz: (h * w * w - hi * wi * wi) / 4.0,
    }
}

fn chs(d: f64, t: f64) -> SectionProperties {
    let di = d - 2.0 * t;
    let i = PI / 64.0 * (d.powi(4) - di.powi(4));
    let w = i / (0.5 * d);
    let wp = (d.powi(3) - di.powi(3)) / 6.0;

    SectionProperties {
        a: 0.25 * PI * (d * d - di * di),
        iy: i,
        iz: i,
        j: PI / 32.0 * (d.powi(4) - di.powi(4)),
        wy: w,
        wz: w,
        wpy: wp,
        wpz: wp,
    }
}

/// A named cross-section bound to a shared material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub tag: String,
    pub material: Arc<Material>,
    pub shape: SectionShape,
    pub props: SectionProperties,
    /// Extra roll of the section about the element axis in radians
    pub theta: f64,
}

impl Section {
    pub fn new(tag: impl Into<String>, material: Arc<Material>, shape: SectionShape) -> Self {
        Self {
            tag: tag.into(),
            material,
            props: shape.properties(),
            shape,
            theta: 0.0,
        }
    }

    /// Solid rectangle, width `b` along local y and height `h` along local z
    pub fn rectangular(tag: impl Into<String>, material: Arc<Material>, b: f64, h: f64) -> Self {
        Self::new(tag, material, SectionShape::Rectangular { b, h })
    }

    pub fn circular(tag: impl Into<String>, material: Arc<Material>, d: f64) -> Self {
        Self::new(tag, material, SectionShape::Circular { d })
    }

    /// Doubly symmetric I: height, flange width, web and flange thickness
    pub fn i_section(
        tag: impl Into<String>,
        material: Arc<Material>,
        h: f64,
        w: f64,
        tw: f64,
        tf: f64,
    ) -> Self {
        Self::new(tag, material, SectionShape::I { h, w, tw, tf })
    }

    /// Rectangular hollow section
    pub fn rhs(
        tag: impl Into<String>,
        material: Arc<Material>,
        h: f64,
        w: f64,
        tw: f64,
        tf: f64,
    ) -> Self {
        Self::new(tag, material, SectionShape::Rhs { h, w, tw, tf })
    }

    /// Circular hollow section
    pub fn chs(tag: impl Into<String>, material: Arc<Material>, d: f64, t: f64) -> Self {
        Self::new(tag, material, SectionShape::Chs { d, t })
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Radius of gyration about local y in mm
    pub fn iy_radius(&self) -> f64 {
        (self.props.iy / self.props.a).sqrt()
    }

    /// Radius of gyration about local z in mm
    pub fn iz_radius(&self) -> f64 {
        (self.props.iz / self.props.a).sqrt()
    }

    /// Family name followed by the defining dimensions
    pub fn dims(&self) -> String {
        match self.shape {
            SectionShape::Rectangular { b, h } => format!("Rectangular, {b}, {h}"),
            SectionShape::Circular { d } => format!("Circular, {d}"),
            SectionShape::I { h, w, tw, tf } => format!("I, {h}, {w}, {tw}, {tf}"),
            SectionShape::Rhs { h, w, tw, tf } => format!("RHS, {h}, {w}, {tw}, {tf}"),
            SectionShape::Chs { d, t } => format!("CHS, {d}, {t}"),
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cross-Section, {}, {}, {}",
            self.shape.kind(),
            self.tag,
            self.material.tag
        )
    }
}
