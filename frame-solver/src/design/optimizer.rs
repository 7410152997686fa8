//! Iterative cross-section sizing against a catalog

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;

use super::{apply_buckling_lengths, governing_utilization, DesignOptions};
use crate::analysis::AnalysisOptions;
use crate::elements::{Section, SectionShape};
use crate::error::{FrameError, FrameResult};
use crate::model::Model;

/// Outcome of a sizing run
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationReport {
    /// Solved model carrying the final sections
    pub model: Model,
    /// Catalog entry per element, `None` for elements left untouched
    pub catalog_indices: Vec<Option<usize>>,
    /// Final governing utilization per sized element
    pub utilizations: Vec<Option<f64>>,
    /// Number of upsizing rounds performed
    pub iterations: usize,
    /// Total self weight in kg
    pub weight: f64,
    /// Every sized element has a utilization of at most 1.0
    pub converged: bool,
}

/// Upsizes members along an ordered section catalog until they pass the
/// Eurocode 3 checks.
///
/// The catalog must be ordered by increasing capacity. Only elements with an
/// I, RHS or CHS section whose tag is in the target set are sized. With no
/// targets nothing is sized unless `with_all_targets` was called.
#[derive(Debug, Clone)]
pub struct SectionOptimizer {
    catalog: Vec<Arc<Section>>,
    targets: HashSet<String>,
    all_targets: bool,
    analysis: AnalysisOptions,
    design: DesignOptions,
}

impl SectionOptimizer {
    pub fn new(catalog: Vec<Arc<Section>>) -> Self {
        Self {
            catalog,
            targets: HashSet::new(),
            all_targets: false,
            analysis: AnalysisOptions::default(),
            design: DesignOptions::default(),
        }
    }

    pub fn with_targets<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Size every I, RHS or CHS element regardless of its tag
    pub fn with_all_targets(mut self) -> Self {
        self.all_targets = true;
        self
    }

    pub fn with_analysis_options(mut self, options: AnalysisOptions) -> Self {
        self.analysis = options;
        self
    }

    pub fn with_design_options(mut self, options: DesignOptions) -> Self {
        self.design = options;
        self
    }

    pub fn catalog(&self) -> &[Arc<Section>] {
        &self.catalog
    }

    fn is_eligible(&self, section: &Section, tag: &str) -> bool {
        let family = matches!(
            section.shape,
            SectionShape::I { .. } | SectionShape::Rhs { .. } | SectionShape::Chs { .. }
        );
        family && (self.all_targets || self.targets.contains(tag))
    }

    /// Size the eligible elements of `model`. The input model is not modified.
    pub fn optimize(&self, model: &Model) -> FrameResult<OptimizationReport> {
        let first = self.catalog.first().ok_or(FrameError::EmptyCatalog)?;
        let last = self.catalog.len() - 1;

        let mut indices: Vec<Option<usize>> = model
            .elements
            .iter()
            .map(|e| self.is_eligible(&e.section, &e.tag).then_some(0))
            .collect();
        if indices.iter().all(Option::is_none) {
            warn!("Section optimizer: no element matches the target tags and section families");
        }

        // buckling lengths depend on topology only and survive section changes
        let mut working = model.rebuild();
        apply_buckling_lengths(&mut working);
        let mut elements = working.elements;
        for (elem, idx) in elements.iter_mut().zip(&indices) {
            if idx.is_some() {
                *elem = elem.clone().with_section(Arc::clone(first))?;
            }
        }

        let mut solved =
            Model::new(elements.clone(), model.supports.clone(), model.loads.clone())
                .analyze(&self.analysis)?;
        let mut iterations = 0;

        while iterations < self.catalog.len() {
            let mut needs_upsizing = false;
            for (i, idx) in indices.iter_mut().enumerate() {
                let Some(current) = idx else {
                    continue;
                };
                let util = governing_utilization(&solved, i, &self.design)?;
                if util <= 1.0 {
                    continue;
                }
                needs_upsizing = true;
                if *current < last {
                    *current += 1;
                    debug!(
                        "Element '{}': utilization {:.3}, upsizing to '{}'",
                        elements[i].tag, util, self.catalog[*current].tag
                    );
                    elements[i] = elements[i]
                        .clone()
                        .with_section(Arc::clone(&self.catalog[*current]))?;
                }
            }
            if !needs_upsizing {
                break;
            }

            solved = Model::new(elements.clone(), model.supports.clone(), model.loads.clone())
                .analyze(&self.analysis)?;
            iterations += 1;
            info!("Section optimizer round {}: weight {:.1} kg", iterations, solved.weight());
        }

        let utilizations = indices
            .iter()
            .enumerate()
            .map(|(i, idx)| {
                idx.map(|_| governing_utilization(&solved, i, &self.design))
                    .transpose()
            })
            .collect::<FrameResult<Vec<_>>>()?;
        let converged = utilizations.iter().flatten().all(|&u| u <= 1.0);
        if !converged {
            warn!(
                "Section optimizer stopped after {} rounds with overutilized members",
                iterations
            );
        }

        Ok(OptimizationReport {
            weight: solved.weight(),
            model: solved,
            catalog_indices: indices,
            utilizations,
            iterations,
            converged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, Material, Support};
    use crate::geometry::Line;
    use crate::loads::PointLoad;
    use nalgebra::{Point3, Vector3};

    fn catalog() -> Vec<Arc<Section>> {
        let steel = Arc::new(Material::s235());
        [(48.3, 3.2), (88.9, 4.0), (168.3, 6.3), (273.0, 10.0)]
            .iter()
            .map(|&(d, t)| Arc::new(Section::chs(format!("CHS{}x{}", d, t), Arc::clone(&steel), d, t)))
            .collect()
    }

    fn column(load_kn: f64) -> Model {
        let section = catalog()[3].clone();
        let elem =
            Element::new(Line::from_coords([0.0; 3], [0.0, 0.0, 3.0]), "col", section, None).unwrap();
        Model::new(
            vec![elem],
            vec![Support::fixed(Point3::origin())],
            vec![PointLoad::force(Point3::new(0.0, 0.0, 3.0), Vector3::new(0.0, 0.0, -load_kn), 1).into()],
        )
    }

    #[test]
    fn test_empty_catalog() {
        let opt = SectionOptimizer::new(vec![]);
        assert!(matches!(opt.optimize(&column(10.0)), Err(FrameError::EmptyCatalog)));
    }

    #[test]
    fn test_light_load_keeps_smallest() {
        let report = SectionOptimizer::new(catalog())
            .with_targets(["col"])
            .optimize(&column(1.0))
            .unwrap();
        assert_eq!(report.catalog_indices, vec![Some(0)]);
        assert_eq!(report.iterations, 0);
        assert!(report.converged);
        assert_eq!(report.model.elements[0].section.tag, "CHS48.3x3.2");
    }

    #[test]
    fn test_heavy_load_upsizes() {
        let model = column(150.0);
        let report = SectionOptimizer::new(catalog())
            .with_targets(["col"])
            .optimize(&model)
            .unwrap();
        let idx = report.catalog_indices[0].unwrap();
        assert!(idx > 0);
        assert!(report.converged);
        assert!(report.utilizations[0].unwrap() <= 1.0);
        // cantilever column: free top doubles the length
        assert!((report.model.elements[0].buckling_length - 6.0).abs() < 1e-9);
        // input untouched
        assert_eq!(model.elements[0].section.tag, "CHS273x10");
        assert!(!model.is_analyzed());
    }

    #[test]
    fn test_untargeted_elements_are_skipped() {
        let report = SectionOptimizer::new(catalog())
            .with_targets(["beam"])
            .optimize(&column(150.0))
            .unwrap();
        assert_eq!(report.catalog_indices, vec![None]);
        assert_eq!(report.utilizations, vec![None]);
        assert_eq!(report.model.elements[0].section.tag, "CHS273x10");
    }

    #[test]
    fn test_no_targets_sizes_nothing() {
        let model = column(150.0);
        let report = SectionOptimizer::new(catalog()).optimize(&model).unwrap();
        assert_eq!(report.catalog_indices, vec![None]);
        assert_eq!(report.utilizations, vec![None]);
        assert_eq!(report.iterations, 0);
        assert!(report.converged);
        assert_eq!(report.model.elements[0].section.tag, "CHS273x10");
        assert_eq!(
            report.model.elements[0].section.props.a,
            model.elements[0].section.props.a
        );
    }

    #[test]
    fn test_overload_hits_catalog_end() {
        let report = SectionOptimizer::new(catalog())
            .with_all_targets()
            .optimize(&column(20000.0))
            .unwrap();
        assert_eq!(report.catalog_indices, vec![Some(3)]);
        assert!(!report.converged);
        assert!(report.iterations <= 4);
    }
}
