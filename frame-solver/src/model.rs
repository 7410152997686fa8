//! Frame model - elements, supports and loads resolved onto shared nodes

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::{self, AnalysisOptions, Solution};
use crate::constants::DOF_PER_NODE;
use crate::elements::{Element, Node, Support};
use crate::error::{FrameError, FrameResult};
use crate::geometry::{BoundingBox, Line};
use crate::loads::{Load, LoadCases};
use crate::registry::NodeRegistry;
use crate::results::{
    AnalysisSummary, ElementEndForces, NodeDisplacement, Reactions,
};

/// A problem found while resolving supports and loads onto nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationIssue {
    /// Support restraint code could not be parsed; the support is skipped
    InvalidSupportCode { support: usize },
    /// Support point does not coincide with any node
    UnattachedSupport { support: usize },
    /// A second support on a node that already carries one; it is ignored
    DuplicateSupport { support: usize, node: usize },
    /// Load point does not coincide with any node
    UnattachedLoad { load: usize },
    /// Both element ends fall onto the same node
    CollapsedElement { element: usize },
    NoElements,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::InvalidSupportCode { support } => {
                write!(f, "support {} has an invalid restraint code and was skipped", support)
            }
            ValidationIssue::UnattachedSupport { support } => {
                write!(f, "support {} is not located at any element end", support)
            }
            ValidationIssue::DuplicateSupport { support, node } => {
                write!(f, "support {} ignored: node {} is already supported", support, node)
            }
            ValidationIssue::UnattachedLoad { load } => {
                write!(f, "load {} is not located at any element end", load)
            }
            ValidationIssue::CollapsedElement { element } => {
                write!(f, "element {} has both ends on the same node", element)
            }
            ValidationIssue::NoElements => write!(f, "model has no elements"),
        }
    }
}

/// The assembled structural model.
///
/// Built in one pass from elements, supports and loads. Cross references
/// (element → node, support → node, node → support) are indices, so `Clone`
/// is a full independent copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub elements: Vec<Element>,
    pub supports: Vec<Support>,
    pub loads: Vec<Load>,
    pub nodes: Vec<Node>,
    pub bbox: Option<BoundingBox>,

    pub(crate) load_cases: LoadCases,
    pub(crate) supports_attached: bool,
    pub(crate) loads_attached: bool,
    pub(crate) issues: Vec<ValidationIssue>,
    /// Total self weight in kg
    pub(crate) weight: f64,

    #[serde(skip)]
    pub(crate) solution: Option<Solution>,
}

impl Model {
    /// Build a model: merge element ends into nodes, then attach supports and
    /// loads to the nodes at their points.
    pub fn new(elements: Vec<Element>, supports: Vec<Support>, loads: Vec<Load>) -> Self {
        let mut elements = elements;
        let mut supports = supports;
        let mut loads = loads;
        let mut issues = Vec::new();

        let weight = elements.iter().map(Element::weight).sum();

        let bbox = BoundingBox::from_points(
            elements.iter().flat_map(|e| [&e.line.from, &e.line.to]),
        );
        if bbox.is_none() {
            issues.push(ValidationIssue::NoElements);
        }

        let mut registry = NodeRegistry::new(bbox.unwrap_or(BoundingBox {
            min: nalgebra::Point3::origin(),
            max: nalgebra::Point3::origin(),
        }));

        for (i, elem) in elements.iter_mut().enumerate() {
            let start = registry.find_or_insert(&elem.line.from);
            let end = registry.find_or_insert(&elem.line.to);
            if start == end {
                issues.push(ValidationIssue::CollapsedElement { element: i });
            }
            elem.id = Some(i);
            elem.nodes = Some([start, end]);
        }

        let mut supports_attached = true;
        let mut node_support: Vec<Option<usize>> = vec![None; registry.len()];
        for (i, support) in supports.iter_mut().enumerate() {
            support.node = None;
            support.reactions.clear();

            if support.conditions.is_none() {
                issues.push(ValidationIssue::InvalidSupportCode { support: i });
                continue;
            }
            match registry.find(&support.point) {
                None => {
                    supports_attached = false;
                    issues.push(ValidationIssue::UnattachedSupport { support: i });
                }
                Some(n) if node_support[n].is_some() => {
                    issues.push(ValidationIssue::DuplicateSupport { support: i, node: n });
                }
                Some(n) => {
                    node_support[n] = Some(i);
                    support.node = Some(n);
                }
            }
        }

        let mut loads_attached = true;
        for (i, load) in loads.iter_mut().enumerate() {
            match load {
                Load::Point(p) => {
                    p.node = registry.find(&p.point);
                    if p.node.is_none() {
                        loads_attached = false;
                        issues.push(ValidationIssue::UnattachedLoad { load: i });
                    }
                }
            }
        }

        let mut nodes = registry.into_nodes();
        for (node, sup) in nodes.iter_mut().zip(node_support) {
            node.support = sup;
        }

        for issue in &issues {
            warn!("Model validation: {}", issue);
        }

        let load_cases = LoadCases::from_loads(&loads);
        debug!(
            "Model built: {} nodes, {} elements, {} supports, {} loads in {} load cases",
            nodes.len(),
            elements.len(),
            supports.len(),
            loads.len(),
            load_cases.len()
        );

        Self {
            elements,
            supports,
            loads,
            nodes,
            bbox,
            load_cases,
            supports_attached,
            loads_attached,
            issues,
            weight,
            solution: None,
        }
    }

    /// Unsolved model rebuilt from this model's inputs
    pub fn rebuild(&self) -> Self {
        Self::new(self.elements.clone(), self.supports.clone(), self.loads.clone())
    }

    /// Run a linear static analysis and return the solved model.
    /// `self` is left untouched.
    pub fn analyze(&self, options: &AnalysisOptions) -> FrameResult<Model> {
        analysis::analyze_linear(self, options)
    }

    // ========================
    // Model Queries
    // ========================

    pub fn load_cases(&self) -> &LoadCases {
        &self.load_cases
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn supports_attached(&self) -> bool {
        self.supports_attached
    }

    pub fn loads_attached(&self) -> bool {
        self.loads_attached
    }

    /// True when the model can be analyzed
    pub fn is_valid(&self) -> bool {
        self.supports_attached && self.loads_attached && !self.elements.is_empty()
    }

    /// Total self weight in kg
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn total_dofs(&self) -> usize {
        self.nodes.len() * DOF_PER_NODE
    }

    /// Indices of all elements carrying `tag`
    pub fn elements_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.elements
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.tag == tag)
            .map(|(i, _)| i)
    }

    /// Index of the first element carrying `tag`
    pub fn find_element(&self, tag: &str) -> FrameResult<usize> {
        self.elements_with_tag(tag)
            .next()
            .ok_or_else(|| FrameError::ElementNotFound(tag.to_string()))
    }

    /// Node index of the node located at `point`, matched the same way
    /// supports and loads are attached
    pub fn find_node(&self, point: &nalgebra::Point3<f64>) -> Option<usize> {
        let bbox = self.bbox?;
        NodeRegistry::from_nodes(bbox, self.nodes.clone()).find(point)
    }

    /// Serialize the model inputs and resolved nodes to JSON
    pub fn to_json(&self) -> FrameResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read a model written by `to_json`. Analysis results are not stored and
    /// the returned model needs a fresh `analyze`.
    pub fn from_json(json: &str) -> FrameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Incident element indices for every node
    pub fn element_incidence(&self) -> Vec<Vec<usize>> {
        let mut incidence = vec![Vec::new(); self.nodes.len()];
        for (i, elem) in self.elements.iter().enumerate() {
            if let Some([a, b]) = elem.nodes {
                incidence[a].push(i);
                if b != a {
                    incidence[b].push(i);
                }
            }
        }
        incidence
    }

    // ========================
    // Result Access Methods
    // ========================

    pub fn is_analyzed(&self) -> bool {
        self.solution.is_some()
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    fn case_index(&self, case: i32) -> FrameResult<usize> {
        if !self.is_analyzed() {
            return Err(FrameError::NotAnalyzed);
        }
        self.load_cases.index_of(case)
    }

    fn node(&self, index: usize) -> FrameResult<&Node> {
        self.nodes.get(index).ok_or(FrameError::IndexOutOfRange {
            kind: "node",
            index,
            len: self.nodes.len(),
        })
    }

    fn element(&self, index: usize) -> FrameResult<&Element> {
        self.elements.get(index).ok_or(FrameError::IndexOutOfRange {
            kind: "element",
            index,
            len: self.elements.len(),
        })
    }

    /// Displacement of a node for a load case id, in m and rad
    pub fn node_displacement(&self, node: usize, case: i32) -> FrameResult<NodeDisplacement> {
        let lc = self.case_index(case)?;
        let disp = self.node(node)?.displacement(lc).ok_or(FrameError::NotAnalyzed)?;
        Ok(NodeDisplacement::from_array(disp))
    }

    /// Reactions of a support for a load case id, in kN and kNm.
    /// An unattached support reports zero reactions.
    pub fn support_reactions(&self, support: usize, case: i32) -> FrameResult<Reactions> {
        let lc = self.case_index(case)?;
        let sup = self.supports.get(support).ok_or(FrameError::IndexOutOfRange {
            kind: "support",
            index: support,
            len: self.supports.len(),
        })?;
        Ok(Reactions::from_si(sup.reaction(lc).unwrap_or([0.0; 6])))
    }

    /// Local end forces `K T U` of an element by load case position, N and Nm
    pub(crate) fn end_forces_by_index(&self, element: usize, lc: usize) -> FrameResult<[f64; 12]> {
        let elem = self.element(element)?;
        let [a, b] = elem.nodes.ok_or(FrameError::NotAnalyzed)?;
        let da = self.node(a)?.displacement(lc).ok_or(FrameError::NotAnalyzed)?;
        let db = self.node(b)?.displacement(lc).ok_or(FrameError::NotAnalyzed)?;
        Ok(elem.end_forces(&da, &db))
    }

    /// Local end forces of an element for a load case id, in N and Nm
    pub fn element_end_forces(&self, element: usize, case: i32) -> FrameResult<[f64; 12]> {
        let lc = self.case_index(case)?;
        self.end_forces_by_index(element, lc)
    }

    /// Sectional forces at both element ends for a load case id, in kN and kNm
    pub fn element_forces(&self, element: usize, case: i32) -> FrameResult<ElementEndForces> {
        Ok(ElementEndForces::from_local(&self.element_end_forces(element, case)?))
    }

    /// Element lines moved by `factor` times the displacements of a load case
    pub fn deformed_lines(&self, case: i32, factor: f64) -> FrameResult<Vec<Line>> {
        let lc = self.case_index(case)?;
        let moved = |n: usize| -> FrameResult<nalgebra::Point3<f64>> {
            let node = self.node(n)?;
            let d = node.displacement(lc).ok_or(FrameError::NotAnalyzed)?;
            Ok(node.point + nalgebra::Vector3::new(d[0], d[1], d[2]) * factor)
        };
        self.elements
            .iter()
            .map(|e| {
                let [a, b] = e.nodes.ok_or(FrameError::NotAnalyzed)?;
                Ok(Line::new(moved(a)?, moved(b)?))
            })
            .collect()
    }

    /// Extremes and counts for one load case
    pub fn summary(&self, case: i32) -> FrameResult<AnalysisSummary> {
        let lc = self.case_index(case)?;

        let restrained: usize = self
            .supports
            .iter()
            .filter(|s| s.node.is_some())
            .filter_map(|s| s.conditions)
            .map(|r| r.num_restrained())
            .sum();

        let mut summary = AnalysisSummary {
            load_case: case,
            num_nodes: self.nodes.len(),
            num_elements: self.elements.len(),
            num_supports: self.supports.iter().filter(|s| s.node.is_some()).count(),
            num_load_cases: self.load_cases.len(),
            total_dofs: self.total_dofs(),
            free_dofs: self.total_dofs().saturating_sub(restrained),
            weight: self.weight,
            ..Default::default()
        };

        for node in &self.nodes {
            if let Some(d) = node.displacement(lc) {
                let mag = NodeDisplacement::from_array(d).translation_magnitude();
                if mag > summary.max_displacement {
                    summary.max_displacement = mag;
                    summary.max_disp_node = node.id;
                }
            }
        }

        for (i, sup) in self.supports.iter().enumerate() {
            if let Some(r) = sup.reaction(lc) {
                let mag = Reactions::from_si(r).force_magnitude();
                if mag > summary.max_reaction {
                    summary.max_reaction = mag;
                    summary.max_reaction_support = i;
                }
            }
        }

        for (i, elem) in self.elements.iter().enumerate() {
            let forces = ElementEndForces::from_local(&self.end_forces_by_index(i, lc)?);
            if forces.max_axial() > summary.max_axial {
                summary.max_axial = forces.max_axial();
                summary.max_axial_element = elem.tag.clone();
            }
            if forces.max_moment() > summary.max_moment {
                summary.max_moment = forces.max_moment();
                summary.max_moment_element = elem.tag.clone();
            }
        }

        info!(
            "Load case {}: max displacement {:.4e} m at node {}, max reaction {:.3} kN",
            case, summary.max_displacement, summary.max_disp_node, summary.max_reaction
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Section};
    use crate::loads::PointLoad;
    use nalgebra::{Point3, Vector3};
    use std::sync::Arc;

    fn section() -> Arc<Section> {
        Arc::new(Section::rectangular("R", Arc::new(Material::s235()), 100.0, 200.0))
    }

    fn elem(from: [f64; 3], to: [f64; 3]) -> Element {
        Element::new(Line::from_coords(from, to), "E", section(), None).unwrap()
    }

    fn portal() -> Model {
        let elements = vec![
            elem([0.0, 0.0, 0.0], [0.0, 0.0, 3.0]),
            elem([0.0, 0.0, 3.0], [4.0, 0.0, 3.0]),
            elem([4.0, 0.0, 3.0], [4.0, 0.0, 0.0]),
        ];
        let supports = vec![
            Support::new(Point3::new(0.0, 0.0, 0.0), "111111"),
            Support::new(Point3::new(4.0, 0.0, 0.0), "111000"),
        ];
        let loads = vec![
            PointLoad::force(Point3::new(0.0, 0.0, 3.0), Vector3::new(5.0, 0.0, 0.0), 1).into(),
        ];
        Model::new(elements, supports, loads)
    }

    #[test]
    fn test_shared_ends_become_one_node() {
        let m = portal();
        assert_eq!(m.nodes.len(), 4);
        assert_eq!(m.elements[0].nodes(), Some([0, 1]));
        assert_eq!(m.elements[1].nodes(), Some([1, 2]));
        assert_eq!(m.elements[2].nodes(), Some([2, 3]));
        assert!(m.is_valid());
        assert!(m.issues().is_empty());
    }

    #[test]
    fn test_supports_attach_both_ways() {
        let m = portal();
        assert_eq!(m.supports[0].node, Some(0));
        assert_eq!(m.supports[1].node, Some(3));
        assert_eq!(m.nodes[3].support, Some(1));
        assert!(m.nodes[1].support.is_none());
    }

    #[test]
    fn test_unattached_support_and_load_flag_model() {
        let mut m = portal();
        m.supports.push(Support::fixed(Point3::new(9.0, 9.0, 9.0)));
        m.loads.push(PointLoad::force(Point3::new(2.0, 0.0, 0.0), Vector3::z(), 1).into());
        let m = m.rebuild();
        assert!(!m.supports_attached());
        assert!(!m.loads_attached());
        assert!(!m.is_valid());
        assert!(matches!(
            m.analyze(&AnalysisOptions::default()),
            Err(FrameError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_invalid_and_duplicate_supports_are_skipped() {
        let mut m = portal();
        m.supports.push(Support::new(Point3::new(0.0, 0.0, 3.0), "1x1"));
        m.supports.push(Support::pinned(Point3::new(0.0, 0.0, 0.0)));
        let m = m.rebuild();
        assert!(m.supports_attached());
        assert_eq!(m.supports[2].node, None);
        assert_eq!(m.supports[3].node, None);
        assert_eq!(m.nodes[0].support, Some(0));
        assert_eq!(
            m.issues(),
            &[
                ValidationIssue::InvalidSupportCode { support: 2 },
                ValidationIssue::DuplicateSupport { support: 3, node: 0 },
            ]
        );
    }

    #[test]
    fn test_weight_and_incidence() {
        let m = portal();
        let expected: f64 = m.elements.iter().map(|e| e.weight()).sum();
        assert!((m.weight() - expected).abs() < 1e-9);
        let inc = m.element_incidence();
        assert_eq!(inc[1], vec![0, 1]);
        assert_eq!(inc[3], vec![2]);
    }

    #[test]
    fn test_results_require_analysis() {
        let m = portal();
        assert!(matches!(m.node_displacement(1, 1), Err(FrameError::NotAnalyzed)));
        assert!(matches!(m.find_element("nope"), Err(FrameError::ElementNotFound(_))));
        assert_eq!(m.find_element("E").unwrap(), 0);
    }

    #[test]
    fn test_find_node_uses_merge_tolerance() {
        let m = portal();
        assert_eq!(m.find_node(&Point3::new(4.0, 0.0, 3.0)), Some(2));
        assert_eq!(m.find_node(&Point3::new(4.0, 0.0005, 3.0)), Some(2));
        assert_eq!(m.find_node(&Point3::new(4.0, 0.002, 3.0)), None);
        let empty = Model::new(vec![], vec![], vec![]);
        assert_eq!(empty.find_node(&Point3::origin()), None);
    }

    #[test]
    fn test_json_keeps_topology_and_drops_results() {
        let solved = portal().analyze(&AnalysisOptions::default()).unwrap();
        let json = solved.to_json().unwrap();
        let restored = Model::from_json(&json).unwrap();

        assert!(!restored.is_analyzed());
        assert_eq!(restored.nodes.len(), 4);
        assert_eq!(restored.elements[1].nodes(), Some([1, 2]));
        assert_eq!(restored.supports[1].node, Some(3));
        assert_eq!(restored.load_cases().ids(), &[1]);
        assert!(restored.analyze(&AnalysisOptions::default()).is_ok());

        assert!(matches!(
            Model::from_json("{\"elements\": 3}"),
            Err(FrameError::SerializationError(_))
        ));
    }

    #[test]
    fn test_clone_is_independent() {
        let m = portal();
        let mut c = m.clone();
        c.elements[0].tag = "changed".into();
        c.nodes[0].support = None;
        assert_eq!(m.elements[0].tag, "E");
        assert_eq!(m.nodes[0].support, Some(0));
    }
}
