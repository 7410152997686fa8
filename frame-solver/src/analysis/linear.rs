//! Linear static analysis: assembly, boundary conditions, solve and recovery

use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::CsrMatrix;

use super::AnalysisOptions;
use crate::constants::{DOF_PER_NODE, KN_TO_N};
use crate::error::{FrameError, FrameResult};
use crate::loads::Load;
use crate::math::{sparse_matvec, SparseLu, SparseMatrixBuilder};
use crate::model::Model;

/// Global system of a solved model.
///
/// `stiffness` is the assembled matrix before boundary conditions; `loads`
/// holds one column per load case in N and Nm (restrained rows included).
#[derive(Debug, Clone)]
pub struct Solution {
    pub stiffness: CsrMatrix<f64>,
    pub loads: DMatrix<f64>,
    pub displacements: DMatrix<f64>,
}

impl Solution {
    pub fn num_dofs(&self) -> usize {
        self.stiffness.nrows()
    }

    pub fn num_load_cases(&self) -> usize {
        self.loads.ncols()
    }
}

/// Solve `model` for every load case and return a copy carrying the results
pub fn analyze_linear(model: &Model, options: &AnalysisOptions) -> FrameResult<Model> {
    check_model(model)?;

    let n_dofs = model.nodes.len() * DOF_PER_NODE;
    let n_cases = model.load_cases.len();

    let builder = build_global_stiffness(model);
    let restrained = restrained_dofs(model);
    let loads = build_load_matrix(model, n_dofs)?;

    let n_restrained = restrained.iter().filter(|&&r| r).count();
    debug!(
        "Assembled {} DOFs ({} restrained), {} stiffness entries, {} load cases",
        n_dofs,
        n_restrained,
        builder.nnz(),
        n_cases
    );

    let stiffness = builder.to_csr();
    let reduced = builder.constrained(&restrained).to_csr();
    let lu = SparseLu::factorize(&reduced, options.ordering, options.pivot_tolerance)?;

    let mut displacements = DMatrix::zeros(n_dofs, n_cases);
    for lc in 0..n_cases {
        let mut rhs: DVector<f64> = loads.column(lc).into_owned();
        for (value, &fixed) in rhs.iter_mut().zip(&restrained) {
            if fixed {
                *value = 0.0;
            }
        }
        let u = lu.solve(&rhs);
        if u.iter().any(|v| !v.is_finite()) {
            return Err(FrameError::InvalidModel(format!(
                "non-finite displacements in load case {}",
                model.load_cases.ids()[lc]
            )));
        }
        displacements.set_column(lc, &u);
    }

    let mut solved = model.clone();
    store_displacements(&mut solved, &displacements);
    store_reactions(&mut solved, &stiffness, &displacements);

    info!(
        "Linear analysis complete: {} nodes, {} elements, {} load cases",
        solved.nodes.len(),
        solved.elements.len(),
        n_cases
    );

    solved.solution = Some(Solution {
        stiffness,
        loads,
        displacements,
    });
    Ok(solved)
}

fn check_model(model: &Model) -> FrameResult<()> {
    if model.elements.is_empty() {
        return Err(FrameError::InvalidModel("model has no elements".into()));
    }
    if !model.supports_attached {
        return Err(FrameError::InvalidModel(
            "at least one support is not located at a node".into(),
        ));
    }
    if !model.loads_attached {
        return Err(FrameError::InvalidModel(
            "at least one load is not located at a node".into(),
        ));
    }
    Ok(())
}

/// Scatter every element's global stiffness into the system
fn build_global_stiffness(model: &Model) -> SparseMatrixBuilder {
    let mut builder = SparseMatrixBuilder::new(model.nodes.len() * DOF_PER_NODE);

    for elem in &model.elements {
        let Some([a, b]) = elem.nodes() else {
            continue;
        };
        if a == b {
            warn!("Skipping element '{}': both ends on node {}", elem.tag, a);
            continue;
        }
        let mut dofs = [0usize; 12];
        for i in 0..DOF_PER_NODE {
            dofs[i] = a * DOF_PER_NODE + i;
            dofs[i + DOF_PER_NODE] = b * DOF_PER_NODE + i;
        }
        builder.add_element_matrix(&dofs, elem.global_stiffness_matrix());
    }

    builder
}

fn restrained_dofs(model: &Model) -> Vec<bool> {
    let mut restrained = vec![false; model.nodes.len() * DOF_PER_NODE];
    for sup in &model.supports {
        let (Some(node), Some(cond)) = (sup.node, sup.conditions) else {
            continue;
        };
        for dof in cond.restrained_dofs() {
            restrained[node * DOF_PER_NODE + dof] = true;
        }
    }
    restrained
}

/// Loads in kN/kNm summed per node and case, converted to N/Nm
fn build_load_matrix(model: &Model, n_dofs: usize) -> FrameResult<DMatrix<f64>> {
    let mut loads = DMatrix::zeros(n_dofs, model.load_cases.len());
    for load in &model.loads {
        let col = model.load_cases.index_of(load.case())?;
        match load {
            Load::Point(p) => {
                let node = p.node.ok_or_else(|| {
                    FrameError::InvalidModel("load is not attached to a node".into())
                })?;
                for (i, v) in p.values.iter().enumerate() {
                    loads[(node * DOF_PER_NODE + i, col)] += v * KN_TO_N;
                }
            }
        }
    }
    Ok(loads)
}

fn store_displacements(model: &mut Model, displacements: &DMatrix<f64>) {
    for node in &mut model.nodes {
        let base = node.id * DOF_PER_NODE;
        node.displacements = (0..displacements.ncols())
            .map(|lc| std::array::from_fn(|i| displacements[(base + i, lc)]))
            .collect();
    }
}

/// Reactions `K u` with the unconstrained stiffness, all six components at
/// every supported node
fn store_reactions(model: &mut Model, stiffness: &CsrMatrix<f64>, displacements: &DMatrix<f64>) {
    let forces: Vec<DVector<f64>> = (0..displacements.ncols())
        .map(|lc| sparse_matvec(stiffness, &displacements.column(lc).into_owned()))
        .collect();

    for sup in &mut model.supports {
        sup.reactions.clear();
        let Some(node) = sup.node else {
            continue;
        };
        let base = node * DOF_PER_NODE;
        sup.reactions = forces
            .iter()
            .map(|r| std::array::from_fn(|i| r[base + i]))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, Material, Section, Support};
    use crate::geometry::Line;
    use crate::loads::PointLoad;
    use crate::math::FillOrdering;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};
    use std::sync::Arc;

    fn cantilever(support_code: &str) -> Model {
        let section = Arc::new(Section::rectangular(
            "R100x200",
            Arc::new(Material::s235()),
            100.0,
            200.0,
        ));
        let element =
            Element::new(Line::from_coords([0.0; 3], [2.0, 0.0, 0.0]), "B", section, None).unwrap();
        Model::new(
            vec![element],
            vec![Support::new(Point3::origin(), support_code)],
            vec![
                PointLoad::force(Point3::new(2.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -10.0), 1).into(),
                PointLoad::force(Point3::new(2.0, 0.0, 0.0), Vector3::new(20.0, 0.0, 0.0), 2).into(),
            ],
        )
    }

    #[test]
    fn test_cantilever_tip_deflection() {
        let solved = cantilever("111111").analyze(&AnalysisOptions::default()).unwrap();
        // PL^3 / 3EI with I = b h^3 / 12 in the local z direction
        let e = 210000.0e6;
        let i = 100.0 * 200.0_f64.powi(3) / 12.0 * 1e-12;
        let expected = 10.0e3 * 8.0 / (3.0 * e * i);
        let d = solved.node_displacement(1, 1).unwrap();
        assert_relative_eq!(d.dz, -expected, max_relative = 1e-9);

        let r = solved.support_reactions(0, 1).unwrap();
        assert_relative_eq!(r.fz, 10.0, epsilon = 1e-6);
        assert_relative_eq!(r.my.abs(), 20.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cases_are_independent_columns() {
        let solved = cantilever("111111").analyze(&AnalysisOptions::default()).unwrap();
        let axial = solved.node_displacement(1, 2).unwrap();
        assert!(axial.dx > 0.0);
        assert_relative_eq!(axial.dz, 0.0, epsilon = 1e-12);
        let r = solved.support_reactions(0, 2).unwrap();
        assert_relative_eq!(r.fx, -20.0, epsilon = 1e-6);

        let solution = solved.solution().unwrap();
        assert_eq!(solution.num_dofs(), 12);
        assert_eq!(solution.num_load_cases(), 2);
    }

    #[test]
    fn test_orderings_agree() {
        let m = cantilever("111111");
        let a = m.analyze(&AnalysisOptions::default()).unwrap();
        let b = m
            .analyze(&AnalysisOptions::default().with_ordering(FillOrdering::Natural))
            .unwrap();
        let da = a.node_displacement(1, 1).unwrap();
        let db = b.node_displacement(1, 1).unwrap();
        assert_relative_eq!(da.dz, db.dz, max_relative = 1e-12);
    }

    #[test]
    fn test_mechanism_is_singular() {
        let m = cantilever("111000");
        assert!(matches!(
            m.analyze(&AnalysisOptions::default()),
            Err(FrameError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_input_model_untouched() {
        let m = cantilever("111111");
        let _ = m.analyze(&AnalysisOptions::default()).unwrap();
        assert!(!m.is_analyzed());
        assert!(m.nodes[1].displacement(0).is_none());
    }
}
