//! Sparse matrix utilities for the global frame system
//!
//! Frame stiffness matrices are very sparse: each node couples only to the
//! nodes it shares an element with. Assembly goes through COO triplets, the
//! factorization through a row-map LU on a fill-reducing permutation.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::debug;
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use serde::{Deserialize, Serialize};

use super::Mat12;
use crate::error::{FrameError, FrameResult};

/// Sparse matrix builder using COO format
/// Duplicate entries are summed when converted.
#[derive(Debug, Clone)]
pub struct SparseMatrixBuilder {
    size: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl SparseMatrixBuilder {
    /// Create a new sparse matrix builder
    pub fn new(size: usize) -> Self {
        // 6 DOFs per node, a handful of neighbours each
        Self {
            size,
            entries: Vec::with_capacity(size * 36),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Add a value to the matrix (accumulates if already exists)
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if value != 0.0 {
            self.entries.push((row, col, value));
        }
    }

    /// Scatter an element matrix onto the global DOFs in `dofs`
    pub fn add_element_matrix(&mut self, dofs: &[usize; 12], k_elem: &Mat12) {
        for (i, &di) in dofs.iter().enumerate() {
            for (j, &dj) in dofs.iter().enumerate() {
                self.add(di, dj, k_elem[(i, j)]);
            }
        }
    }

    /// Copy with restrained rows and columns removed and a unit diagonal
    /// placed on each restrained DOF
    pub fn constrained(&self, restrained: &[bool]) -> Self {
        let mut out = Self {
            size: self.size,
            entries: self
                .entries
                .iter()
                .copied()
                .filter(|&(r, c, _)| !restrained[r] && !restrained[c])
                .collect(),
        };
        for (dof, &fixed) in restrained.iter().enumerate() {
            if fixed {
                out.entries.push((dof, dof, 1.0));
            }
        }
        out
    }

    /// Convert to CSR format for efficient solves
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.size, self.size);
        for &(row, col, val) in &self.entries {
            coo.push(row, col, val);
        }
        CsrMatrix::from(&coo)
    }

    /// Convert to dense matrix (for comparison/debugging)
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut mat = DMatrix::zeros(self.size, self.size);
        for &(row, col, val) in &self.entries {
            mat[(row, col)] += val;
        }
        mat
    }

    /// Number of stored triplets, duplicates included
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

/// Sparse matrix-vector multiplication
pub fn sparse_matvec(csr: &CsrMatrix<f64>, x: &DVector<f64>) -> DVector<f64> {
    let mut y = DVector::zeros(csr.nrows());
    for (row, lane) in csr.row_iter().enumerate() {
        y[row] = lane
            .col_indices()
            .iter()
            .zip(lane.values())
            .map(|(&c, v)| v * x[c])
            .sum();
    }
    y
}

/// Symmetrized off-diagonal adjacency of a sparse pattern
fn adjacency(csr: &CsrMatrix<f64>) -> Vec<BTreeSet<usize>> {
    let mut adj = vec![BTreeSet::new(); csr.nrows()];
    for (row, col, &val) in csr.triplet_iter() {
        if row != col && val != 0.0 {
            adj[row].insert(col);
            adj[col].insert(row);
        }
    }
    adj
}

/// Bandwidth reduction using Reverse Cuthill-McKee algorithm
///
/// Returns `perm` with `perm[new] = old`.
pub fn reverse_cuthill_mckee(csr: &CsrMatrix<f64>) -> Vec<usize> {
    let n = csr.nrows();
    let adj = adjacency(csr);
    let degree = |i: usize| adj[i].len();

    let mut visited = vec![false; n];
    let mut result = Vec::with_capacity(n);
    let mut queue = VecDeque::new();

    while result.len() < n {
        // Start each component from its minimum degree node
        let Some(start) = (0..n).filter(|&i| !visited[i]).min_by_key(|&i| degree(i)) else {
            break;
        };
        visited[start] = true;
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            result.push(node);
            let mut next: Vec<usize> = adj[node].iter().copied().filter(|&j| !visited[j]).collect();
            next.sort_by_key(|&j| degree(j));
            for j in next {
                visited[j] = true;
                queue.push_back(j);
            }
        }
    }

    result.reverse();
    result
}

/// Minimum degree ordering on the elimination graph
///
/// At each step the uneliminated vertex of smallest current degree is
/// eliminated (ties to the lowest index) and its neighbours are joined into a
/// clique. Returns `perm` with `perm[new] = old`.
pub fn minimum_degree_ordering(csr: &CsrMatrix<f64>) -> Vec<usize> {
    let n = csr.nrows();
    let mut adj = adjacency(csr);
    let mut eliminated = vec![false; n];
    let mut perm = Vec::with_capacity(n);

    for _ in 0..n {
        let Some(v) = (0..n)
            .filter(|&i| !eliminated[i])
            .min_by_key(|&i| adj[i].len())
        else {
            break;
        };

        eliminated[v] = true;
        perm.push(v);

        let neighbours: Vec<usize> = std::mem::take(&mut adj[v]).into_iter().collect();
        for &a in &neighbours {
            adj[a].remove(&v);
            for &b in &neighbours {
                if a != b {
                    adj[a].insert(b);
                }
            }
        }
    }

    perm
}

/// Create inverse permutation
pub fn inverse_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; perm.len()];
    for (new_idx, &old_idx) in perm.iter().enumerate() {
        inv[old_idx] = new_idx;
    }
    inv
}

/// Fill-reducing ordering applied before factorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillOrdering {
    /// Keep the assembly order
    Natural,
    #[default]
    MinimumDegree,
    ReverseCuthillMcKee,
}

impl FillOrdering {
    pub fn permutation(&self, csr: &CsrMatrix<f64>) -> Vec<usize> {
        match self {
            FillOrdering::Natural => (0..csr.nrows()).collect(),
            FillOrdering::MinimumDegree => minimum_degree_ordering(csr),
            FillOrdering::ReverseCuthillMcKee => reverse_cuthill_mckee(csr),
        }
    }
}

/// Sparse LU factorization with a static (symmetric) pivot order
///
/// Rows of the permuted matrix are stored as ordered maps; after
/// factorization the strict lower part holds L (unit diagonal implied) and the
/// rest holds U. The factors are reused for every right-hand side.
#[derive(Debug, Clone)]
pub struct SparseLu {
    perm: Vec<usize>,
    rows: Vec<BTreeMap<usize, f64>>,
}

impl SparseLu {
    /// Factorize `csr` after reordering it with `ordering`.
    ///
    /// A pivot whose magnitude falls to `pivot_tolerance` times the original
    /// diagonal of its row (or is exactly zero) marks the system singular;
    /// the reported DOF is in the original numbering.
    pub fn factorize(
        csr: &CsrMatrix<f64>,
        ordering: FillOrdering,
        pivot_tolerance: f64,
    ) -> FrameResult<Self> {
        let n = csr.nrows();
        let perm = ordering.permutation(csr);
        let inv = inverse_permutation(&perm);

        let mut rows: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
        // rows below the diagonal with an entry in each column
        let mut col_rows: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
        for (r, c, &v) in csr.triplet_iter() {
            if v == 0.0 {
                continue;
            }
            let (i, j) = (inv[r], inv[c]);
            *rows[i].entry(j).or_insert(0.0) += v;
            if i > j {
                col_rows[j].insert(i);
            }
        }
        let initial_nnz: usize = rows.iter().map(BTreeMap::len).sum();
        let diag: Vec<f64> = (0..n)
            .map(|i| rows[i].get(&i).copied().unwrap_or(0.0).abs())
            .collect();

        for k in 0..n {
            let pivot = rows[k].get(&k).copied().unwrap_or(0.0);
            if !pivot.is_finite() || pivot == 0.0 || pivot.abs() <= pivot_tolerance * diag[k] {
                return Err(FrameError::SingularMatrix { dof: perm[k] });
            }

            let targets = std::mem::take(&mut col_rows[k]);
            for i in targets {
                let (upper, lower) = rows.split_at_mut(i);
                let pivot_row = &upper[k];
                let row = &mut lower[0];

                let Some(a_ik) = row.get_mut(&k) else {
                    continue;
                };
                let factor = *a_ik / pivot;
                *a_ik = factor;
                if factor == 0.0 {
                    continue;
                }

                for (&j, &u_kj) in pivot_row.range(k + 1..) {
                    let entry = row.entry(j).or_insert_with(|| {
                        if i > j {
                            col_rows[j].insert(i);
                        }
                        0.0
                    });
                    *entry -= factor * u_kj;
                }
            }
        }

        let factor_nnz: usize = rows.iter().map(BTreeMap::len).sum();
        debug!(
            "Sparse LU ({:?}): n = {}, nnz {} -> {} after fill",
            ordering, n, initial_nnz, factor_nnz
        );

        Ok(Self { perm, rows })
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Solve `A x = b` with the stored factors
    pub fn solve(&self, b: &DVector<f64>) -> DVector<f64> {
        let n = self.size();
        let mut x: Vec<f64> = self.perm.iter().map(|&old| b[old]).collect();

        // L y = b
        for i in 0..n {
            let sum: f64 = self.rows[i].range(..i).map(|(&j, &l)| l * x[j]).sum();
            x[i] -= sum;
        }

        // U x = y
        for i in (0..n).rev() {
            let sum: f64 = self.rows[i].range(i + 1..).map(|(&j, &u)| u * x[j]).sum();
            let d = self.rows[i].get(&i).copied().unwrap_or(1.0);
            x[i] = (x[i] - sum) / d;
        }

        let mut out = DVector::zeros(n);
        for (new, &old) in self.perm.iter().enumerate() {
            out[old] = x[new];
        }
        out
    }
}
