use nalgebra::{DMatrix, SymmetricEigen};
use serde::Serialize;
use tracing::debug;

use crate::{
    covariance::CovarianceMatrix,
    error::{PcaError, Result},
    linalg::Matrix,
};

/// Eigenvalues paired by position with the columns of `vectors`.
///
/// Column `i` of `vectors` is the unit eigenvector for `values[i]`, and row
/// `k` of `vectors` is feature `k`. No ordering of the values is implied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EigenDecomposition {
    values: Vec<f64>,
    vectors: Matrix,
}

impl EigenDecomposition {
    pub fn new(values: Vec<f64>, vectors: Matrix) -> Result<Self> {
        if !vectors.is_square() || vectors.width() != values.len() {
            return Err(PcaError::DimensionMismatch {
                expected: values.len(),
                found: vectors.width(),
            });
        }
        Ok(Self { values, vectors })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn vectors(&self) -> &Matrix {
        &self.vectors
    }

    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    /// Position and value of the largest eigenvalue. The first position wins
    /// on ties.
    pub fn dominant(&self) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, value) in self.values.iter().enumerate() {
            match best {
                Some((_, b)) if *value <= b => {}
                _ => best = Some((i, *value)),
            }
        }
        best
    }

    /// Share of the total variance captured by each eigenvalue, in the current
    /// order.
    pub fn explained_variance(&self) -> Vec<f64> {
        let total: f64 = self.values.iter().sum();
        if total == 0.0 {
            return vec![0.0; self.values.len()];
        }
        self.values.iter().map(|v| v / total).collect()
    }

    /// Reorder eigenvalues from largest to smallest, moving each eigenvector
    /// column along with its value.
    pub fn sorted_descending(&self) -> Result<Self> {
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by(|&a, &b| self.values[b].total_cmp(&self.values[a]));

        let n = self.values.len();
        let mut values = Vec::with_capacity(n);
        let mut vectors = Matrix::zeros(n, n);
        for (to, &from) in order.iter().enumerate() {
            values.push(self.values[from]);
            vectors.set_col(to, &self.vectors.get_col(from)?)?;
        }
        Ok(Self { values, vectors })
    }

    /// Flip each eigenvector so its largest magnitude component is positive.
    /// Eigenvectors are only defined up to sign and solvers differ in which
    /// one they return.
    fn with_canonical_signs(mut self) -> Result<Self> {
        for i in 0..self.vectors.width() {
            let column = self.vectors.get_col(i)?;
            let pivot = column.iter()
                .copied()
                .fold(0.0_f64, |acc, a| if a.abs() > acc.abs() { a } else { acc });
            if pivot < 0.0 {
                let flipped: Vec<f64> = column.iter().map(|a| -a).collect();
                self.vectors.set_col(i, &flipped)?;
            }
        }
        Ok(self)
    }
}

/// Symmetric eigen-decomposition. Implementations must keep eigenvector rows
/// in the same feature order as the covariance matrix they were given.
pub trait EigenSolver {
    fn decompose(&self, covariance: &CovarianceMatrix) -> Result<EigenDecomposition>;
}

/// [`EigenSolver`] backed by `nalgebra`'s symmetric QR iteration.
#[derive(Debug, Clone, Copy)]
pub struct NalgebraSolver {
    pub epsilon: f64,
    pub max_iterations: usize,
    /// Largest tolerated `|a_ij - a_ji|` relative to the largest entry.
    pub symmetry_tolerance: f64,
}

impl Default for NalgebraSolver {
    fn default() -> Self {
        Self {
            epsilon: f64::EPSILON,
            max_iterations: 1000,
            symmetry_tolerance: 1e-9,
        }
    }
}

impl EigenSolver for NalgebraSolver {
    fn decompose(&self, covariance: &CovarianceMatrix) -> Result<EigenDecomposition> {
        let matrix = covariance.matrix();
        if !matrix.is_finite() {
            return Err(PcaError::DecompositionFailure(
                "covariance matrix contains non-finite values".into(),
            ));
        }
        let scale = matrix.elements()
            .iter()
            .fold(1.0_f64, |acc, a| acc.max(a.abs()));
        if !matrix.is_symmetric(self.symmetry_tolerance * scale) {
            return Err(PcaError::DecompositionFailure(
                "covariance matrix is not symmetric".into(),
            ));
        }

        let n = matrix.height();
        let input = DMatrix::from_row_slice(n, n, matrix.elements());
        let eigen = SymmetricEigen::try_new(input, self.epsilon, self.max_iterations)
            .ok_or_else(|| {
                PcaError::DecompositionFailure(format!(
                    "did not converge within {} iterations",
                    self.max_iterations
                ))
            })?;

        let values: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
        let mut vectors = Matrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                vectors.set(i, j, eigen.eigenvectors[(i, j)])?;
            }
        }
        if values.iter().any(|v| !v.is_finite()) || !vectors.is_finite() {
            return Err(PcaError::DecompositionFailure(
                "solver returned non-finite eigenpairs".into(),
            ));
        }
        debug!(?values, "decomposed covariance matrix");

        EigenDecomposition::new(values, vectors)?.with_canonical_signs()
    }
}
