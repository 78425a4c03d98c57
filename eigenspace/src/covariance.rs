use serde::Serialize;
use tracing::debug;

use crate::{
    data::FeatureMatrix,
    error::{PcaError, Result},
    linalg::{mean, Matrix, MatrixError},
};

/// Denominator applied to the summed cross products.
///
/// Scaling only changes the magnitude of projected coordinates, not the
/// direction of the eigenvectors, so either choice yields the same nearest
/// neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Divisor {
    /// Unbiased estimate, divides by N - 1.
    #[default]
    Sample,
    /// Divides by N.
    Population,
}

impl Divisor {
    fn value(&self, samples: usize) -> f64 {
        match self {
            Divisor::Sample => (samples - 1) as f64,
            Divisor::Population => samples as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CovarianceMatrix {
    matrix: Matrix,
    divisor: Divisor,
}

impl CovarianceMatrix {
    /// Wrap a matrix computed elsewhere. Symmetry is not checked here, the
    /// eigensolver rejects asymmetric input.
    pub fn new(matrix: Matrix, divisor: Divisor) -> Result<Self> {
        if !matrix.is_square() {
            return Err(MatrixError::NotSquare.into());
        }
        Ok(Self { matrix, divisor })
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn divisor(&self) -> Divisor {
        self.divisor
    }

    pub fn dimensions(&self) -> usize {
        self.matrix.height()
    }

    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        Ok(self.matrix.get(i, j)?)
    }
}

/// Covariance between every pair of feature rows.
///
/// Only the upper triangle is computed, each value is mirrored into the lower
/// triangle so the result is exactly symmetric. No observations at all is
/// reported as `EmptyDataset`, a single observation as `InvalidInput`.
pub fn covariance(data: &FeatureMatrix, divisor: Divisor) -> Result<CovarianceMatrix> {
    let n = data.samples();
    if n == 0 {
        return Err(PcaError::EmptyDataset);
    }
    if n < 2 {
        return Err(PcaError::InvalidInput(
            "covariance needs at least two observations".into(),
        ));
    }

    let d = data.dimensions();
    let denominator = divisor.value(n);
    let mut centered_rows = Vec::with_capacity(d);
    for i in 0..d {
        let row = data.row(i)?;
        let m = mean(row);
        centered_rows.push(row.iter().map(|x| x - m).collect::<Vec<f64>>());
    }

    let mut matrix = Matrix::zeros(d, d);
    for i in 0..d {
        for j in i..d {
            let value = centered_rows[i].iter()
                .zip(centered_rows[j].iter())
                .fold(0.0, |acc, (a, b)| acc + a * b)
                / denominator;
            matrix.set(i, j, value)?;
            matrix.set(j, i, value)?;
        }
    }
    debug!(dimensions = d, samples = n, ?divisor, "computed covariance matrix");

    Ok(CovarianceMatrix { matrix, divisor })
}
