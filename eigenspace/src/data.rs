use serde::Serialize;

use crate::{
    error::{PcaError, Result},
    linalg::{Matrix, MatrixError},
};

/// Training observations laid out one feature per row and one sample per
/// column, so a dataset of N points in D dimensions is a D x N matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureMatrix {
    matrix: Matrix,
}

impl FeatureMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(PcaError::InvalidInput("no feature rows".into()));
        }
        let matrix = Matrix::from_rows(&rows).map_err(|e| match e {
            MatrixError::SizeMismatch => {
                PcaError::InvalidInput("feature rows have different sample counts".into())
            }
            e => e.into(),
        })?;
        Self::from_matrix(matrix)
    }

    pub fn from_matrix(matrix: Matrix) -> Result<Self> {
        if matrix.height() == 0 {
            return Err(PcaError::InvalidInput("no feature rows".into()));
        }
        if !matrix.is_finite() {
            return Err(PcaError::InvalidInput("training data contains non-finite values".into()));
        }
        Ok(Self { matrix })
    }

    /// Feature dimensionality D.
    pub fn dimensions(&self) -> usize {
        self.matrix.height()
    }

    /// Sample count N.
    pub fn samples(&self) -> usize {
        self.matrix.width()
    }

    pub fn row(&self, i: usize) -> Result<&[f64]> {
        Ok(self.matrix.get_row(i)?)
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }
}

/// One mean per feature row, taken from the training data only.
pub type MeanVector = Vec<f64>;

/// Centered observations with the query in column 0 and the training points
/// in columns 1..=N.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AugmentedMatrix(pub(crate) Matrix);

impl AugmentedMatrix {
    pub fn matrix(&self) -> &Matrix {
        &self.0
    }

    pub fn training_count(&self) -> usize {
        self.0.width() - 1
    }
}

/// Eigenspace coordinates, columns ordered as in [`AugmentedMatrix`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProjectedMatrix(pub(crate) Matrix);

impl ProjectedMatrix {
    pub fn matrix(&self) -> &Matrix {
        &self.0
    }

    pub fn point_count(&self) -> usize {
        self.0.width()
    }

    pub fn query(&self) -> Result<Vec<f64>> {
        Ok(self.0.get_col(0)?)
    }
}

/// Pairwise Euclidean distances between the columns of a [`ProjectedMatrix`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DistanceMatrix(pub(crate) Matrix);

impl DistanceMatrix {
    pub fn matrix(&self) -> &Matrix {
        &self.0
    }

    pub fn row(&self, i: usize) -> Result<&[f64]> {
        Ok(self.0.get_row(i)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_matrix_shape() {
        let data = FeatureMatrix::new(vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
        ]).unwrap();

        assert_eq!(data.dimensions(), 2);
        assert_eq!(data.samples(), 3);
        assert_eq!(data.row(1).unwrap(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_feature_matrix_ragged_rows() {
        let result = FeatureMatrix::new(vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0],
        ]);

        assert!(matches!(result, Err(PcaError::InvalidInput(_))));
    }

    #[test]
    fn test_feature_matrix_no_rows() {
        assert!(matches!(FeatureMatrix::new(vec![]), Err(PcaError::InvalidInput(_))));
    }

    #[test]
    fn test_feature_matrix_non_finite() {
        let result = FeatureMatrix::new(vec![vec![1.0, f64::NAN]]);

        assert!(matches!(result, Err(PcaError::InvalidInput(_))));
    }
}
