use tracing::debug;

use crate::{
    data::{AugmentedMatrix, ProjectedMatrix},
    eigen::EigenDecomposition,
    error::{PcaError, Result},
    linalg::Matrix,
};

/// Rotate centered observations into eigenspace, `transpose(V) * A`.
///
/// Entry (i, k) of the result is the dot product of eigenvector `i` with
/// observation `k`. Rows of `V` must follow the feature order of `A`.
pub fn project(augmented: &AugmentedMatrix, eigen: &EigenDecomposition) -> Result<ProjectedMatrix> {
    let projected = rotate(augmented.matrix(), eigen)?;
    debug!(
        components = projected.height(),
        points = projected.width(),
        "projected data into eigenspace"
    );
    Ok(ProjectedMatrix(projected))
}

/// `transpose(V) * data` for any matrix of centered columns.
pub fn rotate(data: &Matrix, eigen: &EigenDecomposition) -> Result<Matrix> {
    let vectors = eigen.vectors();
    if vectors.height() != data.height() {
        return Err(PcaError::DimensionMismatch {
            expected: data.height(),
            found: vectors.height(),
        });
    }
    Ok(vectors.transpose().mul(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        centering::center,
        covariance::{covariance, Divisor},
        data::FeatureMatrix,
        eigen::{EigenSolver, NalgebraSolver},
        linalg::euclid,
    };

    #[test]
    fn test_project_with_rotation() {
        // swaps the two axes
        let eigen = EigenDecomposition::new(
            vec![2.0, 1.0],
            Matrix::new(vec![
                0.0, 1.0,
                1.0, 0.0,
            ], 2, 2).unwrap(),
        ).unwrap();
        let augmented = AugmentedMatrix(Matrix::new(vec![
            1.0, 2.0,
            3.0, 4.0,
        ], 2, 2).unwrap());

        let projected = project(&augmented, &eigen).unwrap();

        let expected = Matrix::new(vec![
            3.0, 4.0,
            1.0, 2.0,
        ], 2, 2).unwrap();
        assert_eq!(projected.matrix(), &expected);
    }

    #[test]
    fn test_project_dimension_mismatch() {
        let eigen = EigenDecomposition::new(vec![1.0; 3], Matrix::identity(3, 3)).unwrap();
        let augmented = AugmentedMatrix(Matrix::zeros(2, 4));

        let result = project(&augmented, &eigen);

        assert_eq!(
            result.err(),
            Some(PcaError::DimensionMismatch { expected: 2, found: 3 })
        );
    }

    #[test]
    fn test_rotate_dimension_mismatch() {
        let eigen = EigenDecomposition::new(vec![1.0; 2], Matrix::identity(2, 2)).unwrap();

        let result = rotate(&Matrix::zeros(3, 5), &eigen);

        assert_eq!(
            result.err(),
            Some(PcaError::DimensionMismatch { expected: 3, found: 2 })
        );
    }

    #[test]
    fn test_projection_preserves_distances() {
        let data = FeatureMatrix::new(vec![
            vec![1.0, 4.0, -2.0, 0.5, 3.3, 1.1],
            vec![0.1, 0.2, 0.9, -1.0, 2.0, 0.0],
            vec![7.0, 6.5, 6.0, 8.0, 1.0, 2.2],
        ]).unwrap();
        let cov = covariance(&data, Divisor::Sample).unwrap();
        let eigen = NalgebraSolver::default().decompose(&cov).unwrap();
        let (_, augmented) = center(&data, &[0.3, 0.3, 0.3]).unwrap();

        let projected = project(&augmented, &eigen).unwrap();

        let before = augmented.matrix();
        let after = projected.matrix();
        for a in 1..before.width() {
            for b in a + 1..before.width() {
                let d_before = euclid(&before.get_col(a).unwrap(), &before.get_col(b).unwrap());
                let d_after = euclid(&after.get_col(a).unwrap(), &after.get_col(b).unwrap());
                assert!((d_before - d_after).abs() < 1e-9, "{} != {}", d_before, d_after);
            }
        }
    }
}
