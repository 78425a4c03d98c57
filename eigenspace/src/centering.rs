use tracing::debug;

use crate::{
    data::{AugmentedMatrix, FeatureMatrix, MeanVector},
    error::{PcaError, Result},
    linalg::{mean, Matrix},
};

pub fn means(data: &FeatureMatrix) -> Result<MeanVector> {
    let mut means = Vec::with_capacity(data.dimensions());
    for i in 0..data.dimensions() {
        means.push(mean(data.row(i)?));
    }
    Ok(means)
}

/// Place the query in column 0 ahead of the training columns and subtract the
/// training means from every column. The query never contributes to the
/// means.
pub fn center(training: &FeatureMatrix, query: &[f64]) -> Result<(MeanVector, AugmentedMatrix)> {
    let means = means(training)?;
    let augmented = center_with(training, query, &means)?;
    Ok((means, augmented))
}

/// Same as [`center`] with means computed earlier from `training`.
pub fn center_with(
    training: &FeatureMatrix,
    query: &[f64],
    means: &[f64],
) -> Result<AugmentedMatrix> {
    let d = training.dimensions();
    if query.len() != d {
        return Err(PcaError::DimensionMismatch {
            expected: d,
            found: query.len(),
        });
    }
    if means.len() != d {
        return Err(PcaError::DimensionMismatch {
            expected: d,
            found: means.len(),
        });
    }
    if query.iter().any(|q| !q.is_finite()) {
        return Err(PcaError::InvalidInput("query contains non-finite values".into()));
    }

    let n = training.samples();
    let mut all = Matrix::zeros(d, n + 1);
    for i in 0..d {
        let row = training.row(i)?;
        all.set(i, 0, query[i])?;
        for (k, value) in row.iter().enumerate() {
            all.set(i, k + 1, *value)?;
        }
    }
    let centered = all.sub_row_values(means)?;
    debug!(dimensions = d, columns = n + 1, "centered query and training data");

    Ok(AugmentedMatrix(centered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::round;

    fn data() -> FeatureMatrix {
        FeatureMatrix::new(vec![
            vec![1.0, 2.0, 3.0],
            vec![10.0, 0.0, 5.0],
        ]).unwrap()
    }

    #[test]
    fn test_means() {
        assert_eq!(means(&data()).unwrap(), vec![2.0, 5.0]);
    }

    #[test]
    fn test_center_uses_training_means() {
        let (means, augmented) = center(&data(), &[100.0, -100.0]).unwrap();

        assert_eq!(means, vec![2.0, 5.0]);
        let expected = Matrix::new(vec![
            98.0, -1.0, 0.0, 1.0,
            -105.0, 5.0, -5.0, 0.0,
        ], 2, 4).unwrap();
        assert_eq!(augmented.matrix(), &expected);
        assert_eq!(augmented.training_count(), 3);
    }

    #[test]
    fn test_recentered_training_means_are_zero() {
        let data = FeatureMatrix::new(vec![
            vec![2.5, 0.5, 2.2, 1.9, 3.1, 2.3, 2.0, 1.0, 1.5, 1.1],
            vec![2.4, 0.7, 2.9, 2.2, 3.0, 2.7, 1.6, 1.1, 1.6, 0.9],
        ]).unwrap();
        let (_, augmented) = center(&data, &[0.0, 0.0]).unwrap();

        let training_rows: Vec<Vec<f64>> = augmented.matrix()
            .rows()
            .map(|r| r[1..].to_vec())
            .collect();
        let centered = FeatureMatrix::new(training_rows).unwrap();

        assert_eq!(round(&means(&centered).unwrap(), 9), vec![0.0, 0.0]);
    }

    #[test]
    fn test_center_query_dimension_mismatch() {
        let result = center(&data(), &[1.0, 2.0, 3.0]);

        assert_eq!(
            result.err(),
            Some(PcaError::DimensionMismatch { expected: 2, found: 3 })
        );
    }

    #[test]
    fn test_center_non_finite_query() {
        let result = center(&data(), &[1.0, f64::INFINITY]);

        assert!(matches!(result, Err(PcaError::InvalidInput(_))));
    }
}
