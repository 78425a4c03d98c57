use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    centering::{center_with, means},
    covariance::{covariance, Divisor},
    data::{FeatureMatrix, MeanVector},
    diagnostics::{Diagnostics, NoDiagnostics},
    eigen::{EigenDecomposition, EigenSolver, NalgebraSolver},
    error::{PcaError, Result},
    linalg::Matrix,
    neighbor::{closest, distance_matrix_parallel},
    projection::{project, rotate},
};

/// Order of the eigenspace axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EigenOrder {
    /// Whatever order the solver produced.
    Solver,
    /// Largest eigenvalue first.
    #[default]
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
    pub divisor: Divisor,
    pub order: EigenOrder,
    /// Threads used for the distance matrix, 1 keeps it on the caller's
    /// thread.
    pub threads: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            divisor: Divisor::default(),
            order: EigenOrder::default(),
            threads: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// Index of the closest observation in the training set.
    pub index: usize,
    /// Euclidean distance to it in eigenspace.
    pub distance: f64,
    /// Query distance to itself followed by the distance to each training
    /// observation.
    pub distances: Vec<f64>,
    pub query_coordinates: Vec<f64>,
}

/// A basis fitted once to a fixed training set. Nothing is updated after
/// [`Eigenspace::fit`] returns.
#[derive(Debug, Clone)]
pub struct Eigenspace {
    training: FeatureMatrix,
    eigen: EigenDecomposition,
    means: MeanVector,
    config: PipelineConfig,
}

impl Eigenspace {
    #[instrument(skip_all, fields(dimensions = training.dimensions(), samples = training.samples()))]
    pub fn fit(
        training: FeatureMatrix,
        config: PipelineConfig,
        solver: &dyn EigenSolver,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<Self> {
        let cov = covariance(&training, config.divisor)?;
        diagnostics.covariance(&cov);

        let eigen = solver.decompose(&cov)?;
        if eigen.dimensions() != training.dimensions()
            || eigen.vectors().height() != training.dimensions()
        {
            return Err(PcaError::DecompositionFailure(format!(
                "expected {} eigenpairs, solver returned {}",
                training.dimensions(),
                eigen.dimensions(),
            )));
        }
        let eigen = match config.order {
            EigenOrder::Solver => eigen,
            EigenOrder::Descending => eigen.sorted_descending()?,
        };
        diagnostics.eigen(&eigen);

        let means = means(&training)?;
        diagnostics.means(&means);

        if let Some((position, value)) = eigen.dominant() {
            info!(position, value, "largest eigenvalue");
        }

        Ok(Self {
            training,
            eigen,
            means,
            config,
        })
    }

    /// Fit with the default solver and no diagnostics.
    pub fn fit_default(training: FeatureMatrix, config: PipelineConfig) -> Result<Self> {
        Self::fit(training, config, &NalgebraSolver::default(), &mut NoDiagnostics)
    }

    #[instrument(skip_all)]
    pub fn classify(&self, query: &[f64], diagnostics: &mut dyn Diagnostics) -> Result<Classification> {
        let centered = center_with(&self.training, query, &self.means)?;
        diagnostics.centered(&centered);

        let projected = project(&centered, &self.eigen)?;
        diagnostics.projected(&projected);

        let distances = distance_matrix_parallel(&projected, self.config.threads)?;
        diagnostics.distances(&distances);

        let found = closest(&distances)?;
        info!(index = found.index, distance = found.distance, "classified query");

        Ok(Classification {
            index: found.index,
            distance: found.distance,
            distances: found.distances,
            query_coordinates: projected.query()?,
        })
    }

    /// Eigenspace coordinates of the training observations, one column per
    /// observation in the original order.
    pub fn project_training(&self) -> Result<Matrix> {
        let centered = self.training.matrix().sub_row_values(&self.means)?;
        rotate(&centered, &self.eigen)
    }

    pub fn eigen(&self) -> &EigenDecomposition {
        &self.eigen
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn training(&self) -> &FeatureMatrix {
        &self.training
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

/// Fit a basis to `training` and classify a single `query` against it.
pub fn classify(training: &FeatureMatrix, query: &[f64], divisor: Divisor) -> Result<Classification> {
    let config = PipelineConfig {
        divisor,
        ..PipelineConfig::default()
    };
    Eigenspace::fit_default(training.clone(), config)?.classify(query, &mut NoDiagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        covariance::CovarianceMatrix,
        diagnostics::Recorder,
        linalg::{euclid, round},
    };

    fn smith() -> FeatureMatrix {
        FeatureMatrix::new(vec![
            vec![2.5, 0.5, 2.2, 1.9, 3.1, 2.3, 2.0, 1.0, 1.5, 1.1],
            vec![2.4, 0.7, 2.9, 2.2, 3.0, 2.7, 1.6, 1.1, 1.6, 0.9],
        ]).unwrap()
    }

    struct FailingSolver;

    impl EigenSolver for FailingSolver {
        fn decompose(&self, _covariance: &CovarianceMatrix) -> Result<EigenDecomposition> {
            Err(PcaError::DecompositionFailure("no convergence".into()))
        }
    }

    struct TruncatingSolver;

    impl EigenSolver for TruncatingSolver {
        fn decompose(&self, _covariance: &CovarianceMatrix) -> Result<EigenDecomposition> {
            EigenDecomposition::new(vec![1.0], Matrix::identity(1, 1))
        }
    }

    #[test]
    fn test_classify_smith() {
        let result = classify(&smith(), &[2.511, 2.411], Divisor::Sample).unwrap();

        assert_eq!(result.index, 0);
        assert_eq!(round(&[result.distance], 6), vec![0.015556]);
        assert_eq!(result.distances.len(), 11);
        assert_eq!(result.distances[0], 0.0);
        assert_eq!(
            round(&result.distances[1..], 6),
            vec![0.015556, 2.640387, 0.579519, 0.646407, 0.832972, 0.35783, 0.958562, 2.00046, 1.296087, 2.067376],
        );
    }

    #[test]
    fn test_classify_is_independent_of_conventions() {
        for divisor in [Divisor::Sample, Divisor::Population] {
            for order in [EigenOrder::Solver, EigenOrder::Descending] {
                let config = PipelineConfig { divisor, order, threads: 2 };
                let space = Eigenspace::fit_default(smith(), config).unwrap();

                let result = space.classify(&[1.45, 1.55], &mut NoDiagnostics).unwrap();

                assert_eq!(result.index, 8);
            }
        }
    }

    #[test]
    fn test_fit_smith_dominant_axis() {
        let space = Eigenspace::fit_default(smith(), PipelineConfig::default()).unwrap();

        let (position, value) = space.eigen().dominant().unwrap();
        assert_eq!(position, 0);
        assert_eq!(round(&[value], 6), vec![1.284028]);
        assert_eq!(round(space.means(), 6), vec![1.81, 1.91]);
        assert_eq!(round(&space.eigen().explained_variance(), 3), vec![0.963, 0.037]);
    }

    #[test]
    fn test_classify_two_training_points() {
        let training = FeatureMatrix::new(vec![
            vec![0.0, 4.0],
            vec![0.0, 2.0],
        ]).unwrap();

        let result = classify(&training, &[3.0, 1.0], Divisor::Sample).unwrap();

        assert_eq!(result.index, 1);
        assert!((result.distance - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_classify_query_on_training_point() {
        let result = classify(&smith(), &[1.9, 2.2], Divisor::Sample).unwrap();

        assert_eq!(result.index, 3);
        assert_eq!(result.distance, 0.0);
    }

    #[test]
    fn test_classify_dimension_mismatch() {
        let result = classify(&smith(), &[1.0, 2.0, 3.0], Divisor::Sample);

        assert_eq!(
            result.err(),
            Some(PcaError::DimensionMismatch { expected: 2, found: 3 })
        );
    }

    #[test]
    fn test_fit_single_observation() {
        let training = FeatureMatrix::new(vec![vec![1.0], vec![2.0]]).unwrap();

        let result = Eigenspace::fit_default(training, PipelineConfig::default());

        assert!(matches!(result, Err(PcaError::InvalidInput(_))));
    }

    #[test]
    fn test_fit_empty_training_set() {
        let training = FeatureMatrix::new(vec![vec![], vec![]]).unwrap();

        let result = Eigenspace::fit_default(training, PipelineConfig::default());

        assert!(matches!(result, Err(PcaError::EmptyDataset)));
    }

    #[test]
    fn test_fit_propagates_solver_failure() {
        let result = Eigenspace::fit(smith(), PipelineConfig::default(), &FailingSolver, &mut NoDiagnostics);

        assert!(matches!(result, Err(PcaError::DecompositionFailure(_))));
    }

    #[test]
    fn test_fit_rejects_basis_of_wrong_size() {
        let result = Eigenspace::fit(smith(), PipelineConfig::default(), &TruncatingSolver, &mut NoDiagnostics);

        assert!(matches!(result, Err(PcaError::DecompositionFailure(_))));
    }

    #[test]
    fn test_recorder_sees_every_stage() {
        let mut recorder = Recorder::new();
        let space = Eigenspace::fit(
            smith(),
            PipelineConfig::default(),
            &NalgebraSolver::default(),
            &mut recorder,
        ).unwrap();
        space.classify(&[2.511, 2.411], &mut recorder).unwrap();

        let report = recorder.into_report();
        assert!(report.covariance.is_some());
        assert!(report.eigen.is_some());
        assert_eq!(report.means.as_ref().map(|m| m.len()), Some(2));
        assert_eq!(report.centered.as_ref().map(|c| c.matrix().width()), Some(11));
        assert_eq!(report.projected.as_ref().map(|p| p.point_count()), Some(11));
        assert_eq!(report.distances.as_ref().map(|d| d.matrix().height()), Some(11));
    }

    #[test]
    fn test_project_training_preserves_distances() {
        let data = smith();
        let space = Eigenspace::fit_default(data.clone(), PipelineConfig::default()).unwrap();

        let projected = space.project_training().unwrap();

        let original = data.matrix();
        for a in 0..original.width() {
            for b in a + 1..original.width() {
                let before = euclid(&original.get_col(a).unwrap(), &original.get_col(b).unwrap());
                let after = euclid(&projected.get_col(a).unwrap(), &projected.get_col(b).unwrap());
                assert!((before - after).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_project_training_matches_classify_projection() {
        let mut recorder = Recorder::new();
        let space = Eigenspace::fit(
            smith(),
            PipelineConfig::default(),
            &NalgebraSolver::default(),
            &mut recorder,
        ).unwrap();
        space.classify(&[2.511, 2.411], &mut recorder).unwrap();

        let training = space.project_training().unwrap();

        let report = recorder.into_report();
        let projected = report.projected.unwrap();
        assert_eq!(training.width() + 1, projected.point_count());
        for k in 0..training.width() {
            let expected = projected.matrix().get_col(k + 1).unwrap();
            let found = training.get_col(k).unwrap();
            for (a, b) in expected.iter().zip(found.iter()) {
                assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
            }
        }
    }
}
