use serde::Serialize;
use tracing::debug;

use crate::{
    covariance::CovarianceMatrix,
    data::{AugmentedMatrix, DistanceMatrix, ProjectedMatrix},
    eigen::EigenDecomposition,
};

/// Observer for the intermediate artifacts of each pipeline stage.
///
/// Every method defaults to doing nothing, implementors pick the stages they
/// care about.
pub trait Diagnostics {
    fn covariance(&mut self, _covariance: &CovarianceMatrix) {}
    fn eigen(&mut self, _eigen: &EigenDecomposition) {}
    fn means(&mut self, _means: &[f64]) {}
    fn centered(&mut self, _centered: &AugmentedMatrix) {}
    fn projected(&mut self, _projected: &ProjectedMatrix) {}
    fn distances(&mut self, _distances: &DistanceMatrix) {}
}

pub struct NoDiagnostics;

impl Diagnostics for NoDiagnostics {}

/// Logs every artifact at debug level.
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn covariance(&mut self, covariance: &CovarianceMatrix) {
        debug!(matrix = ?covariance.matrix(), "covariance");
    }

    fn eigen(&mut self, eigen: &EigenDecomposition) {
        debug!(values = ?eigen.values(), vectors = ?eigen.vectors(), "eigen decomposition");
    }

    fn means(&mut self, means: &[f64]) {
        debug!(?means, "training means");
    }

    fn centered(&mut self, centered: &AugmentedMatrix) {
        debug!(matrix = ?centered.matrix(), "mean subtracted data, query first");
    }

    fn projected(&mut self, projected: &ProjectedMatrix) {
        debug!(matrix = ?projected.matrix(), "eigenspace coordinates");
    }

    fn distances(&mut self, distances: &DistanceMatrix) {
        debug!(matrix = ?distances.matrix(), "pairwise distances");
    }
}

/// Everything a [`Recorder`] saw, ready to be serialised next to a result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub covariance: Option<CovarianceMatrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eigen: Option<EigenDecomposition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub means: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centered: Option<AugmentedMatrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected: Option<ProjectedMatrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distances: Option<DistanceMatrix>,
}

/// Keeps a copy of each artifact.
#[derive(Debug, Default)]
pub struct Recorder {
    report: Report,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn into_report(self) -> Report {
        self.report
    }
}

impl Diagnostics for Recorder {
    fn covariance(&mut self, covariance: &CovarianceMatrix) {
        self.report.covariance = Some(covariance.clone());
    }

    fn eigen(&mut self, eigen: &EigenDecomposition) {
        self.report.eigen = Some(eigen.clone());
    }

    fn means(&mut self, means: &[f64]) {
        self.report.means = Some(means.to_vec());
    }

    fn centered(&mut self, centered: &AugmentedMatrix) {
        self.report.centered = Some(centered.clone());
    }

    fn projected(&mut self, projected: &ProjectedMatrix) {
        self.report.projected = Some(projected.clone());
    }

    fn distances(&mut self, distances: &DistanceMatrix) {
        self.report.distances = Some(distances.clone());
    }
}
