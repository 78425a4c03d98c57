//! Principal component analysis over a fixed training set, followed by a
//! nearest neighbour lookup of a query observation in the resulting
//! eigenspace.
//!
//! ```no_run
//! use eigenspace::{classify, Divisor, FeatureMatrix};
//!
//! let training = FeatureMatrix::new(vec![
//!     vec![2.5, 0.5, 2.2, 1.9, 3.1],
//!     vec![2.4, 0.7, 2.9, 2.2, 3.0],
//! ])?;
//! let found = classify(&training, &[2.511, 2.411], Divisor::Sample)?;
//! println!("closest: {} at {}", found.index, found.distance);
//! # Ok::<(), eigenspace::PcaError>(())
//! ```

pub mod centering;
pub mod covariance;
pub mod data;
pub mod diagnostics;
pub mod eigen;
pub mod error;
pub mod linalg;
pub mod neighbor;
pub mod pipeline;
pub mod projection;
pub mod table;

pub use covariance::{covariance, CovarianceMatrix, Divisor};
pub use data::{AugmentedMatrix, DistanceMatrix, FeatureMatrix, MeanVector, ProjectedMatrix};
pub use diagnostics::{Diagnostics, NoDiagnostics, Recorder, Report, TracingDiagnostics};
pub use eigen::{EigenDecomposition, EigenSolver, NalgebraSolver};
pub use error::PcaError;
pub use neighbor::Match;
pub use pipeline::{classify, Classification, EigenOrder, Eigenspace, PipelineConfig};
