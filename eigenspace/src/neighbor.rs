use std::{sync::mpsc, thread};

use serde::Serialize;
use tracing::debug;

use crate::{
    data::{DistanceMatrix, ProjectedMatrix},
    error::{PcaError, Result},
    linalg::{euclid, Matrix},
};

/// The training observation closest to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// Index into the original training set, the query column excluded.
    pub index: usize,
    pub distance: f64,
    /// Row 0 of the distance matrix: the query's distance to itself followed
    /// by its distance to every training point.
    pub distances: Vec<f64>,
}

fn columns(projected: &ProjectedMatrix) -> Result<Vec<Vec<f64>>> {
    let matrix = projected.matrix();
    let mut columns = Vec::with_capacity(matrix.width());
    for i in 0..matrix.width() {
        columns.push(matrix.get_col(i)?);
    }
    Ok(columns)
}

/// Euclidean distance between every pair of projected columns.
pub fn distance_matrix(projected: &ProjectedMatrix) -> Result<DistanceMatrix> {
    let columns = columns(projected)?;
    let m = columns.len();
    let mut matrix = Matrix::zeros(m, m);
    for i in 0..m {
        for j in i + 1..m {
            let d = euclid(&columns[i], &columns[j]);
            matrix.set(i, j, d)?;
            matrix.set(j, i, d)?;
        }
    }
    Ok(DistanceMatrix(matrix))
}

/// [`distance_matrix`] with rows split across `threads` scoped threads.
///
/// Rows have no dependency on each other so every thread computes its chunk
/// in full and sends the rows back over a channel.
pub fn distance_matrix_parallel(projected: &ProjectedMatrix, threads: usize) -> Result<DistanceMatrix> {
    let threads = threads.max(1);
    if threads == 1 {
        return distance_matrix(projected);
    }

    let columns = columns(projected)?;
    let m = columns.len();
    let rows: Vec<usize> = (0..m).collect();
    let chunk_size = m.div_ceil(threads).max(1);
    let (sender, receiver) = mpsc::channel::<(usize, Vec<f64>)>();

    thread::scope(|s| {
        for chunk in rows.chunks(chunk_size) {
            let sender = sender.clone();
            let columns = &columns;
            s.spawn(move || {
                for &i in chunk {
                    let row = columns.iter()
                        .enumerate()
                        .map(|(j, c)| if i == j { 0.0 } else { euclid(&columns[i], c) })
                        .collect();
                    if sender.send((i, row)).is_err() {
                        return;
                    }
                }
            });
        }
    });
    drop(sender);

    let mut matrix = Matrix::zeros(m, m);
    for (i, row) in receiver {
        for (j, d) in row.into_iter().enumerate() {
            matrix.set(i, j, d)?;
        }
    }
    debug!(points = m, threads, "computed distance matrix in parallel");
    Ok(DistanceMatrix(matrix))
}

/// Pick the closest training column from row 0 of `distances`.
///
/// Column 0 is the query itself and is never considered. A training point at
/// distance 0 is a legitimate match. Ties go to the lowest training index.
pub fn closest(distances: &DistanceMatrix) -> Result<Match> {
    if distances.matrix().height() < 2 {
        return Err(PcaError::EmptyDataset);
    }
    let row = distances.row(0)?;

    let mut best: Option<(usize, f64)> = None;
    for (column, d) in row.iter().enumerate().skip(1) {
        match best {
            Some((_, b)) if *d >= b => {}
            _ => best = Some((column, *d)),
        }
    }
    let (column, distance) = best.ok_or(PcaError::EmptyDataset)?;
    debug!(index = column - 1, distance, "found nearest training point");

    Ok(Match {
        index: column - 1,
        distance,
        distances: row.to_vec(),
    })
}

/// Closest training point to the query held in column 0 of `projected`.
pub fn nearest(projected: &ProjectedMatrix) -> Result<Match> {
    if projected.point_count() < 2 {
        return Err(PcaError::EmptyDataset);
    }
    closest(&distance_matrix(projected)?)
}
