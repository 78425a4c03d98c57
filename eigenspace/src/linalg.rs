use std::cmp::min;

use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    // Row major. Everything downstream works in f64 so the element type is
    // not generic.
    elements: Vec<f64>,
    width: usize,
    height: usize,
}

impl Matrix {
    pub fn new(elements: Vec<f64>, height: usize, width: usize) -> Result<Self, MatrixError> {
        if elements.len() != width * height {
            return Err(MatrixError::SizeMismatch);
        }

        Ok(Self {
            elements,
            height,
            width,
        })
    }

    /// Build a matrix from equal length rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, MatrixError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut elements = Vec::with_capacity(height * width);
        for row in rows {
            if row.len() != width {
                return Err(MatrixError::SizeMismatch);
            }
            elements.extend_from_slice(row);
        }
        Ok(Self {
            elements,
            width,
            height,
        })
    }

    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            elements: vec![0.0; height * width],
            width,
            height,
        }
    }

    pub fn mul(&self, matrix: &Matrix) -> Result<Matrix, MatrixError> {
        if self.width != matrix.height {
            return Err(MatrixError::SizeMismatch);
        }

        let mut elements: Vec<f64> = Vec::with_capacity(self.height * matrix.width);
        for ij in 0..self.height * matrix.width {
            let column = ij % matrix.width;
            let row = ij / matrix.width;
            let mut value = 0.0;
            for i in 0..self.width {
                let a = self.get_unchecked(row, i);
                let b = matrix.get_unchecked(i, column);
                value += a * b;
            }

            elements.push(value);
        }
        Ok(Matrix {
            elements,
            width: matrix.width,
            height: self.height,
        })
    }

    /// Subtract `values[i]` from every element of row `i`.
    pub fn sub_row_values(&self, values: &[f64]) -> Result<Self, MatrixError> {
        if values.len() != self.height {
            return Err(MatrixError::SizeMismatch);
        }
        let elements = self.elements.iter()
            .enumerate()
            .map(|(ij, a)| a - values[ij / self.width])
            .collect();
        Ok(Self {
            elements,
            width: self.width,
            height: self.height,
        })
    }

    pub fn get_col(&self, i: usize) -> Result<Vec<f64>, MatrixError> {
        if i >= self.width {
            return Err(MatrixError::OutOfBounds);
        }
        let mut elements: Vec<f64> = Vec::with_capacity(self.height);
        for j in 0..self.height {
            elements.push(self.get_unchecked(j, i));
        }
        Ok(elements)
    }

    pub fn get_row(&self, i: usize) -> Result<&[f64], MatrixError> {
        if i >= self.height {
            return Err(MatrixError::OutOfBounds);
        }
        Ok(&self.elements[i * self.width..(i + 1) * self.width])
    }

    pub fn set_col(&mut self, i: usize, column: &[f64]) -> Result<(), MatrixError> {
        if i >= self.width {
            return Err(MatrixError::OutOfBounds);
        }
        if column.len() != self.height {
            return Err(MatrixError::SizeMismatch);
        }

        for j in 0..self.height {
            self.set_unchecked(j, i, column[j]);
        }

        Ok(())
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64, MatrixError> {
        if row >= self.height || col >= self.width {
            Err(MatrixError::OutOfBounds)
        } else {
            Ok(self.get_unchecked(row, col))
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), MatrixError> {
        if row >= self.height || col >= self.width {
            Err(MatrixError::OutOfBounds)
        } else {
            self.set_unchecked(row, col, value);
            Ok(())
        }
    }

    pub fn set_unchecked(&mut self, row: usize, col: usize, value: f64) {
        self.elements[row * self.width + col] = value;
    }

    pub fn get_unchecked(&self, row: usize, col: usize) -> f64 {
        self.elements[row * self.width + col]
    }

    pub fn transpose(&self) -> Matrix {
        let mut elements: Vec<f64> = Vec::with_capacity(self.elements.len());
        for i in 0..self.width {
            for j in 0..self.height {
                elements.push(self.get_unchecked(j, i));
            }
        }
        Matrix {
            elements,
            width: self.height,
            height: self.width,
        }
    }

    pub fn round(&self, places: i32) -> Self {
        let shift = 10.0_f64.powi(places);
        let elements = self.elements.iter()
            .map(|a| (a * shift).round() / shift)
            .collect();
        Self {
            elements,
            width: self.width,
            height: self.height,
        }
    }

    pub fn identity(width: usize, height: usize) -> Self {
        let mut elements = vec![0.0; width * height];
        let n = min(width, height);
        for i in 0..n {
            elements[i * width + i] = 1.0;
        }
        Self {
            elements,
            width,
            height,
        }
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// True when the matrix is square and `|a_ij - a_ji| <= tolerance`
    /// everywhere.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        for i in 0..self.height {
            for j in i + 1..self.width {
                let diff = self.get_unchecked(i, j) - self.get_unchecked(j, i);
                if diff.abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }

    pub fn is_finite(&self) -> bool {
        self.elements.iter().all(|a| a.is_finite())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks panics on 0, an empty matrix has no rows to yield anyway
        self.elements.chunks(self.width.max(1)).take(self.height)
    }

    pub fn elements(&self) -> &[f64] {
        &self.elements
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

pub fn dot(u: &[f64], v: &[f64]) -> f64 {
    u.iter()
        .zip(v.iter())
        .fold(0.0, |acc, (a, b)| acc + a * b)
}

pub fn norm(u: &[f64]) -> f64 {
    u.iter()
        .fold(0.0, |acc, a| acc + a * a)
        .sqrt()
}

pub fn sub(u: &[f64], v: &[f64]) -> Vec<f64> {
    u.iter()
        .zip(v.iter())
        .map(|(a, b)| a - b)
        .collect()
}

/// Euclidean distance between two points of equal dimension.
pub fn euclid(u: &[f64], v: &[f64]) -> f64 {
    norm(&sub(u, v))
}

pub fn mean(u: &[f64]) -> f64 {
    u.iter().sum::<f64>() / u.len() as f64
}

pub fn round(u: &[f64], places: i32) -> Vec<f64> {
    let shift = 10.0_f64.powi(places);
    u.iter()
        .map(|a| (a * shift).round() / shift)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("matrix sizes do not match")]
    SizeMismatch,
    #[error("index out of bounds")]
    OutOfBounds,
    #[error("matrix is not square")]
    NotSquare,
}
