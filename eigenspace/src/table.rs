use std::io::BufRead;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::{data::FeatureMatrix, linalg::Matrix};

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColType {
    Numeric,
    Label,
}

/// Observations read from delimited text, one observation per line.
///
/// Numeric columns are the features. At most one column may hold text, it is
/// kept as the label of each observation.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    col_types: Vec<ColType>,
    numerics: Vec<Vec<f64>>,
    labels: Vec<String>,
    col_to_numeric: Vec<Option<usize>>,
    label_col: Option<usize>,
    len: usize,
}

impl Table {
    pub fn from_csv(reader: Box<dyn BufRead>, delimiter: &str) -> Result<Self> {
        let context = "Parsing CSV to Table";

        let mut lines = reader.lines();
        let mut headers = String::from("#");
        while headers.starts_with('#') || headers.trim().is_empty() {
            headers = match lines.next() {
                Some(l) => l.context(context)?,
                None => return Err(TableParserError::EmptyFile).context(context),
            };
        }
        let headers: Vec<String> = headers
            .split(delimiter)
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for line in lines {
            let line = line.context(context)?;
            if line.trim().is_empty() {
                continue;
            }
            let entries: Vec<String> = line.split(delimiter).map(|e| e.trim().to_string()).collect();
            if entries.len() != headers.len() {
                return Err(TableParserError::LineSizeConflict(rows.len() + 1)).context(context);
            }
            rows.push(entries);
        }
        if rows.is_empty() {
            return Err(TableParserError::NoData).context(context);
        }

        // A column is numeric only if every observation parses
        let mut col_types = Vec::<ColType>::with_capacity(headers.len());
        let mut numerics = Vec::<Vec<f64>>::with_capacity(headers.len());
        let mut labels = Vec::<String>::new();
        let mut col_to_numeric = Vec::<Option<usize>>::with_capacity(headers.len());
        let mut label_col = None;
        for i in 0..headers.len() {
            let parsed: Result<Vec<f64>, _> = rows.iter().map(|r| r[i].parse::<f64>()).collect();
            match parsed {
                Ok(column) => {
                    col_types.push(ColType::Numeric);
                    col_to_numeric.push(Some(numerics.len()));
                    numerics.push(column);
                }
                Err(_) => {
                    if label_col.is_some() {
                        return Err(TableParserError::MultipleLabelColumns).context(context);
                    }
                    col_types.push(ColType::Label);
                    col_to_numeric.push(None);
                    label_col = Some(i);
                    labels = rows.iter().map(|r| r[i].clone()).collect();
                }
            }
        }
        let len = rows.len();

        Ok(Self {
            headers,
            col_types,
            numerics,
            labels,
            col_to_numeric,
            label_col,
            len,
        })
    }

    /// Eigenspace coordinates as a table with one `pcN` column per component.
    /// `labels` carries the label header and one label per observation.
    pub fn from_projection(projected: &Matrix, labels: Option<(&str, &[String])>) -> Result<Self> {
        let components = projected.height();
        let mut headers: Vec<String> = (1..=components).map(|i| format!("pc{}", i)).collect();
        let mut col_types = vec![ColType::Numeric; components];
        let mut col_to_numeric: Vec<Option<usize>> = (0..components).map(Some).collect();
        let numerics: Vec<Vec<f64>> = projected.rows().map(|r| r.to_vec()).collect();

        let (label_col, labels) = match labels {
            Some((header, labels)) => {
                if labels.len() != projected.width() {
                    return Err(TableError::LabelCountMismatch {
                        labels: labels.len(),
                        observations: projected.width(),
                    }.into());
                }
                headers.push(header.to_string());
                col_types.push(ColType::Label);
                col_to_numeric.push(None);
                (Some(components), labels.to_vec())
            }
            None => (None, vec![]),
        };

        Ok(Self {
            headers,
            col_types,
            numerics,
            labels,
            col_to_numeric,
            label_col,
            len: projected.width(),
        })
    }

    pub fn to_csv(&self, delimiter: &str) -> String {
        let mut lines = Vec::with_capacity(self.len + 1);
        lines.push(self.headers.join(delimiter));
        for i in 0..self.len {
            let mut line: Vec<String> = Vec::with_capacity(self.headers.len());
            for j in 0..self.headers.len() {
                let value = match self.col_to_numeric[j] {
                    Some(index) => self.numerics[index][i].to_string(),
                    None => self.labels[i].clone(),
                };
                line.push(value);
            }
            lines.push(line.join(delimiter));
        }
        lines.join("\n")
    }

    /// Features as rows, observations as columns.
    pub fn feature_matrix(&self) -> Result<FeatureMatrix> {
        if self.numerics.is_empty() {
            return Err(TableError::NoFeatureColumns.into());
        }
        FeatureMatrix::new(self.numerics.clone()).context("Building feature matrix from table")
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.headers.iter()
            .zip(self.col_types.iter())
            .filter(|(_, t)| **t == ColType::Numeric)
            .map(|(h, _)| h.as_str())
            .collect()
    }

    pub fn label_header(&self) -> Option<&str> {
        self.label_col.map(|i| self.headers[i].as_str())
    }

    pub fn labels(&self) -> Option<&[String]> {
        self.label_col.map(|_| self.labels.as_slice())
    }

    pub fn label(&self, observation: usize) -> Option<&str> {
        self.labels()
            .and_then(|l| l.get(observation))
            .map(|l| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Error)]
enum TableError {
    #[error("table has no numeric feature columns")]
    NoFeatureColumns,
    #[error("{labels} labels for {observations} observations")]
    LabelCountMismatch { labels: usize, observations: usize },
}

#[derive(Debug, PartialEq, Error)]
enum TableParserError {
    #[error("EmptyFile")]
    EmptyFile,
    #[error("NoData")]
    NoData,
    #[error("LineSizeConflict on line {0}")]
    LineSizeConflict(usize),
    #[error("more than one non-numeric column")]
    MultipleLabelColumns,
}
