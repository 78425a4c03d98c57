use std::{
    fs::OpenOptions,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use eigenspace::{table::Table, Divisor, EigenOrder};
use thiserror::Error;

pub fn get_buff_reader(filename: &Option<PathBuf>) -> Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if let Some(filename) = filename {
        let file = OpenOptions::new()
            .read(true)
            .open(filename)
            .with_context(|| format!("Could not read file {}", filename.to_string_lossy()))?;

        Box::new(BufReader::new(file))
    } else {
        let stdin = io::stdin();
        Box::new(BufReader::new(stdin))
    };
    Ok(reader)
}

/// Read the training table from `filename`, or stdin when no file is given.
pub fn load_table(
    filename: &Option<PathBuf>,
    datatype: Option<DataType>,
    csv_delim: &str,
) -> Result<Table> {
    let reader = get_buff_reader(filename)?;

    let datatype = match (datatype, filename) {
        (Some(d), _) => d,
        (None, Some(f)) => DataType::from_filename(f)?,
        (None, None) => return Err(DataTypeError::Missing.into()),
    };

    match datatype {
        DataType::CSV => Table::from_csv(reader, csv_delim).context("Error parsing data"),
    }
}

#[derive(Debug, ValueEnum, Clone, Copy)]
pub enum DataType {
    /// Comma separated values
    CSV,
}

impl DataType {
    pub fn from_filename(filename: &PathBuf) -> Result<Self, DataTypeError> {
        let dt = filename.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| DataType::from_str(e, true).ok());

        match dt {
            Some(dt) => Ok(dt),
            None => Err(DataTypeError::CouldNotGetFromFileExt(
                filename.to_string_lossy().to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum DataTypeError {
    #[error("File extension couldn't be identified on {0}")]
    CouldNotGetFromFileExt(String),
    #[error("No file provided. --datatype must be specified")]
    Missing,
}

/// Covariance denominator
#[derive(Debug, ValueEnum, Clone, Copy)]
pub enum DivisorArg {
    /// Divide by N - 1
    Sample,
    /// Divide by N
    Population,
}

impl From<DivisorArg> for Divisor {
    fn from(value: DivisorArg) -> Self {
        match value {
            DivisorArg::Sample => Divisor::Sample,
            DivisorArg::Population => Divisor::Population,
        }
    }
}

/// Order of the eigenspace axes
#[derive(Debug, ValueEnum, Clone, Copy)]
pub enum OrderArg {
    /// Keep the order returned by the eigensolver
    Solver,
    /// Largest eigenvalue first
    Descending,
}

impl From<OrderArg> for EigenOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Solver => EigenOrder::Solver,
            OrderArg::Descending => EigenOrder::Descending,
        }
    }
}
