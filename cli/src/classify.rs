use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use eigenspace::{
    Diagnostics, Eigenspace, NalgebraSolver, PipelineConfig, Recorder, TracingDiagnostics,
};
use serde_json::json;
use tracing::info;

use crate::{
    report,
    util::{self, DataType, DivisorArg, OrderArg},
};

/// Output format
#[derive(Debug, ValueEnum, Clone, Copy, PartialEq)]
pub enum Format {
    /// Human readable report
    Text,
    /// A single JSON document
    Json,
}

/// Find the training observation nearest to a query in eigenspace
#[derive(Debug, Args)]
#[command(version, about, long_about = None)]
pub struct ClassifyArgs {
    /// The query observation, one value per feature column
    #[arg(short, long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
    query: Vec<f64>,
    /// Covariance denominator
    #[arg(value_enum, long, default_value_t = DivisorArg::Sample)]
    divisor: DivisorArg,
    /// Order of the eigenspace axes
    #[arg(value_enum, long, default_value_t = OrderArg::Descending)]
    order: OrderArg,
    /// Threads used for the distance matrix
    #[arg(short, long, default_value_t = 1)]
    threads: usize,
    /// Output format
    #[arg(value_enum, short, long, default_value_t = Format::Text)]
    format: Format,
    /// Include every intermediate matrix in the output
    #[arg(short, long)]
    report: bool,
    /// The format of the file
    #[arg(value_enum, short, long)]
    datatype: Option<DataType>,
    /// CSV delimiter
    #[arg(long, default_value_t = String::from(","))]
    csv_delim: String,
    /// File containing training data, stdin if omitted
    filename: Option<PathBuf>,
}

pub fn classify_main(args: ClassifyArgs) -> Result<()> {
    let table = util::load_table(&args.filename, args.datatype, &args.csv_delim)?;
    let training = table.feature_matrix()?;
    info!(
        features = training.dimensions(),
        observations = training.samples(),
        "loaded training data"
    );

    let config = PipelineConfig {
        divisor: args.divisor.into(),
        order: args.order.into(),
        threads: args.threads,
    };
    let solver = NalgebraSolver::default();
    let mut recorder = Recorder::new();
    let mut tracing_diagnostics = TracingDiagnostics;
    let diagnostics: &mut dyn Diagnostics = if args.report {
        &mut recorder
    } else {
        &mut tracing_diagnostics
    };

    let space = Eigenspace::fit(training, config, &solver, diagnostics)
        .context("Error fitting eigenspace")?;
    let found = space
        .classify(&args.query, diagnostics)
        .context("Error classifying query")?;
    let label = table.label(found.index);

    match args.format {
        Format::Json => {
            let mut output = json!({
                "index": found.index,
                "distance": found.distance,
                "label": label,
                "distances": found.distances,
                "query_coordinates": found.query_coordinates,
                "config": config,
            });
            if args.report {
                output["report"] = serde_json::to_value(recorder.report())?;
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Format::Text => {
            if args.report {
                print!("{}", report::render(recorder.report(), &args.query));
            }
            println!("Smallest distance to new data: {:.4}", found.distance);
            println!("Closest point index in original training data: {}", found.index);
            if let Some(label) = label {
                println!("Closest point label: {}", label);
            }
        }
    }
    Ok(())
}
