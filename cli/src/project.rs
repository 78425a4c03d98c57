use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use eigenspace::{table::Table, Eigenspace, PipelineConfig};

use crate::util::{self, DataType, DivisorArg, OrderArg};

/// Principal component analysis
#[derive(Debug, Args)]
#[command(version, about, long_about = None)]
pub struct ProjectArgs {
    /// Covariance denominator
    #[arg(value_enum, long, default_value_t = DivisorArg::Sample)]
    divisor: DivisorArg,
    /// Order of the eigenspace axes
    #[arg(value_enum, long, default_value_t = OrderArg::Descending)]
    order: OrderArg,
    /// Round coordinates to this many decimal places
    #[arg(short, long)]
    round: Option<i32>,
    /// The format of the file
    #[arg(value_enum, short, long)]
    datatype: Option<DataType>,
    /// CSV delimiter
    #[arg(long, default_value_t = String::from(","))]
    csv_delim: String,
    /// File containing training data, stdin if omitted
    filename: Option<PathBuf>,
}

pub fn project_main(args: ProjectArgs) -> Result<()> {
    let table = util::load_table(&args.filename, args.datatype, &args.csv_delim)?;
    let config = PipelineConfig {
        divisor: args.divisor.into(),
        order: args.order.into(),
        ..PipelineConfig::default()
    };

    let space = Eigenspace::fit_default(table.feature_matrix()?, config)
        .context("Error calculating pca")?;
    let mut projected = space.project_training()?;
    if let Some(places) = args.round {
        projected = projected.round(places);
    }

    let labels = table.label_header().zip(table.labels());
    let result = Table::from_projection(&projected, labels)?;
    println!("{}", result.to_csv(&args.csv_delim));
    Ok(())
}
