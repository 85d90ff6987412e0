//! `eda-report` command-line entry point.
//!
//! ```bash
//! eda-report generate sales.csv --format pdf
//! eda-report profile sales.csv
//! eda-report init-config settings.json
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)]

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let log_dir = if cli.no_log_file {
        None
    } else {
        cli.log_dir
            .clone()
            .or_else(|| eda_report::logging::default_log_dir().ok())
    };
    eda_report::logging::init(log_dir.as_deref())?;

    tokio::runtime::Runtime::new()?.block_on(cli::run_command(cli.command))
}
