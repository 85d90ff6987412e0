//! # eda-report
//!
//! Turns a CSV file into an analysis report: a textual profile of the
//! dataset, a set of charts chosen from the column types, and a PDF or DOCX
//! document combining the two. An optional AI step rewrites the profile
//! into prose and falls back to the raw profile when it fails.
//!
//! ## Quick Start
//!
//! ```no_run
//! use eda_report::ai::PassthroughSummarizer;
//! use eda_report::analyser::load_csv_path;
//! use eda_report::pipeline::{ReportRequest, generate_report};
//!
//! # async fn example() -> eda_report::error::Result<()> {
//! let dataset = load_csv_path("sales.csv".as_ref())?;
//! let report = generate_report(&dataset, &ReportRequest::default(), &PassthroughSummarizer).await?;
//! for warning in &report.warnings {
//!     println!("warning: {warning}");
//! }
//! std::fs::write(report.document.file_name(), &report.document.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`analyser`]: CSV loading, column classification and the dataset profile
//! - [`charts`]: exhibit selection, chart statistics and PNG rendering
//! - [`report`]: page layout and the PDF/DOCX writers
//! - [`ai`]: the summarizer trait, the OpenAI client and the fail-open wrapper
//! - [`pipeline`]: end-to-end generation with warning collection
//! - [`config`]: JSON settings
//! - [`error`]: error types and handling utilities
//! - [`logging`]: tracing subscriber setup
//!
//! ## Column Kinds
//!
//! Every stage branches on [`analyser::ColumnKind`]: integer and float
//! columns are numeric, dates and datetimes are temporal, everything else is
//! categorical. The profile and the chart plan are both pure functions of
//! the dataset; only rendering touches the filesystem.

#![warn(clippy::all, rust_2018_idioms)]

pub mod ai;
pub mod analyser;
pub mod charts;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod report;
