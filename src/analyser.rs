//! Dataset loading, column classification and the textual profile.
//!
//! ```no_run
//! use eda_report::analyser::{io, summary};
//!
//! let dataset = io::load_csv_path("sales.csv".as_ref())?;
//! let profile = summary::profile_dataset(&dataset);
//! println!("{profile}");
//! # Ok::<(), eda_report::error::ReportError>(())
//! ```

pub mod dataset;
pub mod io;
pub mod naming;
pub mod profiling;
pub mod summary;
pub mod types;

pub use dataset::Dataset;
pub use io::{load_csv_bytes, load_csv_path};
pub use summary::{ProfileBuilder, ProfileReport, ProfileSection, SectionKind, profile_dataset};
pub use types::{ColumnClassification, ColumnInfo, ColumnKind};
