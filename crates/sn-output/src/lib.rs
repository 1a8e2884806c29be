//! `sn-output`: subgraph output writers for the snapnet extractor.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                   |
//! |-----------|---------|---------------------------------|
//! | *(none)*  | CSV     | `edges.csv`, `summary.csv`      |
//! | `sqlite`  | SQLite  | `subgraph.db`                   |
//!
//! Both backends implement [`OutputWriter`] and can be driven by
//! [`SubgraphOutputObserver`], which implements
//! `sn_assemble::AssemblyObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sn_output::{CsvWriter, SubgraphOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SubgraphOutputObserver::new(writer);
//! assembler.assemble_with(&request, &cancel, &mut obs)?;
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SubgraphOutputObserver;
pub use row::{EdgeRow, SummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
