//! The `OutputWriter` trait implemented by all backend writers.

use crate::{EdgeRow, OutputResult, SummaryRow};

/// Trait implemented by the CSV and SQLite writers.
pub trait OutputWriter {
    /// Write the edges of one subgraph.
    fn write_edges(&mut self, rows: &[EdgeRow]) -> OutputResult<()>;

    /// Write one per-request summary row.
    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
