//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `edges.csv`
//! - `summary.csv`
//!
//! Optional values (`dead_end`, `start_node`) are written as empty fields.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{EdgeRow, OutputResult, SummaryRow};
use crate::writer::OutputWriter;

/// Writes subgraph output to two CSV files.
pub struct CsvWriter {
    edges:    Writer<File>,
    summary:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut edges = Writer::from_path(dir.join("edges.csv"))?;
        edges.write_record([
            "request", "id", "source", "target", "length_m", "cost", "reverse_cost",
            "dead_end", "artificial", "geometry",
        ])?;

        let mut summary = Writer::from_path(dir.join("summary.csv"))?;
        summary.write_record(["request", "start_node", "edges", "artificial", "superseded"])?;

        Ok(Self {
            edges,
            summary,
            finished: false,
        })
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_edges(&mut self, rows: &[EdgeRow]) -> OutputResult<()> {
        for row in rows {
            self.edges.write_record(&[
                row.request.to_string(),
                row.edge_id.to_string(),
                row.source.to_string(),
                row.target.to_string(),
                row.length_m.to_string(),
                row.cost.to_string(),
                row.reverse_cost.to_string(),
                opt(row.dead_end.map(u8::from)),
                (row.artificial as u8).to_string(),
                row.wkt.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[
            row.request.to_string(),
            opt(row.start_node),
            row.edges.to_string(),
            row.artificial.to_string(),
            row.superseded.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.edges.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
