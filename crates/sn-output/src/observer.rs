//! `SubgraphOutputObserver<W>`: bridges `AssemblyObserver` to an `OutputWriter`.

use sn_assemble::{AssemblyObserver, RoutingSubgraph};

use crate::row::{EdgeRow, SummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// An [`AssemblyObserver`] that writes every assembled subgraph to any
/// [`OutputWriter`] backend.
///
/// Each `on_assembled` call is numbered, starting at 0, and its rows carry
/// that number in the `request` column.  Writer errors are stored because
/// observer methods have no return value; check with
/// [`take_error`][Self::take_error] or [`finish`][Self::finish].
pub struct SubgraphOutputObserver<W: OutputWriter> {
    writer:       W,
    next_request: u64,
    last_error:   Option<OutputError>,
}

impl<W: OutputWriter> SubgraphOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, next_request: 0, last_error: None }
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Number of subgraphs written so far.
    pub fn requests(&self) -> u64 {
        self.next_request
    }

    /// Finish the writer, reporting the first stored error if there was one.
    pub fn finish(&mut self) -> OutputResult<()> {
        if let Some(e) = self.last_error.take() {
            return Err(e);
        }
        self.writer.finish()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> AssemblyObserver for SubgraphOutputObserver<W> {
    fn on_assembled(&mut self, subgraph: &RoutingSubgraph) {
        let request = self.next_request;
        self.next_request += 1;

        let rows: Vec<EdgeRow> = subgraph
            .output_edges()
            .iter()
            .map(|e| EdgeRow::from_output(request, e))
            .collect();
        let result = self.writer.write_edges(&rows);
        self.store_err(result);

        let result = self.writer.write_summary(&SummaryRow::from_subgraph(request, subgraph));
        self.store_err(result);
    }
}
