//! Assembly observer trait for per-stage statistics.

use crate::RoutingSubgraph;

/// Callbacks invoked by [`NetworkAssembler::assemble_with`] once each stage
/// has finished.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Callbacks run on the calling thread after
/// both query branches have joined, so `&mut self` is safe even with the
/// `parallel` feature.
///
/// # Example: stage counter
///
/// ```rust,ignore
/// struct Counts { narrow: usize, wide: usize }
///
/// impl AssemblyObserver for Counts {
///     fn on_narrow_query(&mut self, edges: usize) { self.narrow = edges; }
///     fn on_wide_query(&mut self, edges: usize) { self.wide = edges; }
/// }
/// ```
///
/// [`NetworkAssembler::assemble_with`]: crate::NetworkAssembler::assemble_with
pub trait AssemblyObserver {
    /// Edges returned by the snap-buffer query.
    fn on_narrow_query(&mut self, _edges: usize) {}

    /// Artificial edges emitted and distinct original ids they supersede.
    fn on_splice(&mut self, _artificial: usize, _superseded: usize) {}

    /// Edges returned by the search-buffer query, before exclusion.
    fn on_wide_query(&mut self, _edges: usize) {}

    /// Called once with the finished subgraph.
    fn on_assembled(&mut self, _subgraph: &RoutingSubgraph) {}
}

/// An [`AssemblyObserver`] that does nothing.
pub struct NoopObserver;

impl AssemblyObserver for NoopObserver {}
