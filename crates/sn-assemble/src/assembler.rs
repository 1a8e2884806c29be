//! The `NetworkAssembler` and its request pipeline.

use rustc_hash::FxHashSet;
use tracing::{debug, info_span, warn};

use sn_core::{Buffer, CancellationToken, EdgeId, GeoPoint, RoutingModus, ScenarioId, SnapSettings, TravelBudget};
use sn_network::{ArtificialEdgeSplicer, Edge, EdgeQuery, EdgeQueryPort, Splice};

use crate::{AssembleError, AssembleResult, AssemblyObserver, NoopObserver, RoutingSubgraph, Stage};

// ── AssemblyRequest ───────────────────────────────────────────────────────────

/// Typed parameters of one subgraph request.
#[derive(Copy, Clone, Debug)]
pub struct AssemblyRequest<'a> {
    pub point:       GeoPoint,
    pub budget:      TravelBudget,
    pub modus:       RoutingModus,
    pub scenario_id: ScenarioId,
    pub profile:     &'a str,
}

// ── NetworkAssembler ──────────────────────────────────────────────────────────

/// Builds a [`RoutingSubgraph`] anchored at a query point.
///
/// # Pipeline
///
/// ```text
///   snap buffer ─→ narrow query ─→ splice ──┐
///                                           ├─→ antijoin + union ─→ subgraph
///   search buffer ─→ wide query ────────────┘
/// ```
///
/// The two branches share nothing and run under `rayon::join` with the
/// `parallel` feature.  The assembler holds no per-request state, so one
/// instance can serve concurrent requests.
///
/// Create via [`AssemblerBuilder`][crate::AssemblerBuilder].
pub struct NetworkAssembler<Q: EdgeQueryPort, S: ArtificialEdgeSplicer> {
    pub(crate) store:   Q,
    pub(crate) splicer: S,
    pub(crate) snap:    SnapSettings,
}

impl<Q: EdgeQueryPort, S: ArtificialEdgeSplicer> NetworkAssembler<Q, S> {
    pub fn snap_settings(&self) -> &SnapSettings {
        &self.snap
    }

    pub fn store(&self) -> &Q {
        &self.store
    }

    /// Run one request without observer callbacks.
    pub fn assemble(
        &self,
        request: &AssemblyRequest<'_>,
        cancel:  &CancellationToken,
    ) -> AssembleResult<RoutingSubgraph> {
        self.assemble_with(request, cancel, &mut NoopObserver)
    }

    /// Run one request, reporting per-stage counts to `observer`.
    ///
    /// Any collaborator failure aborts the request.  When both branches
    /// fail, the narrow branch's error is reported.
    pub fn assemble_with<O: AssemblyObserver>(
        &self,
        request:  &AssemblyRequest<'_>,
        cancel:   &CancellationToken,
        observer: &mut O,
    ) -> AssembleResult<RoutingSubgraph> {
        let span = info_span!(
            "assemble",
            lon      = request.point.lon,
            lat      = request.point.lat,
            modus    = %request.modus,
            scenario = %request.scenario_id,
            profile  = request.profile,
        );
        let _enter = span.enter();

        if cancel.is_cancelled() {
            return Err(AssembleError::Cancelled);
        }
        request.point.validate()?;

        // ── Buffers ───────────────────────────────────────────────────────
        let snap = Buffer::new(request.point, self.snap.snap_tolerance_m)?;
        let search = Buffer::new(request.point, request.budget.search_radius_m())?;
        if !search.contains_buffer(&snap) {
            warn!(
                snap_m   = snap.radius_m(),
                search_m = search.radius_m(),
                "snap buffer is not contained in the search buffer"
            );
        }

        // ── Narrow and wide branches ──────────────────────────────────────
        let (narrow, wide) = join(
            || span.in_scope(|| self.narrow_branch(request, &snap, cancel)),
            || span.in_scope(|| self.wide_branch(request, &search, cancel)),
        );
        let (narrow_count, splice) = narrow?;
        let wide = wide?;

        observer.on_narrow_query(narrow_count);
        let superseded_ids = splice.superseded_ids();
        observer.on_splice(splice.edges.len(), superseded_ids.len());
        observer.on_wide_query(wide.len());

        // ── Antijoin + union ──────────────────────────────────────────────
        let superseded: FxHashSet<EdgeId> = superseded_ids.iter().copied().collect();
        let wide_count = wide.len();
        let originals: Vec<Edge> = wide
            .into_iter()
            .filter(|e| !superseded.contains(&e.id))
            .collect();
        debug!(
            wide     = wide_count,
            excluded = wide_count - originals.len(),
            "antijoin"
        );

        let subgraph = RoutingSubgraph {
            start_node: splice.start_node,
            originals,
            artificial: splice.edges,
            superseded: superseded_ids,
        };
        debug!(
            edges      = subgraph.len(),
            artificial = subgraph.artificial.len(),
            "subgraph assembled"
        );
        observer.on_assembled(&subgraph);
        Ok(subgraph)
    }

    // ── Branches ──────────────────────────────────────────────────────────

    fn query<'a>(&self, request: &AssemblyRequest<'a>, region: &'a Buffer, dead_end_logic: bool) -> EdgeQuery<'a> {
        EdgeQuery {
            region:      region.polygon(),
            modus:       request.modus,
            scenario_id: request.scenario_id,
            speed_mps:   request.budget.speed_mps,
            profile:     request.profile,
            dead_end_logic,
        }
    }

    /// Snap-buffer query followed by the splice.  Returns the narrow edge
    /// count alongside the splice.
    fn narrow_branch(
        &self,
        request: &AssemblyRequest<'_>,
        snap:    &Buffer,
        cancel:  &CancellationToken,
    ) -> AssembleResult<(usize, Splice)> {
        let narrow = self
            .store
            .query_edges(&self.query(request, snap, false), cancel)
            .map_err(|e| AssembleError::upstream(Stage::NarrowQuery, e))?;
        debug!(edges = narrow.len(), "narrow query");

        let splice = self
            .splicer
            .splice(&narrow, request.point, self.snap.snap_tolerance_m, cancel)
            .map_err(|e| AssembleError::upstream(Stage::Splice, e))?;
        debug!(artificial = splice.edges.len(), "splice");
        Ok((narrow.len(), splice))
    }

    fn wide_branch(
        &self,
        request: &AssemblyRequest<'_>,
        search:  &Buffer,
        cancel:  &CancellationToken,
    ) -> AssembleResult<Vec<Edge>> {
        let wide = self
            .store
            .query_edges(&self.query(request, search, true), cancel)
            .map_err(|e| AssembleError::upstream(Stage::WideQuery, e))?;
        debug!(edges = wide.len(), "wide query");
        Ok(wide)
    }
}

// ── Branch join ───────────────────────────────────────────────────────────────

#[cfg(feature = "parallel")]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A:  FnOnce() -> RA + Send,
    B:  FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    rayon::join(a, b)
}

#[cfg(not(feature = "parallel"))]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA,
    B: FnOnce() -> RB,
{
    (a(), b())
}
