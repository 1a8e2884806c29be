//! The assembled routing subgraph and its projected output rows.

use rustc_hash::FxHashSet;

use sn_core::{to_web_mercator, EdgeId, GeoPoint, MercatorCoord, NodeId};
use sn_network::{ArtificialEdge, Edge};

use crate::{AssembleError, AssembleResult};

// ── RoutingSubgraph ───────────────────────────────────────────────────────────

/// Original edges that survived the antijoin plus the artificial edges that
/// replace the superseded ones.
///
/// No original edge whose id appears in `superseded` is ever present.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutingSubgraph {
    /// Artificial vertex at the query point; `None` when nothing was snapped.
    pub start_node: Option<NodeId>,
    /// Wide-query edges minus the superseded ones, ascending by id.
    pub originals:  Vec<Edge>,
    pub artificial: Vec<ArtificialEdge>,
    /// Ids named by any artificial edge's `supersedes`, ascending.
    pub superseded: Vec<EdgeId>,
}

impl RoutingSubgraph {
    pub fn len(&self) -> usize {
        self.originals.len() + self.artificial.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty() && self.artificial.is_empty()
    }

    /// Originals first, then artificial edges.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.originals
            .iter()
            .chain(self.artificial.iter().map(|a| &a.edge))
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges().map(|e| e.id)
    }

    /// Rows in Web Mercator, ready for a routing engine or a writer.
    pub fn output_edges(&self) -> Vec<OutputEdge> {
        self.edges().map(OutputEdge::from_edge).collect()
    }

    /// Re-verify the structural guarantees of an assembled subgraph:
    ///
    /// - every edge id is unique;
    /// - no original id is in `superseded`;
    /// - every artificial edge supersedes at least one id, all of them
    ///   listed in `superseded`.
    pub fn check_invariants(&self) -> AssembleResult<()> {
        let superseded: FxHashSet<EdgeId> = self.superseded.iter().copied().collect();

        let mut seen = FxHashSet::default();
        for id in self.edge_ids() {
            if !seen.insert(id) {
                return Err(AssembleError::Invariant(format!("edge {id} appears twice")));
            }
        }
        if let Some(e) = self.originals.iter().find(|e| superseded.contains(&e.id)) {
            return Err(AssembleError::Invariant(format!(
                "original edge {} is superseded but still present",
                e.id
            )));
        }
        for a in &self.artificial {
            if a.supersedes.is_empty() {
                return Err(AssembleError::Invariant(format!(
                    "artificial edge {} supersedes nothing",
                    a.edge.id
                )));
            }
            if let Some(id) = a.supersedes.iter().find(|id| !superseded.contains(id)) {
                return Err(AssembleError::Invariant(format!(
                    "artificial edge {} supersedes unlisted edge {id}",
                    a.edge.id
                )));
            }
        }
        Ok(())
    }
}

// ── OutputEdge ────────────────────────────────────────────────────────────────

/// One edge as delivered to the routing engine.  Coordinates are Web Mercator
/// (EPSG:3857) metres.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputEdge {
    pub id:           EdgeId,
    pub source:       NodeId,
    pub target:       NodeId,
    pub length_m:     f64,
    pub cost:         f64,
    pub reverse_cost: f64,
    pub dead_end:     Option<bool>,
    pub coordinates:  Vec<MercatorCoord>,
}

impl OutputEdge {
    pub fn from_edge(edge: &Edge) -> Self {
        Self {
            id:           edge.id,
            source:       edge.source,
            target:       edge.target,
            length_m:     edge.length_m,
            cost:         edge.cost,
            reverse_cost: edge.reverse_cost,
            dead_end:     edge.dead_end,
            coordinates:  edge
                .geometry
                .coords()
                .map(|c| to_web_mercator(GeoPoint::from(*c)))
                .collect(),
        }
    }

    #[inline]
    pub fn is_artificial(&self) -> bool {
        self.id.is_artificial()
    }
}
