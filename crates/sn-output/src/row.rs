//! Plain data row types written by output backends.

use geo::{Coord, LineString};
use wkt::ToWkt;

use sn_assemble::{OutputEdge, RoutingSubgraph};

/// One subgraph edge, Web Mercator geometry rendered as WKT.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRow {
    /// Caller-chosen request number, so several subgraphs can share a file.
    pub request:      u64,
    pub edge_id:      i64,
    pub source:       i64,
    pub target:       i64,
    pub length_m:     f64,
    pub cost:         f64,
    pub reverse_cost: f64,
    /// `None` for artificial edges and for queries without dead-end logic.
    pub dead_end:     Option<bool>,
    pub artificial:   bool,
    /// WKT `LINESTRING` in EPSG:3857 metres.
    pub wkt:          String,
}

impl EdgeRow {
    pub fn from_output(request: u64, edge: &OutputEdge) -> Self {
        Self {
            request,
            edge_id:      edge.id.get(),
            source:       edge.source.get(),
            target:       edge.target.get(),
            length_m:     edge.length_m,
            cost:         edge.cost,
            reverse_cost: edge.reverse_cost,
            dead_end:     edge.dead_end,
            artificial:   edge.is_artificial(),
            wkt:          linestring_wkt(edge),
        }
    }
}

fn linestring_wkt(edge: &OutputEdge) -> String {
    let line: LineString<f64> = edge
        .coordinates
        .iter()
        .map(|c| Coord { x: c.x, y: c.y })
        .collect();
    line.to_wkt().to_string()
}

/// Per-request statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRow {
    pub request:    u64,
    /// Artificial start node, if the point snapped to anything.
    pub start_node: Option<i64>,
    pub edges:      u64,
    pub artificial: u64,
    pub superseded: u64,
}

impl SummaryRow {
    pub fn from_subgraph(request: u64, subgraph: &RoutingSubgraph) -> Self {
        Self {
            request,
            start_node: subgraph.start_node.map(|n| n.get()),
            edges:      subgraph.len() as u64,
            artificial: subgraph.artificial.len() as u64,
            superseded: subgraph.superseded.len() as u64,
        }
    }
}
