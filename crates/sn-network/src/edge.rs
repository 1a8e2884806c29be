//! Edge records pulled from the store and the artificial edges derived from
//! them.

use geo::LineString;

use sn_core::{EdgeId, GeoPoint, NodeId};

/// One directed network edge as returned by an [`EdgeQueryPort`].
///
/// Records are immutable for the lifetime of a request.  A negative `cost`
/// or `reverse_cost` marks that direction as not traversable.
///
/// [`EdgeQueryPort`]: crate::EdgeQueryPort
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub id:           EdgeId,
    pub source:       NodeId,
    pub target:       NodeId,
    /// Physical length in metres.
    pub length_m:     f64,
    pub cost:         f64,
    pub reverse_cost: f64,
    /// Populated only by queries that run dead-end logic.
    pub dead_end:     Option<bool>,
    /// WGS84 lon/lat coordinates, source to target.
    pub geometry:     LineString<f64>,
}

impl Edge {
    /// Geometry as a sequence of [`GeoPoint`]s.
    pub fn points(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.geometry.coords().map(|c| GeoPoint::from(*c))
    }
}

/// An edge created by splitting an original edge at the query point.
///
/// Never persisted.  `supersedes` names the original edge(s) this record
/// replaces; those originals must not appear next to it in a subgraph.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtificialEdge {
    pub edge:       Edge,
    pub supersedes: Vec<EdgeId>,
}
