//! Typed edge-store query and the port trait the assembler calls through.

use geo::Polygon;

use sn_core::{CancellationToken, RoutingModus, ScenarioId};

use crate::{Edge, NetworkResult};

/// Filter parameters for one region query.
#[derive(Clone, Debug)]
pub struct EdgeQuery<'a> {
    /// WGS84 region; every returned edge intersects it.
    pub region:         &'a Polygon<f64>,
    pub modus:          RoutingModus,
    pub scenario_id:    ScenarioId,
    /// Travel speed in m/s; stores may derive travel-time costs from it.
    pub speed_mps:      f64,
    /// Opaque routing profile token, validated by the store.
    pub profile:        &'a str,
    /// Populate [`Edge::dead_end`] on the returned edges.
    pub dead_end_logic: bool,
}

/// Abstraction over a spatial edge store.
///
/// # Contract
///
/// - Returns every edge intersecting `query.region` that is traversable
///   under the modus / scenario / profile filters.
/// - Deterministic for a fixed store state; may return an empty `Vec`.
/// - All-or-nothing: a call either returns the full result or an error.
/// - Implementations should poll `cancel` and return
///   [`NetworkError::Cancelled`](crate::NetworkError::Cancelled) promptly.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; the assembler may run the narrow
/// and wide queries concurrently.
pub trait EdgeQueryPort: Send + Sync {
    fn query_edges(
        &self,
        query:  &EdgeQuery<'_>,
        cancel: &CancellationToken,
    ) -> NetworkResult<Vec<Edge>>;
}
