//! The external request shape and its entry point.
//!
//! Requests arrive as loosely typed records (coordinate arrays, modus as a
//! string).  [`RoutingRequest::validate`] turns one into a typed
//! [`AssemblyRequest`]; [`fetch_network_routing`] runs it and returns the
//! projected edge rows.

use serde::Deserialize;

use sn_core::{CancellationToken, GeoPoint, RoutingModus, ScenarioId, TravelBudget};
use sn_network::{ArtificialEdgeSplicer, EdgeQueryPort};

use crate::{AssembleError, AssembleResult, AssemblyRequest, NetworkAssembler, OutputEdge};

/// One subgraph request as received from a caller.
#[derive(Clone, Debug, Deserialize)]
pub struct RoutingRequest {
    /// Longitudes; exactly one element.
    pub x:               Vec<f64>,
    /// Latitudes; exactly one element.
    pub y:               Vec<f64>,
    /// Travel-time cutoff, seconds.
    pub max_cutoff:      f64,
    /// Travel speed, metres per second.
    pub speed:           f64,
    #[serde(default = "default_modus")]
    pub modus:           String,
    #[serde(default)]
    pub scenario_id:     i64,
    pub routing_profile: String,
}

fn default_modus() -> String {
    RoutingModus::Default.as_str().to_owned()
}

impl RoutingRequest {
    /// Check the request and convert it to typed parameters.
    ///
    /// `x` and `y` must hold exactly one coordinate each; multi-point
    /// requests are rejected rather than silently truncated.
    pub fn validate(&self) -> AssembleResult<AssemblyRequest<'_>> {
        let (lon, lat) = match (self.x.as_slice(), self.y.as_slice()) {
            ([lon], [lat]) => (*lon, *lat),
            (x, y) => {
                return Err(AssembleError::InvalidInput(format!(
                    "x and y must hold exactly one coordinate each, got {} and {}",
                    x.len(),
                    y.len()
                )));
            }
        };
        let point = GeoPoint::try_new(lon, lat)?;
        let budget = TravelBudget::new(self.max_cutoff, self.speed)?;
        let modus: RoutingModus = self.modus.parse()?;
        if self.routing_profile.trim().is_empty() {
            return Err(AssembleError::InvalidInput("routing profile is empty".into()));
        }

        Ok(AssemblyRequest {
            point,
            budget,
            modus,
            scenario_id: ScenarioId(self.scenario_id),
            profile:     &self.routing_profile,
        })
    }
}

/// Validate `request`, assemble the subgraph, and return its rows in Web
/// Mercator: surviving originals first (ascending id), then artificial edges.
pub fn fetch_network_routing<Q, S>(
    assembler: &NetworkAssembler<Q, S>,
    request:   &RoutingRequest,
    cancel:    &CancellationToken,
) -> AssembleResult<Vec<OutputEdge>>
where
    Q: EdgeQueryPort,
    S: ArtificialEdgeSplicer,
{
    let typed = request.validate()?;
    let subgraph = assembler.assemble(&typed, cancel)?;
    Ok(subgraph.output_edges())
}
