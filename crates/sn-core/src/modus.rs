//! Routing modus: which version of the network a query sees.

use std::str::FromStr;

use crate::CoreError;

/// Selects base network vs. scenario-edited network.
///
/// `Comparison` sees the same edges as `Scenario`; the distinction matters to
/// callers that run a base and a scenario request side by side.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum RoutingModus {
    /// Base network only.
    #[default]
    Default,
    /// Base network with the scenario's deletions and additions applied.
    Scenario,
    /// Scenario network, requested as half of a base/scenario comparison.
    Comparison,
}

impl RoutingModus {
    /// `true` if scenario edits apply to this modus.
    #[inline]
    pub fn applies_scenario(self) -> bool {
        !matches!(self, RoutingModus::Default)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoutingModus::Default    => "default",
            RoutingModus::Scenario   => "scenario",
            RoutingModus::Comparison => "comparison",
        }
    }
}

impl FromStr for RoutingModus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "default" => Ok(RoutingModus::Default),
            "scenario" => Ok(RoutingModus::Scenario),
            // Legacy clients send the misspelt token.
            "comparison" | "comparision" => Ok(RoutingModus::Comparison),
            other => Err(CoreError::UnknownModus(other.to_owned())),
        }
    }
}

impl std::fmt::Display for RoutingModus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
