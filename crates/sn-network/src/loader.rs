//! CSV edge loader.
//!
//! # CSV format
//!
//! One row per edge.  `geometry` is a WGS84 WKT `LINESTRING`; it contains
//! commas, so the field must be quoted.
//!
//! ```csv
//! id,source,target,length_m,cost,reverse_cost,profiles,scenario_id,deleted_in,geometry
//! 1,10,11,,,,walking_standard;cycling,,,"LINESTRING(11.5400 48.1955, 11.5460 48.1955)"
//! 2,11,12,430.5,310.0,-1,walking_standard,,3,"LINESTRING(11.5460 48.1955, 11.5500 48.1980)"
//! 3,11,13,,,,walking_standard,3,,"LINESTRING(11.5460 48.1955, 11.5461 48.1990)"
//! ```
//!
//! | Column         | Meaning                                                |
//! |----------------|--------------------------------------------------------|
//! | `length_m`     | empty → geodesic length of `geometry`                  |
//! | `cost`, `reverse_cost` | empty → travel seconds at the query speed      |
//! | `profiles`     | `;`-separated routing profiles                         |
//! | `scenario_id`  | empty for base edges; set for scenario-only edges      |
//! | `deleted_in`   | `;`-separated scenarios that delete this base edge     |

use std::io::Read;
use std::path::Path;

use geo::LineString;
use serde::Deserialize;
use wkt::TryFromWkt;

use sn_core::ScenarioId;

use crate::{EdgeSpec, MemoryEdgeStore, MemoryEdgeStoreBuilder, NetworkError, NetworkResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct EdgeRecord {
    id:           i64,
    source:       i64,
    target:       i64,
    length_m:     Option<f64>,
    cost:         Option<f64>,
    reverse_cost: Option<f64>,
    profiles:     String,
    scenario_id:  Option<i64>,
    deleted_in:   Option<String>,
    geometry:     String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`MemoryEdgeStore`] from a CSV file.
pub fn load_edges_csv(path: &Path) -> NetworkResult<MemoryEdgeStore> {
    let file = std::fs::File::open(path).map_err(NetworkError::Io)?;
    load_edges_reader(file)
}

/// Like [`load_edges_csv`] but accepts any `Read` source.
pub fn load_edges_reader<R: Read>(reader: R) -> NetworkResult<MemoryEdgeStore> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut builder = MemoryEdgeStoreBuilder::new();

    for (line, result) in csv_reader.deserialize::<EdgeRecord>().enumerate() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        let geometry = LineString::<f64>::try_from_wkt_str(&row.geometry)
            .map_err(|e| NetworkError::Parse(format!("row {}: invalid geometry: {e}", line + 1)))?;

        let mut spec = EdgeSpec::from_line(row.id, row.source, row.target, geometry)
            .profiles(split_list(&row.profiles));
        spec.length_m = row.length_m;
        spec.cost = row.cost;
        spec.reverse_cost = row.reverse_cost;
        spec.scenario = row.scenario_id.map(ScenarioId);
        if let Some(list) = &row.deleted_in {
            spec.deleted_in = split_list(list)
                .map(|s| {
                    s.parse::<i64>().map(ScenarioId).map_err(|_| {
                        NetworkError::Parse(format!("row {}: invalid scenario id {s:?}", line + 1))
                    })
                })
                .collect::<NetworkResult<_>>()?;
        }

        builder.add_edge(spec)?;
    }

    Ok(builder.build())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn split_list(s: &str) -> impl Iterator<Item = &str> {
    s.split(';').map(str::trim).filter(|t| !t.is_empty())
}
