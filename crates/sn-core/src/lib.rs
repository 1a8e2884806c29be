//! `sn-core`: foundational types for the `snapnet` subgraph extractor.
//!
//! This crate is a dependency of every other `sn-*` crate.  It has no `sn-*`
//! dependencies and keeps external ones small (`geo`, `serde`, `toml`,
//! `thiserror`).
//!
//! # What lives here
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`ids`]        | `EdgeId`, `NodeId`, `ScenarioId`                       |
//! | [`point`]      | `GeoPoint`, geodesic distance                          |
//! | [`buffer`]     | `Buffer`, geodesic circular buffer polygon             |
//! | [`projection`] | WGS84 → Web Mercator (EPSG:3857)                       |
//! | [`budget`]     | `TravelBudget` (cutoff × speed → search radius)        |
//! | [`modus`]      | `RoutingModus` (`default` / `scenario` / `comparison`) |
//! | [`settings`]   | layered `Settings`, typed `SnapSettings`               |
//! | [`cancel`]     | `CancellationToken`                                    |
//! | [`error`]      | `CoreError`, `CoreResult`                              |

pub mod budget;
pub mod buffer;
pub mod cancel;
pub mod error;
pub mod ids;
pub mod modus;
pub mod point;
pub mod projection;
pub mod settings;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use budget::TravelBudget;
pub use buffer::{Buffer, BUFFER_SEGMENTS};
pub use cancel::CancellationToken;
pub use error::{CoreError, CoreResult};
pub use ids::{EdgeId, NodeId, ScenarioId};
pub use modus::RoutingModus;
pub use point::GeoPoint;
pub use projection::{to_web_mercator, MercatorCoord};
pub use settings::{Settings, SnapSettings};
