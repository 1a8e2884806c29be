//! `sn-assemble`: point-anchored routing subgraph assembly.
//!
//! # Request pipeline
//!
//! ```text
//! assemble(point, budget, modus, scenario, profile):
//!   ① Buffers  : snap buffer (snap tolerance) and search buffer
//!                (cutoff × speed), both geodesic.
//!   ② Narrow   : edges meeting the snap buffer, no dead-end logic.
//!   ③ Splice   : split in-tolerance narrow edges at the point; collect
//!                the superseded ids.
//!   ④ Wide     : edges meeting the search buffer, with dead-end logic
//!                (concurrent with ②–③ under the `parallel` feature).
//!   ⑤ Antijoin : drop wide edges whose id was superseded.
//!   ⑥ Union    : surviving originals plus artificial edges.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Runs the narrow and wide branches under `rayon::join`.  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sn_assemble::{fetch_network_routing, AssemblerBuilder, RoutingRequest};
//! use sn_core::{CancellationToken, Settings};
//!
//! let assembler = AssemblerBuilder::new(store)
//!     .settings(Settings::single("snap_tolerance_m", 25.0))
//!     .build()?;
//! let rows = fetch_network_routing(&assembler, &request, &CancellationToken::new())?;
//! ```

pub mod assembler;
pub mod builder;
pub mod error;
pub mod observer;
pub mod request;
pub mod subgraph;

#[cfg(test)]
mod tests;

pub use assembler::{AssemblyRequest, NetworkAssembler};
pub use builder::AssemblerBuilder;
pub use error::{AssembleError, AssembleResult, Stage};
pub use observer::{AssemblyObserver, NoopObserver};
pub use request::{fetch_network_routing, RoutingRequest};
pub use subgraph::{OutputEdge, RoutingSubgraph};
