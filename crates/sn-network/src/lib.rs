//! `sn-network`: edge model, query port, and point splicing.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`edge`]   | `Edge`, `ArtificialEdge`                                     |
//! | [`query`]  | `EdgeQuery`, `EdgeQueryPort` trait                           |
//! | [`store`]  | `MemoryEdgeStore` (R-tree), `MemoryEdgeStoreBuilder`, `EdgeSpec` |
//! | [`splice`] | `ArtificialEdgeSplicer` trait, `Splice`, `ProjectionSplicer` |
//! | [`loader`] | `load_edges_csv`, `load_edges_reader`                        |
//! | [`error`]  | `NetworkError`, `NetworkResult<T>`                           |
//!
//! The two traits are the seams to production collaborators (a spatial
//! database, a different splitting strategy).  The memory store and the
//! projection splicer are reference implementations used by tests and the
//! demo binary.

pub mod edge;
pub mod error;
pub mod loader;
pub mod query;
pub mod splice;
pub mod store;


pub use edge::{ArtificialEdge, Edge};
pub use error::{NetworkError, NetworkResult};
pub use loader::{load_edges_csv, load_edges_reader};
pub use query::{EdgeQuery, EdgeQueryPort};
pub use splice::{ArtificialEdgeSplicer, ProjectionSplicer, Splice};
pub use store::{EdgeSpec, MemoryEdgeStore, MemoryEdgeStoreBuilder};
