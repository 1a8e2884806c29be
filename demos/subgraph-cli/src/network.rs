//! Built-in street block used when no `--edges` file is given.
//!
//! A small walking network around Munich's Westend.  The default query point
//! (11.543274, 48.195524) lies about 8 m south of edge 1.

use std::io::Cursor;

use sn_network::{load_edges_reader, MemoryEdgeStore, NetworkResult};

// Edge 2 is closed in scenario 3, which adds the diagonal edge 7 instead.
const BLOCK_CSV: &str = "\
id,source,target,length_m,cost,reverse_cost,profiles,scenario_id,deleted_in,geometry
1,1,2,,,,walking_standard;cycling,,,\"LINESTRING(11.5400 48.1956, 11.5470 48.1956)\"
2,2,3,,,,walking_standard;cycling,,3,\"LINESTRING(11.5470 48.1956, 11.5470 48.2000)\"
3,3,4,,,,walking_standard;cycling,,,\"LINESTRING(11.5470 48.2000, 11.5400 48.2000)\"
4,4,1,,,,walking_standard;cycling,,,\"LINESTRING(11.5400 48.2000, 11.5400 48.1956)\"
5,3,5,,,,walking_standard,,,\"LINESTRING(11.5470 48.2000, 11.5500 48.2010)\"
6,2,6,,,-1,cycling,,,\"LINESTRING(11.5470 48.1956, 11.5520 48.1940)\"
7,2,4,,,,walking_standard,3,,\"LINESTRING(11.5470 48.1956, 11.5435 48.1980, 11.5400 48.2000)\"
";

pub fn block_store() -> NetworkResult<MemoryEdgeStore> {
    load_edges_reader(Cursor::new(BLOCK_CSV))
}
