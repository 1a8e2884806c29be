//! In-memory edge store with an R-tree spatial index.
//!
//! # Index
//!
//! Each edge is entered into an `rstar` R-tree under the lon/lat bounding box
//! of its geometry.  A region query first collects edges whose box meets the
//! region's bounding rectangle, then keeps those whose geometry actually
//! intersects the region polygon.
//!
//! # Scenarios
//!
//! Base edges are visible to every modus unless the requested scenario
//! deletes them.  Scenario edges are visible only to the scenario that added
//! them, and only when the modus applies scenarios.
//!
//! # Dead ends
//!
//! With dead-end logic on, an edge is flagged when its source or target has
//! no other incident edge in the network the query sees (same scenario
//! visibility and profile).  Degrees come from the whole store, not from the
//! returned edges, so an edge cut by the region boundary is not a dead end.

use geo::{BoundingRect, Distance, Geodesic, Intersects, LineString, Point};
use rstar::{RTree, RTreeObject, AABB};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use sn_core::{CancellationToken, EdgeId, GeoPoint, NodeId, ScenarioId};

use crate::{Edge, EdgeQuery, EdgeQueryPort, NetworkError, NetworkResult};

// ── EdgeSpec ──────────────────────────────────────────────────────────────────

/// Input record for [`MemoryEdgeStoreBuilder::add_edge`].
///
/// Length defaults to the geodesic length of the geometry.  Costs default to
/// travel time in seconds at the query's speed.
#[derive(Clone, Debug)]
pub struct EdgeSpec {
    pub id:           EdgeId,
    pub source:       NodeId,
    pub target:       NodeId,
    pub geometry:     LineString<f64>,
    pub length_m:     Option<f64>,
    pub cost:         Option<f64>,
    pub reverse_cost: Option<f64>,
    pub profiles:     Vec<String>,
    /// `Some(s)` for an edge that exists only in scenario `s`.
    pub scenario:     Option<ScenarioId>,
    /// Scenarios that delete this (base) edge.
    pub deleted_in:   Vec<ScenarioId>,
}

impl EdgeSpec {
    pub fn new(id: i64, source: i64, target: i64, coords: &[GeoPoint]) -> Self {
        Self::from_line(id, source, target, coords.iter().map(|p| p.to_coord()).collect())
    }

    /// Like [`new`](Self::new) with a ready-made lon/lat line.
    pub fn from_line(id: i64, source: i64, target: i64, geometry: LineString<f64>) -> Self {
        Self {
            id:           EdgeId(id),
            source:       NodeId(source),
            target:       NodeId(target),
            geometry,
            length_m:     None,
            cost:         None,
            reverse_cost: None,
            profiles:     Vec::new(),
            scenario:     None,
            deleted_in:   Vec::new(),
        }
    }

    pub fn profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles = profiles.into_iter().map(Into::into).collect();
        self
    }

    pub fn length(mut self, length_m: f64) -> Self {
        self.length_m = Some(length_m);
        self
    }

    pub fn costs(mut self, cost: f64, reverse_cost: f64) -> Self {
        self.cost = Some(cost);
        self.reverse_cost = Some(reverse_cost);
        self
    }

    pub fn in_scenario(mut self, scenario: i64) -> Self {
        self.scenario = Some(ScenarioId(scenario));
        self
    }

    pub fn deleted_in(mut self, scenario: i64) -> Self {
        self.deleted_in.push(ScenarioId(scenario));
        self
    }
}

/// Sum of geodesic segment lengths, metres.
pub fn geodesic_length(line: &LineString<f64>) -> f64 {
    line.lines()
        .map(|l| Geodesic.distance(Point::from(l.start), Point::from(l.end)))
        .sum()
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Bounding box of one edge plus its slot in `MemoryEdgeStore::edges`.
#[derive(Clone, Debug)]
struct EdgeEntry {
    envelope: AABB<[f64; 2]>,
    slot:     usize,
}

impl RTreeObject for EdgeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

#[derive(Debug)]
struct StoredEdge {
    id:           EdgeId,
    source:       NodeId,
    target:       NodeId,
    geometry:     LineString<f64>,
    length_m:     f64,
    cost:         Option<f64>,
    reverse_cost: Option<f64>,
    profiles:     FxHashSet<String>,
    scenario:     Option<ScenarioId>,
    deleted_in:   FxHashSet<ScenarioId>,
}

impl StoredEdge {
    fn visible(&self, query: &EdgeQuery<'_>) -> bool {
        let scenario_on = query.modus.applies_scenario();
        match self.scenario {
            Some(s) => scenario_on && s == query.scenario_id,
            None => !(scenario_on && self.deleted_in.contains(&query.scenario_id)),
        }
    }

    fn open_to(&self, query: &EdgeQuery<'_>) -> bool {
        self.visible(query) && self.profiles.contains(query.profile)
    }

    fn to_edge(&self, speed_mps: f64) -> Edge {
        let travel_secs = self.length_m / speed_mps;
        Edge {
            id:           self.id,
            source:       self.source,
            target:       self.target,
            length_m:     self.length_m,
            cost:         self.cost.unwrap_or(travel_secs),
            reverse_cost: self.reverse_cost.unwrap_or(travel_secs),
            dead_end:     None,
            geometry:     self.geometry.clone(),
        }
    }
}

// ── MemoryEdgeStore ───────────────────────────────────────────────────────────

/// Reference [`EdgeQueryPort`] backed by an in-memory R-tree.
///
/// Do not construct directly; use [`MemoryEdgeStoreBuilder`].
#[derive(Debug)]
pub struct MemoryEdgeStore {
    edges:    Vec<StoredEdge>,
    profiles: FxHashSet<String>,
    index:    RTree<EdgeEntry>,
    /// Slots of the edges incident to each node.
    incident: FxHashMap<NodeId, Vec<usize>>,
}

impl MemoryEdgeStore {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// `true` if at least one edge is open to `profile`.
    pub fn knows_profile(&self, profile: &str) -> bool {
        self.profiles.contains(profile)
    }
}

impl EdgeQueryPort for MemoryEdgeStore {
    fn query_edges(
        &self,
        query:  &EdgeQuery<'_>,
        cancel: &CancellationToken,
    ) -> NetworkResult<Vec<Edge>> {
        if cancel.is_cancelled() {
            return Err(NetworkError::Cancelled);
        }
        if !self.knows_profile(query.profile) {
            return Err(NetworkError::InvalidInput(format!(
                "unknown routing profile {:?}",
                query.profile
            )));
        }
        if !(query.speed_mps.is_finite() && query.speed_mps > 0.0) {
            return Err(NetworkError::InvalidInput(format!(
                "speed must be > 0, got {}",
                query.speed_mps
            )));
        }

        let Some(rect) = query.region.bounding_rect() else {
            return Ok(Vec::new());
        };
        let envelope = AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);

        let mut edges: Vec<Edge> = self
            .index
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| &self.edges[entry.slot])
            .filter(|e| e.open_to(query))
            .filter(|e| query.region.intersects(&e.geometry))
            .map(|e| e.to_edge(query.speed_mps))
            .collect();
        edges.sort_unstable_by_key(|e| e.id);

        if query.dead_end_logic {
            self.mark_dead_ends(&mut edges, query);
        }

        trace!(
            profile = query.profile,
            modus = %query.modus,
            returned = edges.len(),
            "memory store query"
        );

        if cancel.is_cancelled() {
            return Err(NetworkError::Cancelled);
        }
        Ok(edges)
    }
}

impl MemoryEdgeStore {
    fn mark_dead_ends(&self, edges: &mut [Edge], query: &EdgeQuery<'_>) {
        let mut degree: FxHashMap<NodeId, usize> = FxHashMap::default();
        let mut lonely = |n: NodeId| {
            let d = *degree.entry(n).or_insert_with(|| {
                self.incident
                    .get(&n)
                    .map_or(0, |slots| slots.iter().filter(|&&s| self.edges[s].open_to(query)).count())
            });
            d <= 1
        };
        for e in edges.iter_mut() {
            e.dead_end = Some(lonely(e.source) || lonely(e.target));
        }
    }
}

// ── MemoryEdgeStoreBuilder ────────────────────────────────────────────────────

/// Collect [`EdgeSpec`]s, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use sn_core::GeoPoint;
/// use sn_network::{EdgeSpec, MemoryEdgeStoreBuilder};
///
/// let mut b = MemoryEdgeStoreBuilder::new();
/// let coords = [GeoPoint::new(11.540, 48.195), GeoPoint::new(11.546, 48.195)];
/// b.add_edge(EdgeSpec::new(1, 10, 11, &coords).profiles(["walking_standard"]))
///     .unwrap();
/// let store = b.build();
/// assert_eq!(store.len(), 1);
/// ```
pub struct MemoryEdgeStoreBuilder {
    edges: Vec<StoredEdge>,
    ids:   FxHashSet<EdgeId>,
}

impl MemoryEdgeStoreBuilder {
    pub fn new() -> Self {
        Self { edges: Vec::new(), ids: FxHashSet::default() }
    }

    pub fn with_capacity(edges: usize) -> Self {
        Self {
            edges: Vec::with_capacity(edges),
            ids:   FxHashSet::with_capacity_and_hasher(edges, Default::default()),
        }
    }

    /// Validate and add one edge.
    ///
    /// Rejects duplicate ids, ids in the artificial (negative) range,
    /// geometries with fewer than two coordinates or invalid coordinates,
    /// and negative lengths.
    pub fn add_edge(&mut self, spec: EdgeSpec) -> NetworkResult<()> {
        let id = spec.id;
        if id.is_artificial() {
            return Err(NetworkError::InvalidEdge(id, "negative ids are reserved".into()));
        }
        if self.ids.contains(&id) {
            return Err(NetworkError::InvalidEdge(id, "duplicate id".into()));
        }
        if spec.geometry.0.len() < 2 {
            return Err(NetworkError::InvalidEdge(id, "geometry needs at least two coordinates".into()));
        }
        for c in spec.geometry.coords() {
            GeoPoint::from(*c).validate()?;
        }
        let length_m = spec.length_m.unwrap_or_else(|| geodesic_length(&spec.geometry));
        if !(length_m.is_finite() && length_m >= 0.0) {
            return Err(NetworkError::InvalidEdge(id, format!("invalid length {length_m}")));
        }

        self.ids.insert(id);
        self.edges.push(StoredEdge {
            id,
            source:       spec.source,
            target:       spec.target,
            geometry:     spec.geometry,
            length_m,
            cost:         spec.cost,
            reverse_cost: spec.reverse_cost,
            profiles:     spec.profiles.into_iter().collect(),
            scenario:     spec.scenario,
            deleted_in:   spec.deleted_in.into_iter().collect(),
        });
        Ok(())
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Consume the builder and bulk-load the R-tree.
    pub fn build(self) -> MemoryEdgeStore {
        let entries: Vec<EdgeEntry> = self
            .edges
            .iter()
            .enumerate()
            .filter_map(|(slot, e)| {
                let r = e.geometry.bounding_rect()?;
                Some(EdgeEntry {
                    envelope: AABB::from_corners([r.min().x, r.min().y], [r.max().x, r.max().y]),
                    slot,
                })
            })
            .collect();

        let profiles = self
            .edges
            .iter()
            .flat_map(|e| e.profiles.iter().cloned())
            .collect();

        let mut incident: FxHashMap<NodeId, Vec<usize>> = FxHashMap::default();
        for (slot, e) in self.edges.iter().enumerate() {
            incident.entry(e.source).or_default().push(slot);
            if e.target != e.source {
                incident.entry(e.target).or_default().push(slot);
            }
        }

        MemoryEdgeStore {
            edges: self.edges,
            profiles,
            index: RTree::bulk_load(entries),
            incident,
        }
    }
}

impl Default for MemoryEdgeStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
