//! Splitting candidate edges at the query point.
//!
//! # Projection
//!
//! [`ProjectionSplicer`] works in Web Mercator, which is conformal, so the
//! closest point on a short polyline is found with planar segment math.  The
//! snap test itself uses the geodesic distance between the query point and
//! that closest point.
//!
//! # Ids
//!
//! The query point becomes a single artificial node shared by every split.
//! Artificial node and edge ids count down from a negative base, so they
//! never collide with store ids and repeat identically across identical
//! requests.
//!
//! ```text
//! original   s ──────────●──────── t        (● = projection of the point)
//! artificial s ──────────● start            length·f
//!                  start ●──────── t        length·(1−f)
//! ```

use geo::{Coord, LineString};
use tracing::debug;

use sn_core::projection::{from_web_mercator, to_web_mercator, MercatorCoord};
use sn_core::{CancellationToken, EdgeId, GeoPoint, NodeId};

use crate::{ArtificialEdge, Edge, NetworkError, NetworkResult};

// ── Splice ────────────────────────────────────────────────────────────────────

/// Result of one splice call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Splice {
    /// The artificial vertex standing for the query point; `None` when no
    /// candidate was within tolerance.
    pub start_node: Option<NodeId>,
    pub edges:      Vec<ArtificialEdge>,
}

impl Splice {
    /// Every original id named in a `supersedes` list, ascending.
    pub fn superseded_ids(&self) -> Vec<EdgeId> {
        let mut ids: Vec<EdgeId> = self
            .edges
            .iter()
            .flat_map(|a| a.supersedes.iter().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── ArtificialEdgeSplicer ─────────────────────────────────────────────────────

/// Pluggable point-to-network splicer.
///
/// # Contract
///
/// - For each candidate within `tolerance_m` of `point`, emit one or more
///   artificial edges split at the point's projection, each with
///   `supersedes = [original id]`.
/// - Candidates beyond tolerance are dropped: neither split nor superseded.
/// - Artificial lengths derived from one original sum to its length.
pub trait ArtificialEdgeSplicer: Send + Sync {
    fn splice(
        &self,
        candidates:  &[Edge],
        point:       GeoPoint,
        tolerance_m: f64,
        cancel:      &CancellationToken,
    ) -> NetworkResult<Splice>;
}

// ── ProjectionSplicer ─────────────────────────────────────────────────────────

/// Splits each in-tolerance candidate into two edges meeting at the query
/// point's projection.
#[derive(Copy, Clone, Debug)]
pub struct ProjectionSplicer {
    id_base: i64,
}

impl ProjectionSplicer {
    /// `id_base` must be negative; the start node gets `NodeId(id_base)` and
    /// artificial edges get `id_base, id_base - 1, …`.
    pub fn new(id_base: i64) -> NetworkResult<Self> {
        if id_base >= 0 {
            return Err(NetworkError::InvalidInput(format!(
                "artificial id base must be negative, got {id_base}"
            )));
        }
        Ok(Self { id_base })
    }

    pub fn id_base(&self) -> i64 {
        self.id_base
    }
}

impl ArtificialEdgeSplicer for ProjectionSplicer {
    fn splice(
        &self,
        candidates:  &[Edge],
        point:       GeoPoint,
        tolerance_m: f64,
        cancel:      &CancellationToken,
    ) -> NetworkResult<Splice> {
        point.validate()?;
        if !(tolerance_m.is_finite() && tolerance_m > 0.0) {
            return Err(NetworkError::InvalidInput(format!(
                "snap tolerance must be > 0, got {tolerance_m}"
            )));
        }

        // Candidate order must not leak into id assignment.
        let mut ordered: Vec<&Edge> = candidates.iter().collect();
        ordered.sort_by_key(|e| e.id);
        ordered.dedup_by_key(|e| e.id);

        let start = NodeId(self.id_base);
        let p = to_web_mercator(point);
        let mut next_id = Some(self.id_base);
        let mut out = Vec::new();

        for edge in ordered {
            if cancel.is_cancelled() {
                return Err(NetworkError::Cancelled);
            }
            let Some(hit) = locate(&edge.geometry, p) else {
                debug!(edge = %edge.id, "skipping edge with degenerate geometry");
                continue;
            };
            let cut = hit.cut(&edge.geometry);
            if point.distance_m(GeoPoint::from(cut)) > tolerance_m {
                continue;
            }

            let (head_id, tail_id) = next_id
                .and_then(|head| Some((head, head.checked_sub(1)?)))
                .ok_or_else(|| {
                    NetworkError::InvalidInput(format!(
                        "artificial id range below {} is exhausted",
                        self.id_base
                    ))
                })?;
            next_id = tail_id.checked_sub(1);

            let (head, tail) = split_geometry(&edge.geometry, &hit, cut);
            let f = hit.fraction;

            out.push(ArtificialEdge {
                edge: Edge {
                    id:           EdgeId(head_id),
                    source:       edge.source,
                    target:       start,
                    length_m:     edge.length_m * f,
                    cost:         scale_cost(edge.cost, f),
                    reverse_cost: scale_cost(edge.reverse_cost, f),
                    dead_end:     None,
                    geometry:     head,
                },
                supersedes: vec![edge.id],
            });
            out.push(ArtificialEdge {
                edge: Edge {
                    id:           EdgeId(tail_id),
                    source:       start,
                    target:       edge.target,
                    // Derived by subtraction so the pair sums to the original.
                    length_m:     edge.length_m - edge.length_m * f,
                    cost:         scale_cost(edge.cost, 1.0 - f),
                    reverse_cost: scale_cost(edge.reverse_cost, 1.0 - f),
                    dead_end:     None,
                    geometry:     tail,
                },
                supersedes: vec![edge.id],
            });
        }

        Ok(Splice {
            start_node: (!out.is_empty()).then_some(start),
            edges:      out,
        })
    }
}

/// Negative costs flag a closed direction and are kept verbatim.
#[inline]
fn scale_cost(cost: f64, f: f64) -> f64 {
    if cost < 0.0 { cost } else { cost * f }
}

// ── Geometry helpers ──────────────────────────────────────────────────────────

/// Closest point of a polyline to a query point, in Web Mercator.
#[derive(Debug)]
struct Located {
    /// Index of the segment `coords[segment] → coords[segment + 1]`.
    segment:  usize,
    /// Position on that segment, `0..=1`.
    t:        f64,
    closest:  MercatorCoord,
    /// Arc-length fraction of `closest` along the whole polyline, `0..=1`.
    fraction: f64,
}

impl Located {
    /// The cut point in lon/lat.  Segment ends reuse the stored coordinate
    /// so no near-duplicate vertex is introduced by the round trip through
    /// Web Mercator.
    fn cut(&self, line: &LineString<f64>) -> Coord<f64> {
        if self.t <= 0.0 {
            line.0[self.segment]
        } else if self.t >= 1.0 {
            line.0[self.segment + 1]
        } else {
            from_web_mercator(self.closest).to_coord()
        }
    }
}

fn locate(line: &LineString<f64>, p: MercatorCoord) -> Option<Located> {
    let pts: Vec<MercatorCoord> = line
        .coords()
        .map(|c| to_web_mercator(GeoPoint::from(*c)))
        .collect();
    if pts.len() < 2 {
        return None;
    }

    let mut walked = 0.0;
    let mut best: Option<(f64, usize, f64, MercatorCoord, f64)> = None; // (dist², seg, t, q, along)
    for (i, w) in pts.windows(2).enumerate() {
        let (a, b) = (w[0], w[1]);
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len2 = dx * dx + dy * dy;
        let t = if len2 > 0.0 {
            (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let q = MercatorCoord { x: a.x + t * dx, y: a.y + t * dy };
        let d2 = (p.x - q.x).powi(2) + (p.y - q.y).powi(2);
        let seg_len = len2.sqrt();
        if best.is_none_or(|(bd, ..)| d2 < bd) {
            best = Some((d2, i, t, q, walked + t * seg_len));
        }
        walked += seg_len;
    }

    let (_, segment, t, closest, along) = best?;
    let fraction = if walked > 0.0 { (along / walked).clamp(0.0, 1.0) } else { 0.0 };
    Some(Located { segment, t, closest, fraction })
}

/// Cut `line` at `hit`, returning `(source → cut, cut → target)`.  Each part
/// keeps at least two coordinates.
fn split_geometry(line: &LineString<f64>, hit: &Located, cut: Coord<f64>) -> (LineString<f64>, LineString<f64>) {
    let coords = &line.0;

    let mut head: Vec<Coord<f64>> = coords[..=hit.segment].to_vec();
    if head.last() != Some(&cut) {
        head.push(cut);
    }
    if head.len() < 2 {
        head.push(cut);
    }

    let mut rest = &coords[hit.segment + 1..];
    if rest.first() == Some(&cut) {
        rest = &rest[1..];
    }
    let mut tail: Vec<Coord<f64>> = vec![cut];
    tail.extend_from_slice(rest);
    if tail.len() < 2 {
        tail.push(cut);
    }

    (LineString::from(head), LineString::from(tail))
}
