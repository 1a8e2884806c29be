//! Geodesic circular buffers.
//!
//! A buffer is approximated by a ring of [`BUFFER_SEGMENTS`] vertices, each
//! the geodesic destination from the centre at a fixed bearing.  The vertices
//! sit at the circumradius `r / cos(π / n)`, so every side touches the circle
//! of radius `r` and no point within `r` falls outside the polygon.  Every
//! buffer uses the same bearings, so two buffers around the same centre are
//! nested exactly when their radii are.
//!
//! Buffers that straddle the antimeridian or a pole are not split; the
//! resulting polygon is only meaningful away from those regions.

use std::f64::consts::PI;

use geo::{BoundingRect, Contains, Coord, Destination, Geodesic, LineString, Polygon, Rect};

use crate::{CoreError, CoreResult, GeoPoint};

/// Number of ring vertices per buffer (8 per quadrant).
pub const BUFFER_SEGMENTS: usize = 32;

/// A polygon covering every location within `radius_m` metres of `center`.
#[derive(Clone, Debug)]
pub struct Buffer {
    center:   GeoPoint,
    radius_m: f64,
    polygon:  Polygon<f64>,
}

impl Buffer {
    /// Build the buffer polygon.
    ///
    /// Fails with [`CoreError::InvalidRadius`] if `radius_m` is not a
    /// positive finite number, and with [`CoreError::InvalidCoordinate`] if
    /// the centre is outside the WGS84 domain.
    pub fn new(center: GeoPoint, radius_m: f64) -> CoreResult<Self> {
        if !(radius_m.is_finite() && radius_m > 0.0) {
            return Err(CoreError::InvalidRadius(radius_m));
        }
        center.validate()?;

        let origin = center.to_point();
        let vertex_m = circumradius(radius_m);
        // Bearings grow clockwise; reverse so the exterior ring is CCW.
        let mut ring: Vec<Coord<f64>> = (0..BUFFER_SEGMENTS)
            .map(|i| {
                let bearing = 360.0 * i as f64 / BUFFER_SEGMENTS as f64;
                Coord::from(Geodesic.destination(origin, bearing, vertex_m))
            })
            .collect();
        ring.reverse();

        Ok(Self {
            center,
            radius_m,
            polygon: Polygon::new(LineString::from(ring), vec![]),
        })
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Nominal radius; the ring vertices lie slightly further out.
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Lon/lat bounding rectangle, used as the R-tree pre-filter.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.polygon.bounding_rect()
    }

    pub fn contains_point(&self, p: GeoPoint) -> bool {
        self.polygon.contains(&p.to_point())
    }

    /// `true` if `other` lies entirely inside this buffer.
    pub fn contains_buffer(&self, other: &Buffer) -> bool {
        self.polygon.contains(&other.polygon)
    }
}

/// Vertex distance for a ring whose sides are tangent to a circle of `radius_m`.
#[inline]
pub fn circumradius(radius_m: f64) -> f64 {
    radius_m / (PI / BUFFER_SEGMENTS as f64).cos()
}
