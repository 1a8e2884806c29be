//! Geographic coordinate type.
//!
//! `GeoPoint` stores WGS84 longitude/latitude in `f64`.  Distances use the
//! geodesic (ellipsoidal) metric from the `geo` crate, so radii and snap
//! tolerances stay accurate at any latitude.

use geo::{Coord, Distance, Geodesic, Point};

use crate::{CoreError, CoreResult};

/// A WGS84 geographic coordinate, `x = lon`, `y = lat`.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Construct a point, rejecting non-finite or out-of-range coordinates.
    pub fn try_new(lon: f64, lat: f64) -> CoreResult<Self> {
        let p = Self { lon, lat };
        p.validate()?;
        Ok(p)
    }

    /// Fail with [`CoreError::InvalidCoordinate`] unless both components are
    /// finite and inside the WGS84 domain.
    pub fn validate(&self) -> CoreResult<()> {
        let ok = self.lon.is_finite()
            && self.lat.is_finite()
            && self.lon.abs() <= 180.0
            && self.lat.abs() <= 90.0;
        if ok {
            Ok(())
        } else {
            Err(CoreError::InvalidCoordinate { lon: self.lon, lat: self.lat })
        }
    }

    /// Geodesic distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        Geodesic.distance(self.to_point(), other.to_point())
    }

    #[inline]
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    #[inline]
    pub fn to_coord(self) -> Coord<f64> {
        Coord { x: self.lon, y: self.lat }
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(c: Coord<f64>) -> Self {
        Self { lon: c.x, lat: c.y }
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(p: Point<f64>) -> Self {
        Self { lon: p.x(), lat: p.y() }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}
