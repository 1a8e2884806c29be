//! WGS84 → spherical Web Mercator (EPSG:3857).
//!
//! Output coordinates are planar metres, suitable for client-side rendering
//! and straight-line distance math.  Buffering and snapping distances are
//! never measured in this frame.

use crate::GeoPoint;

/// Semi-major axis used by EPSG:3857, metres.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit of the square Web Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// A projected Web Mercator coordinate in metres.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MercatorCoord {
    pub x: f64,
    pub y: f64,
}

/// Project `p` into Web Mercator.  Latitudes beyond ±[`MAX_LATITUDE`] are
/// clamped.
pub fn to_web_mercator(p: GeoPoint) -> MercatorCoord {
    let lat = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = EARTH_RADIUS * p.lon.to_radians();
    let y = EARTH_RADIUS * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    MercatorCoord { x, y }
}

/// Inverse of [`to_web_mercator`].
pub fn from_web_mercator(c: MercatorCoord) -> GeoPoint {
    let lon = (c.x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (c.y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    GeoPoint { lon, lat }
}
