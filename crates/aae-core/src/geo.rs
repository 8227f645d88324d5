//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` uses `f64` latitude/longitude, diverging from single-precision
//! coordinate types elsewhere in this stack: candidate score deltas must
//! agree within `1e-6` (spec invariant) and coordinates round-trip to six
//! decimal places on output, which `f32`'s ~7 significant digits cannot hold
//! reliably once summed across a bounding box's worth of edges.

/// A WGS-84 geographic coordinate, stored as `(lon, lat)` to match the
/// ordering used throughout the external GeoJSON/Overpass interfaces.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Midpoint in plain lon/lat averaging — adequate at city scale, not a
    /// true geodesic midpoint.
    pub fn midpoint(self, other: GeoPoint) -> GeoPoint {
        GeoPoint::new((self.lon + other.lon) * 0.5, (self.lat + other.lat) * 0.5)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

/// Axis-aligned bounding box in `[minLon, minLat, maxLon, maxLat]` order.
///
/// The host validates and normalizes this before it reaches the engine
///: `minLon < maxLon`, `minLat < maxLat`, area `<= 0.24`
/// square degrees. The engine trusts this invariant rather than
/// re-validating it on every access.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self { min_lon, min_lat, max_lon, max_lat }
    }

    #[inline]
    pub fn contains(self, p: GeoPoint) -> bool {
        p.lon >= self.min_lon && p.lon <= self.max_lon && p.lat >= self.min_lat && p.lat <= self.max_lat
    }

    #[inline]
    pub fn width(self) -> f64 {
        self.max_lon - self.min_lon
    }

    #[inline]
    pub fn height(self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn as_array(self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }
}
