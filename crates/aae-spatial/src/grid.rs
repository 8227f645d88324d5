//! Approximate grid-bucket spatial index.
//!
//! # Design
//!
//! Each instance buckets its stored values into a `HashMap<(i32, i32), Vec<T>>`
//! keyed by `(floor(lon / cell_w), floor(lat / cell_h))`. Point queries and
//! bounding-box queries return the *union* of every cell the query region
//! overlaps — a superset of the true answer, never a subset. Callers filter
//! the superset by an exact (haversine) distance check. This keeps
//! nearest-neighbor-style lookups O(k) in cell population rather than O(n)
//! in total stored values, at the cost of occasional false positives the
//! caller must reject.
//!
//! The same generic structure serves the node index (`GridIndex<NodeId>`),
//! the edge-midpoint index (`GridIndex<EdgeId>`), and the report index
//! (`GridIndex<ReportIdx>`) — only the cell size and the stored payload type
//! differ.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use aae_core::GeoPoint;

/// A cell coordinate: `(floor(lon / cell_w), floor(lat / cell_h))`.
type CellKey = (i64, i64);

/// Generic approximate grid-bucket index over geographic points.
pub struct GridIndex<T> {
    cell_w: f64,
    cell_h: f64,
    cells: HashMap<CellKey, Vec<T>>,
}

impl<T: Copy + Eq + Hash> GridIndex<T> {
    /// Construct an empty index with the given cell size in degrees.
    ///
    /// # Panics
    /// Panics if either cell dimension is not strictly positive — a
    /// misconfigured profile would otherwise silently degrade into an
    /// unbounded single bucket.
    pub fn new(cell_w: f64, cell_h: f64) -> Self {
        assert!(cell_w > 0.0 && cell_h > 0.0, "grid cell size must be positive");
        Self { cell_w, cell_h, cells: HashMap::new() }
    }

    #[inline]
    fn cell_of(&self, p: GeoPoint) -> CellKey {
        ((p.lon / self.cell_w).floor() as i64, (p.lat / self.cell_h).floor() as i64)
    }

    /// Insert `value` at the cell containing `point`.
    pub fn insert_point(&mut self, point: GeoPoint, value: T) {
        self.cells.entry(self.cell_of(point)).or_default().push(value);
    }

    /// Insert `value` into every cell overlapped by the axis-aligned box
    /// spanning `a` and `b` (order-independent). Used for edges, which span
    /// two endpoints and would otherwise be invisible to a query that only
    /// touches cells near their midpoint... in practice the Spatial Index is
    /// built from edge midpoints, but `insert_bbox` exists for
    /// any caller that needs to index a spanning feature rather than a point.
    pub fn insert_bbox(&mut self, a: GeoPoint, b: GeoPoint, value: T) {
        let (min_lon, max_lon) = (a.lon.min(b.lon), a.lon.max(b.lon));
        let (min_lat, max_lat) = (a.lat.min(b.lat), a.lat.max(b.lat));

        let min_cell = self.cell_of(GeoPoint::new(min_lon, min_lat));
        let max_cell = self.cell_of(GeoPoint::new(max_lon, max_lat));

        for cx in min_cell.0..=max_cell.0 {
            for cy in min_cell.1..=max_cell.1 {
                self.cells.entry((cx, cy)).or_default().push(value);
            }
        }
    }

    /// Return the deduplicated set of values whose cells overlap the
    /// bounding box spanning `a` and `b`. This is a superset of the true
    /// spatial answer — callers must filter by exact distance.
    pub fn query_bbox(&self, a: GeoPoint, b: GeoPoint) -> Vec<T> {
        let (min_lon, max_lon) = (a.lon.min(b.lon), a.lon.max(b.lon));
        let (min_lat, max_lat) = (a.lat.min(b.lat), a.lat.max(b.lat));

        let min_cell = self.cell_of(GeoPoint::new(min_lon, min_lat));
        let max_cell = self.cell_of(GeoPoint::new(max_lon, max_lat));

        let mut seen: HashSet<T> = HashSet::new();
        let mut out = Vec::new();
        for cx in min_cell.0..=max_cell.0 {
            for cy in min_cell.1..=max_cell.1 {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    for &v in bucket {
                        if seen.insert(v) {
                            out.push(v);
                        }
                    }
                }
            }
        }
        out
    }

    /// Convenience: query a square of side `2 * radius_deg` centered on `p`.
    ///
    /// `radius_deg` is a degree margin, not a metric radius — callers pick a
    /// margin comfortably larger than their metric search radius (at city
    /// latitudes ~0.001° is on the order of 100 m) and then filter the
    /// returned superset by `GeoPoint::distance_m`.
    pub fn query_radius(&self, p: GeoPoint, radius_deg: f64) -> Vec<T> {
        let a = GeoPoint::new(p.lon - radius_deg, p.lat - radius_deg);
        let b = GeoPoint::new(p.lon + radius_deg, p.lat + radius_deg);
        self.query_bbox(a, b)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(|b| b.is_empty())
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(|b| b.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_query_finds_self() {
        let mut idx: GridIndex<u32> = GridIndex::new(0.01, 0.01);
        idx.insert_point(GeoPoint::new(0.0, 0.0), 1);
        let found = idx.query_radius(GeoPoint::new(0.0, 0.0), 0.001);
        assert_eq!(found, vec![1]);
    }

    #[test]
    fn query_is_a_superset_never_misses_true_hits() {
        let mut idx: GridIndex<u32> = GridIndex::new(0.01, 0.01);
        idx.insert_point(GeoPoint::new(0.0, 0.0), 1);
        idx.insert_point(GeoPoint::new(0.5, 0.5), 2);
        let found = idx.query_radius(GeoPoint::new(0.0, 0.0), 0.02);
        assert!(found.contains(&1));
        assert!(!found.contains(&2));
    }

    #[test]
    fn dedup_within_overlapping_cells() {
        let mut idx: GridIndex<u32> = GridIndex::new(0.01, 0.01);
        // Same value inserted at two points near the cell boundary.
        idx.insert_point(GeoPoint::new(0.0049, 0.0049), 7);
        idx.insert_point(GeoPoint::new(0.0051, 0.0051), 7);
        let found = idx.query_radius(GeoPoint::new(0.005, 0.005), 0.005);
        assert_eq!(found.iter().filter(|&&v| v == 7).count(), 1);
    }

    #[test]
    fn bbox_insert_spans_all_overlapped_cells() {
        let mut idx: GridIndex<u32> = GridIndex::new(0.01, 0.01);
        idx.insert_bbox(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.05, 0.0), 42);
        // A query near the far end of the span should still find it.
        let found = idx.query_radius(GeoPoint::new(0.05, 0.0), 0.001);
        assert!(found.contains(&42));
    }

    #[test]
    fn empty_index_returns_empty() {
        let idx: GridIndex<u32> = GridIndex::new(0.01, 0.01);
        assert!(idx.query_radius(GeoPoint::new(0.0, 0.0), 1.0).is_empty());
        assert!(idx.is_empty());
    }

    #[test]
    #[should_panic(expected = "positive")]
    fn zero_cell_size_panics() {
        let _: GridIndex<u32> = GridIndex::new(0.0, 0.01);
    }
}
