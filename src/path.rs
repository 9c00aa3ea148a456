//! Segmented path accumulation
//!
//! A [`Path`] is a list of segments. Each segment is a run of fixes recorded
//! without an intervening pause; a new segment is opened on every resume so
//! that the gap is never drawn or measured as a straight line.

use serde::{Deserialize, Serialize};

use crate::geo;
use crate::types::GpsPoint;

/// Recorded route, split at pause boundaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Path {
    segments: Vec<Vec<GpsPoint>>,
}

impl Default for Path {
    fn default() -> Self {
        Self::new()
    }
}

impl Path {
    /// Create a path holding one empty, open segment
    pub fn new() -> Self {
        Self { segments: vec![Vec::new()] }
    }

    /// Append a point to the open segment.
    ///
    /// Returns the previous point of the same segment, if any. The first
    /// point of a segment has no predecessor and contributes no distance.
    pub fn record_point(&mut self, point: GpsPoint) -> Option<GpsPoint> {
        if self.segments.is_empty() {
            self.segments.push(Vec::new());
        }
        let last = self.segments.len() - 1;
        let segment = &mut self.segments[last];
        let previous = segment.last().copied();
        segment.push(point);
        previous
    }

    /// Open a fresh segment; the next point starts a disjoint polyline
    pub fn start_new_segment(&mut self) {
        self.segments.push(Vec::new());
    }

    /// Chronological concatenation of every segment
    pub fn flatten(&self) -> Vec<GpsPoint> {
        self.segments.iter().flatten().copied().collect()
    }

    pub fn segments(&self) -> &[Vec<GpsPoint>] {
        &self.segments
    }

    /// Segments with at least two points, i.e. the ones that draw a line
    pub fn drawable_segments(&self) -> impl Iterator<Item = &[GpsPoint]> {
        self.segments.iter().filter(|s| s.len() > 1).map(Vec::as_slice)
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    pub fn last_point(&self) -> Option<&GpsPoint> {
        self.segments.iter().rev().find_map(|s| s.last())
    }

    /// Batch distance: sum of in-segment haversine distances
    pub fn length_km(&self) -> f64 {
        self.segments.iter().map(|s| geo::route_length_km(s)).sum()
    }
}
