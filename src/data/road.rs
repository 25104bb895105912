use std::ops::Range;

use serde::Serialize;

use super::osm::Coordinate;
use crate::calc::{geometry, levels::CurvatureLevels};

/// Sentinel radius for segments that cannot be part of a curve.
pub const STRAIGHT_RADIUS: f64 = 100_000.0;

/// The straight piece of road between two consecutive coordinates.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: Coordinate,
    pub end: Coordinate,
    /// Meters.
    pub length: f64,
    /// Meters.
    pub radius: f64,
    pub curvature_level: u8,
    pub eliminated: bool,
}

impl Segment {
    pub fn new(start: Coordinate, end: Coordinate, length: f64, radius: f64) -> Self {
        Segment {
            start,
            end,
            length,
            radius,
            curvature_level: 0,
            eliminated: false,
        }
    }

    /// A classified curve that the deflection filter has not written off as noise.
    pub fn is_curved(&self) -> bool {
        self.curvature_level > 0 && !self.eliminated
    }
}

/// A joined road with its geometry resolved into segments.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Way {
    pub id: u64,
    pub name: String,
    pub kind: String,
    pub surface: String,
    pub county: String,
    /// Great-circle meters between the first and last coordinate.
    pub distance: f64,
    /// Sum of segment lengths in meters.
    pub length: f64,
    pub curvature: f64,
    pub segments: Vec<Segment>,
}

/// A curvy stretch of a [`Way`]; same shape, restricted to a run of its segments.
pub type Section = Way;

impl Way {
    /// Recomputes `curvature` and `length` from the current segment levels.
    pub fn score(&mut self, levels: &CurvatureLevels) {
        self.curvature = self
            .segments
            .iter()
            .map(|segment| levels.segment_curvature(segment))
            .sum();
        self.length = self.segments.iter().map(|segment| segment.length).sum();
    }

    /// Clones this way restricted to `range`, with curvature, length and distance
    /// recomputed for just those segments. `range` must not be empty.
    pub fn section(&self, range: Range<usize>, levels: &CurvatureLevels) -> Section {
        let segments = self.segments[range].to_vec();
        let distance = match (segments.first(), segments.last()) {
            (Some(first), Some(last)) => geometry::distance_between_points(
                first.start.lat,
                first.start.lon,
                last.end.lat,
                last.end.lon,
            ),
            _ => 0.0,
        };

        let mut section = Section {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind.clone(),
            surface: self.surface.clone(),
            county: self.county.clone(),
            distance,
            length: 0.0,
            curvature: 0.0,
            segments,
        };
        section.score(levels);
        section
    }
}
