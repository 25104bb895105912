//! Radius thresholds and weights shared by everything that scores segments.

use crate::data::road::Segment;

/// Four ascending curve levels. Index 0 holds level 1 (the loosest curve),
/// index 3 holds level 4 (the tightest).
#[derive(Debug, Clone, PartialEq)]
pub struct CurvatureLevels {
    pub max_radius: [f64; 4],
    pub weight: [f64; 4],
}

impl Default for CurvatureLevels {
    fn default() -> Self {
        CurvatureLevels {
            max_radius: [175.0, 100.0, 60.0, 30.0],
            weight: [1.0, 1.3, 1.6, 2.0],
        }
    }
}

impl CurvatureLevels {
    pub fn new(max_radius: [f64; 4], weight: [f64; 4]) -> Self {
        CurvatureLevels { max_radius, weight }
    }

    /// Radius at or above which a segment counts as straight.
    pub fn level1_max_radius(&self) -> f64 {
        self.max_radius[0]
    }

    /// 4 for the tightest curves down to 0 for straight. A NaN radius compares
    /// false everywhere and lands on 0.
    pub fn level_for_radius(&self, radius: f64) -> u8 {
        for level in (1..=4u8).rev() {
            if radius < self.max_radius[usize::from(level - 1)] {
                return level;
            }
        }
        0
    }

    pub fn weight(&self, level: u8) -> f64 {
        match level {
            0 => 0.0,
            level => self.weight.get(usize::from(level - 1)).copied().unwrap_or(0.0),
        }
    }

    pub fn curvature_for_radius(&self, radius: f64, length: f64) -> f64 {
        length * self.weight(self.level_for_radius(radius))
    }

    /// Weighted length of a classified segment. Eliminated segments never score.
    pub fn segment_curvature(&self, segment: &Segment) -> f64 {
        if segment.eliminated {
            0.0
        } else {
            segment.length * self.weight(segment.curvature_level)
        }
    }

    pub fn classify(&self, segments: &mut [Segment]) {
        for segment in segments {
            segment.curvature_level = self.level_for_radius(segment.radius);
        }
    }
}
