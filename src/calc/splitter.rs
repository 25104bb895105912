//! Way splitter. A long road is rarely curvy end to end; curvy stretches
//! separated by long enough straights become sections of their own.

use super::levels::CurvatureLevels;
use crate::data::road::{Section, Way};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaySplitter {
    /// Meters of consecutive straight segments that end a section. 0 or less
    /// never splits.
    pub straight_segment_split_threshold: f64,
}

impl WaySplitter {
    pub fn new(straight_segment_split_threshold: f64) -> Self {
        WaySplitter {
            straight_segment_split_threshold,
        }
    }

    /// Cuts `way` into its curvy sections. A way with no curves at all yields
    /// none, unless splitting is disabled.
    pub fn split(&self, way: Way, levels: &CurvatureLevels) -> Vec<Section> {
        let threshold = self.straight_segment_split_threshold;
        if threshold <= 0.0 {
            return vec![way];
        }

        let mut sections = Vec::new();

        let mut curve_start: Option<usize> = Some(0);
        let mut curve_distance = 0.0;
        let mut straight_start: Option<usize> = None;
        let mut straight_distance = 0.0;

        for (index, segment) in way.segments.iter().enumerate() {
            if segment.is_curved() {
                // A long straight before this curve is not part of the section.
                if straight_distance > threshold || curve_start.is_none() {
                    curve_start = Some(index);
                }
                straight_start = None;
                straight_distance = 0.0;
                curve_distance += segment.length;
            } else {
                straight_start.get_or_insert(index);
                straight_distance += segment.length;
            }

            if straight_distance > threshold && curve_distance > 0.0 {
                if let (Some(start), Some(end)) = (curve_start, straight_start) {
                    if end > 0 {
                        sections.push(way.section(start..end, levels));
                        curve_distance = 0.0;
                        curve_start = None;
                    }
                }
            }
        }

        if curve_distance > 0.0 {
            let start = curve_start.unwrap_or(0);
            sections.push(way.section(start..way.segments.len(), levels));
        }

        sections
    }
}
