//! Deflection filter. A few misaligned GPS points make a straight road look like
//! it has a sharp jog (`__/\__`). Short curved runs between two straight
//! segments that point the same way are written off as noise.

use std::f64::consts::PI;

use super::geometry;
use crate::data::road::Segment;

/// How many segments ahead to look for the straight segment closing a jog.
const LOOK_AHEADS: [usize; 3] = [3, 4, 5];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeflectionFilter {
    /// Debugging aid: flag noise as eliminated but keep its curvature level.
    pub keep_eliminated: bool,
    pub level1_max_radius: f64,
}

/// Heading in degrees, 0 to 360. Latitude is the first atan2 argument.
pub fn heading(segment: &Segment) -> f64 {
    let delta_lat = segment.end.lat - segment.start.lat;
    let delta_lon = segment.end.lon - segment.start.lon;
    180.0 + delta_lat.atan2(delta_lon) * (180.0 / PI)
}

impl DeflectionFilter {
    pub fn new(keep_eliminated: bool, level1_max_radius: f64) -> Self {
        DeflectionFilter {
            keep_eliminated,
            level1_max_radius,
        }
    }

    /// Returns the number of segments newly eliminated.
    pub fn filter(&self, segments: &mut [Segment]) -> usize {
        let mut eliminated = 0;
        for start in 0..segments.len() {
            for look_ahead in LOOK_AHEADS {
                eliminated += self.filter_between(segments, start, look_ahead);
            }
        }
        eliminated
    }

    fn filter_between(&self, segments: &mut [Segment], start: usize, look_ahead: usize) -> usize {
        let Some(next_straight) = segments.get(start + look_ahead) else {
            return 0;
        };
        let first_straight = &segments[start];

        // Only noise between two straight runs is of interest.
        if first_straight.is_curved() || next_straight.is_curved() {
            return 0;
        }

        let heading_diff = (heading(first_straight) - heading(next_straight)).abs();

        // The turn a curve just barely tight enough to count as level 1 would
        // make over the same gap.
        let gap_distance = geometry::distance_between_points(
            first_straight.end.lat,
            first_straight.end.lon,
            next_straight.start.lat,
            next_straight.start.lon,
        );
        let min_variance = gap_distance / self.level1_max_radius;

        if heading_diff >= min_variance {
            return 0;
        }

        let mut eliminated = 0;
        for segment in &mut segments[start + 1..start + look_ahead] {
            if segment.curvature_level > 0 {
                if !segment.eliminated {
                    eliminated += 1;
                }
                segment.eliminated = true;
                if !self.keep_eliminated {
                    segment.curvature_level = 0;
                }
            }
        }
        eliminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{curvature, levels::CurvatureLevels};
    use crate::data::osm::Coordinate;

    const STEP: f64 = 0.0002;

    fn classified(points: &[Coordinate]) -> Vec<Segment> {
        let mut segments = curvature::segments(points);
        CurvatureLevels::default().classify(&mut segments);
        segments
    }

    /// A straight road heading east with one point knocked 5 m north.
    fn jittered_line() -> Vec<Coordinate> {
        (0..9)
            .map(|step| {
                let lat = if step == 4 { 0.00005 } else { 0.0 };
                Coordinate::new(lat, f64::from(step) * STEP)
            })
            .collect()
    }

    /// East for three steps, then a right angle and north for three steps.
    fn corner() -> Vec<Coordinate> {
        let mut points: Vec<Coordinate> = (0..4).map(|step| Coordinate::new(0.0, f64::from(step) * STEP)).collect();
        points.extend((1..4).map(|step| Coordinate::new(f64::from(step) * STEP, 3.0 * STEP)));
        points
    }

    #[test]
    fn heading_follows_lat_lon_axes() {
        let east = Segment::new(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0), 1.0, 1.0);
        let north = Segment::new(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0), 1.0, 1.0);
        assert_eq!(heading(&east), 180.0);
        assert_eq!(heading(&north), 270.0);
    }

    #[test]
    fn jog_on_a_straight_road_is_eliminated() {
        let mut segments = classified(&jittered_line());
        assert!(segments[2..6].iter().all(|segment| segment.curvature_level > 0));

        let eliminated = DeflectionFilter::new(false, 175.0).filter(&mut segments);

        assert_eq!(eliminated, 4);
        assert!(segments.iter().all(|segment| segment.curvature_level == 0));
        assert!(segments[2..6].iter().all(|segment| segment.eliminated));
        assert!(!segments[1].eliminated);
        assert!(!segments[6].eliminated);
    }

    #[test]
    fn keep_eliminated_only_flags() {
        let mut segments = classified(&jittered_line());
        let levels: Vec<u8> = segments.iter().map(|segment| segment.curvature_level).collect();

        DeflectionFilter::new(true, 175.0).filter(&mut segments);

        let kept: Vec<u8> = segments.iter().map(|segment| segment.curvature_level).collect();
        assert_eq!(levels, kept);
        assert!(segments[2..6].iter().all(|segment| segment.eliminated && !segment.is_curved()));
    }

    #[test]
    fn real_corner_survives() {
        let mut segments = classified(&corner());
        let before = segments.clone();
        assert!(segments.iter().any(|segment| segment.curvature_level > 0));

        let eliminated = DeflectionFilter::new(false, 175.0).filter(&mut segments);

        assert_eq!(eliminated, 0);
        assert_eq!(segments, before);
    }

    #[test]
    fn short_ways_are_left_alone() {
        let points = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.00005, STEP),
            Coordinate::new(0.0, 2.0 * STEP),
        ];
        let mut segments = classified(&points);
        let before = segments.clone();

        assert_eq!(DeflectionFilter::new(false, 175.0).filter(&mut segments), 0);
        assert_eq!(segments, before);
    }
}
