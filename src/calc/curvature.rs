//! Curvature calculator. Every segment's radius comes from the circumcircles of
//! the triangles it belongs to; the way's curvature is its length spent turning,
//! weighted towards tighter turns.

use super::{geometry, levels::CurvatureLevels};
use crate::data::osm::{Coordinate, CoordinateMap, RawWay};
use crate::data::road::{Segment, Way, STRAIGHT_RADIUS};
use crate::errors::{Error, Result};

fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    geometry::distance_between_points(a.lat, a.lon, b.lat, b.lon)
}

/// Builds one segment per consecutive pair of points, each carrying the
/// tighter of the (up to) two triangle radii it takes part in.
pub fn segments(points: &[Coordinate]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::with_capacity(points.len().saturating_sub(1));

    // Oldest to newest: third, second, first.
    let mut third: Option<Coordinate> = None;
    let mut second: Option<Coordinate> = None;
    let mut second_third_length = 0.0;

    for &first in points {
        let Some(second_point) = second else {
            second = Some(first);
            continue;
        };
        let first_second_length = distance(&first, &second_point);

        let Some(third_point) = third else {
            third = Some(second_point);
            second = Some(first);
            second_third_length = first_second_length;
            continue;
        };
        let first_third_length = distance(&first, &third_point);

        // Duplicate points make a degenerate triangle.
        let radius = if first_second_length > 0.0 && second_third_length > 0.0 && first_third_length > 0.0 {
            geometry::circumcircle_radius(first_second_length, second_third_length, first_third_length)
        } else {
            STRAIGHT_RADIUS
        };

        match segments.last_mut() {
            None => segments.push(Segment::new(third_point, second_point, second_third_length, radius)),
            Some(previous) => {
                if radius < previous.radius {
                    previous.radius = radius;
                }
            }
        }
        segments.push(Segment::new(second_point, first, first_second_length, radius));

        third = Some(second_point);
        second = Some(first);
        second_third_length = first_second_length;
    }

    // Two points cannot define a curve.
    if let [start, end] = points {
        segments.push(Segment::new(*start, *end, distance(start, end), STRAIGHT_RADIUS));
    }

    segments
}

/// Resolves a joined way's coordinates into classified segments and scores it.
/// The node id list is consumed here; nothing downstream needs it.
pub fn calculate(way: RawWay, coords: &CoordinateMap, levels: &CurvatureLevels) -> Result<Way> {
    if way.refs.len() < 2 {
        return Err(Error::DegenerateWay(way.id));
    }

    let points = way
        .refs
        .iter()
        .map(|node_id| coords.lookup(way.id, *node_id))
        .collect::<Result<Vec<Coordinate>>>()?;

    let distance = match (points.first(), points.last()) {
        (Some(start), Some(end)) => distance(start, end),
        _ => 0.0,
    };

    let mut segments = segments(&points);
    levels.classify(&mut segments);

    let mut calculated = Way {
        id: way.id,
        name: way.name,
        kind: way.kind,
        surface: way.surface,
        county: way.county,
        distance,
        length: 0.0,
        curvature: 0.0,
        segments,
    };
    calculated.score(levels);
    Ok(calculated)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Meters per degree at the equator for this earth radius.
    const METERS_PER_DEGREE: f64 = geometry::RADIUS_EARTH * std::f64::consts::PI / 180.0;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn point_on_circle(radius: f64, degrees: f64) -> Coordinate {
        let angle = degrees.to_radians();
        Coordinate::new(
            radius * angle.sin() / METERS_PER_DEGREE,
            radius * angle.cos() / METERS_PER_DEGREE,
        )
    }

    fn raw_way(refs: Vec<u64>) -> RawWay {
        RawWay {
            id: 9,
            kind: "secondary".to_string(),
            refs,
            name: "Gap Rd".to_string(),
            route_ref: None,
            surface: "asphalt".to_string(),
            county: "Windsor".to_string(),
        }
    }

    fn coords(points: &[Coordinate]) -> CoordinateMap {
        let mut coords = CoordinateMap::new();
        for (id, point) in points.iter().enumerate() {
            coords.want(id as u64);
            coords.resolve(id as u64, *point);
        }
        coords
    }

    #[test]
    fn two_points_make_one_straight_segment() {
        let points = [Coordinate::new(44.0, -72.0), Coordinate::new(44.3, -72.9)];
        let way = calculate(raw_way(vec![0, 1]), &coords(&points), &CurvatureLevels::default())
            .expect("way calculates");

        assert_eq!(way.segments.len(), 1);
        assert_eq!(way.segments[0].radius, STRAIGHT_RADIUS);
        assert_eq!(way.segments[0].curvature_level, 0);
        assert_eq!(way.curvature, 0.0);
        assert!(approx_eq(way.length, way.distance, 1e-6));
        assert!(way.length > 0.0);
    }

    #[test]
    fn tight_circle_is_level_three_everywhere() {
        let points: Vec<Coordinate> = (0..6).map(|step| point_on_circle(50.0, f64::from(step) * 30.0)).collect();
        let refs = (0..points.len() as u64).collect();
        let levels = CurvatureLevels::default();
        let way = calculate(raw_way(refs), &coords(&points), &levels).expect("way calculates");

        assert_eq!(way.segments.len(), points.len() - 1);
        for segment in &way.segments {
            assert!(approx_eq(segment.radius, 50.0, 0.5), "radius {}", segment.radius);
            assert_eq!(segment.curvature_level, 3);
        }
        assert!(approx_eq(way.curvature, way.length * 1.6, 1e-6));
        assert_eq!(way.name, "Gap Rd");
        assert_eq!(way.county, "Windsor");
    }

    #[test]
    fn interior_segments_take_the_tighter_triangle() {
        // Straight run, then a sharp bend at the last point.
        let points = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.001),
            Coordinate::new(0.0, 0.002),
            Coordinate::new(0.0002, 0.0022),
        ];
        let segments = segments(&points);

        assert_eq!(segments.len(), 3);
        assert!(segments[0].radius > 1000.0);
        assert!(segments[1].radius < 200.0);
        assert_eq!(segments[1].radius, segments[2].radius);
        assert_eq!(segments[0].start, points[0]);
        assert_eq!(segments[2].end, points[3]);
    }

    #[test]
    fn duplicate_points_are_straight() {
        let points = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.001),
            Coordinate::new(0.0, 0.001),
            Coordinate::new(0.001, 0.001),
        ];
        let segments = segments(&points);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].length, 0.0);
        assert!(segments.iter().all(|segment| segment.radius == STRAIGHT_RADIUS));
    }

    #[test]
    fn length_and_distance() {
        let points = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.01),
            Coordinate::new(0.01, 0.01),
        ];
        let way = calculate(raw_way(vec![0, 1, 2]), &coords(&points), &CurvatureLevels::default())
            .expect("way calculates");

        let leg = 0.01 * METERS_PER_DEGREE;
        assert!(approx_eq(way.length, 2.0 * leg, 1.0));
        assert!(approx_eq(way.distance, leg * 2f64.sqrt(), 1.0));
        let summed: f64 = way.segments.iter().map(|segment| segment.length).sum();
        assert!(approx_eq(way.length, summed, 1e-9));
    }

    #[test]
    fn unresolved_coordinate_fails_the_way() {
        let points = [Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.01)];
        let mut coords = coords(&points);
        coords.want(2);

        match calculate(raw_way(vec![0, 1, 2]), &coords, &CurvatureLevels::default()) {
            Err(Error::MissingCoordinate { way_id, node_id }) => {
                assert_eq!(way_id, 9);
                assert_eq!(node_id, 2);
            }
            other => panic!("expected a missing coordinate, got {:?}", other),
        }
    }
}
