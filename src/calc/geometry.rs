/// Radius of the earth in meters.
pub const RADIUS_EARTH: f64 = 6_373_000.0;

const DEGREES_TO_RADIANS: f64 = std::f64::consts::PI / 180.0;

/// Great-circle distance in meters between two lat/lon points, using the
/// spherical law of cosines.
pub fn distance_between_points(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if lat1 == lat2 && lon1 == lon2 {
        return 0.0;
    }

    // phi = 90 - latitude, theta = longitude
    let phi1 = (90.0 - lat1) * DEGREES_TO_RADIANS;
    let phi2 = (90.0 - lat2) * DEGREES_TO_RADIANS;
    let theta1 = lon1 * DEGREES_TO_RADIANS;
    let theta2 = lon2 * DEGREES_TO_RADIANS;

    let cos = phi1.sin() * phi2.sin() * (theta1 - theta2).cos() + phi1.cos() * phi2.cos();

    // Nearly identical points can round just past 1.0.
    cos.clamp(-1.0, 1.0).acos() * RADIUS_EARTH
}

/// Radius of the circle through the three corners of a triangle with the given
/// side lengths. Meaningless when any side is 0; callers treat that case as straight.
pub fn circumcircle_radius(a: f64, b: f64, c: f64) -> f64 {
    (a * b * c) / ((a + b + c) * (b + c - a) * (c + a - b) * (a + b - c)).abs().sqrt()
}
