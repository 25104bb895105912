//! A small made-up map: a hairpin road split into two ways, a straight road, a
//! gravel road and a footpath.

#![allow(dead_code)]

use std::fmt::Write;

use curvature::calc::geometry::RADIUS_EARTH;

const METERS_PER_DEGREE: f64 = RADIUS_EARTH * std::f64::consts::PI / 180.0;

pub const HAIRPIN_RADIUS: f64 = 50.0;
pub const HAIRPIN_POINTS: u64 = 12;

fn node(xml: &mut String, id: u64, lat: f64, lon: f64) {
    let _ = writeln!(xml, r#"  <node id="{}" lat="{:.9}" lon="{:.9}" version="1"/>"#, id, lat, lon);
}

fn way(xml: &mut String, id: u64, refs: impl IntoIterator<Item = u64>, tags: &[(&str, &str)]) {
    let _ = writeln!(xml, r#"  <way id="{}" version="1">"#, id);
    for node_id in refs {
        let _ = writeln!(xml, r#"    <nd ref="{}"/>"#, node_id);
    }
    for (key, value) in tags {
        let _ = writeln!(xml, r#"    <tag k="{}" v="{}"/>"#, key, value);
    }
    xml.push_str("  </way>\n");
}

pub fn sample_map() -> String {
    let mut xml = String::from("<?xml version='1.0' encoding='UTF-8'?>\n<osm version=\"0.6\" generator=\"test\">\n");

    // Nodes 1..=12 every 30 degrees around a 50 m circle.
    for id in 1..=HAIRPIN_POINTS {
        let angle = ((id - 1) as f64 * 30.0).to_radians();
        node(
            &mut xml,
            id,
            HAIRPIN_RADIUS * angle.sin() / METERS_PER_DEGREE,
            10.0 + HAIRPIN_RADIUS * angle.cos() / METERS_PER_DEGREE,
        );
    }
    node(&mut xml, 100, 1.0, 10.0);
    node(&mut xml, 101, 1.0, 10.05);
    node(&mut xml, 200, 2.0, 10.0);
    node(&mut xml, 201, 2.0, 10.001);
    node(&mut xml, 202, 2.0, 10.002);
    node(&mut xml, 300, 3.0, 10.0);
    node(&mut xml, 301, 3.0, 10.001);

    let hairpin = [("highway", "tertiary"), ("name", "Hairpin Rd"), ("surface", "asphalt")];
    way(&mut xml, 1, 1..=6, &hairpin);
    way(&mut xml, 2, 6..=HAIRPIN_POINTS, &hairpin);
    way(&mut xml, 3, [100, 101], &[("highway", "primary"), ("name", "Flat Rd")]);
    way(&mut xml, 4, [200, 201, 202], &[("highway", "tertiary"), ("name", "Dirt Rd"), ("surface", "gravel")]);
    way(&mut xml, 5, [300, 301], &[("highway", "footway"), ("name", "Park Path")]);

    xml.push_str("  <relation id=\"9\">\n    <member type=\"way\" ref=\"1\" role=\"\"/>\n  </relation>\n</osm>\n");
    xml
}

pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}
