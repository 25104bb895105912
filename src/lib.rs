//! Finds the curviest roads in OpenStreetMap data.
//!
//! Ways are filtered and collected from an OSM XML file ([`pipeline::collect`]),
//! fragments of the same road are joined, and each road is scored by how much of
//! its length is spent in curves ([`pipeline::process`]).

pub mod calc;
pub mod config;
pub mod data;
pub mod errors;
pub mod etl;
pub mod pipeline;
pub mod source;
