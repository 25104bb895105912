//! The curvature engine: filtering raw records, joining route fragments,
//! scoring geometry and cutting ways into curvy sections.

pub mod collect;
pub mod curvature;
pub mod deflection;
pub mod geometry;
pub mod joiner;
pub mod levels;
pub mod splitter;
pub mod way_filter;
