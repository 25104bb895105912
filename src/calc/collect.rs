//! Record filter. Ways are collected first, then only the coordinates those
//! ways reference are kept.

use std::collections::HashMap;

use crate::config::FilterSettings;
use crate::data::osm::{Collection, Coordinate, CoordinateMap, RawNodeRecord, RawWay, RawWayRecord};
use crate::errors::{Error, Result};

fn tag<'t>(tags: &'t HashMap<String, String>, key: &str) -> Option<&'t str> {
    tags.get(key)
        .map(|value| value.as_str())
        .filter(|value| !value.is_empty())
}

/// Applies the way acceptance rules and builds the normalized way, or `None`
/// when the record is rejected.
pub fn normalize_way(record: RawWayRecord, settings: &FilterSettings) -> Option<RawWay> {
    let tags = &record.tags;

    if record.refs.len() < 2 || record.refs.first() == record.refs.last() {
        return None;
    }

    let name_tag = tag(tags, "name");
    let ref_tag = tag(tags, "ref");
    let name = match (name_tag, ref_tag) {
        (Some(name), Some(route_ref)) => format!("{}({})", name, route_ref),
        (Some(name), None) => name.to_string(),
        (None, Some(route_ref)) => route_ref.to_string(),
        (None, None) => return None,
    };

    let surface = tag(tags, "surface");
    if let Some(surface) = surface {
        if settings.ignored_surfaces.iter().any(|ignored| ignored == surface) {
            return None;
        }
    }

    let kind = tag(tags, "highway")?;
    if !settings.way_types.iter().any(|way_type| way_type == kind) {
        return None;
    }

    Some(RawWay {
        id: record.id,
        kind: kind.to_string(),
        name,
        route_ref: ref_tag.map(|route_ref| route_ref.to_string()),
        surface: surface.unwrap_or("unknown").to_string(),
        county: tag(tags, "tiger:county").unwrap_or_default().to_string(),
        refs: record.refs,
    })
}

/// First phase: accepts ways and marks the node ids they reference as wanted.
pub struct WayCollector<'a> {
    settings: &'a FilterSettings,
    ways: Vec<RawWay>,
    coords: CoordinateMap,
}

impl<'a> WayCollector<'a> {
    pub fn new(settings: &'a FilterSettings) -> Self {
        WayCollector {
            settings,
            ways: Vec::new(),
            coords: CoordinateMap::new(),
        }
    }

    pub fn accept_way(&mut self, record: RawWayRecord) -> bool {
        match normalize_way(record, self.settings) {
            Some(way) => {
                for node_id in &way.refs {
                    self.coords.want(*node_id);
                }
                self.ways.push(way);
                true
            }
            None => false,
        }
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    pub fn wanted_count(&self) -> usize {
        self.coords.wanted_count()
    }

    /// Ends the way phase. Coordinates can only be resolved after this.
    pub fn into_coordinate_collector(self) -> CoordinateCollector<'a> {
        CoordinateCollector {
            settings: self.settings,
            ways: self.ways,
            coords: self.coords,
        }
    }
}

/// Second phase: resolves wanted node ids that fall inside the bounding box.
pub struct CoordinateCollector<'a> {
    settings: &'a FilterSettings,
    ways: Vec<RawWay>,
    coords: CoordinateMap,
}

impl CoordinateCollector<'_> {
    pub fn accept_node(&mut self, record: &RawNodeRecord) -> bool {
        if !self.settings.bounds.contains(record.lat, record.lon) {
            return false;
        }
        self.coords.resolve(record.id, Coordinate::new(record.lat, record.lon))
    }

    pub fn resolved_count(&self) -> usize {
        self.coords.resolved_count()
    }

    pub fn finish(self) -> Result<Collection> {
        if self.ways.is_empty() {
            return Err(Error::NoWays);
        }
        Ok(Collection {
            ways: self.ways,
            coords: self.coords,
        })
    }
}
