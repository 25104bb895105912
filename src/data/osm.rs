use std::collections::HashMap;

use serde::Serialize;

use crate::errors::{Error, Result};

pub type NodeId = u64;

#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Coordinate { lat, lon }
    }
}

/// A way element exactly as it appears in the map file.
#[derive(Debug, Clone, Default)]
pub struct RawWayRecord {
    pub id: u64,
    pub tags: HashMap<String, String>,
    pub refs: Vec<NodeId>,
}

/// A node element exactly as it appears in the map file. Tags are not kept.
#[derive(Debug, Clone, Copy)]
pub struct RawNodeRecord {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

/// A way that passed the record filter, normalized for joining.
#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, PartialEq)]
pub struct RawWay {
    pub id: u64,
    pub kind: String,
    pub refs: Vec<NodeId>,
    pub name: String,
    pub route_ref: Option<String>,
    pub surface: String,
    pub county: String,
}

impl RawWay {
    pub fn first_ref(&self) -> Option<NodeId> {
        self.refs.first().copied()
    }

    pub fn last_ref(&self) -> Option<NodeId> {
        self.refs.last().copied()
    }
}

/// Node ids wanted by at least one retained way, each mapped to its coordinate
/// once the node pass has seen it.
#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Default, Clone)]
pub struct CoordinateMap {
    coords: HashMap<NodeId, Option<Coordinate>>,
}

impl CoordinateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn want(&mut self, id: NodeId) {
        self.coords.entry(id).or_insert(None);
    }

    pub fn is_wanted(&self, id: NodeId) -> bool {
        self.coords.contains_key(&id)
    }

    /// Returns false when nobody asked for this node.
    pub fn resolve(&mut self, id: NodeId, coordinate: Coordinate) -> bool {
        match self.coords.get_mut(&id) {
            Some(slot) => {
                *slot = Some(coordinate);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<Coordinate> {
        self.coords.get(&id).copied().flatten()
    }

    pub fn lookup(&self, way_id: u64, node_id: NodeId) -> Result<Coordinate> {
        self.get(node_id)
            .ok_or(Error::MissingCoordinate { way_id, node_id })
    }

    pub fn wanted_count(&self) -> usize {
        self.coords.len()
    }

    pub fn resolved_count(&self) -> usize {
        self.coords.values().filter(|coord| coord.is_some()).count()
    }
}

/// Everything the record filter kept from both passes over the map file.
#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Default, Clone)]
pub struct Collection {
    pub ways: Vec<RawWay>,
    pub coords: CoordinateMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwanted_nodes_are_not_stored() {
        let mut coords = CoordinateMap::new();
        coords.want(1);

        assert!(coords.resolve(1, Coordinate::new(1.0, 2.0)));
        assert!(!coords.resolve(2, Coordinate::new(3.0, 4.0)));
        assert_eq!(coords.wanted_count(), 1);
        assert_eq!(coords.get(1), Some(Coordinate::new(1.0, 2.0)));
        assert_eq!(coords.get(2), None);
    }

    #[test]
    fn unresolved_lookup_names_way_and_node() {
        let mut coords = CoordinateMap::new();
        coords.want(7);

        match coords.lookup(42, 7) {
            Err(Error::MissingCoordinate { way_id, node_id }) => {
                assert_eq!(way_id, 42);
                assert_eq!(node_id, 7);
            }
            other => panic!("expected a missing coordinate, got {:?}", other),
        }
        assert_eq!(coords.resolved_count(), 0);
    }
}
