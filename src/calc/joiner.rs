//! Route joiner. Roads are usually split into many ways at bridges, boundaries
//! and tagging changes; fragments sharing a route ref (or failing that, a name)
//! are stitched end to end so curvature can be measured over the whole road.

use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::data::osm::{NodeId, RawWay};

/// Fragments keyed by route. A way with several `;`-separated refs is copied
/// into each of those routes. Ordered so that joining is deterministic.
pub type RouteGroups = BTreeMap<String, Vec<RawWay>>;

pub fn group_routes(ways: Vec<RawWay>) -> RouteGroups {
    let mut routes = RouteGroups::new();
    for way in ways {
        let keys: Vec<String> = match &way.route_ref {
            Some(route_ref) => route_ref
                .split(';')
                .map(|route| route.trim())
                .filter(|route| !route.is_empty())
                .map(|route| route.to_string())
                .collect(),
            None => Vec::new(),
        };
        let keys = if keys.is_empty() { vec![way.name.clone()] } else { keys };

        for key in keys {
            routes.entry(key).or_default().push(way.clone());
        }
    }
    routes
}

/// A way being grown, plus the set of its node ids for fast loop checks.
struct Chain {
    way: RawWay,
    members: HashSet<NodeId>,
}

impl Chain {
    fn new(way: RawWay) -> Self {
        let members = way.refs.iter().copied().collect();
        Chain { way, members }
    }

    fn first(&self) -> Option<NodeId> {
        self.way.first_ref()
    }

    fn last(&self) -> Option<NodeId> {
        self.way.last_ref()
    }

    /// Attaches `other` to either end of the chain in whichever orientation fits,
    /// or hands it back untouched. A fragment never attaches if its far end is
    /// already on the chain, since that would close a loop.
    fn attach(&mut self, mut other: RawWay, route: &str) -> Result<(), RawWay> {
        let (Some(other_first), Some(other_last)) = (other.first_ref(), other.last_ref()) else {
            return Err(other);
        };
        let (Some(first), Some(last)) = (self.first(), self.last()) else {
            return Err(other);
        };

        if last == other_first && !self.members.contains(&other_last) {
            other.refs.remove(0);
            self.append(other, route);
        } else if last == other_last && !self.members.contains(&other_first) {
            other.refs.reverse();
            other.refs.remove(0);
            self.append(other, route);
        } else if first == other_last && !self.members.contains(&other_first) {
            other.refs.pop();
            self.prepend(other, route);
        } else if first == other_first && !self.members.contains(&other_last) {
            other.refs.reverse();
            other.refs.pop();
            self.prepend(other, route);
        } else {
            return Err(other);
        }
        Ok(())
    }

    fn append(&mut self, other: RawWay, route: &str) {
        self.rename(&other, route);
        self.members.extend(other.refs.iter().copied());
        self.way.refs.extend(other.refs);
    }

    fn prepend(&mut self, mut other: RawWay, route: &str) {
        self.rename(&other, route);
        self.members.extend(other.refs.iter().copied());
        other.refs.append(&mut self.way.refs);
        self.way.refs = other.refs;
    }

    /// A road joined from differently named pieces is known by its route.
    fn rename(&mut self, other: &RawWay, route: &str) {
        if self.way.name != other.name {
            self.way.name = route.to_string();
        }
    }
}

/// Joins one route's fragments into as few continuous ways as possible.
pub fn join_route(route: &str, mut remaining: Vec<RawWay>) -> Vec<RawWay> {
    let mut joined = Vec::new();

    while let Some(base) = remaining.pop() {
        let mut chain = Chain::new(base);

        // A fragment may only become reachable after others attach, so rescan
        // up to once per fragment, stopping early when a pass attaches nothing.
        let max_passes = remaining.len();
        let mut pass = 0;
        let mut modified = true;
        while modified && pass < max_passes {
            pass += 1;
            modified = false;

            let mut unattached = Vec::with_capacity(remaining.len());
            for other in remaining.drain(..).rev() {
                match chain.attach(other, route) {
                    Ok(()) => modified = true,
                    Err(other) => unattached.push(other),
                }
            }
            remaining = unattached;
        }

        joined.push(chain.way);
    }

    joined
}

/// Joins every route in turn. Takes any iterator over the groups so callers can
/// wrap it, e.g. in a progress bar.
pub fn join_routes(routes: impl IntoIterator<Item = (String, Vec<RawWay>)>) -> Vec<RawWay> {
    let mut ways = Vec::new();
    for (route, fragments) in routes {
        let fragment_count = fragments.len();
        let joined = join_route(&route, fragments);
        debug!(route = route.as_str(), fragments = fragment_count, ways = joined.len(); "Joined route");
        ways.extend(joined);
    }
    ways
}
