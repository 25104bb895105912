//! The whole engine, from map records to curvy sections.

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::calc::collect::WayCollector;
use crate::calc::deflection::DeflectionFilter;
use crate::calc::joiner::{group_routes, join_routes};
use crate::calc::splitter::WaySplitter;
use crate::calc::curvature;
use crate::config::{FilterSettings, Settings};
use crate::data::osm::{Collection, CoordinateMap, RawWay};
use crate::data::road::Section;
use crate::errors::{Error, Result};
use crate::source::OsmSource;

/// Runs both record filter passes over `source`.
pub fn collect(source: &mut dyn OsmSource, settings: &FilterSettings) -> Result<Collection> {
    let mut ways = WayCollector::new(settings);
    let mut seen_ways = 0usize;
    source.read_ways(&mut |record| {
        seen_ways += 1;
        ways.accept_way(record);
    })?;
    info!(seen = seen_ways, kept = ways.way_count(), wanted_nodes = ways.wanted_count(); "Way pass finished");

    // Nothing to look up, don't bother reading the nodes.
    if ways.way_count() == 0 {
        return Err(Error::NoWays);
    }

    let mut coords = ways.into_coordinate_collector();
    source.read_nodes(&mut |record| {
        coords.accept_node(&record);
    })?;
    info!(resolved_nodes = coords.resolved_count(); "Node pass finished");

    coords.finish()
}

/// Joins routes, then measures and splits every joined way. Ways that fail are
/// logged and dropped; the rest carry on.
pub fn process(collection: Collection, settings: &Settings) -> Vec<Section> {
    let Collection { ways, coords } = collection;

    let joined = join_all(ways, settings.verbose);
    info!(ways = joined.len(); "Routes joined");

    let deflection = DeflectionFilter::new(settings.keep_eliminated, settings.levels.level1_max_radius());
    let splitter = WaySplitter::new(settings.straight_segment_split_threshold);

    let sections: Vec<Section> = joined
        .into_par_iter()
        .filter_map(|way| {
            let (id, name) = (way.id, way.name.clone());
            match process_way(way, &coords, settings, &deflection, &splitter) {
                Ok(sections) => Some(sections),
                Err(err) => {
                    let err = err.to_string();
                    warn!(way_id = id, name = name.as_str(), err = err.as_str(); "Dropping way");
                    None
                }
            }
        })
        .flatten()
        .collect();

    info!(sections = sections.len(); "Ways processed");
    sections
}

fn join_all(ways: Vec<RawWay>, verbose: bool) -> Vec<RawWay> {
    let routes = group_routes(ways);

    let groups: Box<dyn Iterator<Item = (String, Vec<RawWay>)>> = if verbose {
        Box::new(tqdm::tqdm(routes.into_iter()))
    } else {
        Box::new(routes.into_iter())
    };

    join_routes(groups)
}

fn process_way(
    way: RawWay,
    coords: &CoordinateMap,
    settings: &Settings,
    deflection: &DeflectionFilter,
    splitter: &WaySplitter,
) -> Result<Vec<Section>> {
    let mut way = curvature::calculate(way, coords, &settings.levels)?;

    let eliminated = deflection.filter(&mut way.segments);
    if eliminated > 0 {
        debug!(way_id = way.id, eliminated = eliminated; "Eliminated deflections");
        way.score(&settings.levels);
    }

    Ok(splitter.split(way, &settings.levels))
}

/// Collect then process.
pub fn run(source: &mut dyn OsmSource, settings: &Settings) -> Result<Vec<Section>> {
    let collection = collect(source, &settings.filter)?;
    Ok(process(collection, settings))
}
