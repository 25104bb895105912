//! Where map records come from. The record filter needs two passes, all ways
//! and then all nodes, so a source must be able to replay its input.

use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use xz::bufread::XzDecoder;

use crate::data::osm::{RawNodeRecord, RawWayRecord};
use crate::errors::Result;

pub trait OsmSource {
    fn read_ways(&mut self, visit: &mut dyn FnMut(RawWayRecord)) -> Result<()>;
    fn read_nodes(&mut self, visit: &mut dyn FnMut(RawNodeRecord)) -> Result<()>;
}

/// An OSM XML file on disk, optionally xz compressed.
pub struct OsmXmlFile {
    path: PathBuf,
}

impl OsmXmlFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OsmXmlFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Box<dyn BufRead>> {
        let file_reader = BufReader::new(fs::File::open(&self.path)?);
        let is_xz = self.path.extension().map_or(false, |ext| ext == "xz");
        if is_xz {
            Ok(Box::new(BufReader::new(XzDecoder::new(file_reader))))
        } else {
            Ok(Box::new(file_reader))
        }
    }
}

impl OsmSource for OsmXmlFile {
    fn read_ways(&mut self, visit: &mut dyn FnMut(RawWayRecord)) -> Result<()> {
        read_osm(self.open()?, Some(visit), None)
    }

    fn read_nodes(&mut self, visit: &mut dyn FnMut(RawNodeRecord)) -> Result<()> {
        read_osm(self.open()?, None, Some(visit))
    }
}

/// OSM XML held in memory.
pub struct OsmXmlBytes {
    xml: Vec<u8>,
}

impl OsmXmlBytes {
    pub fn new(xml: impl Into<Vec<u8>>) -> Self {
        OsmXmlBytes { xml: xml.into() }
    }
}

impl OsmSource for OsmXmlBytes {
    fn read_ways(&mut self, visit: &mut dyn FnMut(RawWayRecord)) -> Result<()> {
        read_osm(self.xml.as_slice(), Some(visit), None)
    }

    fn read_nodes(&mut self, visit: &mut dyn FnMut(RawNodeRecord)) -> Result<()> {
        read_osm(self.xml.as_slice(), None, Some(visit))
    }
}

/// Records that were already parsed, or built by hand.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub ways: Vec<RawWayRecord>,
    pub nodes: Vec<RawNodeRecord>,
}

impl MemorySource {
    pub fn new(ways: Vec<RawWayRecord>, nodes: Vec<RawNodeRecord>) -> Self {
        MemorySource { ways, nodes }
    }
}

impl OsmSource for MemorySource {
    fn read_ways(&mut self, visit: &mut dyn FnMut(RawWayRecord)) -> Result<()> {
        self.ways.iter().cloned().for_each(visit);
        Ok(())
    }

    fn read_nodes(&mut self, visit: &mut dyn FnMut(RawNodeRecord)) -> Result<()> {
        self.nodes.iter().copied().for_each(visit);
        Ok(())
    }
}

fn attribute_str<'b>(value: &'b [u8]) -> Result<&'b str> {
    Ok(str::from_utf8(value)?)
}

fn parse_node(el: &BytesStart) -> Result<Option<RawNodeRecord>> {
    let mut id: Option<u64> = None;
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attribute in el.attributes() {
        let attribute = attribute?;
        match attribute.key.as_ref() {
            b"id" => id = Some(attribute_str(&attribute.value)?.parse()?),
            b"lat" => lat = Some(attribute_str(&attribute.value)?.parse()?),
            b"lon" => lon = Some(attribute_str(&attribute.value)?.parse()?),
            _ => (),
        }
    }

    Ok(match (id, lat, lon) {
        (Some(id), Some(lat), Some(lon)) => Some(RawNodeRecord { id, lat, lon }),
        _ => None,
    })
}

fn parse_id(el: &BytesStart) -> Result<Option<u64>> {
    for attribute in el.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == b"id" {
            return Ok(Some(attribute_str(&attribute.value)?.parse()?));
        }
    }
    Ok(None)
}

fn parse_nd(el: &BytesStart) -> Result<Option<u64>> {
    for attribute in el.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == b"ref" {
            return Ok(Some(attribute_str(&attribute.value)?.parse()?));
        }
    }
    Ok(None)
}

fn parse_tag(el: &BytesStart) -> Result<Option<(String, String)>> {
    let mut key: Option<String> = None;
    let mut value: Option<String> = None;

    for attribute in el.attributes() {
        let attribute = attribute?;
        match attribute.key.as_ref() {
            b"k" => key = Some(attribute.unescape_value()?.into_owned()),
            b"v" => value = Some(attribute.unescape_value()?.into_owned()),
            _ => (),
        }
    }

    Ok(key.zip(value))
}

/// Streams one pass over OSM XML, handing out the requested element kinds.
/// Relations and unknown elements are skipped.
fn read_osm(
    input: impl BufRead,
    mut ways: Option<&mut dyn FnMut(RawWayRecord)>,
    mut nodes: Option<&mut dyn FnMut(RawNodeRecord)>,
) -> Result<()> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);
    let mut buf = Vec::new();

    // The way currently open, when ways were asked for.
    let mut way: Option<RawWayRecord> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"node" => {
                if let Some(visit) = nodes.as_mut() {
                    if let Some(node) = parse_node(&e)? {
                        visit(node);
                    }
                }
            }
            Event::Start(e) if e.name().as_ref() == b"way" => {
                if ways.is_some() {
                    if let Some(id) = parse_id(&e)? {
                        way = Some(RawWayRecord {
                            id,
                            tags: HashMap::new(),
                            refs: Vec::new(),
                        });
                    }
                }
            }
            Event::Start(e) | Event::Empty(e) => match (e.name().as_ref(), way.as_mut()) {
                (b"nd", Some(way)) => {
                    if let Some(node_id) = parse_nd(&e)? {
                        way.refs.push(node_id);
                    }
                }
                (b"tag", Some(way)) => {
                    if let Some((key, value)) = parse_tag(&e)? {
                        way.tags.insert(key, value);
                    }
                }
                _ => (),
            },
            Event::End(e) if e.name().as_ref() == b"way" => {
                if let (Some(record), Some(visit)) = (way.take(), ways.as_mut()) {
                    visit(record);
                }
            }
            _ => (),
        }
        buf.clear();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="test">
  <bounds minlat="44.0" minlon="-73.0" maxlat="45.0" maxlon="-72.0"/>
  <node id="1" lat="44.1" lon="-72.5" version="3"/>
  <node id="2" lat="44.2" lon="-72.6">
    <tag k="highway" v="stop"/>
  </node>
  <way id="10" version="2">
    <nd ref="1"/>
    <nd ref="2"/>
    <tag k="highway" v="primary"/>
    <tag k="name" v="Smugglers&apos; Notch Rd"/>
  </way>
  <way id="11"/>
  <relation id="20">
    <member type="way" ref="10" role=""/>
    <tag k="type" v="route"/>
  </relation>
</osm>"#;

    #[test]
    fn ways_carry_refs_and_tags() {
        let mut source = OsmXmlBytes::new(SAMPLE);
        let mut ways = Vec::new();
        source.read_ways(&mut |way| ways.push(way)).expect("sample parses");

        assert_eq!(ways.len(), 1);
        assert_eq!(ways[0].id, 10);
        assert_eq!(ways[0].refs, vec![1, 2]);
        assert_eq!(ways[0].tags["highway"], "primary");
        assert_eq!(ways[0].tags["name"], "Smugglers' Notch Rd");
    }

    #[test]
    fn nodes_with_and_without_tags() {
        let mut source = OsmXmlBytes::new(SAMPLE);
        let mut nodes = Vec::new();
        source.read_nodes(&mut |node| nodes.push(node)).expect("sample parses");

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].id, 1);
        assert_eq!(nodes[1].lat, 44.2);
        assert_eq!(nodes[1].lon, -72.6);
    }

    #[test]
    fn relation_members_are_not_way_refs() {
        let mut source = OsmXmlBytes::new(SAMPLE);
        let mut refs = Vec::new();
        source
            .read_ways(&mut |way| refs.extend(way.refs))
            .expect("sample parses");
        assert!(!refs.contains(&10));
    }

    #[test]
    fn malformed_number_is_an_error() {
        let mut source = OsmXmlBytes::new(r#"<osm><node id="x" lat="1" lon="2"/></osm>"#);
        assert!(source.read_nodes(&mut |_| ()).is_err());
    }
}
