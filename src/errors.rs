use std::{io, num::{ParseFloatError, ParseIntError}, str::Utf8Error};

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

use crate::data::osm::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Way {way_id} references node {node_id} which has no resolved coordinate")]
    MissingCoordinate { way_id: u64, node_id: NodeId },
    #[error("Way {0} has fewer than two coordinates")]
    DegenerateWay(u64),
    #[error(
        "No ways survived filtering. The input is probably not an OSM XML file, \
         or it has no highway tags matching the configured way types"
    )]
    NoWays,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] AttrError),
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),
    #[error("Invalid integer: {0}")]
    ParseInt(#[from] ParseIntError),
    #[error("Invalid number: {0}")]
    ParseFloat(#[from] ParseFloatError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("{0}")]
    Message(String),
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Message(value.to_string())
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Message(value)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
