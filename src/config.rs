use std::{fs::File, io::BufReader, path::Path};

use serde::Deserialize;

use crate::calc::{levels::CurvatureLevels, way_filter::WayFilter};
use crate::errors::{Error, Result};

pub const METERS_PER_MILE: f64 = 1609.0;

/// Optional lat/lon limits. An unset side never rejects anything, and a bound of
/// exactly 0 is a real bound.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lon: Option<f64>,
    pub max_lon: Option<f64>,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.min_lat.map_or(true, |min| lat >= min)
            && self.max_lat.map_or(true, |max| lat <= max)
            && self.min_lon.map_or(true, |min| lon >= min)
            && self.max_lon.map_or(true, |max| lon <= max)
    }
}

/// What the record filter keeps.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSettings {
    pub way_types: Vec<String>,
    pub ignored_surfaces: Vec<String>,
    pub bounds: BoundingBox,
}

impl Default for FilterSettings {
    fn default() -> Self {
        FilterSettings {
            way_types: default_way_types(),
            ignored_surfaces: default_ignored_surfaces(),
            bounds: BoundingBox::default(),
        }
    }
}

/// Validated settings consumed by the engine. All distances are meters.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub filter: FilterSettings,
    pub levels: CurvatureLevels,
    /// 0 disables splitting.
    pub straight_segment_split_threshold: f64,
    pub keep_eliminated: bool,
    pub way_filter: WayFilter,
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            filter: FilterSettings::default(),
            levels: CurvatureLevels::default(),
            straight_segment_split_threshold: 1.5 * METERS_PER_MILE,
            keep_eliminated: false,
            way_filter: WayFilter::default(),
            verbose: false,
        }
    }
}

/// The JSON configuration file as written by the user.
#[derive(Deserialize, Debug, Clone)]
pub struct UserConfig {
    pub data_path: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default)]
    pub verbose: bool,

    #[serde(default = "default_way_types")]
    pub way_types: Vec<String>,
    #[serde(default = "default_ignored_surfaces")]
    pub ignored_surfaces: Vec<String>,
    #[serde(flatten)]
    pub bounds: BoundingBox,

    #[serde(default = "default_true")]
    pub split_ways: bool,
    #[serde(default = "default_split_threshold_miles")]
    pub straight_segment_split_threshold_miles: f64,

    #[serde(default = "default_level1_max_radius")]
    pub level1_max_radius: f64,
    #[serde(default = "default_level2_max_radius")]
    pub level2_max_radius: f64,
    #[serde(default = "default_level3_max_radius")]
    pub level3_max_radius: f64,
    #[serde(default = "default_level4_max_radius")]
    pub level4_max_radius: f64,
    #[serde(default = "default_level1_weight")]
    pub level1_weight: f64,
    #[serde(default = "default_level2_weight")]
    pub level2_weight: f64,
    #[serde(default = "default_level3_weight")]
    pub level3_weight: f64,
    #[serde(default = "default_level4_weight")]
    pub level4_weight: f64,
    #[serde(default)]
    pub keep_eliminated: bool,

    #[serde(default = "default_min_length_miles")]
    pub min_length_miles: f64,
    #[serde(default)]
    pub max_length_miles: f64,
    #[serde(default = "default_min_curvature")]
    pub min_curvature: f64,
    #[serde(default)]
    pub max_curvature: f64,
}

fn default_output_path() -> String {
    "output".to_string()
}

fn default_way_types() -> Vec<String> {
    [
        "secondary", "residential", "tertiary", "primary", "primary_link", "motorway",
        "motorway_link", "road", "trunk", "trunk_link", "unclassified",
    ]
    .iter()
    .map(|kind| kind.to_string())
    .collect()
}

fn default_ignored_surfaces() -> Vec<String> {
    ["dirt", "unpaved", "gravel", "fine_gravel", "sand", "grass", "ground"]
        .iter()
        .map(|surface| surface.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

fn default_split_threshold_miles() -> f64 {
    1.5
}

fn default_level1_max_radius() -> f64 {
    175.0
}

fn default_level2_max_radius() -> f64 {
    100.0
}

fn default_level3_max_radius() -> f64 {
    60.0
}

fn default_level4_max_radius() -> f64 {
    30.0
}

fn default_level1_weight() -> f64 {
    1.0
}

fn default_level2_weight() -> f64 {
    1.3
}

fn default_level3_weight() -> f64 {
    1.6
}

fn default_level4_weight() -> f64 {
    2.0
}

fn default_min_length_miles() -> f64 {
    1.0
}

fn default_min_curvature() -> f64 {
    300.0
}

impl UserConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|err| Error::Config(format!("Could not open {}: {}", path.display(), err)))?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(reader: impl std::io::Read) -> Result<Self> {
        serde_json::from_reader(reader)
            .map_err(|err| Error::Config(format!("Could not parse config: {}", err)))
    }

    /// Checks every value and converts miles to meters.
    pub fn settings(&self) -> Result<Settings> {
        self.validate()?;

        let levels = CurvatureLevels::new(
            [
                self.level1_max_radius,
                self.level2_max_radius,
                self.level3_max_radius,
                self.level4_max_radius,
            ],
            [
                self.level1_weight,
                self.level2_weight,
                self.level3_weight,
                self.level4_weight,
            ],
        );

        let straight_segment_split_threshold = if self.split_ways {
            self.straight_segment_split_threshold_miles * METERS_PER_MILE
        } else {
            0.0
        };

        Ok(Settings {
            filter: FilterSettings {
                way_types: self.way_types.clone(),
                ignored_surfaces: self.ignored_surfaces.clone(),
                bounds: self.bounds,
            },
            levels,
            straight_segment_split_threshold,
            keep_eliminated: self.keep_eliminated,
            way_filter: WayFilter {
                min_length: self.min_length_miles * METERS_PER_MILE,
                max_length: self.max_length_miles * METERS_PER_MILE,
                min_curvature: self.min_curvature,
                max_curvature: self.max_curvature,
            },
            verbose: self.verbose,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.data_path.trim().is_empty() {
            return Err(Error::Config("data_path was not specified".to_string()));
        }
        if !(self.data_path.ends_with(".osm") || self.data_path.ends_with(".osm.xz")) {
            return Err(Error::Config(format!(
                "{} is not an OSM XML file, expected a .osm or .osm.xz extension",
                self.data_path
            )));
        }

        let radii = [
            self.level1_max_radius,
            self.level2_max_radius,
            self.level3_max_radius,
            self.level4_max_radius,
        ];
        if radii.iter().any(|radius| *radius < 0.0) {
            return Err(Error::Config("Max radius settings must be positive".to_string()));
        }
        if radii.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err(Error::Config(
                "Max radius settings are out of order. Level 1 must be > level 2, etc.".to_string(),
            ));
        }

        let weights = [
            self.level1_weight,
            self.level2_weight,
            self.level3_weight,
            self.level4_weight,
        ];
        if weights.iter().any(|weight| *weight < 0.0) {
            return Err(Error::Config("Level weights must be 0 or greater".to_string()));
        }

        if self.min_length_miles < 0.0 || self.max_length_miles < 0.0 {
            return Err(Error::Config(
                "Road min and max length settings must be 0 or greater".to_string(),
            ));
        }
        if self.min_curvature < 0.0 || self.max_curvature < 0.0 {
            return Err(Error::Config(
                "Road min and max curvature settings must be 0 or greater".to_string(),
            ));
        }
        if self.straight_segment_split_threshold_miles <= 0.0 {
            return Err(Error::Config(
                "straight_segment_split_threshold_miles must be greater than 0, set split_ways to false to never split"
                    .to_string(),
            ));
        }

        let bounds = self.bounds;
        if let (Some(min), Some(max)) = (bounds.min_lat, bounds.max_lat) {
            if min > max {
                return Err(Error::Config("min_lat is greater than max_lat".to_string()));
            }
        }
        if let (Some(min), Some(max)) = (bounds.min_lon, bounds.max_lon) {
            if min > max {
                return Err(Error::Config("min_lon is greater than max_lon".to_string()));
            }
        }

        Ok(())
    }
}
