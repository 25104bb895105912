use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::config::Settings;
use crate::data::osm::Collection;
use crate::data::road::Section;
use crate::errors::Result;
use crate::pipeline;

use super::collect_ways;
use super::Etl;

pub const ETL_NAME: &str = "curvature";
pub const OUTPUT_FILE_NAME: &str = "sections.json";

/// Joins, measures and splits the collected ways, then writes the sections
/// that pass the output filter, least curvy first.
pub struct CurvatureEtl<'a> {
    settings: &'a Settings,
}

impl CurvatureEtl<'_> {
    pub fn new(settings: &Settings) -> CurvatureEtl {
        CurvatureEtl { settings }
    }

    pub fn output_path(dir: &Path) -> PathBuf {
        dir.join(OUTPUT_FILE_NAME)
    }
}

/// Reads back the sections written by this stage.
pub fn read_sections(dir: &Path) -> Result<Vec<serde_json::Value>> {
    let file = File::open(CurvatureEtl::output_path(dir))?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

impl Etl for CurvatureEtl<'_> {
    type Input = Collection;
    type Output = Vec<Section>;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn is_cached(&self, dir: &Path) -> Result<bool> {
        Ok(Self::output_path(dir).try_exists()?)
    }

    fn clean(&self, dir: &Path) -> Result<()> {
        if self.is_cached(dir)? {
            fs::remove_file(Self::output_path(dir))?;
        }
        Ok(())
    }

    fn extract(&mut self, dir: &Path) -> Result<Self::Input> {
        collect_ways::read_cache(dir)
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        let sections = pipeline::process(input, self.settings);
        let found = sections.len();

        let mut sections = self.settings.way_filter.filter(sections);
        sections.sort_by(|a, b| a.curvature.total_cmp(&b.curvature));

        info!(etl_name = self.etl_name(), found = found, kept = sections.len(); "Filtered sections");
        Ok(sections)
    }

    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()> {
        let mut writer = BufWriter::new(File::create(Self::output_path(dir))?);
        serde_json::to_writer_pretty(&mut writer, &output)?;
        writer.flush()?;
        Ok(())
    }
}
