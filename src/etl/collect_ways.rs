use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::FilterSettings;
use crate::data::osm::Collection;
use crate::errors::{Error, Result};
use crate::pipeline;
use crate::source::OsmXmlFile;

use super::Etl;

pub const ETL_NAME: &str = "collect_ways";
pub const OUTPUT_FILE_NAME: &str = "collection.rkyv";

/// Runs the record filter over the map file and caches what it kept.
pub struct CollectWaysEtl<'a> {
    data_path: PathBuf,
    settings: &'a FilterSettings,
}

impl CollectWaysEtl<'_> {
    pub fn new(data_path: impl Into<PathBuf>, settings: &FilterSettings) -> CollectWaysEtl {
        CollectWaysEtl {
            data_path: data_path.into(),
            settings,
        }
    }

    pub fn output_path(dir: &Path) -> PathBuf {
        dir.join(OUTPUT_FILE_NAME)
    }
}

/// Reads back the collection cached by this stage.
pub fn read_cache(dir: &Path) -> Result<Collection> {
    let bytes = fs::read(CollectWaysEtl::output_path(dir))?;

    // Archived data must be aligned, a plain Vec<u8> gives no such guarantee.
    let mut aligned = rkyv::AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(&bytes);

    // SAFETY: the cache is only ever written by this stage's `load`.
    let collection: Collection = unsafe {
        rkyv::from_bytes_unchecked(&aligned)
            .map_err(|err| Error::Cache(format!("Could not deserialize collection cache: {}", err)))?
    };
    Ok(collection)
}

impl Etl for CollectWaysEtl<'_> {
    type Input = OsmXmlFile;
    type Output = Collection;

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

    fn extract(&mut self, _dir: &Path) -> Result<Self::Input> {
        if !self.data_path.try_exists()? {
            return Err(format!("Input file {} does not exist", self.data_path.display()).into());
        }
        Ok(OsmXmlFile::new(&self.data_path))
    }

    fn transform(&mut self, mut input: Self::Input) -> Result<Self::Output> {
        let collection = pipeline::collect(&mut input, self.settings)?;
        info!(
            etl_name = self.etl_name(),
            ways = collection.ways.len(),
            nodes = collection.coords.resolved_count();
            "Collected ways"
        );
        Ok(collection)
    }

    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()> {
        let bytes = rkyv::to_bytes::<_, 256>(&output)
            .map_err(|err| Error::Cache(format!("Could not serialize collection: {}", err)))?;
        let mut output_file = File::create(Self::output_path(dir))?;
        output_file.write_all(&bytes)?;
        Ok(())
    }
}
