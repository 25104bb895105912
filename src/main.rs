use std::env;
use std::fs::create_dir_all;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use structured_logger::json::new_writer;
use structured_logger::Builder;

use curvature::config::UserConfig;
use curvature::errors::Result;
use curvature::etl::collect_ways::CollectWaysEtl;
use curvature::etl::curvature::CurvatureEtl;
use curvature::etl::Etl;

const DEFAULT_CONFIG_PATH: &str = "curvature.json";

fn create_output_dir(config: &UserConfig) -> Result<PathBuf> {
    let input_fname = Path::new(&config.data_path)
        .file_name()
        .ok_or("Could not get input file name")?;
    let output_dir = Path::new(&config.output_path).join(input_fname);
    create_dir_all(&output_dir)?;
    Ok(output_dir)
}

fn setup_logging(verbose: bool) {
    Builder::with_level(if verbose { "debug" } else { "info" })
        .with_target_writer("*", new_writer(io::stdout()))
        .init();
}

fn main() -> Result<()> {
    let config_path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let user_config = UserConfig::load(Path::new(&config_path))?;
    setup_logging(user_config.verbose);

    let settings = user_config.settings()?;
    let output_dir = create_output_dir(&user_config)?;
    let output_dir_name = output_dir.display().to_string();
    info!(config = config_path.as_str(), output_dir = output_dir_name.as_str(); "Starting");

    CollectWaysEtl::new(&user_config.data_path, &settings.filter).process(&output_dir)?;

    // Scoring settings may have changed since the last run, only the collection is reused.
    let mut curvature = CurvatureEtl::new(&settings);
    curvature.clean(&output_dir)?;
    curvature.process(&output_dir)?;

    Ok(())
}
