// src/pipeline/pipeline.rs

use std::path::Path;

use crate::error::Result;
use crate::models::Config;
use crate::utils::progress;

use super::crawl::run_crawl;
use super::extract::run_extract;
use super::fetch::run_fetch;
use super::open_storage;

/// Run the full pipeline: crawl, fetch, extract.
///
/// With `parse_only`, only extraction runs over documents already on disk.
pub async fn run_pipeline(config: &Config, storage_dir: &Path, parse_only: bool) -> Result<()> {
    progress::header("Harvester pipeline");
    let storage = open_storage(config, storage_dir);

    let total_steps = if parse_only { 1 } else { 3 };
    let mut current_step = 1;

    if !parse_only {
        progress::step(current_step, total_steps, "Crawl - Discovering order documents");
        run_crawl(config, &storage).await?;
        current_step += 1;

        progress::step(current_step, total_steps, "Fetch - Downloading documents");
        run_fetch(config, &storage).await?;
        current_step += 1;
    }

    progress::step(current_step, total_steps, "Extract - Writing order and item tables");
    run_extract(config, &storage).await?;

    log::info!("Pipeline complete");

    Ok(())
}
