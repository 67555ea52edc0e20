use crate::assets::{http_client, AssetResolver, GfxSource, MapClient};
use crate::config::RenderConfig;
use crate::data::MapDescriptor;
use crate::error::{RenderError, Result};
use crate::output::write_png;
use crate::rendering::{FinishedRaster, LayerCompositor};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Map ids are plain non-negative integers
pub fn parse_map_id(arg: &str) -> Result<u32> {
    arg.trim()
        .parse::<u32>()
        .map_err(|_| RenderError::InvalidArgument(format!("map id must be numeric, got {:?}", arg)))
}

/// Resolve every asset the map needs, then composite. Nothing is drawn
/// until all assets are in memory.
pub async fn render_map(map: &MapDescriptor, resolver: &AssetResolver) -> Result<FinishedRaster> {
    map.validate()?;

    let mismatched = map.mismatched_cell_ids();
    if mismatched > 0 {
        log::warn!(
            "{} cells declare an id different from their position; positions are used",
            mismatched
        );
    }

    let (width, height) = map.raster_size()?;
    log::info!(
        "Map is {}x{} cells with {} cell entries, image {}x{}",
        map.width,
        map.height,
        map.cells.len(),
        width,
        height
    );

    let assets = resolver.resolve(map).await?;
    LayerCompositor::new(map, &assets)?.render()
}

/// Fetch, render and write one map; returns the written path.
pub async fn render_map_id(config: &RenderConfig, map_id: u32) -> Result<PathBuf> {
    let start_time = Instant::now();

    let client = http_client(config.timeout_secs)?;
    let map = MapClient::new(client.clone(), config.clone()).fetch_map(map_id).await?;

    let resolver = AssetResolver::new(GfxSource::remote(client, config), config.concurrency)
        .with_progress(config.show_progress);
    let raster = render_map(&map, &resolver).await?;

    let output = config.output_path(map_id);
    write_png(&raster, &output).await?;

    log::info!(
        "Map {} rendered in {}ms ({:?})",
        map_id,
        start_time.elapsed().as_millis(),
        output
    );
    Ok(output)
}

/// Render a map document from disk against a local gfx tree.
pub async fn render_offline(map: &MapDescriptor, gfx_dir: &Path, output: &Path, concurrency: usize) -> Result<()> {
    let resolver = AssetResolver::new(GfxSource::offline(gfx_dir), concurrency);
    let raster = render_map(map, &resolver).await?;
    write_png(&raster, output).await
}
