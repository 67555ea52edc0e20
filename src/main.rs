use anyhow::{Context, Result};
use clap::Parser;
use iso_map_renderer::pipeline::{parse_map_id, render_map_id};
use iso_map_renderer::RenderConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render an isometric game map to a PNG", long_about = None)]
struct Args {
    /// Numeric id of the map to render
    map_id: String,

    /// Map API root (the map document is <api-url>/<map-id>/)
    #[arg(long, default_value = "https://api.dofusretro.fr/maps")]
    api_url: String,

    /// Graphics root holding ground/ and object/
    #[arg(long, default_value = "https://cdn.dofusretro.fr/img/maps-gfx")]
    gfx_url: String,

    /// Directory mirroring downloaded graphics
    #[arg(long, default_value = "cache")]
    cache_dir: PathBuf,

    /// Always download graphics, never read or write the cache
    #[arg(long)]
    no_cache: bool,

    /// Directory the PNG is written to, as <map-id>.png
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Maximum number of graphics downloads in flight
    #[arg(long, default_value = "8")]
    concurrency: usize,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // reject bad ids before any network activity
    let map_id = parse_map_id(&args.map_id)?;

    let config = RenderConfig {
        api_url: args.api_url,
        gfx_url: args.gfx_url,
        cache_dir: (!args.no_cache).then_some(args.cache_dir),
        output_dir: args.output_dir,
        concurrency: args.concurrency,
        timeout_secs: args.timeout_secs,
        show_progress: true,
    };

    let output = render_map_id(&config, map_id)
        .await
        .with_context(|| format!("Failed to render map {}", map_id))?;

    log::info!("Done! ({:?})", output);
    Ok(())
}
