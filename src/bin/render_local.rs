use anyhow::{Context, Result};
use clap::Parser;
use iso_map_renderer::assets::load_map_file;
use iso_map_renderer::pipeline::render_offline;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render a saved map document against a local graphics tree", long_about = None)]
struct Args {
    /// Path to the map JSON document
    #[arg(long)]
    map: PathBuf,

    /// Directory laid out like the graphics server (ground/, object/)
    #[arg(long, default_value = "cache")]
    gfx_dir: PathBuf,

    /// Output PNG path
    #[arg(long, default_value = "output/local.png")]
    output: PathBuf,

    /// Number of sprite files read concurrently
    #[arg(long, default_value = "8")]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let start_time = Instant::now();

    log::info!("Loading map document from {:?}", args.map);
    let map = load_map_file(&args.map)
        .await
        .with_context(|| format!("Failed to load map document {:?}", args.map))?;

    log::info!("Using graphics from {:?}", args.gfx_dir);
    render_offline(&map, &args.gfx_dir, &args.output, args.concurrency)
        .await
        .context("Render failed")?;

    log::info!(
        "Rendered {:?} in {}ms",
        args.output,
        start_time.elapsed().as_millis()
    );
    Ok(())
}
