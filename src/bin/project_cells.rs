use anyhow::{Context, Result};
use clap::Parser;
use iso_map_renderer::rendering::{cell_pixel, project};
use std::num::NonZeroU32;

#[derive(Parser, Debug)]
#[command(author, version, about = "Print grid and pixel positions of cell indices", long_about = None)]
struct Args {
    /// Cells per (even) row
    #[arg(long, default_value = "15")]
    width: u32,

    /// Number of cell indices to print, starting at 0
    #[arg(long, default_value = "60")]
    count: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cells_per_row = NonZeroU32::new(args.width).context("width must be at least 1")?;

    println!("index\tcol\trow\tpx\tpy");
    for index in 0..args.count {
        let pos = project(index, cells_per_row);
        let pixel = cell_pixel(pos);
        println!("{}\t{}\t{}\t{}\t{}", index, pos.x, pos.y, pixel.x, pixel.y);
    }
    Ok(())
}
