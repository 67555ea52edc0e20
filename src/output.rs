use crate::error::Result;
use crate::rendering::FinishedRaster;
use std::path::Path;

/// Encode the raster and write it to `path`, creating parent directories.
/// Only finished rasters can be written, so a failed render leaves no file.
pub async fn write_png<P: AsRef<Path>>(raster: &FinishedRaster, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = raster.encode_png()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, &bytes).await?;

    let (width, height) = raster.dimensions();
    log::info!("Wrote {}x{} image ({} bytes) to {:?}", width, height, bytes.len(), path);
    Ok(())
}
