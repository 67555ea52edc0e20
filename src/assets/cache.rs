use crate::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Fetched resources stored under the same relative paths as on the gfx server.
///
/// Check-then-write is not atomic; only one render process uses a cache at a time.
#[derive(Debug, Clone)]
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub async fn get(&self, relative: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(relative);
        if !fs::try_exists(&path).await? {
            log::debug!("Cache miss: {:?}", path);
            return Ok(None);
        }
        log::debug!("Cache hit: {:?}", path);
        Ok(Some(fs::read(&path).await?))
    }

    pub async fn put(&self, relative: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;
        Ok(())
    }
}
