use crate::assets::cache::DiskCache;
use crate::config::RenderConfig;
use crate::data::{LayerKind, MapDescriptor};
use crate::error::{RenderError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| RenderError::transport("<client>", e))
}

/// GET a resource; a non-success answer keeps the provider's body as the diagnostic.
async fn get_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| RenderError::transport(url, e))?;

    let status = response.status();
    if !status.is_success() {
        let (body, message) = match response.text().await {
            Ok(body) => (Some(body), status.to_string()),
            Err(e) => (None, format!("{} (body unreadable: {})", status, e)),
        };
        return Err(RenderError::TransportFailure {
            url: url.to_string(),
            status: Some(status.as_u16()),
            body,
            message,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| RenderError::transport(url, e))?;
    Ok(bytes.to_vec())
}

/// Map data provider backed by the map API.
pub struct MapClient {
    client: reqwest::Client,
    config: RenderConfig,
}

impl MapClient {
    pub fn new(client: reqwest::Client, config: RenderConfig) -> Self {
        Self { client, config }
    }

    pub async fn fetch_map(&self, map_id: u32) -> Result<MapDescriptor> {
        let url = self.config.map_url(map_id);
        log::info!("Fetching map {} from {}", map_id, url);
        let bytes = get_bytes(&self.client, &url).await?;
        MapDescriptor::from_json(&bytes)
    }
}

/// Read a map document saved on disk
pub async fn load_map_file<P: AsRef<Path>>(path: P) -> Result<MapDescriptor> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    MapDescriptor::from_json(&bytes)
}

/// Provider of sprite metadata documents and sprite images.
#[derive(Debug, Clone)]
pub enum GfxSource {
    /// Download from the gfx server, optionally through a disk cache
    Remote {
        client: reqwest::Client,
        base_url: String,
        cache: Option<DiskCache>,
    },
    /// Read from a local directory laid out like the gfx server; never touches the network
    Offline { root: PathBuf },
}

impl GfxSource {
    pub fn remote(client: reqwest::Client, config: &RenderConfig) -> Self {
        GfxSource::Remote {
            client,
            base_url: config.gfx_url.trim_end_matches('/').to_string(),
            cache: config.cache_dir.as_ref().map(DiskCache::new),
        }
    }

    pub fn offline<P: AsRef<Path>>(root: P) -> Self {
        GfxSource::Offline {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Fetch `relative` (e.g. `object/431.png`). Misses are reported against
    /// `kind`/`asset_id`; use asset id 0 for metadata documents.
    pub async fn fetch(&self, kind: LayerKind, asset_id: u32, relative: &str) -> Result<Vec<u8>> {
        match self {
            GfxSource::Offline { root } => {
                let path = root.join(relative);
                tokio::fs::read(&path)
                    .await
                    .map_err(|e| RenderError::asset(kind, asset_id, format!("cannot read {:?}: {}", path, e)))
            }
            GfxSource::Remote { client, base_url, cache } => {
                if let Some(cache) = cache {
                    if let Some(bytes) = cache.get(relative).await? {
                        return Ok(bytes);
                    }
                }

                let url = format!("{}/{}", base_url, relative);
                let bytes = match get_bytes(client, &url).await {
                    Ok(bytes) => bytes,
                    Err(RenderError::TransportFailure { status: Some(status), .. }) => {
                        return Err(RenderError::asset(
                            kind,
                            asset_id,
                            format!("{} answered with status {}", url, status),
                        ));
                    }
                    Err(e) => return Err(e),
                };

                if let Some(cache) = cache {
                    cache.put(relative, &bytes).await?;
                }
                Ok(bytes)
            }
        }
    }
}
