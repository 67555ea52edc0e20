use crate::assets::source::GfxSource;
use crate::assets::table::AssetTable;
use crate::data::{LayerKind, LayerRole, MapDescriptor, SpriteOrigins};
use crate::error::{RenderError, Result};
use image::RgbaImage;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Distinct assets a map references, per namespace.
#[derive(Debug, Default, PartialEq)]
pub struct AssetRequest {
    pub background: Option<u32>,
    pub ground: BTreeSet<u32>,
    pub object: BTreeSet<u32>,
}

impl AssetRequest {
    pub fn gather(map: &MapDescriptor) -> Self {
        let mut request = AssetRequest {
            background: map.background(),
            ..Default::default()
        };

        for role in LayerRole::DRAW_ORDER {
            let ids = match role.kind() {
                LayerKind::Ground => &mut request.ground,
                LayerKind::Object => &mut request.object,
            };
            ids.extend(map.layer_sprites(role).map(|(_, sprite)| sprite.asset_id));
        }

        request
    }

    /// Every image to download, background included, without duplicates
    pub fn images(&self) -> BTreeSet<(LayerKind, u32)> {
        let mut images: BTreeSet<(LayerKind, u32)> = self
            .ground
            .iter()
            .map(|&id| (LayerKind::Ground, id))
            .chain(self.object.iter().map(|&id| (LayerKind::Object, id)))
            .collect();
        if let Some(id) = self.background {
            images.insert((LayerKind::Ground, id));
        }
        images
    }
}

/// Turns a map into an [`AssetTable`]: gather ids, load metadata, fetch
/// images concurrently, decode in parallel. Nothing is drawn here.
pub struct AssetResolver {
    source: Arc<GfxSource>,
    concurrency: usize,
    show_progress: bool,
}

impl AssetResolver {
    pub fn new(source: GfxSource, concurrency: usize) -> Self {
        Self {
            source: Arc::new(source),
            concurrency: concurrency.max(1),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    async fn load_origins(&self, kind: LayerKind, ids: &BTreeSet<u32>) -> Result<SpriteOrigins> {
        if ids.is_empty() {
            return Ok(SpriteOrigins::new(kind, HashMap::new()));
        }

        let bytes = self.source.fetch(kind, 0, &kind.metadata_path()).await?;
        let origins = SpriteOrigins::from_json(kind, &bytes)?;

        // fail before downloading anything if an origin is missing
        for &id in ids {
            origins.origin(id)?;
        }
        Ok(origins)
    }

    async fn fetch_images(&self, wanted: BTreeSet<(LayerKind, u32)>) -> Result<Vec<(LayerKind, u32, Vec<u8>)>> {
        let progress = if self.show_progress {
            let bar = ProgressBar::new(wanted.len() as u64);
            if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}") {
                bar.set_style(style);
            }
            bar
        } else {
            ProgressBar::hidden()
        };
        progress.set_message("Fetching sprites");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (kind, asset_id) in wanted {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| RenderError::asset(kind, asset_id, e.to_string()))?;
                let bytes = source.fetch(kind, asset_id, &kind.image_path(asset_id)).await?;
                Ok::<_, RenderError>((kind, asset_id, bytes))
            });
        }

        let mut fetched = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let result = joined.map_err(|e| RenderError::Io(std::io::Error::other(e)))?;
            // returning drops the JoinSet, which aborts the remaining downloads
            fetched.push(result?);
            progress.inc(1);
        }
        progress.finish_and_clear();

        Ok(fetched)
    }

    pub async fn resolve(&self, map: &MapDescriptor) -> Result<AssetTable> {
        let request = AssetRequest::gather(map);
        let wanted = request.images();
        log::info!(
            "Resolving {} ground and {} object sprites{}",
            request.ground.len(),
            request.object.len(),
            if request.background.is_some() { " plus background" } else { "" }
        );

        let ground_origins = self.load_origins(LayerKind::Ground, &request.ground).await?;
        let object_origins = self.load_origins(LayerKind::Object, &request.object).await?;

        let fetched = self.fetch_images(wanted).await?;

        let mut images: HashMap<(LayerKind, u32), RgbaImage> = fetched
            .into_par_iter()
            .map(|(kind, asset_id, bytes)| {
                image::load_from_memory(&bytes)
                    .map(|img| ((kind, asset_id), img.to_rgba8()))
                    .map_err(|e| RenderError::asset(kind, asset_id, format!("cannot decode image: {}", e)))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        let mut table = AssetTable::new(ground_origins, object_origins);
        if let Some(id) = request.background {
            let background = if request.ground.contains(&id) {
                images.get(&(LayerKind::Ground, id)).cloned()
            } else {
                images.remove(&(LayerKind::Ground, id))
            };
            let background =
                background.ok_or_else(|| RenderError::asset(LayerKind::Ground, id, "background image missing"))?;
            table = table.with_background(background);
        }
        for ((kind, asset_id), image) in images {
            table.insert_image(kind, asset_id, image);
        }

        log::info!("Resolved {} sprite images", table.image_count());
        Ok(table)
    }
}
