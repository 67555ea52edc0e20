use std::path::PathBuf;

/// Where map documents and graphics come from, and where results go.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Map API root; a map document lives at `<api_url>/<map_id>/`
    pub api_url: String,
    /// Graphics root holding `ground/` and `object/`
    pub gfx_url: String,
    /// Local mirror of fetched graphics; `None` disables caching
    pub cache_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Maximum number of asset downloads in flight
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub show_progress: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.dofusretro.fr/maps".to_string(),
            gfx_url: "https://cdn.dofusretro.fr/img/maps-gfx".to_string(),
            cache_dir: Some(PathBuf::from("cache")),
            output_dir: PathBuf::from("output"),
            concurrency: 8,
            timeout_secs: 30,
            show_progress: true,
        }
    }
}

impl RenderConfig {
    pub fn map_url(&self, map_id: u32) -> String {
        format!("{}/{}/", self.api_url.trim_end_matches('/'), map_id)
    }

    pub fn output_path(&self, map_id: u32) -> PathBuf {
        self.output_dir.join(format!("{}.png", map_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_and_paths() {
        let config = RenderConfig {
            api_url: "http://localhost:8080/maps/".to_string(),
            output_dir: PathBuf::from("out"),
            ..Default::default()
        };
        assert_eq!(config.map_url(7411), "http://localhost:8080/maps/7411/");
        assert_eq!(config.output_path(7411), PathBuf::from("out/7411.png"));
    }
}
