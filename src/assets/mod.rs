pub mod cache;
pub mod resolver;
pub mod source;
pub mod table;

pub use cache::DiskCache;
pub use resolver::{AssetRequest, AssetResolver};
pub use source::{http_client, load_map_file, GfxSource, MapClient};
pub use table::AssetTable;
