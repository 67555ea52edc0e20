pub mod assets;
pub mod config;
pub mod data;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod rendering;

pub use config::RenderConfig;
pub use error::{RenderError, Result};
