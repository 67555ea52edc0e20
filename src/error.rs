//! Error types for map rendering

use crate::data::LayerKind;
use thiserror::Error;

/// Every failure is terminal for the invocation; nothing is retried.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The map provider returned no usable map data
    #[error("No data found: {0}")]
    DataNotFound(String),

    /// A referenced asset has no metadata entry or its image could not be loaded
    #[error("Cannot resolve {kind} asset {asset_id}: {reason}")]
    AssetResolutionFailure {
        kind: LayerKind,
        asset_id: u32,
        reason: String,
    },

    /// Bad user input, raised before any network activity
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A provider could not be reached or answered with an error
    #[error("Transport failure for {url}: {}", describe_transport(.status, .body, .message))]
    TransportFailure {
        url: String,
        status: Option<u16>,
        body: Option<String>,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

fn describe_transport(status: &Option<u16>, body: &Option<String>, message: &str) -> String {
    match (status, body) {
        (Some(status), Some(body)) if !body.is_empty() => format!("status {}: {}", status, body),
        (Some(status), _) => format!("status {}: {}", status, message),
        (None, _) => message.to_string(),
    }
}

impl RenderError {
    pub(crate) fn asset(kind: LayerKind, asset_id: u32, reason: impl Into<String>) -> Self {
        RenderError::AssetResolutionFailure {
            kind,
            asset_id,
            reason: reason.into(),
        }
    }

    pub(crate) fn transport(url: impl Into<String>, err: reqwest::Error) -> Self {
        RenderError::TransportFailure {
            url: url.into(),
            status: err.status().map(|s| s.as_u16()),
            body: None,
            message: err.to_string(),
        }
    }
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;
