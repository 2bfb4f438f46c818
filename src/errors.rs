//! Typed errors for the fetching side of the widgets.
//!
//! Decoration and rendering are total and never fail; everything that talks
//! to an infrastructure API reports a `WidgetError`.

use thiserror::Error;

/// Errors from fetching and resolving widget data.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server {id} not found in the servers list")]
    ServerNotFound { id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WidgetError {
    /// Whether the error comes from an upstream API rather than the request.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            WidgetError::Fetch { .. } | WidgetError::HttpStatus { .. } | WidgetError::Decode { .. }
        )
    }
}
