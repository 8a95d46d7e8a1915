use crate::models::NormalizeError;
use thiserror::Error;

/// Why a complex's listing could not be produced.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Transport-level failure talking to the site
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Start or end of an embedded block not found
    #[error("marker not found: {0}")]
    MissingMarker(&'static str),

    /// A marker was found but what followed it had an unexpected shape
    #[error("unexpected markup: {0}")]
    Markup(String),

    #[error("embedded JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("listing could not be normalized: {0}")]
    Normalize(#[from] NormalizeError),

    /// The site must always list units but listed none
    #[error("no units listed")]
    NoListings,
}
