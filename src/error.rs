use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single HTTP GET, either for the page or for one image.
#[derive(Debug, Error, PartialEq)]
pub enum FetchError {
    #[error("invalid URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("invalid response body for {url}: {message}")]
    InvalidBody { url: String, message: String },
}

/// Run-level failures. Per-image failures never show up here, they are
/// recorded in the report instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to fetch website: {0}")]
    PageFetch(#[source] FetchError),

    #[error("no images found on {url}")]
    NoImagesFound { url: String },

    #[error("could not create output folder {path:?}: {source}")]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file: {0}")]
    ConfigParse(#[source] serde_json::Error),

    #[error("could not serialize report: {0}")]
    Report(#[source] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Why a single image could not be saved. Only ever rendered into a failed
/// outcome.
#[derive(Debug, Error)]
pub enum ItemDownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("could not write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
