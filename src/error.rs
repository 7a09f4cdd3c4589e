use thiserror::Error;

use crate::gallery::NodeId;

/// Terminal failure of one load invocation.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid clip endpoint `{url}`: {source}")]
    Url { url: String, #[source] source: url::ParseError },
    #[error("lookback of {hours} hours is out of range")]
    Window { hours: i64 },
    #[error("clip request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("thumbnail {url} failed to load: {source}")]
    Thumbnail { url: String, #[source] source: SizeError },
}

/// Failure to measure a single thumbnail.
#[derive(Debug, Error)]
pub enum SizeError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("not a decodable image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has zero width or height")]
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubstitutionError {
    #[error("no node {0} in the gallery")]
    NotFound(NodeId),
    #[error("node {0} is not a thumbnail")]
    NotAThumbnail(NodeId),
}
