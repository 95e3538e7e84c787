// Blog feeds: RSS/Atom parsing and the README post-list refresh.
//
// `parser` is the pure part: bytes in, (title, link) pairs out. The rest
// covers the collaborators around it: blog configuration, downloading with
// a local fallback, and splicing rendered lists into the README.

pub mod blogs;
pub mod parser;
pub mod readme;
pub mod source;

use std::path::PathBuf;

use thiserror::Error;

pub use parser::{parse_feed, FeedFormatError, FeedPost};

/// Anything that stops a README refresh.
#[derive(Debug, Error)]
pub enum FeedUpdateError {
    #[error("{0}")]
    Config(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Offline mode enabled but no local_feed found for '{0}'.")]
    OfflineWithoutLocal(String),

    #[error("Unable to retrieve feed from '{0}' and no local fallback provided.")]
    DownloadFailed(String),

    #[error("No feed source defined for '{0}'. Please provide a feed_url or local_feed.")]
    NoSource(String),

    #[error("Could not locate the BLOG-POST-LIST markers in the README file.")]
    MarkersNotFound,

    #[error(transparent)]
    Format(#[from] FeedFormatError),
}
