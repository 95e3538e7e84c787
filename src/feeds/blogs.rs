// Blog feed configuration (`config/blogs.json`).
//
//   { "blogs": [ { "name": "...", "feed_url": "...", "local_feed": "...", "max_posts": 5 } ] }
//
// Entries are validated up front so a bad entry fails the run before any
// network traffic happens.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use super::FeedUpdateError;

/// Posts rendered per blog when `max_posts` is absent.
pub const DEFAULT_MAX_POSTS: usize = 5;

/// Configuration for a single blog feed.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogConfig {
    pub name: String,
    pub feed_url: Option<String>,
    /// Already resolved against the project root
    pub local_feed: Option<PathBuf>,
    pub max_posts: usize,
}

#[derive(Debug, Deserialize)]
struct RawBlog {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    feed_url: Option<Value>,
    #[serde(default)]
    local_feed: Option<Value>,
    #[serde(default)]
    max_posts: Option<usize>,
}

impl BlogConfig {
    fn from_raw(raw: RawBlog, root: &Path) -> Result<Self, FeedUpdateError> {
        let name = match raw.name {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string().trim().to_string(),
        };
        if name.is_empty() {
            return Err(FeedUpdateError::Config(
                "Each blog entry must include a non-empty 'name'.".to_string(),
            ));
        }

        // Non-string sources are treated as absent
        let feed_url = match raw.feed_url {
            Some(Value::String(url)) => Some(url.trim().to_string()).filter(|u| !u.is_empty()),
            _ => None,
        };
        let local_feed = match raw.local_feed {
            Some(Value::String(path)) => Some(root.join(path)),
            _ => None,
        };

        Ok(Self {
            name,
            feed_url,
            local_feed,
            max_posts: raw.max_posts.unwrap_or(DEFAULT_MAX_POSTS),
        })
    }
}

/// Parse blog entries from JSON text, resolving local paths against `root`.
pub fn parse_blogs(content: &str, root: &Path) -> Result<Vec<BlogConfig>, FeedUpdateError> {
    let data: Value = serde_json::from_str(content).map_err(|source| FeedUpdateError::Json {
        path: PathBuf::from("<blogs config>"),
        source,
    })?;

    let Some(entries) = data.get("blogs").and_then(Value::as_array) else {
        return Err(FeedUpdateError::Config(
            "The configuration file must include a 'blogs' list.".to_string(),
        ));
    };

    entries
        .iter()
        .map(|entry| {
            if !entry.is_object() {
                return Err(FeedUpdateError::Config(
                    "Each blog entry must be a JSON object.".to_string(),
                ));
            }
            let raw: RawBlog = serde_json::from_value(entry.clone()).map_err(|e| {
                FeedUpdateError::Config(format!("Invalid blog entry: {e}"))
            })?;
            BlogConfig::from_raw(raw, root)
        })
        .collect()
}

/// Load blog entries from a JSON file.
pub fn load_blogs(path: &Path, root: &Path) -> Result<Vec<BlogConfig>, FeedUpdateError> {
    let content = fs::read_to_string(path).map_err(|source| FeedUpdateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_blogs(&content, root).map_err(|e| match e {
        FeedUpdateError::Json { source, .. } => FeedUpdateError::Json {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}
