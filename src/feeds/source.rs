// Feed retrieval: network download with a local-file fallback.
//
// The downloader sits behind the `FeedSource` trait so tests (and offline
// runs) can swap it out. `fetch_feed` decides which source to use:
//
//   1. feed_url, unless offline (a failure is logged, not fatal)
//   2. local_feed, if the file exists
//   3. otherwise an error explaining what was missing

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use super::blogs::BlogConfig;
use super::FeedUpdateError;

/// Something that can download raw feed bytes from a URL.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP downloader backed by reqwest.
pub struct HttpFeedSource {
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub const USER_AGENT: &'static str =
        "Mozilla/5.0 (compatible; READMEUpdater/1.0; +https://github.com/)";

    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(Self::USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("{url} returned {status}");
        }

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body from {url}"))?;
        Ok(body.to_vec())
    }
}

/// Retrieve the raw feed for a blog.
pub async fn fetch_feed(
    blog: &BlogConfig,
    source: &dyn FeedSource,
    offline: bool,
) -> Result<Vec<u8>, FeedUpdateError> {
    if !offline {
        if let Some(url) = blog.feed_url.as_deref() {
            match source.download(url).await {
                Ok(bytes) => {
                    debug!(feed = %blog.name, bytes = bytes.len(), "Downloaded feed");
                    return Ok(bytes);
                }
                Err(e) => {
                    warn!(feed = %blog.name, url, error = %e, "Failed to download feed");
                }
            }
        }
    }

    if let Some(path) = blog.local_feed.as_deref() {
        if path.exists() {
            debug!(feed = %blog.name, path = %path.display(), "Reading local feed");
            return tokio::fs::read(path)
                .await
                .map_err(|source| FeedUpdateError::Io {
                    path: path.to_path_buf(),
                    source,
                });
        }
    }

    match (&blog.feed_url, offline) {
        (Some(_), true) => Err(FeedUpdateError::OfflineWithoutLocal(blog.name.clone())),
        (Some(url), false) => Err(FeedUpdateError::DownloadFailed(url.clone())),
        (None, _) => Err(FeedUpdateError::NoSource(blog.name.clone())),
    }
}
