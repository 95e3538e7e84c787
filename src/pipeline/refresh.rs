// README refresh pipeline.
//
// For every configured blog: fetch the feed, parse it, render the first
// `max_posts` posts. Then splice all rendered sections into the README in
// one write (skipped on a dry run). Any failure aborts the whole refresh so
// the README is never left half-updated.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::feeds::blogs::BlogConfig;
use crate::feeds::readme;
use crate::feeds::source::{self, FeedSource};
use crate::feeds::{parse_feed, FeedUpdateError};

/// What a refresh run should do with its output.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshOptions {
    /// Never touch the network; use local feed files only
    pub offline: bool,
    /// Render sections but don't write the README
    pub dry_run: bool,
    /// Draw a progress bar over the feeds
    pub show_progress: bool,
}

/// Run the refresh and return the rendered Markdown section per blog.
pub async fn run(
    blogs: &[BlogConfig],
    downloader: &dyn FeedSource,
    readme_path: &Path,
    options: RefreshOptions,
) -> Result<Vec<String>, FeedUpdateError> {
    let pb = if options.show_progress {
        let pb = ProgressBar::new(blogs.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar().template("  Feeds [{bar:30}] {pos}/{len} {msg}") {
            pb.set_style(style);
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut sections = Vec::with_capacity(blogs.len());
    for blog in blogs {
        pb.set_message(blog.name.clone());
        info!(feed = %blog.name, "Processing feed");

        let content = source::fetch_feed(blog, downloader, options.offline).await?;
        let posts = parse_feed(&content)?;
        info!(feed = %blog.name, posts = posts.len(), max = blog.max_posts, "Parsed feed");

        sections.push(readme::build_markdown(&posts, blog.max_posts));
        pb.inc(1);
    }
    pb.finish_and_clear();

    if !options.dry_run {
        readme::update_readme(readme_path, &sections)?;
        info!(path = %readme_path.display(), sections = sections.len(), "README updated");
    }

    Ok(sections)
}
