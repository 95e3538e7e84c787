use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

/// Default download timeout for feed requests, in seconds.
pub const DEFAULT_FEED_TIMEOUT_SECS: u64 = 30;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every path
/// has a default relative to the project root; CLI flags override them per
/// invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root; relative `local_feed` paths resolve against it
    pub root: PathBuf,
    pub workflow_config: PathBuf,
    pub keyword_data: PathBuf,
    /// Project-wide copy of the latest workflow context
    pub shared_context: PathBuf,
    pub blogs_config: PathBuf,
    pub readme: PathBuf,
    pub feed_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let root = env::var("BLOGFLOW_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let feed_timeout_secs = match env::var("BLOGFLOW_FEED_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("BLOGFLOW_FEED_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"))?,
            Err(_) => DEFAULT_FEED_TIMEOUT_SECS,
        };

        Ok(Self {
            workflow_config: path_var("BLOGFLOW_WORKFLOW_CONFIG", &root, "config/blog_post_workflow.json"),
            keyword_data: path_var("BLOGFLOW_KEYWORD_DATA", &root, "data/keyword_clusters.json"),
            shared_context: path_var("BLOGFLOW_SHARED_CONTEXT", &root, "artifacts/context.json"),
            blogs_config: path_var("BLOGFLOW_BLOGS_CONFIG", &root, "config/blogs.json"),
            readme: path_var("BLOGFLOW_README", &root, "README.md"),
            feed_timeout: Duration::from_secs(feed_timeout_secs),
            root,
        })
    }

    /// Check that a configured input file exists before a command reads it.
    pub fn require_file(path: &Path, what: &str) -> Result<()> {
        if !path.is_file() {
            anyhow::bail!(
                "{what} not found at {}\n\
                 Pass the path explicitly or set the matching BLOGFLOW_* variable in .env.",
                path.display()
            );
        }
        Ok(())
    }
}

/// Path from `var`, falling back to `default` under `root`.
fn path_var(var: &str, root: &Path, default: &str) -> PathBuf {
    env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| root.join(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_var_default_under_root() {
        let path = path_var("BLOGFLOW_TEST_UNSET_VARIABLE", Path::new("/srv/site"), "README.md");
        assert_eq!(path, PathBuf::from("/srv/site/README.md"));
    }

    #[test]
    fn test_require_file_missing() {
        let err = Config::require_file(Path::new("/no/such/blogs.json"), "Blogs configuration")
            .unwrap_err();
        assert!(err.to_string().starts_with("Blogs configuration not found at /no/such/blogs.json"));
    }
}
