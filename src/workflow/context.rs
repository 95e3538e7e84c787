// Workflow context: the JSON hand-off between stages.
//
// Stage 1 creates it; every later stage loads the previous stage's context,
// adds its own results and writes it back out. Fields owned by later stages
// are optional so an early context still loads.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::settings::{ordered, AnalyticsSystem, Persona, PlatformPlan};
use crate::clusters::metrics::ClusterMetrics;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowContext {
    pub generated_on: String,
    pub product: String,
    pub persona_name: String,
    pub lookback_days: u32,
    /// Winning cluster with blank angles, hooks and drivers removed
    pub winning_cluster: ClusterMetrics,
    pub primary_keyword: String,
    pub seo_title: String,
    pub meta_description: String,
    pub seo_hooks: Vec<String>,
    pub persona_profile: Persona,
    pub clusters: Vec<ClusterMetrics>,

    // Stage 2
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_keyword_density_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", with = "ordered")]
    pub secondary_keyword_density_percent: Vec<(String, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_package: Option<SeoPackage>,

    // Stage 3
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Distribution>,

    // Stage 4
    #[serde(default, skip_serializing_if = "Vec::is_empty", with = "ordered")]
    pub analytics: Vec<(String, AnalyticsSystem)>,

    // Stage 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_actions: Option<Vec<String>>,
}

/// Publishing metadata written by stage 2 (`step8_5_seo_package.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoPackage {
    pub seo_title: String,
    pub seo_description: String,
    pub keywords: Vec<String>,
    pub slug: String,
    pub word_count: usize,
    pub primary_keyword_density_percent: f64,
    #[serde(with = "ordered")]
    pub secondary_keyword_density_percent: Vec<(String, f64)>,
    pub grade_level_estimate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    pub slug: String,
    #[serde(with = "ordered")]
    pub platforms: Vec<(String, PlatformPlan)>,
    pub prompts: Vec<String>,
}

impl WorkflowContext {
    /// Load the context written by `previous_stage`.
    ///
    /// `path` comes from `--context`; a missing flag or file is an error
    /// naming the stage that should have produced it.
    pub fn load_from_previous(path: Option<&Path>, stage: u8) -> Result<Self> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => anyhow::bail!(
                "Stage {stage} requires a context file generated by Stage {}.",
                stage - 1
            ),
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read context file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse context JSON from {}", path.display()))
    }

    /// Write the context to `<output_dir>/context.json` and the shared path.
    pub fn save(&self, output_dir: &Path, shared_path: &Path) -> Result<Vec<PathBuf>> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize workflow context")?;

        let local = output_dir.join("context.json");
        fs::write(&local, &json)
            .with_context(|| format!("Failed to write {}", local.display()))?;

        if let Some(parent) = shared_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(shared_path, &json)
            .with_context(|| format!("Failed to write {}", shared_path.display()))?;

        Ok(vec![local, shared_path.to_path_buf()])
    }

    /// Slug from stage 2, or one derived from the SEO title.
    pub fn slug_or_derived(&self) -> String {
        self.slug
            .clone()
            .unwrap_or_else(|| crate::output::markdown::slugify(&self.seo_title))
    }
}
