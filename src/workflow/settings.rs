// Typed workflow configuration (`config/blog_post_workflow.json`).
//
// One section per stage. Map-shaped sections (platform plans, analytics
// systems) are kept as ordered (name, value) lists so generated documents
// follow the order of the file.

use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Structured failure while loading configuration or data files.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_tracking_prefix() -> String {
    "understandingman".to_string()
}

fn default_watermark() -> String {
    "Understanding Man".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSettings {
    #[serde(default)]
    pub product: Option<String>,
    /// Prefix for `?tid=` tracking parameters
    #[serde(default = "default_tracking_prefix")]
    pub tracking_prefix: String,
    #[serde(default = "default_watermark")]
    pub watermark: String,
    pub stage1: ResearchSettings,
    pub stage2: DraftSettings,
    pub stage3: DistributionSettings,
    pub stage4: AnalyticsSettings,
    pub stage5: GrowthSettings,
}

impl WorkflowSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: WorkflowSettings =
            serde_json::from_str(&content).map_err(|source| SettingsError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.stage1.persona.name.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "stage1.persona.name must not be empty".to_string(),
            ));
        }
        if self.stage2.outline.sections.is_empty() {
            return Err(SettingsError::Invalid(
                "stage2.outline.sections must list at least one section".to_string(),
            ));
        }
        Ok(())
    }
}

// ------------------------------------------------------------
// Stage 1: research
// ------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSettings {
    pub persona: Persona,
    pub seo_templates: SeoTemplates,
    #[serde(default)]
    pub competitor_audit: Vec<Competitor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub desires: Vec<String>,
    #[serde(default)]
    pub search_intent: Vec<String>,
    pub keyword_map: KeywordMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMap {
    pub primary: String,
    #[serde(default)]
    pub supporting: Vec<String>,
}

/// Templates with `{primary_keyword}`, `{product}`, `{persona_short}` and
/// `{lookback_days}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoTemplates {
    pub title: String,
    pub meta_description: String,
    #[serde(default)]
    pub hooks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competitor {
    pub domain: String,
    #[serde(default)]
    pub opportunity_keywords: Vec<String>,
    #[serde(default)]
    pub serp_gap: String,
}

// ------------------------------------------------------------
// Stage 2: drafting
// ------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSettings {
    pub outline: Outline,
    #[serde(default)]
    pub faq: Vec<Faq>,
    #[serde(default)]
    pub seo_package_keywords: Vec<String>,
    pub image_brief: ImageBrief,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default)]
    pub emotional_arc: Vec<String>,
    pub sections: Vec<OutlineSection>,
    #[serde(default)]
    pub external_links: Vec<String>,
    #[serde(default)]
    pub internal_links: Vec<String>,
    #[serde(default)]
    pub affiliate_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineSection {
    pub heading: String,
    #[serde(default)]
    pub themes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageBrief {
    pub hero_alt_text: String,
    #[serde(default)]
    pub thumbnails: Vec<String>,
}

// ------------------------------------------------------------
// Stage 3: distribution
// ------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionSettings {
    #[serde(default)]
    pub prompts: Vec<String>,
    #[serde(with = "ordered")]
    pub platforms: Vec<(String, PlatformPlan)>,
}

/// Per-platform plan. Every field is optional; only present ones render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_structure: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posting_times: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concepts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posting_schedule: Option<Vec<String>>,
}

// ------------------------------------------------------------
// Stage 4: analytics
// ------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    #[serde(with = "ordered")]
    pub analytics_systems: Vec<(String, AnalyticsSystem)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSystem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combines: Option<Vec<String>>,
}

// ------------------------------------------------------------
// Stage 5: growth
// ------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthSettings {
    #[serde(default)]
    pub actions: Vec<String>,
}

/// (De)serialize a JSON object as an ordered list of (key, value) pairs.
pub mod ordered {
    use super::*;

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S, T>(entries: &Vec<(String, T)>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        serializer.collect_map(entries.iter().map(|(k, v)| (k, v)))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
            type Value = Vec<(String, T)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}
