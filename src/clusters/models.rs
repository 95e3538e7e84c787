// Keyword research data: the shapes loaded from `keyword_clusters.json`.
//
// These are immutable inputs. Derived numbers live in `metrics`.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::workflow::settings::SettingsError;

/// CTR assumed for keywords that don't carry an estimate.
pub const DEFAULT_CTR: f64 = 0.12;

fn default_ctr() -> f64 {
    DEFAULT_CTR
}

/// A single researched search term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    /// Monthly search volume
    pub volume: u64,
    /// SEO difficulty on a 0-100 scale
    pub difficulty: f64,
    #[serde(default = "default_ctr")]
    pub ctr_estimate: f64,
    #[serde(default)]
    pub pinterest_angle: String,
    #[serde(default)]
    pub meta_hook: String,
    #[serde(default)]
    pub emotional_driver: String,
}

/// How likely a cluster's traffic is to convert.
///
/// Anything other than "High" or "Low" in the data file is read as Medium.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum ConversionPotential {
    High,
    #[default]
    Medium,
    Low,
}

impl ConversionPotential {
    pub fn parse(value: &str) -> Self {
        match value {
            "High" => ConversionPotential::High,
            "Low" => ConversionPotential::Low,
            "Medium" => ConversionPotential::Medium,
            _ => ConversionPotential::Medium,
        }
    }

    /// Volume multiplier used by the cluster score.
    pub fn weight(&self) -> f64 {
        match self {
            ConversionPotential::High => 3.0,
            ConversionPotential::Medium => 2.0,
            ConversionPotential::Low => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionPotential::High => "High",
            ConversionPotential::Medium => "Medium",
            ConversionPotential::Low => "Low",
        }
    }
}

impl From<String> for ConversionPotential {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ConversionPotential> for &'static str {
    fn from(value: ConversionPotential) -> Self {
        value.as_str()
    }
}

impl fmt::Display for ConversionPotential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A themed group of keywords sharing emotional framing and intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub core_emotion: String,
    #[serde(default)]
    pub conversion_potential: ConversionPotential,
    #[serde(default)]
    pub product_compatibility: String,
    #[serde(default)]
    pub notes: String,
    pub keywords: Vec<Keyword>,
}

/// Top-level keyword research file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordData {
    pub clusters: Vec<Cluster>,
}

impl KeywordData {
    /// Load and validate keyword research data from a JSON file.
    ///
    /// Every cluster must carry at least one keyword, since averages over an
    /// empty cluster are undefined.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data: KeywordData =
            serde_json::from_str(&content).map_err(|source| SettingsError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.clusters.is_empty() {
            return Err(SettingsError::Invalid(
                "keyword data contains no clusters".to_string(),
            ));
        }
        if let Some(empty) = self.clusters.iter().find(|c| c.keywords.is_empty()) {
            return Err(SettingsError::Invalid(format!(
                "cluster '{}' has no keywords",
                empty.id
            )));
        }
        Ok(())
    }
}
