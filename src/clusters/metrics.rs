// Cluster scoring.
//
// Each cluster is reduced to volume/difficulty/CTR aggregates plus a single
// ranking score:
//
//   score = total_volume * conversion_weight + avg_ctr * 1000 - avg_difficulty * 45
//
// The cluster with the highest score wins and drives the rest of the
// workflow (primary keyword, hooks, persona copy).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::{Cluster, ConversionPotential, Keyword};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// Averages over an empty keyword list are undefined.
    #[error("cluster '{id}' has no keywords to score")]
    NoKeywords { id: String },
}

/// Derived metrics for one cluster, ready for templating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMetrics {
    pub id: String,
    pub label: String,
    pub core_emotion: String,
    pub conversion_potential: ConversionPotential,
    pub product_compatibility: String,
    pub notes: String,
    pub total_volume: u64,
    pub avg_difficulty: f64,
    pub avg_ctr: f64,
    pub score: f64,
    pub keywords: Vec<Keyword>,
    /// Up to three terms, highest volume first
    pub top_keywords: Vec<String>,
    /// First-occurrence order, duplicates dropped (may include "")
    pub pinterest_angles: Vec<String>,
    pub meta_hooks: Vec<String>,
    pub emotional_drivers: Vec<String>,
}

impl ClusterMetrics {
    /// Pinterest angles with empty entries removed.
    pub fn visible_angles(&self) -> Vec<String> {
        non_empty(&self.pinterest_angles)
    }

    pub fn visible_hooks(&self) -> Vec<String> {
        non_empty(&self.meta_hooks)
    }

    pub fn visible_drivers(&self) -> Vec<String> {
        non_empty(&self.emotional_drivers)
    }

    /// Copy of these metrics with empty angles, hooks and drivers dropped.
    ///
    /// This is what later stages see as the winning cluster.
    pub fn without_blanks(&self) -> Self {
        Self {
            pinterest_angles: self.visible_angles(),
            meta_hooks: self.visible_hooks(),
            emotional_drivers: self.visible_drivers(),
            ..self.clone()
        }
    }
}

fn non_empty(values: &[String]) -> Vec<String> {
    values.iter().filter(|v| !v.is_empty()).cloned().collect()
}

/// Compute derived metrics for a cluster.
pub fn cluster_metrics(cluster: &Cluster) -> Result<ClusterMetrics, ClusterError> {
    let keywords = &cluster.keywords;
    if keywords.is_empty() {
        return Err(ClusterError::NoKeywords {
            id: cluster.id.clone(),
        });
    }

    let count = keywords.len() as f64;
    let total_volume: u64 = keywords.iter().map(|kw| kw.volume).sum();
    let avg_difficulty = keywords.iter().map(|kw| kw.difficulty).sum::<f64>() / count;
    let avg_ctr = keywords.iter().map(|kw| kw.ctr_estimate).sum::<f64>() / count;

    let weight = cluster.conversion_potential.weight();
    let score = total_volume as f64 * weight + avg_ctr * 1000.0 - avg_difficulty * 45.0;

    // sort_by is stable, so equal volumes keep their original order
    let mut by_volume: Vec<&Keyword> = keywords.iter().collect();
    by_volume.sort_by(|a, b| b.volume.cmp(&a.volume));
    let top_keywords = by_volume
        .iter()
        .take(3)
        .map(|kw| kw.term.clone())
        .collect();

    Ok(ClusterMetrics {
        id: cluster.id.clone(),
        label: cluster.label.clone(),
        core_emotion: cluster.core_emotion.clone(),
        conversion_potential: cluster.conversion_potential,
        product_compatibility: cluster.product_compatibility.clone(),
        notes: cluster.notes.clone(),
        total_volume,
        avg_difficulty,
        avg_ctr,
        score,
        keywords: keywords.clone(),
        top_keywords,
        pinterest_angles: dedupe_preserve_order(keywords.iter().map(|kw| &kw.pinterest_angle)),
        meta_hooks: dedupe_preserve_order(keywords.iter().map(|kw| &kw.meta_hook)),
        emotional_drivers: dedupe_preserve_order(keywords.iter().map(|kw| &kw.emotional_driver)),
    })
}

/// Score every cluster, in input order.
pub fn score_all(clusters: &[Cluster]) -> Result<Vec<ClusterMetrics>, ClusterError> {
    clusters.iter().map(cluster_metrics).collect()
}

/// The highest-scoring cluster. Ties go to the one listed first.
pub fn select_winner(metrics: &[ClusterMetrics]) -> Option<&ClusterMetrics> {
    metrics
        .iter()
        .reduce(|best, candidate| if candidate.score > best.score { candidate } else { best })
}

/// Keep the first occurrence of each value, preserving order.
pub fn dedupe_preserve_order<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for value in values {
        let value = value.as_ref();
        if seen.insert(value.to_string()) {
            ordered.push(value.to_string());
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(term: &str, volume: u64, difficulty: f64) -> Keyword {
        Keyword {
            term: term.to_string(),
            volume,
            difficulty,
            ctr_estimate: 0.12,
            pinterest_angle: String::new(),
            meta_hook: String::new(),
            emotional_driver: String::new(),
        }
    }

    fn cluster(potential: ConversionPotential, keywords: Vec<Keyword>) -> Cluster {
        Cluster {
            id: "c1".to_string(),
            label: "Cluster".to_string(),
            core_emotion: "Hope".to_string(),
            conversion_potential: potential,
            product_compatibility: String::new(),
            notes: String::new(),
            keywords,
        }
    }

    #[test]
    fn test_score_formula() {
        let c = cluster(
            ConversionPotential::High,
            vec![keyword("a", 100, 10.0), keyword("b", 50, 30.0)],
        );
        let m = cluster_metrics(&c).unwrap();
        // 150 * 3 + 0.12 * 1000 - 20 * 45 = 450 + 120 - 900
        assert_eq!(m.total_volume, 150);
        assert!((m.avg_difficulty - 20.0).abs() < 1e-9);
        assert!((m.score - -330.0).abs() < 1e-9, "got {}", m.score);
    }

    #[test]
    fn test_top_keywords_stable_ties() {
        let c = cluster(
            ConversionPotential::Medium,
            vec![
                keyword("first", 10, 0.0),
                keyword("big", 99, 0.0),
                keyword("second", 10, 0.0),
                keyword("third", 10, 0.0),
            ],
        );
        let m = cluster_metrics(&c).unwrap();
        assert_eq!(m.top_keywords, vec!["big", "first", "second"]);
    }

    #[test]
    fn test_empty_cluster_is_an_error() {
        let c = cluster(ConversionPotential::Low, vec![]);
        assert_eq!(
            cluster_metrics(&c),
            Err(ClusterError::NoKeywords {
                id: "c1".to_string()
            })
        );
    }

    #[test]
    fn test_dedupe_keeps_empty_string_once() {
        let out = dedupe_preserve_order(["", "a", "", "b", "a"]);
        assert_eq!(out, vec!["", "a", "b"]);
    }

    #[test]
    fn test_select_winner_first_max() {
        let c = cluster(ConversionPotential::Medium, vec![keyword("x", 10, 0.0)]);
        let mut a = cluster_metrics(&c).unwrap();
        a.id = "a".to_string();
        let mut b = a.clone();
        b.id = "b".to_string();
        let metrics = vec![a, b];
        assert_eq!(select_winner(&metrics).unwrap().id, "a");
    }

    #[test]
    fn test_select_winner_empty() {
        assert!(select_winner(&[]).is_none());
    }
}
