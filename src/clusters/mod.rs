// Keyword clusters: research data models and cluster scoring.

pub mod metrics;
pub mod models;
