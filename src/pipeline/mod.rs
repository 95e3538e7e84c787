// Pipelines: orchestration over the pure modules.

pub mod refresh;
