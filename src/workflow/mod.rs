// Staged blog workflow: artifact generation from configuration.
//
//   stage1  research: score keyword clusters, pick a winner, persona + SEO
//   stage2  drafting: outline, draft body, optimization review, exports
//   stage3  cross-platform distribution plan
//   stage4  analytics & refinement
//   stage5  continuous growth loop
//
// Each stage writes Markdown artifacts into its output directory and hands
// a `WorkflowContext` to the next stage through `context.json`.

pub mod analytics;
pub mod context;
pub mod distribution;
pub mod draft;
pub mod growth;
pub mod research;
pub mod settings;

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::clusters::models::KeywordData;
use context::WorkflowContext;
use settings::WorkflowSettings;

/// Product name used when neither the CLI nor the config provides one.
pub const DEFAULT_PRODUCT: &str = "Affiliate Offer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Stage {
    Stage1,
    Stage2,
    Stage3,
    Stage4,
    Stage5,
}

impl Stage {
    pub fn number(&self) -> u8 {
        match self {
            Stage::Stage1 => 1,
            Stage::Stage2 => 2,
            Stage::Stage3 => 3,
            Stage::Stage4 => 4,
            Stage::Stage5 => 5,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage{}", self.number())
    }
}

/// Resolved per-run inputs shared by all stages.
#[derive(Debug, Clone)]
pub struct StageArgs {
    pub output_dir: PathBuf,
    /// Context JSON from the previous stage (stages 2-5)
    pub context: Option<PathBuf>,
    pub product: String,
    pub persona_name: String,
    pub lookback_days: u32,
    /// Project-wide copy of the latest context
    pub shared_context: PathBuf,
}

impl StageArgs {
    /// Fill product and persona name from settings when not given.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve(
        settings: &WorkflowSettings,
        output_dir: PathBuf,
        context: Option<PathBuf>,
        product: Option<String>,
        persona_name: Option<String>,
        lookback_days: u32,
        shared_context: PathBuf,
    ) -> Self {
        let product = product
            .or_else(|| settings.product.clone())
            .unwrap_or_else(|| DEFAULT_PRODUCT.to_string());
        let persona_name = persona_name.unwrap_or_else(|| settings.stage1.persona.name.clone());
        Self {
            output_dir,
            context,
            product,
            persona_name,
            lookback_days,
            shared_context,
        }
    }
}

/// Run one stage. Stage 1 needs keyword research data; the others ignore it.
pub fn run(
    stage: Stage,
    args: &StageArgs,
    settings: &WorkflowSettings,
    keyword_data: Option<&KeywordData>,
) -> Result<WorkflowContext> {
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let context = match stage {
        Stage::Stage1 => {
            let data = keyword_data.context("Stage 1 requires keyword cluster data")?;
            research::run(args, settings, data)?
        }
        Stage::Stage2 => draft::run(args, settings, load_previous(args, stage)?)?,
        Stage::Stage3 => distribution::run(args, settings, load_previous(args, stage)?)?,
        Stage::Stage4 => analytics::run(args, settings, load_previous(args, stage)?)?,
        Stage::Stage5 => growth::run(args, settings, load_previous(args, stage)?)?,
    };

    context.save(&args.output_dir, &args.shared_context)?;
    Ok(context)
}

fn load_previous(args: &StageArgs, stage: Stage) -> Result<WorkflowContext> {
    WorkflowContext::load_from_previous(args.context.as_deref(), stage.number())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Stage3.to_string(), "stage3");
        assert_eq!(Stage::Stage1.number(), 1);
    }

    #[test]
    fn test_missing_context_names_previous_stage() {
        let err = WorkflowContext::load_from_previous(None, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Stage 3 requires a context file generated by Stage 2."
        );
    }
}
