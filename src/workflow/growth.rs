// Stage 5: continuous growth loop.

use anyhow::Result;

use super::context::WorkflowContext;
use super::settings::WorkflowSettings;
use super::StageArgs;
use crate::output::markdown::{bullets, fill, write_text_file};

pub fn run(
    args: &StageArgs,
    settings: &WorkflowSettings,
    mut context: WorkflowContext,
) -> Result<WorkflowContext> {
    let actions = &settings.stage5.actions;

    let mut lines = vec![
        "# Stage 5 — Continuous Growth Loop".to_string(),
        "Goal: Compound results weekly to scale affiliate income.".to_string(),
        String::new(),
        "## Weekly & Monthly Actions".to_string(),
    ];
    lines.extend(bullets(actions));
    lines.push(fill(
        "Log each action in the shared ROI dashboard and tag entries with the current winning \
         keyword cluster to keep the optimization loop focused on what converts.",
    ));
    write_text_file(&args.output_dir.join("stage5_growth_loop.md"), &lines.join("\n"))?;

    // Actions recorded by an earlier run stay put.
    if context.growth_actions.is_none() {
        context.growth_actions = Some(actions.clone());
    }
    Ok(context)
}
