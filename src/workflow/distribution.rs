// Stage 3: cross-platform distribution plan.

use anyhow::Result;
use serde_json::Value;
use tracing::info;

use super::context::{Distribution, WorkflowContext};
use super::settings::{PlatformPlan, WorkflowSettings};
use super::StageArgs;
use crate::output::markdown::{bullets, write_text_file};

pub fn run(
    args: &StageArgs,
    settings: &WorkflowSettings,
    mut context: WorkflowContext,
) -> Result<WorkflowContext> {
    let config = &settings.stage3;
    let slug = context.slug_or_derived();

    let mut lines = vec![
        "# Stage 3 — Cross-Platform Distribution".to_string(),
        "Goal: Apply Pareto principle to focus on top-performing social channels.".to_string(),
        String::new(),
        "## Strategy Prompts".to_string(),
    ];
    lines.extend(bullets(&config.prompts));
    lines.push(String::new());

    for (platform, plan) in &config.platforms {
        lines.extend(platform_section(platform, plan, &settings.tracking_prefix, &slug));
        lines.push(String::new());
    }

    write_text_file(
        &args.output_dir.join("stage3_cross_platform_distribution.md"),
        &lines.join("\n"),
    )?;
    info!(platforms = config.platforms.len(), slug = %slug, "Wrote distribution plan");

    context.distribution = Some(Distribution {
        slug,
        platforms: config.platforms.clone(),
        prompts: config.prompts.clone(),
    });
    Ok(context)
}

/// Markdown for one platform. Only fields present in the plan render.
pub fn platform_section(name: &str, plan: &PlatformPlan, prefix: &str, slug: &str) -> Vec<String> {
    let mut lines = vec![format!("## {}", name.replace('_', " "))];

    list("Post Structure", &plan.post_structure, &mut lines);
    list("Posting Times", &plan.posting_times, &mut lines);
    if let Some(posts) = &plan.posts {
        lines.push(format!("- Total Posts: {}", display_value(posts)));
    }
    list("Concepts", &plan.concepts, &mut lines);
    if let Some(best_time) = &plan.best_time {
        lines.push(format!("- Best Time: {best_time}"));
    }
    list("Topics", &plan.topics, &mut lines);
    list("Schedule", &plan.schedule, &mut lines);
    if let Some(prompts) = &plan.prompts {
        lines.push(format!("- Short-Form Prompts: {}", display_value(prompts)));
    }
    list("Posting Schedule", &plan.posting_schedule, &mut lines);

    lines.push(format!("- Tracking UTM: ?tid={prefix}_social_{slug}"));
    lines
}

fn list(title: &str, items: &Option<Vec<String>>, lines: &mut Vec<String>) {
    if let Some(items) = items {
        lines.push(format!("### {title}"));
        lines.extend(bullets(items));
    }
}

/// Strings render bare; anything else as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
