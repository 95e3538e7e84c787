// Stage 4: analytics & refinement.

use anyhow::Result;

use super::context::WorkflowContext;
use super::settings::{AnalyticsSystem, WorkflowSettings};
use super::StageArgs;
use crate::output::markdown::{bullets, fill, write_text_file};

pub fn run(
    args: &StageArgs,
    settings: &WorkflowSettings,
    mut context: WorkflowContext,
) -> Result<WorkflowContext> {
    let systems = &settings.stage4.analytics_systems;
    let slug = context.slug_or_derived();

    let mut lines = vec![
        "# Stage 4 — Analytics & Refinement".to_string(),
        "Goal: Measure, optimize, and scale what drives revenue.".to_string(),
        String::new(),
        format!(
            "- Blog Slug Tracking ID: ?tid={}_blog_{slug}",
            settings.tracking_prefix
        ),
        String::new(),
    ];
    for (name, system) in systems {
        lines.extend(system_section(name, system));
        lines.push(String::new());
    }

    write_text_file(
        &args.output_dir.join("stage4_analytics_refinement.md"),
        &lines.join("\n"),
    )?;

    merge_systems(&mut context.analytics, systems);
    Ok(context)
}

fn system_section(name: &str, system: &AnalyticsSystem) -> Vec<String> {
    let mut lines = vec![format!("## {name}")];
    if let Some(description) = &system.description {
        lines.push(fill(description));
    }
    if let Some(metrics) = &system.metrics {
        lines.push("### Metrics".to_string());
        lines.extend(bullets(metrics));
    }
    if let Some(tracking_id) = &system.tracking_id {
        lines.push(format!("- Tracking Template: {tracking_id}"));
    }
    if let Some(sources) = &system.combines {
        lines.push("### Data Sources".to_string());
        lines.extend(bullets(sources));
    }
    lines
}

/// Overwrite systems already in the context, append new ones in order.
pub fn merge_systems(
    existing: &mut Vec<(String, AnalyticsSystem)>,
    incoming: &[(String, AnalyticsSystem)],
) {
    for (name, system) in incoming {
        match existing.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = system.clone(),
            None => existing.push((name.clone(), system.clone())),
        }
    }
}
