// Stage 1: research.
//
// Scores every keyword cluster, picks the winner and writes four artifacts:
// deep research, target persona, SEO title & hooks, competitor audit.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use super::context::WorkflowContext;
use super::settings::WorkflowSettings;
use super::StageArgs;
use crate::clusters::metrics::{score_all, select_winner, ClusterMetrics};
use crate::clusters::models::KeywordData;
use crate::output::format_thousands;
use crate::output::markdown::{
    bullets, fill, fill_placeholders, table, title_case, write_text_file,
};

const CLUSTER_TABLE_HEADERS: [&str; 9] = [
    "Cluster",
    "Core Emotion",
    "Primary Keywords",
    "Total Volume",
    "Avg Difficulty",
    "Conversion",
    "Pinterest Visual Angle",
    "Meta Caption Hook",
    "Product Fit",
];

pub fn run(
    args: &StageArgs,
    settings: &WorkflowSettings,
    data: &KeywordData,
) -> Result<WorkflowContext> {
    let mut persona = settings.stage1.persona.clone();
    persona.name = args.persona_name.clone();

    let clusters = score_all(&data.clusters)?;
    let winner = select_winner(&clusters)
        .context("Keyword data contains no clusters to rank")?
        .clone();
    info!(
        clusters = clusters.len(),
        winner = %winner.label,
        score = format!("{:.1}", winner.score),
        "Scored keyword clusters"
    );

    let today = Utc::now().format("%Y-%m-%d").to_string();
    let out = &args.output_dir;

    write_text_file(
        &out.join("step1_deep_research.md"),
        &deep_research(&clusters, &winner, &args.product, &persona.name, &today),
    )?;

    let mut persona_lines = vec![
        "# Stage 1 — Step 2: Define Target Persona".to_string(),
        format!("## Persona: {}", persona.name),
        "### Pain Points".to_string(),
    ];
    persona_lines.extend(bullets(&persona.pain_points));
    persona_lines.push("\n### Desires".to_string());
    persona_lines.extend(bullets(&persona.desires));
    persona_lines.push("\n### Search Intent".to_string());
    persona_lines.extend(bullets(&persona.search_intent));
    persona_lines.push("\n### Keyword Map".to_string());
    persona_lines.push(format!("- Primary: {}", persona.keyword_map.primary));
    persona_lines.push(format!(
        "- Supporting: {}",
        persona.keyword_map.supporting.join(", ")
    ));
    write_text_file(&out.join("step2_target_persona.md"), &persona_lines.join("\n"))?;

    let primary_keyword = winner
        .top_keywords
        .first()
        .cloned()
        .context("Winning cluster has no keywords")?;
    let templates = &settings.stage1.seo_templates;
    let lookback = args.lookback_days.to_string();
    let titled_keyword = title_case(&primary_keyword);
    let seo_title = fill_placeholders(
        &templates.title,
        &[
            ("primary_keyword", titled_keyword.as_str()),
            ("product", args.product.as_str()),
            ("persona_short", persona.name.as_str()),
        ],
    );
    let meta_description = fill_placeholders(
        &templates.meta_description,
        &[
            ("primary_keyword", primary_keyword.as_str()),
            ("product", args.product.as_str()),
            ("persona_short", persona.name.as_str()),
            ("lookback_days", lookback.as_str()),
        ],
    );

    let mut seo_lines = vec![
        "# Stage 1 — Step 3: SEO Title & Hook".to_string(),
        format!("- **SEO Title:** {seo_title}"),
        format!("- **Meta Description:** {meta_description}"),
        format!(
            "- **Top Performing Keywords:** {}",
            winner.top_keywords.join(", ")
        ),
        String::new(),
        "## Emotional Hooks".to_string(),
    ];
    seo_lines.extend(bullets(&templates.hooks));
    write_text_file(&out.join("step3_seo_title_hook.md"), &seo_lines.join("\n"))?;

    let mut competitor_lines = vec!["# Stage 1 — Step 4: Competitor Audit".to_string()];
    for competitor in &settings.stage1.competitor_audit {
        competitor_lines.push(format!("## {}", competitor.domain));
        competitor_lines.push("### Opportunity Keywords".to_string());
        competitor_lines.extend(bullets(&competitor.opportunity_keywords));
        competitor_lines.push("### SERP Gap Analysis".to_string());
        competitor_lines.push(fill(&competitor.serp_gap));
        competitor_lines.push(String::new());
    }
    write_text_file(
        &out.join("step4_competitor_audit.md"),
        &competitor_lines.join("\n"),
    )?;

    Ok(WorkflowContext {
        generated_on: today,
        product: args.product.clone(),
        persona_name: persona.name.clone(),
        lookback_days: args.lookback_days,
        winning_cluster: winner.without_blanks(),
        primary_keyword,
        seo_title,
        meta_description,
        seo_hooks: templates.hooks.clone(),
        persona_profile: persona,
        clusters,
        slug: None,
        word_count: None,
        primary_keyword_density_percent: None,
        secondary_keyword_density_percent: Vec::new(),
        grade_level: None,
        seo_package: None,
        distribution: None,
        analytics: Vec::new(),
        growth_actions: None,
    })
}

/// The step 1 research document: cluster table, breakdowns, winner.
fn deep_research(
    clusters: &[ClusterMetrics],
    winner: &ClusterMetrics,
    product: &str,
    persona_name: &str,
    today: &str,
) -> String {
    let rows = clusters.iter().map(|c| {
        vec![
            c.label.clone(),
            c.core_emotion.clone(),
            c.top_keywords.join(", "),
            format_thousands(c.total_volume),
            format!("{:.1}", c.avg_difficulty),
            c.conversion_potential.to_string(),
            first_n(&c.pinterest_angles, 2).join("; "),
            first_n(&c.meta_hooks, 2).join("; "),
            c.product_compatibility.clone(),
        ]
    });

    let mut lines = vec![
        "# Stage 1 — Step 1: Deep Research".to_string(),
        "Goal: Identify high-ROI keywords, audience intent, and emotional resonance to drive organic clicks and conversions.".to_string(),
        format!("_Generated on {today} for {product}_"),
        String::new(),
        "## Market-Aligned Keyword Clusters".to_string(),
        table(&CLUSTER_TABLE_HEADERS, rows),
        String::new(),
        "## Emotional & Performance Breakdown".to_string(),
    ];

    for c in clusters {
        lines.extend([
            format!("- **Cluster:** {}", c.label),
            format!("  - Primary keywords: {}", c.top_keywords.join(", ")),
            format!("  - Core emotional driver: {}", c.core_emotion),
            format!("  - Estimated volume: {}", format_thousands(c.total_volume)),
            format!("  - Average SEO difficulty: {:.1}", c.avg_difficulty),
            format!("  - Conversion potential: {}", c.conversion_potential),
            format!(
                "  - Pinterest visual angles: {}",
                first_n(&c.visible_angles(), 3).join(", ")
            ),
            format!(
                "  - Meta caption hooks: {}",
                first_n(&c.visible_hooks(), 3).join(", ")
            ),
            format!("  - Product compatibility: {}", c.product_compatibility),
            String::new(),
        ]);
    }

    let drivers = winner.visible_drivers().join(", ");
    let justification = format!(
        "The highest scoring cluster is **{}** thanks to a total volume of {}, a {} conversion \
         projection, and emotional drivers around {}. It aligns directly with {} because the offer \
         teaches devotion phrases that feel like {} for the {} persona.",
        winner.label,
        format_thousands(winner.total_volume),
        winner.conversion_potential.as_str().to_lowercase(),
        drivers,
        product,
        winner.core_emotion.to_lowercase(),
        persona_name,
    );

    let angles = winner.visible_angles();
    let hooks = winner.visible_hooks();

    lines.extend([
        "## Winner Selection & Justification".to_string(),
        fill(&justification),
        String::new(),
        "## Deliverables".to_string(),
        "- Unified keyword cluster summary".to_string(),
        "- Emotional intent mapping".to_string(),
        "- CTR forecast".to_string(),
        "- Pinterest visual angles".to_string(),
        "- Meta caption hooks".to_string(),
        String::new(),
        "### Unified Keyword Cluster".to_string(),
        format!("- Label: {}", winner.label),
        format!("- Core emotion: {}", winner.core_emotion),
        format!("- Primary keywords: {}", winner.top_keywords.join(", ")),
        format!(
            "- Estimated total volume: {}",
            format_thousands(winner.total_volume)
        ),
        format!("- Average SEO difficulty: {:.1}", winner.avg_difficulty),
        format!("- Projected CTR: {:.1}%", winner.avg_ctr * 100.0),
        String::new(),
        "### Emotional Intent Mapping".to_string(),
        format!(
            "- Emotional drivers: {}",
            or_placeholder(&drivers, "Available upon refresh")
        ),
        format!(
            "- Product compatibility notes: {}",
            or_placeholder(
                &winner.product_compatibility,
                "Use persona language to customize."
            )
        ),
        String::new(),
        "### CTR Forecast".to_string(),
        format!(
            "- Forecasted clicks per 1K impressions: {}",
            clicks_per_thousand(winner.avg_ctr)
        ),
        format!("- Conversion potential: {}", winner.conversion_potential),
        String::new(),
        "### Pinterest Visual Angles".to_string(),
    ]);
    lines.extend(bullets_or(&angles, "Refresh angles from trend scan"));
    lines.push(String::new());
    lines.push("### Meta Caption Hooks".to_string());
    lines.extend(bullets_or(&hooks, "Draft new hooks tied to emotional drivers"));

    lines.join("\n")
}

/// Whole clicks expected per 1,000 impressions at `ctr`.
pub fn clicks_per_thousand(ctr: f64) -> i64 {
    (ctr * 1000.0).floor() as i64
}

fn first_n(values: &[String], n: usize) -> &[String] {
    &values[..values.len().min(n)]
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

fn bullets_or(items: &[String], placeholder: &str) -> Vec<String> {
    if items.is_empty() {
        vec![format!("- {placeholder}")]
    } else {
        bullets(items)
    }
}
