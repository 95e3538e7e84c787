// Stage 2: drafting and optimization.
//
// Builds the article from the outline, measures it (word count, keyword
// densities, Flesch–Kincaid grade) and writes the review checklist, final
// draft, HTML export and SEO package.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::context::{SeoPackage, WorkflowContext};
use super::settings::{DraftSettings, WorkflowSettings};
use super::StageArgs;
use crate::analysis::density::density_percent;
use crate::analysis::readability::flesch_kincaid_grade;
use crate::analysis::tokens;
use crate::output::markdown::{bullets, clean_sentence, fill, slugify, write_text_file};

/// Target article length in words (inclusive).
pub const WORD_COUNT_RANGE: (usize, usize) = (2800, 3200);

/// Vocabulary the review checks the article for.
pub const EMOTIONAL_TRIGGERS: [&str; 4] = ["fear", "desire", "hope", "reassurance"];

const SECTION_CTA: &str = "Invite him into the next moment with a confident, heart-led ask.";

pub fn run(
    args: &StageArgs,
    settings: &WorkflowSettings,
    mut context: WorkflowContext,
) -> Result<WorkflowContext> {
    let config = &settings.stage2;
    let out = &args.output_dir;

    write_text_file(&out.join("step1_outline.md"), &outline(config))?;
    write_text_file(
        &out.join("step1_5_affiliate_link_prompt.txt"),
        &config.outline.affiliate_prompt,
    )?;

    let article = article(config, &context);
    let mut draft_lines = vec![
        "# Stage 2 — Step 2: Draft Body".to_string(),
        "- Apply an AI humanizer pass to each section to preserve voice while optimizing for SEO/AEO.".to_string(),
        "- Keep the emotional arc from Step 1 visible while drafting to maintain narrative flow.".to_string(),
        String::new(),
    ];
    draft_lines.push(article.clone());
    write_text_file(&out.join("step2_draft_body.md"), &draft_lines.join("\n"))?;

    let review = ArticleReview::measure(
        &article,
        &context.primary_keyword,
        &config.seo_package_keywords,
    )?;
    info!(
        words = review.word_count,
        grade = review.grade_level,
        primary_density = review.primary_density,
        "Measured draft"
    );
    write_text_file(
        &out.join("step3_optimization_review.md"),
        &review.checklist(&article, &context.primary_keyword),
    )?;

    let slug = slugify(&context.seo_title);
    write_text_file(&out.join("step6_5_final_draft.md"), &article)?;
    write_text_file(
        &out.join("step7_clickbank_html.html"),
        &html_export(&article, &context.seo_title),
    )?;

    let seo_package = SeoPackage {
        seo_title: context.seo_title.clone(),
        seo_description: context.meta_description.clone(),
        keywords: config.seo_package_keywords.clone(),
        slug: slug.clone(),
        word_count: review.word_count,
        primary_keyword_density_percent: review.primary_density,
        secondary_keyword_density_percent: review.secondary_densities.clone(),
        grade_level_estimate: review.grade_level,
    };
    write_json(&out.join("step8_5_seo_package.json"), &seo_package)?;

    let mut image_lines = vec![
        "# Stage 2 — Step 9: Image Creation & Optimization".to_string(),
        format!("- Hero Alt Text: {}", config.image_brief.hero_alt_text),
        "- Thumbnail Concepts:".to_string(),
    ];
    image_lines.extend(
        config
            .image_brief
            .thumbnails
            .iter()
            .map(|thumb| format!("  - {thumb}")),
    );
    image_lines.push(format!("- Watermark: {}", settings.watermark));
    write_text_file(&out.join("step9_image_creation.md"), &image_lines.join("\n"))?;

    let review_upload = [
        "# Stage 2 — Step 8: Review & Upload",
        "- Proofread the Step 6.5 final draft for flow, tense consistency, and CTA clarity.",
        "- Verify all internal, external, and affiliate links including the requested tracking parameters.",
        "- Upload to the CMS with the centered HTML export from Step 7.",
        "- Attach Pinterest visual hook assets and thumbnail concepts as supporting media.",
        "- Log publish date and URL for Stage 4 analytics tracking.",
    ];
    write_text_file(&out.join("step8_review_upload.md"), &review_upload.join("\n"))?;

    context.slug = Some(slug);
    context.word_count = Some(review.word_count);
    context.primary_keyword_density_percent = Some(review.primary_density);
    context.secondary_keyword_density_percent = review.secondary_densities;
    context.grade_level = Some(review.grade_level);
    context.seo_package = Some(seo_package);
    Ok(context)
}

/// Numbers behind the optimization review.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleReview {
    pub word_count: usize,
    /// Percent, two decimals
    pub primary_density: f64,
    pub secondary_densities: Vec<(String, f64)>,
    pub grade_level: f64,
}

impl ArticleReview {
    pub fn measure(article: &str, primary_keyword: &str, secondary: &[String]) -> Result<Self> {
        let primary_density = density_percent(article, primary_keyword)
            .with_context(|| format!("Cannot measure primary keyword '{primary_keyword}'"))?;
        let secondary_densities = secondary
            .iter()
            .map(|kw| {
                density_percent(article, kw)
                    .map(|d| (kw.clone(), d))
                    .with_context(|| format!("Cannot measure secondary keyword '{kw}'"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            word_count: tokens::words(article).len(),
            primary_density,
            secondary_densities,
            grade_level: flesch_kincaid_grade(article),
        })
    }

    /// Render the optimization checklist table.
    pub fn checklist(&self, article: &str, primary_keyword: &str) -> String {
        let (min_words, max_words) = WORD_COUNT_RANGE;
        let word_note = if (min_words..=max_words).contains(&self.word_count) {
            "Within range"
        } else {
            "Adjust paragraphs for target range"
        };

        let mut lines = vec![
            "# Stage 2 — Step 3: Optimization Review".to_string(),
            "| Item | Target | Result | Notes |".to_string(),
            "| --- | --- | --- | --- |".to_string(),
            format!(
                "| Word Count | {min_words}–{max_words} | {} | {word_note} |",
                self.word_count
            ),
            format!(
                "| Primary Keyword Density | 1–2% | {}% | Primary keyword: {primary_keyword} |",
                self.primary_density
            ),
        ];

        for (keyword, density) in &self.secondary_densities {
            let note = if (0.5..=1.0).contains(density) {
                "Within range"
            } else {
                "Adjust usage"
            };
            lines.push(format!(
                "| Secondary Keyword Density ({keyword}) | 0.5–1% | {density}% | {note} |"
            ));
        }

        let headings: Vec<&str> = article.lines().filter(|l| l.starts_with("## ")).collect();
        let keyword_lower = primary_keyword.to_lowercase();
        let with_keyword = headings
            .iter()
            .filter(|h| h.to_lowercase().contains(&keyword_lower))
            .count();
        let heading_note = if headings.is_empty() {
            "Add H2s to target keywords".to_string()
        } else {
            format!("{with_keyword}/{} contain primary keyword", headings.len())
        };
        lines.push(format!(
            "| Headers include query keywords | ≥50% | {heading_note} | Continue refining headings |"
        ));

        let article_lower = article.to_lowercase();
        let presence = EMOTIONAL_TRIGGERS
            .iter()
            .map(|word| {
                let found = if article_lower.contains(word) { "yes" } else { "no" };
                format!("{word}:{found}")
            })
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "| Emotional Triggers | {} | {presence} | Embed emotional vocabulary across sections |",
            EMOTIONAL_TRIGGERS.join(", ")
        ));
        lines.push(format!(
            "| Readability (Grade Level) | 6–8 | {} | Calculated via Flesch-Kincaid estimate |",
            self.grade_level
        ));
        lines.push("| Links & CTAs | Internal + External + Affiliate | Outline references anchor text and CTA placements | Verify affiliate link insertion pre-publish |".to_string());
        lines.push(
            "| FAQ & Pinterest Hook | Included | Present | Align visuals with emotional driver |"
                .to_string(),
        );

        lines.join("\n")
    }
}

fn outline(config: &DraftSettings) -> String {
    let outline = &config.outline;
    let mut lines = vec![
        "# Stage 2 — Step 1: Outline".to_string(),
        "Goal: Write, optimize, and finalize a 2,800–3,200-word blog for SEO, AEO, and conversions."
            .to_string(),
        String::new(),
        "## Emotional Arc".to_string(),
    ];
    lines.extend(bullets(&outline.emotional_arc));
    lines.push("\n## Section Outline".to_string());
    for (idx, section) in outline.sections.iter().enumerate() {
        lines.push(format!("{}. **{}**", idx + 1, section.heading));
        lines.extend(section.themes.iter().map(|theme| format!("   - {theme}")));
    }
    lines.push("\n## External Authority Links".to_string());
    lines.extend(bullets(&outline.external_links));
    lines.push("\n## Internal Links".to_string());
    lines.extend(bullets(&outline.internal_links));
    lines.push("\n## Affiliate Link Prompt".to_string());
    lines.push(outline.affiliate_prompt.trim().to_string());
    lines.join("\n")
}

/// One themed paragraph: theme sentence, persona/product line, keyword
/// line and a call to action, wrapped.
pub fn paragraph(theme: &str, context: &WorkflowContext, cta: &str) -> String {
    let cluster = &context.winning_cluster;
    let keywords: Vec<&str> = if cluster.top_keywords.is_empty() {
        vec![context.primary_keyword.as_str()]
    } else {
        cluster.top_keywords.iter().take(3).map(String::as_str).collect()
    };
    let core_emotion = if cluster.core_emotion.is_empty() {
        "emotional connection".to_string()
    } else {
        cluster.core_emotion.to_lowercase()
    };

    let sentences = [
        clean_sentence(theme),
        format!(
            "For the {}, {} turns everyday anxieties into leadership moments by handing her phrases like {}.",
            context.persona_name,
            context.product,
            keywords.join(", ")
        ),
        format!(
            "Each delivery keeps the primary keyword '{}' front and center while unlocking {} he can instantly feel.",
            context.primary_keyword, core_emotion
        ),
        cta.to_string(),
    ];
    fill(&sentences.join(" "))
}

/// The article body shared by the draft, final draft and HTML export.
pub fn article(config: &DraftSettings, context: &WorkflowContext) -> String {
    let mut sections = vec![format!("# {}", context.seo_title)];

    for section in &config.outline.sections {
        let mut rendered = vec![format!("## {}", section.heading)];
        rendered.extend(
            section
                .themes
                .iter()
                .map(|theme| paragraph(theme, context, SECTION_CTA)),
        );
        rendered.push(fill(&format!(
            "Key action: Translate '{}' into a scheduled deliverable that keeps the primary keyword \
             '{}' in the H2 and guides readers toward {}.",
            section.heading, context.primary_keyword, context.product
        )));
        rendered.push(String::new());
        sections.push(rendered.join("\n"));
    }

    sections.push("## Pinterest Visual Hook".to_string());
    sections.push(fill(&format!(
        "Translate the emotional core into a three-part pin suite: quote overlays, cinematic \
         soft-focus photography, and a story slide that teases the {} ritual.",
        context.product
    )));
    sections.push(String::new());

    sections.push("## Embedded FAQ".to_string());
    for faq in &config.faq {
        sections.push(format!("### {}", faq.question));
        sections.push(fill(&faq.answer));
        sections.push(String::new());
    }

    let cluster = &context.winning_cluster;
    sections.push("## Final Empowerment Close".to_string());
    sections.push(fill(&format!(
        "You are not chasing his love—you are directing it. Combine these devotion phrases with \
         your own intuition, anchor the energy with the {} framework, and watch his commitment \
         become the calm, steady backdrop of your life.",
        context.product
    )));
    sections.push(fill(&format!(
        "The {} persona now has a high-converting ritual anchored in {} and the phrases {}. {} \
         becomes the natural next step, guiding her from anxious spirals to grounded confidence. \
         She documents each activation inside her content calendar, pairs it with the tracked \
         affiliate link, and reports performance into the analytics dashboard so the entire team \
         can double down on what converts. Celebrate every micro-win together.",
        context.persona_name,
        cluster.core_emotion.to_lowercase(),
        cluster.top_keywords.join(", "),
        context.product
    )));

    sections.join("\n")
}

/// Centered HTML export: H2s for headings, one `<p>` per non-blank line.
pub fn html_export(article: &str, title: &str) -> String {
    let mut lines = vec![
        "<article class=\"devotion-blueprint\">".to_string(),
        format!("  <h1 style=\"text-align:center;\">{title}</h1>"),
    ];
    for line in article.lines() {
        if line.starts_with("# ") {
            continue;
        }
        if let Some(heading) = line.strip_prefix("## ") {
            lines.push(format!("  <h2 style=\"text-align:center;\">{heading}</h2>"));
        } else if !line.trim().is_empty() {
            lines.push(format!("  <p>{}</p>", line.trim()));
        }
    }
    lines.push("</article>".to_string());
    lines.join("\n")
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
