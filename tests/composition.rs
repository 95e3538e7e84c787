// Composition tests: the five workflow stages chained end to end.
//
// Each stage reads the context the previous one wrote, so these tests run
// stage1 -> stage5 inside a temp directory and check both the artifacts on
// disk and the data carried forward in context.json.

use std::fs;
use std::path::{Path, PathBuf};

use blogflow::clusters::models::KeywordData;
use blogflow::workflow::context::{SeoPackage, WorkflowContext};
use blogflow::workflow::settings::WorkflowSettings;
use blogflow::workflow::{self, Stage, StageArgs};
use serde_json::json;

fn settings_json() -> serde_json::Value {
    json!({
        "product": "Devotion Kit",
        "tracking_prefix": "acme",
        "stage1": {
            "persona": {
                "name": "Ambitious Partner",
                "pain_points": ["Feels unseen"],
                "desires": ["Steady commitment"],
                "search_intent": ["phrases that deepen love"],
                "keyword_map": {"primary": "love notes for him", "supporting": ["romantic texts"]}
            },
            "seo_templates": {
                "title": "{primary_keyword}: The {product} Guide",
                "meta_description": "Use {primary_keyword} with {product} in {lookback_days} days.",
                "hooks": ["Say it once, feel it forever"]
            },
            "competitor_audit": [
                {"domain": "rival.example", "opportunity_keywords": ["texts"], "serp_gap": "No scripts."}
            ]
        },
        "stage2": {
            "outline": {
                "emotional_arc": ["Fear", "Hope"],
                "sections": [
                    {"heading": "Why love notes for him work", "themes": ["Small words build trust"]},
                    {"heading": "Writing your first note", "themes": ["Start with gratitude", "End with desire"]}
                ],
                "external_links": ["https://research.example"],
                "internal_links": ["/blog/texts"],
                "affiliate_prompt": "Insert the affiliate link after section two."
            },
            "faq": [{"question": "How often?", "answer": "Weekly is plenty."}],
            "seo_package_keywords": ["romantic texts"],
            "image_brief": {"hero_alt_text": "Handwritten note", "thumbnails": ["Pen on paper"]}
        },
        "stage3": {
            "prompts": ["Lead with the hook"],
            "platforms": {
                "pinterest": {"concepts": ["Quote pin"], "best_time": "8pm"},
                "instagram_reels": {"posts": 3, "schedule": ["Mon", "Thu"]}
            }
        },
        "stage4": {
            "analytics_systems": {
                "ROI Dashboard": {"description": "Tracks revenue.", "metrics": ["EPC"]},
                "Attribution": {"tracking_id": "?tid={slug}", "combines": ["GA4", "ClickBank"]}
            }
        },
        "stage5": {"actions": ["Refresh the top post", "Prune weak pins"]}
    })
}

fn keyword_json() -> serde_json::Value {
    json!({
        "clusters": [
            {
                "id": "texts",
                "label": "Romantic Texts",
                "core_emotion": "Longing",
                "conversion_potential": "Low",
                "keywords": [{"term": "romantic texts", "volume": 400, "difficulty": 30}]
            },
            {
                "id": "notes",
                "label": "Love Notes",
                "core_emotion": "Devotion",
                "conversion_potential": "High",
                "product_compatibility": "Direct fit",
                "keywords": [
                    {"term": "love notes for him", "volume": 900, "difficulty": 20,
                     "pinterest_angle": "Handwritten close-up", "meta_hook": "Words he keeps",
                     "emotional_driver": "Devotion"},
                    {"term": "sweet notes", "volume": 300, "difficulty": 10}
                ]
            }
        ]
    })
}

struct Workspace {
    _dir: tempfile::TempDir,
    root: PathBuf,
    settings: WorkflowSettings,
    keywords: KeywordData,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();

        let settings_path = root.join("workflow.json");
        fs::write(&settings_path, settings_json().to_string()).unwrap();
        let keywords_path = root.join("keywords.json");
        fs::write(&keywords_path, keyword_json().to_string()).unwrap();

        Self {
            settings: WorkflowSettings::load(&settings_path).unwrap(),
            keywords: KeywordData::load(&keywords_path).unwrap(),
            _dir: dir,
            root,
        }
    }

    fn shared_context(&self) -> PathBuf {
        self.root.join("artifacts").join("context.json")
    }

    fn run(&self, stage: Stage, context: Option<PathBuf>) -> anyhow::Result<WorkflowContext> {
        let args = StageArgs::resolve(
            &self.settings,
            self.root.join(stage.to_string()),
            context,
            None,
            None,
            30,
            self.shared_context(),
        );
        workflow::run(stage, &args, &self.settings, Some(&self.keywords))
    }

    fn context_of(&self, stage: Stage) -> PathBuf {
        self.root.join(stage.to_string()).join("context.json")
    }

    fn read(&self, stage: Stage, file: &str) -> String {
        fs::read_to_string(self.root.join(stage.to_string()).join(file)).unwrap()
    }
}

fn saved_context(path: &Path) -> WorkflowContext {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================
// Stage 1
// ============================================================

#[test]
fn stage1_picks_winner_and_fills_templates() {
    let ws = Workspace::new();
    let ctx = ws.run(Stage::Stage1, None).unwrap();

    assert_eq!(ctx.winning_cluster.id, "notes");
    assert_eq!(ctx.product, "Devotion Kit");
    assert_eq!(ctx.persona_name, "Ambitious Partner");
    assert_eq!(ctx.primary_keyword, "love notes for him");
    assert_eq!(ctx.seo_title, "Love Notes For Him: The Devotion Kit Guide");
    assert_eq!(
        ctx.meta_description,
        "Use love notes for him with Devotion Kit in 30 days."
    );
    assert_eq!(ctx.clusters.len(), 2);

    // Blank angles survive in the full list but not in the winner
    let notes = ctx.clusters.iter().find(|c| c.id == "notes").unwrap();
    assert_eq!(notes.pinterest_angles, vec!["Handwritten close-up", ""]);
    assert_eq!(ctx.winning_cluster.pinterest_angles, vec!["Handwritten close-up"]);

    for file in [
        "step1_deep_research.md",
        "step2_target_persona.md",
        "step3_seo_title_hook.md",
        "step4_competitor_audit.md",
    ] {
        let content = ws.read(Stage::Stage1, file);
        assert!(content.ends_with('\n') && !content.ends_with("\n\n"), "{file}");
    }

    let research = ws.read(Stage::Stage1, "step1_deep_research.md");
    assert!(research.contains("1,200"));
    assert!(research.contains("- Forecasted clicks per 1K impressions: 120"));

    assert!(ws.shared_context().exists());
    assert_eq!(saved_context(&ws.context_of(Stage::Stage1)).seo_title, ctx.seo_title);
}

#[test]
fn later_stage_without_context_names_previous_stage() {
    let ws = Workspace::new();
    let err = ws.run(Stage::Stage2, None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Stage 2 requires a context file generated by Stage 1."
    );

    let err = ws
        .run(Stage::Stage4, Some(ws.root.join("nope.json")))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Stage 4 requires a context file generated by Stage 3."
    );
}

// ============================================================
// Stage 1 -> Stage 5
// ============================================================

#[test]
fn full_workflow_carries_context_forward() {
    let ws = Workspace::new();
    ws.run(Stage::Stage1, None).unwrap();

    // Stage 2
    let ctx2 = ws
        .run(Stage::Stage2, Some(ws.context_of(Stage::Stage1)))
        .unwrap();
    let slug = "love-notes-for-him-the-devotion-kit-guide";
    assert_eq!(ctx2.slug.as_deref(), Some(slug));
    assert!(ctx2.word_count.unwrap() > 100);
    assert!(ctx2.primary_keyword_density_percent.unwrap() > 0.0);
    assert_eq!(ctx2.secondary_keyword_density_percent.len(), 1);
    assert_eq!(ctx2.secondary_keyword_density_percent[0].0, "romantic texts");

    let package: SeoPackage =
        serde_json::from_str(&ws.read(Stage::Stage2, "step8_5_seo_package.json")).unwrap();
    assert_eq!(package.slug, slug);
    assert_eq!(Some(package.word_count), ctx2.word_count);
    assert_eq!(package.keywords, vec!["romantic texts"]);

    let html = ws.read(Stage::Stage2, "step7_clickbank_html.html");
    assert!(html.starts_with("<article class=\"devotion-blueprint\">"));
    assert!(html.contains("<h2 style=\"text-align:center;\">Writing your first note</h2>"));

    let draft = ws.read(Stage::Stage2, "step6_5_final_draft.md");
    assert!(draft.contains("Devotion Kit"));
    assert!(draft.lines().all(|line| line.chars().count() <= 100));

    let review = ws.read(Stage::Stage2, "step3_optimization_review.md");
    // Two outline headings plus the hook, FAQ and close headings
    assert!(review.contains("1/5 contain primary keyword"));
    assert!(ws.read(Stage::Stage2, "step9_image_creation.md").contains("- Watermark: Understanding Man"));

    // Stage 3
    let ctx3 = ws
        .run(Stage::Stage3, Some(ws.context_of(Stage::Stage2)))
        .unwrap();
    let plan = ws.read(Stage::Stage3, "stage3_cross_platform_distribution.md");
    let pinterest = plan.find("## pinterest").unwrap();
    let reels = plan.find("## instagram reels").unwrap();
    assert!(pinterest < reels, "platforms keep configuration order");
    assert!(plan.contains(&format!("- Tracking UTM: ?tid=acme_social_{slug}")));
    assert!(plan.contains("- Total Posts: 3"));
    let distribution = ctx3.distribution.as_ref().unwrap();
    assert_eq!(distribution.slug, slug);
    assert_eq!(distribution.platforms[0].0, "pinterest");

    // Stage 4
    let ctx4 = ws
        .run(Stage::Stage4, Some(ws.context_of(Stage::Stage3)))
        .unwrap();
    let analytics = ws.read(Stage::Stage4, "stage4_analytics_refinement.md");
    assert!(analytics.contains(&format!("- Blog Slug Tracking ID: ?tid=acme_blog_{slug}")));
    assert!(analytics.contains("- Tracking Template: ?tid={slug}"));
    let names: Vec<&str> = ctx4.analytics.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["ROI Dashboard", "Attribution"]);
    assert!(ctx4.distribution.is_some());

    // Stage 5
    let ctx5 = ws
        .run(Stage::Stage5, Some(ws.context_of(Stage::Stage4)))
        .unwrap();
    assert_eq!(
        ctx5.growth_actions,
        Some(vec![
            "Refresh the top post".to_string(),
            "Prune weak pins".to_string()
        ])
    );
    let growth = ws.read(Stage::Stage5, "stage5_growth_loop.md");
    assert!(growth.contains("- Prune weak pins"));

    // Everything from earlier stages survives the round trips
    let shared = saved_context(&ws.shared_context());
    assert_eq!(shared.slug.as_deref(), Some(slug));
    assert_eq!(shared.analytics.len(), 2);
    assert_eq!(shared.growth_actions, ctx5.growth_actions);
}

#[test]
fn stage3_derives_slug_when_stage2_was_skipped() {
    let ws = Workspace::new();
    ws.run(Stage::Stage1, None).unwrap();

    let ctx = ws
        .run(Stage::Stage3, Some(ws.context_of(Stage::Stage1)))
        .unwrap();
    assert_eq!(
        ctx.distribution.unwrap().slug,
        "love-notes-for-him-the-devotion-kit-guide"
    );
}
