use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use blogflow::analysis::density::density_percent;
use blogflow::analysis::readability::TextStats;
use blogflow::clusters::metrics::{score_all, select_winner};
use blogflow::clusters::models::KeywordData;
use blogflow::config::Config;
use blogflow::feeds::blogs::load_blogs;
use blogflow::feeds::source::HttpFeedSource;
use blogflow::feeds::FeedUpdateError;
use blogflow::output::terminal;
use blogflow::pipeline::refresh::{self, RefreshOptions};
use blogflow::workflow::settings::WorkflowSettings;
use blogflow::workflow::{self, Stage, StageArgs};

/// Blogflow: staged blog workflow artifacts and README feed refresh.
///
/// Turns keyword research and a workflow configuration into the Markdown,
/// HTML and JSON artifacts of each publishing stage, and keeps the README
/// post list in sync with RSS/Atom feeds.
#[derive(Parser)]
#[command(name = "blogflow", version, about)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the artifacts for one workflow stage
    Stage {
        /// Which stage to run
        stage: Stage,

        /// Directory to place generated artifacts
        #[arg(long)]
        output_dir: PathBuf,

        /// Context JSON written by the previous stage (stages 2-5)
        #[arg(long)]
        context: Option<PathBuf>,

        /// Product name (defaults to the workflow config's product)
        #[arg(long)]
        product: Option<String>,

        /// Persona name (defaults to the workflow config's persona)
        #[arg(long)]
        persona_name: Option<String>,

        /// Research lookback window in days
        #[arg(long, default_value = "30")]
        lookback_days: u32,

        /// Workflow configuration JSON
        #[arg(long)]
        workflow_config: Option<PathBuf>,

        /// Keyword cluster data JSON (stage 1)
        #[arg(long)]
        keyword_data: Option<PathBuf>,
    },

    /// Refresh the README post list from the configured blog feeds
    UpdateReadme {
        /// Blogs configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// README file containing the post list markers
        #[arg(long)]
        readme: Option<PathBuf>,

        /// Use local feed files only
        #[arg(long)]
        offline: bool,

        /// Print the rendered sections instead of writing the README
        #[arg(long)]
        dry_run: bool,
    },

    /// Rank keyword clusters and show the winner
    Clusters {
        /// Keyword cluster data JSON
        #[arg(long)]
        keyword_data: Option<PathBuf>,
    },

    /// Report readability and keyword density for a text file
    Analyze {
        /// Text or Markdown file to analyze
        file: PathBuf,

        /// Keyword phrase to measure (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up structured logging
    let default_filter = if cli.verbose {
        "blogflow=debug"
    } else {
        "blogflow=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Stage {
            stage,
            output_dir,
            context,
            product,
            persona_name,
            lookback_days,
            workflow_config,
            keyword_data,
        } => {
            let settings_path = workflow_config.unwrap_or_else(|| config.workflow_config.clone());
            Config::require_file(&settings_path, "Workflow configuration")?;
            let settings = WorkflowSettings::load(&settings_path)?;

            let keyword_data = if stage == Stage::Stage1 {
                let path = keyword_data.unwrap_or_else(|| config.keyword_data.clone());
                Config::require_file(&path, "Keyword cluster data")?;
                Some(KeywordData::load(&path)?)
            } else {
                None
            };

            let args = StageArgs::resolve(
                &settings,
                output_dir,
                context,
                product,
                persona_name,
                lookback_days,
                config.shared_context.clone(),
            );

            info!(%stage, output = %args.output_dir.display(), "Running workflow stage");
            workflow::run(stage, &args, &settings, keyword_data.as_ref())
                .with_context(|| format!("{stage} failed"))?;

            println!(
                "{} {} artifacts written to {}",
                "Done:".green().bold(),
                stage,
                args.output_dir.display()
            );
            println!(
                "{}",
                format!("Context saved to {}", args.shared_context.display()).dimmed()
            );
        }

        Commands::UpdateReadme {
            config: blogs_path,
            readme,
            offline,
            dry_run,
        } => {
            let blogs_path = blogs_path.unwrap_or_else(|| config.blogs_config.clone());
            let readme_path = readme.unwrap_or_else(|| config.readme.clone());

            let options = RefreshOptions {
                offline,
                dry_run,
                show_progress: !dry_run,
            };
            let outcome = refresh_readme(&config, &blogs_path, &readme_path, options).await;

            match outcome {
                Ok(sections) if dry_run => terminal::display_sections(&sections),
                Ok(sections) => {
                    println!(
                        "{} README updated with {} blog section(s): {}",
                        "Done:".green().bold(),
                        sections.len(),
                        readme_path.display()
                    );
                }
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Clusters { keyword_data } => {
            let path = keyword_data.unwrap_or_else(|| config.keyword_data.clone());
            Config::require_file(&path, "Keyword cluster data")?;
            let data = KeywordData::load(&path)?;

            let metrics = score_all(&data.clusters)?;
            let winner = select_winner(&metrics).map(|w| w.id.clone());
            terminal::display_cluster_ranking(&metrics, winner.as_deref());
        }

        Commands::Analyze { file, keywords } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let stats = TextStats::from_text(&text);
            let densities = keywords
                .iter()
                .map(|kw| {
                    density_percent(&text, kw)
                        .map(|d| (kw.clone(), d))
                        .with_context(|| format!("Cannot measure keyword '{kw}'"))
                })
                .collect::<Result<Vec<_>>>()?;

            terminal::display_text_report(&stats, &densities);
        }
    }

    Ok(())
}

/// Load the blogs configuration and run the refresh over HTTP feeds.
async fn refresh_readme(
    config: &Config,
    blogs_path: &Path,
    readme_path: &Path,
    options: RefreshOptions,
) -> Result<Vec<String>, FeedUpdateError> {
    let blogs = load_blogs(blogs_path, &config.root)?;
    let downloader = HttpFeedSource::new(config.feed_timeout)
        .map_err(|e| FeedUpdateError::Config(format!("{e:#}")))?;
    refresh::run(&blogs, &downloader, readme_path, options).await
}
