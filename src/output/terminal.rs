// Colored terminal output for cluster rankings and text reports.
//
// main.rs delegates here; nothing in this module affects generated files.

use colored::Colorize;

use crate::analysis::readability::TextStats;
use crate::clusters::metrics::ClusterMetrics;
use crate::clusters::models::ConversionPotential;

/// Display clusters ranked by score, marking the winner.
pub fn display_cluster_ranking(clusters: &[ClusterMetrics], winner_id: Option<&str>) {
    if clusters.is_empty() {
        println!("No keyword clusters configured.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Keyword Clusters ({} scored) ===", clusters.len()).bold()
    );
    println!();
    println!(
        "  {:>4}  {:<32} {:>10}  {:>10}  {:>6}  {:>5}  {:<10}",
        "Rank".dimmed(),
        "Cluster".dimmed(),
        "Score".dimmed(),
        "Volume".dimmed(),
        "Diff".dimmed(),
        "CTR".dimmed(),
        "Conversion".dimmed(),
    );
    println!("  {}", "-".repeat(90).dimmed());

    let mut ranked: Vec<&ClusterMetrics> = clusters.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    for (i, cluster) in ranked.iter().enumerate() {
        let marker = if Some(cluster.id.as_str()) == winner_id {
            "*".green().bold()
        } else {
            " ".normal()
        };
        println!(
            "  {:>3}.{} {:<32} {:>10.1}  {:>10}  {:>6.1}  {:>4.1}%  {:<10}",
            i + 1,
            marker,
            super::truncate_chars(&cluster.label, 29),
            cluster.score,
            super::format_thousands(cluster.total_volume),
            cluster.avg_difficulty,
            cluster.avg_ctr * 100.0,
            colorize_conversion(cluster.conversion_potential),
        );
    }

    if let Some(winner) = clusters.iter().find(|c| Some(c.id.as_str()) == winner_id) {
        println!();
        println!(
            "  {} {} (top keywords: {})",
            "Winner:".green().bold(),
            winner.label.bold(),
            winner.top_keywords.join(", ").dimmed()
        );
    }
}

/// Display readability and keyword density for a piece of text.
pub fn display_text_report(stats: &TextStats, densities: &[(String, f64)]) {
    println!("\n{}", "=== Text Report ===".bold());
    println!("  Sentences: {}", stats.sentences);
    println!("  Words:     {}", stats.words);
    println!("  Syllables: {}", stats.syllables);

    let grade = stats.grade();
    let grade_str = format!("{grade:.2}");
    let colored_grade = if (6.0..=8.0).contains(&grade) {
        grade_str.green()
    } else {
        grade_str.yellow()
    };
    println!("  Flesch-Kincaid grade: {colored_grade} (target 6-8)");

    if !densities.is_empty() {
        println!("\n  Keyword density:");
        for (keyword, percent) in densities {
            println!("    {:<40} {:>6.2}%", keyword, percent);
        }
    }
}

/// Print rendered README sections, separated by blank lines.
pub fn display_sections(sections: &[String]) {
    println!("{}", sections.join("\n\n"));
}

fn colorize_conversion(potential: ConversionPotential) -> colored::ColoredString {
    match potential {
        ConversionPotential::High => potential.as_str().green().bold(),
        ConversionPotential::Medium => potential.as_str().yellow(),
        ConversionPotential::Low => potential.as_str().dimmed(),
    }
}
