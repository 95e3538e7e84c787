// Markdown artifact helpers shared by the workflow stages.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex_lite::Regex;

/// Column width for wrapped paragraphs.
pub const WRAP_WIDTH: usize = 100;

static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern compiles"));

/// Render a pipe table. Cells are written as-is.
pub fn table<R, C>(headers: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    let mut lines = vec![
        headers.join(" | "),
        vec!["---"; headers.len()].join(" | "),
    ];
    for row in rows {
        let cells: Vec<String> = row.into_iter().map(|c| c.as_ref().to_string()).collect();
        lines.push(cells.join(" | "));
    }
    lines.join("\n")
}

/// Wrap a paragraph at [`WRAP_WIDTH`] columns.
pub fn fill(text: &str) -> String {
    textwrap::fill(text, WRAP_WIDTH)
}

/// `- item` lines for every entry.
pub fn bullets<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| format!("- {}", item.as_ref()))
        .collect()
}

/// URL-friendly slug: lowercase, non-alphanumeric runs become one dash.
pub fn slugify(value: &str) -> String {
    let lower = value.to_lowercase();
    NON_SLUG
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Trim a sentence and make sure it ends with `.`, `!` or `?`.
pub fn clean_sentence(text: &str) -> String {
    let text = text.trim();
    match text.chars().last() {
        None => String::new(),
        Some('.' | '!' | '?') => text.to_string(),
        Some(_) => format!("{text}."),
    }
}

/// Title-case each whitespace-separated word.
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Substitute `{name}` placeholders. Unknown placeholders are left as-is.
pub fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{name}}}"), value)
        })
}

/// Write an artifact: content trimmed, exactly one trailing newline.
pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, format!("{}\n", content.trim()))
        .with_context(|| format!("Failed to write {}", path.display()))
}
