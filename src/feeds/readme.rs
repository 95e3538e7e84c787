// README post-list rendering and marker splicing.
//
// The README carries a block delimited by two HTML comments. Everything
// between them (markers included) is replaced on each refresh; the rest of
// the file is left untouched.

use std::fs;
use std::path::Path;

use super::parser::FeedPost;
use super::FeedUpdateError;

pub const START_MARKER: &str = "<!-- BLOG-POST-LIST:START -->";
pub const END_MARKER: &str = "<!-- BLOG-POST-LIST:END -->";

/// Placeholder line when a feed yields no posts.
pub const EMPTY_LIST: &str = "- No posts available right now.";

/// Render the first `max_posts` posts as a Markdown bullet list.
pub fn build_markdown(posts: &[FeedPost], max_posts: usize) -> String {
    let selected = &posts[..posts.len().min(max_posts)];
    if selected.is_empty() {
        return EMPTY_LIST.to_string();
    }
    selected
        .iter()
        .map(|post| format!("- [{}]({})", post.title, post.link))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace the marker block in `content` with `sections` joined by newlines.
pub fn splice_markers(content: &str, sections: &[String]) -> Result<String, FeedUpdateError> {
    let start = content.find(START_MARKER);
    let end = content.find(END_MARKER);
    let (start, end) = match (start, end) {
        (Some(s), Some(e)) if e >= s => (s, e + END_MARKER.len()),
        _ => return Err(FeedUpdateError::MarkersNotFound),
    };

    let block = format!("{START_MARKER}\n{}\n{END_MARKER}", sections.join("\n"));
    Ok(format!("{}{}{}", &content[..start], block, &content[end..]))
}

/// Rewrite the README at `path` with fresh sections.
pub fn update_readme(path: &Path, sections: &[String]) -> Result<(), FeedUpdateError> {
    let io_err = |source| FeedUpdateError::Io {
        path: path.to_path_buf(),
        source,
    };
    let content = fs::read_to_string(path).map_err(io_err)?;
    let updated = splice_markers(&content, sections)?;
    fs::write(path, updated).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(n: u32) -> FeedPost {
        FeedPost {
            title: format!("Post {n}"),
            link: format!("https://e.com/{n}"),
        }
    }

    #[test]
    fn test_build_markdown_truncates() {
        let posts: Vec<FeedPost> = (1..=4).map(post).collect();
        assert_eq!(
            build_markdown(&posts, 2),
            "- [Post 1](https://e.com/1)\n- [Post 2](https://e.com/2)"
        );
    }

    #[test]
    fn test_build_markdown_empty() {
        assert_eq!(build_markdown(&[], 5), EMPTY_LIST);
        assert_eq!(build_markdown(&[post(1)], 0), EMPTY_LIST);
    }

    #[test]
    fn test_splice_replaces_block_only() {
        let readme = format!("# Title\n{START_MARKER}\nold\n{END_MARKER}\nfooter\n");
        let out = splice_markers(&readme, &["- a".to_string(), "- b".to_string()]).unwrap();
        assert_eq!(
            out,
            format!("# Title\n{START_MARKER}\n- a\n- b\n{END_MARKER}\nfooter\n")
        );
    }

    #[test]
    fn test_splice_missing_markers() {
        let err = splice_markers("no markers", &[]).unwrap_err();
        assert!(matches!(err, FeedUpdateError::MarkersNotFound));
    }

    #[test]
    fn test_splice_inverted_markers() {
        let readme = format!("{END_MARKER}\n{START_MARKER}");
        assert!(splice_markers(&readme, &[]).is_err());
    }
}
