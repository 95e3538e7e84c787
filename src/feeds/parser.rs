// RSS 2.0 / Atom 1.0 parsing into a flat list of posts.
//
// Tags are resolved through roxmltree's namespace API: RSS elements carry no
// namespace, Atom elements must be in the Atom namespace. A document is
// parsed fresh on every call; nothing is cached.

use roxmltree::{Document, Node, ParsingOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Namespace of Atom 1.0 elements.
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

#[derive(Debug, Error)]
pub enum FeedFormatError {
    #[error("Feed content is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Unable to parse feed content: {0}")]
    Malformed(#[from] roxmltree::Error),

    #[error("RSS feed did not include a channel element.")]
    MissingChannel,

    #[error("Unsupported feed type '{0}'.")]
    UnsupportedRoot(String),
}

/// One published post: an entity-decoded title and its link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPost {
    pub title: String,
    pub link: String,
}

/// Parse raw feed bytes into posts, in document order.
///
/// Items missing a title or a link are skipped.
pub fn parse_feed(content: &[u8]) -> Result<Vec<FeedPost>, FeedFormatError> {
    let text = std::str::from_utf8(content)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)?;
    let root = doc.root_element();

    match root.tag_name().name() {
        "rss" => parse_rss(root),
        "feed" => Ok(parse_atom(root)),
        other => Err(FeedFormatError::UnsupportedRoot(other.to_string())),
    }
}

fn parse_rss(root: Node<'_, '_>) -> Result<Vec<FeedPost>, FeedFormatError> {
    let channel = child(root, "channel", None).ok_or(FeedFormatError::MissingChannel)?;

    Ok(children(channel, "item", None)
        .filter_map(|item| {
            let title = child_text(item, "title", None);
            let link = child_text(item, "link", None);
            make_post(title, link)
        })
        .collect())
}

fn parse_atom(root: Node<'_, '_>) -> Vec<FeedPost> {
    children(root, "entry", Some(ATOM_NS))
        .filter_map(|entry| {
            let title = child_text(entry, "title", Some(ATOM_NS));
            let link = children(entry, "link", Some(ATOM_NS))
                .find(|l| l.attribute("rel") == Some("alternate"))
                .or_else(|| child(entry, "link", Some(ATOM_NS)))
                .and_then(|l| l.attribute("href"))
                .unwrap_or("");
            make_post(title, link)
        })
        .collect()
}

fn make_post(title: &str, link: &str) -> Option<FeedPost> {
    let title = html_escape::decode_html_entities(title.trim());
    let link = link.trim();
    if title.is_empty() || link.is_empty() {
        return None;
    }
    Some(FeedPost {
        title: title.into_owned(),
        link: link.to_string(),
    })
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
    namespace: Option<&'a str>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| {
        n.is_element() && n.tag_name().name() == name && n.tag_name().namespace() == namespace
    })
}

fn child<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
    namespace: Option<&'a str>,
) -> Option<Node<'a, 'input>> {
    children(node, name, namespace).next()
}

fn child_text<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
    namespace: Option<&'a str>,
) -> &'a str {
    child(node, name, namespace)
        .and_then(|n| n.text())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rss_single_item() {
        let xml = br#"<rss version="2.0"><channel><title>Blog</title>
            <item><title>Hello</title><link>https://example.com/a</link></item>
        </channel></rss>"#;
        let posts = parse_feed(xml).unwrap();
        assert_eq!(
            posts,
            vec![FeedPost {
                title: "Hello".to_string(),
                link: "https://example.com/a".to_string(),
            }]
        );
    }

    #[test]
    fn test_rss_skips_incomplete_items() {
        let xml = br#"<rss><channel>
            <item><title>No link</title></item>
            <item><link>https://example.com/no-title</link></item>
            <item><title>   </title><link>https://example.com/blank</link></item>
            <item><title>Kept</title><link> https://example.com/kept </link></item>
        </channel></rss>"#;
        let posts = parse_feed(xml).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].link, "https://example.com/kept");
    }

    #[test]
    fn test_rss_decodes_double_encoded_entities() {
        let xml = br#"<rss><channel><item>
            <title>Tom &amp;amp; Jerry&amp;#8217;s</title><link>https://e.com/t</link>
        </item></channel></rss>"#;
        let posts = parse_feed(xml).unwrap();
        assert_eq!(posts[0].title, "Tom & Jerry\u{2019}s");
    }

    #[test]
    fn test_rss_cdata_title() {
        let xml = br#"<rss><channel><item>
            <title><![CDATA[Ten <Tips>]]></title><link>https://e.com/c</link>
        </item></channel></rss>"#;
        assert_eq!(parse_feed(xml).unwrap()[0].title, "Ten <Tips>");
    }

    #[test]
    fn test_rss_missing_channel() {
        let err = parse_feed(b"<rss version=\"2.0\"></rss>").unwrap_err();
        assert!(matches!(err, FeedFormatError::MissingChannel));
    }

    #[test]
    fn test_atom_prefers_alternate_link() {
        let xml = br#"<feed xmlns="http://www.w3.org/2005/Atom">
            <entry>
                <title>Post</title>
                <link rel="self" href="https://example.com/self"/>
                <link rel="alternate" href="https://example.com/post"/>
            </entry>
        </feed>"#;
        let posts = parse_feed(xml).unwrap();
        assert_eq!(posts[0].link, "https://example.com/post");
    }

    #[test]
    fn test_atom_falls_back_to_first_link() {
        let xml = br#"<feed xmlns="http://www.w3.org/2005/Atom">
            <entry><title>B</title><link href="https://example.com/b"/></entry>
        </feed>"#;
        let posts = parse_feed(xml).unwrap();
        assert_eq!(
            posts,
            vec![FeedPost {
                title: "B".to_string(),
                link: "https://example.com/b".to_string(),
            }]
        );
    }

    #[test]
    fn test_atom_prefixed_namespace() {
        let xml = br#"<a:feed xmlns:a="http://www.w3.org/2005/Atom">
            <a:entry><a:title>Prefixed</a:title><a:link href="https://e.com/p"/></a:entry>
        </a:feed>"#;
        assert_eq!(parse_feed(xml).unwrap()[0].title, "Prefixed");
    }

    #[test]
    fn test_atom_entries_outside_namespace_ignored() {
        let xml = br#"<feed><entry><title>X</title><link href="https://e.com/x"/></entry></feed>"#;
        assert!(parse_feed(xml).unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_root_names_tag() {
        let err = parse_feed(b"<foo/>").unwrap_err();
        assert!(matches!(&err, FeedFormatError::UnsupportedRoot(tag) if tag == "foo"));
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse_feed(b"<rss><channel>").unwrap_err();
        assert!(matches!(err, FeedFormatError::Malformed(_)));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = parse_feed(&[0x3c, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, FeedFormatError::Encoding(_)));
    }
}
