//! Restricted Markdown rendering.
//!
//! Notes are written in a small line-oriented dialect: fenced code blocks,
//! `#` to `###` headings, blank-line breaks and paragraphs with `**bold**`
//! and `*italic*` spans. Anything else is treated as paragraph text.

use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,3})\s+").expect("heading pattern"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("italic pattern"));

const FENCE: &str = "```";
const FRONT_MATTER_MARKER: &str = "---";

// ============================================================================
// Text Escaping
// ============================================================================

/// Escape text for element content. Quotes are left alone: rendered note
/// bodies never end up inside attributes.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ============================================================================
// Front Matter
// ============================================================================

fn is_marker(line: &str) -> bool {
    line.trim_end_matches(|c| c == '\n' || c == '\r') == FRONT_MATTER_MARKER
}

/// Remove a leading `---` ... `---` block, markers included.
///
/// The block is only recognized when the very first line is a marker and a
/// later line is exactly `---`. Without a closing marker the text is
/// returned untouched.
pub fn strip_front_matter(text: &str) -> &str {
    let mut lines = text.split_inclusive('\n');

    let mut offset = match lines.next() {
        Some(first) if is_marker(first) => first.len(),
        _ => return text,
    };

    for line in lines {
        offset += line.len();
        if is_marker(line) {
            return &text[offset..];
        }
    }

    text
}

// ============================================================================
// Markdown Rendering
// ============================================================================

fn render_inline(line: &str) -> String {
    let escaped = escape_html(line);
    let bold = BOLD.replace_all(&escaped, "<strong>${1}</strong>");
    ITALIC.replace_all(&bold, "<em>${1}</em>").into_owned()
}

/// Convert a note body to HTML.
pub fn render(md: &str) -> String {
    let normalized = md.replace("\r\n", "\n").replace('\r', "\n");
    let mut html = String::with_capacity(normalized.len() * 2);
    let mut in_code = false;

    for line in normalized.split('\n') {
        if line.trim().starts_with(FENCE) {
            html.push_str(if in_code { "</code></pre>" } else { "<pre><code>" });
            in_code = !in_code;
            continue;
        }

        if in_code {
            html.push_str(&escape_html(line));
            html.push('\n');
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            let level = caps[1].len();
            let text = &line[caps[0].len()..];
            html.push_str(&format!("<h{level}>{}</h{level}>", escape_html(text)));
            continue;
        }

        if line.trim().is_empty() {
            html.push_str("<br/>");
            continue;
        }

        html.push_str("<p>");
        html.push_str(&render_inline(line));
        html.push_str("</p>");
    }

    if in_code {
        html.push_str("</code></pre>");
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_heading_blank_and_bold() {
        let html = render("# Title\n\nHello **world**");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<br/>"));
        assert!(html.contains("<p>Hello <strong>world</strong></p>"));
        assert_eq!(html, "<h1>Title</h1><br/><p>Hello <strong>world</strong></p>");
    }

    #[test]
    fn test_code_block_is_escaped() {
        assert_eq!(
            render("```\n<b>raw</b>\n```"),
            "<pre><code>&lt;b&gt;raw&lt;/b&gt;\n</code></pre>"
        );
    }

    #[test]
    fn test_code_block_keeps_whitespace_and_markup() {
        let html = render("```rust\n    # not a heading\n**x**\n  ```");
        assert_eq!(
            html,
            "<pre><code>    # not a heading\n**x**\n</code></pre>"
        );
    }

    #[test]
    fn test_unterminated_code_block_is_closed() {
        assert_eq!(render("```\nlet x = 1;"), "<pre><code>let x = 1;\n</code></pre>");
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(render("## Two"), "<h2>Two</h2>");
        assert_eq!(render("###\tThree"), "<h3>Three</h3>");
        assert_eq!(render("#### Four"), "<p>#### Four</p>");
        assert_eq!(render("#NoSpace"), "<p>#NoSpace</p>");
    }

    #[test]
    fn test_heading_text_is_escaped() {
        assert_eq!(render("# a < b"), "<h1>a &lt; b</h1>");
    }

    #[test]
    fn test_italic_and_bold_together() {
        assert_eq!(
            render("*a* and **b**"),
            "<p><em>a</em> and <strong>b</strong></p>"
        );
    }

    #[test]
    fn test_escaping_leaves_quotes() {
        assert_eq!(render("a & \"b\" <c>"), "<p>a &amp; \"b\" &lt;c&gt;</p>");
    }

    #[test]
    fn test_line_endings_normalized() {
        assert_eq!(render("# A\r\nB\rC"), "<h1>A</h1><p>B</p><p>C</p>");
    }

    #[test]
    fn test_whitespace_line_is_break() {
        assert_eq!(render("a\n   \nb"), "<p>a</p><br/><p>b</p>");
    }

    #[test]
    fn test_strip_front_matter() {
        assert_eq!(strip_front_matter("---\na: 1\n---\nBody"), "Body");
        assert_eq!(
            render(strip_front_matter("---\ntitle: x\n---\n# Hi")),
            "<h1>Hi</h1>"
        );
    }

    #[test]
    fn test_strip_front_matter_without_closing_marker() {
        let text = "---\ntitle: x\nBody";
        assert_eq!(strip_front_matter(text), text);
    }

    #[test]
    fn test_strip_front_matter_requires_leading_marker() {
        let text = "Intro\n---\nmore\n---\n";
        assert_eq!(strip_front_matter(text), text);
    }

    #[test]
    fn test_strip_front_matter_crlf_and_empty_block() {
        assert_eq!(strip_front_matter("---\r\nk: v\r\n---\r\nBody"), "Body");
        assert_eq!(strip_front_matter("---\n---\nBody"), "Body");
    }

    #[test]
    fn test_strip_front_matter_marker_must_be_exact() {
        let text = "---\na: 1\n----\nBody";
        assert_eq!(strip_front_matter(text), text);
    }

    proptest! {
        #[test]
        fn prop_code_blocks_always_closed(input in "(```|[a-z#* <>&]{0,8}|\n){0,24}") {
            let html = render(&input);
            prop_assert_eq!(
                html.matches("<pre><code>").count(),
                html.matches("</code></pre>").count()
            );
        }
    }
}
