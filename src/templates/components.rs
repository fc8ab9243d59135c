//! Shared HTML components for the notes viewer.
//!
//! Contains the settings bar, profile card, notes list and base template.

use crate::presentation::{NoteEntry, ProfileCard};
use url::Url;

use super::styles::STYLE;

// ============================================================================
// Text Escaping
// ============================================================================

/// Escape for both element content and quoted attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const LINK_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// `href` from remote metadata, kept only for web and mail links.
pub fn safe_href(href: &str) -> Option<&str> {
    Url::parse(href.trim())
        .ok()
        .filter(|u| LINK_SCHEMES.contains(&u.scheme()))
        .map(|_| href.trim())
}

/// Image URL for a CSS `url('...')`. The quote and parentheses are
/// percent-encoded since entities are decoded before CSS parsing.
pub fn css_url(src: &str) -> Option<String> {
    let url = Url::parse(src.trim()).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    Some(
        url.as_str()
            .replace('\'', "%27")
            .replace('(', "%28")
            .replace(')', "%29"),
    )
}

/// Viewer link selecting `note_url`, carrying an explicit metadata URL along.
pub fn note_link(note_url: &str, meta_param: Option<&str>) -> String {
    let mut href = format!("/?note={}", urlencoding::encode(note_url));
    if let Some(meta) = meta_param {
        href.push_str("&meta=");
        href.push_str(&urlencoding::encode(meta));
    }
    href
}

// ============================================================================
// Settings Bar
// ============================================================================

pub fn settings_bar(meta_url: &str) -> String {
    format!(
        r#"<form class="settings-bar" action="/settings" method="post">
            <label for="meta">Metadata URL</label>
            <input type="text" id="meta" name="meta" value="{}">
            <button type="submit">Save</button>
        </form>"#,
        html_escape(meta_url)
    )
}

// ============================================================================
// Profile Card
// ============================================================================

pub fn profile_card(card: &ProfileCard) -> String {
    let avatar = match card.avatar.as_deref().and_then(css_url) {
        Some(src) => format!(
            r#"<div class="avatar" style="background-image: url('{}')"></div>"#,
            html_escape(&src)
        ),
        None => r#"<div class="avatar placeholder"></div>"#.to_string(),
    };

    let contacts: String = card
        .contacts
        .iter()
        .map(|c| match safe_href(&c.href) {
            Some(href) => format!(
                r#"<li><a href="{}" target="_blank" rel="noopener">{}</a></li>"#,
                html_escape(href),
                html_escape(&c.text)
            ),
            None => format!("<li>{}</li>", html_escape(&c.text)),
        })
        .collect();

    format!(
        r#"<section class="profile-card">
            {avatar}
            <div class="name">{name}</div>
            <div class="meta-row">version: {version}</div>
            <div class="meta-row">notes: {file_list}</div>
            <ul class="contacts">{contacts}</ul>
        </section>"#,
        avatar = avatar,
        name = html_escape(&card.name),
        version = html_escape(&card.version),
        file_list = html_escape(&card.file_list_url),
        contacts = contacts,
    )
}

pub fn error_card(message: &str) -> String {
    format!(
        r#"<section class="profile-card"><div class="avatar placeholder"></div><p class="error">{}</p></section>"#,
        html_escape(message)
    )
}

// ============================================================================
// Notes List
// ============================================================================

pub fn notes_list(entries: &[NoteEntry], selected: Option<&str>, meta_param: Option<&str>) -> String {
    if entries.is_empty() {
        return r#"<p class="muted">No notes.</p>"#.to_string();
    }

    let mut html = String::from(r#"<ul class="note-list">"#);
    for entry in entries {
        let class = if selected == Some(entry.url.as_str()) {
            "note-item selected"
        } else {
            "note-item"
        };
        let href = html_escape(&note_link(&entry.url, meta_param));
        html.push_str(&format!(
            r#"<li class="{class}">
                <a href="{href}" class="title" title="{url}">{name}</a>
                <a href="{href}" class="open">Open</a>
            </li>"#,
            class = class,
            href = href,
            url = html_escape(&entry.url),
            name = html_escape(&entry.display_name),
        ));
    }
    html.push_str("</ul>");
    html
}

// ============================================================================
// Base HTML Template
// ============================================================================

pub fn base_html(title: &str, meta_url: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    {settings}
    <div class="container">
        {content}
    </div>
</body>
</html>"#,
        title = html_escape(title),
        settings = settings_bar(meta_url),
    )
}
