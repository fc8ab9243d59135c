//! View models for the profile card and the notes list.

use crate::models::{Contact, Metadata};
use url::Url;

/// Shown wherever a metadata field is missing.
pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, PartialEq)]
pub struct ContactLink {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCard {
    pub name: String,
    pub avatar: Option<String>,
    pub version: String,
    pub file_list_url: String,
    pub contacts: Vec<ContactLink>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn or_placeholder(value: &Option<String>) -> String {
    non_empty(value).unwrap_or(PLACEHOLDER).to_string()
}

fn handle(value: &str) -> &str {
    value.strip_prefix('@').unwrap_or(value)
}

/// Known channels in display order, then free-form links.
pub fn contact_links(contact: &Contact) -> Vec<ContactLink> {
    let known: [(&str, &Option<String>, fn(&str) -> String); 5] = [
        ("github", &contact.github, |v| format!("https://github.com/{}", handle(v))),
        ("linkedin", &contact.linkedin, |v| v.to_string()),
        ("email", &contact.email, |v| format!("mailto:{}", v)),
        ("twitter", &contact.twitter, |v| format!("https://x.com/{}", handle(v))),
        ("website", &contact.website, |v| v.to_string()),
    ];

    let mut links: Vec<ContactLink> = known
        .iter()
        .filter_map(|(label, value, link)| {
            non_empty(value).map(|v| ContactLink {
                href: link(v),
                text: format!("{}: {}", label, v),
            })
        })
        .collect();

    for other in &contact.other {
        let Some(url) = non_empty(&other.url) else {
            continue;
        };
        let text = non_empty(&other.label)
            .or_else(|| non_empty(&other.platform))
            .unwrap_or("link");
        links.push(ContactLink {
            href: url.to_string(),
            text: text.to_string(),
        });
    }

    links
}

impl ProfileCard {
    pub fn from_metadata(meta: &Metadata) -> Self {
        let profile = meta.profile.clone().unwrap_or_default();
        Self {
            name: or_placeholder(&profile.name),
            avatar: non_empty(&profile.avatar).map(String::from),
            version: or_placeholder(&meta.version),
            file_list_url: meta
                .file_list
                .as_ref()
                .map(|f| or_placeholder(&f.url))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            contacts: profile
                .contact
                .as_ref()
                .map(contact_links)
                .unwrap_or_default(),
        }
    }
}

// ============================================================================
// Notes List
// ============================================================================

/// Last path segment of `url`, or the whole input when there is none.
pub fn note_title(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path()
                .rsplit('/')
                .next()
                .filter(|segment| !segment.is_empty())
                .map(String::from)
        })
        .unwrap_or_else(|| url.to_string())
}

pub fn display_name(url: &str) -> String {
    let base = note_title(url);
    match base.strip_suffix(".md") {
        Some(stem) => stem.to_string(),
        None => base,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteEntry {
    pub url: String,
    pub display_name: String,
}

impl NoteEntry {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            display_name: display_name(&url),
            url,
        }
    }
}
