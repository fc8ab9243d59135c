//! Note loading and frontmatter parsing for the built-in notes API.
//!
//! Notes are `<slug>.md` files in a flat content directory. A note is only
//! published when its frontmatter carries at least a title and a date.

use crate::models::{Note, NoteListItem};
use chrono::{DateTime, NaiveDate, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// ============================================================================
// Frontmatter Parsing
// ============================================================================

#[derive(Debug, Default, PartialEq)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub draft: bool,
}

/// Split `content` into frontmatter and body. `None` when there is no
/// complete `---` block at the top.
pub fn parse_frontmatter(content: &str) -> Option<(Frontmatter, String)> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.first().map(|l| l.trim_end()) != Some("---") {
        return None;
    }

    let end_idx = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| line.trim_end() == "---")
        .map(|(i, _)| i)?;

    let mut fm = Frontmatter::default();

    for line in &lines[1..end_idx] {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key.trim() {
            "title" if !value.is_empty() => fm.title = Some(unquote(value).to_string()),
            "date" => fm.date = parse_date(value),
            "tags" => fm.tags = parse_list(value),
            "summary" if !value.is_empty() => fm.summary = Some(unquote(value).to_string()),
            "draft" => {
                fm.draft = matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
            }
            _ => {}
        }
    }

    let body = lines[end_idx + 1..].join("\n");
    Some((fm, body))
}

fn unquote(value: &str) -> &str {
    value.trim_matches(|c| c == '"' || c == '\'')
}

/// RFC 3339 timestamps (a trailing `Z` included) or bare `YYYY-MM-DD` dates,
/// which are taken as midnight UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let v = unquote(value.trim());
    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// `[a, "b", 'c']` becomes three items; a bare value becomes one.
pub fn parse_list(value: &str) -> Vec<String> {
    let v = value.trim();
    if let Some(inner) = v.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let inner = inner.trim();
        if inner.is_empty() {
            return Vec::new();
        }
        return inner
            .split(',')
            .map(|part| unquote(part.trim()).to_string())
            .collect();
    }
    if v.is_empty() {
        Vec::new()
    } else {
        vec![v.to_string()]
    }
}

// ============================================================================
// Note Loading
// ============================================================================

/// Reject anything that could leave the content directory.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.contains("..")
        && !slug.contains(['/', '\\'])
        && !slug.starts_with('.')
}

pub fn note_path(notes_dir: &Path, slug: &str) -> Option<PathBuf> {
    is_valid_slug(slug).then(|| notes_dir.join(format!("{}.md", slug)))
}

/// Raw file text for a slug, frontmatter included.
pub fn read_raw(notes_dir: &Path, slug: &str) -> Option<String> {
    fs::read_to_string(note_path(notes_dir, slug)?).ok()
}

pub fn load_note(notes_dir: &Path, slug: &str) -> Option<Note> {
    let path = note_path(notes_dir, slug)?;
    let content = fs::read_to_string(&path).ok()?;
    let (fm, body) = parse_frontmatter(&content)?;

    Some(Note {
        slug: slug.to_string(),
        path,
        title: fm.title?,
        date: fm.date?,
        tags: fm.tags,
        summary: fm.summary,
        draft: fm.draft,
        body,
    })
}

/// Slugs of every `.md` file directly inside `notes_dir`, sorted.
pub fn list_note_slugs(notes_dir: &Path) -> Vec<String> {
    let mut slugs: Vec<String> = WalkDir::new(notes_dir)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().map(|ext| ext == "md").unwrap_or(false))
        .filter_map(|e| {
            e.path()
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
        })
        .collect();
    slugs.sort();
    slugs
}

/// Published notes, newest first.
pub fn load_all_notes(notes_dir: &Path, include_drafts: bool) -> Vec<Note> {
    use rayon::prelude::*;

    let slugs = list_note_slugs(notes_dir);
    let mut notes: Vec<Note> = slugs
        .par_iter()
        .filter_map(|slug| load_note(notes_dir, slug))
        .filter(|note| include_drafts || !note.draft)
        .collect();

    notes.sort_by(|a, b| b.date.cmp(&a.date));
    notes
}

pub fn to_list_item(note: &Note, notes_url: &str) -> NoteListItem {
    NoteListItem {
        slug: note.slug.clone(),
        url: Some(format!(
            "{}/{}",
            notes_url.trim_end_matches('/'),
            urlencoding::encode(&note.slug)
        )),
        title: note.title.clone(),
        date: Some(note.date),
        tags: note.tags.clone(),
        summary: note.summary.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn write_note(dir: &Path, slug: &str, content: &str) {
        fs::write(dir.join(format!("{}.md", slug)), content).unwrap();
    }

    #[test]
    fn test_parse_frontmatter_fields() {
        let text = "---\n# comment\ntitle: Hello: World\ndate: 2024-03-01\ntags: [rust, \"web\", 'notes']\nsummary: Short\ndraft: Yes\n---\nBody\nmore";
        let (fm, body) = parse_frontmatter(text).unwrap();

        assert_eq!(fm.title.as_deref(), Some("Hello: World"));
        assert_eq!(fm.date, Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
        assert_eq!(fm.tags, vec!["rust", "web", "notes"]);
        assert_eq!(fm.summary.as_deref(), Some("Short"));
        assert!(fm.draft);
        assert_eq!(body, "Body\nmore");
    }

    #[test]
    fn test_parse_frontmatter_requires_block() {
        assert!(parse_frontmatter("no frontmatter").is_none());
        assert!(parse_frontmatter("---\ntitle: open\nbody").is_none());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(parse_date("2024-05-06T07:08:09Z"), Some(expected));
        assert_eq!(parse_date("2024-05-06T09:08:09+02:00"), Some(expected));
        assert_eq!(parse_date("2024-05-06T07:08:09"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_parse_list() {
        assert!(parse_list("[]").is_empty());
        assert_eq!(parse_list("single"), vec!["single"]);
        assert_eq!(parse_list("[a, b]"), vec!["a", "b"]);
    }

    #[test]
    fn test_slug_validation() {
        assert!(is_valid_slug("hello-world"));
        assert!(!is_valid_slug("../secret"));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug(".hidden"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn test_load_all_notes_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "old", "---\ntitle: Old\ndate: 2023-01-01\n---\nold");
        write_note(dir.path(), "new", "---\ntitle: New\ndate: 2024-01-01\n---\nnew");
        write_note(dir.path(), "draft", "---\ntitle: Draft\ndate: 2025-01-01\ndraft: true\n---\nd");
        write_note(dir.path(), "untitled", "---\ndate: 2024-01-01\n---\nx");
        write_note(dir.path(), "plain", "no frontmatter");
        fs::write(dir.path().join("ignored.txt"), "x").unwrap();

        let slugs: Vec<String> = load_all_notes(dir.path(), false)
            .into_iter()
            .map(|n| n.slug)
            .collect();
        assert_eq!(slugs, vec!["new", "old"]);

        let with_drafts = load_all_notes(dir.path(), true);
        assert_eq!(with_drafts[0].slug, "draft");
        assert_eq!(list_note_slugs(dir.path()).len(), 5);
    }

    #[test]
    fn test_read_raw_keeps_frontmatter() {
        let dir = tempfile::tempdir().unwrap();
        let text = "---\ntitle: T\ndate: 2024-01-01\n---\nBody";
        write_note(dir.path(), "t", text);

        assert_eq!(read_raw(dir.path(), "t").as_deref(), Some(text));
        assert_eq!(read_raw(dir.path(), "../t"), None);
        assert_eq!(read_raw(dir.path(), "missing"), None);
    }

    #[test]
    fn test_to_list_item_url() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "first", "---\ntitle: First\ndate: 2024-01-01\n---\nBody");
        let note = load_note(dir.path(), "first").unwrap();

        let item = to_list_item(&note, "http://localhost:3000/notes/");
        assert_eq!(item.url.as_deref(), Some("http://localhost:3000/notes/first"));
        assert_eq!(item.title, "First");
    }
}
