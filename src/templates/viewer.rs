//! Viewer page template: profile and notes in the sidebar, the selected
//! note in the main pane.

use crate::viewer::ViewerPage;

use super::components::{base_html, error_card, html_escape, notes_list, profile_card};

pub const NOTE_ERROR_TITLE: &str = "Error loading note";

fn note_pane(page: &ViewerPage) -> String {
    match &page.note {
        Some(Ok(note)) => format!(
            r#"<div class="note-header">
                <h1>{title}</h1>
                <a href="{url}" target="_blank" rel="noopener">Raw</a>
            </div>
            <div class="content">{html}</div>"#,
            title = html_escape(&note.title),
            url = html_escape(&note.url),
            html = note.html,
        ),
        Some(Err(e)) => format!(
            r#"<div class="note-header"><h1>{}</h1></div>
            <div class="content error">{}</div>"#,
            NOTE_ERROR_TITLE,
            html_escape(&e.to_string())
        ),
        None => r#"<p class="muted">Select a note.</p>"#.to_string(),
    }
}

/// `meta_param` is the explicitly requested metadata URL, if any; note links
/// keep it so navigation stays on the same source.
pub fn render_viewer(page: &ViewerPage, meta_param: Option<&str>) -> String {
    let profile = match &page.profile {
        Ok(card) => profile_card(card),
        Err(e) => error_card(&format!("Cannot load profile: {}", e)),
    };

    let notes = match &page.notes {
        Ok(entries) => notes_list(entries, page.selected_url(), meta_param),
        Err(e) => format!(
            r#"<p class="error">Cannot load notes: {}</p>"#,
            html_escape(&e.to_string())
        ),
    };

    let content = format!(
        r#"<aside>
            {profile}
            <h2>Notes</h2>
            {notes}
        </aside>
        <main>{note}</main>"#,
        profile = profile,
        notes = notes,
        note = note_pane(page),
    );

    let title = match &page.note {
        Some(Ok(note)) => format!("{} - Dev Notes", note.title),
        _ => "Dev Notes".to_string(),
    };

    base_html(&title, &page.meta_url, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewerError;
    use crate::presentation::{NoteEntry, ProfileCard};
    use crate::viewer::NoteView;

    fn card() -> ProfileCard {
        ProfileCard {
            name: "Vibe Racer".into(),
            avatar: None,
            version: "1.0.0".into(),
            file_list_url: "—".into(),
            contacts: Vec::new(),
        }
    }

    #[test]
    fn test_render_loaded_note() {
        let page = ViewerPage {
            meta_url: "https://api.example/metadata".into(),
            profile: Ok(card()),
            notes: Ok(vec![NoteEntry::new("https://api.example/notes/a.md")]),
            note: Some(Ok(NoteView {
                url: "https://api.example/notes/a.md".into(),
                title: "a.md".into(),
                html: "<h1>A</h1>".into(),
            })),
        };
        let html = render_viewer(&page, None);

        assert!(html.contains("<title>a.md - Dev Notes</title>"));
        assert!(html.contains(r#"<div class="content"><h1>A</h1></div>"#));
        assert!(html.contains("note-item selected"));
        assert!(html.contains(r#"value="https://api.example/metadata""#));
    }

    #[test]
    fn test_render_failures_in_place() {
        let page = ViewerPage {
            meta_url: "x".into(),
            profile: Err(ViewerError::Endpoint("x".into())),
            notes: Err(ViewerError::Endpoint("<x>".into())),
            note: Some(Err(ViewerError::Endpoint("y".into()))),
        };
        let html = render_viewer(&page, None);

        assert!(html.contains("Cannot load profile"));
        assert!(html.contains("Cannot load notes: cannot resolve notes endpoint from &lt;x&gt;"));
        assert!(html.contains(NOTE_ERROR_TITLE));
    }
}
