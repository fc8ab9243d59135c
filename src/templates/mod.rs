//! HTML templates and styling for the notes viewer.
//!
//! ## Module Structure
//!
//! - `styles` - CSS constants and theme definitions
//! - `components` - Shared HTML components (settings bar, profile card, notes list, base template)
//! - `viewer` - The viewer page

mod components;
mod styles;
mod viewer;

pub use components::{base_html, html_escape, note_link, notes_list, profile_card, settings_bar};
pub use styles::STYLE;
pub use viewer::{render_viewer, NOTE_ERROR_TITLE};
