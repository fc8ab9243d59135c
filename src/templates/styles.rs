//! CSS styles for the notes viewer.

// ============================================================================
// CSS Styles
// ============================================================================

pub const STYLE: &str = r#"
/* Solarized Light Theme */
:root {
    --base01: #586e75;
    --base00: #657b83;
    --base1: #93a1a1;
    --base2: #eee8d5;
    --base3: #fdf6e3;

    --red: #dc322f;
    --blue: #268bd2;
    --cyan: #2aa198;

    --bg: var(--base3);
    --fg: var(--base00);
    --muted: var(--base1);
    --border: var(--base2);
    --link: var(--blue);
    --link-hover: var(--cyan);
    --accent: var(--base2);
    --code-bg: var(--base2);
    --avatar-placeholder: #e6faff;
}

* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    color: var(--fg);
    background: var(--bg);
}

.container {
    max-width: 1100px;
    margin: 0 auto;
    padding: 1rem;
    display: grid;
    grid-template-columns: 300px 1fr;
    gap: 1.5rem;
}

@media (max-width: 800px) {
    .container { grid-template-columns: 1fr; }
}

a { color: var(--link); text-decoration: none; }
a:hover { color: var(--link-hover); text-decoration: underline; }

h1, h2, h3 { font-weight: 600; margin-top: 1em; margin-bottom: 0.5em; }
h1 { font-size: 1.5rem; }
h2 { font-size: 1.25rem; }
h3 { font-size: 1.1rem; }

.settings-bar {
    position: sticky;
    top: 0;
    background: var(--bg);
    border-bottom: 1px solid var(--border);
    padding: 0.5rem 1rem;
    display: flex;
    gap: 0.5rem;
    align-items: center;
    z-index: 100;
}

.settings-bar label { font-size: 0.8rem; color: var(--muted); }

.settings-bar input {
    flex: 1;
    padding: 0.4rem 0.75rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: var(--bg);
    color: var(--fg);
    font-size: 0.9rem;
}

.settings-bar button, .note-list .open {
    padding: 0.3rem 0.75rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: var(--accent);
    color: var(--fg);
    cursor: pointer;
    font-size: 0.85rem;
}

.profile-card {
    border: 1px solid var(--border);
    border-radius: 6px;
    padding: 1rem;
    margin-bottom: 1rem;
}

.avatar {
    width: 96px;
    height: 96px;
    border-radius: 50%;
    background-size: cover;
    background-position: center;
    margin-bottom: 0.75rem;
}

.avatar.placeholder { background-image: none; background-color: var(--avatar-placeholder); }

.profile-card .name { font-size: 1.2rem; font-weight: 600; }
.profile-card .meta-row { font-size: 0.8rem; color: var(--muted); word-break: break-all; }
.contacts { list-style: none; margin-top: 0.75rem; font-size: 0.9rem; }

.note-list { list-style: none; }

.note-item {
    padding: 0.5rem 0;
    border-bottom: 1px solid var(--border);
    display: flex;
    justify-content: space-between;
    align-items: baseline;
    gap: 0.5rem;
}

.note-item:last-child { border-bottom: none; }
.note-item.selected .title { font-weight: 600; }

.note-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 1rem;
    gap: 0.5rem;
}

.note-header h1 { margin-top: 0; }

.content p { margin: 0.25em 0; }

.content pre {
    background: var(--code-bg);
    padding: 1rem;
    overflow-x: auto;
    border-radius: 4px;
    margin: 1em 0;
}

.content code {
    font-family: "SF Mono", "Consolas", "Liberation Mono", monospace;
    font-size: 0.85em;
}

.error { color: var(--red); }
.muted { color: var(--muted); }
"#;
