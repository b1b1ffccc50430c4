// src/content.rs

use crate::model::UpdateInfo;
use crate::notes;

/// What the dialog shows its release notes in.
///
/// Exactly one variant exists per build: plain text for a `TextView` by
/// default, HTML for an embedded `WebView` with the `web-notes` feature.
#[derive(Debug, Clone, PartialEq)]
pub enum NotesContent {
    #[cfg(not(feature = "web-notes"))]
    Text(String),
    #[cfg(feature = "web-notes")]
    Web(String),
}

impl NotesContent {
    #[cfg(not(feature = "web-notes"))]
    pub fn for_info(info: &UpdateInfo) -> Self {
        NotesContent::Text(notes::plain_text(info, notes::DEFAULT_WIDTH))
    }

    #[cfg(feature = "web-notes")]
    pub fn for_info(info: &UpdateInfo) -> Self {
        NotesContent::Web(notes::html(info))
    }

    pub const fn uses_web_surface() -> bool {
        cfg!(feature = "web-notes")
    }

    pub fn as_str(&self) -> &str {
        match self {
            #[cfg(not(feature = "web-notes"))]
            NotesContent::Text(text) => text,
            #[cfg(feature = "web-notes")]
            NotesContent::Web(html) => html,
        }
    }
}
