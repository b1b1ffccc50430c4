// src/controller.rs

use crate::content::NotesContent;
use crate::model::UpdateInfo;
use crate::preferences::AutoUpdatePreference;
use gtk::ResponseType;
use std::cell::Cell;
use std::rc::Rc;

/// The user's answer to the update dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateChoice {
    Install,
    Skip,
    Later,
}

impl UpdateChoice {
    pub fn label(self) -> &'static str {
        match self {
            UpdateChoice::Install => "Install update",
            UpdateChoice::Skip => "Skip this version",
            UpdateChoice::Later => "Remind me later",
        }
    }

    pub fn response_type(self) -> ResponseType {
        match self {
            UpdateChoice::Install => ResponseType::Accept,
            UpdateChoice::Skip => ResponseType::Reject,
            UpdateChoice::Later => ResponseType::Cancel,
        }
    }

    /// Closing the window counts as "later".
    pub fn from_response(response: ResponseType) -> Self {
        match response {
            ResponseType::Accept => UpdateChoice::Install,
            ResponseType::Reject => UpdateChoice::Skip,
            _ => UpdateChoice::Later,
        }
    }
}

/// Toolkit-free state behind `AutoUpdateDialog`.
pub struct AutoUpdateController {
    info: Rc<UpdateInfo>,
    prefs: Rc<dyn AutoUpdatePreference>,
    auto: Cell<bool>,
}

impl AutoUpdateController {
    pub fn new(info: &Rc<UpdateInfo>, prefs: Rc<dyn AutoUpdatePreference>) -> Self {
        let auto = prefs.auto_update_enabled();
        Self {
            info: Rc::clone(info),
            prefs,
            auto: Cell::new(auto),
        }
    }

    pub fn info(&self) -> &UpdateInfo {
        &self.info
    }

    pub fn content(&self) -> NotesContent {
        NotesContent::for_info(&self.info)
    }

    pub fn auto_update(&self) -> bool {
        self.auto.get()
    }

    /// Persists the new toggle state. Store failures are logged only.
    pub fn on_auto_toggled(&self, active: bool) {
        self.auto.set(active);
        match self.prefs.set_auto_update_enabled(active) {
            Ok(()) => tracing::info!(enabled = active, "Automatic updates toggled"),
            Err(e) => tracing::warn!(enabled = active, "Could not save auto-update preference: {:#}", e),
        }
    }
}
