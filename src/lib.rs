// src/lib.rs

pub mod content;
pub mod controller;
pub mod dialog;
pub mod model;
pub mod news;
pub mod notes;
pub mod preferences;

pub use content::NotesContent;
pub use controller::{AutoUpdateController, UpdateChoice};
pub use dialog::AutoUpdateDialog;
pub use model::{ReleaseNotes, UpdateInfo};
