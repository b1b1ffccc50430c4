// src/preferences.rs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the auto-update choice is kept.
///
/// Called from the GTK main thread only, hence `&self` with interior
/// mutability in the implementations.
pub trait AutoUpdatePreference {
    fn auto_update_enabled(&self) -> bool;
    fn set_auto_update_enabled(&self, enabled: bool) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSection {
    #[serde(default = "default_auto")]
    pub auto: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_version: Option<String>,
}

fn default_auto() -> bool {
    true
}

impl Default for UpdateSection {
    fn default() -> Self {
        Self {
            auto: default_auto(),
            skipped_version: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub update: UpdateSection,
}

/// Preferences stored as TOML in the user's config directory.
pub struct TomlPreferenceStore {
    path: PathBuf,
    current: RefCell<Preferences>,
}

impl TomlPreferenceStore {
    /// `<config_dir>/autoupdater/preferences.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("autoupdater").join("preferences.toml"))
    }

    pub fn open_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Ok(Self::open(&path)),
            None => bail!("No configuration directory on this system"),
        }
    }

    /// Reads the file at `path`. Missing or unreadable content gives defaults.
    pub fn open(path: &Path) -> Self {
        let current = match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Preferences>(&content) {
                Ok(prefs) => prefs,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Preferences are corrupt, using defaults: {}", e);
                    Preferences::default()
                }
            },
            Err(_) => Preferences::default(),
        };

        Self {
            path: path.to_path_buf(),
            current: RefCell::new(current),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn preferences(&self) -> Preferences {
        self.current.borrow().clone()
    }

    pub fn skipped_version(&self) -> Option<String> {
        self.current.borrow().update.skipped_version.clone()
    }

    pub fn skip_version(&self, version: &str) -> Result<()> {
        self.update(|prefs| prefs.update.skipped_version = Some(version.to_string()))
    }

    fn update(&self, change: impl FnOnce(&mut Preferences)) -> Result<()> {
        let mut next = self.current.borrow().clone();
        change(&mut next);
        self.save(&next)?;
        *self.current.borrow_mut() = next;
        Ok(())
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Could not create {}", dir.display()))?;
        }
        let content = toml::to_string_pretty(prefs).context("Could not encode preferences")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Could not write {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }
}

impl AutoUpdatePreference for TomlPreferenceStore {
    fn auto_update_enabled(&self) -> bool {
        self.current.borrow().update.auto
    }

    fn set_auto_update_enabled(&self, enabled: bool) -> Result<()> {
        self.update(|prefs| prefs.update.auto = enabled)
    }
}

/// In-memory store. Records every write; can be told to refuse writes.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    enabled: Cell<bool>,
    fail_writes: Cell<bool>,
    writes: RefCell<Vec<bool>>,
}

impl MemoryPreferenceStore {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Cell::new(enabled),
            ..Default::default()
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn writes(&self) -> Vec<bool> {
        self.writes.borrow().clone()
    }
}

impl AutoUpdatePreference for MemoryPreferenceStore {
    fn auto_update_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn set_auto_update_enabled(&self, enabled: bool) -> Result<()> {
        if self.fail_writes.get() {
            bail!("Preference store is read-only");
        }
        self.writes.borrow_mut().push(enabled);
        self.enabled.set(enabled);
        Ok(())
    }
}
