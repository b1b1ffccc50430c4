// src/news.rs

use crate::model::{tag_to_version, ReleaseNotes, UpdateInfo};
use anyhow::{Context, Result};
use semver::Version;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One entry of the release news file.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsRelease {
    pub version: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub changes: Vec<String>,
}

impl NewsRelease {
    /// Release notes as markdown. A `changes` list is appended as bullets.
    pub fn markdown(&self) -> String {
        let mut text = self
            .notes
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .to_string();

        if !self.changes.is_empty() {
            if !text.is_empty() {
                text.push_str("\n\n");
            }
            let items: Vec<String> = self
                .changes
                .iter()
                .map(|c| format!("- {}", c.trim()))
                .collect();
            text.push_str(&items.join("\n"));
        }
        text
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct News {
    /// Issue tracker base, e.g. https://github.com/org/project/issues/
    #[serde(default)]
    pub issue_url: Option<String>,
    #[serde(default)]
    pub releases: Vec<NewsRelease>,
}

impl News {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("Release news is not valid JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read release news {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Builds the update offered to a user running `current`.
    ///
    /// Every release newer than `current` contributes its notes, newest
    /// first. `Ok(None)` means the user is up to date.
    pub fn update_since(&self, current: &str) -> Result<Option<UpdateInfo>> {
        let current = Version::parse(&tag_to_version(current))
            .with_context(|| format!("Invalid current version `{}`", current))?;

        let mut newer: Vec<(Version, &NewsRelease)> = Vec::new();
        for release in &self.releases {
            match Version::parse(&tag_to_version(&release.version)) {
                Ok(v) if v > current => newer.push((v, release)),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(version = %release.version, "Skipping release: {}", e);
                }
            }
        }

        if newer.is_empty() {
            tracing::debug!(%current, "No newer release in news");
            return Ok(None);
        }

        newer.sort_by(|a, b| b.0.cmp(&a.0));
        // the same release may be listed as a tag and as a version
        newer.dedup_by(|a, b| a.0 == b.0);

        let (latest_version, latest) = &newer[0];
        let releases = newer
            .iter()
            .map(|(v, r)| ReleaseNotes {
                version: v.to_string(),
                date: r.date.clone(),
                notes: r.markdown(),
            })
            .collect();

        let mut info = UpdateInfo::new(&latest_version.to_string(), releases);
        if let Some(title) = &latest.title {
            info = info.with_title(title);
        }
        if let Some(url) = &latest.url {
            info = info.with_download_url(url);
        }
        if let Some(url) = &self.issue_url {
            info = info.with_issue_url(url);
        }

        tracing::info!(%current, latest = %latest_version, count = newer.len(), "Update available");
        Ok(Some(info))
    }
}
