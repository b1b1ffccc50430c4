// src/model.rs

use regex::Regex;
use semver::Version;
use std::sync::OnceLock;

/// Notes published with a single release.
#[derive(Debug, PartialEq, Clone)]
pub struct ReleaseNotes {
    pub version: String,
    pub date: Option<String>,
    /// Markdown text.
    pub notes: String,
}

/// An available update, as handed to the dialog.
///
/// Shared as `Rc<UpdateInfo>` between whoever produced it and the UI.
/// Nothing mutates it once built.
#[derive(Debug, PartialEq, Clone)]
pub struct UpdateInfo {
    pub version: String,
    pub title: Option<String>,
    pub download_url: Option<String>,
    /// Base URL that `#123` issue references in the notes link to.
    pub issue_url: Option<String>,
    /// Newest first.
    pub releases: Vec<ReleaseNotes>,
}

impl UpdateInfo {
    pub fn new(version: &str, releases: Vec<ReleaseNotes>) -> Self {
        Self {
            version: version.to_string(),
            title: None,
            download_url: None,
            issue_url: None,
            releases,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_download_url(mut self, url: &str) -> Self {
        self.download_url = Some(url.to_string());
        self
    }

    pub fn with_issue_url(mut self, url: &str) -> Self {
        self.issue_url = Some(url.to_string());
        self
    }

    /// Release channel taken from the pre-release part of the version
    /// ("beta" for 1.11.0-beta.2). Empty for stable or unparsable versions.
    pub fn channel(&self) -> String {
        match Version::parse(&self.version) {
            Ok(v) if !v.pre.is_empty() => v
                .pre
                .as_str()
                .split('.')
                .next()
                .unwrap_or("")
                .to_string(),
            _ => String::new(),
        }
    }

    pub fn heading(&self) -> String {
        match &self.title {
            Some(title) if !title.trim().is_empty() => title.clone(),
            _ => format!("Version {} is available", self.version),
        }
    }
}

fn tag_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_([0-9])").expect("valid regex"))
}

fn build_increment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-[0-9]+").expect("valid regex"))
}

/// Turns a release tag into a version string.
///
/// v1_11_0 -> 1.11.0, v1_11_0-beta_1 -> 1.11.0-beta.1, v1_11_0-3 -> 1.11.0
///
/// Strings that already are semver (2.0.0-1) and anything that does not
/// look like a tag are returned unchanged.
pub fn tag_to_version(tag: &str) -> String {
    if Version::parse(tag).is_ok() || !(tag.starts_with('v') || tag.contains('_')) {
        return tag.to_string();
    }

    let dotted = tag_separator().replace_all(tag, ".$1");
    let trimmed = build_increment().replace_all(&dotted, "");
    let replaced = trimmed.replace('_', "-");
    replaced.strip_prefix('v').unwrap_or(&replaced).to_string()
}
