//! Release check against the published tag list.

use std::cmp::Ordering;

use tracing::debug;

use crate::api::TagInfo;
use crate::core::chat_stream::summarize_api_error;
use crate::core::constants::RELEASE_TAGS_URL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// A newer release exists; carries the tag name as published.
    UpdateAvailable(String),
    UpToDate,
    CheckFailed(String),
}

impl UpdateStatus {
    /// One-line status text for display.
    pub fn summary(&self, current: &str) -> String {
        match self {
            UpdateStatus::UpdateAvailable(latest) => {
                format!("Update available: {latest} (you have {current})")
            }
            UpdateStatus::UpToDate => format!("You are running the latest version ({current})"),
            UpdateStatus::CheckFailed(reason) => format!("Update check failed: {reason}"),
        }
    }
}

/// The running version as reported by Cargo.
pub fn current_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// One dot-separated part of a pre-release label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Numeric(u64),
    Alpha(String),
}

impl Ord for Identifier {
    /// Numeric identifiers sort below alphanumeric ones.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(l), Identifier::Numeric(r)) => l.cmp(r),
            (Identifier::Numeric(_), Identifier::Alpha(_)) => Ordering::Less,
            (Identifier::Alpha(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::Alpha(l), Identifier::Alpha(r)) => l.cmp(r),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A release version ordered by semantic-version precedence.
///
/// Missing core components count as zero, so `1.0` equals `1.0.0`.
#[derive(Debug, Clone)]
pub struct Version {
    pub core: Vec<u64>,
    pub pre: Vec<Identifier>,
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.core.len().max(other.core.len());
        for i in 0..len {
            let l = self.core.get(i).copied().unwrap_or(0);
            let r = other.core.get(i).copied().unwrap_or(0);
            match l.cmp(&r) {
                Ordering::Equal => continue,
                other => return other,
            }
        }

        // A pre-release sorts below the release it leads up to.
        match (self.pre.is_empty(), other.pre.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.pre.cmp(&other.pre),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

/// Parse a tag such as `v1.0.4`, `1.2`, `1.0.4-rc.1` or `1.0.4+build.7`.
///
/// A leading `v` is stripped and build metadata after `+` is ignored.
/// Returns `None` if a core component is not a number or a pre-release
/// identifier is empty.
pub fn parse_version(tag: &str) -> Option<Version> {
    let trimmed = tag.trim();
    let without_prefix = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    let without_build = without_prefix
        .split_once('+')
        .map_or(without_prefix, |(version, _)| version);
    let (core_text, pre_text) = match without_build.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (without_build, None),
    };
    if core_text.is_empty() {
        return None;
    }

    let core = core_text
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    let pre = match pre_text {
        Some(text) => text
            .split('.')
            .map(|part| {
                if part.is_empty() {
                    None
                } else if part.bytes().all(|b| b.is_ascii_digit()) {
                    part.parse::<u64>().ok().map(Identifier::Numeric)
                } else {
                    Some(Identifier::Alpha(part.to_string()))
                }
            })
            .collect::<Option<Vec<_>>>()?,
        None => Vec::new(),
    };

    Some(Version { core, pre })
}

/// Decide the status from an already fetched tag list.
pub fn evaluate_tags(tags: &[TagInfo], current: &str) -> UpdateStatus {
    let Some(latest) = tags.first() else {
        return UpdateStatus::CheckFailed("no releases have been published".to_string());
    };

    let Some(latest_version) = parse_version(&latest.name) else {
        return UpdateStatus::CheckFailed(format!(
            "latest tag '{}' is not a version",
            latest.name
        ));
    };
    let Some(current_version) = parse_version(current) else {
        return UpdateStatus::CheckFailed(format!("current version '{current}' is not a version"));
    };

    match latest_version.cmp(&current_version) {
        Ordering::Greater => UpdateStatus::UpdateAvailable(latest.name.clone()),
        Ordering::Equal | Ordering::Less => UpdateStatus::UpToDate,
    }
}

pub async fn check_update(client: &reqwest::Client, current: &str) -> UpdateStatus {
    check_update_at(client, RELEASE_TAGS_URL, current).await
}

/// Fetch the tag list from `url` and compare its first entry to `current`.
///
/// Every failure is folded into [`UpdateStatus::CheckFailed`].
pub async fn check_update_at(client: &reqwest::Client, url: &str, current: &str) -> UpdateStatus {
    debug!(url, current, "checking for updates");
    let tags = match fetch_tags(client, url).await {
        Ok(tags) => tags,
        Err(reason) => {
            debug!(%reason, "update check failed");
            return UpdateStatus::CheckFailed(reason);
        }
    };
    evaluate_tags(&tags, current)
}

async fn fetch_tags(client: &reqwest::Client, url: &str) -> Result<Vec<TagInfo>, String> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .header(
            "User-Agent",
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
        )
        .send()
        .await
        .map_err(|err| err.to_string())?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(format!(
            "HTTP {}: {}",
            status.as_u16(),
            summarize_api_error(&error_text)
        ));
    }

    response
        .json::<Vec<TagInfo>>()
        .await
        .map_err(|err| format!("invalid tag list: {err}"))
}
