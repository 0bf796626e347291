//! Next stable version computation from tag history.
use clap::ValueEnum;
use log::*;
use semver::{BuildMetadata, Prerelease, Version};
use serde::Deserialize;
use std::fmt::Display;

use crate::repo::TagRef;

/// Which semantic version component a stable release increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    Patch,
    Minor,
}

impl Display for BumpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BumpType::Patch => f.write_str("patch"),
            BumpType::Minor => f.write_str("minor"),
        }
    }
}

impl BumpType {
    pub fn apply(&self, current: &Version) -> Version {
        let mut next = match self {
            BumpType::Patch => {
                Version::new(current.major, current.minor, current.patch + 1)
            }
            BumpType::Minor => {
                Version::new(current.major, current.minor + 1, 0)
            }
        };
        next.pre = Prerelease::EMPTY;
        next.build = BuildMetadata::EMPTY;
        next
    }
}

/// Tags and commit for the release being cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub previous_tag: String,
    pub next_tag: String,
    pub sha: String,
}

/// Parse a prefixed stable SemVer tag name (e.g. `v1.2.3`). Prereleases and
/// names without the prefix yield `None`.
pub fn parse_semver_tag(name: &str, prefix: &str) -> Option<Version> {
    let stripped = name.strip_prefix(prefix)?;

    if !stripped.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    match Version::parse(stripped) {
        Ok(version) if version.pre.is_empty() => Some(version),
        _ => None,
    }
}

/// Highest stable version among the tags, `0.0.0` when there are none.
pub fn current_version(tags: &[TagRef], prefix: &str) -> Version {
    tags.iter()
        .filter_map(|t| parse_semver_tag(&t.name, prefix))
        .max()
        .unwrap_or_else(|| {
            info!("no {prefix}* tags found: starting from 0.0.0");
            Version::new(0, 0, 0)
        })
}

/// Compute previous and next tags for a stable release at `sha`.
pub fn plan_release(
    tags: &[TagRef],
    prefix: &str,
    bump: BumpType,
    sha: &str,
) -> ReleasePlan {
    let current = current_version(tags, prefix);
    let next = bump.apply(&current);

    let plan = ReleasePlan {
        previous_tag: format!("{prefix}{current}"),
        next_tag: format!("{prefix}{next}"),
        sha: sha.to_string(),
    };

    info!(
        "{bump} release: previous tag {}, next tag {}",
        plan.previous_tag, plan.next_tag
    );

    plan
}
