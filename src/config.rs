//! Configuration loading and parsing for `hyperswitch-ci.toml` files.
//!
//! Every field has a default matching the behavior of the hyperswitch
//! repository, so the file is optional.
use log::*;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::{
    error::{CiError, Result},
    release::changelog::DEFAULT_BODY,
};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "hyperswitch-ci.toml";
/// Teams whose members may cut a stable release.
pub const DEFAULT_TEAMS: [&str; 2] =
    ["hyperswitch-admins", "hyperswitch-maintainers"];
/// Floating tag repointed at every stable release.
pub const DEFAULT_LATEST_TAG: &str = "latest";
/// Prefix for semantic version tags.
pub const DEFAULT_TAG_PREFIX: &str = "v";
/// Name of the published changelog artifact.
pub const DEFAULT_NOTES_FILE: &str = "release-notes.md";

/// Sofort deprecation notice returned by the confirm endpoint.
pub const SOFORT_DEPRECATION_MESSAGE: &str = "Payment method type not supported: Sofort is deprecated and is no longer available for new integrations. Please use a different payment method type";

/// Release orchestration settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Organization owning the authorization teams. Falls back to the
    /// repository owner when empty.
    pub org: String,
    /// Team slugs checked for membership of the triggering actor.
    pub teams: Vec<String>,
    /// Floating tag updated to the release commit.
    pub latest_tag: String,
    /// Prefix marking semantic version tags (e.g. "v").
    pub tag_prefix: String,
    /// Artifact filename for generated release notes.
    pub notes_file: String,
    /// Tera template rendering a single release section.
    pub changelog_body: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            org: String::new(),
            teams: DEFAULT_TEAMS.iter().map(|t| t.to_string()).collect(),
            latest_tag: DEFAULT_LATEST_TAG.into(),
            tag_prefix: DEFAULT_TAG_PREFIX.into(),
            notes_file: DEFAULT_NOTES_FILE.into(),
            changelog_body: DEFAULT_BODY.into(),
        }
    }
}

/// Literal values asserted against the confirm response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfirmExpectations {
    pub status: String,
    pub payment_method_type: String,
    pub error_code: String,
    pub error_message: String,
    pub connector: String,
}

impl Default for ConfirmExpectations {
    fn default() -> Self {
        Self {
            status: "failed".into(),
            payment_method_type: "sofort".into(),
            error_code: "payment_method_not_available".into(),
            error_message: SOFORT_DEPRECATION_MESSAGE.into(),
            connector: "stripe".into(),
        }
    }
}

/// Root configuration structure for `hyperswitch-ci.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub release: ReleaseConfig,
    #[serde(rename = "validator")]
    pub expectations: ConfirmExpectations,
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(
                "no configuration found at {}: using default",
                path.display()
            );
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;

        debug!("loaded configuration: {:#?}", config);

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.release.teams.iter().all(|t| t.trim().is_empty()) {
            return Err(CiError::invalid_config(
                "release.teams must name at least one team",
            ));
        }

        if self.release.latest_tag.trim().is_empty() {
            return Err(CiError::invalid_config(
                "release.latest_tag must not be empty",
            ));
        }

        if self.release.notes_file.trim().is_empty() {
            return Err(CiError::invalid_config(
                "release.notes_file must not be empty",
            ));
        }

        Ok(())
    }
}
