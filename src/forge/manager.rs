//! Manager that wraps forge implementations
use log::*;

use crate::{
    error::Result,
    forge::{config::RemoteConfig, traits::Forge, types::Membership},
};

/// Wraps a [`Forge`] so that mutating calls honor dry-run mode.
pub struct ForgeManager {
    forge: Box<dyn Forge>,
    remote_config: RemoteConfig,
}

impl ForgeManager {
    pub fn new(forge: Box<dyn Forge>) -> Self {
        let remote_config = forge.remote_config();
        Self {
            forge,
            remote_config,
        }
    }

    pub fn remote_config(&self) -> &RemoteConfig {
        &self.remote_config
    }

    pub fn dry_run(&self) -> bool {
        self.remote_config.dry_run
    }

    pub async fn team_membership(
        &self,
        org: &str,
        team: &str,
        username: &str,
    ) -> Result<Membership> {
        debug!("checking membership of {username} in {org}/{team}");
        self.forge.team_membership(org, team, username).await
    }

    pub async fn create_tag_ref(&self, tag: &str, sha: &str) -> Result<()> {
        if self.dry_run() {
            warn!("dry_run: would create tag: tag: {tag}, sha: {sha}");
            return Ok(());
        }

        info!("creating tag: tag: {tag}, sha: {sha}");
        self.forge.create_tag_ref(tag, sha).await
    }

    pub async fn update_tag_ref(&self, tag: &str, sha: &str) -> Result<()> {
        if self.dry_run() {
            warn!("dry_run: would update tag: tag: {tag}, sha: {sha}");
            return Ok(());
        }

        info!("updating tag: tag: {tag}, sha: {sha}");
        self.forge.update_tag_ref(tag, sha).await
    }
}
