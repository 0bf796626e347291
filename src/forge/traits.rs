//! Traits related to remote git forges
use async_trait::async_trait;

use crate::{
    error::Result,
    forge::{config::RemoteConfig, types::Membership},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    fn remote_config(&self) -> RemoteConfig;

    /// Look up whether `username` belongs to `team` in `org`.
    async fn team_membership(
        &self,
        org: &str,
        team: &str,
        username: &str,
    ) -> Result<Membership>;

    /// Create the lightweight ref `refs/tags/{tag}` pointing at `sha`.
    async fn create_tag_ref(&self, tag: &str, sha: &str) -> Result<()>;

    /// Force `refs/tags/{tag}` to point at `sha`, creating it if missing.
    async fn update_tag_ref(&self, tag: &str, sha: &str) -> Result<()>;
}
