//! Stable release cutting from a CalVer-tagged commit.
//!
//! Steps run strictly in order and stop at the first failure:
//!
//! 1. validate the trigger ref is a CalVer tag
//! 2. authorize the actor by team membership
//! 3. compute previous and next SemVer tags
//! 4. create the next tag and move the floating `latest` tag
//! 5. render release notes and write them to the artifact directory
//!
//! Nothing is rolled back when a later step fails after tags were created.
use log::*;
use std::path::{Path, PathBuf};

use crate::{
    config::ReleaseConfig,
    error::{CiError, Result},
    forge::manager::ForgeManager,
    repo::Repository,
};

pub mod authorize;
pub mod calver;
pub mod changelog;
pub mod version;

use calver::CalVerTag;
use changelog::ChangelogRequest;
use version::{BumpType, ReleasePlan};

/// Inputs for a single release run.
#[derive(Debug, Clone)]
pub struct ReleaseParams<'a> {
    pub git_ref: &'a str,
    pub actor: &'a str,
    pub bump: BumpType,
    /// Commit to tag; defaults to the checked out `HEAD`.
    pub sha: Option<&'a str>,
    pub artifact_dir: &'a Path,
    pub released_at: i64,
}

/// Result of a completed release run.
#[derive(Debug, Clone)]
pub struct ReleaseOutcome {
    pub calver: CalVerTag,
    pub plan: ReleasePlan,
    pub notes_path: PathBuf,
}

fn resolve_org(config: &ReleaseConfig, forge: &ForgeManager) -> String {
    if config.org.is_empty() {
        return forge.remote_config().owner.clone();
    }
    config.org.clone()
}

/// Run every release step against `forge` and the local `repo`.
pub async fn cut_release(
    forge: &ForgeManager,
    repo: &Repository,
    config: &ReleaseConfig,
    params: &ReleaseParams<'_>,
) -> Result<ReleaseOutcome> {
    let calver = calver::validate_trigger_ref(params.git_ref)?;
    info!("triggered by CalVer tag {calver}");

    let org = resolve_org(config, forge);
    authorize::authorize_actor(forge, &org, &config.teams, params.actor)
        .await?;

    let sha = match params.sha {
        Some(sha) if !sha.is_empty() => sha.to_string(),
        _ => repo.head_sha()?,
    };

    let tags = repo.tags()?;
    let plan =
        version::plan_release(&tags, &config.tag_prefix, params.bump, &sha);

    forge.create_tag_ref(&plan.next_tag, &plan.sha).await?;
    forge.update_tag_ref(&config.latest_tag, &plan.sha).await?;

    let notes = changelog::generate(
        repo,
        &ChangelogRequest {
            previous_tag: &plan.previous_tag,
            next_tag: &plan.next_tag,
            sha: &plan.sha,
            tag_prefix: &config.tag_prefix,
            body: &config.changelog_body,
            commit_link_base_url: &forge.remote_config().commit_link_base_url,
            released_at: params.released_at,
        },
    )?;

    let notes_path = publish_notes(params.artifact_dir, config, &notes).await?;

    Ok(ReleaseOutcome {
        calver,
        plan,
        notes_path,
    })
}

/// Write the release notes artifact and confirm it exists afterwards.
async fn publish_notes(
    artifact_dir: &Path,
    config: &ReleaseConfig,
    notes: &str,
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(artifact_dir).await?;

    let notes_path = artifact_dir.join(&config.notes_file);
    tokio::fs::write(&notes_path, format!("{notes}\n")).await?;

    if !tokio::fs::try_exists(&notes_path).await? {
        return Err(CiError::MissingArtifact(
            notes_path.display().to_string(),
        ));
    }

    info!("release notes written to {}", notes_path.display());

    Ok(notes_path)
}
