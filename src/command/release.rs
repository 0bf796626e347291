//! Stable release command implementation.
use chrono::Utc;
use log::*;
use secrecy::ExposeSecret;

use crate::{
    actions,
    cli::ReleaseArgs,
    config::Config,
    forge::{github::Github, manager::ForgeManager},
    release::{self, ReleaseOutcome, ReleaseParams},
    repo::Repository,
    result::Result,
};

/// Execute the release: resolve inputs, run every release step and expose
/// the computed tags as step outputs.
pub async fn execute(args: &ReleaseArgs, config: &Config) -> Result<()> {
    match connect_and_run(args, config).await {
        Ok(outcome) => {
            actions::set_output("previous_tag", &outcome.plan.previous_tag)?;
            actions::set_output("next_tag", &outcome.plan.next_tag)?;
            let plan = &outcome.plan;
            info!(
                "released {} (previous {}) at {}",
                plan.next_tag, plan.previous_tag, plan.sha
            );
            Ok(())
        }
        Err(err) => {
            actions::annotate_error(&err.to_string());
            Err(err)
        }
    }
}

/// Build the GitHub client and open the local checkout, then run.
async fn connect_and_run(
    args: &ReleaseArgs,
    config: &Config,
) -> Result<ReleaseOutcome> {
    let remote_config = args.get_remote()?;
    actions::mask(remote_config.token.expose_secret());

    let forge = Github::new(remote_config)?;
    let forge_manager = ForgeManager::new(Box::new(forge));
    let repo = Repository::open(&args.repo_path)?;

    run(args, config, &forge_manager, &repo).await
}

/// Resolve workflow inputs and cut the release.
pub async fn run(
    args: &ReleaseArgs,
    config: &Config,
    forge_manager: &ForgeManager,
    repo: &Repository,
) -> Result<ReleaseOutcome> {
    let git_ref = args.resolve_git_ref()?;
    let actor = args.resolve_actor()?;
    let sha = args.resolve_sha();

    let params = ReleaseParams {
        git_ref: &git_ref,
        actor: &actor,
        bump: args.bump_type,
        sha: sha.as_deref(),
        artifact_dir: &args.artifact_dir,
        released_at: Utc::now().timestamp(),
    };

    let outcome =
        release::cut_release(forge_manager, repo, &config.release, &params)
            .await?;

    Ok(outcome)
}
