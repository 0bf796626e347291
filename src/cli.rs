//! CLI argument parsing and GitHub remote configuration.
use clap::{ArgGroup, Parser, Subcommand};
use color_eyre::eyre::{ContextCompat, eyre};
use git_url_parse::GitUrl;
use secrecy::SecretString;
use std::{env, path::PathBuf};

use crate::{
    config::DEFAULT_CONFIG_FILE, forge::config::RemoteConfig,
    release::version::BumpType, result::Result,
};

pub const DEFAULT_VARIABLES_FILE: &str = "variables.json";

/// Global CLI arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    /// Path to the TOML configuration file. Defaults apply when missing.
    pub config: PathBuf,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available operations.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a payments confirm response for the Sofort deprecation case.
    ValidateConfirm(ValidateArgs),

    /// Tag a stable SemVer release from a CalVer-tagged commit.
    CutRelease(ReleaseArgs),
}

#[derive(clap::Args, Debug, Clone)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["response", "base_url"])
))]
pub struct ValidateArgs {
    #[arg(long)]
    /// Captured response fixture ({ status, headers, body }).
    pub response: Option<PathBuf>,

    #[arg(long, requires = "api_key")]
    /// Base URL of a running payments API to call live.
    pub base_url: Option<String>,

    #[arg(long)]
    /// Payment to confirm. Falls back to the stored payment_id variable.
    pub payment_id: Option<String>,

    #[arg(long)]
    /// Merchant API key sent in the api-key header.
    pub api_key: Option<String>,

    #[arg(long)]
    /// JSON file with the confirm request body.
    pub payload: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_VARIABLES_FILE)]
    /// Collection variables file read before and written after validation.
    pub variables: PathBuf,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ReleaseArgs {
    #[arg(long, value_enum)]
    /// Which version component to increment.
    pub bump_type: BumpType,

    #[arg(long, default_value = "")]
    /// User that triggered the workflow. Falls back to GITHUB_ACTOR env var.
    pub actor: String,

    #[arg(long, default_value = "")]
    /// Triggering ref (refs/tags/YYYY.MM.DD). Falls back to GITHUB_REF.
    pub git_ref: String,

    #[arg(long, default_value = "")]
    /// Commit to tag. Falls back to GITHUB_SHA, then the local HEAD.
    pub sha: String,

    #[arg(long, default_value = "")]
    /// GitHub repository URL (https://github.com/owner/repo). Falls back to
    /// GITHUB_REPOSITORY on github.com.
    pub github_repo: String,

    #[arg(long, default_value = "")]
    /// GitHub token. Falls back to GITHUB_TOKEN env var.
    pub github_token: String,

    #[arg(long, default_value = ".")]
    /// Local checkout used to read tags and commits.
    pub repo_path: PathBuf,

    #[arg(long, default_value = ".")]
    /// Directory the release notes are written to.
    pub artifact_dir: PathBuf,

    #[arg(long, default_value_t = false)]
    /// Log tag mutations instead of performing them.
    pub dry_run: bool,
}

/// Use `value` when set, otherwise the named environment variable.
fn arg_or_env(value: &str, var: &str) -> Option<String> {
    if !value.is_empty() {
        return Some(value.to_string());
    }

    env::var(var).ok().filter(|v| !v.is_empty())
}

impl ReleaseArgs {
    pub fn resolve_actor(&self) -> Result<String> {
        arg_or_env(&self.actor, "GITHUB_ACTOR")
            .ok_or(eyre!("must set --actor or GITHUB_ACTOR"))
    }

    pub fn resolve_git_ref(&self) -> Result<String> {
        arg_or_env(&self.git_ref, "GITHUB_REF")
            .ok_or(eyre!("must set --git-ref or GITHUB_REF"))
    }

    pub fn resolve_sha(&self) -> Option<String> {
        arg_or_env(&self.sha, "GITHUB_SHA")
    }

    /// Repository URL from `--github-repo` or `GITHUB_REPOSITORY`.
    pub fn repo_url(&self) -> Result<String> {
        if !self.github_repo.is_empty() {
            return Ok(self.github_repo.clone());
        }

        env::var("GITHUB_REPOSITORY")
            .ok()
            .filter(|v| !v.is_empty())
            .map(|path| format!("https://github.com/{path}"))
            .ok_or(eyre!("must set --github-repo or GITHUB_REPOSITORY"))
    }

    /// Configure the remote repository connection.
    pub fn get_remote(&self) -> Result<RemoteConfig> {
        let token = arg_or_env(&self.github_token, "GITHUB_TOKEN")
            .unwrap_or_default();
        get_github_remote(&self.repo_url()?, &token, self.dry_run)
    }
}

/// Validate repository URL uses HTTP or HTTPS scheme.
fn validate_scheme(scheme: git_url_parse::Scheme) -> Result<()> {
    match scheme {
        git_url_parse::Scheme::Http => Ok(()),
        git_url_parse::Scheme::Https => Ok(()),
        _ => Err(eyre!(
            "only http and https schemes are supported for repo urls"
        )),
    }
}

/// Configure GitHub remote with URL parsing and token resolution.
pub fn get_github_remote(
    github_repo: &str,
    github_token: &str,
    dry_run: bool,
) -> Result<RemoteConfig> {
    let parsed = GitUrl::parse(github_repo)?;

    validate_scheme(parsed.scheme)?;

    let mut token = github_token.to_string();

    if token.is_empty()
        && let Some(parsed_token) = parsed.token
    {
        token = parsed_token;
    }

    if token.is_empty() {
        return Err(eyre!("must set github token"));
    }

    let host = parsed
        .host
        .ok_or(eyre!("unable to parse host from github repo"))?;

    let owner = parsed
        .owner
        .ok_or(eyre!("unable to parse owner from github repo"))?;

    let project_path = parsed
        .path
        .strip_prefix("/")
        .wrap_err("failed to process project path")?
        .to_string();

    let commit_link_base_url = format!(
        "{}://{}/{}/{}/commit",
        parsed.scheme, host, owner, parsed.name
    );

    Ok(RemoteConfig {
        host,
        scheme: parsed.scheme.to_string(),
        owner,
        repo: parsed.name,
        path: project_path,
        token: SecretString::from(token),
        commit_link_base_url,
        dry_run,
    })
}
