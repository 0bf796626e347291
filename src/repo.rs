//! Local git history: tags and commit ranges read with `git2`.
use git2::{Oid, Sort};
use log::*;
use std::path::Path;

use crate::error::Result;

/// A tag reference resolved to the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    pub sha: String,
}

/// Commit metadata needed for changelog rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCommit {
    pub id: String,
    pub short_id: String,
    pub message: String,
    pub timestamp: i64,
    pub merge_commit: bool,
}

/// Read-only view of a local repository checkout.
pub struct Repository {
    repo: git2::Repository,
}

impl Repository {
    /// Open the repository containing `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = git2::Repository::discover(path)?;
        debug!("opened repository at {}", repo.path().display());
        Ok(Self { repo })
    }

    /// Sha of the commit currently checked out.
    pub fn head_sha(&self) -> Result<String> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    /// All tags in the repository, peeled to commits. Tags pointing at
    /// non-commit objects are skipped.
    pub fn tags(&self) -> Result<Vec<TagRef>> {
        let mut tags = vec![];

        for reference in self.repo.references()?.filter_map(|r| r.ok()) {
            if !reference.is_tag() {
                continue;
            }

            let Some(name) =
                reference.name().and_then(|n| n.strip_prefix("refs/tags/"))
            else {
                continue;
            };

            match reference.peel_to_commit() {
                Ok(commit) => tags.push(TagRef {
                    name: name.to_string(),
                    sha: commit.id().to_string(),
                }),
                Err(err) => {
                    debug!("skipping tag {name}: {err}");
                }
            }
        }

        Ok(tags)
    }

    /// Commits reachable from `to` but not from the parents of `since`,
    /// oldest first. This is the `since^..to` range; when `since` is `None`
    /// the whole history of `to` is returned.
    pub fn commits_since_parent_of(
        &self,
        since: Option<&str>,
        to: &str,
    ) -> Result<Vec<RepoCommit>> {
        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        walk.push(Oid::from_str(to)?)?;

        if let Some(since) = since {
            let start = self.repo.find_commit(Oid::from_str(since)?)?;
            for parent in start.parent_ids() {
                walk.hide(parent)?;
            }
        }

        let mut commits = vec![];

        for oid in walk {
            let commit = self.repo.find_commit(oid?)?;
            let id = commit.id().to_string();

            commits.push(RepoCommit {
                short_id: id.chars().take(7).collect(),
                id,
                message: commit.message().unwrap_or_default().to_string(),
                timestamp: commit.time().seconds(),
                merge_commit: commit.parent_count() > 1,
            });
        }

        debug!("found {} commits in range", commits.len());

        Ok(commits)
    }
}
