//! Release notes generated from conventional commits between two SemVer
//! tags.
//!
//! Only tags matching the SemVer pattern act as release boundaries, so the
//! CalVer tags cut on the same history never split a section. Notes are
//! rendered for the `previous_tag^..sha` range and then truncated at the
//! previous tag's own heading, leaving only the new release.
use git_conventional::Commit as ConventionalCommit;
use log::*;
use regex::Regex;
use serde::Serialize;
use std::{collections::HashMap, sync::LazyLock};

use crate::{
    error::Result,
    release::version::parse_semver_tag,
    repo::{RepoCommit, Repository},
};

/// Default release section template. The heading carries the release date.
pub const DEFAULT_BODY: &str = r#"## {{ version }} ({{ timestamp | date(format="%Y-%m-%d") }})
{% for group in groups %}
### {{ group.title }}
{% for commit in group.commits %}
- {% if commit.scope %}**{{ commit.scope }}:** {% endif %}{% if commit.breaking %}[**BREAKING**] {% endif %}{{ commit.message }}{% if commit.link %} ([`{{ commit.short_id }}`]({{ commit.link }})){% endif %}
{%- endfor %}
{% endfor %}
"#;

/// Matches 3 or more consecutive new lines
static EXTRA_NEW_LINES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Commits produced by a previous release run.
static RELEASE_COMMIT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)chore\(version\)").unwrap());

/// Changelog groups in display order.
const GROUPS: [(&str, &str); 10] = [
    ("feat", "Features"),
    ("fix", "Bug Fixes"),
    ("perf", "Performance"),
    ("refactor", "Refactors"),
    ("test", "Testing"),
    ("docs", "Documentation"),
    ("chore", "Miscellaneous Tasks"),
    ("build", "Build System / Dependencies"),
    ("ci", "Continuous Integration"),
    ("revert", "Revert"),
];

const MISC_GROUP: &str = "Miscellaneous Tasks";

#[derive(Debug, Clone, Serialize)]
struct NoteCommit {
    id: String,
    short_id: String,
    scope: Option<String>,
    message: String,
    breaking: bool,
    link: Option<String>,
    #[serde(skip)]
    group: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct NoteGroup {
    title: &'static str,
    commits: Vec<NoteCommit>,
}

#[derive(Debug, Clone, Serialize)]
struct ReleaseSection {
    version: String,
    timestamp: i64,
    groups: Vec<NoteGroup>,
}

/// Inputs for one changelog generation.
#[derive(Debug, Clone)]
pub struct ChangelogRequest<'a> {
    pub previous_tag: &'a str,
    pub next_tag: &'a str,
    /// Commit the new release points at.
    pub sha: &'a str,
    /// Prefix identifying SemVer tags.
    pub tag_prefix: &'a str,
    /// Tera template rendering one release section.
    pub body: &'a str,
    /// Base URL commit ids are appended to; empty disables links.
    pub commit_link_base_url: &'a str,
    /// Timestamp used for the new release heading.
    pub released_at: i64,
}

fn group_title(commit_type: &str) -> &'static str {
    GROUPS
        .iter()
        .find(|(kind, _)| kind.eq_ignore_ascii_case(commit_type))
        .map(|(_, title)| *title)
        .unwrap_or(MISC_GROUP)
}

fn parse_commit(commit: &RepoCommit, link_base: &str) -> Option<NoteCommit> {
    if commit.merge_commit {
        debug!("skipping merge commit {}", commit.short_id);
        return None;
    }

    let raw = commit.message.trim_end();

    if RELEASE_COMMIT_REGEX.is_match(raw) {
        debug!("skipping release commit {}", commit.short_id);
        return None;
    }

    let link = if link_base.is_empty() {
        None
    } else {
        Some(format!("{}/{}", link_base.trim_end_matches('/'), commit.id))
    };

    let note = match ConventionalCommit::parse(raw) {
        Ok(cc) => NoteCommit {
            id: commit.id.clone(),
            short_id: commit.short_id.clone(),
            scope: cc.scope().map(|s| s.to_string()),
            message: cc.description().to_string(),
            breaking: cc.breaking(),
            link,
            group: group_title(cc.type_().as_str()),
        },
        Err(_) => NoteCommit {
            id: commit.id.clone(),
            short_id: commit.short_id.clone(),
            scope: None,
            message: raw.lines().next().unwrap_or_default().to_string(),
            breaking: false,
            link,
            group: MISC_GROUP,
        },
    };

    Some(note)
}

fn group_commits(commits: Vec<NoteCommit>) -> Vec<NoteGroup> {
    let mut groups: Vec<NoteGroup> = GROUPS
        .iter()
        .map(|(_, title)| NoteGroup {
            title,
            commits: vec![],
        })
        .collect();

    for commit in commits {
        if let Some(group) = groups.iter_mut().find(|g| g.title == commit.group)
        {
            group.commits.push(commit);
        }
    }

    groups.retain(|g| !g.commits.is_empty());
    groups
}

/// Remove everything from the heading of `tag` to the end of the text.
pub fn truncate_at_heading(changelog: &str, tag: &str) -> String {
    let heading = Regex::new(&format!(r"^##\s+{}(\s|$)", regex::escape(tag)));

    let Ok(heading) = heading else {
        return changelog.to_string();
    };

    let mut kept = vec![];

    for line in changelog.lines() {
        if heading.is_match(line) {
            break;
        }
        kept.push(line);
    }

    kept.join("\n")
}

/// Normalize changelog formatting by replacing consecutive blank lines (3+)
/// with double newlines and trimming whitespace.
pub fn strip_extra_lines(changelog: &str) -> String {
    EXTRA_NEW_LINES_REGEX
        .replace_all(changelog, "\n\n")
        .trim()
        .to_string()
}

/// Heading for a tagged commit: the previous release when it is one of the
/// commit's tags, otherwise the lowest tag name.
fn section_tag(names: &[String], previous_tag: &str) -> String {
    if names.iter().any(|name| name == previous_tag) {
        return previous_tag.to_string();
    }

    names.iter().min().cloned().unwrap_or_default()
}

/// Generate release notes for `req.next_tag`.
pub fn generate(repo: &Repository, req: &ChangelogRequest) -> Result<String> {
    let tags = repo.tags()?;

    // several stable tags may point at one commit
    let mut semver_tags: HashMap<String, Vec<String>> = HashMap::new();

    for tag in tags.iter() {
        if parse_semver_tag(&tag.name, req.tag_prefix).is_some() {
            semver_tags
                .entry(tag.sha.clone())
                .or_default()
                .push(tag.name.clone());
        }
    }

    let since = tags
        .iter()
        .find(|t| t.name == req.previous_tag)
        .map(|t| t.sha.clone());

    if since.is_none() {
        info!(
            "previous tag {} not found locally: using full history",
            req.previous_tag
        );
    }

    let commits = repo.commits_since_parent_of(since.as_deref(), req.sha)?;

    let mut sections = vec![];
    let mut pending = vec![];

    for commit in commits.iter() {
        if let Some(note) = parse_commit(commit, req.commit_link_base_url) {
            pending.push(note);
        }

        if let Some(names) = semver_tags.get(&commit.id)
            && commit.id != req.sha
        {
            sections.push(ReleaseSection {
                version: section_tag(names, req.previous_tag),
                timestamp: commit.timestamp,
                groups: group_commits(std::mem::take(&mut pending)),
            });
        }
    }

    sections.push(ReleaseSection {
        version: req.next_tag.to_string(),
        timestamp: req.released_at,
        groups: group_commits(pending),
    });

    let mut rendered = vec![];

    for section in sections.iter().rev() {
        let context = tera::Context::from_serialize(section)?;
        let notes = tera::Tera::one_off(req.body, &context, false)?;
        rendered.push(notes);
    }

    let changelog = rendered.join("\n");
    let changelog = truncate_at_heading(&changelog, req.previous_tag);

    Ok(strip_extra_lines(&changelog))
}
