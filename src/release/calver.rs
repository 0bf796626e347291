//! Calendar-versioned trigger refs (`YYYY.MM.DD[.N][-suffix]`).
use regex::Regex;
use std::{fmt::Display, sync::LazyLock};

use crate::error::{CiError, Result};

/// Matches tag refs named by calendar date with an optional sequence number
/// and suffix.
static CALVER_REF_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^refs/tags/(?<year>[0-9]{4})\.(?<month>[0-9]{2})\.(?<day>[0-9]{2})(\.(?<seq>[0-9]+))?(-(?<suffix>.+))?$",
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalVerTag {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub sequence: Option<u64>,
    pub suffix: Option<String>,
}

impl CalVerTag {
    /// Parse a full git ref such as `refs/tags/2024.05.01.1`.
    pub fn parse_ref(git_ref: &str) -> Result<Self> {
        let caps = CALVER_REF_REGEX
            .captures(git_ref)
            .ok_or_else(|| CiError::invalid_calver(git_ref))?;

        // the pattern guarantees digit-only captures; overflow of the
        // sequence number is the only way these parses can fail
        let number = |name: &str| -> Result<u64> {
            caps.name(name)
                .map(|m| m.as_str())
                .unwrap_or_default()
                .parse::<u64>()
                .map_err(|_| CiError::invalid_calver(git_ref))
        };

        Ok(Self {
            year: number("year")? as u16,
            month: number("month")? as u8,
            day: number("day")? as u8,
            sequence: match caps.name("seq") {
                Some(_) => Some(number("seq")?),
                None => None,
            },
            suffix: caps.name("suffix").map(|m| m.as_str().to_string()),
        })
    }
}

impl Display for CalVerTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}.{:02}.{:02}", self.year, self.month, self.day)?;
        if let Some(seq) = self.sequence {
            write!(f, ".{seq}")?;
        }
        if let Some(suffix) = &self.suffix {
            write!(f, "-{suffix}")?;
        }
        Ok(())
    }
}

/// Check the workflow was triggered from a CalVer tag.
pub fn validate_trigger_ref(git_ref: &str) -> Result<CalVerTag> {
    CalVerTag::parse_ref(git_ref)
}
