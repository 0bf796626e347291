//! Command execution for the CLI subcommands.
//!
//! - **validate**: check a payments confirm response and persist collection
//!   variables
//! - **release**: cut a stable SemVer release from a CalVer tag and publish
//!   release notes

/// `validate-confirm` command.
pub mod validate;

/// `cut-release` command.
pub mod release;
