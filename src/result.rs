//! Result type used at the application layer.
//!
//! Command handlers and `main` return this alias so that any library error
//! can be propagated with `?` and reported through `color-eyre` with its
//! context chain.
//!
//! ```rust,ignore
//! use color_eyre::eyre::Context;
//! use crate::result::Result;
//!
//! fn load() -> Result<String> {
//!     let content = std::fs::read_to_string("hyperswitch-ci.toml")
//!         .wrap_err("failed to read configuration file")?;
//!     Ok(content)
//! }
//! ```

use color_eyre::eyre::Result as EyreResult;

/// Standard result type for command execution.
pub type Result<T> = EyreResult<T>;
