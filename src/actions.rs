//! GitHub Actions workflow commands.
//!
//! Commands are plain stdout lines understood by the runner; outputs are
//! appended to the file named by `GITHUB_OUTPUT`.
use log::*;
use std::{env, fs::OpenOptions, io::Write, path::Path};

use crate::error::Result;

/// True when running inside a GitHub Actions job.
pub fn in_actions() -> bool {
    env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Workflow command hiding `value` from subsequent log output.
pub fn mask_command(value: &str) -> String {
    format!("::add-mask::{}", escape_data(value))
}

/// Workflow command raising an error annotation.
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Mask a secret in the job log. No-op outside of Actions.
pub fn mask(value: &str) {
    if in_actions() && !value.is_empty() {
        println!("{}", mask_command(value));
    }
}

/// Emit an error annotation. No-op outside of Actions.
pub fn annotate_error(message: &str) {
    if in_actions() {
        println!("{}", error_command(message));
    }
}

/// Append `name=value` to an Actions output file.
pub fn write_output(path: &Path, name: &str, value: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    if value.contains('\n') {
        let delimiter = format!("ghadelimiter_{name}");
        writeln!(file, "{name}<<{delimiter}\n{value}\n{delimiter}")?;
    } else {
        writeln!(file, "{name}={value}")?;
    }

    Ok(())
}

/// Set a step output when `GITHUB_OUTPUT` is configured.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    match env::var("GITHUB_OUTPUT") {
        Ok(path) if !path.is_empty() => {
            debug!("setting output {name}={value}");
            write_output(Path::new(&path), name, value)
        }
        _ => {
            debug!("GITHUB_OUTPUT not set: skipping output {name}");
            Ok(())
        }
    }
}
