use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

/// Interpreters probed on `PATH`, most specific runtime first.
const CANDIDATES: [&str; 4] = ["graalpy", "graalpython", "python3", "python"];

/// Locate the interpreter that builds and installs packages.
///
/// An explicit override is returned untouched so that wrapper scripts and
/// relative paths keep working.
///
/// # Errors
/// Returns an error when no override is set and none of the candidates is on
/// `PATH`.
pub fn detect_interpreter(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(explicit) = explicit {
        return Ok(explicit.to_path_buf());
    }

    for candidate in CANDIDATES {
        if let Ok(path) = which::which(candidate) {
            return Ok(path);
        }
    }

    bail!("no python interpreter found; set GPIP_PYTHON");
}
