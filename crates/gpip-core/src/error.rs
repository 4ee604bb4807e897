use std::fmt;

use serde_json::{json, Value};

use crate::index::IndexError;
use crate::outcome::{ExecutionOutcome, GENERIC_FAILURE_CODE};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// External step that can fail with an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Patch,
    Build,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Patch => f.write_str("patch application"),
            Step::Build => f.write_str("setup.py install --user"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("Unknown package: '{0}'")]
    UnknownRecipe(String),
    #[error("package name must not be empty")]
    EmptyPackageName,
    #[error("Package not found: '{name}'")]
    PackageNotFound {
        name: String,
        #[source]
        cause: Option<IndexError>,
    },
    #[error("Unknown file type: {0}")]
    UnknownFileType(String),
    #[error("Download error: {url}")]
    Download {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("Error during extraction of {archive}")]
    Extract {
        archive: String,
        #[source]
        source: BoxError,
    },
    #[error("{archive} did not unpack into {expected}/")]
    MissingSourceDir { archive: String, expected: String },
    #[error("failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: BoxError,
    },
    #[error("{step} failed: `{command}` exited with status {code}")]
    CommandFailed {
        step: Step,
        command: String,
        code: i32,
        stdout: String,
        stderr: String,
    },
    #[error("{0}")]
    Interpreter(String),
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    /// Process exit code: the failing command's status, or the generic code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallError::CommandFailed { code, .. } if *code != 0 => *code,
            _ => GENERIC_FAILURE_CODE,
        }
    }

    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            InstallError::UnknownRecipe(_) => "unknown-recipe",
            InstallError::EmptyPackageName => "empty-package-name",
            InstallError::PackageNotFound { .. } => "package-not-found",
            InstallError::UnknownFileType(_) => "unknown-file-type",
            InstallError::Download { .. } => "download-failed",
            InstallError::Extract { .. } => "extract-failed",
            InstallError::MissingSourceDir { .. } => "missing-source-dir",
            InstallError::Spawn { .. } => "spawn-failed",
            InstallError::CommandFailed { step: Step::Patch, .. } => "patch-failed",
            InstallError::CommandFailed { step: Step::Build, .. } => "build-failed",
            InstallError::Interpreter(_) => "python-missing",
            InstallError::Io { .. } => "io",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            InstallError::UnknownRecipe(_)
                | InstallError::EmptyPackageName
                | InstallError::PackageNotFound { .. }
                | InstallError::UnknownFileType(_)
        )
    }

    fn hint(&self) -> Option<String> {
        match self {
            InstallError::UnknownRecipe(_) => {
                Some("run `gpip --list` to see packages with install recipes".to_string())
            }
            InstallError::PackageNotFound { cause: None, .. } => Some(
                "the index lists no source distribution for this package".to_string(),
            ),
            InstallError::PackageNotFound {
                cause: Some(cause), ..
            } => Some(cause.to_string()),
            InstallError::Interpreter(_) => {
                Some("set GPIP_PYTHON to the interpreter that should build packages".to_string())
            }
            InstallError::CommandFailed { stderr, .. } => stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .map(|line| line.trim().to_string()),
            InstallError::Spawn { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_outcome(self) -> ExecutionOutcome {
        let mut details = json!({
            "code": self.exit_code(),
            "reason": self.reason(),
        });
        if let Some(hint) = self.hint() {
            details["hint"] = Value::String(hint);
        }
        match &self {
            InstallError::CommandFailed {
                command,
                stdout,
                stderr,
                ..
            } => {
                details["command"] = Value::String(command.clone());
                if !stdout.is_empty() {
                    details["stdout"] = Value::String(stdout.clone());
                }
                if !stderr.is_empty() {
                    details["stderr"] = Value::String(stderr.clone());
                }
            }
            InstallError::PackageNotFound {
                cause: Some(cause), ..
            } => {
                details["index_error"] = Value::String(cause.reason().to_string());
            }
            _ => {}
        }
        let message = self.to_string();
        if self.is_user_error() {
            ExecutionOutcome::user_error(message, details)
        } else {
            ExecutionOutcome::failure(message, details)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::CommandStatus;

    #[test]
    fn command_failures_keep_their_status() {
        let err = InstallError::CommandFailed {
            step: Step::Build,
            command: "python setup.py install --user".into(),
            code: 3,
            stdout: "running install\n".into(),
            stderr: "error: no compiler\n\n".into(),
        };
        assert_eq!(err.exit_code(), 3);
        let outcome = err.into_outcome();
        assert_eq!(outcome.status, CommandStatus::Failure);
        assert_eq!(outcome.exit_code(), 3);
        assert_eq!(outcome.hint(), Some("error: no compiler"));
        assert_eq!(outcome.details["reason"], "build-failed");
        assert_eq!(outcome.details["stdout"], "running install\n");
        assert_eq!(outcome.details["stderr"], "error: no compiler\n\n");
    }

    #[test]
    fn messages_use_their_own_arguments() {
        let err = InstallError::UnknownRecipe("scipy".into());
        assert_eq!(err.to_string(), "Unknown package: 'scipy'");
        let outcome = err.into_outcome();
        assert_eq!(outcome.status, CommandStatus::UserError);
        assert_eq!(outcome.message, "Unknown package: 'scipy'");
        assert_eq!(outcome.exit_code(), GENERIC_FAILURE_CODE);
    }

    #[test]
    fn package_not_found_records_index_failure() {
        let err = InstallError::PackageNotFound {
            name: "demo".into(),
            cause: Some(IndexError::Status {
                url: "https://pypi.org/pypi/demo/json".into(),
                status: 404,
            }),
        };
        let outcome = err.into_outcome();
        assert_eq!(outcome.message, "Package not found: 'demo'");
        assert_eq!(outcome.details["index_error"], "http-status");
    }
}
