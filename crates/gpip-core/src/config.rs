//! Global options and environment-derived settings.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/pypi";
pub const DEFAULT_PATCH_PROGRAM: &str = "patch";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_CAPTURE_BYTES: usize = 1024 * 1024;

const INDEX_URL_ENV: &str = "GPIP_INDEX_URL";
const PYTHON_ENV: &str = "GPIP_PYTHON";
const PATCH_ENV: &str = "GPIP_PATCH";
const KEEP_WORKDIR_ENV: &str = "GPIP_KEEP_WORKDIR";
const HTTP_TIMEOUT_ENV: &str = "GPIP_HTTP_TIMEOUT";
const MAX_CAPTURE_ENV: &str = "GPIP_MAX_CAPTURE_BYTES";

#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub json: bool,
    pub keep_workdir: bool,
}

impl GlobalOptions {
    /// Whether patch and build output is copied to the terminal; `--json` and
    /// `--quiet` keep stdout for the final reply only.
    #[must_use]
    pub fn streams_tool_output(&self) -> bool {
        !(self.quiet || self.json)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn flag_is_enabled(&self, key: &str) -> bool {
        matches!(self.vars.get(key).map(String::as_str), Some("1"))
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) index: IndexConfig,
    pub(crate) tools: ToolConfig,
    pub(crate) workdir: WorkdirConfig,
}

impl Config {
    /// Builds a configuration snapshot from the current process environment.
    #[must_use]
    pub fn from_env(global: &GlobalOptions) -> Self {
        Self::from_snapshot(&EnvSnapshot::capture(), global)
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot, global: &GlobalOptions) -> Self {
        let base_url = snapshot
            .var(INDEX_URL_ENV)
            .unwrap_or(DEFAULT_INDEX_URL)
            .trim_end_matches('/')
            .to_string();
        let timeout = snapshot
            .var(HTTP_TIMEOUT_ENV)
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        let max_capture_bytes = snapshot
            .var(MAX_CAPTURE_ENV)
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_MAX_CAPTURE_BYTES);
        Self {
            index: IndexConfig {
                base_url,
                timeout: Duration::from_secs(timeout),
            },
            tools: ToolConfig {
                python: snapshot.var(PYTHON_ENV).map(PathBuf::from),
                patch: snapshot
                    .var(PATCH_ENV)
                    .unwrap_or(DEFAULT_PATCH_PROGRAM)
                    .to_string(),
                max_capture_bytes,
            },
            workdir: WorkdirConfig {
                keep: global.keep_workdir || snapshot.flag_is_enabled(KEEP_WORKDIR_ENV),
            },
        }
    }

    #[must_use]
    pub fn index(&self) -> &IndexConfig {
        &self.index
    }

    #[must_use]
    pub fn tools(&self) -> &ToolConfig {
        &self.tools
    }

    #[must_use]
    pub fn workdir(&self) -> &WorkdirConfig {
        &self.workdir
    }
}

#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl IndexConfig {
    #[must_use]
    pub fn project_url(&self, name: &str) -> String {
        format!("{}/{name}/json", self.base_url)
    }
}

#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Interpreter override; discovered on `PATH` when unset.
    pub python: Option<PathBuf>,
    pub patch: String,
    pub max_capture_bytes: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct WorkdirConfig {
    pub keep: bool,
}
