use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::blocking::Client;

use crate::config::Config;
use crate::download::download_to;
use crate::index::{build_http_client, fetch_project, IndexError, ProjectMetadata};
use crate::process::{run_command, run_command_streaming, RunOutput};
use crate::python::detect_interpreter;

pub trait PythonRuntime: Send + Sync {
    fn detect_interpreter(&self, explicit: Option<&Path>) -> Result<PathBuf>;
}

/// Runs external programs (patch tool, build entry point).
///
/// With `stream` set, output is copied to the terminal while it is captured;
/// otherwise it is only captured.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String], cwd: &Path, stream: bool)
        -> Result<RunOutput>;
}

pub trait PackageIndex: Send + Sync {
    fn fetch_project(&self, url: &str) -> Result<ProjectMetadata, IndexError>;
}

pub trait Downloader: Send + Sync {
    fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

pub trait Effects: Send + Sync {
    fn python(&self) -> &dyn PythonRuntime;
    fn runner(&self) -> &dyn CommandRunner;
    fn index(&self) -> &dyn PackageIndex;
    fn downloader(&self) -> &dyn Downloader;
}

pub type SharedEffects = Arc<dyn Effects>;

pub struct SystemEffects {
    python: SystemPythonRuntime,
    runner: SystemCommandRunner,
    http: HttpTransport,
}

impl SystemEffects {
    /// Builds the production effects for `config`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            python: SystemPythonRuntime,
            runner: SystemCommandRunner {
                max_capture_bytes: config.tools().max_capture_bytes,
            },
            http: HttpTransport {
                client: build_http_client(config.index().timeout)?,
                index_timeout: config.index().timeout,
            },
        })
    }
}

impl Effects for SystemEffects {
    fn python(&self) -> &dyn PythonRuntime {
        &self.python
    }

    fn runner(&self) -> &dyn CommandRunner {
        &self.runner
    }

    fn index(&self) -> &dyn PackageIndex {
        &self.http
    }

    fn downloader(&self) -> &dyn Downloader {
        &self.http
    }
}

struct SystemPythonRuntime;

impl PythonRuntime for SystemPythonRuntime {
    fn detect_interpreter(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        detect_interpreter(explicit)
    }
}

struct SystemCommandRunner {
    max_capture_bytes: usize,
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path, stream: bool) -> Result<RunOutput> {
        if stream {
            run_command_streaming(program, args, cwd, self.max_capture_bytes)
        } else {
            run_command(program, args, cwd, self.max_capture_bytes)
        }
    }
}

struct HttpTransport {
    client: Client,
    index_timeout: Duration,
}

impl PackageIndex for HttpTransport {
    fn fetch_project(&self, url: &str) -> Result<ProjectMetadata, IndexError> {
        fetch_project(&self.client, url, self.index_timeout)
    }
}

impl Downloader for HttpTransport {
    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        download_to(&self.client, url, dest)
    }
}
