//! Scripted effects for unit tests.

use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use serde_json::json;

use crate::config::{Config, EnvSnapshot, GlobalOptions};
use crate::context::CommandContext;
use crate::effects::{CommandRunner, Downloader, Effects, PackageIndex, PythonRuntime};
use crate::index::{IndexError, ProjectMetadata};
use crate::process::RunOutput;

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub saw_setup_py: bool,
    /// Contents of the file passed with `-i`, read while the command ran.
    pub input_file: Option<String>,
    pub streamed: bool,
}

#[derive(Default)]
struct FakeState {
    metadata: HashMap<String, ProjectMetadata>,
    files: HashMap<String, Vec<u8>>,
    failing: HashMap<String, i32>,
    downloads: Mutex<Vec<String>>,
    calls: Mutex<Vec<RecordedCall>>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeEffects {
    state: Arc<FakeState>,
    env: Vec<(String, String)>,
    global: GlobalOptions,
}

impl FakeEffects {
    pub(crate) fn new() -> Self {
        Self::default().with_env("GPIP_INDEX_URL", "https://index.test/pypi")
    }

    fn state_mut(&mut self) -> &mut FakeState {
        Arc::get_mut(&mut self.state).expect("configure fakes before running")
    }

    pub(crate) fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub(crate) fn with_global(mut self, global: GlobalOptions) -> Self {
        self.global = global;
        self
    }

    pub(crate) fn with_metadata(mut self, url: &str, metadata: ProjectMetadata) -> Self {
        self.state_mut().metadata.insert(url.to_string(), metadata);
        self
    }

    pub(crate) fn with_file(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.state_mut().files.insert(url.to_string(), bytes);
        self
    }

    pub(crate) fn failing(mut self, program: &str, code: i32) -> Self {
        self.state_mut().failing.insert(program.to_string(), code);
        self
    }

    pub(crate) fn run<T>(&self, op: impl FnOnce(&CommandContext<'_>) -> T) -> T {
        let pairs = self
            .env
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect::<Vec<_>>();
        let global = self.global.clone();
        let config = Config::from_snapshot(&EnvSnapshot::testing(&pairs), &global);
        let ctx = CommandContext::new(&global, config, Arc::new(self.clone()));
        op(&ctx)
    }

    pub(crate) fn downloads(&self) -> Vec<String> {
        self.state.downloads.lock().expect("downloads").clone()
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().expect("calls").clone()
    }
}

impl Effects for FakeEffects {
    fn python(&self) -> &dyn PythonRuntime {
        self
    }

    fn runner(&self) -> &dyn CommandRunner {
        self
    }

    fn index(&self) -> &dyn PackageIndex {
        self
    }

    fn downloader(&self) -> &dyn Downloader {
        self
    }
}

impl PythonRuntime for FakeEffects {
    fn detect_interpreter(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        Ok(explicit.map_or_else(|| PathBuf::from("python3"), Path::to_path_buf))
    }
}

impl CommandRunner for FakeEffects {
    fn run(&self, program: &str, args: &[String], cwd: &Path, stream: bool) -> Result<RunOutput> {
        let input_file = args
            .iter()
            .position(|arg| arg == "-i")
            .and_then(|idx| args.get(idx + 1))
            .and_then(|path| fs::read_to_string(path).ok());
        self.state.calls.lock().expect("calls").push(RecordedCall {
            program: program.to_string(),
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
            saw_setup_py: cwd.join("setup.py").is_file(),
            input_file,
            streamed: stream,
        });
        let code = self.state.failing.get(program).copied().unwrap_or(0);
        Ok(RunOutput {
            code,
            stdout: String::new(),
            stderr: if code == 0 {
                String::new()
            } else {
                format!("{program}: simulated failure\n")
            },
        })
    }
}

impl PackageIndex for FakeEffects {
    fn fetch_project(&self, url: &str) -> Result<ProjectMetadata, IndexError> {
        self.state
            .metadata
            .get(url)
            .cloned()
            .ok_or_else(|| IndexError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

impl Downloader for FakeEffects {
    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        self.state
            .downloads
            .lock()
            .expect("downloads")
            .push(url.to_string());
        let bytes = self
            .state
            .files
            .get(url)
            .ok_or_else(|| anyhow!("unexpected response for {url}: 404 Not Found"))?;
        fs::write(dest, bytes)?;
        Ok(bytes.len() as u64)
    }
}

/// Index metadata listing `(url, python_version)` pairs in order.
pub(crate) fn metadata(entries: &[(&str, &str)]) -> ProjectMetadata {
    let urls = entries
        .iter()
        .map(|(url, python_version)| {
            json!({
                "url": url,
                "filename": url.rsplit('/').next().unwrap_or(url),
                "python_version": python_version,
            })
        })
        .collect::<Vec<_>>();
    serde_json::from_value(json!({ "urls": urls })).expect("metadata")
}

/// Zip archive holding `<root>/setup.py`.
pub(crate) fn zip_archive(root: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(format!("{root}/setup.py"), zip::write::FileOptions::default())
        .expect("start file");
    writer
        .write_all(b"from setuptools import setup\nsetup()\n")
        .expect("write");
    writer.finish().expect("finish").into_inner()
}

/// `.tar.bz2` archive holding `<root>/setup.py`.
pub(crate) fn tar_bz2_archive(root: &str) -> Vec<u8> {
    let contents = b"from setuptools import setup\nsetup()\n";
    let mut header = tar::Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    let encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder
        .append_data(&mut header, format!("{root}/setup.py"), &contents[..])
        .expect("append");
    builder
        .into_inner()
        .expect("tar")
        .finish()
        .expect("bzip2")
}
