//! Generic installer plus the download/extract/build steps recipes share.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::archive::{self, DownloadDescriptor};
use crate::context::CommandContext;
use crate::error::{InstallError, Step};
use crate::workdir::WorkDir;

/// What a finished install did.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub package: String,
    pub source_url: String,
    /// Name of the unpacked source directory inside the working directory.
    pub source_dir: String,
    /// Set only when the working directory was retained.
    pub workdir: Option<PathBuf>,
}

/// Installs `name` from the package index's first source distribution.
///
/// # Errors
/// Fails when the index has no usable source archive, when the archive type
/// is unknown, or when any download, extraction, or build step fails.
pub fn install_from_index(
    ctx: &CommandContext<'_>,
    name: &str,
) -> Result<InstallReport, InstallError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InstallError::EmptyPackageName);
    }

    let url = ctx.config().index().project_url(name);
    let source_url = match ctx.index().fetch_project(&url) {
        Ok(metadata) => metadata.source_url().map(ToOwned::to_owned),
        Err(err) => {
            warn!(package = name, reason = err.reason(), "index lookup failed: {err}");
            return Err(InstallError::PackageNotFound {
                name: name.to_string(),
                cause: Some(err),
            });
        }
    };
    let Some(source_url) = source_url else {
        return Err(InstallError::PackageNotFound {
            name: name.to_string(),
            cause: None,
        });
    };
    debug!(package = name, url = %source_url, "selected source distribution");

    let descriptor = DownloadDescriptor::from_url(&source_url)?;
    let python = interpreter(ctx)?;
    let workdir = WorkDir::create(ctx.config().workdir().keep)?;
    let source_dir = fetch_and_unpack(ctx, &workdir, &descriptor)?;
    setup_install(ctx, &python, &source_dir)?;

    Ok(InstallReport {
        package: name.to_string(),
        source_url,
        source_dir: descriptor.source_dir_name().to_string(),
        workdir: workdir.retained_path(),
    })
}

pub(crate) fn interpreter(ctx: &CommandContext<'_>) -> Result<PathBuf, InstallError> {
    let explicit = ctx.config().tools().python.as_deref();
    let python = ctx
        .python_runtime()
        .detect_interpreter(explicit)
        .map_err(|err| InstallError::Interpreter(err.to_string()))?;
    debug!(python = %python.display(), "using interpreter");
    Ok(python)
}

/// Downloads the archive into `workdir`, unpacks it there, and returns the
/// source directory it produced.
pub(crate) fn fetch_and_unpack(
    ctx: &CommandContext<'_>,
    workdir: &WorkDir,
    descriptor: &DownloadDescriptor,
) -> Result<PathBuf, InstallError> {
    let archive_path = workdir.join(&descriptor.filename);
    info!(url = %descriptor.url, "downloading {}", descriptor.filename);
    ctx.downloader()
        .download(&descriptor.url, &archive_path)
        .map_err(|err| InstallError::Download {
            url: descriptor.url.clone(),
            source: err.into(),
        })?;

    info!("extracting {}", descriptor.filename);
    archive::extract(descriptor.kind, &archive_path, workdir.path()).map_err(|err| {
        InstallError::Extract {
            archive: descriptor.filename.clone(),
            source: err.into(),
        }
    })?;

    let source_dir = workdir.join(descriptor.source_dir_name());
    if !source_dir.is_dir() {
        return Err(InstallError::MissingSourceDir {
            archive: descriptor.filename.clone(),
            expected: descriptor.source_dir_name().to_string(),
        });
    }
    Ok(source_dir)
}

/// Runs `<python> setup.py install --user` inside `source_dir`.
pub(crate) fn setup_install(
    ctx: &CommandContext<'_>,
    python: &Path,
    source_dir: &Path,
) -> Result<(), InstallError> {
    let program = python
        .to_str()
        .ok_or_else(|| InstallError::Interpreter("non-utf8 interpreter path".to_string()))?;
    info!("building in {}", source_dir.display());
    run_step(
        ctx,
        Step::Build,
        program,
        &["setup.py".to_string(), "install".to_string(), "--user".to_string()],
        source_dir,
    )
}

pub(crate) fn run_step(
    ctx: &CommandContext<'_>,
    step: Step,
    program: &str,
    args: &[String],
    cwd: &Path,
) -> Result<(), InstallError> {
    let command = std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    let stream = ctx.global.streams_tool_output();
    debug!(%command, cwd = %cwd.display(), stream, "running {step}");
    let output = ctx
        .runner()
        .run(program, args, cwd, stream)
        .map_err(|err| InstallError::Spawn {
            program: program.to_string(),
            source: err.into(),
        })?;
    if output.success() {
        Ok(())
    } else {
        Err(InstallError::CommandFailed {
            step,
            command,
            code: output.code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
