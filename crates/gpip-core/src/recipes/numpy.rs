use std::fs;

use tracing::info;

use super::Recipe;
use crate::archive::DownloadDescriptor;
use crate::context::CommandContext;
use crate::error::{InstallError, Step};
use crate::installer::{fetch_and_unpack, interpreter, run_step, setup_install, InstallReport};
use crate::workdir::WorkDir;

pub(super) const RECIPE: Recipe = Recipe::new(
    "numpy",
    "numpy 1.14.3 patched to build without ctypes or extended-precision floats",
    install,
);

const SOURCE_URL: &str = "https://files.pythonhosted.org/packages/b0/2b/497c2bb7c660b2606d4a96e2035e92554429e139c6c71cdff67af66b58d2/numpy-1.14.3.zip";
const PATCH_FILE: &str = "numpy.patch";
const PATCH: &str = include_str!("numpy-1.14.3.patch");

fn install(ctx: &CommandContext<'_>) -> Result<InstallReport, InstallError> {
    let descriptor = DownloadDescriptor::from_url(SOURCE_URL)?;
    let python = interpreter(ctx)?;
    let workdir = WorkDir::create(ctx.config().workdir().keep)?;
    let source_dir = fetch_and_unpack(ctx, &workdir, &descriptor)?;

    let patch_path = workdir.join(PATCH_FILE);
    fs::write(&patch_path, PATCH).map_err(|source| InstallError::Io {
        context: format!("failed to write {}", patch_path.display()),
        source,
    })?;

    info!("applying {PATCH_FILE}");
    run_step(
        ctx,
        Step::Patch,
        &ctx.config().tools().patch,
        &[
            "-d".to_string(),
            source_dir.to_string_lossy().into_owned(),
            "-p1".to_string(),
            "-i".to_string(),
            patch_path.to_string_lossy().into_owned(),
        ],
        workdir.path(),
    )?;

    setup_install(ctx, &python, &source_dir)?;

    Ok(InstallReport {
        package: RECIPE.name.to_string(),
        source_url: SOURCE_URL.to_string(),
        source_dir: descriptor.source_dir_name().to_string(),
        workdir: workdir.retained_path(),
    })
}
