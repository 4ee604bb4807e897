use super::Recipe;
use crate::context::CommandContext;
use crate::error::InstallError;
use crate::installer::{install_from_index, InstallReport};

pub(super) const RECIPE: Recipe = Recipe::new(
    "setuptools",
    "build tooling, installed from its source distribution",
    install,
);

fn install(ctx: &CommandContext<'_>) -> Result<InstallReport, InstallError> {
    install_from_index(ctx, "setuptools")
}
