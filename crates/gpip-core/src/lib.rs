//! Install helper for packages that need source workarounds on alternative
//! Python runtimes.
//!
//! Three operations are exposed: list the known recipes, run one recipe, or
//! try a plain source install from the package index. Side effects go through
//! [`effects::Effects`] so every operation can run against fakes.

pub mod archive;
mod commands;
pub mod config;
pub mod context;
mod download;
pub mod effects;
pub mod error;
pub mod index;
pub mod installer;
pub mod outcome;
pub mod process;
pub mod python;
pub mod recipes;
pub mod workdir;

#[cfg(test)]
mod testing;

pub use crate::commands::{install_from_pypi, install_recipe, list_recipes};
pub use crate::config::{Config, GlobalOptions};
pub use crate::context::CommandContext;
pub use crate::effects::{SharedEffects, SystemEffects};
pub use crate::error::InstallError;
pub use crate::outcome::{to_json_response, CommandStatus, ExecutionOutcome, GENERIC_FAILURE_CODE};
pub use crate::recipes::{Recipe, Registry};
