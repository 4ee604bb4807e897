//! Entry points the front end dispatches to.

use serde_json::json;
use tracing::{debug, info};

use crate::context::CommandContext;
use crate::error::InstallError;
use crate::installer::{install_from_index, InstallReport};
use crate::outcome::ExecutionOutcome;
use crate::recipes::Registry;

/// Lists known recipes in registration order.
#[must_use]
pub fn list_recipes(registry: &Registry) -> ExecutionOutcome {
    let packages = registry
        .recipes()
        .map(|recipe| json!({ "name": recipe.name, "summary": recipe.summary }))
        .collect::<Vec<_>>();
    ExecutionOutcome::success(
        format!("{} known packages", registry.len()),
        json!({ "packages": packages }),
    )
}

/// Runs the recipe registered under `name`.
///
/// Unknown names fail before any effect is invoked.
pub fn install_recipe(
    ctx: &CommandContext<'_>,
    registry: &Registry,
    name: &str,
) -> ExecutionOutcome {
    let result = registry
        .get(name)
        .ok_or_else(|| InstallError::UnknownRecipe(name.to_string()))
        .and_then(|recipe| {
            info!(package = recipe.name, "running install recipe");
            recipe.install(ctx)
        });
    outcome_from(result)
}

/// Best-effort install of `name` from the package index.
pub fn install_from_pypi(ctx: &CommandContext<'_>, name: &str) -> ExecutionOutcome {
    info!(package = name, "installing from the package index");
    outcome_from(install_from_index(ctx, name))
}

fn outcome_from(result: Result<InstallReport, InstallError>) -> ExecutionOutcome {
    match result {
        Ok(report) => {
            debug!(?report, "install finished");
            let message = format!("installed {}", report.package);
            let hint = report
                .workdir
                .as_ref()
                .map(|workdir| format!("sources kept in {}", workdir.display()));
            let mut details = json!({ "code": 0, "report": report });
            if let Some(hint) = hint {
                details["hint"] = json!(hint);
            }
            ExecutionOutcome::success(message, details)
        }
        Err(err) => {
            debug!(error = ?err, "install failed");
            err.into_outcome()
        }
    }
}
