//! Hand-maintained install recipes for packages that need workarounds.

use indexmap::IndexMap;

use crate::context::CommandContext;
use crate::error::InstallError;
use crate::installer::InstallReport;

mod numpy;
mod setuptools;

pub type InstallFn = fn(&CommandContext<'_>) -> Result<InstallReport, InstallError>;

#[derive(Clone, Copy)]
pub struct Recipe {
    pub name: &'static str,
    pub summary: &'static str,
    install: InstallFn,
}

impl Recipe {
    #[must_use]
    pub const fn new(name: &'static str, summary: &'static str, install: InstallFn) -> Self {
        Self {
            name,
            summary,
            install,
        }
    }

    /// Runs the recipe to completion or to its first failing step.
    ///
    /// # Errors
    /// Propagates the failing step's error; nothing is rolled back.
    pub fn install(&self, ctx: &CommandContext<'_>) -> Result<InstallReport, InstallError> {
        (self.install)(ctx)
    }
}

impl std::fmt::Debug for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recipe")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

/// Known recipes keyed by package name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    recipes: IndexMap<&'static str, Recipe>,
}

impl Registry {
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        registry.register(setuptools::RECIPE);
        registry.register(numpy::RECIPE);
        registry
    }

    fn register(&mut self, recipe: Recipe) {
        self.recipes.insert(recipe.name, recipe);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.recipes.keys().copied()
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
