use crate::config::{Config, GlobalOptions};
use crate::effects::{self, SharedEffects};

/// Everything an operation needs: options, settings, and injected effects.
pub struct CommandContext<'a> {
    pub global: &'a GlobalOptions,
    config: Config,
    effects: SharedEffects,
}

impl<'a> CommandContext<'a> {
    #[must_use]
    pub fn new(global: &'a GlobalOptions, config: Config, effects: SharedEffects) -> Self {
        Self {
            global,
            config,
            effects,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn python_runtime(&self) -> &dyn effects::PythonRuntime {
        self.effects.python()
    }

    pub fn runner(&self) -> &dyn effects::CommandRunner {
        self.effects.runner()
    }

    pub fn index(&self) -> &dyn effects::PackageIndex {
        self.effects.index()
    }

    pub fn downloader(&self) -> &dyn effects::Downloader {
        self.effects.downloader()
    }
}
