use std::sync::Arc;

use clap::{CommandFactory, Parser};
use color_eyre::{eyre::eyre, Result};
use gpip_core::{
    CommandContext, Config, ExecutionOutcome, GlobalOptions, Registry, SharedEffects,
    SystemEffects,
};

mod args;
mod cli;
mod output;
mod style;

use cli::{Action, GpipCli};

fn main() -> Result<()> {
    color_eyre::install()?;

    let argv = args::retain_recognized(&GpipCli::command(), std::env::args_os());
    let cli = GpipCli::parse_from(argv);
    init_tracing(cli.trace, cli.verbose, cli.quiet);

    let global = GlobalOptions {
        quiet: cli.quiet,
        json: cli.json,
        keep_workdir: cli.keep_workdir,
    };

    let Some(action) = cli.action() else {
        tracing::debug!("no action requested");
        return Ok(());
    };

    let registry = Registry::builtin();
    let outcome = execute(&global, &registry, &action)?;
    let code = output::emit_output(&cli, &action, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn execute(
    global: &GlobalOptions,
    registry: &Registry,
    action: &Action,
) -> Result<ExecutionOutcome> {
    match action {
        Action::List => Ok(gpip_core::list_recipes(registry)),
        Action::Install(name) => with_context(global, |ctx| {
            gpip_core::install_recipe(ctx, registry, name)
        }),
        Action::Pypi(name) => with_context(global, |ctx| gpip_core::install_from_pypi(ctx, name)),
    }
}

fn with_context<F>(global: &GlobalOptions, run: F) -> Result<ExecutionOutcome>
where
    F: FnOnce(&CommandContext<'_>) -> ExecutionOutcome,
{
    let config = Config::from_env(global);
    let effects: SharedEffects =
        Arc::new(SystemEffects::new(&config).map_err(|err| eyre!("{err:?}"))?);
    let ctx = CommandContext::new(global, config, effects);
    Ok(run(&ctx))
}

fn init_tracing(trace: bool, verbose: u8, quiet: bool) {
    let level = if trace {
        "trace"
    } else if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("gpip_core={level},gpip={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
