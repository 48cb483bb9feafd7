//! `cachedirs service` — invoke the daemon control script directly.

use anyhow::{bail, Result};
use clap::Subcommand;

use cachedirs_service::{Lifecycle, ScriptLifecycle, Verb};

use super::input::ScriptArgs;

#[derive(Subcommand, Debug)]
pub enum ServiceCommand {
    /// Start the cache_dirs daemon.
    Start(ScriptArgs),
    /// Stop the cache_dirs daemon.
    Stop(ScriptArgs),
}

pub fn run(command: ServiceCommand) -> Result<()> {
    let (verb, args) = match command {
        ServiceCommand::Start(args) => (Verb::Start, args),
        ServiceCommand::Stop(args) => (Verb::Stop, args),
    };

    let mut lifecycle = ScriptLifecycle::new(args.config().script);
    let outcome = lifecycle.invoke(verb);
    if !outcome.success() {
        bail!("{} {verb}: {outcome}", lifecycle.script().display());
    }

    println!("{verb}: {outcome}");
    Ok(())
}
