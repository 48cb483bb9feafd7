//! Apply a settings submission to the running daemon.
//!
//! ## Sequence
//!
//! 1. `stop` the daemon (status ignored).
//! 2. Compile the submission into an option string.
//! 3. Overwrite the `#config` file with exactly that string.
//! 4. `start` the daemon if `service` and `include` were both submitted non-empty.
//!
//! Every step runs regardless of how the previous one went. A write that was
//! skipped or failed is returned as an error only after step 4, carrying the
//! report of everything that ran.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use cachedirs_core::types::INCLUDE_FIELD;
use cachedirs_core::{compile, Settings, SettingsSubmission};

use crate::error::{write_err, ServiceError};
use crate::lifecycle::{CommandOutcome, Lifecycle, Verb};

/// Controller state while a submission is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Stopping,
    Writing,
    Starting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Stopping => write!(f, "stopping"),
            Phase::Writing => write!(f, "writing"),
            Phase::Starting => write!(f, "starting"),
        }
    }
}

/// What an [`apply`] call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// `None` when the submission named no config file.
    pub path: Option<PathBuf>,
    pub options: String,
    pub written: bool,
    pub stopped: CommandOutcome,
    /// `None` when the start condition was not met.
    pub started: Option<CommandOutcome>,
}

/// `true` when the daemon is enabled and `include` was submitted non-empty.
pub fn should_start(fields: &SettingsSubmission) -> bool {
    Settings::from_submission(fields).enable && fields.is_set(INCLUDE_FIELD)
}

/// Stop the daemon, rewrite its config from `fields`, and restart it if enabled.
///
/// On error the [`ApplyReport`] travels inside the [`ServiceError`].
pub fn apply<L>(
    lifecycle: &mut L,
    fields: &SettingsSubmission,
    prefix_spec: &str,
) -> Result<ApplyReport, ServiceError>
where
    L: Lifecycle + ?Sized,
{
    enter(Phase::Stopping);
    // Stop status intentionally ignored; a daemon that was not running is fine.
    let stopped = run(lifecycle, Verb::Stop);

    let compiled = compile(fields, prefix_spec);
    let options = compiled.options_string();
    let path = compiled
        .path
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);

    enter(Phase::Writing);
    let written = match &path {
        Some(path) => Some(write_config(path, &options)),
        None => {
            tracing::error!("no config path submitted; skipping write");
            None
        }
    };

    let started = if should_start(fields) {
        enter(Phase::Starting);
        Some(run(lifecycle, Verb::Start))
    } else {
        tracing::info!("service disabled or nothing included; daemon left stopped");
        None
    };
    enter(Phase::Idle);

    let report = ApplyReport {
        path,
        options,
        written: matches!(written, Some(Ok(()))),
        stopped,
        started,
    };
    match written {
        Some(Ok(())) => Ok(report),
        Some(Err(source)) => Err(write_err(source, report)),
        None => Err(ServiceError::MissingConfigPath {
            report: Box::new(report),
        }),
    }
}

/// [`apply`] with the prefix spec taken from the submission's `#prefix` field.
pub fn apply_submission<L>(
    lifecycle: &mut L,
    fields: &SettingsSubmission,
) -> Result<ApplyReport, ServiceError>
where
    L: Lifecycle + ?Sized,
{
    apply(lifecycle, fields, fields.prefix_spec().unwrap_or_default())
}

fn enter(phase: Phase) {
    tracing::debug!(%phase, "controller phase");
}

fn run<L: Lifecycle + ?Sized>(lifecycle: &mut L, verb: Verb) -> CommandOutcome {
    let outcome = lifecycle.invoke(verb);
    if outcome.success() {
        tracing::info!(%verb, "lifecycle command finished");
    } else {
        tracing::warn!(%verb, %outcome, "lifecycle command did not succeed");
    }
    outcome
}

fn write_config(path: &Path, options: &str) -> io::Result<()> {
    match fs::write(path, options) {
        Ok(()) => {
            tracing::info!(path = %path.display(), options, "wrote cache_dirs options");
            Ok(())
        }
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "config write failed");
            Err(err)
        }
    }
}
