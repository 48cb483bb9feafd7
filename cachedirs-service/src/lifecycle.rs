use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Serialize;

/// Lifecycle verb passed as the control script's only argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Stop,
    Start,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Stop => "stop",
            Verb::Start => "start",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a lifecycle command ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Process ran to completion; `None` when it was killed by a signal.
    Exited { code: Option<i32> },
    /// Process could not be started at all.
    SpawnFailed { reason: String },
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        matches!(self, CommandOutcome::Exited { code: Some(0) })
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Exited { code: Some(code) } => write!(f, "exited with status {code}"),
            CommandOutcome::Exited { code: None } => write!(f, "terminated by signal"),
            CommandOutcome::SpawnFailed { reason } => write!(f, "failed to spawn: {reason}"),
        }
    }
}

/// Runs daemon lifecycle commands and waits for them to finish.
pub trait Lifecycle {
    fn invoke(&mut self, verb: Verb) -> CommandOutcome;
}

/// Lifecycle backed by the daemon's control script: `<script> stop|start`.
///
/// Output is discarded; only the exit status is kept.
#[derive(Debug, Clone)]
pub struct ScriptLifecycle {
    script: PathBuf,
}

impl ScriptLifecycle {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }

    pub fn script(&self) -> &Path {
        &self.script
    }
}

impl Lifecycle for ScriptLifecycle {
    fn invoke(&mut self, verb: Verb) -> CommandOutcome {
        tracing::debug!(script = %self.script.display(), %verb, "running lifecycle command");
        let status = Command::new(&self.script)
            .arg(verb.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) => CommandOutcome::Exited {
                code: status.code(),
            },
            Err(err) => CommandOutcome::SpawnFailed {
                reason: err.to_string(),
            },
        }
    }
}
