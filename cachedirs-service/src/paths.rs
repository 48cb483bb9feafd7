use std::env;
use std::path::{Path, PathBuf};

/// Web root used when the hosting environment does not provide one.
pub const DEFAULT_DOCROOT: &str = "/usr/local/emhttp";

/// Environment variable naming the web root.
pub const DOCROOT_ENV: &str = "DOCUMENT_ROOT";

/// Location of the daemon control script below the web root.
pub const SCRIPT_RELATIVE: &str = "plugins/dynamix.cache.dirs/scripts/rc.cachedirs";

/// `$DOCUMENT_ROOT` when set and non-empty, else [`DEFAULT_DOCROOT`].
pub fn docroot_from_env() -> PathBuf {
    match env::var_os(DOCROOT_ENV) {
        Some(root) if !root.is_empty() => PathBuf::from(root),
        _ => PathBuf::from(DEFAULT_DOCROOT),
    }
}

pub fn script_path(docroot: &Path) -> PathBuf {
    docroot.join(SCRIPT_RELATIVE)
}

/// Where the daemon control script lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub script: PathBuf,
}

impl ServiceConfig {
    pub fn from_docroot(docroot: &Path) -> Self {
        Self {
            script: script_path(docroot),
        }
    }

    pub fn from_env() -> Self {
        Self::from_docroot(&docroot_from_env())
    }

    pub fn with_script(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// Resolve in precedence order: explicit script, explicit docroot, environment.
    pub fn resolve(script: Option<PathBuf>, docroot: Option<PathBuf>) -> Self {
        match (script, docroot) {
            (Some(script), _) => Self::with_script(script),
            (None, Some(docroot)) => Self::from_docroot(&docroot),
            (None, None) => Self::from_env(),
        }
    }
}
