//! Error types for cachedirs-core.

use thiserror::Error;

/// Errors raised while assembling a [`SettingsSubmission`](crate::SettingsSubmission)
/// from textual input.
///
/// Compilation itself never fails; malformed values degrade or pass through.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// A `key=value` argument had no `=` or an empty key.
    #[error("invalid field '{arg}': expected KEY=VALUE")]
    InvalidField { arg: String },
}
