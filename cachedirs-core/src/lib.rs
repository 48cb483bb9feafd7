//! cache_dirs core library — settings types and the option compiler.
//!
//! Public API surface:
//! - [`types`] — submission, prefix table, typed settings, compiled tokens
//! - [`error`] — [`SettingsError`]
//! - [`compiler`] — [`compile`] a submission into the daemon's option string

pub mod compiler;
pub mod error;
pub mod types;

pub use compiler::{compile, compile_settings, compile_submission, depth_token, escape_include};
pub use error::SettingsError;
pub use types::{
    CompiledOptions, Depth, OptionField, PrefixTable, Settings, SettingsSubmission, Token,
};
