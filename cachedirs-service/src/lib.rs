//! cache_dirs service controller: stop, rewrite config, conditionally start.

mod error;
pub mod controller;
pub mod lifecycle;
pub mod paths;
pub mod telemetry;

pub use controller::{apply, apply_submission, should_start, ApplyReport, Phase};
pub use error::ServiceError;
pub use lifecycle::{CommandOutcome, Lifecycle, ScriptLifecycle, Verb};
pub use paths::ServiceConfig;
pub use telemetry::{init_tracing, LogFormat};
