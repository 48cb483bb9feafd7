use std::path::PathBuf;

use thiserror::Error;

use crate::controller::ApplyReport;

/// Error surface for the service controller.
///
/// Lifecycle command failures are not errors; they are reported through
/// [`CommandOutcome`](crate::CommandOutcome). Both variants still carry the
/// report of the steps that did run.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("submission has no `#config` path; options were not written")]
    MissingConfigPath { report: Box<ApplyReport> },

    #[error("failed to write config at {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        report: Box<ApplyReport>,
    },
}

impl ServiceError {
    /// Stop/start outcomes of the apply that failed.
    pub fn report(&self) -> &ApplyReport {
        match self {
            ServiceError::MissingConfigPath { report } | ServiceError::ConfigWrite { report, .. } => {
                report
            }
        }
    }
}

pub(crate) fn write_err(source: std::io::Error, report: ApplyReport) -> ServiceError {
    ServiceError::ConfigWrite {
        path: report.path.clone().unwrap_or_default(),
        source,
        report: Box::new(report),
    }
}
