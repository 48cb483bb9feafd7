//! Shared argument groups: how a submission and the control script are located.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use cachedirs_core::{SettingsError, SettingsSubmission};
use cachedirs_service::ServiceConfig;

/// Where the settings submission comes from.
///
/// Sources are read in order: `--form`, `--form-file`, then each `-f`.
/// A key seen again replaces the earlier value in place.
#[derive(Args, Debug, Default)]
pub struct SubmissionArgs {
    /// URL-encoded form body, e.g. `%23config=/boot/cache_dirs.cfg&include=/mnt/user/Media`.
    #[arg(long, value_name = "BODY")]
    pub form: Option<String>,

    /// Read a URL-encoded form body from a file (`-` for stdin).
    #[arg(long, value_name = "PATH")]
    pub form_file: Option<PathBuf>,

    /// A single submitted field.
    #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,

    /// Host default that overrides the submitted value of the same field.
    #[arg(long = "default", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub defaults: Vec<(String, String)>,
}

impl SubmissionArgs {
    pub fn build(&self) -> Result<SettingsSubmission> {
        let mut submission = SettingsSubmission::new();

        if let Some(body) = &self.form {
            submission.extend(SettingsSubmission::parse_form(body));
        }
        if let Some(path) = &self.form_file {
            let body = read_body(path)?;
            submission.extend(SettingsSubmission::parse_form(&body));
        }
        submission.extend(self.fields.iter().cloned());

        let defaults: SettingsSubmission = self.defaults.iter().cloned().collect();
        Ok(submission.with_defaults(&defaults))
    }
}

/// Where the daemon control script lives.
#[derive(Args, Debug, Default)]
pub struct ScriptArgs {
    /// Web root containing the cache_dirs plugin (default: `$DOCUMENT_ROOT` or /usr/local/emhttp).
    #[arg(long, value_name = "DIR")]
    pub docroot: Option<PathBuf>,

    /// Path to the daemon control script; overrides `--docroot`.
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,
}

impl ScriptArgs {
    pub fn config(&self) -> ServiceConfig {
        ServiceConfig::resolve(self.script.clone(), self.docroot.clone())
    }
}

fn parse_key_value(arg: &str) -> Result<(String, String), SettingsError> {
    SettingsSubmission::parse_field(arg)
}

fn read_body(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("failed to read form body from stdin")?;
        return Ok(body);
    }
    fs::read_to_string(path)
        .with_context(|| format!("failed to read form body from {}", path.display()))
}
