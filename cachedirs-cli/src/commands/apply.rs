//! `cachedirs apply` — stop, write options, conditionally start.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use cachedirs_service::{apply_submission, ApplyReport, ScriptLifecycle, Verb};

use super::input::{ScriptArgs, SubmissionArgs};

/// Arguments for `cachedirs apply`.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub submission: SubmissionArgs,

    #[command(flatten)]
    pub script: ScriptArgs,

    /// Print the apply report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ApplyArgs {
    pub fn run(self) -> Result<()> {
        let submission = self.submission.build()?;
        let config = self.script.config();
        let mut lifecycle = ScriptLifecycle::new(config.script);

        let report = match apply_submission(&mut lifecycle, &submission) {
            Ok(report) => report,
            Err(err) => {
                print_outcomes(err.report());
                return Err(err).context("failed to apply cache_dirs settings");
            }
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to render apply report")?
            );
        } else {
            print_report(&report);
        }
        Ok(())
    }
}

fn print_report(report: &ApplyReport) {
    if let Some(path) = &report.path {
        println!("{} wrote options to {}", "✓".green(), path.display());
    }
    println!("  {}", report.options);

    if !report.stopped.success() {
        println!("  {} stop {}", "!".yellow(), report.stopped);
    }
    match &report.started {
        Some(outcome) if outcome.success() => println!("{} daemon started", "✓".green()),
        Some(outcome) => println!("{} start {}", "!".yellow(), outcome),
        None => println!("  daemon left stopped (service disabled or nothing included)"),
    }
}

/// Lifecycle outcomes of an apply whose write did not happen, on stderr.
fn print_outcomes(report: &ApplyReport) {
    eprintln!("{} {}: {}", "!".yellow(), Verb::Stop, report.stopped);
    match &report.started {
        Some(outcome) => eprintln!("{} {}: {}", "!".yellow(), Verb::Start, outcome),
        None => eprintln!("  daemon left stopped (service disabled or nothing included)"),
    }
}
