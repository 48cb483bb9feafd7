//! `cachedirs compile` — show what `apply` would write, with no side effects.

use anyhow::{Context, Result};
use clap::Args;

use cachedirs_core::compile_submission;

use super::input::SubmissionArgs;

/// Arguments for `cachedirs compile`.
#[derive(Args, Debug)]
pub struct CompileArgs {
    #[command(flatten)]
    pub submission: SubmissionArgs,

    /// Print the target path and tokens as JSON.
    #[arg(long)]
    pub json: bool,
}

impl CompileArgs {
    pub fn run(self) -> Result<()> {
        let submission = self.submission.build()?;
        let compiled = compile_submission(&submission);

        if self.json {
            let payload = serde_json::json!({
                "path": compiled.path,
                "options": compiled.options_string(),
                "tokens": compiled.tokens,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&payload)
                    .context("failed to render compiled options")?
            );
        } else {
            println!("{compiled}");
        }
        Ok(())
    }
}
