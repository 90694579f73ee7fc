//! Package render command

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use mpkg_core::{command_available, run_command};
use mpkg_package::render::{render, RenderReport, RenderRequest};
use serde_json::Value;
use tracing::debug;

use crate::cli::RenderArgs;
use crate::output;

/// Result of trying to `git add` the rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
enum StageOutcome {
    Staged,
    Skipped(String),
}

/// Run the render command in the current directory
pub async fn run(args: RenderArgs) -> Result<()> {
    let working_dir = current_dir()?;
    let request = RenderRequest::new(working_dir.clone())
        .with_target(args.target.clone())
        .with_data(args.data.clone());

    let spinner = output::spinner(&format!("Rendering {}...", args.target));
    let result = render(&request);
    spinner.finish_and_clear();

    let report = result.with_context(|| format!("Failed to render {}", args.target))?;

    let staged = if args.stage {
        Some(stage(&report.target, &working_dir).await)
    } else {
        None
    };

    if args.json {
        output::json(&json_report(&report, staged.as_ref())?)?;
        if let Some(StageOutcome::Skipped(reason)) = &staged {
            output::warning(&format!("Skipped staging {}: {}", args.target, reason));
        }
        return Ok(());
    }

    print_report(&report);
    match staged {
        Some(StageOutcome::Staged) => output::success(&format!("Staged {}", args.target)),
        Some(StageOutcome::Skipped(reason)) => {
            output::warning(&format!("Skipped staging {}: {}", args.target, reason))
        }
        None => {}
    }

    Ok(())
}

/// The render report, plus `staged` when staging was requested
fn json_report(report: &RenderReport, staged: Option<&StageOutcome>) -> Result<Value> {
    let mut value = serde_json::to_value(report)?;
    if let (Some(outcome), Value::Object(fields)) = (staged, &mut value) {
        fields.insert(
            "staged".to_string(),
            Value::Bool(*outcome == StageOutcome::Staged),
        );
    }
    Ok(value)
}

fn current_dir() -> Result<Utf8PathBuf> {
    let dir = std::env::current_dir().context("Failed to determine current directory")?;
    Utf8PathBuf::try_from(dir).context("Current directory is not valid UTF-8")
}

fn print_report(report: &RenderReport) {
    output::success(&format!("Rendered {}", report.target));
    output::kv("Language", report.language.name());
    output::kv(
        "Comment slots",
        &report.comment_substitutions.to_string(),
    );
    output::kv("Inline slots", &report.inline_substitutions.to_string());
}

/// `git add` the target. Never fails: problems are reported as a skip.
async fn stage(target: &Utf8Path, working_dir: &Utf8Path) -> StageOutcome {
    if !command_available("git") {
        return StageOutcome::Skipped("git not found on PATH".to_string());
    }

    match run_command("git", &["add", target.as_str()], Some(working_dir.as_std_path())).await {
        Ok(out) if out.success() => StageOutcome::Staged,
        Ok(out) => {
            debug!("git add exited with {:?}: {}", out.exit_code, out.stderr());
            let reason = out
                .stderr_lines
                .first()
                .cloned()
                .unwrap_or_else(|| format!("git add exited with {:?}", out.exit_code));
            StageOutcome::Skipped(reason)
        }
        Err(e) => StageOutcome::Skipped(e.to_string()),
    }
}
