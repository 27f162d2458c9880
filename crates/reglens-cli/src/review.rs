//! Interactive review loop: fetch, stage, render, prompt, act.
//!
//! Errors from any call land in a single banner with a retry prompt; retrying
//! clears the error and re-fetches the task list. There is no classification
//! and no backoff.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use reglens_client::{ApiClient, ApiError};
use reglens_core::{ReviewContext, ReviewStage};

use crate::display;

/// Report title sent to the backend when none is given.
pub const DEFAULT_REPORT_NAME: &str = "RegLens Compliance Sign-off";

/// What the reviewer chose at the task prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReviewAction {
    Approve,
    Reject,
    Quit,
}

impl ReviewAction {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "a" | "approve" => Some(Self::Approve),
            "r" | "reject" => Some(Self::Reject),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Drive the approve/reject/export cycle until the board is complete or the
/// reviewer quits.
///
/// One task is shown at a time: the first pending entry in server response
/// order. Every action re-fetches the list; there is no optimistic mutation.
pub async fn run(
    client: &ApiClient,
    ctx: &ReviewContext,
    approved_by: Option<&str>,
) -> anyhow::Result<()> {
    loop {
        let board = match client.get_tasks().await {
            Ok(board) => board,
            Err(err) => {
                if retry_banner(&err)? {
                    continue;
                }
                return Ok(());
            }
        };

        match ctx.stage(&board) {
            ReviewStage::NoAnalysis => {
                println!("No analysis data available. Run `reglens analyze <old> <new>` first.");
                return Ok(());
            }
            ReviewStage::AwaitingGeneration => {
                let changes = ctx.analysis().map(|a| a.changes.as_slice()).unwrap_or(&[]);
                println!("{} change(s) ready for task generation.", changes.len());
                if !confirm("Generate compliance tasks now?")? {
                    return Ok(());
                }
                if let Err(err) = client.generate_tasks(changes).await {
                    if !retry_banner(&err)? {
                        return Ok(());
                    }
                }
                // Loop back for an explicit re-fetch of the board.
            }
            ReviewStage::Reviewing => {
                let Some(task) = board.current() else {
                    continue;
                };
                println!();
                display::print_task_card(task, board.pending_count());
                match prompt_action()? {
                    ReviewAction::Approve => {
                        if let Err(err) = client.approve_task(&task.id, approved_by).await {
                            if !retry_banner(&err)? {
                                return Ok(());
                            }
                        }
                    }
                    ReviewAction::Reject => {
                        if let Err(err) = client.reject_task(&task.id).await {
                            if !retry_banner(&err)? {
                                return Ok(());
                            }
                        }
                    }
                    ReviewAction::Quit => return Ok(()),
                }
            }
            ReviewStage::Complete => {
                println!();
                display::print_review_complete(&board);
                if confirm("Download the PDF sign-off report?")? {
                    export(client, DEFAULT_REPORT_NAME, None).await?;
                }
                return Ok(());
            }
        }
    }
}

/// Download the sign-off PDF. Fails loudly; nothing is written on error.
pub async fn export(
    client: &ApiClient,
    name: &str,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let bytes = client.export_tasks_pdf(name).await?;
    let path = out.unwrap_or_else(default_report_path);
    std::fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    println!("Report written to {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

fn default_report_path() -> PathBuf {
    PathBuf::from(format!(
        "Compliance_Report_{}.pdf",
        chrono::Utc::now().format("%Y-%m-%d")
    ))
}

// ── Prompts ──

/// Single global error banner with a retry affordance. Returns true when the
/// reviewer chose to retry.
fn retry_banner(err: &ApiError) -> anyhow::Result<bool> {
    eprintln!("error: {err}");
    let answer = prompt_line("[r]etry / [q]uit > ")?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "r" | "retry"
    ))
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    let answer = prompt_line(&format!("{question} [y/N] > "))?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn prompt_action() -> anyhow::Result<ReviewAction> {
    loop {
        let answer = prompt_line("[a]pprove / [r]eject / [q]uit > ")?;
        if let Some(action) = ReviewAction::parse(&answer) {
            return Ok(action);
        }
        println!("Unrecognized input.");
    }
}

fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    io::stdout().flush().context("flushing prompt")?;
    let mut line = String::new();
    io::stdin().read_line(&mut line).context("reading input")?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_parses_short_and_long_forms() {
        assert_eq!(ReviewAction::parse("a"), Some(ReviewAction::Approve));
        assert_eq!(ReviewAction::parse("approve\n"), Some(ReviewAction::Approve));
        assert_eq!(ReviewAction::parse(" R "), Some(ReviewAction::Reject));
        assert_eq!(ReviewAction::parse("quit"), Some(ReviewAction::Quit));
        assert_eq!(ReviewAction::parse("skip"), None);
        assert_eq!(ReviewAction::parse(""), None);
    }

    #[test]
    fn default_report_path_is_dated_pdf() {
        let path = default_report_path();
        let name = path.to_string_lossy();
        assert!(name.starts_with("Compliance_Report_"));
        assert!(name.ends_with(".pdf"));
    }
}
