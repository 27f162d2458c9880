//! Terminal rendering for analyses, change cards, and compliance tasks.

use reglens_core::{Analysis, Change, Task, TaskBoard};

// ── Analysis ──

/// Print the analysis summary and one card per detected change.
pub fn print_analysis(analysis: &Analysis) {
    println!("=== Analysis ===");
    if analysis.summary.is_empty() {
        println!("No output received");
    } else {
        println!("{}", analysis.summary);
    }
    if let Some(score) = analysis.score {
        println!();
        println!("Score: {score:.2}");
    }
    println!();

    if !analysis.has_changes {
        println!("No changes detected between the two revisions.");
        return;
    }

    println!("{} change(s) detected:", analysis.changes.len());
    println!();
    for change in &analysis.changes {
        print_change_card(change);
    }
}

fn print_change_card(change: &Change) {
    let kind = if change.change_type.is_empty() {
        "change"
    } else {
        change.change_type.as_str()
    };
    let section = if change.section.is_empty() {
        "-"
    } else {
        change.section.as_str()
    };
    println!("  [{kind}] Section {section}");
    if let Some(before) = &change.before {
        println!("    Original: {before}");
    }
    if let Some(after) = &change.after {
        println!("    New:      {after}");
    }
    if let Some(text) = &change.text {
        println!("    {text}");
    }
    println!();
}

// ── Tasks ──

/// Print the dashboard listing of every task on the board.
pub fn print_task_list(board: &TaskBoard) {
    if board.is_empty() {
        println!("No tasks generated yet.");
        return;
    }

    println!(
        "{} task(s): {} pending, {} approved, {} rejected",
        board.len(),
        board.pending_count(),
        board.approved().len(),
        board.rejected().len()
    );
    println!();
    for task in board.tasks() {
        println!(
            "  {:<10} [{:<8}] {}",
            task.id,
            task.status.as_str(),
            task.title
        );
        if !task.description.is_empty() {
            println!("             {}", task.description);
        }
        let mut meta = vec![format!("{} Risk", task.risk_or_default().as_str())];
        if let Some(clause) = &task.source_clause {
            meta.push(format!("source {clause}"));
        }
        if let Some(kind) = &task.change_type {
            meta.push(kind.clone());
        }
        if let Some(priority) = &task.priority {
            meta.push(format!("priority {priority}"));
        }
        if let Some(owner) = &task.owner {
            meta.push(owner.clone());
        }
        println!("             {}", meta.join(", "));
        println!();
    }
}

/// Print the single task under review as a card.
pub fn print_task_card(task: &Task, remaining: usize) {
    println!("=== {} ===", task.title);
    println!("  {:<14} {} Risk", "risk", task.risk_or_default().as_str());
    if let Some(clause) = &task.source_clause {
        println!("  {:<14} {clause}", "source clause");
    }
    if let Some(kind) = &task.change_type {
        println!("  {:<14} {kind}", "change type");
    }
    if let Some(owner) = &task.owner {
        println!("  {:<14} {owner}", "owner");
    }
    if let Some(date) = &task.date {
        println!("  {:<14} {date}", "date");
    }
    println!();
    if !task.description.is_empty() {
        println!("  \"{}\"", task.description);
        println!();
    }
    println!("  {remaining} remaining");
}

/// Print the terminal review-complete screen with the approved audit list.
pub fn print_review_complete(board: &TaskBoard) {
    let approved = board.approved();
    println!(
        "Review complete. {} compliance task(s) finalized.",
        approved.len()
    );
    if approved.is_empty() {
        return;
    }

    println!();
    println!("Audit trail (approved items):");
    for task in approved {
        println!(
            "  {:<10} [{} Risk] {}",
            task.id,
            task.risk_or_default().as_str(),
            task.title
        );
        if let Some(clause) = &task.source_clause {
            println!("             source {clause}");
        }
    }
}

// ── Documents ──

pub fn print_document_list(docs: &[String]) {
    if docs.is_empty() {
        println!("No documents found. Upload one to get started.");
        return;
    }
    println!("{} document(s):", docs.len());
    for name in docs {
        println!("  {name}");
    }
}
