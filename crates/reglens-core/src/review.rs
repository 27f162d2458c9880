//! Task-review workflow: the filtered task board, the review stage machine,
//! and the per-session analysis context.

use crate::analysis::Analysis;
use crate::task::{RawTask, Task, TaskStatus};

/// Server-ordered task list with invalid rows already filtered out.
///
/// The board never reorders: the current task is always the first pending
/// entry in server response order.
#[derive(Debug, Clone, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    /// Build a board from raw wire tasks, dropping rows without a valid status.
    pub fn from_raw(raw: Vec<RawTask>) -> Self {
        Self {
            tasks: raw.into_iter().filter_map(RawTask::normalize).collect(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// The one task under review: first pending in server order, if any.
    pub fn current(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.status == TaskStatus::Pending)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .count()
    }

    /// Approved tasks in server order, for the audit list.
    pub fn approved(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Approved)
            .collect()
    }

    pub fn rejected(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Rejected)
            .collect()
    }
}

/// Stage of the approve/reject/export cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStage {
    /// No changes available and no tasks exist.
    NoAnalysis,
    /// Changes available, task list still empty.
    AwaitingGeneration,
    /// At least one pending task remains.
    Reviewing,
    /// Zero pending tasks remain. Terminal for the session.
    Complete,
}

/// Compute the review stage from change availability and the task board.
pub fn review_stage(changes_available: bool, board: &TaskBoard) -> ReviewStage {
    if board.is_empty() {
        if changes_available {
            ReviewStage::AwaitingGeneration
        } else {
            ReviewStage::NoAnalysis
        }
    } else if board.pending_count() > 0 {
        ReviewStage::Reviewing
    } else {
        ReviewStage::Complete
    }
}

/// Per-session analysis state with an explicit lifecycle: populated by a
/// successful analyze call, cleared on back navigation or a new upload.
#[derive(Debug, Default)]
pub struct ReviewContext {
    analysis: Option<Analysis>,
}

impl ReviewContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_analysis(analysis: Analysis) -> Self {
        Self {
            analysis: Some(analysis),
        }
    }

    /// Install a fresh analysis result, replacing any previous one.
    pub fn begin(&mut self, analysis: Analysis) {
        self.analysis = Some(analysis);
    }

    /// Drop the current analysis ("Back" / new upload).
    pub fn clear(&mut self) {
        self.analysis = None;
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub fn has_changes(&self) -> bool {
        self.analysis.as_ref().is_some_and(|a| a.has_changes)
    }

    pub fn stage(&self, board: &TaskBoard) -> ReviewStage {
        review_stage(self.has_changes(), board)
    }
}
