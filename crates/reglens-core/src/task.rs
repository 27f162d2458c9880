//! Compliance task records and wire-payload normalization.
//!
//! Tasks are server-owned: the client reads them, transitions status through
//! approve/reject calls, and never constructs an id.

use serde::Deserialize;
use tracing::warn;

/// Review status of a compliance task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Approved,
    Rejected,
}

impl TaskStatus {
    /// Parse a wire status string, case-insensitively.
    ///
    /// Unknown values return `None` and the row is treated as legacy data.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Risk classification assigned during task generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// A task exactly as the backend sends it. Legacy rows may lack `status`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTask {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub change_type: Option<String>,
    #[serde(default)]
    pub source_clause: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl RawTask {
    /// Normalize into a [`Task`], or `None` when the status is missing or
    /// unrecognized. Dropped rows are never displayed.
    pub fn normalize(self) -> Option<Task> {
        let status = match self.status.as_deref().and_then(TaskStatus::parse) {
            Some(status) => status,
            None => {
                warn!(id = %self.id, status = ?self.status, "dropping task with missing or unknown status");
                return None;
            }
        };
        Some(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            status,
            risk_level: self.risk_level.as_deref().and_then(RiskLevel::parse),
            change_type: self.change_type,
            source_clause: self.source_clause,
            priority: self.priority,
            owner: self.owner,
            date: self.date,
        })
    }
}

/// A normalized compliance task.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub risk_level: Option<RiskLevel>,
    pub change_type: Option<String>,
    pub source_clause: Option<String>,
    pub priority: Option<String>,
    pub owner: Option<String>,
    pub date: Option<String>,
}

impl Task {
    /// Risk shown to reviewers. Tasks without a risk render as Medium.
    pub fn risk_or_default(&self) -> RiskLevel {
        self.risk_level.unwrap_or(RiskLevel::Medium)
    }
}

/// `/tasks` and `/tasks/generate` response body: either `{"tasks": [...]}`
/// or a bare array. A missing list decodes to empty.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TaskListResponse {
    Wrapped {
        #[serde(default)]
        tasks: Vec<RawTask>,
    },
    Bare(Vec<RawTask>),
}

impl TaskListResponse {
    pub fn into_raw(self) -> Vec<RawTask> {
        match self {
            Self::Wrapped { tasks } => tasks,
            Self::Bare(tasks) => tasks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(TaskStatus::parse("pending"), Some(TaskStatus::Pending));
        assert_eq!(TaskStatus::parse("Approved"), Some(TaskStatus::Approved));
        assert_eq!(TaskStatus::parse("REJECTED"), Some(TaskStatus::Rejected));
        assert_eq!(TaskStatus::parse("in_progress"), None);
        assert_eq!(TaskStatus::parse(""), None);
    }

    #[test]
    fn risk_parses_case_insensitively() {
        assert_eq!(RiskLevel::parse("High"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::parse("medium"), Some(RiskLevel::Medium));
        assert_eq!(RiskLevel::parse("LOW"), Some(RiskLevel::Low));
        assert_eq!(RiskLevel::parse("critical"), None);
    }

    #[test]
    fn statusless_row_is_dropped() {
        let raw: RawTask = serde_json::from_str(r#"{"id": "t1", "title": "Old row"}"#).unwrap();
        assert!(raw.normalize().is_none());
    }

    #[test]
    fn unknown_status_is_dropped() {
        let raw: RawTask =
            serde_json::from_str(r#"{"id": "t1", "status": "archived"}"#).unwrap();
        assert!(raw.normalize().is_none());
    }

    #[test]
    fn normalize_keeps_fields_and_parses_risk() {
        let raw: RawTask = serde_json::from_str(
            r#"{"id": "t1", "title": "Update KYC policy", "description": "Lower threshold",
                "status": "pending", "risk_level": "High", "change_type": "modified",
                "source_clause": "3.2", "owner": "Compliance"}"#,
        )
        .unwrap();
        let task = raw.normalize().unwrap();
        assert_eq!(task.id, "t1");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.risk_level, Some(RiskLevel::High));
        assert_eq!(task.source_clause.as_deref(), Some("3.2"));
        assert_eq!(task.owner.as_deref(), Some("Compliance"));
    }

    #[test]
    fn missing_risk_defaults_to_medium_for_display() {
        let raw: RawTask =
            serde_json::from_str(r#"{"id": "t1", "status": "pending"}"#).unwrap();
        let task = raw.normalize().unwrap();
        assert!(task.risk_level.is_none());
        assert_eq!(task.risk_or_default(), RiskLevel::Medium);
    }

    #[test]
    fn wrapped_and_bare_task_lists_decode_identically() {
        let wrapped: TaskListResponse =
            serde_json::from_str(r#"{"tasks": [{"id": "t1", "status": "pending"}]}"#).unwrap();
        let bare: TaskListResponse =
            serde_json::from_str(r#"[{"id": "t1", "status": "pending"}]"#).unwrap();
        let wrapped = wrapped.into_raw();
        let bare = bare.into_raw();
        assert_eq!(wrapped.len(), 1);
        assert_eq!(bare.len(), 1);
        assert_eq!(wrapped[0].id, bare[0].id);
    }

    #[test]
    fn missing_tasks_key_decodes_to_empty() {
        let resp: TaskListResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.into_raw().is_empty());
    }
}
