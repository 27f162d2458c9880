//! Analysis results: the server-produced summary plus detected changes
//! between two revisions of a regulation.

use serde::{Deserialize, Serialize};

/// One detected difference between two revisions.
///
/// Every field is free-form and may be absent. Serializes back under the
/// wire names for `/tasks/generate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub section: String,
    /// Change kind as reported by the backend ("added", "modified", "removed").
    #[serde(rename = "type", default)]
    pub change_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Raw `/analyze` response body. Missing fields decode to empty values.
#[derive(Debug, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// A normalized analysis result, immutable once received.
///
/// `has_changes` is derived from the change list during normalization and
/// never taken from the server.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub summary: String,
    pub changes: Vec<Change>,
    pub score: Option<f64>,
    pub has_changes: bool,
}

impl From<AnalysisResponse> for Analysis {
    fn from(resp: AnalysisResponse) -> Self {
        let has_changes = !resp.changes.is_empty();
        Self {
            summary: resp.summary,
            changes: resp.changes,
            score: resp.score,
            has_changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_normalizes_to_no_changes() {
        let resp: AnalysisResponse = serde_json::from_str("{}").unwrap();
        let analysis = Analysis::from(resp);
        assert_eq!(analysis.summary, "");
        assert!(analysis.changes.is_empty());
        assert!(analysis.score.is_none());
        assert!(!analysis.has_changes);
    }

    #[test]
    fn has_changes_is_derived_from_change_list() {
        let resp: AnalysisResponse = serde_json::from_str(
            r#"{"summary": "KYC threshold lowered", "changes": [{"section": "3.2", "type": "modified", "before": "X", "after": "Y"}]}"#,
        )
        .unwrap();
        let analysis = Analysis::from(resp);
        assert!(analysis.has_changes);
        assert_eq!(analysis.changes.len(), 1);
        assert_eq!(analysis.changes[0].section, "3.2");
        assert_eq!(analysis.changes[0].change_type, "modified");
        assert_eq!(analysis.changes[0].before.as_deref(), Some("X"));
        assert_eq!(analysis.changes[0].after.as_deref(), Some("Y"));
    }

    #[test]
    fn change_missing_fields_tolerated() {
        let change: Change = serde_json::from_str(r#"{"text": "new clause"}"#).unwrap();
        assert_eq!(change.section, "");
        assert_eq!(change.change_type, "");
        assert!(change.before.is_none());
        assert_eq!(change.text.as_deref(), Some("new clause"));
    }

    #[test]
    fn change_serializes_under_wire_names() {
        let change = Change {
            section: "4.1".into(),
            change_type: "added".into(),
            before: None,
            after: None,
            text: Some("reporting duty".into()),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["type"], "added");
        assert_eq!(json["section"], "4.1");
        // Absent optionals are omitted, not serialized as null.
        assert!(json.get("before").is_none());
    }

    #[test]
    fn score_passes_through() {
        let resp: AnalysisResponse =
            serde_json::from_str(r#"{"summary": "s", "changes": [], "score": 0.72}"#).unwrap();
        let analysis = Analysis::from(resp);
        assert_eq!(analysis.score, Some(0.72));
        assert!(!analysis.has_changes);
    }
}
