//! Wire types of the advisor HTTP API
//!
//! Shared by the advisor service and the CLI client so both ends agree on
//! one JSON shape.

use crate::models::{NamespaceHistory, WorkloadSpec};
use crate::ranking::{
    DisplayOptions, SeverityFilter, SuggestionGroup, SuggestionSummary, SuggestionView,
};
use crate::series::{LookbackWindow, WindowParseError};
use crate::severity::Severity;
use crate::suggestions::Suggestion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Path of the suggestions endpoint, relative to the service root
pub const SUGGESTIONS_PATH: &str = "api/v1/suggestions";

/// Body of `POST /api/v1/suggestions`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub workloads: Vec<WorkloadSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<NamespaceHistory>,
    /// Look-back window label the history was fetched over
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden_severities: Vec<Severity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub active_severities: Vec<Severity>,
    #[serde(default)]
    pub grouped: bool,
}

impl SuggestRequest {
    pub fn new(workloads: Vec<WorkloadSpec>, history: Option<NamespaceHistory>) -> Self {
        Self {
            workloads,
            history,
            ..Default::default()
        }
    }

    /// Parse the window label, if one was sent.
    ///
    /// An unknown label is an error rather than a silent fallback to 1h.
    pub fn lookback_window(&self) -> Result<Option<LookbackWindow>, WindowParseError> {
        self.window.as_deref().map(str::parse).transpose()
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            filter: SeverityFilter::hiding(self.hidden_severities.iter().copied()),
            active: self.active_severities.iter().copied().collect(),
            grouped: self.grouped,
        }
    }

    /// Namespace of the first workload, used for log context only
    pub fn namespace(&self) -> Option<&str> {
        self.workloads
            .iter()
            .map(|w| w.namespace.as_str())
            .find(|ns| !ns.is_empty())
    }
}

/// Response of `POST /api/v1/suggestions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResponse {
    pub suggestions: Vec<Suggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<SuggestionGroup>>,
    pub summary: SuggestionSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<LookbackWindow>,
    pub generated_at: DateTime<Utc>,
}

impl SuggestResponse {
    pub fn from_view(view: SuggestionView, window: Option<LookbackWindow>) -> Self {
        Self {
            suggestions: view.suggestions,
            groups: view.groups,
            summary: view.summary,
            window,
            generated_at: Utc::now(),
        }
    }
}

/// JSON error document returned with non-2xx statuses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: SuggestRequest = serde_json::from_str(r#"{"workloads": []}"#).unwrap();
        assert!(request.history.is_none());
        assert!(!request.grouped);
        assert_eq!(request.lookback_window(), Ok(None));
        assert_eq!(request.display_options(), DisplayOptions::default());
    }

    #[test]
    fn test_request_severities_and_window() {
        let request: SuggestRequest = serde_json::from_str(
            r#"{
                "workloads": [],
                "window": "24h",
                "hiddenSeverities": ["overkill"],
                "activeSeverities": ["danger"],
                "grouped": true
            }"#,
        )
        .unwrap();
        assert_eq!(request.lookback_window(), Ok(Some(LookbackWindow::OneDay)));
        let options = request.display_options();
        assert!(!options.filter.allows(Severity::Overkill));
        assert!(options.active.contains(&Severity::Danger));
        assert!(options.grouped);
    }

    #[test]
    fn test_unknown_window_is_an_error() {
        let request = SuggestRequest {
            window: Some("30m".to_string()),
            ..Default::default()
        };
        let err = request.lookback_window().unwrap_err();
        assert!(err.to_string().contains("omit it"));
    }

    #[test]
    fn test_namespace_skips_blank_entries() {
        let mut first = WorkloadSpec::default();
        first.name = "a".to_string();
        let mut second = WorkloadSpec::default();
        second.name = "b".to_string();
        second.namespace = "shop".to_string();
        let request = SuggestRequest::new(vec![first, second], None);
        assert_eq!(request.namespace(), Some("shop"));
    }

    #[test]
    fn test_response_omits_absent_groups() {
        let response = SuggestResponse::from_view(
            SuggestionView {
                suggestions: vec![],
                groups: None,
                summary: SuggestionSummary::default(),
            },
            None,
        );
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("groups").is_none());
        assert!(json.get("generatedAt").is_some());
        assert_eq!(json["summary"]["total"], 0);
    }
}
