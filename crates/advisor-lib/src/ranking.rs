//! Ranking, filtering and grouping of suggestions
//!
//! Everything here reorders or drops items from a list the generators
//! already produced. No function changes what a generator emits.

use crate::severity::Severity;
use crate::suggestions::{ResourceLabel, Suggestion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stable sort by severity rank: danger, then warning, then overkill
pub fn rank(mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    suggestions.sort_by_key(|s| s.severity.rank());
    suggestions
}

/// Suggestions sharing one resource label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionGroup {
    pub resource: ResourceLabel,
    pub items: Vec<Suggestion>,
}

/// Group by resource label.
///
/// Known labels come first in [`ResourceLabel::DISPLAY_ORDER`], unknown
/// labels follow in first-seen order. Each group is severity-sorted.
pub fn group_by_resource(suggestions: &[Suggestion]) -> Vec<SuggestionGroup> {
    let mut groups: Vec<SuggestionGroup> = Vec::new();
    for suggestion in suggestions {
        match groups
            .iter_mut()
            .find(|g| g.resource == suggestion.resource)
        {
            Some(group) => group.items.push(suggestion.clone()),
            None => groups.push(SuggestionGroup {
                resource: suggestion.resource.clone(),
                items: vec![suggestion.clone()],
            }),
        }
    }

    for group in &mut groups {
        group.items.sort_by_key(|s| s.severity.rank());
    }
    // Stable, so unknown labels (all keyed usize::MAX) keep first-seen order
    groups.sort_by_key(|g| g.resource.display_position().unwrap_or(usize::MAX));
    groups
}

/// Persisted preference: severities the reader chose to hide
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityFilter {
    #[serde(default)]
    pub hidden: BTreeSet<Severity>,
}

impl SeverityFilter {
    pub fn hiding(hidden: impl IntoIterator<Item = Severity>) -> Self {
        Self {
            hidden: hidden.into_iter().collect(),
        }
    }

    pub fn allows(&self, severity: Severity) -> bool {
        !self.hidden.contains(&severity)
    }

    pub fn hide(&mut self, severity: Severity) -> bool {
        self.hidden.insert(severity)
    }

    pub fn unhide(&mut self, severity: Severity) -> bool {
        self.hidden.remove(&severity)
    }

    pub fn apply(&self, suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
        suggestions
            .into_iter()
            .filter(|s| self.allows(s.severity))
            .collect()
    }
}

/// Transient highlight filter. An empty set means "everything active".
pub fn filter_active(suggestions: Vec<Suggestion>, active: &BTreeSet<Severity>) -> Vec<Suggestion> {
    if active.is_empty() {
        return suggestions;
    }
    suggestions
        .into_iter()
        .filter(|s| active.contains(&s.severity))
        .collect()
}

/// Counts per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionSummary {
    pub danger: usize,
    pub warning: usize,
    pub overkill: usize,
    pub total: usize,
}

impl SuggestionSummary {
    pub fn from_suggestions(suggestions: &[Suggestion]) -> Self {
        let mut summary = Self::default();
        for suggestion in suggestions {
            match suggestion.severity {
                Severity::Danger => summary.danger += 1,
                Severity::Warning => summary.warning += 1,
                Severity::Overkill => summary.overkill += 1,
            }
            summary.total += 1;
        }
        summary
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Danger => self.danger,
            Severity::Warning => self.warning,
            Severity::Overkill => self.overkill,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// How a caller wants the ranked list presented
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub filter: SeverityFilter,
    pub active: BTreeSet<Severity>,
    pub grouped: bool,
}

/// Filtered list, optional grouping and the counts of what remains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionView {
    pub suggestions: Vec<Suggestion>,
    pub groups: Option<Vec<SuggestionGroup>>,
    pub summary: SuggestionSummary,
}

/// Apply both filters, then group when asked
pub fn present(suggestions: Vec<Suggestion>, options: &DisplayOptions) -> SuggestionView {
    let visible = filter_active(options.filter.apply(rank(suggestions)), &options.active);
    let groups = options.grouped.then(|| group_by_resource(&visible));
    SuggestionView {
        summary: SuggestionSummary::from_suggestions(&visible),
        groups,
        suggestions: visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(container: &str, resource: &str, severity: Severity) -> Suggestion {
        Suggestion {
            workload: "web".to_string(),
            pod: "web-0".to_string(),
            container: container.to_string(),
            resource: ResourceLabel::from(resource),
            severity,
            message: String::new(),
            current: String::new(),
            suggested: String::new(),
        }
    }

    #[test]
    fn test_rank_is_stable() {
        let ranked = rank(vec![
            suggestion("a", "CPU", Severity::Overkill),
            suggestion("b", "CPU", Severity::Warning),
            suggestion("c", "Memory", Severity::Danger),
            suggestion("d", "CPU", Severity::Warning),
            suggestion("e", "PVC", Severity::Danger),
        ]);
        let order: Vec<&str> = ranked.iter().map(|s| s.container.as_str()).collect();
        assert_eq!(order, vec!["c", "e", "b", "d", "a"]);
    }

    #[test]
    fn test_group_display_order_with_unknown_labels() {
        let groups = group_by_resource(&[
            suggestion("a", "GPU", Severity::Warning),
            suggestion("b", "EmptyDir", Severity::Warning),
            suggestion("c", "Memory", Severity::Overkill),
            suggestion("d", "Hugepages", Severity::Danger),
            suggestion("e", "Memory", Severity::Danger),
            suggestion("f", "Ephemeral — no limit", Severity::Warning),
            suggestion("g", "CPU", Severity::Warning),
        ]);
        let labels: Vec<String> = groups.iter().map(|g| g.resource.to_string()).collect();
        assert_eq!(
            labels,
            vec!["CPU", "Memory", "Ephemeral — no limit", "EmptyDir", "GPU", "Hugepages"]
        );

        let memory: Vec<&str> = groups[1].items.iter().map(|s| s.container.as_str()).collect();
        assert_eq!(memory, vec!["e", "c"]);
    }

    #[test]
    fn test_unknown_label_round_trips_as_other() {
        let label = ResourceLabel::from("GPU");
        assert_eq!(label, ResourceLabel::Other("GPU".to_string()));
        assert_eq!(ResourceLabel::from("PVC"), ResourceLabel::Pvc);
    }

    #[test]
    fn test_hidden_severities_filter() {
        let filter = SeverityFilter::hiding([Severity::Overkill]);
        let kept = filter.apply(vec![
            suggestion("a", "CPU", Severity::Overkill),
            suggestion("b", "CPU", Severity::Danger),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].container, "b");
    }

    #[test]
    fn test_active_filter_empty_means_all() {
        let list = vec![
            suggestion("a", "CPU", Severity::Overkill),
            suggestion("b", "CPU", Severity::Danger),
        ];
        assert_eq!(filter_active(list.clone(), &BTreeSet::new()).len(), 2);
        let active: BTreeSet<_> = [Severity::Danger].into_iter().collect();
        assert_eq!(filter_active(list, &active)[0].container, "b");
    }

    #[test]
    fn test_present_filters_before_grouping() {
        let options = DisplayOptions {
            filter: SeverityFilter::hiding([Severity::Warning]),
            active: BTreeSet::new(),
            grouped: true,
        };
        let view = present(
            vec![
                suggestion("a", "EmptyDir", Severity::Warning),
                suggestion("b", "CPU", Severity::Overkill),
                suggestion("c", "CPU", Severity::Danger),
            ],
            &options,
        );
        let groups = view.groups.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(view.summary.total, 2);
        assert_eq!(view.summary.count(Severity::Danger), 1);
        assert_eq!(view.summary.warning, 0);
        assert_eq!(view.suggestions[0].container, "c");
    }
}
