//! Suggestion generation
//!
//! Three generators, one per resource family:
//! - compute: CPU and memory against requests and limits
//! - ephemeral storage: a container's scratch space against its limit
//! - volumes: persistent claims and emptyDir volumes of a pod
//!
//! [`compute_suggestions`] runs all of them over a namespace snapshot and
//! returns the merged list ranked by severity. It is a pure function of its
//! inputs.

mod compute;
mod storage;
mod volume;


pub use compute::compute_suggestions_for_container;
pub use storage::ephemeral_suggestions;
pub use volume::volume_suggestions;

use crate::models::{ContainerHistory, NamespaceHistory, UsageSample, WorkloadSpec};
use crate::ranking::rank;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Resource grouping key of a suggestion.
///
/// Known kinds have a fixed display position; anything else is carried as
/// [`ResourceLabel::Other`] and shown after them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceLabel {
    Cpu,
    Memory,
    CpuNoLimit,
    MemoryNoLimit,
    EphemeralNoLimit,
    Ephemeral,
    Pvc,
    EmptyDir,
    Other(String),
}

impl ResourceLabel {
    /// Known labels in display order
    pub const DISPLAY_ORDER: [ResourceLabel; 8] = [
        ResourceLabel::Cpu,
        ResourceLabel::Memory,
        ResourceLabel::CpuNoLimit,
        ResourceLabel::MemoryNoLimit,
        ResourceLabel::EphemeralNoLimit,
        ResourceLabel::Ephemeral,
        ResourceLabel::Pvc,
        ResourceLabel::EmptyDir,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ResourceLabel::Cpu => "CPU",
            ResourceLabel::Memory => "Memory",
            ResourceLabel::CpuNoLimit => "CPU — no limit",
            ResourceLabel::MemoryNoLimit => "Memory — no limit",
            ResourceLabel::EphemeralNoLimit => "Ephemeral — no limit",
            ResourceLabel::Ephemeral => "Ephemeral",
            ResourceLabel::Pvc => "PVC",
            ResourceLabel::EmptyDir => "EmptyDir",
            ResourceLabel::Other(label) => label,
        }
    }

    /// Position in [`Self::DISPLAY_ORDER`], `None` for unrecognized labels
    pub fn display_position(&self) -> Option<usize> {
        Self::DISPLAY_ORDER.iter().position(|known| known == self)
    }
}

impl fmt::Display for ResourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ResourceLabel {
    fn from(label: String) -> Self {
        Self::DISPLAY_ORDER
            .iter()
            .find(|known| known.as_str() == label)
            .cloned()
            .unwrap_or(ResourceLabel::Other(label))
    }
}

impl From<&str> for ResourceLabel {
    fn from(label: &str) -> Self {
        ResourceLabel::from(label.to_string())
    }
}

impl From<ResourceLabel> for String {
    fn from(label: ResourceLabel) -> Self {
        match label {
            ResourceLabel::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// A single sizing suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub workload: String,
    pub pod: String,
    /// Container name, or claim/volume name for volume suggestions
    pub container: String,
    pub resource: ResourceLabel,
    pub severity: Severity,
    pub message: String,
    pub current: String,
    pub suggested: String,
}

/// Where a generator is looking, copied into every suggestion it emits
#[derive(Debug, Clone, Copy)]
pub struct Location<'a> {
    pub workload: &'a str,
    pub pod: &'a str,
}

impl<'a> Location<'a> {
    pub fn new(workload: &'a str, pod: &'a str) -> Self {
        Self { workload, pod }
    }

    pub(crate) fn suggestion(
        &self,
        container: &str,
        resource: ResourceLabel,
        severity: Severity,
        message: String,
        current: String,
        suggested: String,
    ) -> Suggestion {
        Suggestion {
            workload: self.workload.to_string(),
            pod: self.pod.to_string(),
            container: container.to_string(),
            resource,
            severity,
            message,
            current,
            suggested,
        }
    }
}

/// Usage history looked up by (pod, container). The first entry wins when
/// a key repeats.
#[derive(Debug, Default)]
pub struct HistoryIndex<'a> {
    entries: HashMap<(&'a str, &'a str), &'a ContainerHistory>,
}

impl<'a> HistoryIndex<'a> {
    pub fn new(history: Option<&'a NamespaceHistory>) -> Self {
        let mut entries = HashMap::new();
        for entry in history.map(|h| h.containers.as_slice()).unwrap_or_default() {
            entries
                .entry((entry.pod.as_str(), entry.container.as_str()))
                .or_insert(entry);
        }
        Self { entries }
    }

    pub fn get(&self, pod: &str, container: &str) -> Option<&'a ContainerHistory> {
        self.entries.get(&(pod, container)).copied()
    }

    pub fn cpu(&self, pod: &str, container: &str) -> Option<&'a [UsageSample]> {
        self.get(pod, container).map(|h| h.cpu.as_slice())
    }

    pub fn memory(&self, pod: &str, container: &str) -> Option<&'a [UsageSample]> {
        self.get(pod, container).map(|h| h.memory.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scale a usage figure by a headroom factor and round up to a whole unit.
/// Never returns less than the usage itself.
pub(crate) fn round_up(usage: f64, headroom: f64) -> f64 {
    (usage * headroom).ceil().max(usage.ceil())
}

/// Run every generator over a namespace snapshot and rank the result.
///
/// Emission order per pod is: for each container its compute suggestions
/// then its ephemeral-storage suggestions, then the pod's volumes. Ranking
/// is a stable sort by severity, so ties keep that order.
pub fn compute_suggestions(
    workloads: &[WorkloadSpec],
    history: Option<&NamespaceHistory>,
) -> Vec<Suggestion> {
    let index = HistoryIndex::new(history);
    let mut out = Vec::new();

    for workload in workloads {
        for pod in &workload.pods {
            let location = Location::new(&workload.name, &pod.name);
            for container in &pod.containers {
                out.extend(compute_suggestions_for_container(
                    location, container, &index,
                ));
                out.extend(ephemeral_suggestions(location, container));
            }
            out.extend(volume_suggestions(location, &pod.volumes));
        }
    }

    debug!(
        workloads = workloads.len(),
        with_history = !index.is_empty(),
        history_entries = index.len(),
        suggestions = out.len(),
        "Computed suggestions"
    );

    rank(out)
}
