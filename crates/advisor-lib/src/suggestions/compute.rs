//! CPU and memory suggestions

use super::{round_up, HistoryIndex, Location, ResourceLabel, Suggestion};
use crate::format::{format_suggested, UNLIMITED};
use crate::models::{ContainerResourceSpec, ResourceQuantity};
use crate::quantity::{normalize, Unit};
use crate::series::UsageEstimate;
use crate::severity::{
    limit_overkill, missing_limit, near_limit, request_overkill, Severity, COMPUTE_BANDS,
};

/// Headroom over p95 when a limit is nearly exhausted
const NEAR_LIMIT_HEADROOM: f64 = 1.4;
/// Headroom over mean usage when right-sizing a request
const REQUEST_HEADROOM: f64 = 1.3;
/// Headroom over p95 when right-sizing a limit
const LIMIT_HEADROOM: f64 = 1.5;
/// Headroom for a new limit backed by history
const NEW_LIMIT_HEADROOM: f64 = 1.5;
/// Headroom for a new limit backed only by a snapshot
const NEW_LIMIT_SNAPSHOT_HEADROOM: f64 = 2.0;

/// One of the two compute resources of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComputeResource {
    Cpu,
    Memory,
}

impl ComputeResource {
    fn unit(self) -> Unit {
        Unit::for_cpu(self == ComputeResource::Cpu)
    }

    fn name(self) -> &'static str {
        match self {
            ComputeResource::Cpu => "CPU",
            ComputeResource::Memory => "Memory",
        }
    }

    fn label(self) -> ResourceLabel {
        match self {
            ComputeResource::Cpu => ResourceLabel::Cpu,
            ComputeResource::Memory => ResourceLabel::Memory,
        }
    }

    fn no_limit_label(self) -> ResourceLabel {
        match self {
            ComputeResource::Cpu => ResourceLabel::CpuNoLimit,
            ComputeResource::Memory => ResourceLabel::MemoryNoLimit,
        }
    }

    fn pick(self, cpu: Option<&ResourceQuantity>, memory: Option<&ResourceQuantity>) -> f64 {
        match self {
            ComputeResource::Cpu => normalize(cpu, self.unit()),
            ComputeResource::Memory => normalize(memory, self.unit()),
        }
    }
}

/// Suggestions for the CPU and memory of one container.
///
/// Nothing is produced without a usage snapshot, and a resource whose
/// snapshot usage is 0 is skipped.
pub fn compute_suggestions_for_container(
    location: Location<'_>,
    container: &ContainerResourceSpec,
    history: &HistoryIndex<'_>,
) -> Vec<Suggestion> {
    let Some(usage) = &container.usage else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for resource in [ComputeResource::Cpu, ComputeResource::Memory] {
        let snapshot = resource.pick(usage.cpu.as_ref(), usage.memory.as_ref());
        if snapshot <= 0.0 {
            continue;
        }
        let samples = match resource {
            ComputeResource::Cpu => history.cpu(location.pod, &container.name),
            ComputeResource::Memory => history.memory(location.pod, &container.name),
        };
        let estimate = UsageEstimate::from_history(snapshot, samples);
        let request = resource.pick(
            container.requests.cpu.as_ref(),
            container.requests.memory.as_ref(),
        );
        let limit = resource.pick(
            container.limits.cpu.as_ref(),
            container.limits.memory.as_ref(),
        );

        evaluate(
            location,
            &container.name,
            resource,
            &estimate,
            request,
            limit,
            &mut out,
        );
    }
    out
}

fn evaluate(
    location: Location<'_>,
    container: &str,
    resource: ComputeResource,
    estimate: &UsageEstimate,
    request: f64,
    limit: f64,
    out: &mut Vec<Suggestion>,
) {
    let unit = resource.unit();
    let name = resource.name();

    if let Some(pressure) = near_limit(estimate.p95, limit, COMPUTE_BANDS) {
        out.push(location.suggestion(
            container,
            resource.label(),
            pressure.severity,
            format!(
                "{} usage at {}% of limit{}",
                name,
                pressure.percent(),
                qualifier(estimate, "p95")
            ),
            format_suggested(limit, unit),
            format_suggested(round_up(estimate.p95, NEAR_LIMIT_HEADROOM), unit),
        ));
    }

    if let Some(multiple) = request_overkill(estimate.mean, request) {
        out.push(location.suggestion(
            container,
            resource.label(),
            Severity::Overkill,
            format!(
                "{} request is {:.1}× actual usage{}",
                name,
                multiple,
                qualifier(estimate, "mean")
            ),
            format_suggested(request, unit),
            format_suggested(round_up(estimate.mean, REQUEST_HEADROOM), unit),
        ));
    }

    if let Some(multiple) = limit_overkill(estimate.p95, limit) {
        out.push(location.suggestion(
            container,
            resource.label(),
            Severity::Overkill,
            format!(
                "{} limit is {:.1}× peak usage{}",
                name,
                multiple,
                qualifier(estimate, "p95")
            ),
            format_suggested(limit, unit),
            format_suggested(round_up(estimate.p95, LIMIT_HEADROOM), unit),
        ));
    }

    if missing_limit(estimate.snapshot, limit) {
        let (basis, headroom) = if estimate.has_history() {
            (estimate.p95, NEW_LIMIT_HEADROOM)
        } else {
            (estimate.snapshot, NEW_LIMIT_SNAPSHOT_HEADROOM)
        };
        out.push(location.suggestion(
            container,
            resource.no_limit_label(),
            Severity::Warning,
            format!("No {} limit set{}", name, qualifier(estimate, "p95")),
            UNLIMITED.to_string(),
            format_suggested(round_up(basis.max(estimate.snapshot), headroom), unit),
        ));
    }
}

/// "(p95, high confidence)" when history backs the figure, empty otherwise
fn qualifier(estimate: &UsageEstimate, statistic: &str) -> String {
    match estimate.confidence {
        Some(confidence) => format!(" ({}, {})", statistic, confidence),
        None => String::new(),
    }
}
