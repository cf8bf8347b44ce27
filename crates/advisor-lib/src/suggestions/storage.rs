//! Ephemeral-storage suggestions

use super::{round_up, Location, ResourceLabel, Suggestion};
use crate::format::{format_suggested, UNLIMITED};
use crate::models::ContainerResourceSpec;
use crate::quantity::{normalize, Unit};
use crate::severity::{missing_limit, near_limit, Severity, EPHEMERAL_BANDS};

/// Headroom over usage when the limit is nearly exhausted
const NEAR_LIMIT_HEADROOM: f64 = 1.5;
/// Headroom over usage for a first limit
const NEW_LIMIT_HEADROOM: f64 = 2.0;

/// Near-limit and missing-limit checks for a container's ephemeral storage.
/// Skipped when usage is absent or 0.
pub fn ephemeral_suggestions(
    location: Location<'_>,
    container: &ContainerResourceSpec,
) -> Vec<Suggestion> {
    let Some(storage) = &container.ephemeral_storage else {
        return Vec::new();
    };
    let usage = normalize(storage.usage.as_ref(), Unit::Bytes);
    if usage <= 0.0 {
        return Vec::new();
    }
    let limit = normalize(storage.limit.as_ref(), Unit::Bytes);

    if missing_limit(usage, limit) {
        return vec![location.suggestion(
            &container.name,
            ResourceLabel::EphemeralNoLimit,
            Severity::Warning,
            "No ephemeral-storage limit set".to_string(),
            UNLIMITED.to_string(),
            format_suggested(round_up(usage, NEW_LIMIT_HEADROOM), Unit::Bytes),
        )];
    }

    near_limit(usage, limit, EPHEMERAL_BANDS)
        .map(|pressure| {
            location.suggestion(
                &container.name,
                ResourceLabel::Ephemeral,
                pressure.severity,
                format!("Ephemeral usage at {}% of limit", pressure.percent()),
                format_suggested(limit, Unit::Bytes),
                format_suggested(round_up(usage, NEAR_LIMIT_HEADROOM), Unit::Bytes),
            )
        })
        .into_iter()
        .collect()
}
