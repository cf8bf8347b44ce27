//! Persistent-claim and emptyDir suggestions

use super::{round_up, Location, ResourceLabel, Suggestion};
use crate::format::{format_suggested, UNLIMITED};
use crate::models::{VolumeKind, VolumeSpec};
use crate::quantity::{normalize, Unit};
use crate::severity::{near_limit, Severity, CLAIM_BANDS, EPHEMERAL_BANDS};

/// Growth applied to a claim's capacity when it fills up
const CLAIM_GROWTH: f64 = 1.5;
/// Headroom over usage for a sized emptyDir nearing its limit
const SIZED_DIR_HEADROOM: f64 = 1.5;
/// Headroom over usage for a first emptyDir size limit
const NEW_SIZE_LIMIT_HEADROOM: f64 = 2.0;

/// Suggestions for the volumes of one pod. Volumes without observed usage
/// are skipped.
pub fn volume_suggestions(location: Location<'_>, volumes: &[VolumeSpec]) -> Vec<Suggestion> {
    let mut out = Vec::new();

    for volume in volumes {
        let usage = normalize(volume.usage.as_ref(), Unit::Bytes);
        if usage <= 0.0 {
            continue;
        }

        match volume.kind {
            VolumeKind::PersistentClaim => {
                if let Some(suggestion) = claim_suggestion(location, volume, usage) {
                    out.push(suggestion);
                }
            }
            VolumeKind::EphemeralDir => {
                if let Some(suggestion) = empty_dir_suggestion(location, volume, usage) {
                    out.push(suggestion);
                }
            }
            VolumeKind::Other => {}
        }
    }

    out
}

fn claim_suggestion(
    location: Location<'_>,
    volume: &VolumeSpec,
    usage: f64,
) -> Option<Suggestion> {
    let capacity = normalize(volume.capacity.as_ref(), Unit::Bytes);
    let pressure = near_limit(usage, capacity, CLAIM_BANDS)?;
    let claim = volume.pvc_name.as_deref().unwrap_or(&volume.name);

    Some(location.suggestion(
        claim,
        ResourceLabel::Pvc,
        pressure.severity,
        format!("PVC \"{}\" at {}% capacity", claim, pressure.percent()),
        format_suggested(capacity, Unit::Bytes),
        format_suggested(round_up(capacity.max(usage), CLAIM_GROWTH), Unit::Bytes),
    ))
}

fn empty_dir_suggestion(
    location: Location<'_>,
    volume: &VolumeSpec,
    usage: f64,
) -> Option<Suggestion> {
    let size_limit = normalize(volume.size_limit.as_ref(), Unit::Bytes);

    if size_limit <= 0.0 {
        return Some(location.suggestion(
            &volume.name,
            ResourceLabel::EmptyDir,
            Severity::Warning,
            format!("EmptyDir \"{}\" has no sizeLimit", volume.name),
            UNLIMITED.to_string(),
            format_suggested(round_up(usage, NEW_SIZE_LIMIT_HEADROOM), Unit::Bytes),
        ));
    }

    let pressure = near_limit(usage, size_limit, EPHEMERAL_BANDS)?;
    Some(location.suggestion(
        &volume.name,
        ResourceLabel::EmptyDir,
        pressure.severity,
        format!(
            "EmptyDir \"{}\" at {}% of sizeLimit",
            volume.name,
            pressure.percent()
        ),
        format_suggested(size_limit, Unit::Bytes),
        format_suggested(round_up(usage, SIZED_DIR_HEADROOM), Unit::Bytes),
    ))
}
