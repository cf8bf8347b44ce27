//! Per-resource status badges
//!
//! A single-sample view of one resource used for usage bars: it looks at
//! the snapshot only and never consults history.

use crate::models::{ContainerResourceSpec, ResourceQuantity, VolumeKind, VolumeSpec};
use crate::quantity::{normalize, Unit};
use crate::severity::{CLAIM_BANDS, COMPUTE_BANDS, REQUEST_OVERKILL_RATIO};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Danger,
    Warning,
    Overkill,
    Healthy,
    /// No usable usage figure
    None,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Danger => "danger",
            ResourceStatus::Warning => "warning",
            ResourceStatus::Overkill => "overkill",
            ResourceStatus::Healthy => "healthy",
            ResourceStatus::None => "none",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a CPU or memory resource
pub fn resource_status(
    usage: Option<&ResourceQuantity>,
    request: Option<&ResourceQuantity>,
    limit: Option<&ResourceQuantity>,
    unit: Unit,
) -> ResourceStatus {
    let used = normalize(usage, unit);
    if used <= 0.0 {
        return ResourceStatus::None;
    }
    let limit = normalize(limit, unit);
    let request = normalize(request, unit);

    if limit > 0.0 {
        let ratio = used / limit;
        if ratio >= COMPUTE_BANDS.danger {
            return ResourceStatus::Danger;
        }
        if ratio >= COMPUTE_BANDS.warning {
            return ResourceStatus::Warning;
        }
    }
    if request > 0.0 && used / request <= REQUEST_OVERKILL_RATIO {
        return ResourceStatus::Overkill;
    }
    ResourceStatus::Healthy
}

/// Status of a storage resource. An absent limit is always flagged.
pub fn storage_status(
    usage: Option<&ResourceQuantity>,
    capacity: Option<&ResourceQuantity>,
    has_limit: bool,
) -> ResourceStatus {
    let used = normalize(usage, Unit::Bytes);
    if used <= 0.0 {
        return ResourceStatus::None;
    }
    if !has_limit {
        return ResourceStatus::Warning;
    }
    let capacity = normalize(capacity, Unit::Bytes);
    if capacity <= 0.0 {
        return ResourceStatus::None;
    }
    let ratio = used / capacity;
    if ratio >= CLAIM_BANDS.danger {
        ResourceStatus::Danger
    } else if ratio >= CLAIM_BANDS.warning {
        ResourceStatus::Warning
    } else {
        ResourceStatus::Healthy
    }
}

/// Badges for every resource of one container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStatus {
    pub container: String,
    pub cpu: ResourceStatus,
    pub memory: ResourceStatus,
    pub ephemeral_storage: ResourceStatus,
}

impl ContainerStatus {
    pub fn evaluate(container: &ContainerResourceSpec) -> Self {
        let usage = container.usage.as_ref();
        let ephemeral_storage = container
            .ephemeral_storage
            .as_ref()
            .map(|eph| {
                let limit = eph
                    .limit
                    .as_ref()
                    .filter(|l| normalize(Some(*l), Unit::Bytes) > 0.0);
                storage_status(eph.usage.as_ref(), limit, limit.is_some())
            })
            .unwrap_or(ResourceStatus::None);

        Self {
            container: container.name.clone(),
            cpu: resource_status(
                usage.and_then(|u| u.cpu.as_ref()),
                container.requests.cpu.as_ref(),
                container.limits.cpu.as_ref(),
                Unit::Millicores,
            ),
            memory: resource_status(
                usage.and_then(|u| u.memory.as_ref()),
                container.requests.memory.as_ref(),
                container.limits.memory.as_ref(),
                Unit::Bytes,
            ),
            ephemeral_storage,
        }
    }
}

/// Badge for a mounted volume
pub fn volume_status(volume: &VolumeSpec) -> ResourceStatus {
    match volume.kind {
        VolumeKind::PersistentClaim => {
            storage_status(volume.usage.as_ref(), volume.capacity.as_ref(), true)
        }
        VolumeKind::EphemeralDir => {
            let size_limit = volume
                .size_limit
                .as_ref()
                .filter(|l| normalize(Some(*l), Unit::Bytes) > 0.0);
            storage_status(volume.usage.as_ref(), size_limit, size_limit.is_some())
        }
        VolumeKind::Other => ResourceStatus::None,
    }
}
