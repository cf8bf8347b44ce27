//! Core data models for the resource advisor
//!
//! These mirror the JSON documents produced by the cluster collaborator:
//! a namespace snapshot of workloads (with nested pods, containers and
//! volumes) and an optional, separately fetched usage history.

use serde::{Deserialize, Serialize};

/// A parsed Kubernetes resource quantity with the original raw string.
///
/// CPU quantities carry `millicores`, memory and storage quantities carry
/// `bytes`. Either may be absent when the boundary could not interpret the
/// raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuantity {
    #[serde(default)]
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub millicores: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<i64>,
}

impl ResourceQuantity {
    pub fn from_millicores(millicores: i64) -> Self {
        Self {
            raw: format!("{}m", millicores),
            millicores: Some(millicores),
            bytes: None,
        }
    }

    pub fn from_bytes(bytes: i64) -> Self {
        Self {
            raw: bytes.to_string(),
            millicores: None,
            bytes: Some(bytes),
        }
    }
}

/// CPU and memory quantities for requests, limits or a usage snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<ResourceQuantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<ResourceQuantity>,
}

/// Ephemeral-storage request, limit and observed usage of a container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EphemeralStorageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ResourceQuantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<ResourceQuantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ResourceQuantity>,
}

/// Declared resources and observed usage of one container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerResourceSpec {
    pub name: String,
    #[serde(default)]
    pub requests: ResourcePair,
    #[serde(default)]
    pub limits: ResourcePair,
    /// `None` when no metrics are available for the container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ResourcePair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ephemeral_storage: Option<EphemeralStorageInfo>,
}

/// Kind of a mounted volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeKind {
    #[serde(rename = "pvc")]
    PersistentClaim,
    #[serde(rename = "emptyDir")]
    EphemeralDir,
    #[serde(other, rename = "other")]
    Other,
}

/// A volume mounted by a pod
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VolumeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<ResourceQuantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvc_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access_modes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<ResourceQuantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ResourceQuantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<ResourceQuantity>,
}

impl VolumeSpec {
    pub fn new(name: impl Into<String>, kind: VolumeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            medium: None,
            size_limit: None,
            pvc_name: None,
            storage_class: None,
            access_modes: Vec::new(),
            capacity: None,
            usage: None,
            available: None,
        }
    }
}

/// A running pod of a workload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodSpec {
    pub name: String,
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub containers: Vec<ContainerResourceSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<VolumeSpec>,
}

/// A workload (Deployment, StatefulSet, ...) with its pods
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSpec {
    #[serde(default)]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub replicas: i32,
    #[serde(default)]
    pub ready_replicas: i32,
    #[serde(default)]
    pub available_replicas: i32,
    #[serde(default)]
    pub pods: Vec<PodSpec>,
}

/// Namespace snapshot as delivered by the cluster collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSnapshot {
    pub workloads: Vec<WorkloadSpec>,
    #[serde(default)]
    pub metrics_available: bool,
    #[serde(default)]
    pub prometheus_available: bool,
}

/// A single (timestamp, value) usage sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageSample {
    /// Unix seconds
    pub t: i64,
    /// Millicores for CPU, bytes for memory
    pub v: f64,
}

/// CPU and memory usage series of one container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerHistory {
    pub pod: String,
    pub container: String,
    #[serde(default)]
    pub cpu: Vec<UsageSample>,
    #[serde(default)]
    pub memory: Vec<UsageSample>,
}

/// Usage history of every container in a namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceHistory {
    #[serde(default)]
    pub containers: Vec<ContainerHistory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_collaborator_snapshot() {
        let json = r#"{
            "workloads": [{
                "kind": "Deployment",
                "name": "api",
                "namespace": "shop",
                "replicas": 2,
                "readyReplicas": 2,
                "availableReplicas": 2,
                "pods": [{
                    "name": "api-7d9f",
                    "phase": "Running",
                    "containers": [{
                        "name": "api",
                        "requests": {
                            "cpu": {"raw": "250m", "millicores": 250},
                            "memory": {"raw": ""}
                        },
                        "limits": {"cpu": {"raw": "500m", "millicores": 500}},
                        "usage": {"cpu": {"raw": "480m", "millicores": 480}},
                        "ephemeralStorage": {"usage": {"raw": "10Mi", "bytes": 10485760}}
                    }],
                    "volumes": [
                        {
                            "name": "data",
                            "type": "pvc",
                            "pvcName": "data-0",
                            "capacity": {"raw": "1Gi", "bytes": 1073741824}
                        },
                        {"name": "scratch", "type": "emptyDir"},
                        {"name": "config", "type": "configMap"}
                    ]
                }]
            }],
            "metricsAvailable": true,
            "prometheusAvailable": false
        }"#;

        let snapshot: WorkloadSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.metrics_available);
        let pod = &snapshot.workloads[0].pods[0];
        let container = &pod.containers[0];
        assert_eq!(container.limits.cpu.as_ref().unwrap().millicores, Some(500));
        assert_eq!(container.requests.memory.as_ref().unwrap().bytes, None);
        assert!(container.limits.memory.is_none());
        assert!(container.ephemeral_storage.is_some());
        assert_eq!(pod.volumes[0].kind, VolumeKind::PersistentClaim);
        assert_eq!(pod.volumes[1].kind, VolumeKind::EphemeralDir);
        assert_eq!(pod.volumes[2].kind, VolumeKind::Other);
    }

    #[test]
    fn test_deserialize_history() {
        let json = r#"{"containers": [{"pod": "api-7d9f", "container": "api",
            "cpu": [{"t": 1700000000, "v": 120.5}], "memory": []}]}"#;
        let history: NamespaceHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history.containers[0].cpu.len(), 1);
        assert!(history.containers[0].memory.is_empty());
    }
}
