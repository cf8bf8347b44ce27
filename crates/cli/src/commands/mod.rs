//! CLI command implementations

pub mod prefs;
pub mod status;
pub mod suggest;

use advisor_lib::{resolve_workloads, NamespaceHistory, WorkloadSnapshot, WorkloadSpec};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// A workloads file holds either the collaborator's snapshot document or
/// a bare list of workloads
#[derive(Deserialize)]
#[serde(untagged)]
enum WorkloadsFile {
    List(Vec<WorkloadSpec>),
    Snapshot(WorkloadSnapshot),
}

/// Read workloads from a JSON file, parsing quantities given only as text
pub fn load_workloads(path: &Path) -> Result<Vec<WorkloadSpec>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read workloads file {}", path.display()))?;
    let file: WorkloadsFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse workloads file {}", path.display()))?;

    let mut workloads = match file {
        WorkloadsFile::List(workloads) => workloads,
        WorkloadsFile::Snapshot(snapshot) => snapshot.workloads,
    };
    resolve_workloads(&mut workloads);
    Ok(workloads)
}

/// Read a namespace usage history from a JSON file
pub fn load_history(path: &Path) -> Result<NamespaceHistory> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse history file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_workloads_accepts_both_shapes() {
        let dir = tempfile::tempdir().unwrap();

        let snapshot = dir.path().join("snapshot.json");
        std::fs::write(
            &snapshot,
            r#"{"workloads": [{"name": "api", "pods": []}], "metricsAvailable": true}"#,
        )
        .unwrap();
        assert_eq!(load_workloads(&snapshot).unwrap()[0].name, "api");

        let list = dir.path().join("list.json");
        std::fs::write(&list, r#"[{"name": "worker"}]"#).unwrap();
        assert_eq!(load_workloads(&list).unwrap()[0].name, "worker");
    }

    #[test]
    fn test_load_workloads_parses_raw_quantities() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.json");
        std::fs::write(
            &path,
            r#"[{"name": "api", "pods": [{"name": "api-0", "containers": [{
                "name": "server",
                "limits": {"cpu": {"raw": "1"}},
                "usage": {"cpu": {"raw": "950m"}}
            }]}]}]"#,
        )
        .unwrap();

        let workloads = load_workloads(&path).unwrap();
        let container = &workloads[0].pods[0].containers[0];
        assert_eq!(container.limits.cpu.as_ref().unwrap().millicores, Some(1000));
        let usage = container.usage.as_ref().unwrap();
        assert_eq!(usage.cpu.as_ref().unwrap().millicores, Some(950));
    }

    #[test]
    fn test_load_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = format!("{:#}", load_workloads(&missing).unwrap_err());
        assert!(err.contains("missing.json"));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "[1, 2").unwrap();
        assert!(load_history(&bad).is_err());
    }
}
