//! `kadj status`: per-resource status badges

use advisor_lib::format::format_quantity;
use advisor_lib::quantity::Unit;
use advisor_lib::status::{volume_status, ContainerStatus, ResourceStatus};
use advisor_lib::{ContainerResourceSpec, ResourceQuantity, VolumeSpec, WorkloadSpec};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

use super::load_workloads;
use crate::output::{color_status, print_json, print_warning, render_table, OutputFormat};

/// Row for the container status table
#[derive(Tabled)]
struct ContainerRow {
    #[tabled(rename = "Workload")]
    workload: String,
    #[tabled(rename = "Pod")]
    pod: String,
    #[tabled(rename = "Container")]
    container: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Ephemeral")]
    ephemeral: String,
}

/// Row for the volume status table
#[derive(Tabled)]
struct VolumeRow {
    #[tabled(rename = "Workload")]
    workload: String,
    #[tabled(rename = "Pod")]
    pod: String,
    #[tabled(rename = "Volume")]
    volume: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodStatusReport {
    pub workload: String,
    pub pod: String,
    pub containers: Vec<ContainerStatus>,
    pub volumes: Vec<VolumeStatusEntry>,
}

#[derive(Debug, Serialize)]
pub struct VolumeStatusEntry {
    pub name: String,
    pub status: ResourceStatus,
}

/// Status badges of every pod, in input order
pub fn collect(workloads: &[WorkloadSpec]) -> Vec<PodStatusReport> {
    workloads
        .iter()
        .flat_map(|workload| {
            workload.pods.iter().map(move |pod| PodStatusReport {
                workload: workload.name.clone(),
                pod: pod.name.clone(),
                containers: pod.containers.iter().map(ContainerStatus::evaluate).collect(),
                volumes: pod
                    .volumes
                    .iter()
                    .map(|v| VolumeStatusEntry {
                        name: v.name.clone(),
                        status: volume_status(v),
                    })
                    .collect(),
            })
        })
        .collect()
}

/// Badge followed by "usage / limit"
fn badge_cell(
    status: ResourceStatus,
    usage: Option<&ResourceQuantity>,
    limit: Option<&ResourceQuantity>,
    unit: Unit,
) -> String {
    format!(
        "{} {} / {}",
        color_status(status),
        format_quantity(usage, unit),
        format_quantity(limit, unit)
    )
}

fn container_row(workload: &str, pod: &str, container: &ContainerResourceSpec) -> ContainerRow {
    let status = ContainerStatus::evaluate(container);
    let usage = container.usage.as_ref();
    let ephemeral = container.ephemeral_storage.as_ref();
    ContainerRow {
        workload: workload.to_string(),
        pod: pod.to_string(),
        container: container.name.clone(),
        cpu: badge_cell(
            status.cpu,
            usage.and_then(|u| u.cpu.as_ref()),
            container.limits.cpu.as_ref(),
            Unit::Millicores,
        ),
        memory: badge_cell(
            status.memory,
            usage.and_then(|u| u.memory.as_ref()),
            container.limits.memory.as_ref(),
            Unit::Bytes,
        ),
        ephemeral: badge_cell(
            status.ephemeral_storage,
            ephemeral.and_then(|e| e.usage.as_ref()),
            ephemeral.and_then(|e| e.limit.as_ref()),
            Unit::Bytes,
        ),
    }
}

fn volume_row(workload: &str, pod: &str, volume: &VolumeSpec) -> VolumeRow {
    let bound = volume.capacity.as_ref().or(volume.size_limit.as_ref());
    VolumeRow {
        workload: workload.to_string(),
        pod: pod.to_string(),
        volume: volume.name.clone(),
        status: badge_cell(volume_status(volume), volume.usage.as_ref(), bound, Unit::Bytes),
    }
}

/// Print status badges for a workloads file
pub fn run(workloads: &Path, format: OutputFormat) -> Result<()> {
    let workloads = load_workloads(workloads)?;

    if format == OutputFormat::Json {
        return print_json(&collect(&workloads));
    }

    let pods: Vec<_> = workloads
        .iter()
        .flat_map(|w| w.pods.iter().map(move |p| (w.name.as_str(), p)))
        .collect();
    if pods.is_empty() {
        print_warning("No pods found");
        return Ok(());
    }

    let containers: Vec<ContainerRow> = pods
        .iter()
        .flat_map(|(workload, pod)| {
            pod.containers
                .iter()
                .map(move |c| container_row(workload, &pod.name, c))
        })
        .collect();
    println!("{}", render_table(containers));

    let volumes: Vec<VolumeRow> = pods
        .iter()
        .flat_map(|(workload, pod)| {
            pod.volumes
                .iter()
                .map(move |v| volume_row(workload, &pod.name, v))
        })
        .collect();
    if !volumes.is_empty() {
        println!("\n{}", render_table(volumes));
    }

    Ok(())
}
