//! Infrastructure state builder
//!
//! Converts operator-supplied environment input into the computed snapshot
//! that scenario calculations run against: per-cluster capacity, N-1 and
//! HA-aware usable memory, failure tolerance, and workload-derived totals.

use chrono::Utc;

use crate::models::{
    ClusterConfig, ClusterState, EnvironmentInput, HaStatus, InfrastructureState,
};
use crate::scenario::classify_cpu_risk;

/// Fraction of N-1 memory left after host-level overhead
const HOST_OVERHEAD_FRACTION: f64 = 0.9;

impl EnvironmentInput {
    /// Builds the computed infrastructure snapshot from this input.
    pub fn to_state(&self) -> InfrastructureState {
        let totals = WorkloadTotals::resolve(self);

        let mut state = InfrastructureState {
            name: self.name.clone(),
            clusters: Vec::with_capacity(self.clusters.len()),
            platform_vms_gb: self.platform_vms_gb,
            total_app_memory_gb: totals.app_memory_gb,
            total_app_disk_gb: totals.app_disk_gb,
            total_app_instances: totals.app_instances,
            max_instance_memory_mb: totals.max_instance_memory_mb,
            timestamp: Utc::now(),
            ..Default::default()
        };

        for cluster_config in &self.clusters {
            let cluster = build_cluster_state(cluster_config);

            state.total_memory_gb += cluster.memory_gb;
            state.total_n1_memory_gb += cluster.n1_memory_gb;
            state.total_ha_usable_memory_gb += cluster.ha_usable_memory_gb;
            state.total_ha_usable_cpu_cores += cluster.ha_usable_cpu_cores;
            state.total_cell_memory_gb += cluster.total_cell_memory_gb;
            state.total_host_count += cluster.host_count;
            state.total_cell_count += cluster.cell_count;
            state.total_cpu_cores += cluster.cpu_cores;
            state.total_vcpus += cluster.total_vcpus;

            state.clusters.push(cluster);
        }

        if state.total_cpu_cores > 0 {
            state.vcpu_ratio = state.total_vcpus as f64 / state.total_cpu_cores as f64;
        }
        state.cpu_risk_level = classify_cpu_risk(state.vcpu_ratio);

        if state.total_memory_gb > 0 {
            state.host_memory_utilization_percent =
                state.total_cell_memory_gb as f64 / state.total_memory_gb as f64 * 100.0;
        }
        if state.total_cpu_cores > 0 {
            state.host_cpu_utilization_percent =
                state.total_vcpus as f64 / state.total_cpu_cores as f64 * 100.0;
        }

        state.ha_min_host_failures_survived = state
            .clusters
            .iter()
            .map(|c| c.ha_host_failures_survived)
            .min()
            .unwrap_or(0);
        if state.clusters.iter().any(|c| c.ha_status == HaStatus::AtRisk) {
            state.ha_status = HaStatus::AtRisk;
        }

        if state.total_app_instances > 0 {
            state.avg_instance_memory_mb =
                state.total_app_memory_gb * 1024 / state.total_app_instances;
        }

        state
    }
}

/// App totals either taken verbatim or derived from per-workload detail
struct WorkloadTotals {
    app_memory_gb: i64,
    app_disk_gb: i64,
    app_instances: i64,
    max_instance_memory_mb: i64,
}

impl WorkloadTotals {
    fn resolve(input: &EnvironmentInput) -> Self {
        if input.workloads.is_empty() {
            return WorkloadTotals {
                app_memory_gb: input.total_app_memory_gb,
                app_disk_gb: input.total_app_disk_gb,
                app_instances: input.total_app_instances,
                max_instance_memory_mb: 0,
            };
        }

        let mut memory_mb = 0;
        let mut disk_mb = 0;
        let mut instances = 0;
        let mut max_per_instance_mb = 0;
        for workload in &input.workloads {
            memory_mb += workload.memory_mb;
            disk_mb += workload.disk_mb;
            instances += workload.instances;

            // memory_mb is the total across all instances of the workload;
            // the per-instance limit is what determines staging chunk size
            if workload.instances > 0 {
                let per_instance_mb = workload.memory_mb / workload.instances;
                if per_instance_mb > max_per_instance_mb {
                    max_per_instance_mb = per_instance_mb;
                }
            }
        }

        WorkloadTotals {
            // round to the nearest GB instead of truncating
            app_memory_gb: (memory_mb + 512) / 1024,
            app_disk_gb: (disk_mb + 512) / 1024,
            app_instances: instances,
            max_instance_memory_mb: max_per_instance_mb,
        }
    }
}

fn build_cluster_state(config: &ClusterConfig) -> ClusterState {
    let memory_gb = config.host_count * config.memory_gb_per_host;
    let cpu_cores = config.host_count * config.cpu_cores_per_host;
    let total_vcpus = config.cell_count * config.cell_cpu;
    let total_cell_memory_gb = config.cell_count * config.cell_memory_gb;
    let n1_memory_gb = (config.host_count - 1).max(0) * config.memory_gb_per_host;
    let usable_memory_gb = (n1_memory_gb as f64 * HOST_OVERHEAD_FRACTION) as i64;

    let ha_multiplier = (100 - config.ha_admission_pct) as f64 / 100.0;
    let ha_usable_memory_gb = (memory_gb as f64 * ha_multiplier) as i64;
    let ha_usable_cpu_cores = (cpu_cores as f64 * ha_multiplier) as i64;

    let vms_per_host = if config.host_count > 0 {
        config.cell_count as f64 / config.host_count as f64
    } else {
        0.0
    };

    let host_memory_utilization_percent = if memory_gb > 0 {
        total_cell_memory_gb as f64 / memory_gb as f64 * 100.0
    } else {
        0.0
    };
    let host_cpu_utilization_percent = if cpu_cores > 0 {
        total_vcpus as f64 / cpu_cores as f64 * 100.0
    } else {
        0.0
    };
    let vcpu_ratio = if cpu_cores > 0 {
        total_vcpus as f64 / cpu_cores as f64
    } else {
        0.0
    };

    let (ha_host_failures_survived, ha_status) = ha_host_failures(
        config.host_count,
        config.memory_gb_per_host,
        config.ha_admission_pct,
        total_cell_memory_gb,
    );

    ClusterState {
        name: config.name.clone(),
        host_count: config.host_count,
        memory_gb,
        cpu_cores,
        memory_gb_per_host: config.memory_gb_per_host,
        cpu_cores_per_host: config.cpu_cores_per_host,
        ha_admission_pct: config.ha_admission_pct,
        ha_usable_memory_gb,
        ha_usable_cpu_cores,
        ha_host_failures_survived,
        ha_status,
        vms_per_host,
        host_memory_utilization_percent,
        host_cpu_utilization_percent,
        n1_memory_gb,
        usable_memory_gb,
        cell_count: config.cell_count,
        cell_memory_gb: config.cell_memory_gb,
        cell_cpu: config.cell_cpu,
        cell_disk_gb: config.cell_disk_gb,
        total_vcpus,
        total_cell_memory_gb,
        vcpu_ratio,
    }
}

/// How many host failures a cluster survives while its committed cell
/// memory still fits under the HA admission reserve.
pub fn ha_host_failures(
    host_count: i64,
    memory_per_host_gb: i64,
    ha_admission_pct: i64,
    required_memory_gb: i64,
) -> (i64, HaStatus) {
    if host_count <= 1 {
        return (0, HaStatus::AtRisk);
    }

    let ha_multiplier = (100 - ha_admission_pct) as f64 / 100.0;

    let mut failures_survived = 0;
    for failed_hosts in 1..host_count {
        let remaining_memory = (host_count - failed_hosts) * memory_per_host_gb;
        let usable_memory = (remaining_memory as f64 * ha_multiplier) as i64;
        if usable_memory >= required_memory_gb {
            failures_survived = failed_hosts;
        } else {
            break;
        }
    }

    let status = if failures_survived >= 1 {
        HaStatus::Ok
    } else {
        HaStatus::AtRisk
    };
    (failures_survived, status)
}
