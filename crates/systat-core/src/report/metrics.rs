use chrono::{DateTime, Utc};
use serde::Serialize;
use sysinfo::{ProcessesToUpdate, System};

use crate::error::CoreError;
use crate::model::{LoadAverage, UsageStat};
use crate::source::load_average;

#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub host: HostMetrics,
    pub cpu: CpuMetrics,
    pub load: Option<LoadAverage>,
    pub memory: MemoryMetrics,
    pub swap: UsageStat,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostMetrics {
    pub hostname: Option<String>,
    pub uptime_secs: u64,
    pub boot_time: Option<DateTime<Utc>>,
    pub os: Option<String>,
    pub os_version: Option<String>,
    pub kernel: Option<String>,
    pub processes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CpuMetrics {
    pub physical_cores: Option<usize>,
    pub logical_cores: usize,
    pub global_usage_percent: f64,
    pub cores: Vec<CoreMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoreMetrics {
    pub name: String,
    pub brand: String,
    pub vendor: String,
    pub frequency_mhz: u64,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryMetrics {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub available: u64,
    pub used_percent: f64,
}

fn collect() -> MetricsReport {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    // Usage is a delta; take a second sample after the minimum window.
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_all();
    sys.refresh_memory();
    sys.refresh_processes(ProcessesToUpdate::All, true);

    let boot_time = i64::try_from(System::boot_time())
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    let cores = sys
        .cpus()
        .iter()
        .map(|c| CoreMetrics {
            name: c.name().to_string(),
            brand: c.brand().trim().to_string(),
            vendor: c.vendor_id().to_string(),
            frequency_mhz: c.frequency(),
            usage_percent: f64::from(c.cpu_usage()),
        })
        .collect::<Vec<_>>();

    let used = sys.total_memory().saturating_sub(sys.available_memory());
    let ram = UsageStat::new(used, sys.total_memory());

    MetricsReport {
        host: HostMetrics {
            hostname: System::host_name(),
            uptime_secs: System::uptime(),
            boot_time,
            os: System::name(),
            os_version: System::os_version(),
            kernel: System::kernel_version(),
            processes: sys.processes().len(),
        },
        cpu: CpuMetrics {
            physical_cores: System::physical_core_count(),
            logical_cores: cores.len(),
            global_usage_percent: f64::from(sys.global_cpu_usage()),
            cores,
        },
        load: load_average(),
        memory: MemoryMetrics {
            total: ram.total,
            used: ram.used,
            free: sys.free_memory(),
            available: sys.available_memory(),
            used_percent: ram.used_percent,
        },
        swap: UsageStat::new(sys.used_swap(), sys.total_swap()),
    }
}

/// Point-in-time host, CPU, load and memory figures.
pub async fn metrics_report() -> Result<MetricsReport, CoreError> {
    Ok(tokio::task::spawn_blocking(collect).await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn metrics_cover_every_core() {
        let report = metrics_report().await.unwrap();
        assert_eq!(report.cpu.logical_cores, report.cpu.cores.len());
        assert!(report.memory.total >= report.memory.used);
        assert!(report.host.processes > 0);
    }
}
