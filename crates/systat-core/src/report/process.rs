use chrono::{DateTime, Utc};
use serde::Serialize;
use sysinfo::{Process, ProcessesToUpdate, System, Users};

use crate::error::CoreError;

#[derive(Debug, Clone, Serialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub parent: Option<u32>,
    pub name: String,
    pub cmdline: String,
    pub status: String,
    pub create_time: Option<DateTime<Utc>>,
    pub cpu_percent: f64,
    pub memory_rss: u64,
    pub memory_vms: u64,
    pub username: Option<String>,
}

fn process_info(process: &Process, users: &Users) -> ProcessInfo {
    let cmdline = process
        .cmd()
        .iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");

    ProcessInfo {
        pid: process.pid().as_u32(),
        parent: process.parent().map(sysinfo::Pid::as_u32),
        name: process.name().to_string_lossy().into_owned(),
        cmdline,
        status: process.status().to_string(),
        create_time: i64::try_from(process.start_time())
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        cpu_percent: f64::from(process.cpu_usage()),
        memory_rss: process.memory(),
        memory_vms: process.virtual_memory(),
        username: process
            .user_id()
            .and_then(|uid| users.get_user_by_id(uid))
            .map(|u| u.name().to_string()),
    }
}

fn collect() -> Vec<ProcessInfo> {
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::All, true);
    // CPU percent needs two samples.
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_processes(ProcessesToUpdate::All, true);

    let users = Users::new_with_refreshed_list();
    let mut processes: Vec<ProcessInfo> = sys
        .processes()
        .values()
        .map(|p| process_info(p, &users))
        .collect();
    processes.sort_by_key(|p| p.pid);
    processes
}

/// Every process visible to the caller, ordered by pid.
pub async fn process_report() -> Result<Vec<ProcessInfo>, CoreError> {
    Ok(tokio::task::spawn_blocking(collect).await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn report_includes_this_process() {
        let me = std::process::id();
        let processes = process_report().await.unwrap();

        assert!(processes.windows(2).all(|w| w[0].pid < w[1].pid));
        let this = processes.iter().find(|p| p.pid == me).unwrap();
        assert!(!this.name.is_empty());
    }
}
