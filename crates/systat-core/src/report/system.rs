use std::path::Path;

use serde::Serialize;
use sysinfo::System;

use crate::error::CoreError;
use crate::procfs::read_sysfs;

const DMI_ROOT: &str = "/sys/class/dmi/id";

#[derive(Debug, Clone, Serialize)]
pub struct SystemReport {
    pub node: NodeInfo,
    pub os: OsInfo,
    pub kernel: KernelInfo,
    pub product: DmiInfo,
    pub board: DmiInfo,
    pub chassis: DmiInfo,
    pub bios: DmiInfo,
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeInfo {
    pub hostname: Option<String>,
    pub machine_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OsInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    pub long_version: Option<String>,
    pub distribution_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KernelInfo {
    pub release: Option<String>,
    pub architecture: String,
}

/// Vendor/name/version triple from the DMI tables. Fields the kernel
/// hides from unprivileged users stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DmiInfo {
    pub vendor: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CpuInfo {
    pub vendor: Option<String>,
    pub model: Option<String>,
    pub cores: Option<usize>,
    pub threads: usize,
    pub speed_mhz: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryInfo {
    pub total_bytes: u64,
    pub swap_total_bytes: u64,
}

fn dmi(root: &Path, vendor: &str, name: &str, version: &str) -> DmiInfo {
    DmiInfo {
        vendor: read_sysfs(root.join(vendor)),
        name: read_sysfs(root.join(name)),
        version: read_sysfs(root.join(version)),
    }
}

fn collect(dmi_root: &Path) -> SystemReport {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    sys.refresh_memory();

    let first_cpu = sys.cpus().first();

    SystemReport {
        node: NodeInfo {
            hostname: System::host_name(),
            machine_id: read_sysfs("/etc/machine-id"),
        },
        os: OsInfo {
            name: System::name(),
            version: System::os_version(),
            long_version: System::long_os_version(),
            distribution_id: System::distribution_id(),
        },
        kernel: KernelInfo {
            release: System::kernel_version(),
            architecture: std::env::consts::ARCH.to_string(),
        },
        product: dmi(dmi_root, "sys_vendor", "product_name", "product_version"),
        board: dmi(dmi_root, "board_vendor", "board_name", "board_version"),
        chassis: dmi(dmi_root, "chassis_vendor", "chassis_type", "chassis_version"),
        bios: dmi(dmi_root, "bios_vendor", "bios_date", "bios_version"),
        cpu: CpuInfo {
            vendor: first_cpu.map(|c| c.vendor_id().to_string()),
            model: first_cpu.map(|c| c.brand().trim().to_string()),
            cores: System::physical_core_count(),
            threads: sys.cpus().len(),
            speed_mhz: first_cpu.map(sysinfo::Cpu::frequency),
        },
        memory: MemoryInfo {
            total_bytes: sys.total_memory(),
            swap_total_bytes: sys.total_swap(),
        },
    }
}

/// Static description of the host: OS, hardware identifiers, CPU and
/// memory size.
pub async fn system_report() -> Result<SystemReport, CoreError> {
    Ok(tokio::task::spawn_blocking(|| collect(Path::new(DMI_ROOT))).await?)
}
