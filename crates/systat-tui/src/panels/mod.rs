//! Dashboard sections. Each one owns the slice of the snapshot it draws.

pub mod cluster;
pub mod cpu;
pub mod detail;
pub mod disk;
pub mod health;
pub mod memory;
pub mod network;
pub mod table;

use systat_core::HealthChecks;

use crate::component::Component;
use crate::state::Focus;

pub use cluster::ClusterPanel;
pub use cpu::CpuPanel;
pub use disk::DiskPanel;
pub use health::HealthPanel;
pub use memory::MemoryPanel;
pub use network::NetworkPanel;

pub struct Panels {
    pub health: HealthPanel,
    pub cpu: CpuPanel,
    pub memory: MemoryPanel,
    pub disk: DiskPanel,
    pub network: NetworkPanel,
    pub cluster: ClusterPanel,
}

impl Panels {
    pub fn new(checks: HealthChecks) -> Self {
        let mut panels = Self {
            health: HealthPanel::new(checks),
            cpu: CpuPanel::default(),
            memory: MemoryPanel::default(),
            disk: DiskPanel::default(),
            network: NetworkPanel::default(),
            cluster: ClusterPanel::default(),
        };
        panels.focus(Focus::default());
        panels
    }

    /// The table that receives navigation keys for `focus`.
    pub fn focusable_mut(&mut self, focus: Focus) -> &mut dyn Component {
        match focus {
            Focus::Cpu => &mut self.cpu,
            Focus::Disk => &mut self.disk,
            Focus::Network => &mut self.network,
        }
    }

    /// Move the focus flag so exactly one table carries it.
    pub fn focus(&mut self, focus: Focus) {
        for candidate in Focus::ALL {
            self.focusable_mut(candidate).set_focused(candidate == focus);
        }
    }

    pub fn all_mut(&mut self) -> [&mut dyn Component; 6] {
        [
            &mut self.health,
            &mut self.cpu,
            &mut self.memory,
            &mut self.disk,
            &mut self.network,
            &mut self.cluster,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focused_ids(panels: &mut Panels) -> Vec<String> {
        Focus::ALL
            .into_iter()
            .filter_map(|f| {
                let panel = panels.focusable_mut(f);
                panel.focused().then(|| panel.id().to_owned())
            })
            .collect()
    }

    #[test]
    fn exactly_one_table_holds_focus() {
        let mut panels = Panels::new(HealthChecks::default());
        assert_eq!(focused_ids(&mut panels), ["cpu"]);

        panels.focus(Focus::Network);
        assert_eq!(focused_ids(&mut panels), ["network"]);
    }
}
