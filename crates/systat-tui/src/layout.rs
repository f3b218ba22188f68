//! Responsive dashboard geometry.
//!
//! Narrow terminals stack every section vertically. Once two minimum
//! columns fit side by side the sections go into a grid, with CPU and
//! Memory always on the same row.

use ratatui::layout::{Constraint, Layout, Rect};

/// Narrowest width a section is laid out at in the grid.
pub const MIN_COLUMN_WIDTH: u16 = 85;

/// Memory table: RAM and Swap rows, header, borders.
const MEMORY_HEIGHT: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    Stacked,
    Grid,
}

pub fn arrangement(width: u16) -> Arrangement {
    if width < MIN_COLUMN_WIDTH * 2 {
        Arrangement::Stacked
    } else {
        Arrangement::Grid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardAreas {
    pub header: Rect,
    pub health: Rect,
    pub cpu: Rect,
    pub memory: Rect,
    pub disk: Rect,
    pub network: Rect,
    pub cluster: Option<Rect>,
    pub footer: Rect,
}

/// Split the frame into one rect per section.
///
/// `health_rows` is the number of health entries; `show_cluster` adds
/// the namespace table.
pub fn dashboard_areas(
    area: Rect,
    arrangement: Arrangement,
    health_rows: usize,
    show_cluster: bool,
) -> DashboardAreas {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let health_height = u16::try_from(health_rows)
        .unwrap_or(u16::MAX)
        .saturating_add(2);

    match arrangement {
        Arrangement::Stacked => stacked(header, body, footer, health_height, show_cluster),
        Arrangement::Grid => grid(header, body, footer, health_height, show_cluster),
    }
}

fn stacked(
    header: Rect,
    body: Rect,
    footer: Rect,
    health_height: u16,
    show_cluster: bool,
) -> DashboardAreas {
    let mut constraints = vec![
        Constraint::Length(health_height),
        Constraint::Fill(2),
        Constraint::Length(MEMORY_HEIGHT),
        Constraint::Fill(2),
        Constraint::Fill(2),
    ];
    if show_cluster {
        constraints.push(Constraint::Fill(1));
    }
    let rows = Layout::vertical(constraints).split(body);

    DashboardAreas {
        header,
        health: rows[0],
        cpu: rows[1],
        memory: rows[2],
        disk: rows[3],
        network: rows[4],
        cluster: rows.get(5).copied(),
        footer,
    }
}

fn grid(
    header: Rect,
    body: Rect,
    footer: Rect,
    health_height: u16,
    show_cluster: bool,
) -> DashboardAreas {
    let top_height = health_height.max(MEMORY_HEIGHT).max(8);
    let [top, bottom] =
        Layout::vertical([Constraint::Length(top_height), Constraint::Min(0)]).areas(body);

    let [health, cpu, memory] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ])
    .areas(top);

    let columns = if show_cluster { 3 } else { 2 };
    let cells = Layout::horizontal(vec![Constraint::Fill(1); columns]).split(bottom);

    DashboardAreas {
        header,
        health,
        cpu,
        memory,
        disk: cells[0],
        network: cells[1],
        cluster: cells.get(2).copied(),
        footer,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn threshold_is_two_columns() {
        assert_eq!(arrangement(0), Arrangement::Stacked);
        assert_eq!(arrangement(169), Arrangement::Stacked);
        assert_eq!(arrangement(170), Arrangement::Grid);
        assert_eq!(arrangement(300), Arrangement::Grid);
    }

    #[test]
    fn stacked_sections_share_the_full_width() {
        let area = Rect::new(0, 0, 100, 80);
        let areas = dashboard_areas(area, Arrangement::Stacked, 3, false);

        for rect in [areas.health, areas.cpu, areas.memory, areas.disk, areas.network] {
            assert_eq!(rect.width, 100);
        }
        assert!(areas.health.y < areas.cpu.y);
        assert!(areas.cpu.y < areas.memory.y);
        assert!(areas.disk.y < areas.network.y);
        assert_eq!(areas.health.height, 5);
        assert_eq!(areas.cluster, None);
    }

    #[test]
    fn grid_keeps_cpu_and_memory_on_one_row() {
        let area = Rect::new(0, 0, 200, 50);
        let areas = dashboard_areas(area, Arrangement::Grid, 3, true);

        assert_eq!(areas.cpu.y, areas.memory.y);
        assert_eq!(areas.health.y, areas.cpu.y);
        assert_eq!(areas.disk.y, areas.network.y);
        assert!(areas.disk.y > areas.cpu.y);

        let cluster = areas.cluster.unwrap();
        assert_eq!(cluster.y, areas.disk.y);
        assert!(cluster.x > areas.network.x);
    }

    #[test]
    fn header_and_footer_take_one_line_each() {
        let area = Rect::new(0, 0, 200, 50);
        let areas = dashboard_areas(area, Arrangement::Grid, 0, false);
        assert_eq!(areas.header, Rect::new(0, 0, 200, 1));
        assert_eq!(areas.footer, Rect::new(0, 49, 200, 1));
    }
}
