//! Grid snapping, alignment and distribution of object positions.
//!
//! Pure functions over `[x, y, z]` positions; the scene store wraps them in
//! undoable operations.

use serde::{Deserialize, Serialize};
use shared::Axis;

/// Where aligned objects end up on the chosen axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Min,
    Max,
    Center,
}

/// Round each component to the nearest grid multiple. Non-positive grids leave the position untouched.
pub fn snap_to_grid(position: [f64; 3], grid: f64) -> [f64; 3] {
    if grid <= 0.0 || !grid.is_finite() {
        return position;
    }
    position.map(|v| (v / grid).round() * grid)
}

/// Move every position to the common min, max or center coordinate on `axis`
pub fn align_positions(positions: &[[f64; 3]], axis: Axis, alignment: Alignment) -> Vec<[f64; 3]> {
    if positions.len() < 2 {
        return positions.to_vec();
    }
    let i = axis.index();
    let min = positions.iter().map(|p| p[i]).fold(f64::INFINITY, f64::min);
    let max = positions.iter().map(|p| p[i]).fold(f64::NEG_INFINITY, f64::max);
    let target = match alignment {
        Alignment::Min => min,
        Alignment::Max => max,
        Alignment::Center => (min + max) * 0.5,
    };
    positions
        .iter()
        .map(|p| {
            let mut p = *p;
            p[i] = target;
            p
        })
        .collect()
}

/// Space positions `spacing` apart on `axis`, starting at the lowest one and
/// keeping their current order along that axis. Output order matches input order.
pub fn distribute_positions(positions: &[[f64; 3]], axis: Axis, spacing: f64) -> Vec<[f64; 3]> {
    if positions.len() < 2 {
        return positions.to_vec();
    }
    let i = axis.index();
    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by(|&a, &b| positions[a][i].total_cmp(&positions[b][i]));

    let start = positions[order[0]][i];
    let mut out = positions.to_vec();
    for (rank, &index) in order.iter().enumerate() {
        out[index][i] = start + rank as f64 * spacing;
    }
    out
}
