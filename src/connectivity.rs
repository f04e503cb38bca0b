//! Pipe connectivity: which neighbors a tile is joined to.
//!
//! Two tiles are connected only when they point at each other: one of the
//! origin's openings reaches the neighbor, and one of the neighbor's openings
//! lands back on the origin.

use crate::types::{Cell, Grid, Orientation};

/// Neighbors of `(x, y)` that are mutually connected to it, assuming the
/// origin has `orientation`. Neighbors are read from `grid` as they are now.
///
/// Out-of-bounds openings are skipped; the origin itself is never returned.
pub fn connected_neighbors(grid: &Grid, x: usize, y: usize, orientation: Orientation) -> Vec<Cell> {
    let mut connected = Vec::with_capacity(2);

    for dir in orientation.openings() {
        let Some((nx, ny)) = grid.neighbor(x, y, dir) else {
            continue;
        };
        if grid.orientation(nx, ny).opens_toward(dir.opposite()) {
            connected.push((nx, ny));
        }
    }

    connected
}

/// Connected neighbors of `(x, y)` using its current orientation.
pub fn connected_neighbors_of(grid: &Grid, x: usize, y: usize) -> Vec<Cell> {
    if !grid.in_bounds(x, y) {
        return Vec::new();
    }
    connected_neighbors(grid, x, y, grid.orientation(x, y))
}
