//! Edge-to-edge span detection.
//!
//! Every tile has exactly two openings, so the pipes connected to a tile form
//! a simple path (or a closed loop). Tracing that path from each tile on one
//! board edge tells whether any pipe run crosses to the opposite edge.

use std::collections::HashSet;

use crate::connectivity::connected_neighbors_of;
use crate::types::{cell_key, Cell, Grid};

/// Which pair of opposite edges a span connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanAxis {
    /// Left column to right column.
    Horizontal,
    /// Top row to bottom row.
    Vertical,
}

/// The longest pipe run joining two opposite edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSpan {
    pub axis: SpanAxis,
    pub path: Vec<Cell>,
}

impl EdgeSpan {
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Follow connected pipes away from `start` in both directions.
///
/// Returns the whole run through `start`, ordered end to end. When `start`
/// is itself an end of the run it comes first. A closed loop is returned
/// once, starting at `start`.
pub fn trace_path(grid: &Grid, start: Cell) -> Vec<Cell> {
    if !grid.in_bounds(start.0, start.1) {
        return Vec::new();
    }

    let mut visited: HashSet<u32> = HashSet::new();
    visited.insert(cell_key(start.0, start.1));

    let mut branches: Vec<Vec<Cell>> = Vec::with_capacity(2);
    for first in connected_neighbors_of(grid, start.0, start.1) {
        branches.push(walk(grid, first, &mut visited));
    }

    let mut branches = branches.into_iter();
    let first = branches.next().unwrap_or_default();
    let second = branches.next().unwrap_or_default();

    let mut path: Vec<Cell> = second.into_iter().rev().collect();
    path.push(start);
    path.extend(first);
    path
}

/// Walk a single branch starting at `from`, stopping at a dead end or a
/// cell already visited.
fn walk(grid: &Grid, from: Cell, visited: &mut HashSet<u32>) -> Vec<Cell> {
    let mut branch = Vec::new();
    let mut current = Some(from);

    while let Some((cx, cy)) = current {
        if !visited.insert(cell_key(cx, cy)) {
            break;
        }
        branch.push((cx, cy));
        current = connected_neighbors_of(grid, cx, cy)
            .into_iter()
            .find(|&(nx, ny)| !visited.contains(&cell_key(nx, ny)));
    }

    branch
}

/// Find the longest run crossing the board, trying left-to-right first and
/// falling back to top-to-bottom.
///
/// An axis only one cell across cannot be spanned.
pub fn find_edge_span(grid: &Grid) -> Option<EdgeSpan> {
    find_edge_span_where(grid, |_| true)
}

/// Like [`find_edge_span`], but only runs passing through at least one of
/// `cells` count. Used to reward spans a round actually formed.
pub fn find_edge_span_through(grid: &Grid, cells: &[Cell]) -> Option<EdgeSpan> {
    let wanted: HashSet<u32> = cells.iter().map(|&(x, y)| cell_key(x, y)).collect();
    find_edge_span_where(grid, |path| {
        path.iter().any(|&(x, y)| wanted.contains(&cell_key(x, y)))
    })
}

fn find_edge_span_where<P>(grid: &Grid, accept: P) -> Option<EdgeSpan>
where
    P: Fn(&[Cell]) -> bool,
{
    if grid.width > 1 {
        let starts: Vec<Cell> = (0..grid.height).map(|y| (0, y)).collect();
        let right = grid.width - 1;
        if let Some(path) = longest_crossing(grid, &starts, |(x, _)| x == right, &accept) {
            return Some(EdgeSpan {
                axis: SpanAxis::Horizontal,
                path,
            });
        }
    }

    if grid.height > 1 {
        let starts: Vec<Cell> = (0..grid.width).map(|x| (x, 0)).collect();
        let bottom = grid.height - 1;
        if let Some(path) = longest_crossing(grid, &starts, |(_, y)| y == bottom, &accept) {
            return Some(EdgeSpan {
                axis: SpanAxis::Vertical,
                path,
            });
        }
    }

    None
}

fn longest_crossing<F, P>(grid: &Grid, starts: &[Cell], reaches_far_edge: F, accept: &P) -> Option<Vec<Cell>>
where
    F: Fn(Cell) -> bool,
    P: Fn(&[Cell]) -> bool,
{
    let mut traced: HashSet<u32> = HashSet::new();
    let mut best: Option<Vec<Cell>> = None;

    for &start in starts {
        // Starts already seen lie on a run that was traced in full.
        if traced.contains(&cell_key(start.0, start.1)) {
            continue;
        }
        let path = trace_path(grid, start);
        for &(x, y) in &path {
            traced.insert(cell_key(x, y));
        }
        if !path.iter().any(|&c| reaches_far_edge(c)) || !accept(&path) {
            continue;
        }
        if best.as_ref().map_or(true, |b| path.len() > b.len()) {
            best = Some(path);
        }
    }

    best
}
