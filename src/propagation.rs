//! One round of the rotation cascade.
//!
//! A round rotates every seed by a quarter turn, then looks for the neighbors
//! each seed is now joined to. All increments land before any neighbor is
//! resolved, so every seed sees the fully updated grid.

use log::debug;

use crate::connectivity::connected_neighbors;
use crate::types::{Cell, CellSet, Grid};

/// Result of applying one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    /// Cells rotated this round (the deduplicated, in-bounds seeds).
    pub rotated: Vec<Cell>,
    /// Seeds for the next round. Empty means the chain is over.
    pub next_seeds: Vec<Cell>,
}

impl RoundOutcome {
    pub fn is_final(&self) -> bool {
        self.next_seeds.is_empty()
    }
}

/// Rotate `seeds` and discover the next round's seeds.
///
/// The next seed set holds every newly connected neighbor together with the
/// seeds that found at least one, in discovery order without duplicates.
/// Out-of-bounds and repeated seeds are ignored.
pub fn run_round(grid: &mut Grid, seeds: &[Cell]) -> RoundOutcome {
    let rotated: Vec<Cell> = seeds
        .iter()
        .copied()
        .filter(|&(x, y)| grid.in_bounds(x, y))
        .collect::<CellSet>()
        .into_vec();

    for &(x, y) in &rotated {
        grid.rotate(x, y);
    }

    let mut next = CellSet::new();
    for &(x, y) in &rotated {
        let neighbors = connected_neighbors(grid, x, y, grid.orientation(x, y));
        if neighbors.is_empty() {
            continue;
        }
        for n in neighbors {
            next.insert(n);
        }
        next.insert((x, y));
    }

    debug!(
        "round rotated {} cells, {} queued for next round",
        rotated.len(),
        next.len()
    );

    RoundOutcome {
        rotated,
        next_seeds: next.into_vec(),
    }
}

/// Run a whole chain from `seeds` without any delay, returning every round's
/// outcome. Stops after `max_rounds` even if the chain would continue.
pub fn run_chain(grid: &mut Grid, seeds: &[Cell], max_rounds: usize) -> Vec<RoundOutcome> {
    let mut rounds = Vec::new();
    let mut current = seeds.to_vec();

    while !current.is_empty() && rounds.len() < max_rounds {
        let outcome = run_round(grid, &current);
        current = outcome.next_seeds.clone();
        rounds.push(outcome);
    }

    rounds
}

/// Upper bound on rounds per chain. Orientation has period four, so a chain
/// that outlives four full-board rounds is cycling.
pub fn round_limit(grid: &Grid) -> usize {
    grid.cell_count().saturating_mul(4).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{random_grid, uniform_grid};
    use crate::rng::WasmRng;

    #[test]
    fn test_single_click_on_uniform_board_stops() {
        let mut grid = uniform_grid(4, 4, 0);
        let outcome = run_round(&mut grid, &[(0, 0)]);

        assert_eq!(grid.orientation(0, 0).index(), 1);
        assert_eq!(outcome.rotated, vec![(0, 0)]);
        assert!(outcome.is_final());
    }

    #[test]
    fn test_connected_neighbor_joins_next_round() {
        // (0,0) turns from 3 to 0 (right+down); (1,0) opens left.
        let mut grid = Grid::from_rows(&[vec![3, 3], vec![0, 2]]);
        let outcome = run_round(&mut grid, &[(0, 0)]);

        assert_eq!(outcome.next_seeds, vec![(1, 0), (0, 0)]);
    }

    #[test]
    fn test_round_is_batched() {
        // (0,0): 3 -> 0 opens right. (1,0): 1 -> 2 opens left.
        // Sequential resolution would see (1,0) still at 1 and miss it.
        let mut grid = Grid::from_rows(&[vec![3, 1]]);
        let outcome = run_round(&mut grid, &[(0, 0), (1, 0)]);

        assert_eq!(outcome.next_seeds, vec![(1, 0), (0, 0)]);
    }

    #[test]
    fn test_seeds_deduplicated_and_bounded() {
        let mut grid = uniform_grid(3, 3, 0);
        let outcome = run_round(&mut grid, &[(1, 1), (1, 1), (9, 9)]);

        assert_eq!(outcome.rotated, vec![(1, 1)]);
        assert_eq!(grid.get(1, 1), 1);
    }

    #[test]
    fn test_next_seeds_have_no_duplicates() {
        for seed in 0..30 {
            let mut grid = random_grid(8, 8, &mut WasmRng::from_seed(seed));
            let all: Vec<Cell> = (0..8).flat_map(|x| (0..8).map(move |y| (x, y))).collect();
            let outcome = run_round(&mut grid, &all);
            let unique: CellSet = outcome.next_seeds.iter().copied().collect();
            assert_eq!(unique.len(), outcome.next_seeds.len());
        }
    }

    #[test]
    fn test_closed_ring_unwinds() {
        // A 2x2 closed loop: ┌┐ over └┘.
        let mut grid = Grid::from_rows(&[vec![0, 3], vec![1, 2]]);
        let rounds = run_chain(&mut grid, &[(0, 0)], 100);

        let rotated: Vec<Vec<Cell>> = rounds.iter().map(|r| r.rotated.clone()).collect();
        assert_eq!(
            rotated,
            vec![
                vec![(0, 0)],
                vec![(1, 0), (0, 0)],
                vec![(1, 1), (1, 0)],
                vec![(0, 1), (1, 1)],
            ]
        );
        assert!(rounds[3].is_final());
    }

    #[test]
    fn test_run_chain_respects_limit() {
        let mut grid = Grid::from_rows(&[vec![0, 3], vec![1, 2]]);
        let rounds = run_chain(&mut grid, &[(0, 0)], 2);
        assert_eq!(rounds.len(), 2);
        assert!(!rounds[1].is_final());
    }

    #[test]
    fn test_random_chains_stay_within_limit() {
        for seed in 0..50 {
            let mut rng = WasmRng::from_seed(seed);
            let mut grid = random_grid(6, 6, &mut rng);
            let start = (rng.gen_range(6), rng.gen_range(6));
            let limit = round_limit(&grid);
            let rounds = run_chain(&mut grid, &[start], limit);
            assert!(!rounds.is_empty() && rounds.len() <= limit);
            assert_eq!(rounds[0].rotated, vec![start]);
            for pair in rounds.windows(2) {
                assert_eq!(pair[0].next_seeds, pair[1].rotated);
            }
        }
    }
}
