//! Island detection over the cells rotated in one round.
//!
//! Islands are plain spatial clusters: two rotated cells belong together when
//! they are within one step on both axes (king moves), regardless of whether
//! their pipes connect.

use std::collections::HashMap;

use crate::types::{cell_key, Cell};

/// Smallest island that earns a bonus.
pub const DEFAULT_MIN_ISLAND_SIZE: usize = 3;

/// Decompose `cells` into king-move connected islands using BFS.
///
/// Islands come out in the order their first cell appears in `cells`, and
/// each island lists cells in visit order. Cells outside the
/// `width × height` board are ignored.
pub fn find_islands(cells: &[Cell], width: usize, height: usize) -> Vec<Vec<Cell>> {
    let mut islands = Vec::new();
    // 0 = not in set, 1 = in set (unvisited), 2 = visited
    let mut membership = vec![0u8; width * height];

    for &(x, y) in cells {
        if x < width && y < height {
            membership[x * height + y] = 1;
        }
    }

    for &(x, y) in cells {
        if x >= width || y >= height {
            continue;
        }
        let idx = x * height + y;
        if membership[idx] != 1 {
            continue;
        }

        let mut island = Vec::new();
        membership[idx] = 2;
        island.push((x, y));

        let mut head = 0;
        while head < island.len() {
            let (cx, cy) = island[head];
            head += 1;

            for dx in -1i32..=1 {
                for dy in -1i32..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = cx as i32 + dx;
                    let ny = cy as i32 + dy;
                    if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                        continue;
                    }
                    let n_idx = nx as usize * height + ny as usize;
                    if membership[n_idx] == 1 {
                        membership[n_idx] = 2;
                        island.push((nx as usize, ny as usize));
                    }
                }
            }
        }

        islands.push(island);
    }

    islands
}

/// Islands of at least `min_size` cells.
pub fn qualifying_islands(cells: &[Cell], width: usize, height: usize, min_size: usize) -> Vec<Vec<Cell>> {
    find_islands(cells, width, height)
        .into_iter()
        .filter(|island| island.len() >= min_size)
        .collect()
}

/// Score multiplier for a number of qualifying islands.
///
/// Counts islands, not cells: a single big island is still worth 1x.
#[inline]
pub fn island_bonus(island_count: usize) -> u64 {
    island_count.max(1) as u64
}

/// Map each island cell's key to the index of its island.
pub fn island_lookup(islands: &[Vec<Cell>]) -> HashMap<u32, usize> {
    islands
        .iter()
        .enumerate()
        .flat_map(|(i, island)| island.iter().map(move |&(x, y)| (cell_key(x, y), i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_has_no_islands() {
        assert!(find_islands(&[], 4, 4).is_empty());
        assert_eq!(island_bonus(0), 1);
    }

    #[test]
    fn test_diagonal_cells_share_an_island() {
        let islands = find_islands(&[(0, 0), (1, 1), (2, 2)], 4, 4);
        assert_eq!(islands.len(), 1);
        assert_eq!(islands[0].len(), 3);
    }

    #[test]
    fn test_gap_splits_islands() {
        let cells = [(0, 0), (0, 1), (3, 3), (3, 2)];
        let islands = find_islands(&cells, 4, 4);
        assert_eq!(islands.len(), 2);
        assert_eq!(islands[0], vec![(0, 0), (0, 1)]);
        assert_eq!(islands[1], vec![(3, 3), (3, 2)]);
    }

    #[test]
    fn test_small_islands_do_not_qualify() {
        let cells = [(0, 0), (0, 1), (4, 4)];
        assert!(qualifying_islands(&cells, 6, 6, DEFAULT_MIN_ISLAND_SIZE).is_empty());
    }

    #[test]
    fn test_three_cell_chain_is_one_island_worth_1x() {
        // A at the elbow, B to its right, C below it.
        let cells = [(2, 1), (1, 2), (1, 1)];
        let islands = qualifying_islands(&cells, 4, 4, DEFAULT_MIN_ISLAND_SIZE);
        assert_eq!(islands.len(), 1);
        let mut island = islands[0].clone();
        island.sort();
        assert_eq!(island, vec![(1, 1), (1, 2), (2, 1)]);
        assert_eq!(island_bonus(islands.len()), 1);
    }

    #[test]
    fn test_bonus_counts_islands() {
        let cells = [
            (0, 0), (1, 0), (2, 0),
            (0, 4), (1, 4), (2, 4),
            (5, 0), (5, 1), (5, 2),
        ];
        let islands = qualifying_islands(&cells, 6, 6, DEFAULT_MIN_ISLAND_SIZE);
        assert_eq!(islands.len(), 3);
        assert_eq!(island_bonus(islands.len()), 3);
        let lookup = island_lookup(&islands);
        assert_eq!(lookup.len(), 9);
        assert_eq!(lookup.get(&cell_key(1, 4)), Some(&1));
        assert_eq!(lookup.get(&cell_key(3, 3)), None);
    }

    #[test]
    fn test_out_of_bounds_cells_ignored() {
        let islands = find_islands(&[(0, 0), (10, 10)], 3, 3);
        assert_eq!(islands, vec![vec![(0, 0)]]);
    }
}
