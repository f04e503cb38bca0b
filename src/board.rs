//! Board generation.
//!
//! Every tile gets an independent, uniformly random orientation. Boards are
//! produced at startup and on every reset.

use crate::rng::WasmRng;
use crate::types::Grid;

/// Fill a `width × height` grid with random orientations.
pub fn random_grid(width: usize, height: usize, rng: &mut WasmRng) -> Grid {
    let mut grid = Grid::new(width, height);

    for x in 0..width {
        for y in 0..height {
            grid.set(x, y, rng.orientation());
        }
    }

    grid
}

/// Build a grid where every tile has the same orientation.
pub fn uniform_grid(width: usize, height: usize, orientation: u32) -> Grid {
    let mut grid = Grid::new(width, height);
    grid.cells.fill(orientation % 4);
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_grid_dimensions() {
        let mut rng = WasmRng::from_seed(42);
        let grid = random_grid(7, 5, &mut rng);
        assert_eq!(grid.width, 7);
        assert_eq!(grid.height, 5);
        assert_eq!(grid.cells.len(), 35);
        assert!(grid.cells.iter().all(|&v| v < 4));
    }

    #[test]
    fn test_random_grid_seeded_is_reproducible() {
        let a = random_grid(10, 10, &mut WasmRng::from_seed(7));
        let b = random_grid(10, 10, &mut WasmRng::from_seed(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_grid_uses_every_orientation() {
        let mut rng = WasmRng::from_seed(99);
        let grid = random_grid(20, 20, &mut rng);
        for o in 0..4 {
            assert!(grid.cells.contains(&o), "orientation {} never generated", o);
        }
    }

    #[test]
    fn test_uniform_grid() {
        let grid = uniform_grid(4, 4, 6);
        assert!(grid.cells.iter().all(|&v| v == 2));
    }
}
