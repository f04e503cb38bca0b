//! Core data types for the pipe grid.
//!
//! The grid uses flat `Vec` storage with column-major layout:
//! `cells[x * height + y]`, where `x` is the column and `y` the row
//! (growing downward).

use std::collections::HashSet;

/// A board coordinate `(x, y)`.
pub type Cell = (usize, usize);

/// Bit-pack (x, y) into a single u32 key.
#[inline(always)]
pub fn cell_key(x: usize, y: usize) -> u32 {
    ((x as u32) << 16) | (y as u32)
}

/// One of the four compass directions a pipe can open toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit offset `(dx, dy)`.
    #[inline(always)]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Discrete tile orientation: the raw rotation counter modulo 4.
///
/// Every orientation is an elbow opening toward two perpendicular directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation(u8);

/// Openings per orientation, indexed by `value % 4`.
const OPENINGS: [[Direction; 2]; 4] = [
    // ┌
    [Direction::Right, Direction::Down],
    // └
    [Direction::Up, Direction::Right],
    // ┘
    [Direction::Up, Direction::Left],
    // ┐
    [Direction::Left, Direction::Down],
];

impl Orientation {
    pub const ALL: [Orientation; 4] = [Orientation(0), Orientation(1), Orientation(2), Orientation(3)];

    /// Orientation for an unbounded rotation counter.
    #[inline(always)]
    pub fn from_raw(value: u32) -> Self {
        Orientation((value % 4) as u8)
    }

    #[inline(always)]
    pub fn index(self) -> u8 {
        self.0
    }

    /// The two directions this orientation opens toward.
    #[inline(always)]
    pub fn openings(self) -> [Direction; 2] {
        OPENINGS[self.0 as usize]
    }

    /// Whether one of the openings faces `dir`.
    #[inline(always)]
    pub fn opens_toward(self, dir: Direction) -> bool {
        self.openings().contains(&dir)
    }
}

/// Raw rotation counters for every tile on the board.
///
/// Counters only ever grow by one per rotation; logic reads them through
/// [`Orientation::from_raw`]. Addition wraps, and since 2^32 is a multiple of
/// four the orientation is unaffected by the wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<u32>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Build a grid from row-major rows (`rows[y][x]`), the way boards are
    /// usually written down. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<u32>]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut grid = Grid::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &val) in row.iter().enumerate().take(width) {
                grid.set(x, y, val);
            }
        }
        grid
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.cells[x * self.height + y]
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, val: u32) {
        self.cells[x * self.height + y] = val;
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    pub fn orientation(&self, x: usize, y: usize) -> Orientation {
        Orientation::from_raw(self.get(x, y))
    }

    /// Advance a tile by one quarter turn.
    #[inline(always)]
    pub fn rotate(&mut self, x: usize, y: usize) {
        let idx = x * self.height + y;
        self.cells[idx] = self.cells[idx].wrapping_add(1);
    }

    /// The in-bounds cell one step from `(x, y)` toward `dir`, if any.
    pub fn neighbor(&self, x: usize, y: usize, dir: Direction) -> Option<Cell> {
        let (dx, dy) = dir.offset();
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        if nx < 0 || ny < 0 {
            return None;
        }
        let (nx, ny) = (nx as usize, ny as usize);
        if self.in_bounds(nx, ny) {
            Some((nx, ny))
        } else {
            None
        }
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }
}

/// Insertion-ordered, deduplicated collection of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSet {
    order: Vec<Cell>,
    seen: HashSet<u32>,
}

impl CellSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell, returning false if it was already present.
    pub fn insert(&mut self, cell: Cell) -> bool {
        if self.seen.insert(cell_key(cell.0, cell.1)) {
            self.order.push(cell);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.seen.contains(&cell_key(cell.0, cell.1))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[Cell] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<Cell> {
        self.order
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut set = CellSet::new();
        for cell in iter {
            set.insert(cell);
        }
        set
    }
}
