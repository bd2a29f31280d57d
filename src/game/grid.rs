//! Toroidal occupancy grid
//!
//! Each cell holds at most one occupant. Callers wrap coordinates before
//! touching the grid (see `systems::physics`); out-of-range access here is a
//! silent no-op rather than an error.

use serde::{Deserialize, Serialize};

use crate::game::snake::SnakeId;
use crate::util::random::RandomSource;

/// Occupant of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    /// Link `index` of snake `snake`
    Link { snake: SnakeId, index: usize },
    Apple,
}

impl Cell {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// The single apple on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apple {
    pub x: i32,
    pub y: i32,
}

/// Square grid of cells, stored row-major
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let size = self.size as i32;
        if x < 0 || x >= size || y < 0 || y >= size {
            return None;
        }
        Some(y as usize * self.size + x as usize)
    }

    /// Occupant at `(x, y)`; `Empty` outside the grid
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.index(x, y).map_or(Cell::Empty, |i| self.cells[i])
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    #[inline]
    pub fn clear(&mut self, x: i32, y: i32) {
        self.set(x, y, Cell::Empty);
    }

    pub fn clear_all(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Find an empty cell, starting the search at a random point
    ///
    /// Scans row-major with wraparound from the random start and returns the
    /// first empty cell found, or `None` once every cell has been visited.
    /// This is a first-fit from a random origin, not a uniform sample over
    /// the empty cells.
    pub fn find_random_empty(&self, random: &mut dyn RandomSource) -> Option<(i32, i32)> {
        let x = random.int_n(self.size);
        let y = random.int_n(self.size);

        for yi in 0..self.size {
            for xi in 0..self.size {
                let cx = (x + xi) % self.size;
                let cy = (y + yi) % self.size;
                if self.cells[cy * self.size + cx].is_empty() {
                    return Some((cx as i32, cy as i32));
                }
            }
        }

        None
    }

    /// Every non-empty cell with its coordinates, row-major
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            if cell.is_empty() {
                None
            } else {
                Some(((i % self.size) as i32, (i / self.size) as i32, *cell))
            }
        })
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }
}
