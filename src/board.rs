//! Board: fixed grid of locked cells, row completion and clearing.

use crate::catalog::Rgba;
use std::collections::VecDeque;

/// One occupied grid position. Identity is its colour only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub color: Rgba,
}

impl Cell {
    pub const fn new(color: Rgba) -> Self {
        Self { color }
    }
}

/// Grid of optional cells. y=0 is the top row; `rows[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    rows: VecDeque<Vec<Option<Cell>>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: (0..height).map(|_| vec![None; width]).collect(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Cell at (x, y); `None` when empty or off the board.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.rows[y as usize][x as usize]
    }

    /// In bounds and unoccupied.
    #[inline]
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.rows[y as usize][x as usize].is_none()
    }

    /// Writes are dropped outside the grid.
    pub fn set(&mut self, x: i32, y: i32, cell: Option<Cell>) {
        if self.in_bounds(x, y) {
            self.rows[y as usize][x as usize] = cell;
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<Cell>]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Indices of rows where every column is occupied, top to bottom.
    pub fn full_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().all(Option::is_some))
            .map(|(y, _)| y)
            .collect()
    }

    /// Remove the given rows and insert as many empty rows at the top.
    /// Returns the number of rows removed.
    pub fn clear_rows(&mut self, indices: &[usize]) -> usize {
        let mut sorted: Vec<usize> = indices.iter().copied().filter(|&y| y < self.height).collect();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        for &y in &sorted {
            self.rows.remove(y);
        }
        for _ in 0..sorted.len() {
            self.rows.push_front(vec![None; self.width]);
        }
        debug_assert_eq!(self.rows.len(), self.height);
        sorted.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }
}
