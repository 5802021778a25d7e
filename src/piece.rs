//! Falling piece: occupancy matrix, anchor, movement, rotation and gravity checks.

use crate::board::{Board, Cell};
use crate::catalog::{CatalogRange, ShapeTemplate};
use rand::Rng;

/// `occupancy[row][col]`; every row has the same length.
pub type Occupancy = Vec<Vec<Option<Cell>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Left,
    Right,
}

impl Shift {
    pub fn dx(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// Result of one gravity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fall {
    Fell,
    Landed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub name: &'static str,
    occupancy: Occupancy,
    pub x: i32,
    pub y: i32,
    /// Cleared on a move key press, set again on its release.
    can_move: bool,
    /// Cleared on a rotate key press, set again on its release.
    can_rotate: bool,
}

impl Piece {
    pub fn from_template(template: &ShapeTemplate) -> Self {
        let occupancy = template
            .mask
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&v| (v != 0).then_some(Cell::new(template.color)))
                    .collect()
            })
            .collect();
        Self {
            name: template.name,
            occupancy,
            x: 0,
            y: 0,
            can_move: true,
            can_rotate: true,
        }
    }

    /// Uniform pick over `range`.
    pub fn generate<R: Rng>(rng: &mut R, range: CatalogRange) -> Self {
        let shapes = range.shapes();
        Self::from_template(&shapes[rng.random_range(0..shapes.len())])
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    pub fn width(&self) -> usize {
        self.occupancy.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.occupancy.len()
    }

    /// Occupied cells as (col, row, cell) relative to the anchor.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        occupied(&self.occupancy)
    }

    /// Occupied cells at absolute board coordinates.
    pub fn board_cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.cells().map(|(cx, cy, cell)| (self.x + cx, self.y + cy, cell))
    }

    /// Anchor the piece at the spawn position: horizontal centre, top row.
    pub fn place_at_spawn(&mut self, board: &Board) {
        self.x = (board.width() / 2) as i32;
        self.y = 0;
    }

    /// True when some occupied cell sits on an already populated board cell.
    pub fn overlaps(&self, board: &Board) -> bool {
        self.board_cells().any(|(x, y, _)| board.get(x, y).is_some())
    }

    /// Every cell below the piece exists and is empty.
    pub fn can_fall(&self, board: &Board) -> bool {
        self.board_cells().all(|(x, y, _)| board.is_free(x, y + 1))
    }

    pub fn fall(&mut self, board: &Board) -> Fall {
        if self.can_fall(board) {
            self.y += 1;
            Fall::Fell
        } else {
            Fall::Landed
        }
    }

    /// Move by one column when every destination is on the board and empty.
    /// Returns whether the anchor changed.
    pub fn shift(&mut self, dir: Shift, board: &Board) -> bool {
        let dx = dir.dx();
        let clear = self.board_cells().all(|(x, y, _)| board.is_free(x + dx, y));
        if clear {
            self.x += dx;
        }
        clear
    }

    /// Replace the occupancy with its rotation when the rotated matrix fits
    /// at the current anchor. Returns whether it rotated.
    pub fn rotate(&mut self, dir: Rotation, board: &Board) -> bool {
        let candidate = rotated(&self.occupancy, dir);
        let fits = occupied(&candidate).all(|(cx, cy, _)| board.is_free(self.x + cx, self.y + cy));
        if fits {
            self.occupancy = candidate;
        }
        fits
    }

    /// Key-down for a move key. Acts once until [`Self::release_move`].
    pub fn press_move(&mut self, dir: Shift, board: &Board) -> bool {
        if !self.can_move {
            return false;
        }
        self.can_move = false;
        self.shift(dir, board)
    }

    pub fn release_move(&mut self) {
        self.can_move = true;
    }

    /// Key-down for a rotate key. Acts once until [`Self::release_rotate`].
    pub fn press_rotate(&mut self, dir: Rotation, board: &Board) -> bool {
        if !self.can_rotate {
            return false;
        }
        self.can_rotate = false;
        self.rotate(dir, board)
    }

    pub fn release_rotate(&mut self) {
        self.can_rotate = true;
    }
}

fn occupied(occupancy: &Occupancy) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
    occupancy.iter().enumerate().flat_map(|(y, row)| {
        row.iter()
            .enumerate()
            .filter_map(move |(x, cell)| cell.map(|c| (x as i32, y as i32, c)))
    })
}

/// Quarter turn of a W×H matrix into an H×W one.
/// Right: (x, y) -> row x, col h-1-y. Left: (x, y) -> row w-1-x, col y.
pub fn rotated(occupancy: &Occupancy, dir: Rotation) -> Occupancy {
    let h = occupancy.len();
    let w = occupancy.first().map_or(0, Vec::len);
    let mut out = vec![vec![None; h]; w];
    for (y, row) in occupancy.iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            match dir {
                Rotation::Right => out[x][h - 1 - y] = cell,
                Rotation::Left => out[w - 1 - x][y] = cell,
            }
        }
    }
    out
}
