//! Game state: board, active and next piece, score, tick update.

use crate::board::Board;
use crate::catalog::CatalogRange;
use crate::input::{Action, InputEvent};
use crate::piece::{Fall, Piece, Rotation, Shift};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;

/// What one call to [`Game::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Spawned,
    Fell,
    Locked { cleared: usize },
    GameOver { score: u32 },
    /// Game already over; nothing changed.
    Halted,
}

#[derive(Debug)]
pub struct Game {
    pub board: Board,
    /// `None` between a lock and the next spawn.
    pub active: Option<Piece>,
    pub next: Piece,
    pub score: u32,
    over: bool,
    range: CatalogRange,
    rng: StdRng,
    inputs: VecDeque<InputEvent>,
}

impl Game {
    pub fn new(config: &crate::GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config.width, config.height, config.catalog, rng)
    }

    pub fn with_rng(width: usize, height: usize, range: CatalogRange, mut rng: StdRng) -> Self {
        let next = Piece::generate(&mut rng, range);
        Self {
            board: Board::new(width, height),
            active: None,
            next,
            score: 0,
            over: false,
            range,
            rng,
            inputs: VecDeque::new(),
        }
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Queue a key edge; applied at the start of the next tick.
    pub fn queue_input(&mut self, event: InputEvent) {
        if !self.over {
            self.inputs.push_back(event);
        }
    }

    /// One fixed-interval step: apply queued input, then spawn, fall or lock.
    pub fn update(&mut self) -> Tick {
        if self.over {
            return Tick::Halted;
        }
        self.apply_inputs();

        let Some(mut piece) = self.active.take() else {
            return self.spawn();
        };
        match piece.fall(&self.board) {
            Fall::Fell => {
                self.active = Some(piece);
                Tick::Fell
            }
            Fall::Landed => {
                let cleared = self.lock(&piece);
                Tick::Locked { cleared }
            }
        }
    }

    fn apply_inputs(&mut self) {
        while let Some(event) = self.inputs.pop_front() {
            let Some(piece) = self.active.as_mut() else {
                // Edges for a piece that already locked.
                continue;
            };
            match event {
                InputEvent::Press(Action::MoveLeft) => {
                    piece.press_move(Shift::Left, &self.board);
                }
                InputEvent::Press(Action::MoveRight) => {
                    piece.press_move(Shift::Right, &self.board);
                }
                InputEvent::Press(Action::RotateLeft) => {
                    piece.press_rotate(Rotation::Left, &self.board);
                }
                InputEvent::Press(Action::RotateRight) => {
                    piece.press_rotate(Rotation::Right, &self.board);
                }
                InputEvent::Release(Action::MoveLeft | Action::MoveRight) => piece.release_move(),
                InputEvent::Release(Action::RotateLeft | Action::RotateRight) => piece.release_rotate(),
                InputEvent::Press(_) | InputEvent::Release(_) => {}
            }
        }
    }

    /// Promote the next piece, pre-generate another, and check the spawn cells.
    fn spawn(&mut self) -> Tick {
        let fresh = Piece::generate(&mut self.rng, self.range);
        let mut piece = std::mem::replace(&mut self.next, fresh);
        piece.place_at_spawn(&self.board);
        let blocked = piece.overlaps(&self.board);
        debug!(
            "spawned {} ({}x{}) at ({}, {}), next {}",
            piece.name,
            piece.width(),
            piece.height(),
            piece.x,
            piece.y,
            self.next.name
        );
        self.active = Some(piece);
        if blocked {
            self.over = true;
            self.inputs.clear();
            return Tick::GameOver { score: self.score };
        }
        Tick::Spawned
    }

    /// Copy the piece into the board, clear full rows and score them.
    fn lock(&mut self, piece: &Piece) -> usize {
        for (x, y, cell) in piece.board_cells() {
            self.board.set(x, y, Some(cell));
        }
        let full = self.board.full_rows();
        let cleared = self.board.clear_rows(&full);
        self.score += cleared as u32;
        debug!(
            "locked {} at ({}, {}), {} cells on board",
            piece.name,
            piece.x,
            piece.y,
            self.board.occupied_count()
        );
        cleared
    }
}
