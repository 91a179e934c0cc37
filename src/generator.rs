//! Random puzzle generator
//!
//! Generates solvable starting states by running a solution backwards:
//! beginning from a lone King, pieces repeatedly step back along a capture
//! geometry and leave a new piece on the square they vacate. Undoing the
//! expansion sequence is then a legal capture sequence down to the King.

use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::Square;
use crate::piece::{Piece, PieceKind, DEFAULT_CAPTURE_BUDGET};
use crate::state::{Placement, State};

const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ALL_DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Kinds a new piece may take; the King is placed exactly once
const SPAWN_KINDS: [PieceKind; 5] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Pawn,
];

/// Generates starting states of a requested size on an N×N board
#[derive(Debug, Clone)]
pub struct Generator {
    board_size: i32,
    capture_budget: u8,
}

impl Generator {
    /// Creates a generator for an N×N board (coordinates `0..N`)
    pub fn new(board_size: i32) -> Self {
        Generator {
            board_size,
            capture_budget: DEFAULT_CAPTURE_BUDGET,
        }
    }

    /// Sets the per-piece capture budget of generated puzzles
    pub fn with_capture_budget(mut self, budget: u8) -> Self {
        self.capture_budget = budget;
        self
    }

    /// Attempts to generate a solvable puzzle with `pieces` pieces
    ///
    /// `pieces` must be at least 1 (the King). Returns None when
    /// generation gets stuck (no placed piece can both afford another
    /// reverse capture and reach an empty square), in which case the
    /// caller simply retries.
    pub fn generate(&self, pieces: usize) -> Option<State> {
        let mut rng = rand::thread_rng();

        let king = Piece::new(0, PieceKind::King);
        let king_square = Square::new(
            rng.gen_range(0..self.board_size),
            rng.gen_range(0..self.board_size),
        );

        let mut board: Vec<(Piece, Square)> = vec![(king, king_square)];
        // Reverse captures charged so far, indexed like `board`.
        let mut charged: Vec<u8> = vec![0];

        for id in 1..pieces as u32 {
            let occupied: Vec<Square> = board.iter().map(|&(_, square)| square).collect();

            // Pieces that can still supply a reverse capture, with the
            // empty squares they could step back to.
            let mut options: Vec<(usize, Vec<Square>)> = Vec::new();
            for (idx, &(piece, square)) in board.iter().enumerate() {
                if charged[idx] >= self.capture_budget {
                    continue;
                }
                let reachable = self.expansion_squares(piece.kind, square, &occupied);
                if !reachable.is_empty() {
                    options.push((idx, reachable));
                }
            }

            let (mover, reachable) = match options.choose(&mut rng) {
                Some(option) => (option.0, &option.1),
                None => {
                    trace!("generation stuck after {} pieces", board.len());
                    return None;
                }
            };
            let target = *reachable.choose(&mut rng)?;

            // The mover backs off to `target`; a new piece appears on the
            // vacated square and will be captured from there.
            let vacated = board[mover].1;
            board[mover].1 = target;
            charged[mover] += 1;

            let kind = *SPAWN_KINDS.choose(&mut rng)?;
            board.push((Piece::new(id, kind), vacated));
            charged.push(0);
        }

        // Every piece enters play with the full budget; the ledger above
        // only guarantees the undo sequence never overdraws it.
        let placements = board
            .into_iter()
            .map(|(piece, square)| Placement {
                piece,
                square,
                captures_left: self.capture_budget,
            })
            .collect();
        let center = Square::new(self.board_size / 2, self.board_size / 2);

        State::new(placements, Some(center)).ok()
    }

    /// Empty squares a piece at `from` could step back to while keeping a
    /// legal capture onto `from`
    ///
    /// Sliding pieces walk their rays and stop at the first occupied
    /// square, so the corresponding forward capture has line-of-sight.
    /// Pawn geometry is reversed: stepping back to `y + 1` makes the
    /// forward capture go toward `y - 1`.
    fn expansion_squares(&self, kind: PieceKind, from: Square, occupied: &[Square]) -> Vec<Square> {
        match kind {
            PieceKind::Queen => self.walk_rays(from, &ALL_DIRECTIONS, occupied),
            PieceKind::Rook => self.walk_rays(from, &ORTHOGONAL, occupied),
            PieceKind::Bishop => self.walk_rays(from, &DIAGONAL, occupied),
            PieceKind::Knight => {
                let steps = [-2i32, -1, 1, 2];
                let mut squares = Vec::new();
                for &i in &steps {
                    for &j in &steps {
                        if i.abs() != j.abs() {
                            squares.push(Square::new(from.x + i, from.y + j));
                        }
                    }
                }
                self.keep_free(squares, occupied)
            }
            PieceKind::Pawn => {
                let squares = vec![
                    Square::new(from.x - 1, from.y + 1),
                    Square::new(from.x + 1, from.y + 1),
                ];
                self.keep_free(squares, occupied)
            }
            PieceKind::King => {
                let squares = ALL_DIRECTIONS
                    .iter()
                    .map(|&(dx, dy)| Square::new(from.x + dx, from.y + dy))
                    .collect();
                self.keep_free(squares, occupied)
            }
        }
    }

    fn walk_rays(&self, from: Square, directions: &[(i32, i32)], occupied: &[Square]) -> Vec<Square> {
        let mut squares = Vec::new();
        for &(dx, dy) in directions {
            let mut step = 1;
            loop {
                let square = Square::new(from.x + dx * step, from.y + dy * step);
                if !self.on_board(square) || occupied.contains(&square) {
                    break;
                }
                squares.push(square);
                step += 1;
            }
        }
        squares
    }

    fn keep_free(&self, mut squares: Vec<Square>, occupied: &[Square]) -> Vec<Square> {
        squares.retain(|square| self.on_board(*square) && !occupied.contains(square));
        squares
    }

    fn on_board(&self, square: Square) -> bool {
        (0..self.board_size).contains(&square.x) && (0..self.board_size).contains(&square.y)
    }
}

impl Default for Generator {
    /// An 8×8 board with the default capture budget
    fn default() -> Self {
        Generator::new(8)
    }
}
