//! Puzzle snapshots, capture legality and transitions
//!
//! A [`State`] is an immutable snapshot of the puzzle: which pieces are on
//! the board, where they stand, and how many captures each has left. Every
//! transition produces a new value; the search engines never mutate a state
//! in place.

use crate::board::{aligned_diagonal, aligned_horizontal, aligned_vertical, Square};
use crate::piece::{Piece, PieceId, PieceKind, DEFAULT_CAPTURE_BUDGET};
use crate::{Result, SolverError};

/// One piece on the board: its identity, square and remaining captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub piece: Piece,
    pub square: Square,
    /// Captures this piece may still perform; a piece at 0 never captures again
    pub captures_left: u8,
}

/// An ordered capture: `capturer` takes the piece `captured`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capture {
    pub capturer: PieceId,
    pub captured: PieceId,
}

/// Heuristics for scoring candidate captures
///
/// Scores rank or bias choices during search; they never decide legality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// Favors a low-rank piece capturing a low-rank target with little
    /// capture budget left (higher score = more favorable)
    Rank,
    /// Favors captures over longer distances by pieces currently far from
    /// the reference center square
    Center,
}

/// A snapshot of the puzzle
///
/// Placements are kept sorted by piece id, which makes the derived
/// equality and hash canonical: two states reached through different
/// capture orders compare equal iff the same pieces stand on the same
/// squares with the same budgets. That is what the transposition and
/// visited sets key on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    placements: Vec<Placement>,
    center: Option<Square>,
}

impl State {
    /// Creates a state from explicit placements
    ///
    /// Validates the board invariants: no two pieces share a square and no
    /// two placements share an identity.
    pub fn new(mut placements: Vec<Placement>, center: Option<Square>) -> Result<Self> {
        placements.sort_by_key(|pl| pl.piece.id);

        for pair in placements.windows(2) {
            if pair[0].piece.id == pair[1].piece.id {
                return Err(SolverError::InvalidPosition(format!(
                    "duplicate piece id {}",
                    pair[0].piece.id
                )));
            }
        }
        for (i, a) in placements.iter().enumerate() {
            for b in &placements[i + 1..] {
                if a.square == b.square {
                    return Err(SolverError::InvalidPosition(format!(
                        "pieces {} and {} share square {}",
                        a.piece, b.piece, a.square
                    )));
                }
            }
        }

        Ok(State { placements, center })
    }

    /// Creates a state giving every piece the default capture budget
    pub fn setup(
        pieces: impl IntoIterator<Item = (Piece, Square)>,
        center: Option<Square>,
    ) -> Result<Self> {
        let placements = pieces
            .into_iter()
            .map(|(piece, square)| Placement {
                piece,
                square,
                captures_left: DEFAULT_CAPTURE_BUDGET,
            })
            .collect();
        State::new(placements, center)
    }

    /// The placements, sorted by piece id
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Looks up the placement of a piece by id
    pub fn placement(&self, id: PieceId) -> Option<&Placement> {
        self.placements.iter().find(|pl| pl.piece.id == id)
    }

    /// Number of pieces still on the board
    pub fn piece_count(&self) -> usize {
        self.placements.len()
    }

    /// The reference square for the Center heuristic, if any
    pub fn center(&self) -> Option<Square> {
        self.center
    }

    /// Squares currently occupied by a piece
    pub fn occupied_squares(&self) -> Vec<Square> {
        self.placements.iter().map(|pl| pl.square).collect()
    }

    /// Enumerates every legal capture in this state
    ///
    /// Tests every ordered pair of distinct pieces; enumeration order
    /// follows the sorted placements, so the result is deterministic for a
    /// given state.
    pub fn legal_captures(&self) -> Vec<Capture> {
        let occupied = self.occupied_squares();
        let mut captures = Vec::new();

        for a in &self.placements {
            for b in &self.placements {
                if self.capture_allowed(a, b, &occupied) {
                    captures.push(Capture {
                        capturer: a.piece.id,
                        captured: b.piece.id,
                    });
                }
            }
        }

        captures
    }

    /// Returns true if `capturer` may legally take `captured` here
    ///
    /// False when either piece is not on the board.
    pub fn is_legal_capture(&self, capturer: PieceId, captured: PieceId) -> bool {
        match (self.placement(capturer), self.placement(captured)) {
            (Some(a), Some(b)) => {
                let occupied = self.occupied_squares();
                self.capture_allowed(a, b, &occupied)
            }
            _ => false,
        }
    }

    fn capture_allowed(&self, a: &Placement, b: &Placement, occupied: &[Square]) -> bool {
        // Universal preconditions: no self-capture, the King is never
        // captured, and the capturer must have budget left.
        if a.piece.id == b.piece.id || b.piece.kind == PieceKind::King || a.captures_left == 0 {
            return false;
        }

        let from = a.square;
        let to = b.square;

        match a.piece.kind {
            PieceKind::Queen => {
                aligned_vertical(from, to, occupied)
                    || aligned_horizontal(from, to, occupied)
                    || aligned_diagonal(from, to, occupied)
            }
            PieceKind::Rook => {
                aligned_vertical(from, to, occupied) || aligned_horizontal(from, to, occupied)
            }
            PieceKind::Bishop => aligned_diagonal(from, to, occupied),
            PieceKind::Knight => {
                let dx = (to.x - from.x).abs();
                let dy = (to.y - from.y).abs();
                (dx == 1 && dy == 2) || (dx == 2 && dy == 1)
            }
            // Pawns capture one square diagonally forward, toward lower rows.
            PieceKind::Pawn => to.y == from.y - 1 && (to.x - from.x).abs() == 1,
            PieceKind::King => from.chebyshev(to) <= 1,
        }
    }

    /// Applies a capture, producing the successor state
    ///
    /// The captured piece leaves the board, the capturer moves onto its
    /// square and loses one unit of budget; the center square carries over.
    ///
    /// The capture must be legal in this state; legality is a
    /// precondition, not re-validated here.
    pub fn apply_capture(&self, capture: &Capture) -> State {
        debug_assert!(
            self.is_legal_capture(capture.capturer, capture.captured),
            "apply_capture called with an illegal pair"
        );

        let target = self
            .placement(capture.captured)
            .expect("captured piece must be on the board")
            .square;

        let mut placements = Vec::with_capacity(self.placements.len() - 1);
        for pl in &self.placements {
            if pl.piece.id == capture.captured {
                continue;
            }
            let mut pl = *pl;
            if pl.piece.id == capture.capturer {
                pl.square = target;
                pl.captures_left -= 1;
            }
            placements.push(pl);
        }

        State {
            placements,
            center: self.center,
        }
    }

    /// The full successor mapping: every legal capture paired with the
    /// state it produces
    pub fn transitions(&self) -> Vec<(Capture, State)> {
        self.legal_captures()
            .into_iter()
            .map(|capture| {
                let next = self.apply_capture(&capture);
                (capture, next)
            })
            .collect()
    }

    /// True iff exactly the King remains
    pub fn is_goal(&self) -> bool {
        self.placements.len() == 1 && self.placements[0].piece.kind == PieceKind::King
    }

    /// True iff no further capture is possible
    ///
    /// Either one piece remains, or two or more remain but none can
    /// capture (a dead end).
    pub fn is_terminal(&self) -> bool {
        self.placements.len() == 1 || self.legal_captures().is_empty()
    }

    /// Scores a candidate capture under the given heuristic
    ///
    /// Both pieces must be on the board; higher scores mark more favorable
    /// captures.
    pub fn score(&self, heuristic: Heuristic, capture: &Capture) -> f64 {
        let a = self
            .placement(capture.capturer)
            .expect("capturer must be on the board");
        let b = self
            .placement(capture.captured)
            .expect("captured piece must be on the board");

        match heuristic {
            Heuristic::Rank => {
                1.0 / (a.piece.rank() as f64 + b.captures_left as f64 * b.piece.rank() as f64)
            }
            Heuristic::Center => {
                let reach = a.square.distance(b.square);
                let spread = self
                    .center
                    .map_or(0.0, |center| a.square.distance(center));
                reach + spread
            }
        }
    }
}
