//! # solo-chess
//!
//! A solver for Solo Chess puzzles: starting from a board of pieces,
//! capture repeatedly until exactly one piece, the King, remains. Every
//! piece moves by its usual chess geometry, may perform at most two
//! captures, and the King itself can never be taken.
//!
//! The crate provides the puzzle state and move model plus two tree-search
//! engines over it:
//!
//! - [`Mcts`], a stochastic best-first search (Monte-Carlo Tree Search
//!   with UCT selection and random or heuristic-guided rollouts).
//! - [`Backtrack`], a deterministic depth-first search with
//!   visited-state memoization and optional heuristic move ordering.
//!
//! A [`Generator`] produces random solvable starting states for either
//! engine.
//!
//! ## Basic Usage
//!
//! ```
//! use solo_chess::{Backtrack, BacktrackConfig, Piece, PieceKind, Square, State};
//!
//! fn main() -> Result<(), solo_chess::SolverError> {
//!     // A king beside a pawn: one capture solves the puzzle.
//!     let initial = State::setup(
//!         [
//!             (Piece::new(0, PieceKind::King), Square::new(3, 3)),
//!             (Piece::new(1, PieceKind::Pawn), Square::new(4, 4)),
//!         ],
//!         None,
//!     )?;
//!
//!     let mut solver = Backtrack::new(initial, BacktrackConfig::default());
//!     let route = solver.run()?;
//!
//!     assert_eq!(route.len(), 2);
//!     assert!(route.last().is_some_and(|state| state.is_goal()));
//!     Ok(())
//! }
//! ```
//!
//! The MCTS engine shares the same setup shape; rollouts can be biased by
//! a heuristic:
//!
//! ```
//! use solo_chess::{GreedyRollout, Heuristic, Mcts, MctsConfig, Piece, PieceKind, Square, State};
//!
//! fn main() -> Result<(), solo_chess::SolverError> {
//!     let initial = State::setup(
//!         [
//!             (Piece::new(0, PieceKind::King), Square::new(3, 3)),
//!             (Piece::new(1, PieceKind::Pawn), Square::new(4, 4)),
//!         ],
//!         None,
//!     )?;
//!
//!     let config = MctsConfig::default().with_max_iterations(10_000);
//!     let mut solver = Mcts::new(initial, config)
//!         .with_rollout_policy(GreedyRollout::new(Heuristic::Rank));
//!
//!     let route = solver.run()?;
//!     assert!(route.last().is_some_and(|state| state.is_goal()));
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! Both engines share one model: a [`State`] snapshots the board, a
//! [`Capture`] is an ordered (capturer, captured) pair, and
//! [`State::transitions`] maps every legal capture to its successor
//! state. The engines explore those successors through a [`SearchTree`]
//! whose nodes are expanded lazily and keep index back-references to
//! their parents, so a found goal reconstructs its route by walking
//! upward.
//!
//! MCTS repeats selection (UCT over expanded children), expansion,
//! rollout and backpropagation until a rollout hits a goal state, and
//! rewards partial progress so dead ends still carry gradient.
//! Backtracking explores depth-first, memoizes every visited state to
//! prune transpositions, and reports exhaustion as an ordinary error
//! value rather than looping forever.

pub mod backtrack;
pub mod board;
pub mod config;
pub mod generator;
pub mod mcts;
pub mod piece;
pub mod rollout;
pub mod state;
pub mod stats;
pub mod tree;
pub mod utils;

pub use backtrack::Backtrack;
pub use board::Square;
pub use config::{BacktrackConfig, MctsConfig, SortOrder};
pub use generator::Generator;
pub use mcts::Mcts;
pub use piece::{Piece, PieceId, PieceKind, DEFAULT_CAPTURE_BUDGET};
pub use rollout::{GreedyRollout, RolloutPolicy, UniformRollout};
pub use state::{Capture, Heuristic, Placement, State};
pub use stats::SearchStatistics;
pub use tree::{Children, NodeId, SearchNode, SearchTree};

/// Error types for the puzzle solvers
#[derive(thiserror::Error, Debug)]
pub enum SolverError {
    /// A state was constructed in violation of a board invariant
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// A configuration value was out of range
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The backtracking engine exhausted the space without a solution
    #[error("no solution exists from the initial position")]
    Exhausted,

    /// An iteration or time budget ran out before a solution was found
    #[error("search stopped: {0}")]
    SearchStopped(String),
}

/// Result type for solver operations
pub type Result<T> = std::result::Result<T, SolverError>;

/// An ordered sequence of states from the initial position to the goal
pub type Route = Vec<State>;
