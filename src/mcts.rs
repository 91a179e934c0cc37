//! Monte Carlo Tree Search engine
//!
//! This module contains the stochastic solver, orchestrating the four
//! phases of selection, expansion, rollout and backpropagation until a
//! rollout reaches the goal.

use std::collections::HashSet;
use std::time::Instant;

use log::debug;
use rand::Rng;

use crate::config::MctsConfig;
use crate::rollout::{RolloutPolicy, UniformRollout};
use crate::state::State;
use crate::stats::SearchStatistics;
use crate::tree::{NodeId, SearchTree};
use crate::utils::uct_value;
use crate::{Result, Route, SolverError};

/// The Monte Carlo Tree Search solver
///
/// Set up with an initial state and a configuration, optionally swap the
/// rollout policy, then call [`run`](Mcts::run) to search for a
/// capture sequence leaving only the King.
pub struct Mcts {
    /// The search tree, rooted at the initial state
    tree: SearchTree,

    /// Configuration for the search
    config: MctsConfig,

    /// Policy choosing captures during rollouts
    rollout_policy: Box<dyn RolloutPolicy>,

    /// Statistics gathered during search
    statistics: SearchStatistics,

    /// States already materialized in the tree, for transposition
    /// deduplication (unused unless enabled in the config)
    seen: HashSet<State>,

    /// Piece count of the initial state, the denominator of the
    /// fractional progress reward
    initial_pieces: usize,
}

impl Mcts {
    /// Creates a new solver for the given initial state
    ///
    /// Rollouts default to the uniform-random policy.
    pub fn new(initial_state: State, config: MctsConfig) -> Self {
        let initial_pieces = initial_state.piece_count();

        Mcts {
            tree: SearchTree::new(initial_state),
            config,
            rollout_policy: Box::new(UniformRollout::new()),
            statistics: SearchStatistics::new(),
            seen: HashSet::new(),
            initial_pieces,
        }
    }

    /// Sets the rollout policy to use
    pub fn with_rollout_policy<P: RolloutPolicy + 'static>(mut self, policy: P) -> Self {
        self.rollout_policy = Box::new(policy);
        self
    }

    /// Runs the search until a solution is found or a budget runs out
    ///
    /// Returns the route from the initial state to the goal state,
    /// inclusive. Without an iteration or time budget the loop retries
    /// indefinitely, so an unsolvable initial state only terminates when a
    /// budget is configured.
    pub fn run(&mut self) -> Result<Route> {
        self.validate_config()?;
        self.statistics = SearchStatistics::new();
        let start = Instant::now();

        let root = self.tree.root();
        if self.tree.node(root).state.is_goal() {
            self.statistics.total_time = start.elapsed();
            return Ok(self.tree.path_states(root));
        }

        if self.config.use_transpositions {
            self.seen.insert(self.tree.node(root).state.clone());
        }

        loop {
            if let Some(max) = self.config.max_iterations {
                if self.statistics.iterations >= max {
                    return Err(self.stop(start, format!("iteration budget of {} exhausted", max)));
                }
            }
            if let Some(max) = self.config.max_time {
                if start.elapsed() >= max {
                    return Err(self.stop(start, format!("time budget of {:?} exhausted", max)));
                }
            }

            if let Some(route) = self.iterate() {
                self.statistics.iterations += 1;
                self.statistics.total_time = start.elapsed();
                self.statistics.tree_size = self.tree.len();
                debug!(
                    "solution of {} captures found after {} iterations",
                    route.len() - 1,
                    self.statistics.iterations
                );
                return Ok(route);
            }
            self.statistics.iterations += 1;
        }
    }

    /// Returns the search statistics
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    fn validate_config(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.config.epsilon) {
            return Err(SolverError::InvalidConfiguration(format!(
                "epsilon must lie in [0, 1], got {}",
                self.config.epsilon
            )));
        }
        if self.config.exploration_constant < 0.0 {
            return Err(SolverError::InvalidConfiguration(format!(
                "exploration constant must be non-negative, got {}",
                self.config.exploration_constant
            )));
        }
        Ok(())
    }

    fn stop(&mut self, start: Instant, reason: String) -> SolverError {
        self.statistics.stopped_early = true;
        self.statistics.total_time = start.elapsed();
        self.statistics.tree_size = self.tree.len();
        debug!("search stopped: {}", reason);
        SolverError::SearchStopped(reason)
    }

    /// Executes one iteration; Some(route) the moment a rollout hits the
    /// goal
    fn iterate(&mut self) -> Option<Route> {
        // 1. Selection
        let leaf = self.select();

        // 2. Expansion: a leaf that has been simulated before gets its
        // children materialized, and the rollout starts from the best of
        // them instead.
        let target = if self.tree.node(leaf).visits == 0 {
            leaf
        } else {
            self.expand(leaf);
            if self.tree.children(leaf).is_empty() {
                leaf
            } else {
                self.best_child(leaf)
            }
        };

        // 3. Rollout
        let (reward, route) = self.simulate(target);
        if route.is_some() {
            return route;
        }

        // 4. Backpropagation
        self.tree.backpropagate(target, reward);
        None
    }

    /// Selection phase: descend through expanded children to a leaf of
    /// the explored tree
    fn select(&mut self) -> NodeId {
        let mut rng = rand::thread_rng();
        let mut current = self.tree.root();

        loop {
            let kids = self.tree.children(current);
            if kids.is_empty() {
                return current;
            }

            // Optional ε-greedy exploration: occasionally take a uniform
            // child instead of the UCT-maximal one.
            current = if self.config.epsilon > 0.0 && rng.gen_bool(self.config.epsilon) {
                kids[rng.gen_range(0..kids.len())]
            } else {
                self.best_child(current)
            };

            self.statistics.visited_nodes += 1;
            let depth = self.tree.node(current).depth;
            self.statistics.max_depth = self.statistics.max_depth.max(depth);
        }
    }

    /// The child maximizing the UCT score under `parent`
    ///
    /// A child with zero visits scores infinity and therefore wins over
    /// any visited sibling. Ties resolve to the first maximal child in
    /// enumeration order.
    fn best_child(&self, parent: NodeId) -> NodeId {
        let parent_visits = self.tree.node(parent).visits;
        let kids = self.tree.children(parent);

        let mut best_score = f64::NEG_INFINITY;
        let mut best = kids[0];

        for &kid in kids {
            let node = self.tree.node(kid);
            let score = uct_value(
                node.total_reward,
                node.visits,
                parent_visits,
                self.config.exploration_constant,
            );
            if score > best_score {
                best_score = score;
                best = kid;
            }
        }

        best
    }

    /// Expansion phase, with optional transposition deduplication
    fn expand(&mut self, id: NodeId) {
        let kids = self.tree.expand(id);

        if self.config.use_transpositions {
            let mut kept = Vec::with_capacity(kids.len());
            for kid in kids {
                let state = self.tree.node(kid).state.clone();
                if self.seen.insert(state) {
                    kept.push(kid);
                }
            }
            self.tree.set_children(id, kept);
        }
    }

    /// Rollout phase: play captures from the node's state until terminal
    ///
    /// The playout walks plain state values, so no simulation subtree is
    /// ever retained. Returns the reward and, when the terminal state is
    /// the goal, the complete root-to-goal route: the tree prefix through
    /// parent back-references plus the playout trace.
    fn simulate(&mut self, id: NodeId) -> (f64, Option<Route>) {
        let mut current = self.tree.node(id).state.clone();
        let mut trace: Vec<State> = Vec::new();

        loop {
            let mut moves = current.transitions();
            if moves.is_empty() {
                break;
            }

            let pick = self.rollout_policy.pick(&current, &moves);
            let (_, next) = moves.swap_remove(pick);
            current = next;
            trace.push(current.clone());
            self.statistics.visited_nodes += 1;
        }

        let reward = self.reward(&current);
        if current.is_goal() {
            let mut route = self.tree.path_states(id);
            route.extend(trace);
            return (reward, Some(route));
        }

        (reward, None)
    }

    /// Reward of a terminal state: 1.0 at the goal, fractional progress
    /// otherwise
    fn reward(&self, terminal: &State) -> f64 {
        if terminal.is_goal() {
            return 1.0;
        }
        (self.initial_pieces - terminal.piece_count()) as f64 / self.initial_pieces as f64
    }
}
