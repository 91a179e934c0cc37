//! Deterministic backtracking engine
//!
//! Depth-first search over the same state and tree model as MCTS, with a
//! global visited-state set so no position is explored twice regardless of
//! the capture order that reached it.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::Instant;

use log::debug;

use crate::config::{BacktrackConfig, SortOrder};
use crate::state::{Heuristic, State};
use crate::stats::SearchStatistics;
use crate::tree::{NodeId, SearchTree};
use crate::{Result, Route, SolverError};

/// The backtracking solver
///
/// Exhausting the whole space without finding a solution is reported as
/// [`SolverError::Exhausted`], a value the caller can match on, typically
/// to regenerate a different puzzle.
pub struct Backtrack {
    /// The search tree, rooted at the initial state
    tree: SearchTree,

    /// Configuration for the search
    config: BacktrackConfig,

    /// Every state seen anywhere in the search
    visited: HashSet<State>,

    /// The current candidate solution, root first
    path: Vec<NodeId>,

    /// Statistics gathered during search
    statistics: SearchStatistics,
}

impl Backtrack {
    /// Creates a new solver for the given initial state
    pub fn new(initial_state: State, config: BacktrackConfig) -> Self {
        Backtrack {
            tree: SearchTree::new(initial_state),
            config,
            visited: HashSet::new(),
            path: Vec::new(),
            statistics: SearchStatistics::new(),
        }
    }

    /// Runs the search to completion
    ///
    /// Returns the route from the initial state to the goal, or
    /// [`SolverError::Exhausted`] once every reachable position has been
    /// tried.
    pub fn run(&mut self) -> Result<Route> {
        self.statistics = SearchStatistics::new();
        self.path.clear();
        let start = Instant::now();

        let root = self.tree.root();
        self.visited.insert(self.tree.node(root).state.clone());

        let found = self.dfs(root);

        self.statistics.visited_nodes = self.visited.len();
        self.statistics.tree_size = self.tree.len();
        self.statistics.total_time = start.elapsed();

        if found? {
            let route = self
                .path
                .iter()
                .map(|&id| self.tree.node(id).state.clone())
                .collect();
            Ok(route)
        } else {
            debug!(
                "search space exhausted after {} states",
                self.visited.len()
            );
            Err(SolverError::Exhausted)
        }
    }

    /// Returns the search statistics
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    fn dfs(&mut self, id: NodeId) -> Result<bool> {
        self.path.push(id);
        let depth = self.tree.node(id).depth;
        self.statistics.max_depth = self.statistics.max_depth.max(depth);

        if self.tree.node(id).state.is_goal() {
            return Ok(true);
        }

        if let Some(max) = self.config.max_visited {
            if self.visited.len() >= max {
                self.statistics.stopped_early = true;
                return Err(SolverError::SearchStopped(format!(
                    "visited budget of {} exhausted",
                    max
                )));
            }
        }

        let kids = self.tree.expand(id);

        // Drop positions already reached through another capture order,
        // then claim the survivors.
        let mut kept = Vec::with_capacity(kids.len());
        for kid in kids {
            let state = self.tree.node(kid).state.clone();
            if self.visited.insert(state) {
                kept.push(kid);
            }
        }

        if let Some(heuristic) = self.config.heuristic {
            kept = self.order_children(id, kept, heuristic);
        }

        self.tree.set_children(id, kept.clone());

        for kid in kept {
            if self.dfs(kid)? {
                return Ok(true);
            }
        }

        // Whole subtree failed: backtrack.
        self.path.pop();
        if self.config.prune_on_backtrack {
            self.tree.prune_children(id);
        }
        Ok(false)
    }

    /// Sorts children by the heuristic score of the capture that produced
    /// them
    ///
    /// The sort is stable, so equal scores keep the enumeration order.
    fn order_children(&self, parent: NodeId, kids: Vec<NodeId>, heuristic: Heuristic) -> Vec<NodeId> {
        let parent_state = &self.tree.node(parent).state;

        let mut scored: Vec<(f64, NodeId)> = kids
            .into_iter()
            .map(|kid| {
                let capture = self
                    .tree
                    .node(kid)
                    .capture
                    .expect("non-root node has a producing capture");
                (parent_state.score(heuristic, &capture), kid)
            })
            .collect();

        scored.sort_by(|a, b| {
            let cmp = a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal);
            match self.config.order {
                SortOrder::Ascending => cmp,
                SortOrder::Descending => cmp.reverse(),
            }
        });

        scored.into_iter().map(|(_, kid)| kid).collect()
    }
}
