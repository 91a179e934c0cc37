//! Statistics collection for puzzle searches
//!
//! Both engines fill the same statistics structure, so an external
//! experiment harness can tabulate runs without caring which engine
//! produced them.

use std::time::Duration;

/// Statistics collected during a search
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    /// Number of MCTS iterations performed (0 for backtracking)
    pub iterations: usize,

    /// Number of states examined
    ///
    /// For MCTS this counts selection steps and rollout steps; for
    /// backtracking it is the size of the visited set.
    pub visited_nodes: usize,

    /// Total number of nodes created in the search tree
    pub tree_size: usize,

    /// Maximum depth reached in the tree
    pub max_depth: usize,

    /// Total time spent searching
    pub total_time: Duration,

    /// Whether the search stopped on a budget rather than a result
    pub stopped_early: bool,
}

impl SearchStatistics {
    /// Creates a new, empty statistics object
    pub fn new() -> Self {
        SearchStatistics {
            iterations: 0,
            visited_nodes: 0,
            tree_size: 1, // Start with root node
            max_depth: 0,
            total_time: Duration::from_secs(0),
            stopped_early: false,
        }
    }

    /// Returns the number of visited states per second
    pub fn visited_per_second(&self) -> f64 {
        if self.total_time.as_secs_f64() <= 0.0 {
            return 0.0;
        }
        self.visited_nodes as f64 / self.total_time.as_secs_f64()
    }

    /// Returns a summary of the statistics as a string
    pub fn summary(&self) -> String {
        format!(
            "Search Statistics:\n\
             - Iterations: {}\n\
             - Visited states: {}\n\
             - Tree size: {} nodes\n\
             - Max depth: {}\n\
             - Total time: {:.3} seconds\n\
             - Visited states per second: {:.1}\n\
             - Stopped early: {}",
            self.iterations,
            self.visited_nodes,
            self.tree_size,
            self.max_depth,
            self.total_time.as_secs_f64(),
            self.visited_per_second(),
            self.stopped_early
        )
    }
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new()
    }
}
