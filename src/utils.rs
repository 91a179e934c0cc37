//! UCT scoring helpers
//!
//! The selection score used during the MCTS descent, split into its
//! exploitation and exploration terms.

/// Exploitation term: the average reward of a node
pub fn exploitation_term(total_reward: f64, visits: u64) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    total_reward / visits as f64
}

/// Exploration term: the visit-count bonus for less-visited nodes
pub fn exploration_term(parent_visits: u64, visits: u64, exploration_constant: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }

    exploration_constant * ((parent_visits as f64).ln() / visits as f64).sqrt()
}

/// UCT value of a node under its parent
///
/// A node with zero visits scores positive infinity, so it is always
/// preferred over any visited sibling.
pub fn uct_value(
    total_reward: f64,
    visits: u64,
    parent_visits: u64,
    exploration_constant: f64,
) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }

    exploitation_term(total_reward, visits)
        + exploration_term(parent_visits, visits, exploration_constant)
}
