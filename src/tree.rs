//! Search tree with lazy expansion
//!
//! Both engines explore the puzzle through the same tree: an arena of
//! nodes addressed by [`NodeId`]. Children are held as ids, and every node
//! carries a non-owning index back-reference to its parent, so routes are
//! reconstructed by walking parents without reference cycles.

use crate::state::{Capture, State};

/// Index of a node within its [`SearchTree`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Expansion state of a node's child list
///
/// The list is lazy and explicitly three-valued: children have either
/// never been materialized, are present, or were dropped to release the
/// subtree. Expanding a pruned node materializes them again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Children {
    Unexpanded,
    Expanded(Vec<NodeId>),
    Pruned,
}

/// A node in the search tree
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// The puzzle state at this node
    pub state: State,

    /// The capture that produced this state (None for the root)
    pub capture: Option<Capture>,

    /// Index back-reference to the parent (None for the root)
    pub parent: Option<NodeId>,

    /// Lazily populated child list
    pub children: Children,

    /// Number of times backpropagation has visited this node
    pub visits: u64,

    /// Total reward accumulated from rollouts through this node
    pub total_reward: f64,

    /// Depth in the tree (root = 0)
    pub depth: usize,
}

impl SearchNode {
    /// Average reward of this node, 0.0 before the first visit
    pub fn value(&self) -> f64 {
        if self.visits == 0 {
            return 0.0;
        }
        self.total_reward / self.visits as f64
    }

    /// 1.0 if the wrapped state is a goal, else 0.0
    pub fn goal_value(&self) -> f64 {
        if self.state.is_goal() {
            1.0
        } else {
            0.0
        }
    }
}

/// Arena owning every node of one search
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    /// Creates a tree holding only the root state
    pub fn new(root: State) -> Self {
        SearchTree {
            nodes: vec![SearchNode {
                state: root,
                capture: None,
                parent: None,
                children: Children::Unexpanded,
                visits: 0,
                total_reward: 0.0,
                depth: 0,
            }],
        }
    }

    /// The root node's id
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Borrows a node
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    /// Mutably borrows a node
    pub fn node_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0]
    }

    /// Total number of nodes ever created in this tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds at least its root
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Materializes the children of a node
    ///
    /// Idempotent on an already expanded node. On an unexpanded or pruned
    /// node, creates one child per legal transition, each wired back to
    /// `id` as its parent, and returns the child ids in the deterministic
    /// enumeration order of [`State::transitions`].
    pub fn expand(&mut self, id: NodeId) -> Vec<NodeId> {
        if let Children::Expanded(kids) = &self.nodes[id.0].children {
            return kids.clone();
        }

        let transitions = self.nodes[id.0].state.transitions();
        let depth = self.nodes[id.0].depth + 1;

        let mut kids = Vec::with_capacity(transitions.len());
        for (capture, state) in transitions {
            let child = NodeId(self.nodes.len());
            self.nodes.push(SearchNode {
                state,
                capture: Some(capture),
                parent: Some(id),
                children: Children::Unexpanded,
                visits: 0,
                total_reward: 0.0,
                depth,
            });
            kids.push(child);
        }

        self.nodes[id.0].children = Children::Expanded(kids.clone());
        kids
    }

    /// Current child ids of a node; empty unless expanded
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0].children {
            Children::Expanded(kids) => kids,
            _ => &[],
        }
    }

    /// Replaces the child list of a node
    ///
    /// Used after filtering freshly expanded children against a visited
    /// set; the dropped nodes simply become unreachable.
    pub fn set_children(&mut self, id: NodeId, kids: Vec<NodeId>) {
        self.nodes[id.0].children = Children::Expanded(kids);
    }

    /// Drops the child list, releasing the subtree
    pub fn prune_children(&mut self, id: NodeId) {
        self.nodes[id.0].children = Children::Pruned;
    }

    /// Adds a reward and a visit to every node from `id` up to and
    /// including the root
    pub fn backpropagate(&mut self, id: NodeId, reward: f64) {
        let mut cur = Some(id);
        while let Some(nid) = cur {
            let node = &mut self.nodes[nid.0];
            node.visits += 1;
            node.total_reward += reward;
            cur = node.parent;
        }
    }

    /// The root-to-node state sequence, reconstructed through parent
    /// back-references
    pub fn path_states(&self, id: NodeId) -> Vec<State> {
        let mut states = Vec::new();
        let mut cur = Some(id);
        while let Some(nid) = cur {
            let node = &self.nodes[nid.0];
            states.push(node.state.clone());
            cur = node.parent;
        }
        states.reverse();
        states
    }
}
