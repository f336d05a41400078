//! Link types for the layout arena.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::node::NodeId;

/// Index of a structural link in the layout arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub usize);

impl LinkId {
    /// Get the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}", self.0)
    }
}

/// An accepted, deduplicated link between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Source node.
    pub source: NodeId,
    /// Target node.
    pub target: NodeId,
    /// Flow magnitude (sum over merged parallel links).
    pub value: f64,
    /// Thickness in pixels.
    pub dy: f64,
    /// Offset within the source node's outgoing stack.
    pub sy: f64,
    /// Offset within the target node's incoming stack.
    pub ty: f64,
    /// Number of input links folded into this one.
    pub merged: usize,
    /// Input position of the representative link.
    pub input_index: usize,
}

impl Link {
    /// Create an unlaid link from a single input link.
    pub fn new(source: NodeId, target: NodeId, value: f64, input_index: usize) -> Self {
        Self {
            source,
            target,
            value,
            dy: 0.0,
            sy: 0.0,
            ty: 0.0,
            merged: 1,
            input_index,
        }
    }

    /// Fold a parallel link into this one.
    pub fn absorb(&mut self, value: f64) {
        self.value += value;
        self.merged += 1;
    }
}

/// An input link excluded from layout because it closes a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularLink {
    /// Source node.
    pub source: NodeId,
    /// Target node.
    pub target: NodeId,
    /// Flow magnitude.
    pub value: f64,
    /// Position in the input link list.
    pub input_index: usize,
}

impl CircularLink {
    /// Whether this is a link from a node to itself.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_sums_and_counts() {
        let mut link = Link::new(NodeId(0), NodeId(1), 5.0, 0);
        link.absorb(3.0);

        assert_eq!(link.value, 8.0);
        assert_eq!(link.merged, 2);
        assert_eq!(link.input_index, 0);
    }

    #[test]
    fn test_self_loop_detection() {
        let looped = CircularLink { source: NodeId(2), target: NodeId(2), value: 1.0, input_index: 4 };
        let back = CircularLink { source: NodeId(2), target: NodeId(0), value: 1.0, input_index: 5 };

        assert!(looped.is_self_loop());
        assert!(!back.is_self_loop());
    }
}
