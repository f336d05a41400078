//! Node types for the layout arena.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::link::LinkId;

/// Index of a node in the layout arena.
///
/// Ids are assigned in input order, so `NodeId(i)` is the i-th input node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Get the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A laid-out node.
///
/// `x`/`dx` are set by breadth assignment, `y`/`dy` by depth resolution and
/// `value` by the value calculator. Adjacency lists hold only accepted links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node name.
    pub name: String,
    /// Horizontal layer index (0 = leftmost).
    pub layer: usize,
    /// Horizontal position in pixels.
    pub x: f64,
    /// Node width in pixels.
    pub dx: f64,
    /// Vertical position in pixels.
    pub y: f64,
    /// Node height in pixels.
    pub dy: f64,
    /// Flow magnitude through the node.
    pub value: f64,
    /// Outgoing links.
    pub source_links: Vec<LinkId>,
    /// Incoming links.
    pub target_links: Vec<LinkId>,
}

impl Node {
    /// Create a node with no layout applied yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layer: 0,
            x: 0.0,
            dx: 0.0,
            y: 0.0,
            dy: 0.0,
            value: 0.0,
            source_links: Vec::new(),
            target_links: Vec::new(),
        }
    }

    /// Vertical centre of the node.
    pub fn center(&self) -> f64 {
        self.y + self.dy / 2.0
    }

    /// Bottom edge of the node.
    pub fn bottom(&self) -> f64 {
        self.y + self.dy
    }

    /// Right edge of the node.
    pub fn right(&self) -> f64 {
        self.x + self.dx
    }

    /// A node with no incoming links.
    pub fn is_source(&self) -> bool {
        self.target_links.is_empty()
    }

    /// A node with no outgoing links.
    pub fn is_sink(&self) -> bool {
        self.source_links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_helpers() {
        let mut node = Node::new("a");
        node.x = 10.0;
        node.dx = 24.0;
        node.y = 5.0;
        node.dy = 30.0;

        assert_eq!(node.center(), 20.0);
        assert_eq!(node.bottom(), 35.0);
        assert_eq!(node.right(), 34.0);
    }

    #[test]
    fn test_fresh_node_is_source_and_sink() {
        let node = Node::new("lonely");
        assert!(node.is_source());
        assert!(node.is_sink());
    }
}
