//! The normalized, laid-out graph.

use serde::{Deserialize, Serialize};

use super::link::{CircularLink, Link, LinkId};
use super::node::{Node, NodeId};
use crate::canonical::{canonical_hash_hex, quantize};

/// Non-fatal condition detected during layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutWarning {
    /// A layer's nodes plus padding cannot fit in the vertical extent.
    ///
    /// Collision resolution clamps best-effort; some nodes end below the
    /// configured height.
    LayerOverflow {
        /// Layer index (0 = leftmost).
        layer: usize,
        /// Packed height the layer needs.
        required: f64,
        /// Configured vertical extent.
        available: f64,
    },
}

/// Arena of nodes and links produced by normalization and annotated by the
/// later stages.
///
/// The layout stages expect a graph built by [`crate::pipeline::normalize`]:
/// every `NodeId`/`LinkId` in range, every `layer` below the node count and
/// an acyclic link set. Fields are public and the type deserializes, so a
/// hand-built or deserialized graph that breaks this precondition makes
/// the accessors and stages panic on out-of-range indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyGraph {
    /// Nodes in input order.
    pub nodes: Vec<Node>,
    /// Accepted links, in order of first acceptance.
    pub links: Vec<Link>,
    /// Links excluded because they close a cycle.
    pub circular_links: Vec<CircularLink>,
    /// Nodes with no accepted incoming link.
    pub roots: Vec<NodeId>,
    /// Number of horizontal layers (0 before breadth assignment).
    pub layer_count: usize,
    /// Non-fatal diagnostics.
    pub warnings: Vec<LayoutWarning>,
}

#[derive(Serialize)]
struct QuantizedNode {
    x: i64,
    dx: i64,
    y: i64,
    dy: i64,
    value: i64,
}

#[derive(Serialize)]
struct QuantizedLink {
    source: usize,
    target: usize,
    dy: i64,
    sy: i64,
    ty: i64,
}

impl SankeyGraph {
    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        links: Vec<Link>,
        circular_links: Vec<CircularLink>,
        roots: Vec<NodeId>,
    ) -> Self {
        Self {
            nodes,
            links,
            circular_links,
            roots,
            layer_count: 0,
            warnings: Vec::new(),
        }
    }

    /// Get a node by id.
    ///
    /// Panics if `id` is out of range.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Get a mutable node by id.
    ///
    /// Panics if `id` is out of range.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Get a link by id.
    ///
    /// Panics if `id` is out of range.
    pub fn link(&self, id: LinkId) -> &Link {
        &self.links[id.index()]
    }

    /// Look up a node id by name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// Look up a node by name.
    pub fn node_named(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Find the structural link from `source` to `target`, if accepted.
    pub fn link_between(&self, source: NodeId, target: NodeId) -> Option<&Link> {
        self.node(source)
            .source_links
            .iter()
            .map(|&id| self.link(id))
            .find(|link| link.target == target)
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of accepted links.
    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    /// Group node ids by layer, leftmost first.
    ///
    /// Within a layer nodes keep arena order.
    pub fn layers(&self) -> Vec<Vec<NodeId>> {
        let count = self.nodes.iter().map(|n| n.layer + 1).max().unwrap_or(0);
        let mut layers: Vec<Vec<NodeId>> = vec![Vec::new(); count];
        for (i, node) in self.nodes.iter().enumerate() {
            layers[node.layer].push(NodeId(i));
        }
        layers
    }

    /// Nodes that extend past the vertical extent `[0, height]`.
    pub fn overflowing_nodes(&self, height: f64) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.y < 0.0 || n.bottom() > height + 1e-9)
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// Whether any layer overflow was detected.
    pub fn is_degenerate(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, LayoutWarning::LayerOverflow { .. }))
    }

    /// Hash of all computed coordinates.
    ///
    /// Coordinates are quantized before hashing, so two layouts with the
    /// same fingerprint agree to within 1e-6 pixels.
    pub fn fingerprint(&self) -> String {
        let nodes: Vec<QuantizedNode> = self
            .nodes
            .iter()
            .map(|n| QuantizedNode {
                x: quantize(n.x),
                dx: quantize(n.dx),
                y: quantize(n.y),
                dy: quantize(n.dy),
                value: quantize(n.value),
            })
            .collect();
        let links: Vec<QuantizedLink> = self
            .links
            .iter()
            .map(|l| QuantizedLink {
                source: l.source.0,
                target: l.target.0,
                dy: quantize(l.dy),
                sy: quantize(l.sy),
                ty: quantize(l.ty),
            })
            .collect();
        canonical_hash_hex(&(crate::LAYOUT_SCHEMA_VERSION, nodes, links))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_layers(layers: &[usize]) -> SankeyGraph {
        let nodes = layers
            .iter()
            .enumerate()
            .map(|(i, &layer)| {
                let mut n = Node::new(format!("n{}", i));
                n.layer = layer;
                n.x = layer as f64 * 50.0;
                n
            })
            .collect();
        SankeyGraph::from_parts(nodes, Vec::new(), Vec::new(), Vec::new())
    }

    #[test]
    fn test_layers_group_by_layer_index() {
        let graph = graph_with_layers(&[2, 0, 2, 1]);
        let layers = graph.layers();

        assert_eq!(
            layers,
            vec![vec![NodeId(1)], vec![NodeId(3)], vec![NodeId(0), NodeId(2)]]
        );
    }

    #[test]
    fn test_layers_empty_graph() {
        let graph = graph_with_layers(&[]);
        assert!(graph.layers().is_empty());
    }

    #[test]
    fn test_overflowing_nodes() {
        let mut graph = graph_with_layers(&[0, 0]);
        graph.nodes[0].y = 10.0;
        graph.nodes[0].dy = 20.0;
        graph.nodes[1].y = 90.0;
        graph.nodes[1].dy = 20.0;

        assert_eq!(graph.overflowing_nodes(100.0), vec![NodeId(1)]);
    }

    #[test]
    fn test_fingerprint_tracks_coordinates() {
        let graph = graph_with_layers(&[0, 1]);
        let mut moved = graph.clone();
        moved.nodes[1].y = 4.0;

        assert_eq!(graph.fingerprint(), graph.clone().fingerprint());
        assert_ne!(graph.fingerprint(), moved.fingerprint());
    }
}
