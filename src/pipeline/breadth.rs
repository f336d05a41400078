//! Breadth assignment: horizontal layering.
//!
//! Layers are assigned by sweeping frontiers out from the roots, so every
//! node ends on the longest-path distance from a root. Sinks are then pulled
//! to the last layer so terminal nodes line up on the right edge.

use tracing::debug;

use crate::config::LayoutConfig;
use crate::types::{NodeId, SankeyGraph};

/// Assign `layer`, `x` and `dx` to every node.
pub fn assign_breadths(mut graph: SankeyGraph, config: &LayoutConfig) -> SankeyGraph {
    let n = graph.nodes.len();
    let mut frontier: Vec<NodeId> = graph.roots.clone();
    let mut layer = 0usize;

    // An acyclic graph has at most `n` layers.
    while !frontier.is_empty() && layer <= n {
        let mut queued = vec![false; n];
        let mut next = Vec::new();
        for &id in &frontier {
            graph.nodes[id.0].layer = layer;
            for &link in &graph.nodes[id.0].source_links {
                let target = graph.links[link.0].target;
                if !queued[target.0] {
                    queued[target.0] = true;
                    next.push(target);
                }
            }
        }
        frontier = next;
        layer += 1;
    }
    let layer_count = layer;

    for node in graph.nodes.iter_mut().filter(|node| node.is_sink()) {
        node.layer = layer_count.saturating_sub(1);
    }

    let kx = if layer_count > 1 {
        (config.width - config.node_width) / (layer_count - 1) as f64
    } else {
        config.width
    };
    for node in &mut graph.nodes {
        node.x = node.layer as f64 * kx;
        node.dx = config.node_width;
    }

    debug!(layers = layer_count, kx, "assigned node breadths");
    graph.layer_count = layer_count;
    graph
}
