//! Node value calculation.

use crate::types::{LinkId, SankeyGraph};

/// Set each node's value to the larger of its outgoing and incoming flow.
pub fn compute_node_values(mut graph: SankeyGraph) -> SankeyGraph {
    for i in 0..graph.nodes.len() {
        let outgoing = sum_values(&graph, &graph.nodes[i].source_links);
        let incoming = sum_values(&graph, &graph.nodes[i].target_links);
        graph.nodes[i].value = outgoing.max(incoming);
    }
    graph
}

pub(crate) fn sum_values(graph: &SankeyGraph, links: &[LinkId]) -> f64 {
    links.iter().map(|&id| graph.link(id).value).sum()
}
