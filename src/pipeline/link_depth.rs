//! Link depth assignment: per-link offsets within each node's stack.

use std::mem;

use tracing::debug;

use crate::types::{Link, LinkId, SankeyGraph};

/// Order every node's links by the vertical centre of the far endpoint and
/// stack them into `sy`/`ty` offsets.
///
/// Sorting is stable, so links whose far ends share a centre keep their
/// previous relative order and repeated calls give identical offsets.
pub fn assign_link_depths(mut graph: SankeyGraph) -> SankeyGraph {
    for i in 0..graph.nodes.len() {
        let mut outgoing = mem::take(&mut graph.nodes[i].source_links);
        outgoing.sort_by(|&a, &b| {
            let ca = graph.node(graph.link(a).target).center();
            let cb = graph.node(graph.link(b).target).center();
            ca.total_cmp(&cb)
        });
        graph.nodes[i].source_links = outgoing;

        let mut incoming = mem::take(&mut graph.nodes[i].target_links);
        incoming.sort_by(|&a, &b| {
            let ca = graph.node(graph.link(a).source).center();
            let cb = graph.node(graph.link(b).source).center();
            ca.total_cmp(&cb)
        });
        graph.nodes[i].target_links = incoming;
    }

    for i in 0..graph.nodes.len() {
        let outgoing = mem::take(&mut graph.nodes[i].source_links);
        stack(&mut graph, &outgoing, |link, offset| link.sy = offset);
        graph.nodes[i].source_links = outgoing;

        let incoming = mem::take(&mut graph.nodes[i].target_links);
        stack(&mut graph, &incoming, |link, offset| link.ty = offset);
        graph.nodes[i].target_links = incoming;
    }

    debug!(links = graph.links.len(), "assigned link depths");
    graph
}

fn stack(graph: &mut SankeyGraph, links: &[LinkId], mut set: impl FnMut(&mut Link, f64)) {
    let mut offset = 0.0;
    for &id in links {
        let link = &mut graph.links[id.0];
        set(link, offset);
        offset += link.dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Node, NodeId};

    /// Hand-placed fan: `hub` feeds three targets stacked bottom to top.
    fn fan() -> SankeyGraph {
        let mut nodes: Vec<Node> = ["hub", "low", "mid", "high"].iter().map(|&n| Node::new(n)).collect();
        nodes[0].dy = 60.0;
        for (node, y) in nodes[1..].iter_mut().zip([200.0, 100.0, 0.0]) {
            node.y = y;
            node.dy = 20.0;
        }

        let mut links = Vec::new();
        for (i, target) in [1, 2, 3].into_iter().enumerate() {
            let mut link = Link::new(NodeId(0), NodeId(target), 20.0, i);
            link.dy = 20.0;
            links.push(link);
            nodes[0].source_links.push(LinkId(i));
            nodes[target].target_links.push(LinkId(i));
        }
        SankeyGraph::from_parts(nodes, links, Vec::new(), vec![NodeId(0)])
    }

    #[test]
    fn test_outgoing_sorted_by_target_center() {
        let graph = assign_link_depths(fan());

        assert_eq!(graph.nodes[0].source_links, vec![LinkId(2), LinkId(1), LinkId(0)]);
        assert_eq!(graph.links[2].sy, 0.0);
        assert_eq!(graph.links[1].sy, 20.0);
        assert_eq!(graph.links[0].sy, 40.0);
        assert!(graph.links.iter().all(|l| l.ty == 0.0));
    }

    #[test]
    fn test_relayout_is_idempotent() {
        let once = assign_link_depths(fan());
        let twice = assign_link_depths(once.clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_moving_a_target_reorders_links() {
        let mut graph = assign_link_depths(fan());
        graph.nodes[1].y = -50.0;

        let graph = assign_link_depths(graph);

        assert_eq!(graph.nodes[0].source_links[0], LinkId(0));
        assert_eq!(graph.links[0].sy, 0.0);
    }
}
