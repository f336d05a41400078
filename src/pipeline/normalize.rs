//! Graph normalization: endpoint resolution, cycle breaking and parallel
//! link deduplication.
//!
//! Links are accepted in input order. A link S→T is circular when T can
//! already reach S through accepted links, so whichever edge of a cycle
//! comes last in the input is the one excluded. Acceptance therefore depends
//! on input order; reordering the links can exclude a different edge.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::types::{CircularLink, Endpoint, Link, LinkId, LinkInput, Node, NodeId, NodeInput, SankeyGraph};

/// Error type for normalization.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    /// A link endpoint index is outside the node list.
    #[error("link {link} references node index {index}, but only {node_count} nodes exist")]
    IndexOutOfRange {
        /// Input position of the link.
        link: usize,
        /// Offending index.
        index: usize,
        /// Number of nodes supplied.
        node_count: usize,
    },
    /// A link endpoint names a node that does not exist.
    #[error("link {link} references unknown node {name:?}")]
    UnknownNode {
        /// Input position of the link.
        link: usize,
        /// Offending name.
        name: String,
    },
    /// Two nodes share a name.
    #[error("duplicate node name {name:?} at positions {first} and {second}")]
    DuplicateNode {
        /// Shared name.
        name: String,
        /// Position of the first occurrence.
        first: usize,
        /// Position of the repeat.
        second: usize,
    },
    /// A link value is negative or not finite.
    #[error("link {link} has invalid value {value}")]
    InvalidValue {
        /// Input position of the link.
        link: usize,
        /// Offending value.
        value: f64,
    },
    /// Parallel links sum to a flow outside the finite `f64` range.
    #[error("link {link} overflows the flow of the link it merges into")]
    LinkFlowOverflow {
        /// Input position of the link whose value overflowed the sum.
        link: usize,
    },
    /// A node's incoming or outgoing flow sums outside the finite `f64` range.
    #[error("flow through node {name:?} overflows")]
    NodeFlowOverflow {
        /// Node name.
        name: String,
    },
}

/// Build a [`SankeyGraph`] from caller input.
///
/// Every endpoint is resolved before any link is accepted, so a bad link
/// anywhere in the input fails the whole call. Merged link values and
/// per-node flow sums must stay finite.
pub fn normalize(nodes: &[NodeInput], links: &[LinkInput]) -> Result<SankeyGraph, NormalizeError> {
    let mut by_name: HashMap<&str, NodeId> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if let Some(first) = by_name.insert(node.name.as_str(), NodeId(i)) {
            return Err(NormalizeError::DuplicateNode {
                name: node.name.clone(),
                first: first.0,
                second: i,
            });
        }
    }

    let resolved = links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            if !link.value.is_finite() || link.value < 0.0 {
                return Err(NormalizeError::InvalidValue { link: i, value: link.value });
            }
            let source = resolve(&link.source, i, nodes.len(), &by_name)?;
            let target = resolve(&link.target, i, nodes.len(), &by_name)?;
            Ok((source, target, link.value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut arena: Vec<Node> = nodes.iter().map(|n| Node::new(n.name.clone())).collect();
    let mut accepted: Vec<Link> = Vec::new();
    let mut circular: Vec<CircularLink> = Vec::new();
    let mut by_pair: HashMap<(NodeId, NodeId), LinkId> = HashMap::new();
    let mut successors: Vec<Vec<NodeId>> = vec![Vec::new(); nodes.len()];

    for (input_index, (source, target, value)) in resolved.into_iter().enumerate() {
        if let Some(&id) = by_pair.get(&(source, target)) {
            let link = &mut accepted[id.index()];
            link.absorb(value);
            if !link.value.is_finite() {
                return Err(NormalizeError::LinkFlowOverflow { link: input_index });
            }
            continue;
        }

        if reaches(&successors, target, source) {
            warn!(
                link = input_index,
                source = %arena[source.0].name,
                target = %arena[target.0].name,
                "excluding circular link"
            );
            circular.push(CircularLink { source, target, value, input_index });
            continue;
        }

        let id = LinkId(accepted.len());
        accepted.push(Link::new(source, target, value, input_index));
        by_pair.insert((source, target), id);
        successors[source.0].push(target);
        arena[source.0].source_links.push(id);
        arena[target.0].target_links.push(id);
    }

    for node in &arena {
        for links in [&node.source_links, &node.target_links] {
            let total: f64 = links.iter().map(|id| accepted[id.index()].value).sum();
            if !total.is_finite() {
                return Err(NormalizeError::NodeFlowOverflow { name: node.name.clone() });
            }
        }
    }

    let roots: Vec<NodeId> = arena
        .iter()
        .enumerate()
        .filter(|(_, n)| n.is_source())
        .map(|(i, _)| NodeId(i))
        .collect();

    debug!(
        nodes = arena.len(),
        links = accepted.len(),
        circular = circular.len(),
        roots = roots.len(),
        "normalized graph"
    );

    Ok(SankeyGraph::from_parts(arena, accepted, circular, roots))
}

fn resolve(
    endpoint: &Endpoint,
    link: usize,
    node_count: usize,
    by_name: &HashMap<&str, NodeId>,
) -> Result<NodeId, NormalizeError> {
    match endpoint {
        Endpoint::Index(index) if *index < node_count => Ok(NodeId(*index)),
        Endpoint::Index(index) => Err(NormalizeError::IndexOutOfRange {
            link,
            index: *index,
            node_count,
        }),
        Endpoint::Name(name) => by_name
            .get(name.as_str())
            .copied()
            .ok_or_else(|| NormalizeError::UnknownNode { link, name: name.clone() }),
    }
}

/// Whether `to` is reachable from `from` (a node always reaches itself).
fn reaches(successors: &[Vec<NodeId>], from: NodeId, to: NodeId) -> bool {
    if from == to {
        return true;
    }
    let mut visited = vec![false; successors.len()];
    let mut stack = vec![from];
    visited[from.0] = true;

    while let Some(current) = stack.pop() {
        for &next in &successors[current.0] {
            if next == to {
                return true;
            }
            if !visited[next.0] {
                visited[next.0] = true;
                stack.push(next);
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<NodeInput> {
        list.iter().map(|&n| NodeInput::new(n)).collect()
    }

    #[test]
    fn test_index_and_name_endpoints() {
        let nodes = names(&["a", "b", "c"]);
        let links = vec![LinkInput::new(0, "b", 1.0), LinkInput::new("b", 2, 2.0)];

        let graph = normalize(&nodes, &links).unwrap();

        assert_eq!(graph.num_links(), 2);
        assert_eq!(graph.links[0].source, NodeId(0));
        assert_eq!(graph.links[0].target, NodeId(1));
        assert_eq!(graph.nodes[1].target_links, vec![LinkId(0)]);
        assert_eq!(graph.nodes[1].source_links, vec![LinkId(1)]);
        assert_eq!(graph.roots, vec![NodeId(0)]);
    }

    #[test]
    fn test_index_out_of_range() {
        let nodes = names(&["a", "b"]);
        let links = vec![LinkInput::new(0, 1, 1.0), LinkInput::new(1, 7, 1.0)];

        assert_eq!(
            normalize(&nodes, &links),
            Err(NormalizeError::IndexOutOfRange { link: 1, index: 7, node_count: 2 })
        );
    }

    #[test]
    fn test_unknown_name_and_duplicate_node() {
        let nodes = names(&["a", "b"]);
        let links = vec![LinkInput::new("a", "zzz", 1.0)];
        assert!(matches!(
            normalize(&nodes, &links),
            Err(NormalizeError::UnknownNode { link: 0, .. })
        ));

        let dupes = names(&["a", "b", "a"]);
        assert_eq!(
            normalize(&dupes, &[]),
            Err(NormalizeError::DuplicateNode { name: "a".to_string(), first: 0, second: 2 })
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let nodes = names(&["a", "b"]);
        for value in [-1.0, f64::NAN, f64::INFINITY] {
            let links = vec![LinkInput::new(0, 1, value)];
            assert!(matches!(
                normalize(&nodes, &links),
                Err(NormalizeError::InvalidValue { link: 0, .. })
            ));
        }
    }

    #[test]
    fn test_merged_link_overflow_rejected() {
        let nodes = names(&["a", "b"]);
        let links = vec![LinkInput::new(0, 1, f64::MAX), LinkInput::new(0, 1, f64::MAX)];

        assert_eq!(
            normalize(&nodes, &links),
            Err(NormalizeError::LinkFlowOverflow { link: 1 })
        );
    }

    #[test]
    fn test_node_flow_overflow_rejected() {
        let nodes = names(&["a", "b", "sink"]);
        let links = vec![
            LinkInput::new("a", "sink", f64::MAX),
            LinkInput::new("b", "sink", f64::MAX),
        ];

        assert_eq!(
            normalize(&nodes, &links),
            Err(NormalizeError::NodeFlowOverflow { name: "sink".to_string() })
        );
    }

    #[test]
    fn test_two_cycle_drops_later_link() {
        let nodes = names(&["a", "b"]);
        let links = vec![LinkInput::new(0, 1, 4.0), LinkInput::new(1, 0, 2.0)];

        let graph = normalize(&nodes, &links).unwrap();

        assert_eq!(graph.num_links(), 1);
        assert_eq!(graph.circular_links.len(), 1);
        assert_eq!(graph.circular_links[0].input_index, 1);
        assert!(graph.nodes[1].source_links.is_empty());
        assert!(graph.nodes[0].target_links.is_empty());
    }

    #[test]
    fn test_long_cycle_drops_closing_link() {
        let nodes = names(&["a", "b", "c"]);
        let links = vec![
            LinkInput::new("a", "b", 1.0),
            LinkInput::new("b", "c", 1.0),
            LinkInput::new("c", "a", 1.0),
        ];

        let graph = normalize(&nodes, &links).unwrap();

        assert_eq!(graph.num_links(), 2);
        assert_eq!(graph.circular_links.len(), 1);
        assert_eq!(graph.circular_links[0].source, NodeId(2));
        assert_eq!(graph.circular_links[0].target, NodeId(0));
        assert_eq!(graph.roots, vec![NodeId(0)]);
    }

    #[test]
    fn test_self_loop_is_circular() {
        let nodes = names(&["a"]);
        let links = vec![LinkInput::new(0, 0, 3.0)];

        let graph = normalize(&nodes, &links).unwrap();

        assert_eq!(graph.num_links(), 0);
        assert!(graph.circular_links[0].is_self_loop());
    }

    #[test]
    fn test_parallel_links_merge_into_first() {
        let nodes = names(&["a", "b"]);
        let links = vec![LinkInput::new(0, 1, 5.0), LinkInput::new(0, 1, 3.0)];

        let graph = normalize(&nodes, &links).unwrap();

        assert_eq!(graph.num_links(), 1);
        assert_eq!(graph.links[0].value, 8.0);
        assert_eq!(graph.links[0].merged, 2);
        assert_eq!(graph.links[0].input_index, 0);
        assert_eq!(graph.nodes[0].source_links.len(), 1);
        assert_eq!(graph.nodes[1].target_links.len(), 1);
    }

    #[test]
    fn test_parallel_back_links_stay_circular() {
        let nodes = names(&["a", "b"]);
        let links = vec![
            LinkInput::new(0, 1, 1.0),
            LinkInput::new(1, 0, 1.0),
            LinkInput::new(1, 0, 1.0),
        ];

        let graph = normalize(&nodes, &links).unwrap();

        assert_eq!(graph.num_links(), 1);
        assert_eq!(graph.circular_links.len(), 2);
    }

    #[test]
    fn test_empty_graph() {
        let graph = normalize(&[], &[]).unwrap();
        assert_eq!(graph.num_nodes(), 0);
        assert!(graph.roots.is_empty());
    }
}
