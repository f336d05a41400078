//! The five layout stages.
//!
//! ```text
//! (nodes, links) → normalize → values → breadth → depth → link_depth → SankeyGraph
//! ```
//!
//! Each stage after `normalize` is a `SankeyGraph → SankeyGraph` transform and
//! can be run on its own, e.g. `assign_link_depths` after the caller has
//! moved nodes.

pub mod normalize;
pub mod values;
pub mod breadth;
pub mod depth;
pub mod link_depth;

pub use normalize::{normalize, NormalizeError};
pub use values::compute_node_values;
pub use breadth::assign_breadths;
pub use depth::resolve_depths;
pub use link_depth::assign_link_depths;

use crate::config::LayoutConfig;
use crate::types::{LinkInput, NodeInput, SankeyGraph};

/// Run every stage in order with `iterations` relaxation rounds.
pub fn run(
    nodes: &[NodeInput],
    links: &[LinkInput],
    config: &LayoutConfig,
    iterations: usize,
) -> Result<SankeyGraph, NormalizeError> {
    let graph = normalize(nodes, links)?;
    let graph = compute_node_values(graph);
    let graph = assign_breadths(graph, config);
    let graph = resolve_depths(graph, config, iterations);
    Ok(assign_link_depths(graph))
}
