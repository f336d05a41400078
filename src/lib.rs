//! # sankey-layout
//!
//! Deterministic Sankey flow layout.
//!
//! Given nodes and weighted directed links, the layout answers:
//!
//! > Where does each node sit, how tall is it, and where inside each node's
//! > stack does every link attach?
//!
//! ## Pipeline
//!
//! ```text
//! (nodes, links) → Normalize → Values → Breadth → Depth → LinkDepth → SankeyGraph
//!                     ↓                                                   ↓
//!              circular links                                     LinkPath (SVG)
//! ```
//!
//! 1. **Normalize**: resolve endpoints, exclude cycle-closing links, merge
//!    parallel links
//! 2. **Values**: node value = max(outgoing flow, incoming flow)
//! 3. **Breadth**: longest-path layering, sinks pulled to the right edge
//! 4. **Depth**: damped relaxation toward linked neighbours with collision
//!    resolution inside a fixed height
//! 5. **Link depth**: stack links on each node ordered by the far endpoint
//!
//! ## Quick Start
//!
//! ```rust
//! use sankey_layout::{LayoutConfig, LinkInput, NodeInput, Sankey};
//!
//! let mut sankey = Sankey::new(LayoutConfig::new(600.0, 400.0)).unwrap();
//! sankey.set_graph(
//!     vec![NodeInput::new("web"), NodeInput::new("api"), NodeInput::new("db")],
//!     vec![LinkInput::new("web", "api", 12.0), LinkInput::new(1, 2, 7.0)],
//! );
//! let graph = sankey.layout(32).unwrap();
//! assert_eq!(graph.layer_count, 3);
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same input + same config → identical coordinates (and `fingerprint`)
//! - Link acceptance follows input order
//! - Ties in every sort keep arena order

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod config;
pub mod pipeline;
pub mod sankey;
pub mod path;
pub mod canonical;

// Re-exports
pub use types::{
    Node, NodeId, Link, LinkId, CircularLink,
    NodeInput, LinkInput, Endpoint, GraphInput,
    SankeyGraph, LayoutWarning,
};
pub use config::{LayoutConfig, LayoutOptions, ConfigError};
pub use pipeline::{
    normalize, compute_node_values, assign_breadths, resolve_depths, assign_link_depths,
    NormalizeError,
};
pub use sankey::{Sankey, LayoutError};
pub use path::{LinkPath, PathDescriptor, Point};
pub use canonical::{canonical_hash, canonical_hash_hex};

/// Schema version of the serialized layout.
/// Increment on breaking changes to `SankeyGraph` or `LayoutConfig`.
pub const LAYOUT_SCHEMA_VERSION: &str = "sankey_layout_v1";

/// Lay out a graph in one call.
///
/// Validates `config`, then runs every stage with `config.iterations`
/// relaxation rounds.
pub fn compute_layout(
    nodes: &[NodeInput],
    links: &[LinkInput],
    config: &LayoutConfig,
) -> Result<SankeyGraph, LayoutError> {
    config.validate()?;
    Ok(pipeline::run(nodes, links, config, config.iterations)?)
}
