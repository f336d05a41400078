//! Core types for the layout engine.

pub mod node;
pub mod link;
pub mod input;
pub mod graph;

pub use node::{Node, NodeId};
pub use link::{Link, LinkId, CircularLink};
pub use input::{NodeInput, LinkInput, Endpoint, GraphInput};
pub use graph::{SankeyGraph, LayoutWarning};
