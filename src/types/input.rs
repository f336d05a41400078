//! Caller-supplied graph description.
//!
//! Links may name their endpoints either by position in the node list or by
//! node name. In JSON, numbers are indices and strings are names:
//!
//! ```json
//! { "nodes": [{ "name": "web" }, { "name": "db" }],
//!   "links": [{ "source": 0, "target": "db", "value": 3 }] }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::LayoutOptions;

/// A node as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInput {
    /// Unique node name.
    pub name: String,
}

impl NodeInput {
    /// Create a node input.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<&str> for NodeInput {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Reference to a link endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    /// 0-based position in the node list.
    Index(usize),
    /// Node name.
    Name(String),
}

impl From<usize> for Endpoint {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for Endpoint {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Endpoint {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "#{}", i),
            Self::Name(name) => write!(f, "{:?}", name),
        }
    }
}

/// A weighted directed link as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkInput {
    /// Source endpoint.
    pub source: Endpoint,
    /// Target endpoint.
    pub target: Endpoint,
    /// Flow magnitude.
    pub value: f64,
}

impl LinkInput {
    /// Create a link input.
    pub fn new(source: impl Into<Endpoint>, target: impl Into<Endpoint>, value: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value,
        }
    }
}

/// A full layout request, as read by the CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
    /// Nodes in arena order.
    pub nodes: Vec<NodeInput>,
    /// Links in acceptance order.
    pub links: Vec<LinkInput>,
    /// Configuration overrides.
    #[serde(default)]
    pub options: LayoutOptions,
}
