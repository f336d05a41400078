//! Stateful layout engine.
//!
//! `Sankey` holds a configuration, the caller's input graph and the most
//! recent layout. It exists for callers that lay out once and then adjust
//! (drag a node, re-stack links); one-shot callers can use
//! [`crate::compute_layout`] instead.

use tracing::{debug, info_span};

use crate::config::{ConfigError, LayoutConfig, LayoutOptions};
use crate::path::LinkPath;
use crate::pipeline::{self, NormalizeError};
use crate::types::{LinkInput, NodeId, NodeInput, SankeyGraph};

/// Error type for layout operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// Input graph could not be normalized.
    #[error("invalid graph: {0}")]
    Graph(#[from] NormalizeError),
    /// Configuration rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// `relayout` or node moves before any `layout`.
    #[error("no layout has been computed yet")]
    NotLaidOut,
    /// Node id outside the laid-out graph.
    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),
}

/// Sankey layout engine.
///
/// ## Lifecycle
///
/// 1. `configure` / `new` to set dimensions
/// 2. `set_graph` to install nodes and links
/// 3. `layout` to run every stage
/// 4. optionally `move_node` + `relayout` to re-stack links after edits
#[derive(Debug, Clone, Default)]
pub struct Sankey {
    config: LayoutConfig,
    nodes: Vec<NodeInput>,
    links: Vec<LinkInput>,
    graph: Option<SankeyGraph>,
}

impl Sankey {
    /// Create an engine with a validated configuration.
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Apply configuration overrides.
    ///
    /// On error the previous configuration stays in effect.
    pub fn configure(&mut self, options: &LayoutOptions) -> Result<&mut Self, LayoutError> {
        self.config = self.config.apply(options)?;
        Ok(self)
    }

    /// Get the configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Install an input graph, discarding any previous layout.
    pub fn set_graph(&mut self, nodes: Vec<NodeInput>, links: Vec<LinkInput>) -> &mut Self {
        self.nodes = nodes;
        self.links = links;
        self.graph = None;
        self
    }

    /// Run all five stages with `iterations` relaxation rounds.
    ///
    /// On error no partial layout is kept.
    pub fn layout(&mut self, iterations: usize) -> Result<&SankeyGraph, LayoutError> {
        let span = info_span!("sankey_layout", nodes = self.nodes.len(), links = self.links.len());
        let _entered = span.enter();

        self.graph = None;
        let graph = pipeline::run(&self.nodes, &self.links, &self.config, iterations)?;
        debug!(
            layers = graph.layer_count,
            circular = graph.circular_links.len(),
            fingerprint = %graph.fingerprint(),
            "layout complete"
        );
        let graph: &SankeyGraph = self.graph.insert(graph);
        Ok(graph)
    }

    /// Run all stages with the configured iteration count.
    pub fn layout_default(&mut self) -> Result<&SankeyGraph, LayoutError> {
        self.layout(self.config.iterations)
    }

    /// Re-run link depth assignment only.
    pub fn relayout(&mut self) -> Result<&SankeyGraph, LayoutError> {
        let graph = self.graph.take().ok_or(LayoutError::NotLaidOut)?;
        let graph: &SankeyGraph = self.graph.insert(pipeline::assign_link_depths(graph));
        Ok(graph)
    }

    /// Move a node vertically, e.g. after a drag. Call `relayout` afterwards.
    pub fn move_node(&mut self, id: NodeId, y: f64) -> Result<(), LayoutError> {
        let graph = self.graph.as_mut().ok_or(LayoutError::NotLaidOut)?;
        let node = graph.nodes.get_mut(id.index()).ok_or(LayoutError::NodeNotFound(id))?;
        node.y = y;
        Ok(())
    }

    /// The most recent layout, if any.
    pub fn graph(&self) -> Option<&SankeyGraph> {
        self.graph.as_ref()
    }

    /// Take ownership of the most recent layout.
    pub fn into_graph(self) -> Option<SankeyGraph> {
        self.graph
    }

    /// Path generator with the given curvature.
    pub fn link_path_generator(&self, curvature: f64) -> LinkPath {
        LinkPath::new(curvature)
    }

    /// Path generator with the configured curvature.
    pub fn link_path(&self) -> LinkPath {
        LinkPath::new(self.config.curvature)
    }
}
