//! Depth resolution: vertical node placement.
//!
//! ## Algorithm
//!
//! 1. Size nodes and links with one scale `ky` shared by every layer, chosen
//!    so the fullest layer uses 95% of the free height
//! 2. Stack each layer in arena order and resolve collisions
//! 3. For each round, with a step size `alpha` decaying by 1% per round:
//!    - Pull nodes toward the weighted centre of their targets, right to left
//!    - Resolve collisions
//!    - Pull nodes toward the weighted centre of their sources, left to right
//!    - Resolve collisions

use tracing::{debug, trace, warn};

use super::values::sum_values;
use crate::config::{LayoutConfig, ALPHA_DECAY, DEPTH_DAMPENING};
use crate::types::{LayoutWarning, LinkId, NodeId, SankeyGraph};

/// Assign `y` and `dy` to every node and `dy` to every link.
pub fn resolve_depths(mut graph: SankeyGraph, config: &LayoutConfig, iterations: usize) -> SankeyGraph {
    let mut layers = graph.layers();

    initialize_depths(&mut graph, &layers, config);
    resolve_collisions(&mut graph, &mut layers, config);

    let mut alpha = 1.0;
    for round in 0..iterations {
        alpha *= ALPHA_DECAY;
        relax_right_to_left(&mut graph, &layers, alpha);
        resolve_collisions(&mut graph, &mut layers, config);
        relax_left_to_right(&mut graph, &layers, alpha);
        resolve_collisions(&mut graph, &mut layers, config);
        trace!(round, alpha, "relaxation round complete");
    }

    debug!(iterations, warnings = graph.warnings.len(), "resolved node depths");
    graph
}

/// Vertical scale shared by every layer.
///
/// Layers without flow do not constrain the scale; if no layer has flow
/// the scale is zero. Layer totals are taken relative to the largest node,
/// so a layer of finite values never sums to infinity.
fn depth_scale(graph: &SankeyGraph, layers: &[Vec<NodeId>], config: &LayoutConfig) -> f64 {
    layers
        .iter()
        .filter_map(|layer| {
            let peak = layer.iter().map(|&id| graph.node(id).value).fold(0.0, f64::max);
            if peak <= 0.0 {
                return None;
            }
            let relative: f64 = layer.iter().map(|&id| graph.node(id).value / peak).sum();
            let free = config.height - (layer.len() as f64 - 1.0) * config.node_padding;
            Some(free / peak / relative * DEPTH_DAMPENING)
        })
        .reduce(f64::min)
        .unwrap_or(0.0)
        .max(0.0)
}

fn initialize_depths(graph: &mut SankeyGraph, layers: &[Vec<NodeId>], config: &LayoutConfig) {
    let ky = depth_scale(graph, layers, config);

    for layer in layers {
        for (i, &id) in layer.iter().enumerate() {
            let node = graph.node_mut(id);
            node.y = i as f64;
            node.dy = node.value * ky;
        }
    }
    for link in &mut graph.links {
        link.dy = link.value * ky;
    }

    graph.warnings.retain(|w| !matches!(w, LayoutWarning::LayerOverflow { .. }));
    for (index, layer) in layers.iter().enumerate() {
        let heights: f64 = layer.iter().map(|&id| graph.node(id).dy).sum();
        let required = heights + (layer.len() as f64 - 1.0).max(0.0) * config.node_padding;
        if required > config.height + 1e-9 {
            warn!(
                layer = index,
                required,
                available = config.height,
                "layer does not fit in the vertical extent"
            );
            graph.warnings.push(LayoutWarning::LayerOverflow {
                layer: index,
                required,
                available: config.height,
            });
        }
    }
}

/// Value-weighted mean centre of the nodes at the far end of `links`.
fn weighted_center(
    graph: &SankeyGraph,
    links: &[LinkId],
    far_end: impl Fn(LinkId) -> NodeId,
) -> Option<f64> {
    let total = sum_values(graph, links);
    if links.is_empty() || total <= 0.0 {
        return None;
    }
    Some(
        links
            .iter()
            .map(|&id| graph.node(far_end(id)).center() * (graph.link(id).value / total))
            .sum(),
    )
}

fn relax_right_to_left(graph: &mut SankeyGraph, layers: &[Vec<NodeId>], alpha: f64) {
    for layer in layers.iter().rev() {
        for &id in layer {
            let target = weighted_center(graph, &graph.node(id).source_links, |l| graph.link(l).target);
            if let Some(y) = target {
                let node = graph.node_mut(id);
                node.y += (y - node.center()) * alpha;
            }
        }
    }
}

fn relax_left_to_right(graph: &mut SankeyGraph, layers: &[Vec<NodeId>], alpha: f64) {
    for layer in layers {
        for &id in layer {
            let source = weighted_center(graph, &graph.node(id).target_links, |l| graph.link(l).source);
            if let Some(y) = source {
                let node = graph.node_mut(id);
                node.y += (y - node.center()) * alpha;
            }
        }
    }
}

fn resolve_collisions(graph: &mut SankeyGraph, layers: &mut [Vec<NodeId>], config: &LayoutConfig) {
    for layer in layers.iter_mut() {
        resolve_layer(graph, layer, config);
    }
}

/// Enforce padding inside one layer and pull it back into `[0, height]`.
///
/// If the packed layer is taller than the extent, the top stays at 0 and
/// the overflow is left at the bottom.
fn resolve_layer(graph: &mut SankeyGraph, layer: &mut [NodeId], config: &LayoutConfig) {
    let padding = config.node_padding;
    layer.sort_by(|&a, &b| graph.node(a).y.total_cmp(&graph.node(b).y));

    push_down(graph, layer, padding, 0.0);
    let Some(&last) = layer.last() else {
        return;
    };

    let overflow = graph.node(last).bottom() - config.height;
    if overflow <= 0.0 {
        return;
    }

    let mut y0 = {
        let node = graph.node_mut(last);
        node.y -= overflow;
        node.y
    };
    for &id in layer.iter().rev().skip(1) {
        let node = graph.node_mut(id);
        let dy = node.bottom() + padding - y0;
        if dy > 0.0 {
            node.y -= dy;
        }
        y0 = node.y;
    }

    if graph.node(layer[0]).y < 0.0 {
        push_down(graph, layer, padding, 0.0);
    }
}

/// Sweep top to bottom so each node clears its predecessor by `padding`.
fn push_down(graph: &mut SankeyGraph, layer: &[NodeId], padding: f64, top: f64) {
    let mut y0 = top;
    for &id in layer {
        let node = graph.node_mut(id);
        if y0 > node.y {
            node.y = y0;
        }
        y0 = node.bottom() + padding;
    }
}
