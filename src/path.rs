//! Link path geometry.
//!
//! A link is drawn as a horizontal-tangent cubic Bézier from the right edge
//! of its source to the left edge of its target, centred on the link's slot
//! in each node's stack.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Link, LinkId, SankeyGraph};

/// A point in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Cubic path for one link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathDescriptor {
    /// Start point on the source node.
    pub start: Point,
    /// First control point.
    pub control1: Point,
    /// Second control point.
    pub control2: Point,
    /// End point on the target node.
    pub end: Point,
}

impl PathDescriptor {
    /// SVG path data, e.g. `M0,10C50,10 50,30 100,30`.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PathDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M{},{}C{},{} {},{} {},{}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }
}

/// Maps laid-out links to cubic paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkPath {
    /// Fraction of the horizontal span at which control points sit.
    pub curvature: f64,
}

impl Default for LinkPath {
    fn default() -> Self {
        Self { curvature: 0.5 }
    }
}

impl LinkPath {
    /// Create a generator; curvature is clamped to `[0, 1]`.
    pub fn new(curvature: f64) -> Self {
        Self {
            curvature: if curvature.is_nan() { 0.5 } else { curvature.clamp(0.0, 1.0) },
        }
    }

    /// Path for `link` within `graph`.
    pub fn describe(&self, graph: &SankeyGraph, link: &Link) -> PathDescriptor {
        let source = graph.node(link.source);
        let target = graph.node(link.target);

        let x0 = source.right();
        let x1 = target.x;
        let x2 = interpolate(x0, x1, self.curvature);
        let x3 = interpolate(x0, x1, 1.0 - self.curvature);
        let y0 = source.y + link.sy + link.dy / 2.0;
        let y1 = target.y + link.ty + link.dy / 2.0;

        PathDescriptor {
            start: Point::new(x0, y0),
            control1: Point::new(x2, y0),
            control2: Point::new(x3, y1),
            end: Point::new(x1, y1),
        }
    }

    /// Path for the link with id `id`.
    pub fn path(&self, graph: &SankeyGraph, id: LinkId) -> PathDescriptor {
        self.describe(graph, graph.link(id))
    }

    /// Paths for every accepted link, in link order.
    pub fn paths(&self, graph: &SankeyGraph) -> Vec<PathDescriptor> {
        graph.links.iter().map(|link| self.describe(graph, link)).collect()
    }
}

fn interpolate(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Node, NodeId};

    fn pair() -> SankeyGraph {
        let mut a = Node::new("a");
        a.x = 0.0;
        a.dx = 20.0;
        a.y = 10.0;
        a.dy = 40.0;
        let mut b = Node::new("b");
        b.x = 120.0;
        b.dx = 20.0;
        b.y = 50.0;
        b.dy = 40.0;

        let mut link = Link::new(NodeId(0), NodeId(1), 4.0, 0);
        link.dy = 20.0;
        link.sy = 10.0;
        link.ty = 0.0;
        a.source_links.push(LinkId(0));
        b.target_links.push(LinkId(0));
        SankeyGraph::from_parts(vec![a, b], vec![link], Vec::new(), vec![NodeId(0)])
    }

    #[test]
    fn test_default_curvature_path() {
        let graph = pair();
        let path = LinkPath::default().path(&graph, LinkId(0));

        assert_eq!(path.start, Point::new(20.0, 30.0));
        assert_eq!(path.control1, Point::new(70.0, 30.0));
        assert_eq!(path.control2, Point::new(70.0, 60.0));
        assert_eq!(path.end, Point::new(120.0, 60.0));
        assert_eq!(path.to_svg(), "M20,30C70,30 70,60 120,60");
    }

    #[test]
    fn test_curvature_moves_control_points() {
        let graph = pair();
        let path = LinkPath::new(0.25).path(&graph, LinkId(0));

        assert_eq!(path.control1.x, 45.0);
        assert_eq!(path.control2.x, 95.0);
    }

    #[test]
    fn test_curvature_is_clamped() {
        assert_eq!(LinkPath::new(3.0).curvature, 1.0);
        assert_eq!(LinkPath::new(-1.0).curvature, 0.0);
        assert_eq!(LinkPath::new(f64::NAN).curvature, 0.5);
    }
}
