// Copyright 2025 Lars Brubaker
// License: MIT
//
// The edge/vertex graph built by the sweep.
//
// Edges and vertices live in Vec arenas and refer to each other and to
// sites by u32 index, so the cyclic site/edge/vertex relation needs no
// shared ownership. INVALID (u32::MAX) stands for "not yet known".
//
// An edge separates `left` and `right`. Its `start` vertex is fixed by the
// first breakpoint trace that terminates (or by the event that created it),
// its `end` by the second. Walking from start to end on screen, `left`
// lies on the walker's left. An edge that still lacks `end` when the sweep
// finishes is a ray leaving `start` along `bisector_direction(left, right)`;
// an edge with neither endpoint is a full line through the sites' midpoint.

use crate::geom::{bisector_direction, midpoint, Point};
use crate::pool::INVALID;

/// Index into the caller's site list.
pub type SiteIdx = u32;
/// Index into `Graph::verts`.
pub type VertIdx = u32;
/// Index into `Graph::edges`.
pub type EdgeIdx = u32;

/// How a vertex came to exist.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VertexKind {
    /// Equidistant from three or more sites.
    Voronoi,
    /// Created by clipping an edge against the rectangle, or lying on a side.
    Border,
    /// A rectangle corner added when closing border cells.
    Corner,
}

#[derive(Copy, Clone, Debug)]
pub struct GraphVertex {
    pub pos: Point,
    pub kind: VertexKind,
}

#[derive(Clone, Debug)]
pub struct GraphEdge {
    pub left: SiteIdx,
    /// INVALID for edges that trace the bounding rectangle.
    pub right: SiteIdx,
    pub start: VertIdx,
    pub end: VertIdx,
    /// Cleared when clipping discards the edge.
    pub alive: bool,
}

impl GraphEdge {
    #[inline]
    pub fn is_border(&self) -> bool {
        self.right == INVALID
    }

    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.start != INVALID && self.end != INVALID
    }

    #[inline]
    pub fn touches(&self, site: SiteIdx) -> bool {
        self.left == site || self.right == site
    }
}

#[derive(Default)]
pub struct Graph {
    pub verts: Vec<GraphVertex>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, pos: Point, kind: VertexKind) -> VertIdx {
        let idx = self.verts.len() as VertIdx;
        self.verts.push(GraphVertex { pos, kind });
        idx
    }

    #[inline]
    pub fn pos(&self, v: VertIdx) -> Point {
        self.verts[v as usize].pos
    }

    /// A new breakpoint between the arcs of `left` and `right` starts
    /// tracing an edge, at `origin` if the starting point is already known.
    pub fn start_edge(&mut self, left: SiteIdx, right: SiteIdx, origin: Option<VertIdx>) -> EdgeIdx {
        let e = self.edges.len() as EdgeIdx;
        self.edges.push(GraphEdge {
            left,
            right,
            start: INVALID,
            end: INVALID,
            alive: true,
        });
        if let Some(v) = origin {
            // The origin is where the trace begins, so the breakpoint walks
            // away from it: seen from the origin the sites swap sides.
            self.finish_edge(e, right, left, v);
        }
        e
    }

    /// The breakpoint between `left` and `right` (in beachline order)
    /// stopped at `v`.
    pub fn finish_edge(&mut self, e: EdgeIdx, left: SiteIdx, right: SiteIdx, v: VertIdx) {
        let edge = &mut self.edges[e as usize];
        if edge.start == INVALID && edge.end == INVALID {
            edge.start = v;
            edge.left = left;
            edge.right = right;
        } else if edge.left == right {
            edge.end = v;
        } else {
            edge.start = v;
        }
    }

    /// Add a finished edge tracing the rectangle on behalf of `site`.
    pub fn add_border_edge(&mut self, site: SiteIdx, start: VertIdx, end: VertIdx) -> EdgeIdx {
        let e = self.edges.len() as EdgeIdx;
        self.edges.push(GraphEdge {
            left: site,
            right: INVALID,
            start,
            end,
            alive: true,
        });
        e
    }

    /// Direction of travel of an unresolved end of `e`.
    pub fn direction(&self, e: EdgeIdx, sites: &[Point]) -> Point {
        let edge = &self.edges[e as usize];
        bisector_direction(sites[edge.left as usize], sites[edge.right as usize])
    }

    /// A point on the line carrying `e`: its start vertex, or the sites'
    /// midpoint for a full line.
    pub fn anchor(&self, e: EdgeIdx, sites: &[Point]) -> Point {
        let edge = &self.edges[e as usize];
        if edge.start != INVALID {
            self.pos(edge.start)
        } else {
            midpoint(sites[edge.left as usize], sites[edge.right as usize])
        }
    }

    pub fn live_edges(&self) -> impl Iterator<Item = (EdgeIdx, &GraphEdge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.alive)
            .map(|(i, e)| (i as EdgeIdx, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_edge_receives_both_ends() {
        let mut g = Graph::new();
        let (a, b) = (0, 1);
        let e = g.start_edge(a, b, None);
        let v0 = g.add_vertex(Point::new(-1.0, 0.0), VertexKind::Voronoi);
        let v1 = g.add_vertex(Point::new(1.0, 0.0), VertexKind::Voronoi);
        // right breakpoint (b|a) terminates first
        g.finish_edge(e, b, a, v1);
        g.finish_edge(e, a, b, v0);
        let edge = &g.edges[e as usize];
        assert_eq!((edge.start, edge.end), (v1, v0));
        assert_eq!((edge.left, edge.right), (b, a));
        assert!(edge.is_bounded());
    }

    #[test]
    fn edge_with_origin_ends_at_its_own_breakpoint() {
        let mut g = Graph::new();
        let origin = g.add_vertex(Point::new(0.0, 0.0), VertexKind::Voronoi);
        let e = g.start_edge(3, 4, Some(origin));
        assert_eq!(g.edges[e as usize].start, origin);
        assert!(!g.edges[e as usize].is_bounded());
        let far = g.add_vertex(Point::new(0.0, 5.0), VertexKind::Voronoi);
        g.finish_edge(e, 3, 4, far);
        assert_eq!(g.edges[e as usize].end, far);
        assert_eq!(g.edges[e as usize].start, origin);
    }

    #[test]
    fn ray_direction_keeps_left_site_on_the_left() {
        let sites = [Point::new(0.0, 0.0), Point::new(2.0, 0.0)];
        let mut g = Graph::new();
        let origin = g.add_vertex(Point::new(1.0, -1.0), VertexKind::Voronoi);
        // breakpoint 0|1 grows from the origin toward increasing y
        let e = g.start_edge(0, 1, Some(origin));
        let d = g.direction(e, &sites);
        assert!(d.y > 0.0 && d.x == 0.0, "d={:?}", d);
        let edge = &g.edges[e as usize];
        let left = sites[edge.left as usize] - g.pos(origin);
        assert!(d.cross(left) < 0.0);
    }

    #[test]
    fn border_edges_have_one_site() {
        let mut g = Graph::new();
        let a = g.add_vertex(Point::new(0.0, 0.0), VertexKind::Corner);
        let b = g.add_vertex(Point::new(0.0, 1.0), VertexKind::Border);
        let e = g.add_border_edge(2, a, b);
        assert!(g.edges[e as usize].is_border());
        assert!(g.edges[e as usize].touches(2));
        assert_eq!(g.live_edges().count(), 1);
    }
}
