// Copyright 2025 Lars Brubaker
// License: MIT
//
// The finished diagram. Read-only: every query borrows it.
//
// Vertices and edges are compacted when the diagram is built, so only those
// that survived clipping remain and all of them lie on or inside the bounds.

use crate::geom::{Point, Real, Rect};
use crate::graph::{EdgeIdx, Graph, SiteIdx, VertIdx, VertexKind};
use crate::pool::INVALID;
use crate::voronoi::BorderMode;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub pos: Point,
    pub kind: VertexKind,
}

/// A boundary segment between two cells, or between a cell and the
/// rectangle. Walking from `start` to `end` on screen, `left` is on the
/// walker's left.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub left: SiteIdx,
    /// `None` for edges tracing the rectangle.
    pub right: Option<SiteIdx>,
    pub start: VertIdx,
    pub end: VertIdx,
}

impl Edge {
    #[inline]
    pub fn is_border(&self) -> bool {
        self.right.is_none()
    }

    #[inline]
    pub fn touches(&self, site: SiteIdx) -> bool {
        self.left == site || self.right == Some(site)
    }

    /// The site across the edge from `site`.
    pub fn other(&self, site: SiteIdx) -> Option<SiteIdx> {
        if self.left == site {
            self.right
        } else if self.right == Some(site) {
            Some(self.left)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug)]
pub struct Site {
    pub pos: Point,
    duplicate_of: Option<SiteIdx>,
    /// Boundary vertices in point order.
    points: Vec<VertIdx>,
    edges: Vec<EdgeIdx>,
}

impl Site {
    /// Boundary vertex indices, ordered around the site.
    pub fn vertices(&self) -> &[VertIdx] {
        &self.points
    }

    /// Indices of the edges bounding this site's cell.
    pub fn edges(&self) -> &[EdgeIdx] {
        &self.edges
    }

    pub fn duplicate_of(&self) -> Option<SiteIdx> {
        self.duplicate_of
    }
}

pub struct Diagram {
    bounds: Rect,
    border_mode: BorderMode,
    epsilon: Real,
    sites: Vec<Site>,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl Diagram {
    /// Compact the live part of `graph` into a diagram. `cells` holds each
    /// site's ordered boundary as graph vertex indices.
    pub(crate) fn build(
        graph: &Graph,
        points: &[Point],
        duplicate_of: &[Option<SiteIdx>],
        cells: Vec<Vec<VertIdx>>,
        bounds: Rect,
        border_mode: BorderMode,
        epsilon: Real,
    ) -> Diagram {
        let mut remap = vec![INVALID; graph.verts.len()];
        let mut vertices = Vec::new();
        let mut edges = Vec::new();
        let mut site_edges: Vec<Vec<EdgeIdx>> = vec![Vec::new(); points.len()];

        let mut map = |v: VertIdx, vertices: &mut Vec<Vertex>| -> VertIdx {
            if remap[v as usize] == INVALID {
                let gv = &graph.verts[v as usize];
                remap[v as usize] = vertices.len() as VertIdx;
                vertices.push(Vertex { pos: gv.pos, kind: gv.kind });
            }
            remap[v as usize]
        };

        for (_, e) in graph.live_edges() {
            let idx = edges.len() as EdgeIdx;
            let start = map(e.start, &mut vertices);
            let end = map(e.end, &mut vertices);
            let right = if e.is_border() { None } else { Some(e.right) };
            edges.push(Edge { left: e.left, right, start, end });
            site_edges[e.left as usize].push(idx);
            if let Some(r) = right {
                site_edges[r as usize].push(idx);
            }
        }

        let sites = points
            .iter()
            .zip(cells)
            .zip(site_edges)
            .enumerate()
            .map(|(i, ((&pos, cell), edges))| Site {
                pos,
                duplicate_of: duplicate_of[i],
                points: cell.into_iter().map(|v| map(v, &mut vertices)).collect(),
                edges,
            })
            .collect();

        Diagram {
            bounds,
            border_mode,
            epsilon,
            sites,
            vertices,
            edges,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn border_mode(&self) -> BorderMode {
        self.border_mode
    }

    pub fn epsilon(&self) -> Real {
        self.epsilon
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self, site: SiteIdx) -> &Site {
        &self.sites[site as usize]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, v: VertIdx) -> &Vertex {
        &self.vertices[v as usize]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, e: EdgeIdx) -> &Edge {
        &self.edges[e as usize]
    }

    /// Positions of both ends of an edge.
    pub fn edge_points(&self, e: EdgeIdx) -> (Point, Point) {
        let edge = &self.edges[e as usize];
        (self.vertices[edge.start as usize].pos, self.vertices[edge.end as usize].pos)
    }

    /// The boundary points of `site`'s cell, in clockwise order on screen.
    pub fn clockwise_points(&self, site: SiteIdx) -> Vec<Point> {
        self.cell(site).points().collect()
    }

    /// The earlier site that `site` coincides with, if any. Such sites are
    /// ignored by the sweep and have empty cells.
    pub fn duplicate_of(&self, site: SiteIdx) -> Option<SiteIdx> {
        self.sites[site as usize].duplicate_of
    }

    pub fn cell(&self, site: SiteIdx) -> Cell<'_> {
        Cell { diagram: self, site }
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell<'_>> + '_ {
        (0..self.sites.len() as SiteIdx).map(move |s| self.cell(s))
    }
}

/// View of one site's cell.
#[derive(Copy, Clone)]
pub struct Cell<'a> {
    diagram: &'a Diagram,
    site: SiteIdx,
}

impl<'a> Cell<'a> {
    pub fn site(&self) -> SiteIdx {
        self.site
    }

    pub fn pos(&self) -> Point {
        self.diagram.sites[self.site as usize].pos
    }

    pub fn vertices(&self) -> &'a [VertIdx] {
        &self.diagram.sites[self.site as usize].points
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + 'a {
        let d = self.diagram;
        self.vertices().iter().map(move |&v| d.vertices[v as usize].pos)
    }

    pub fn edges(&self) -> impl Iterator<Item = &'a Edge> + 'a {
        let d = self.diagram;
        d.sites[self.site as usize].edges.iter().map(move |&e| &d.edges[e as usize])
    }

    /// Sites sharing an internal edge with this one, ascending.
    pub fn neighbors(&self) -> Vec<SiteIdx> {
        let mut out: Vec<SiteIdx> = self.edges().filter_map(|e| e.other(self.site)).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn is_empty(&self) -> bool {
        self.vertices().is_empty()
    }

    /// True if the cell's edges form a single closed loop through all of
    /// its points.
    pub fn is_closed(&self) -> bool {
        let pts: Vec<Point> = self.points().collect();
        let edge_count = self.edges().count();
        if pts.len() < 3 || edge_count != pts.len() {
            return false;
        }
        let eps = self.diagram.epsilon;
        let d = self.diagram;
        pts.iter().all(|&p| {
            let degree: usize = self
                .edges()
                .map(|e| {
                    let a = d.vertices[e.start as usize].pos;
                    let b = d.vertices[e.end as usize].pos;
                    usize::from(a.approx_eq(p, eps)) + usize::from(b.approx_eq(p, eps))
                })
                .sum();
            degree == 2
        })
    }

    /// Signed shoelace sum over the ordered points; positive for clockwise
    /// on screen.
    fn signed_area(&self) -> Real {
        let pts: Vec<Point> = self.points().collect();
        let n = pts.len();
        (0..n).map(|i| pts[i].cross(pts[(i + 1) % n])).sum::<Real>() / 2.0
    }

    /// Area of a closed cell.
    pub fn area(&self) -> Option<Real> {
        if !self.is_closed() {
            return None;
        }
        Some(self.signed_area().abs())
    }

    /// Centroid of a closed cell with non-zero area.
    pub fn centroid(&self) -> Option<Point> {
        if !self.is_closed() {
            return None;
        }
        let a = self.signed_area();
        if a.abs() <= self.diagram.epsilon {
            return None;
        }
        let pts: Vec<Point> = self.points().collect();
        let n = pts.len();
        let (mut cx, mut cy) = (0.0, 0.0);
        for i in 0..n {
            let (p, q) = (pts[i], pts[(i + 1) % n]);
            let c = p.cross(q);
            cx += (p.x + q.x) * c;
            cy += (p.y + q.y) * c;
        }
        Some(Point::new(cx / (6.0 * a), cy / (6.0 * a)))
    }
}
