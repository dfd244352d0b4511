// Copyright 2025 Lars Brubaker
// Per-site boundary assembly: gathers the vertices of every edge touching a
// site and orders them with the configured point order.

use crate::geom::{Point, PointOrder, Real};
use crate::graph::{Graph, SiteIdx, VertIdx};
use crate::pool::INVALID;

/// Boundary vertices of every site, ordered by `order` around the site.
/// Vertices at the same position (within `eps`) appear once.
pub(crate) fn assemble(graph: &Graph, sites: &[Point], order: PointOrder, eps: Real) -> Vec<Vec<VertIdx>> {
    let mut cells: Vec<Vec<VertIdx>> = vec![Vec::new(); sites.len()];
    for (_, edge) in graph.live_edges() {
        for site in [edge.left, edge.right] {
            if site == INVALID {
                continue;
            }
            cells[site as usize].extend([edge.start, edge.end]);
        }
    }
    for (site, cell) in cells.iter_mut().enumerate() {
        collapse(graph, cell, eps);
        let center = sites[site];
        // A site on a rectangle corner is itself a vertex of its cell. It has
        // no angle around itself, so it is slotted in after the others.
        let pinned = cell
            .iter()
            .position(|&v| graph.pos(v).approx_eq(center, eps))
            .map(|i| cell.remove(i));
        cell.sort_by(|&a, &b| order(center, graph.pos(a), graph.pos(b)));
        if let Some(v) = pinned {
            let at = place_pinned(graph, site as SiteIdx, cell, v, eps);
            cell.insert(at, v);
        }
    }
    cells
}

/// Where `v` goes in the ordered `cell`: between the two vertices it shares
/// an edge with. Falls back to the front when they are not adjacent.
fn place_pinned(graph: &Graph, site: SiteIdx, cell: &[VertIdx], v: VertIdx, eps: Real) -> usize {
    let at = graph.pos(v);
    let slot = |p: Point| cell.iter().position(|&k| graph.pos(k).approx_eq(p, eps));
    let mut ends: Vec<usize> = graph
        .live_edges()
        .filter(|(_, e)| e.left == site || e.right == site)
        .filter_map(|(_, e)| {
            let (a, b) = (graph.pos(e.start), graph.pos(e.end));
            if a.approx_eq(at, eps) {
                slot(b)
            } else if b.approx_eq(at, eps) {
                slot(a)
            } else {
                None
            }
        })
        .collect();
    ends.sort_unstable();
    ends.dedup();
    let n = cell.len();
    match ends[..] {
        [i, j] if (i + 1) % n == j => i + 1,
        [i, j] if (j + 1) % n == i => j + 1,
        _ => 0,
    }
}

/// Drop repeated vertex indices and vertices coincident with an earlier one.
fn collapse(graph: &Graph, cell: &mut Vec<VertIdx>, eps: Real) {
    cell.sort_unstable();
    cell.dedup();
    let mut kept: Vec<VertIdx> = Vec::with_capacity(cell.len());
    for &v in cell.iter() {
        let p = graph.pos(v);
        if !kept.iter().any(|&k| graph.pos(k).approx_eq(p, eps)) {
            kept.push(v);
        }
    }
    *cell = kept;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::clockwise;
    use crate::graph::VertexKind;

    #[test]
    fn square_cell_is_ordered_clockwise() {
        let sites = [Point::new(500.0, 500.0), Point::new(300.0, 500.0)];
        let mut g = Graph::new();
        let corners = [
            Point::new(600.0, 600.0),
            Point::new(400.0, 400.0),
            Point::new(600.0, 400.0),
            Point::new(400.0, 600.0),
        ];
        let v: Vec<VertIdx> = corners.iter().map(|&p| g.add_vertex(p, VertexKind::Voronoi)).collect();
        // Four sides of the square, each shared with a dummy neighbor 1.
        for (a, b) in [(v[3], v[1]), (v[1], v[2]), (v[2], v[0]), (v[0], v[3])] {
            let e = g.start_edge(0, 1, None);
            g.edges[e as usize].start = a;
            g.edges[e as usize].end = b;
        }
        let cells = assemble(&g, &sites, clockwise, 1e-9);
        let got: Vec<Point> = cells[0].iter().map(|&i| g.pos(i)).collect();
        assert_eq!(
            got,
            vec![
                Point::new(400.0, 600.0),
                Point::new(400.0, 400.0),
                Point::new(600.0, 400.0),
                Point::new(600.0, 600.0),
            ]
        );
    }

    #[test]
    fn corner_site_sits_between_its_neighbors() {
        let sites = [Point::new(10.0, 0.0)];
        let mut g = Graph::new();
        let corners = [
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
        ];
        let v: Vec<VertIdx> = corners.iter().map(|&p| g.add_vertex(p, VertexKind::Corner)).collect();
        for (a, b) in [(v[0], v[1]), (v[1], v[2]), (v[2], v[3]), (v[3], v[0])] {
            g.add_border_edge(0, a, b);
        }
        let cells = assemble(&g, &sites, clockwise, 1e-9);
        let got: Vec<Point> = cells[0].iter().map(|&i| g.pos(i)).collect();
        assert_eq!(
            got,
            vec![
                Point::new(0.0, 10.0),
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
            ]
        );
    }

    #[test]
    fn coincident_vertices_collapse() {
        let sites = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let mut g = Graph::new();
        let a = g.add_vertex(Point::new(5.0, 5.0), VertexKind::Border);
        let b = g.add_vertex(Point::new(5.0, 5.0 + 1e-12), VertexKind::Border);
        let c = g.add_vertex(Point::new(5.0, -5.0), VertexKind::Border);
        let e = g.start_edge(0, 1, None);
        g.edges[e as usize].start = a;
        g.edges[e as usize].end = c;
        let e = g.start_edge(0, 1, None);
        g.edges[e as usize].start = c;
        g.edges[e as usize].end = b;
        let cells = assemble(&g, &sites, clockwise, 1e-9);
        assert_eq!(cells[0].len(), 2);
        assert_eq!(cells[1].len(), 2);
    }

    #[test]
    fn dead_edges_and_border_edges() {
        let sites = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let mut g = Graph::new();
        let a = g.add_vertex(Point::new(5.0, 5.0), VertexKind::Border);
        let b = g.add_vertex(Point::new(5.0, -5.0), VertexKind::Border);
        let e = g.start_edge(0, 1, None);
        g.edges[e as usize].start = a;
        g.edges[e as usize].end = b;
        g.edges[e as usize].alive = false;
        g.add_border_edge(1, a, b);
        let cells = assemble(&g, &sites, clockwise, 1e-9);
        assert!(cells[0].is_empty());
        assert_eq!(cells[1].len(), 2);
    }
}
