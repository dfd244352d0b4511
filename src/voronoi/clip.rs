// Copyright 2025 Lars Brubaker
// Clipping of the swept graph against the bounding rectangle, and closure
// of border cells along the rectangle's sides.

use crate::geom::{Point, Real, Rect, Side};
use crate::graph::{EdgeIdx, Graph, SiteIdx, VertIdx, VertexKind};
use crate::pool::INVALID;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ClipStats {
    pub inside: usize,
    pub clipped: usize,
    pub outside: usize,
    pub degenerate: usize,
}

/// Parameter interval of a line `origin + t * dir` left inside the
/// rectangle, with the side that cut each end.
struct Span {
    t0: Real,
    t1: Real,
    side0: Option<Side>,
    side1: Option<Side>,
}

/// Liang-Barsky: shrink `[t0, t1]` to the part of the line inside `r`.
fn clip_line(r: &Rect, origin: Point, dir: Point, t0: Real, t1: Real, eps: Real) -> Option<Span> {
    let mut span = Span { t0, t1, side0: None, side1: None };
    let tests = [
        (-dir.x, origin.x - r.min_x, Side::Left),
        (dir.x, r.max_x - origin.x, Side::Right),
        (-dir.y, origin.y - r.min_y, Side::Top),
        (dir.y, r.max_y - origin.y, Side::Bottom),
    ];
    for (p, q, side) in tests {
        if p == 0.0 {
            if q < -eps {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > span.t1 {
                return None;
            }
            if t > span.t0 {
                span.t0 = t;
                span.side0 = Some(side);
            }
        } else {
            if t < span.t0 {
                return None;
            }
            if t < span.t1 {
                span.t1 = t;
                span.side1 = Some(side);
            }
        }
    }
    if span.t0.is_finite() && span.t1.is_finite() {
        Some(span)
    } else {
        None
    }
}

/// Point at `t`, snapped exactly onto `side`.
fn point_on(r: &Rect, origin: Point, dir: Point, t: Real, side: Option<Side>) -> Point {
    let mut p = origin + dir * t;
    match side {
        Some(Side::Left) => p.x = r.min_x,
        Some(Side::Right) => p.x = r.max_x,
        Some(Side::Top) => p.y = r.min_y,
        Some(Side::Bottom) => p.y = r.max_y,
        None => {}
    }
    r.clamp(p)
}

/// Resolve every edge against `bounds`: rays and lines get finite ends,
/// ends outside are moved onto the rectangle, edges that miss it or shrink
/// below `eps` are marked dead.
pub(crate) fn clip_edges(graph: &mut Graph, sites: &[Point], bounds: &Rect, eps: Real) -> ClipStats {
    let mut stats = ClipStats::default();
    for e in 0..graph.edges.len() as EdgeIdx {
        let edge = &graph.edges[e as usize];
        if !edge.alive || edge.is_border() {
            continue;
        }
        let (start, end) = (edge.start, edge.end);
        let origin = graph.anchor(e, sites);
        let (dir, t0, t1) = if edge.is_bounded() {
            (graph.pos(end) - origin, 0.0, 1.0)
        } else if start != INVALID {
            (graph.direction(e, sites), 0.0, Real::INFINITY)
        } else {
            (graph.direction(e, sites), Real::NEG_INFINITY, Real::INFINITY)
        };

        let Some(span) = clip_line(bounds, origin, dir, t0, t1, eps) else {
            graph.edges[e as usize].alive = false;
            stats.outside += 1;
            continue;
        };
        let a = point_on(bounds, origin, dir, span.t0, span.side0);
        let b = point_on(bounds, origin, dir, span.t1, span.side1);
        if a.approx_eq(b, eps) {
            tracing::debug!(edge = e, x = a.x, y = a.y, "dropping zero-length edge");
            graph.edges[e as usize].alive = false;
            stats.degenerate += 1;
            continue;
        }

        let new_start = if span.side0.is_some() || start == INVALID {
            graph.add_vertex(a, VertexKind::Border)
        } else {
            start
        };
        let new_end = if span.side1.is_some() || end == INVALID {
            graph.add_vertex(b, VertexKind::Border)
        } else {
            end
        };
        if new_start == start && new_end == end {
            stats.inside += 1;
        } else {
            stats.clipped += 1;
        }
        let edge = &mut graph.edges[e as usize];
        edge.start = new_start;
        edge.end = new_end;
    }
    stats
}

/// A point on the rectangle's perimeter where border cells change owner.
struct BorderPoint {
    pos: Point,
    vert: VertIdx,
    offset: Real,
    /// Sites of the Voronoi edges ending here.
    sites: Vec<SiteIdx>,
}

/// Trace the rectangle's sides with border edges so that every cell
/// touching the rectangle is closed. Returns the number of edges added.
pub(crate) fn close_borders(
    graph: &mut Graph,
    sites: &[Point],
    duplicate_of: &[Option<SiteIdx>],
    bounds: &Rect,
    eps: Real,
) -> usize {
    let mut points: Vec<BorderPoint> = Vec::new();
    for (_, edge) in graph.live_edges() {
        if edge.is_border() {
            continue;
        }
        for v in [edge.start, edge.end] {
            let pos = graph.pos(v);
            if bounds.side_of(pos, eps).is_some() {
                points.push(BorderPoint {
                    pos,
                    vert: v,
                    offset: bounds.perimeter_offset(pos, eps),
                    sites: vec![edge.left, edge.right],
                });
            }
        }
    }
    for corner in bounds.corners() {
        points.push(BorderPoint {
            pos: corner,
            vert: INVALID,
            offset: bounds.perimeter_offset(corner, eps),
            sites: Vec::new(),
        });
    }
    points.sort_by(|a, b| a.offset.total_cmp(&b.offset));

    // Merge coincident points, including across the wrap at the top-right corner.
    let mut merged: Vec<BorderPoint> = Vec::with_capacity(points.len());
    for p in points {
        match merged.last_mut() {
            Some(last) if last.pos.approx_eq(p.pos, eps) => absorb(last, p),
            _ => merged.push(p),
        }
    }
    if merged.len() > 1 {
        let n = merged.len();
        if merged[0].pos.approx_eq(merged[n - 1].pos, eps) {
            if let Some(tail) = merged.pop() {
                absorb(&mut merged[0], tail);
            }
        }
    }

    for p in merged.iter_mut() {
        if p.vert == INVALID {
            p.vert = graph.add_vertex(p.pos, VertexKind::Corner);
        }
    }

    let n = merged.len();
    let mut added = 0;
    for i in 0..n {
        let (a, b) = (&merged[i], &merged[(i + 1) % n]);
        if a.pos.approx_eq(b.pos, eps) {
            continue;
        }
        let owner = shared_site(&a.sites, &b.sites)
            .or_else(|| nearest_site(sites, duplicate_of, crate::geom::midpoint(a.pos, b.pos)));
        if let Some(owner) = owner {
            graph.add_border_edge(owner, a.vert, b.vert);
            added += 1;
        }
    }
    added
}

fn absorb(into: &mut BorderPoint, other: BorderPoint) {
    if into.vert == INVALID {
        into.vert = other.vert;
        into.pos = other.pos;
    }
    for s in other.sites {
        if !into.sites.contains(&s) {
            into.sites.push(s);
        }
    }
}

/// The single site both boundary points belong to, if there is exactly one.
fn shared_site(a: &[SiteIdx], b: &[SiteIdx]) -> Option<SiteIdx> {
    let mut common = a.iter().filter(|s| b.contains(s));
    match (common.next(), common.next()) {
        (Some(&s), None) => Some(s),
        _ => None,
    }
}

/// Closest surviving site to `p`; ties go to the lowest index.
fn nearest_site(sites: &[Point], duplicate_of: &[Option<SiteIdx>], p: Point) -> Option<SiteIdx> {
    let mut best: Option<(SiteIdx, Real)> = None;
    for (i, s) in sites.iter().enumerate() {
        if duplicate_of[i].is_some() {
            continue;
        }
        let d = (*s - p).length_sq();
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((i as SiteIdx, d));
        }
    }
    best.map(|(i, _)| i)
}
