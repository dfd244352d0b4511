// Copyright 2025 Lars Brubaker
// License: MIT
//
// Fortune's sweep: event handlers driving the beachline, the event queue
// and the edge graph.
//
// The sweep line moves toward increasing y. Each site event inserts an arc,
// each circle event removes one (or several, when circle events coincide)
// and produces a Voronoi vertex. When the queue is empty the breakpoints
// still on the beachline become rays or full lines in the graph; the
// clipper resolves them against the rectangle.

use crate::beachline::{Beachline, Placement};
use crate::event_queue::{ArcIdx, CircleIdx, Event, EventQueue};
use crate::geom::{circumcenter, converging_circle, Point, Real};
use crate::graph::{EdgeIdx, Graph, SiteIdx, VertexKind};
use crate::pool::INVALID;

/// Counters reported when the sweep finishes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub site_events: usize,
    pub circle_events: usize,
    pub duplicates: usize,
    pub circles_scheduled: usize,
    pub circles_invalidated: usize,
}

/// A snapshot of an arc taken before it leaves the beachline.
#[derive(Copy, Clone)]
struct Fan {
    arc: ArcIdx,
    site: SiteIdx,
    edge: EdgeIdx,
}

pub struct Sweep<'a> {
    sites: &'a [Point],
    eps: Real,
    beachline: Beachline,
    queue: EventQueue,
    graph: Graph,
    /// `duplicate_of[s]` is the earlier site that `s` coincides with.
    duplicate_of: Vec<Option<SiteIdx>>,
    last_site: Option<SiteIdx>,
    stats: SweepStats,
}

impl<'a> Sweep<'a> {
    pub fn new(sites: &'a [Point], eps: Real) -> Self {
        Sweep {
            sites,
            eps,
            beachline: Beachline::new(),
            queue: EventQueue::new(sites),
            graph: Graph::new(),
            duplicate_of: vec![None; sites.len()],
            last_site: None,
            stats: SweepStats::default(),
        }
    }

    /// Process every event. Returns once the queue is exhausted.
    pub fn run(&mut self) {
        while self.step() {}
        self.stats.circles_scheduled = self.queue.circles_scheduled();
        self.stats.circles_invalidated = self.queue.circles_invalidated();
    }

    /// Process the next event. Returns false when none is left.
    fn step(&mut self) -> bool {
        match self.queue.pop_min() {
            Some(Event::Site(s)) => {
                self.site_event(s);
                true
            }
            Some(Event::Circle(c)) => {
                self.circle_event(c);
                true
            }
            None => false,
        }
    }

    pub fn stats(&self) -> SweepStats {
        self.stats
    }

    /// Count the breakpoints left on the beachline, then drop it. Their
    /// edges stay open in the graph.
    pub fn drain(&mut self) -> usize {
        let open = self.beachline.len().saturating_sub(1);
        self.beachline.clear();
        open
    }

    pub fn into_parts(self) -> (Graph, Vec<Option<SiteIdx>>) {
        (self.graph, self.duplicate_of)
    }

    // ─────────────────────────── Site events ─────────────────────────────

    fn site_event(&mut self, site: SiteIdx) {
        let p = self.sites[site as usize];
        if let Some(last) = self.last_site {
            let q = self.sites[last as usize];
            if p.x == q.x && p.y == q.y {
                tracing::debug!(site, duplicate_of = last, "skipping duplicate site");
                self.duplicate_of[site as usize] = Some(last);
                self.stats.duplicates += 1;
                return;
            }
        }
        self.last_site = Some(site);
        self.stats.site_events += 1;
        tracing::trace!(site, x = p.x, y = p.y, "site event");

        match self.beachline.arc_above(p.x, p.y, self.sites, self.eps) {
            Placement::Empty => {
                self.beachline.insert_after(None, site, INVALID);
            }
            Placement::Split(arc) => self.split_arc(arc, site),
            Placement::After(left) => {
                // Only reachable while the first row of sites is coming in:
                // the breakpoint is a vertical line with no known endpoint.
                let left_site = self.beachline.arc(left).site;
                let edge = self.graph.start_edge(left_site, site, None);
                self.beachline.insert_after(Some(left), site, edge);
            }
            Placement::Between(left, right) => self.insert_on_breakpoint(left, right, site),
        }
    }

    /// The new site falls strictly inside `arc`: the arc is cut in two and
    /// the new arc goes in between.
    fn split_arc(&mut self, arc: ArcIdx, site: SiteIdx) {
        self.detach_circle(arc);
        let arc_site = self.beachline.arc(arc).site;
        let edge = self.graph.start_edge(arc_site, site, None);
        let new_arc = self.beachline.insert_after(Some(arc), site, edge);
        let copy = self.beachline.insert_after(Some(new_arc), arc_site, edge);
        self.attach_circle(arc);
        self.attach_circle(copy);
    }

    /// The new site lies exactly below the breakpoint between `left` and
    /// `right`. That breakpoint ends here at a vertex and two new ones start.
    fn insert_on_breakpoint(&mut self, left: ArcIdx, right: ArcIdx, site: SiteIdx) {
        let (l_site, r_site) = (self.beachline.arc(left).site, self.beachline.arc(right).site);
        let p = self.sites[site as usize];
        let Some(center) = circumcenter(self.sites[l_site as usize], p, self.sites[r_site as usize]) else {
            tracing::debug!(site, l_site, r_site, "site on a breakpoint of collinear sites; splitting");
            self.split_arc(left, site);
            return;
        };
        self.detach_circle(left);
        self.detach_circle(right);
        let v = self.graph.add_vertex(center, VertexKind::Voronoi);
        let closing = self.beachline.arc(right).edge;
        self.graph.finish_edge(closing, l_site, r_site, v);
        let new_edge = self.graph.start_edge(l_site, site, Some(v));
        let new_arc = self.beachline.insert_after(Some(left), site, new_edge);
        debug_assert_eq!(self.beachline.next(new_arc), Some(right));
        let right_edge = self.graph.start_edge(site, r_site, Some(v));
        self.beachline.arc_mut(right).edge = right_edge;
        self.attach_circle(left);
        self.attach_circle(right);
    }

    // ─────────────────────────── Circle events ───────────────────────────

    fn circle_event(&mut self, c: CircleIdx) {
        let event = self.queue.circle(c).clone();
        let (center, arc) = (event.center, event.arc);
        self.stats.circle_events += 1;
        tracing::trace!(arc, x = center.x, y = center.y, sweep = event.bottom, "circle event");

        let (prev, next) = self.beachline.neighbors(arc);
        let (Some(mut left), Some(mut right)) = (prev, next) else {
            // Circle events are only scheduled for arcs with two neighbors.
            self.beachline.arc_mut(arc).circle = None;
            return;
        };

        let v = self.graph.add_vertex(center, VertexKind::Voronoi);
        // The firing event belongs to `arc`; clear it without a tombstone.
        self.beachline.arc_mut(arc).circle = None;
        let mut fan = vec![self.snapshot(arc)];
        self.beachline.remove(arc);

        // Arcs whose own circle events land on the same vertex vanish now too.
        while self.circle_at(left, center) {
            let Some(before) = self.beachline.prev(left) else { break };
            fan.insert(0, self.snapshot(left));
            self.detach_arc(left);
            left = before;
        }
        fan.insert(0, self.snapshot(left));
        self.detach_circle(left);

        while self.circle_at(right, center) {
            let Some(after) = self.beachline.next(right) else { break };
            fan.push(self.snapshot(right));
            self.detach_arc(right);
            right = after;
        }
        fan.push(self.snapshot(right));
        self.detach_circle(right);

        if fan.len() > 3 {
            tracing::debug!(arcs = fan.len() - 2, x = center.x, y = center.y, "merged coincident circle events");
        }

        for pair in fan.windows(2) {
            self.graph.finish_edge(pair[1].edge, pair[0].site, pair[1].site, v);
        }
        let (first, last) = (fan[0], fan[fan.len() - 1]);
        let edge = self.graph.start_edge(first.site, last.site, Some(v));
        self.beachline.arc_mut(last.arc).edge = edge;

        self.attach_circle(first.arc);
        self.attach_circle(last.arc);
    }

    fn snapshot(&self, arc: ArcIdx) -> Fan {
        let a = self.beachline.arc(arc);
        Fan {
            arc,
            site: a.site,
            edge: a.edge,
        }
    }

    /// True if `arc` has a pending circle event centered on `center`.
    fn circle_at(&self, arc: ArcIdx, center: Point) -> bool {
        match self.beachline.arc(arc).circle {
            Some(c) => {
                let other = self.queue.circle(c).center;
                (other.x - center.x).abs() < self.eps && (other.y - center.y).abs() < self.eps
            }
            None => false,
        }
    }

    fn detach_arc(&mut self, arc: ArcIdx) {
        self.detach_circle(arc);
        self.beachline.remove(arc);
    }

    fn detach_circle(&mut self, arc: ArcIdx) {
        if let Some(c) = self.beachline.arc_mut(arc).circle.take() {
            self.queue.invalidate(c);
        }
    }

    /// Schedule the disappearance of `arc` if its breakpoints converge.
    fn attach_circle(&mut self, arc: ArcIdx) {
        let (Some(left), Some(right)) = self.beachline.neighbors(arc) else {
            return;
        };
        let l_site = self.beachline.arc(left).site;
        let r_site = self.beachline.arc(right).site;
        if l_site == r_site {
            return;
        }
        let mid = self.sites[self.beachline.arc(arc).site as usize];
        let (l, r) = (self.sites[l_site as usize], self.sites[r_site as usize]);
        match converging_circle(l, mid, r, self.eps) {
            Some(circle) => {
                let c = self.queue.push_circle(arc, circle);
                self.beachline.arc_mut(arc).circle = Some(c);
            }
            None => {
                let (a, c) = (l - mid, r - mid);
                if a.cross(c).abs() <= self.eps * (a.length_sq() * c.length_sq()).sqrt() {
                    tracing::debug!(l_site, r_site, arc, "collinear triple, no circle event");
                }
            }
        }
    }
}
