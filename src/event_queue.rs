// Copyright 2025 Lars Brubaker
// License: MIT
//
// A two-phase event queue for the sweep:
//   Site events are known up front and live in a pre-sorted array.
//   Circle events appear during the sweep and go into a binary min-heap.
// `pop_min` merges both sources.
//
// Circle events are never removed from the heap eagerly. `invalidate`
// tombstones an event and `pop_min` discards tombstoned events when they
// reach the top.

use crate::geom::{Circle, Point, Real};
use crate::graph::SiteIdx;
use crate::pool::INVALID;

/// Handle to a scheduled circle event.
pub type CircleIdx = u32;

/// Beachline arc handle (see `beachline`).
pub type ArcIdx = u32;

#[derive(Clone, Debug)]
pub struct CircleEvent {
    /// The arc that disappears when the event fires.
    pub arc: ArcIdx,
    /// Predicted Voronoi vertex.
    pub center: Point,
    /// Sweep coordinate of the event.
    pub bottom: Real,
    alive: bool,
}

impl CircleEvent {
    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Site(SiteIdx),
    Circle(CircleIdx),
}

pub struct EventQueue {
    /// Sites in ascending (y, x, index) order.
    sites: Vec<(Point, SiteIdx)>,
    site_pos: usize,
    /// Every circle event ever scheduled, indexed by `CircleIdx`.
    circles: Vec<CircleEvent>,
    /// heap[1..] are active; heap[0] unused. Stores circle handles.
    heap: Vec<CircleIdx>,
    invalidated: usize,
}

impl EventQueue {
    /// Build the queue with one site event per point.
    pub fn new(points: &[Point]) -> Self {
        let mut sites: Vec<(Point, SiteIdx)> = points
            .iter()
            .enumerate()
            .map(|(i, &p)| (p, i as SiteIdx))
            .collect();
        sites.sort_by(|a, b| {
            a.0.y
                .total_cmp(&b.0.y)
                .then(a.0.x.total_cmp(&b.0.x))
                .then(a.1.cmp(&b.1))
        });
        EventQueue {
            sites,
            site_pos: 0,
            circles: Vec::new(),
            heap: vec![INVALID],
            invalidated: 0,
        }
    }

    /// Ordering key of circle events: sweep coordinate, then x, then
    /// scheduling sequence.
    fn circle_leq(&self, a: CircleIdx, b: CircleIdx) -> bool {
        let (ca, cb) = (&self.circles[a as usize], &self.circles[b as usize]);
        if ca.bottom != cb.bottom {
            return ca.bottom < cb.bottom;
        }
        if ca.center.x != cb.center.x {
            return ca.center.x < cb.center.x;
        }
        a <= b
    }

    fn heap_len(&self) -> usize {
        self.heap.len() - 1
    }

    fn float_up(&mut self, mut curr: usize) {
        let h_curr = self.heap[curr];
        loop {
            let parent = curr >> 1;
            if parent == 0 || self.circle_leq(self.heap[parent], h_curr) {
                break;
            }
            self.heap[curr] = self.heap[parent];
            curr = parent;
        }
        self.heap[curr] = h_curr;
    }

    fn float_down(&mut self, mut curr: usize) {
        let size = self.heap_len();
        let h_curr = self.heap[curr];
        loop {
            let mut child = curr << 1;
            if child > size {
                break;
            }
            if child < size && self.circle_leq(self.heap[child + 1], self.heap[child]) {
                child += 1;
            }
            if self.circle_leq(h_curr, self.heap[child]) {
                break;
            }
            self.heap[curr] = self.heap[child];
            curr = child;
        }
        self.heap[curr] = h_curr;
    }

    fn heap_extract_min(&mut self) -> Option<CircleIdx> {
        if self.heap_len() == 0 {
            return None;
        }
        let min = self.heap[1];
        let last = self.heap.pop().unwrap_or(INVALID);
        if self.heap_len() > 0 {
            self.heap[1] = last;
            self.float_down(1);
        }
        Some(min)
    }

    /// Drop tombstoned events sitting at the top of the heap.
    fn prune(&mut self) {
        while self.heap_len() > 0 && !self.circles[self.heap[1] as usize].alive {
            self.heap_extract_min();
        }
    }

    /// Schedule a circle event for `arc`.
    pub fn push_circle(&mut self, arc: ArcIdx, circle: Circle) -> CircleIdx {
        let idx = self.circles.len() as CircleIdx;
        self.circles.push(CircleEvent {
            arc,
            center: circle.center,
            bottom: circle.bottom,
            alive: true,
        });
        self.heap.push(idx);
        let last = self.heap_len();
        self.float_up(last);
        idx
    }

    /// Mark a circle event dead; it will be skipped on extraction.
    pub fn invalidate(&mut self, idx: CircleIdx) {
        let ev = &mut self.circles[idx as usize];
        if ev.alive {
            ev.alive = false;
            self.invalidated += 1;
        }
    }

    pub fn circle(&self, idx: CircleIdx) -> &CircleEvent {
        &self.circles[idx as usize]
    }

    /// Extract the next live event. `None` means the sweep is complete.
    pub fn pop_min(&mut self) -> Option<Event> {
        self.prune();
        let site = self.sites.get(self.site_pos).copied();
        let circle = if self.heap_len() > 0 { Some(self.heap[1]) } else { None };
        match (site, circle) {
            (None, None) => None,
            (Some((_, s)), None) => {
                self.site_pos += 1;
                Some(Event::Site(s))
            }
            (None, Some(_)) => self.heap_extract_min().map(Event::Circle),
            (Some((p, s)), Some(c)) => {
                let ev = &self.circles[c as usize];
                if p.y < ev.bottom || (p.y == ev.bottom && p.x < ev.center.x) {
                    self.site_pos += 1;
                    Some(Event::Site(s))
                } else {
                    self.heap_extract_min().map(Event::Circle)
                }
            }
        }
    }

    /// True once no live event remains.
    pub fn is_empty(&mut self) -> bool {
        self.prune();
        self.site_pos >= self.sites.len() && self.heap_len() == 0
    }

    /// Total number of circle events scheduled so far.
    pub fn circles_scheduled(&self) -> usize {
        self.circles.len()
    }

    /// Number of circle events that were invalidated before firing.
    pub fn circles_invalidated(&self) -> usize {
        self.invalidated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle_at(x: Real, bottom: Real) -> Circle {
        Circle {
            center: Point::new(x, bottom - 1.0),
            bottom,
        }
    }

    fn drain(q: &mut EventQueue) -> Vec<Event> {
        std::iter::from_fn(|| q.pop_min()).collect()
    }

    #[test]
    fn sites_come_out_sorted_by_y_then_x() {
        let pts = [
            Point::new(5.0, 2.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 2.0),
            Point::new(3.0, 0.0),
        ];
        let mut q = EventQueue::new(&pts);
        assert_eq!(
            drain(&mut q),
            vec![Event::Site(3), Event::Site(1), Event::Site(2), Event::Site(0)]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn circles_interleave_with_sites() {
        let pts = [Point::new(0.0, 0.0), Point::new(0.0, 10.0)];
        let mut q = EventQueue::new(&pts);
        let c5 = q.push_circle(0, circle_at(0.0, 5.0));
        let c3 = q.push_circle(1, circle_at(0.0, 3.0));
        let c20 = q.push_circle(2, circle_at(0.0, 20.0));
        assert_eq!(
            drain(&mut q),
            vec![
                Event::Site(0),
                Event::Circle(c3),
                Event::Circle(c5),
                Event::Site(1),
                Event::Circle(c20)
            ]
        );
    }

    #[test]
    fn invalidated_circles_are_skipped() {
        let mut q = EventQueue::new(&[]);
        let a = q.push_circle(0, circle_at(0.0, 1.0));
        let b = q.push_circle(1, circle_at(0.0, 2.0));
        let c = q.push_circle(2, circle_at(0.0, 3.0));
        q.invalidate(a);
        q.invalidate(c);
        q.invalidate(c);
        assert_eq!(q.circles_invalidated(), 2);
        assert_eq!(drain(&mut q), vec![Event::Circle(b)]);
        assert!(q.is_empty());
        assert!(!q.circle(a).is_alive());
    }

    #[test]
    fn ties_break_on_x_then_sequence() {
        let mut q = EventQueue::new(&[]);
        let a = q.push_circle(0, circle_at(4.0, 1.0));
        let b = q.push_circle(1, circle_at(2.0, 1.0));
        let c = q.push_circle(2, circle_at(2.0, 1.0));
        assert_eq!(
            drain(&mut q),
            vec![Event::Circle(b), Event::Circle(c), Event::Circle(a)]
        );
    }

    #[test]
    fn circle_wins_exact_tie_with_site() {
        let mut q = EventQueue::new(&[Point::new(2.0, 1.0)]);
        let c = q.push_circle(0, circle_at(2.0, 1.0));
        assert_eq!(drain(&mut q), vec![Event::Circle(c), Event::Site(0)]);
    }

    #[test]
    fn many_random_circles_pop_in_order() {
        let mut q = EventQueue::new(&[]);
        let mut keys: Vec<Real> = (0..200).map(|i| ((i * 7919) % 211) as Real).collect();
        for (i, &k) in keys.iter().enumerate() {
            q.push_circle(i as ArcIdx, circle_at(0.0, k));
        }
        keys.sort_by(|a, b| a.total_cmp(b));
        let popped: Vec<Real> = drain(&mut q)
            .into_iter()
            .map(|e| match e {
                Event::Circle(c) => q.circle(c).bottom,
                Event::Site(_) => unreachable!(),
            })
            .collect();
        assert_eq!(popped, keys);
    }
}
