// Copyright 2025 Lars Brubaker
// License: MIT
//
// The beachline: the left-to-right sequence of parabolic arcs in front of
// the sweep line.
//
// Arcs are nodes of a red-black tree stored in a `Pool`, keyed implicitly by
// their breakpoints at the current sweep position (nothing is stored, the
// breakpoints are recomputed during descent). Nodes are also threaded into a
// doubly linked list (`prev`/`next`) so neighbor queries are O(1).
// INVALID = u32::MAX is the null link.

use crate::event_queue::{ArcIdx, CircleIdx};
use crate::geom::{breakpoint_x, Point, Real};
use crate::graph::{EdgeIdx, SiteIdx};
use crate::pool::{Pool, INVALID};

#[derive(Clone, Debug)]
pub struct Arc {
    pub site: SiteIdx,
    /// Edge traced by the breakpoint between this arc and its predecessor.
    pub edge: EdgeIdx,
    /// Pending circle event predicting this arc's disappearance.
    pub circle: Option<CircleIdx>,
    left: ArcIdx,
    right: ArcIdx,
    parent: ArcIdx,
    prev: ArcIdx,
    next: ArcIdx,
    red: bool,
}

impl Arc {
    fn new(site: SiteIdx, edge: EdgeIdx) -> Self {
        Arc {
            site,
            edge,
            circle: None,
            left: INVALID,
            right: INVALID,
            parent: INVALID,
            prev: INVALID,
            next: INVALID,
            red: true,
        }
    }
}

/// Where a new site lands on the beachline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    /// No arcs yet.
    Empty,
    /// Strictly inside one arc, which must be split in two.
    Split(ArcIdx),
    /// Exactly on the breakpoint between two arcs.
    Between(ArcIdx, ArcIdx),
    /// Right of the last arc; only happens while the first row of sites
    /// (all on the same y) is being inserted.
    After(ArcIdx),
}

pub struct Beachline {
    arcs: Pool<Arc>,
    root: ArcIdx,
}

impl Beachline {
    pub fn new() -> Self {
        Beachline {
            arcs: Pool::new(),
            root: INVALID,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root == INVALID
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    #[inline]
    pub fn arc(&self, a: ArcIdx) -> &Arc {
        &self.arcs[a]
    }

    #[inline]
    pub fn arc_mut(&mut self, a: ArcIdx) -> &mut Arc {
        &mut self.arcs[a]
    }

    #[inline]
    pub fn prev(&self, a: ArcIdx) -> Option<ArcIdx> {
        Some(self.arcs[a].prev).filter(|&p| p != INVALID)
    }

    #[inline]
    pub fn next(&self, a: ArcIdx) -> Option<ArcIdx> {
        Some(self.arcs[a].next).filter(|&n| n != INVALID)
    }

    /// Left and right neighbors of `a`.
    pub fn neighbors(&self, a: ArcIdx) -> (Option<ArcIdx>, Option<ArcIdx>) {
        (self.prev(a), self.next(a))
    }

    /// Leftmost arc.
    pub fn first(&self) -> Option<ArcIdx> {
        if self.root == INVALID {
            None
        } else {
            Some(self.leftmost(self.root))
        }
    }

    /// Arcs from left to right.
    pub fn iter(&self) -> impl Iterator<Item = ArcIdx> + '_ {
        std::iter::successors(self.first(), move |&a| self.next(a))
    }

    fn leftmost(&self, mut a: ArcIdx) -> ArcIdx {
        while self.arcs[a].left != INVALID {
            a = self.arcs[a].left;
        }
        a
    }

    #[inline]
    fn is_red(&self, a: ArcIdx) -> bool {
        a != INVALID && self.arcs[a].red
    }

    // ─────────────────────────── Breakpoints ─────────────────────────────

    /// x-coordinate of the left end of arc `a` with the sweep at `directrix`.
    pub fn left_breakpoint(&self, a: ArcIdx, directrix: Real, sites: &[Point]) -> Real {
        let focus = sites[self.arcs[a].site as usize];
        if focus.y == directrix {
            return focus.x;
        }
        match self.prev(a) {
            Some(p) => breakpoint_x(sites[self.arcs[p].site as usize], focus, directrix),
            None => Real::NEG_INFINITY,
        }
    }

    /// x-coordinate of the right end of arc `a` with the sweep at `directrix`.
    pub fn right_breakpoint(&self, a: ArcIdx, directrix: Real, sites: &[Point]) -> Real {
        match self.next(a) {
            Some(n) => self.left_breakpoint(n, directrix, sites),
            None => {
                let focus = sites[self.arcs[a].site as usize];
                if focus.y == directrix {
                    focus.x
                } else {
                    Real::INFINITY
                }
            }
        }
    }

    /// Find the arc above `x` with the sweep at `directrix`. Breakpoints
    /// closer than `eps` to `x` count as hits.
    pub fn arc_above(&self, x: Real, directrix: Real, sites: &[Point], eps: Real) -> Placement {
        let mut node = self.root;
        while node != INVALID {
            let dxl = self.left_breakpoint(node, directrix, sites) - x;
            if dxl > eps {
                node = self.arcs[node].left;
                continue;
            }
            let dxr = x - self.right_breakpoint(node, directrix, sites);
            if dxr > eps {
                let right = self.arcs[node].right;
                if right == INVALID {
                    return Placement::After(node);
                }
                node = right;
                continue;
            }
            let (prev, next) = self.neighbors(node);
            if dxl > -eps {
                if let Some(p) = prev {
                    return Placement::Between(p, node);
                }
            }
            if dxr > -eps {
                return match next {
                    Some(n) => Placement::Between(node, n),
                    None => Placement::After(node),
                };
            }
            return Placement::Split(node);
        }
        Placement::Empty
    }

    // ─────────────────────────── Tree updates ────────────────────────────

    fn rotate_left(&mut self, p: ArcIdx) {
        let q = self.arcs[p].right;
        let parent = self.arcs[p].parent;
        if parent != INVALID {
            if self.arcs[parent].left == p {
                self.arcs[parent].left = q;
            } else {
                self.arcs[parent].right = q;
            }
        } else {
            self.root = q;
        }
        self.arcs[q].parent = parent;
        self.arcs[p].parent = q;
        let q_left = self.arcs[q].left;
        self.arcs[p].right = q_left;
        if q_left != INVALID {
            self.arcs[q_left].parent = p;
        }
        self.arcs[q].left = p;
    }

    fn rotate_right(&mut self, p: ArcIdx) {
        let q = self.arcs[p].left;
        let parent = self.arcs[p].parent;
        if parent != INVALID {
            if self.arcs[parent].left == p {
                self.arcs[parent].left = q;
            } else {
                self.arcs[parent].right = q;
            }
        } else {
            self.root = q;
        }
        self.arcs[q].parent = parent;
        self.arcs[p].parent = q;
        let q_right = self.arcs[q].right;
        self.arcs[p].left = q_right;
        if q_right != INVALID {
            self.arcs[q_right].parent = p;
        }
        self.arcs[q].right = p;
    }

    /// Insert a new arc for `site` immediately after `pred` (at the very
    /// left when `pred` is `None`). `edge` is the edge traced by its left
    /// breakpoint, INVALID if there is none yet.
    pub fn insert_after(&mut self, pred: Option<ArcIdx>, site: SiteIdx, edge: EdgeIdx) -> ArcIdx {
        let node = self.arcs.insert(Arc::new(site, edge));
        let parent = match pred {
            Some(p) => {
                let succ = self.arcs[p].next;
                self.arcs[node].prev = p;
                self.arcs[node].next = succ;
                if succ != INVALID {
                    self.arcs[succ].prev = node;
                }
                self.arcs[p].next = node;
                let p_right = self.arcs[p].right;
                if p_right != INVALID {
                    let slot = self.leftmost(p_right);
                    self.arcs[slot].left = node;
                    slot
                } else {
                    self.arcs[p].right = node;
                    p
                }
            }
            None if self.root != INVALID => {
                let first = self.leftmost(self.root);
                self.arcs[node].next = first;
                self.arcs[first].prev = node;
                self.arcs[first].left = node;
                first
            }
            None => {
                self.root = node;
                INVALID
            }
        };
        self.arcs[node].parent = parent;
        self.insert_fixup(node);
        node
    }

    fn insert_fixup(&mut self, mut node: ArcIdx) {
        let mut parent = self.arcs[node].parent;
        while parent != INVALID && self.arcs[parent].red {
            let grandpa = self.arcs[parent].parent;
            if parent == self.arcs[grandpa].left {
                let uncle = self.arcs[grandpa].right;
                if self.is_red(uncle) {
                    self.arcs[parent].red = false;
                    self.arcs[uncle].red = false;
                    self.arcs[grandpa].red = true;
                    node = grandpa;
                } else {
                    if node == self.arcs[parent].right {
                        self.rotate_left(parent);
                        node = parent;
                        parent = self.arcs[node].parent;
                    }
                    self.arcs[parent].red = false;
                    self.arcs[grandpa].red = true;
                    self.rotate_right(grandpa);
                }
            } else {
                let uncle = self.arcs[grandpa].left;
                if self.is_red(uncle) {
                    self.arcs[parent].red = false;
                    self.arcs[uncle].red = false;
                    self.arcs[grandpa].red = true;
                    node = grandpa;
                } else {
                    if node == self.arcs[parent].left {
                        self.rotate_right(parent);
                        node = parent;
                        parent = self.arcs[node].parent;
                    }
                    self.arcs[parent].red = false;
                    self.arcs[grandpa].red = true;
                    self.rotate_left(grandpa);
                }
            }
            parent = self.arcs[node].parent;
        }
        let root = self.root;
        self.arcs[root].red = false;
    }

    /// Unlink arc `a` and return it.
    pub fn remove(&mut self, a: ArcIdx) -> Option<Arc> {
        self.arcs.get(a)?;
        let (prev, next) = (self.arcs[a].prev, self.arcs[a].next);
        if next != INVALID {
            self.arcs[next].prev = prev;
        }
        if prev != INVALID {
            self.arcs[prev].next = next;
        }

        let mut parent = self.arcs[a].parent;
        let left = self.arcs[a].left;
        let right = self.arcs[a].right;
        let replacement = if left == INVALID {
            right
        } else if right == INVALID {
            left
        } else {
            self.leftmost(right)
        };
        if parent != INVALID {
            if self.arcs[parent].left == a {
                self.arcs[parent].left = replacement;
            } else {
                self.arcs[parent].right = replacement;
            }
        } else {
            self.root = replacement;
        }

        let was_red;
        let mut child;
        if left != INVALID && right != INVALID {
            was_red = self.arcs[replacement].red;
            self.arcs[replacement].red = self.arcs[a].red;
            self.arcs[replacement].left = left;
            self.arcs[left].parent = replacement;
            if replacement != right {
                parent = self.arcs[replacement].parent;
                self.arcs[replacement].parent = self.arcs[a].parent;
                child = self.arcs[replacement].right;
                self.arcs[parent].left = child;
                self.arcs[replacement].right = right;
                self.arcs[right].parent = replacement;
            } else {
                self.arcs[replacement].parent = parent;
                parent = replacement;
                child = self.arcs[replacement].right;
            }
        } else {
            was_red = self.arcs[a].red;
            child = replacement;
        }
        if child != INVALID {
            self.arcs[child].parent = parent;
        }

        let removed = self.arcs.remove(a);
        if was_red {
            return removed;
        }
        if self.is_red(child) {
            self.arcs[child].red = false;
            return removed;
        }

        loop {
            if child == self.root {
                break;
            }
            let mut sibling;
            if child == self.arcs[parent].left {
                sibling = self.arcs[parent].right;
                if self.arcs[sibling].red {
                    self.arcs[sibling].red = false;
                    self.arcs[parent].red = true;
                    self.rotate_left(parent);
                    sibling = self.arcs[parent].right;
                }
                if self.is_red(self.arcs[sibling].left) || self.is_red(self.arcs[sibling].right) {
                    if !self.is_red(self.arcs[sibling].right) {
                        let s_left = self.arcs[sibling].left;
                        self.arcs[s_left].red = false;
                        self.arcs[sibling].red = true;
                        self.rotate_right(sibling);
                        sibling = self.arcs[parent].right;
                    }
                    self.arcs[sibling].red = self.arcs[parent].red;
                    self.arcs[parent].red = false;
                    let s_right = self.arcs[sibling].right;
                    self.arcs[s_right].red = false;
                    self.rotate_left(parent);
                    child = self.root;
                    break;
                }
            } else {
                sibling = self.arcs[parent].left;
                if self.arcs[sibling].red {
                    self.arcs[sibling].red = false;
                    self.arcs[parent].red = true;
                    self.rotate_right(parent);
                    sibling = self.arcs[parent].left;
                }
                if self.is_red(self.arcs[sibling].left) || self.is_red(self.arcs[sibling].right) {
                    if !self.is_red(self.arcs[sibling].left) {
                        let s_right = self.arcs[sibling].right;
                        self.arcs[s_right].red = false;
                        self.arcs[sibling].red = true;
                        self.rotate_left(sibling);
                        sibling = self.arcs[parent].left;
                    }
                    self.arcs[sibling].red = self.arcs[parent].red;
                    self.arcs[parent].red = false;
                    let s_left = self.arcs[sibling].left;
                    self.arcs[s_left].red = false;
                    self.rotate_right(parent);
                    child = self.root;
                    break;
                }
            }
            self.arcs[sibling].red = true;
            child = parent;
            parent = self.arcs[parent].parent;
            if self.arcs[child].red {
                break;
            }
        }
        if child != INVALID {
            self.arcs[child].red = false;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.arcs.clear();
        self.root = INVALID;
    }

    /// Checks red-black and threading invariants; returns the black height.
    #[cfg(test)]
    fn check(&self) -> usize {
        fn walk(bl: &Beachline, n: ArcIdx, out: &mut Vec<ArcIdx>) -> usize {
            if n == INVALID {
                return 1;
            }
            let arc = &bl.arcs[n];
            if arc.red {
                assert!(!bl.is_red(arc.left) && !bl.is_red(arc.right), "red node {} has red child", n);
            }
            for c in [arc.left, arc.right] {
                if c != INVALID {
                    assert_eq!(bl.arcs[c].parent, n);
                }
            }
            let lh = walk(bl, arc.left, out);
            out.push(n);
            let rh = walk(bl, arc.right, out);
            assert_eq!(lh, rh, "black height mismatch at {}", n);
            lh + usize::from(!arc.red)
        }
        assert!(!self.is_red(self.root));
        let mut in_order = Vec::new();
        let h = walk(self, self.root, &mut in_order);
        let threaded: Vec<ArcIdx> = self.iter().collect();
        assert_eq!(in_order, threaded);
        assert_eq!(in_order.len(), self.len());
        h
    }
}
