// Copyright 2025 Lars Brubaker
// Shared test utilities for fortune-voronoi tests.

#![allow(dead_code)]

use std::f64::consts::PI;

use fortune_voronoi::{compute, BorderMode, Diagram, Point, Real, Rect, SiteIdx};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const TOL: Real = 1e-6;

/// The 1000x1000 rectangle most tests use.
pub fn square() -> Rect {
    Rect::from_size(1000.0, 1000.0)
}

/// `n` reproducible random sites strictly inside `bounds`.
pub fn random_sites(seed: u64, n: usize, bounds: Rect) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Point::new(
                rng.random_range(bounds.min_x + 1.0..bounds.max_x - 1.0),
                rng.random_range(bounds.min_y + 1.0..bounds.max_y - 1.0),
            )
        })
        .collect()
}

pub fn diagram(sites: &[Point], mode: BorderMode) -> Diagram {
    match compute(sites, square(), mode) {
        Ok(d) => d,
        Err(e) => panic!("compute failed: {}", e),
    }
}

pub fn p(x: Real, y: Real) -> Point {
    Point::new(x, y)
}

/// Compare two point lists in order, within `TOL`.
pub fn assert_points(got: &[Point], want: &[Point]) {
    assert_eq!(got.len(), want.len(), "got {:?}, want {:?}", got, want);
    for (g, w) in got.iter().zip(want) {
        assert!(g.approx_eq(*w, TOL), "got {:?}, want {:?}", got, want);
    }
}

/// True if every point of `a` has a match in `b` (within `TOL`).
pub fn is_subset(a: &[Point], b: &[Point]) -> bool {
    a.iter().all(|x| b.iter().any(|y| x.approx_eq(*y, TOL)))
}

/// Same points regardless of order.
pub fn same_set(a: &[Point], b: &[Point]) -> bool {
    a.len() == b.len() && is_subset(a, b) && is_subset(b, a)
}

/// Angle of `d` measured clockwise on screen, starting just past +y:
/// (0, pi) for dx < 0, [pi, 2pi] for dx >= 0.
pub fn screen_angle(d: Point) -> Real {
    let a = (-d.x).atan2(d.y);
    if a <= 0.0 {
        a + 2.0 * PI
    } else {
        a
    }
}

/// Check that `pts` go clockwise around `center` without overlapping
/// themselves. For closed cells the wrap-around step is checked too. A point
/// on `center` itself has no angle and only takes part in the step check.
pub fn assert_clockwise(center: Point, pts: &[Point], closed: bool) {
    let angles: Vec<Real> = pts
        .iter()
        .filter(|q| !q.approx_eq(center, TOL))
        .map(|&q| screen_angle(q - center))
        .collect();
    for w in angles.windows(2) {
        assert!(w[0] <= w[1] + 1e-9, "not clockwise around {:?}: {:?}", center, pts);
    }
    if closed && pts.len() >= 3 {
        let n = pts.len();
        for i in 0..n {
            let a = pts[i] - center;
            let b = pts[(i + 1) % n] - center;
            let scale = (a.length_sq() * b.length_sq()).sqrt();
            assert!(
                a.cross(b) >= -1e-9 * scale,
                "step {} of {:?} turns the wrong way around {:?}",
                i,
                pts,
                center
            );
        }
    }
}

/// Rotate `q` by `quarter_turns` * 90 degrees about the center of `square()`.
pub fn rotate(q: Point, quarter_turns: u32) -> Point {
    let mut r = q;
    for _ in 0..quarter_turns % 4 {
        r = Point::new(1000.0 - r.y, r.x);
    }
    r
}

/// Endpoint positions of all edges incident to `site`.
pub fn incident_endpoints(d: &Diagram, site: SiteIdx) -> Vec<Point> {
    let mut out = Vec::new();
    for e in d.cell(site).edges() {
        out.push(d.vertex(e.start).pos);
        out.push(d.vertex(e.end).pos);
    }
    out
}
