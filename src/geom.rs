// Copyright 2025 Lars Brubaker
// License: MIT
//
// Geometric primitives for the sweep: points, the bounding rectangle,
// parabola breakpoints, circumcircles and the clockwise point order.
//
// All functions are pure. Coordinates use the screen convention (y grows
// downward); the sweep line advances toward increasing y.

use std::cmp::Ordering;
use std::ops::{Add, Mul, Sub};

pub type Real = f64;

/// A point in the plane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn cross(self, other: Point) -> Real {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn dot(self, other: Point) -> Real {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length_sq(self) -> Real {
        self.dot(self)
    }

    #[inline]
    pub fn distance(self, other: Point) -> Real {
        (self - other).length_sq().sqrt()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// True if both coordinates differ by less than `eps`.
    #[inline]
    pub fn approx_eq(self, other: Point, eps: Real) -> bool {
        (self.x - other.x).abs() < eps && (self.y - other.y).abs() < eps
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<Real> for Point {
    type Output = Point;

    fn mul(self, rhs: Real) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(Real, Real)> for Point {
    fn from((x, y): (Real, Real)) -> Self {
        Point::new(x, y)
    }
}

/// One side of the bounding rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// `x == min_x`
    Left,
    /// `x == max_x`
    Right,
    /// `y == min_y`
    Top,
    /// `y == max_y`
    Bottom,
}

/// Axis-aligned bounding rectangle. `min_y` is the top side on screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub min_x: Real,
    pub min_y: Real,
    pub max_x: Real,
    pub max_y: Real,
}

impl Rect {
    pub const fn new(min_x: Real, min_y: Real, max_x: Real, max_y: Real) -> Self {
        Rect { min_x, min_y, max_x, max_y }
    }

    /// Rectangle anchored at the origin.
    pub const fn from_size(width: Real, height: Real) -> Self {
        Rect::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub fn width(&self) -> Real {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> Real {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Closed containment: points on the sides are inside.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// The side `p` lies on (within `eps`), checked in the order left, top,
    /// right, bottom so that corners report a single side.
    pub fn side_of(&self, p: Point, eps: Real) -> Option<Side> {
        if (p.x - self.min_x).abs() < eps {
            Some(Side::Left)
        } else if (p.y - self.min_y).abs() < eps {
            Some(Side::Top)
        } else if (p.x - self.max_x).abs() < eps {
            Some(Side::Right)
        } else if (p.y - self.max_y).abs() < eps {
            Some(Side::Bottom)
        } else {
            None
        }
    }

    /// Corners in perimeter order: top-right, top-left, bottom-left, bottom-right.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.max_x, self.min_y),
            Point::new(self.min_x, self.min_y),
            Point::new(self.min_x, self.max_y),
            Point::new(self.max_x, self.max_y),
        ]
    }

    /// Distance along the perimeter from the top-right corner, walking
    /// top side leftward, left side downward, bottom side rightward and
    /// right side upward. Only meaningful for points on the boundary.
    pub fn perimeter_offset(&self, p: Point, eps: Real) -> Real {
        let (w, h) = (self.width(), self.height());
        if (p.y - self.min_y).abs() < eps && p.x > self.min_x + eps {
            self.max_x - p.x
        } else if (p.x - self.min_x).abs() < eps && p.y < self.max_y - eps {
            w + (p.y - self.min_y)
        } else if (p.y - self.max_y).abs() < eps && p.x < self.max_x - eps {
            w + h + (p.x - self.min_x)
        } else {
            2.0 * w + h + (self.max_y - p.y)
        }
    }

    pub fn perimeter(&self) -> Real {
        2.0 * (self.width() + self.height())
    }

    /// Moves `p` onto the rectangle if it overshoots by rounding.
    #[inline]
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.min_x, self.max_x),
            p.y.clamp(self.min_y, self.max_y),
        )
    }
}

/// x-coordinate of the breakpoint between the arc of `left` and the arc of
/// `right` (in beachline order) for a sweep line at `directrix`.
///
/// A focus lying on the directrix degenerates into a vertical ray at its own
/// x-coordinate.
pub fn breakpoint_x(left: Point, right: Point, directrix: Real) -> Real {
    let pby2 = right.y - directrix;
    if pby2 == 0.0 {
        return right.x;
    }
    let plby2 = left.y - directrix;
    if plby2 == 0.0 {
        return left.x;
    }
    let hl = left.x - right.x;
    let aby2 = 1.0 / pby2 - 1.0 / plby2;
    let b = hl / plby2;
    if aby2 != 0.0 {
        let disc = b * b
            - 2.0 * aby2 * (hl * hl / (-2.0 * plby2) - left.y + plby2 / 2.0 + right.y - pby2 / 2.0);
        (-b + disc.max(0.0).sqrt()) / aby2 + right.x
    } else {
        (left.x + right.x) / 2.0
    }
}

/// Center of the circle through three points, or `None` when they are
/// collinear.
pub fn circumcenter(a: Point, b: Point, c: Point) -> Option<Point> {
    let (bx, by) = (b.x - a.x, b.y - a.y);
    let (cx, cy) = (c.x - a.x, c.y - a.y);
    let d = 2.0 * (bx * cy - by * cx);
    if d == 0.0 {
        return None;
    }
    let hb = bx * bx + by * by;
    let hc = cx * cx + cy * cy;
    Some(Point::new(
        (cy * hb - by * hc) / d + a.x,
        (bx * hc - cx * hb) / d + a.y,
    ))
}

/// Circle predicted by three consecutive arcs `left`, `mid`, `right`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    /// Sweep coordinate at which the middle arc vanishes (`center.y + radius`).
    pub bottom: Real,
}

/// The circle through the sites of three consecutive arcs, if their
/// breakpoints converge. Diverging or (nearly) collinear triples yield
/// `None`; `eps` bounds the sine of the turn at `mid`, so the test does not
/// depend on the scale of the coordinates.
pub fn converging_circle(left: Point, mid: Point, right: Point, eps: Real) -> Option<Circle> {
    let (ax, ay) = (left.x - mid.x, left.y - mid.y);
    let (cx, cy) = (right.x - mid.x, right.y - mid.y);
    let ha = ax * ax + ay * ay;
    let hc = cx * cx + cy * cy;
    let d = 2.0 * (ax * cy - ay * cx);
    if d >= -2.0 * eps * (ha * hc).sqrt() {
        return None;
    }
    let x = (cy * ha - ay * hc) / d;
    let y = (ax * hc - cx * ha) / d;
    let center = Point::new(x + mid.x, y + mid.y);
    Some(Circle {
        center,
        bottom: center.y + (x * x + y * y).sqrt(),
    })
}

/// Direction in which the breakpoint between `left` and `right` travels:
/// perpendicular to the two sites, with `left` on the walker's left in
/// screen coordinates.
#[inline]
pub fn bisector_direction(left: Point, right: Point) -> Point {
    Point::new(right.y - left.y, left.x - right.x)
}

#[inline]
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Strategy used to order the boundary points of a cell around its site.
pub type PointOrder = fn(Point, Point, Point) -> Ordering;

fn half_plane(d: Point) -> u8 {
    if d.x == 0.0 && d.y == 0.0 {
        0
    } else if d.x < 0.0 {
        1
    } else {
        2
    }
}

/// Clockwise order around `center` on screen (y axis pointing down).
///
/// Starts just after the +y direction and sweeps through the `dx < 0` half
/// first. Points on the same ray are ordered nearer-first; a point
/// coincident with `center` sorts before everything else.
pub fn clockwise(center: Point, a: Point, b: Point) -> Ordering {
    let da = a - center;
    let db = b - center;
    let (ha, hb) = (half_plane(da), half_plane(db));
    if ha != hb {
        return ha.cmp(&hb);
    }
    if ha == 0 {
        return Ordering::Equal;
    }
    let cross = da.cross(db);
    if cross > 0.0 {
        return Ordering::Less;
    }
    if cross < 0.0 {
        return Ordering::Greater;
    }
    // Opposite rays only share a half on the vertical axis.
    if da.dot(db) < 0.0 {
        return da.y.total_cmp(&db.y);
    }
    da.length_sq().total_cmp(&db.length_sq())
}
