// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Pure geometric predicates operating on projected (x, y) plane coordinates.
//
// The sweep runs top-down: a vertex is "over" another when its y is greater,
// or when the y values tie and its x is greater. Every ordering decision in
// the crate (sorting, classification, chain splitting) goes through these
// functions so that ties are broken the same way everywhere.

use core::cmp::Ordering;

/// Scalar type used for projected coordinates.
pub type Real = f64;

/// Returns true if u is strictly over v in sweep order.
#[inline]
pub fn vert_over(u_x: Real, u_y: Real, v_x: Real, v_y: Real) -> bool {
    u_y > v_y || (u_y == v_y && u_x > v_x)
}

/// Total ascending order on projected points: y first, then x.
#[inline]
pub fn vert_cmp(u_x: Real, u_y: Real, v_x: Real, v_y: Real) -> Ordering {
    u_y.total_cmp(&v_y).then_with(|| u_x.total_cmp(&v_x))
}

/// Twice the signed area of triangle (u, v, w).
/// Positive when u -> v -> w turns left (counter-clockwise).
#[inline]
pub fn orient(u_x: Real, u_y: Real, v_x: Real, v_y: Real, w_x: Real, w_y: Real) -> Real {
    (v_x - u_x) * (w_y - u_y) - (v_y - u_y) * (w_x - u_x)
}

/// Returns true if walking u -> v -> w makes a strict left turn at v.
#[inline]
pub fn is_left_turn(u_x: Real, u_y: Real, v_x: Real, v_y: Real, w_x: Real, w_y: Real) -> bool {
    orient(u_x, u_y, v_x, v_y, w_x, w_y) > 0.0
}

/// Evaluates the x coordinate of segment (a, b) at height `y`.
/// A horizontal segment yields the x of its lower-ordered endpoint.
pub fn edge_x_at(a: [Real; 2], b: [Real; 2], y: Real) -> Real {
    let dy = b[1] - a[1];
    if dy == 0.0 {
        return a[0].min(b[0]);
    }
    let t = (y - a[1]) / dy;
    a[0] + (b[0] - a[0]) * t
}

/// Signed area of a closed polygon (shoelace formula).
/// Positive for counter-clockwise boundaries.
pub fn signed_area(points: &[[Real; 2]]) -> Real {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        area += p[0] * q[1] - q[0] * p[1];
    }
    area * 0.5
}

/// Tests if `pt` lies inside the closed polygon `poly` using crossing parity.
/// Points exactly on the boundary may land on either side.
pub fn point_in_polygon(pt: [Real; 2], poly: &[[Real; 2]]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = poly[i];
        let b = poly[j];
        if (a[1] > pt[1]) != (b[1] > pt[1]) {
            let x = a[0] + (pt[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
            if pt[0] < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
