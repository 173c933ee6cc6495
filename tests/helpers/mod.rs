// Copyright 2025 Lars Brubaker
// Shared test utilities for monotri tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Flatten 2D points into xyz triples on the z = 0 plane.
pub fn flat_xy(points: &[(f32, f32)]) -> Vec<f32> {
    points.iter().flat_map(|&(x, y)| [x, y, 0.0]).collect()
}

/// Area of a 3D triangle.
pub fn triangle_area(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> f64 {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    0.5 * (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt()
}

fn point(flat: &[f32], i: usize) -> [f64; 3] {
    [flat[i * 3] as f64, flat[i * 3 + 1] as f64, flat[i * 3 + 2] as f64]
}

/// Total area of flat triangle output (nine floats per triangle).
pub fn total_triangle_area(tris: &[f32]) -> f64 {
    (0..tris.len() / 9)
        .map(|t| triangle_area(point(tris, t * 3), point(tris, t * 3 + 1), point(tris, t * 3 + 2)))
        .sum()
}

/// Area of a planar 3D polygon given as flat xyz triples (Newell's method).
pub fn polygon_area(points: &[f32]) -> f64 {
    let n = points.len() / 3;
    let mut normal = [0.0f64; 3];
    for i in 0..n {
        let p = point(points, i);
        let q = point(points, (i + 1) % n);
        normal[0] += (p[1] - q[1]) * (p[2] + q[2]);
        normal[1] += (p[2] - q[2]) * (p[0] + q[0]);
        normal[2] += (p[0] - q[0]) * (p[1] + q[1]);
    }
    0.5 * (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt()
}

pub fn triangle_count(tris: &[f32]) -> usize {
    tris.len() / 9
}

/// Verify the output shape and that every output vertex is bit-for-bit one
/// of the input vertices.
pub fn verify_valid_output(points: &[f32], tris: &[f32]) {
    assert_eq!(tris.len() % 9, 0, "output length {} is not a multiple of 9", tris.len());
    for (i, v) in tris.chunks_exact(3).enumerate() {
        let found = points
            .chunks_exact(3)
            .any(|p| p.iter().zip(v).all(|(a, b)| a.to_bits() == b.to_bits()));
        assert!(found, "output vertex {} = {:?} is not an input vertex", i, v);
    }
}

/// Verify that no triangle repeats a vertex.
pub fn verify_distinct_corners(tris: &[f32]) {
    for (i, t) in tris.chunks_exact(9).enumerate() {
        let (a, b, c) = (&t[0..3], &t[3..6], &t[6..9]);
        assert!(a != b && b != c && a != c, "triangle {} repeats a vertex: {:?}", i, t);
    }
}

/// Random star-shaped polygon around the origin: one jittered angle per
/// sector, random radii. Always simple and counter-clockwise for n >= 5.
pub fn star_polygon(seed: u64, n: usize) -> Vec<(f32, f32)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let sector = std::f64::consts::TAU / n as f64;
    (0..n)
        .map(|i| {
            let a = (i as f64 + rng.gen_range(0.1..0.9)) * sector;
            let r = rng.gen_range(0.3..1.0);
            ((r * a.cos()) as f32, (r * a.sin()) as f32)
        })
        .collect()
}

/// Map 2D points onto the plane spanned by `u` and `v` through `origin`.
pub fn embed(points: &[(f32, f32)], origin: [f32; 3], u: [f32; 3], v: [f32; 3]) -> Vec<f32> {
    points
        .iter()
        .flat_map(|&(x, y)| (0..3).map(move |k| origin[k] + x * u[k] + y * v[k]))
        .collect()
}

pub fn regular_polygon(n: usize, radius: f32) -> Vec<(f32, f32)> {
    (0..n)
        .map(|i| {
            let a = std::f32::consts::TAU * i as f32 / n as f32;
            (radius * a.cos(), radius * a.sin())
        })
        .collect()
}
