// Copyright 2025 Lars Brubaker
// Tests for polygons lying in arbitrary 3D planes.

mod helpers;

use approx::assert_abs_diff_eq;
use monotri::{PlaneSolver, TessOption, Triangulator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const L_SHAPE: [(f32, f32); 6] = [
    (0.0, 0.0),
    (2.0, 0.0),
    (2.0, 1.0),
    (1.0, 1.0),
    (1.0, 2.0),
    (0.0, 2.0),
];

fn check_embedded(origin: [f32; 3], u: [f32; 3], v: [f32; 3]) {
    let points = helpers::embed(&L_SHAPE, origin, u, v);
    let tris = monotri::triangulate(&points).expect("triangulation failed");
    helpers::verify_valid_output(&points, &tris);
    assert_eq!(helpers::triangle_count(&tris), 4);
    assert_abs_diff_eq!(helpers::total_triangle_area(&tris), 3.0, epsilon = 1e-4);
}

#[test]
fn xy_plane_offset() {
    check_embedded([0.0, 0.0, 5.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
}

#[test]
fn xz_plane() {
    check_embedded([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
}

#[test]
fn yz_plane() {
    check_embedded([3.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);
}

#[test]
fn xz_plane_reversed_winding() {
    // Same shape seen from the other side.
    check_embedded([0.0, -2.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]);
}

#[test]
fn tilted_plane() {
    check_embedded([1.0, 2.0, 3.0], [0.6, 0.0, 0.8], [0.0, 1.0, 0.0]);
}

#[test]
fn oblique_plane() {
    let s2 = std::f32::consts::FRAC_1_SQRT_2;
    let s3 = 1.0 / 3.0f32.sqrt();
    check_embedded([-1.0, 0.5, 2.0], [s2, s2, 0.0], [-s3, s3, s3]);
}

#[test]
fn iterative_solver_matches_direct() {
    let points = helpers::embed(&L_SHAPE, [0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
    let mut tess = Triangulator::new();
    tess.set_option(TessOption::PlaneSolver(PlaneSolver::Iterative));
    let tris = tess.triangulate(&points).unwrap();
    assert_eq!(helpers::triangle_count(&tris), 4);
    assert_abs_diff_eq!(helpers::total_triangle_area(&tris), 3.0, epsilon = 1e-4);
}

#[test]
fn slightly_non_coplanar_input() {
    let mut rng = StdRng::seed_from_u64(42);
    let shape = helpers::regular_polygon(8, 1.0);
    let points: Vec<f32> = shape
        .iter()
        .flat_map(|&(x, y)| [x, y, rng.gen_range(-1e-3..1e-3)])
        .collect();
    let tris = monotri::triangulate(&points).expect("near-planar input should triangulate");
    helpers::verify_valid_output(&points, &tris);
    assert_eq!(helpers::triangle_count(&tris), 6);
    let flat_area = helpers::polygon_area(&helpers::flat_xy(&shape));
    assert_abs_diff_eq!(helpers::total_triangle_area(&tris), flat_area, epsilon = 1e-2);
}
