// Copyright 2025 Lars Brubaker
// Tests for memoized triangulation of repeated shapes.

mod helpers;

use monotri::{ShapeCache, TessOption, Triangulator};

#[test]
fn repeated_shapes_are_served_from_cache() {
    let mut cache = ShapeCache::default();
    let shapes: Vec<Vec<f32>> = (0..4)
        .map(|seed| helpers::flat_xy(&helpers::star_polygon(seed, 20)))
        .collect();
    for _ in 0..3 {
        for shape in &shapes {
            let tris = cache.get_or_triangulate(shape).unwrap();
            assert_eq!(helpers::triangle_count(tris), 18);
        }
    }
    assert_eq!(cache.len(), 4);
    assert_eq!(cache.misses(), 4);
    assert_eq!(cache.hits(), 8);
}

#[test]
fn cached_result_matches_direct_call() {
    let shape = helpers::flat_xy(&helpers::regular_polygon(12, 3.0));
    let mut cache = ShapeCache::default();
    let cached = cache.get_or_triangulate(&shape).unwrap().to_vec();
    assert_eq!(cached, monotri::triangulate(&shape).unwrap());
}

#[test]
fn keys_are_bitwise() {
    let mut cache = ShapeCache::default();
    let a = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let b = [-0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    cache.get_or_triangulate(&a).unwrap();
    cache.get_or_triangulate(&b).unwrap();
    assert_eq!(cache.misses(), 2);
}

#[test]
fn uses_configured_triangulator() {
    // Closes on its first point: three points with deduplication off, two with it on.
    let points = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];

    let mut tess = Triangulator::new();
    tess.set_option(TessOption::RemoveDuplicates(false));
    let mut cache = ShapeCache::new(tess);
    assert_eq!(cache.get_or_triangulate(&points).unwrap(), &points[..]);

    let mut cache = ShapeCache::default();
    assert!(cache.get_or_triangulate(&points).is_err());
    assert!(cache.is_empty());
}
