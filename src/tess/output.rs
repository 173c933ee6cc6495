// Copyright 2025 Lars Brubaker
// Output generation for the triangulator.

/// Expand index triangles into flat (x, y, z) x 3 records, copying
/// coordinates straight from the input slice.
pub(crate) fn flatten_triangles(points: &[f32], triangles: &[[u32; 3]]) -> Vec<f32> {
    let mut out = Vec::with_capacity(triangles.len() * 9);
    for tri in triangles {
        for &v in tri {
            let base = v as usize * 3;
            out.extend_from_slice(&points[base..base + 3]);
        }
    }
    out
}
