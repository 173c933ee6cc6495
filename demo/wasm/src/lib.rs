// Copyright 2025 Lars Brubaker
// WASM bindings for monotri

use monotri::{PlaneSolver, ShapeCache, TessOption, Triangulator};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

/// A configurable triangulator that remembers shapes it has already seen.
#[wasm_bindgen]
pub struct TriangulatorJs {
    cache: ShapeCache,
    last_error: Option<String>,
}

#[wasm_bindgen]
impl TriangulatorJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> TriangulatorJs {
        TriangulatorJs::with(Triangulator::new())
    }

    /// Switch the plane solver (0 = Direct, 1 = Iterative). Clears the cache.
    pub fn set_solver(&mut self, solver: u32) {
        let solver = match solver {
            1 => PlaneSolver::Iterative,
            _ => PlaneSolver::Direct,
        };
        let mut inner = Triangulator::new();
        inner.set_option(TessOption::PlaneSolver(solver));
        *self = TriangulatorJs::with(inner);
    }

    /// Triangulate a flat [x0,y0,z0, x1,y1,z1, ...] Float32Array. Returns
    /// nine floats per triangle, or an empty array on failure (see
    /// `last_error`).
    pub fn triangulate(&mut self, points: &[f32]) -> Vec<f32> {
        match self.cache.get_or_triangulate(points) {
            Ok(tris) => {
                self.last_error = None;
                tris.to_vec()
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Vec::new()
            }
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.clone()
    }

    pub fn cache_hits(&self) -> u32 {
        self.cache.hits() as u32
    }

    pub fn cache_misses(&self) -> u32 {
        self.cache.misses() as u32
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl TriangulatorJs {
    fn with(inner: Triangulator) -> Self {
        TriangulatorJs {
            cache: ShapeCache::new(inner),
            last_error: None,
        }
    }
}

impl Default for TriangulatorJs {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience: triangulate one polygon with default options.
#[wasm_bindgen]
pub fn triangulate_polygon(points: &[f32]) -> Vec<f32> {
    monotri::triangulate(points).unwrap_or_default()
}

/// Convenience: same as triangulate_polygon but returns input point indices,
/// three per triangle.
#[wasm_bindgen]
pub fn triangulate_polygon_indices(points: &[f32]) -> Vec<u32> {
    Triangulator::new()
        .triangulate_indices(points)
        .map(|tris| tris.into_iter().flatten().collect())
        .unwrap_or_default()
}
