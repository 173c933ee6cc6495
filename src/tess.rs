// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// The triangulator: public API and the pipeline that ties the stages
// together.
//
//   input points -> best-fit plane projection -> one-face half-edge mesh
//   -> monotone decomposition -> per-face monotone triangulation -> triangles
//
// Every call owns its vertex buffer, sweep permutation and mesh; nothing is
// shared between calls.

mod cache;
mod output;

pub use cache::ShapeCache;

use crate::error::{Result, TriangulationError};
use crate::mesh::{Dcel, VertIdx};
use crate::monotone::{decompose, triangulate_monotone};
use crate::plane::{project_polygon, PlaneFitOptions, PlaneSolver};
use crate::sweep::{Permutation, SweepLine};

// ─────────────────────────────── Public types ──────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TessOption {
    /// How the best-fit plane is solved.
    PlaneSolver(PlaneSolver),
    /// Relative threshold for declaring the input collinear.
    PlaneTolerance(f64),
    /// Iteration cap for the iterative plane solver.
    MaxIterations(usize),
    /// Gradient norm at which the iterative plane solver stops.
    GradientTolerance(f64),
    /// Drop repeated consecutive points (including a closing repeat of the
    /// first point) before triangulating.
    RemoveDuplicates(bool),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangulatorOptions {
    pub plane: PlaneFitOptions,
    pub remove_duplicates: bool,
}

impl Default for TriangulatorOptions {
    fn default() -> Self {
        Self {
            plane: PlaneFitOptions::default(),
            remove_duplicates: true,
        }
    }
}

// ─────────────────────────── Triangulator ──────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct Triangulator {
    options: TriangulatorOptions,
}

impl Triangulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TriangulatorOptions) -> Self {
        Triangulator { options }
    }

    pub fn options(&self) -> &TriangulatorOptions {
        &self.options
    }

    pub fn set_option(&mut self, option: TessOption) {
        match option {
            TessOption::PlaneSolver(solver) => self.options.plane.solver = solver,
            TessOption::PlaneTolerance(tolerance) => self.options.plane.tolerance = tolerance,
            TessOption::MaxIterations(n) => self.options.plane.max_iterations = n,
            TessOption::GradientTolerance(g) => self.options.plane.gradient_tolerance = g,
            TessOption::RemoveDuplicates(value) => self.options.remove_duplicates = value,
        }
    }

    /// Triangulate a polygon given as flat (x, y, z) triples in winding
    /// order. Returns flat triangles, nine floats each, built only from the
    /// input coordinates.
    pub fn triangulate(&self, points: &[f32]) -> Result<Vec<f32>> {
        let triangles = self.triangulate_indices(points)?;
        Ok(output::flatten_triangles(points, &triangles))
    }

    /// Triangulate and return each triangle as three input point indices.
    pub fn triangulate_indices(&self, points: &[f32]) -> Result<Vec<[u32; 3]>> {
        let (coords, ids) = self.read_points(points)?;
        let n = coords.len();
        if n < 3 {
            return Err(TriangulationError::TooFewPoints(n));
        }
        if n == 3 {
            return Ok(vec![[ids[0], ids[1], ids[2]]]);
        }

        let mut verts = project_polygon(&coords, &self.options.plane)?;
        for (v, &id) in verts.iter_mut().zip(&ids) {
            v.id = id;
        }

        let mut triangles = Vec::with_capacity(n - 2);
        let mut buffer = Permutation::new();
        triangulate_mesh(Dcel::from_polygon(verts), &mut buffer, &mut triangles)?;
        log::debug!("triangulated {} points into {} triangles", n, triangles.len());
        Ok(triangles)
    }

    /// Validate the flat input and gather its points, skipping consecutive
    /// repeats when enabled. Returns the points with their input indices.
    fn read_points(&self, points: &[f32]) -> Result<(Vec<[f32; 3]>, Vec<u32>)> {
        if points.len() % 3 != 0 {
            return Err(TriangulationError::InvalidLength(points.len()));
        }
        let mut coords: Vec<[f32; 3]> = Vec::with_capacity(points.len() / 3);
        let mut ids = Vec::with_capacity(points.len() / 3);
        for (index, p) in points.chunks_exact(3).enumerate() {
            if !p.iter().all(|c| c.is_finite()) {
                return Err(TriangulationError::NonFiniteCoordinate { index });
            }
            let p = [p[0], p[1], p[2]];
            if self.options.remove_duplicates && coords.last() == Some(&p) {
                continue;
            }
            coords.push(p);
            ids.push(index as u32);
        }
        if self.options.remove_duplicates {
            while coords.len() > 1 && coords.first() == coords.last() {
                coords.pop();
                ids.pop();
            }
        }
        Ok((coords, ids))
    }
}

/// Triangulate every face of `mesh`, appending triangles (as input point
/// indices) to `out`. Sub-faces produced by monotone decomposition are
/// extracted and handled recursively; `buffer` carries the sweep
/// permutation storage from one call to the next.
fn triangulate_mesh(mut mesh: Dcel, buffer: &mut Permutation, out: &mut Vec<[u32; 3]>) -> Result<()> {
    let id = |mesh: &Dcel, v: VertIdx| mesh.verts[v as usize].id;
    let n = mesh.vertex_count();
    if n < 3 {
        return Ok(());
    }
    if n == 3 {
        out.push([id(&mesh, 0), id(&mesh, 1), id(&mesh, 2)]);
        return Ok(());
    }

    let order = SweepLine::with_buffer(&mesh.verts, core::mem::take(buffer)).into_buffer();
    let split = decompose(&mut mesh, &order).map_err(|e| with_input_ids(&mesh, e))?;
    if split {
        *buffer = order;
        while let Some(sub) = mesh.remove_sub_polygon() {
            if sub.vertex_count() >= n {
                return Err(TriangulationError::NonSimple { vertex: sub.verts[0].id });
            }
            triangulate_mesh(sub, buffer, out)?;
        }
    } else {
        triangulate_monotone(&mut mesh, &order).map_err(|e| with_input_ids(&mesh, e))?;
        out.extend(
            mesh.triangles()
                .map(|[a, b, c]| [id(&mesh, a), id(&mesh, b), id(&mesh, c)]),
        );
        *buffer = order;
    }
    Ok(())
}

/// Rewrite mesh-local vertex indices in `err` as input point indices.
fn with_input_ids(mesh: &Dcel, err: TriangulationError) -> TriangulationError {
    let id = |v: VertIdx| mesh.verts.get(v as usize).map_or(v, |p| p.id);
    match err {
        TriangulationError::NonSimple { vertex } => TriangulationError::NonSimple { vertex: id(vertex) },
        TriangulationError::PointOutsideFaces { from, to } => TriangulationError::PointOutsideFaces {
            from: id(from),
            to: id(to),
        },
        err => err,
    }
}

/// Triangulate with default options.
pub fn triangulate(points: &[f32]) -> Result<Vec<f32>> {
    Triangulator::new().triangulate(points)
}
