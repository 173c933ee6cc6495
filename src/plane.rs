// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Best-fit plane extraction and projection of 3D input points onto 2D.
//
// The plane a*x + b*y + c*z + d = 0 minimizes the mean squared signed
// distance of the points. It is found from the centered second moments of the
// point cloud, either by a direct solve or by a fixed-step gradient iteration.
// Projection then drops the axis with the largest normal component, so the
// 2D coordinates are (translated) copies of two of the original coordinates.

use crate::error::{Result, TriangulationError};
use crate::geom::{signed_area, Real};
use crate::mesh::VertIdx;

/// An input point together with its projected plane coordinates.
/// Never mutated after projection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlanarVertex {
    pub id: VertIdx,
    /// Original 3D coordinates, copied bit-for-bit to the output.
    pub coords: [f32; 3],
    /// Projected x.
    pub x: Real,
    /// Projected y.
    pub y: Real,
}

impl PlanarVertex {
    #[inline]
    pub fn xy(&self) -> [Real; 2] {
        [self.x, self.y]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaneSolver {
    /// Closed-form solve of the moment equations.
    Direct,
    /// Fixed-step gradient descent on the residual.
    Iterative,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneFitOptions {
    pub solver: PlaneSolver,
    /// Relative threshold under which the moment matrix is considered rank
    /// deficient (collinear or coincident points).
    pub tolerance: Real,
    pub max_iterations: usize,
    pub gradient_tolerance: Real,
}

impl Default for PlaneFitOptions {
    fn default() -> Self {
        Self {
            solver: PlaneSolver::Direct,
            tolerance: 1e-10,
            max_iterations: 100,
            gradient_tolerance: 0.1,
        }
    }
}

/// Plane a*x + b*y + c*z + d = 0 with a unit normal (a, b, c).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    pub a: Real,
    pub b: Real,
    pub c: Real,
    pub d: Real,
}

impl Plane {
    pub fn normal(&self) -> [Real; 3] {
        [self.a, self.b, self.c]
    }

    /// Signed distance from `p` to the plane.
    pub fn distance(&self, p: [f32; 3]) -> Real {
        self.a * p[0] as Real + self.b * p[1] as Real + self.c * p[2] as Real + self.d
    }

    /// The axis with the largest-magnitude normal component.
    /// Ties resolve in the order a, b, c.
    pub fn dominant_axis(&self) -> Axis {
        let n = [self.a.abs(), self.b.abs(), self.c.abs()];
        let mut i = 0;
        if n[1] > n[0] {
            i = 1;
        }
        if n[2] > n[i] {
            i = 2;
        }
        match i {
            0 => Axis::X,
            1 => Axis::Y,
            _ => Axis::Z,
        }
    }
}

/// Means and centered second moments of a point cloud.
#[derive(Copy, Clone, Debug, Default)]
struct Moments {
    mean: [Real; 3],
    sxx: Real,
    syy: Real,
    szz: Real,
    sxy: Real,
    sxz: Real,
    syz: Real,
}

impl Moments {
    fn new(points: &[[f32; 3]]) -> Self {
        let n = points.len() as Real;
        let mut m = Moments::default();
        for p in points {
            for i in 0..3 {
                m.mean[i] += p[i] as Real;
            }
        }
        for i in 0..3 {
            m.mean[i] /= n;
        }
        for p in points {
            let dx = p[0] as Real - m.mean[0];
            let dy = p[1] as Real - m.mean[1];
            let dz = p[2] as Real - m.mean[2];
            m.sxx += dx * dx;
            m.syy += dy * dy;
            m.szz += dz * dz;
            m.sxy += dx * dy;
            m.sxz += dx * dz;
            m.syz += dy * dz;
        }
        m.sxx /= n;
        m.syy /= n;
        m.szz /= n;
        m.sxy /= n;
        m.sxz /= n;
        m.syz /= n;
        m
    }

    fn trace(&self) -> Real {
        self.sxx + self.syy + self.szz
    }

    fn mul(&self, v: [Real; 3]) -> [Real; 3] {
        [
            self.sxx * v[0] + self.sxy * v[1] + self.sxz * v[2],
            self.sxy * v[0] + self.syy * v[1] + self.syz * v[2],
            self.sxz * v[0] + self.syz * v[1] + self.szz * v[2],
        ]
    }

    /// Principal 2x2 minors, one per eliminated axis.
    fn minors(&self) -> [Real; 3] {
        [
            self.syy * self.szz - self.syz * self.syz,
            self.sxx * self.szz - self.sxz * self.sxz,
            self.sxx * self.syy - self.sxy * self.sxy,
        ]
    }
}

fn dot(u: [Real; 3], v: [Real; 3]) -> Real {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

fn normalize(v: [Real; 3]) -> Option<[Real; 3]> {
    let len = dot(v, v).sqrt();
    if len > 0.0 && len.is_finite() {
        Some([v[0] / len, v[1] / len, v[2] / len])
    } else {
        None
    }
}

/// Solves the normal equations with one coefficient pinned, choosing the
/// pinned axis with the best-conditioned system.
fn solve_direct(m: &Moments) -> Option<[Real; 3]> {
    let [det_x, det_y, det_z] = m.minors();
    let normal = if det_x >= det_y && det_x >= det_z {
        [
            det_x,
            m.sxz * m.syz - m.sxy * m.szz,
            m.sxy * m.syz - m.sxz * m.syy,
        ]
    } else if det_y >= det_z {
        [
            m.sxz * m.syz - m.sxy * m.szz,
            det_y,
            m.sxy * m.sxz - m.syz * m.sxx,
        ]
    } else {
        [
            m.sxy * m.syz - m.sxz * m.syy,
            m.sxy * m.sxz - m.syz * m.sxx,
            det_z,
        ]
    };
    normalize(normal)
}

/// Fixed-step descent on the mean squared distance over unit normals.
/// Stops early once the residual gradient is small.
fn solve_iterative(m: &Moments, max_iterations: usize, gradient_tolerance: Real) -> Option<[Real; 3]> {
    const STEP: Real = 0.5;
    let scale = m.trace();
    if scale <= 0.0 {
        return None;
    }

    // Start from the axis with the least spread.
    let diag = [m.sxx, m.syy, m.szz];
    let mut i = 0;
    if diag[1] < diag[0] {
        i = 1;
    }
    if diag[2] < diag[i] {
        i = 2;
    }
    let mut n = [0.0; 3];
    n[i] = 1.0;

    for iteration in 0..max_iterations {
        let cn = m.mul(n);
        let cn = [cn[0] / scale, cn[1] / scale, cn[2] / scale];
        let rho = dot(n, cn);
        let g = [
            2.0 * (cn[0] - rho * n[0]),
            2.0 * (cn[1] - rho * n[1]),
            2.0 * (cn[2] - rho * n[2]),
        ];
        if dot(g, g).sqrt() < gradient_tolerance {
            log::trace!("plane iteration converged after {} steps", iteration);
            break;
        }
        n = normalize([n[0] - STEP * g[0], n[1] - STEP * g[1], n[2] - STEP * g[2]])?;
    }
    Some(n)
}

/// Fit the best plane through `points`.
pub fn fit_plane(points: &[[f32; 3]], options: &PlaneFitOptions) -> Result<Plane> {
    if points.len() < 3 {
        return Err(TriangulationError::TooFewPoints(points.len()));
    }
    let m = Moments::new(points);
    let trace = m.trace();
    let [det_x, det_y, det_z] = m.minors();
    // The sum of principal minors vanishes exactly when at most one direction
    // has spread, i.e. no plane is determined.
    if !(trace > 0.0) || det_x + det_y + det_z <= options.tolerance * trace * trace {
        return Err(TriangulationError::DegeneratePlane);
    }

    let normal = match options.solver {
        PlaneSolver::Direct => solve_direct(&m).or_else(|| {
            log::debug!("direct plane solve failed, falling back to iteration");
            solve_iterative(&m, options.max_iterations, options.gradient_tolerance)
        }),
        PlaneSolver::Iterative => {
            solve_iterative(&m, options.max_iterations, options.gradient_tolerance)
        }
    };
    let [a, b, c] = normal.ok_or(TriangulationError::DegeneratePlane)?;
    let d = -dot([a, b, c], m.mean);
    Ok(Plane { a, b, c, d })
}

/// Maps 3D points onto 2D by dropping the plane's dominant axis.
#[derive(Copy, Clone, Debug)]
pub struct PlaneProjector {
    pub plane: Plane,
    pub dropped: Axis,
    origin: [Real; 2],
    /// Set when the projected boundary was clockwise and x has been negated.
    pub mirrored: bool,
}

impl PlaneProjector {
    pub fn new(points: &[[f32; 3]], options: &PlaneFitOptions) -> Result<Self> {
        let plane = fit_plane(points, options)?;
        let dropped = plane.dominant_axis();
        let mut projector = PlaneProjector {
            plane,
            dropped,
            origin: [0.0; 2],
            mirrored: false,
        };
        // Center the kept coordinates for precision.
        let n = points.len() as Real;
        let mut origin = [0.0; 2];
        for p in points {
            let [u, v] = projector.project(*p);
            origin[0] += u / n;
            origin[1] += v / n;
        }
        projector.origin = origin;
        Ok(projector)
    }

    /// Project a point. Dropping an axis keeps the remaining two in cyclic
    /// order so a boundary that is counter-clockwise around a positive
    /// normal component stays counter-clockwise.
    pub fn project(&self, p: [f32; 3]) -> [Real; 2] {
        let [x, y, z] = [p[0] as Real, p[1] as Real, p[2] as Real];
        let (u, v) = match self.dropped {
            Axis::X => (y, z),
            Axis::Y => (z, x),
            Axis::Z => (x, y),
        };
        let u = u - self.origin[0];
        let v = v - self.origin[1];
        if self.mirrored {
            [-u, v]
        } else {
            [u, v]
        }
    }
}

/// Fit, project, and orient a polygon so its interior lies to the left of
/// the boundary walk.
pub fn project_polygon(points: &[[f32; 3]], options: &PlaneFitOptions) -> Result<Vec<PlanarVertex>> {
    let mut projector = PlaneProjector::new(points, options)?;
    let projected: Vec<[Real; 2]> = points.iter().map(|p| projector.project(*p)).collect();
    let area = signed_area(&projected);
    if area == 0.0 || !area.is_finite() {
        return Err(TriangulationError::DegeneratePlane);
    }
    if area < 0.0 {
        projector.mirrored = true;
    }
    if log::log_enabled!(log::Level::Debug) {
        let residual = points
            .iter()
            .map(|p| projector.plane.distance(*p).abs())
            .fold(0.0, Real::max);
        log::debug!(
            "projected {} points, normal={:?}, dropped={:?}, mirrored={}, max off-plane distance={:e}",
            points.len(),
            projector.plane.normal(),
            projector.dropped,
            projector.mirrored,
            residual
        );
    }

    Ok(points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let [x, y] = projector.project(*p);
            PlanarVertex {
                id: i as VertIdx,
                coords: *p,
                x,
                y,
            }
        })
        .collect())
}
