// monotri: planar polygon triangulation by monotone decomposition
// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

pub mod arena;
pub mod error;
pub mod geom;
pub mod mesh;
pub mod monotone;
pub mod plane;
pub mod sweep;
pub mod tess;

pub use error::{Result, TriangulationError};
pub use plane::{PlaneFitOptions, PlaneSolver};
pub use tess::{triangulate, ShapeCache, TessOption, Triangulator, TriangulatorOptions};
