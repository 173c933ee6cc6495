// Copyright 2025 Lars Brubaker
// Error type shared by every stage of the triangulation pipeline.

use crate::mesh::{FaceIdx, VertIdx};

/// Errors that can occur while triangulating a polygon.
///
/// Every variant is a deterministic function of the input: retrying the same
/// call with the same points always fails the same way.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TriangulationError {
    /// The flat coordinate slice does not hold whole (x, y, z) triples.
    #[error("input length {0} is not a multiple of 3")]
    InvalidLength(usize),

    /// Fewer than three distinct points were supplied.
    #[error("need at least 3 points, got {0}")]
    TooFewPoints(usize),

    /// A coordinate is NaN or infinite.
    #[error("coordinate at point {index} is not finite")]
    NonFiniteCoordinate { index: usize },

    /// The best-fit plane could not be determined: the points are collinear
    /// or coincident, so the plane coefficients a, b and c all vanish.
    #[error("degenerate plane: points are collinear or coincident")]
    DegeneratePlane,

    /// No live face contains the diagonal being inserted. The polygon is
    /// self-intersecting or too far from planar. `from` and `to` are input
    /// point indices when returned by the triangulator.
    #[error("diagonal {from}-{to} lies outside every face")]
    PointOutsideFaces { from: VertIdx, to: VertIdx },

    /// The boundary crosses itself: the sweep found no boundary edge left of
    /// a split or merge vertex, or decomposition made no progress.
    #[error("boundary is not simple near vertex {vertex}")]
    NonSimple { vertex: VertIdx },

    /// A face could not be triangulated as a y-monotone polygon.
    #[error("face {face} is not y-monotone")]
    NotMonotone { face: FaceIdx },
}

pub type Result<T> = core::result::Result<T, TriangulationError>;
