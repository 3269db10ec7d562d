//! The constrained-Delaunay / Voronoi solver seam.
//!
//! Triangulation and Voronoi operations marshal their input into a
//! [`SolverInput`], hand it to a [`Solver`] together with a [`SolverFlags`]
//! descriptor and receive owned output buffers back. The buffers are plain
//! vectors, so every exit path releases them.

mod spade_solver;

pub use spade_solver::SpadeSolver;

use crate::error::{Result, SolverError};
use crate::geometry::Polygon;
use crate::math::{Point2, Vector2};
use crate::triangulation::SolverFlags;

/// Points, segments and holes in the solver's input layout.
#[derive(Debug, Clone, Default)]
pub struct SolverInput {
    pub points: Vec<Point2>,
    pub segments: Vec<[usize; 2]>,
    pub holes: Vec<Point2>,
}

impl SolverInput {
    /// Copies a polygon into solver buffers.
    ///
    /// # Errors
    ///
    /// Returns `SolverError::ResourceExhausted` if the buffers cannot be
    /// allocated.
    pub fn from_polygon(polygon: &Polygon) -> Result<Self> {
        let mut input = Self::default();
        reserve(&mut input.points, polygon.points.len())?;
        reserve(&mut input.segments, polygon.segments.len())?;
        reserve(&mut input.holes, polygon.holes.len())?;

        input.points.extend_from_slice(&polygon.points);
        input
            .segments
            .extend(polygon.segments.iter().map(|s| [s.start, s.end]));
        input.holes.extend_from_slice(&polygon.holes);
        Ok(input)
    }

    /// Copies a bare point set into solver buffers.
    ///
    /// # Errors
    ///
    /// Returns `SolverError::ResourceExhausted` if the buffer cannot be
    /// allocated.
    pub fn from_points(points: &[Point2]) -> Result<Self> {
        let mut input = Self::default();
        reserve(&mut input.points, points.len())?;
        input.points.extend_from_slice(points);
        Ok(input)
    }
}

fn reserve<T>(buffer: &mut Vec<T>, additional: usize) -> Result<()> {
    buffer
        .try_reserve_exact(additional)
        .map_err(|e| SolverError::ResourceExhausted(e.to_string()).into())
}

/// Raw triangulation output.
///
/// `points` is indexed by the solver's vertex index: input points first in
/// input order (duplicates collapsed onto their first occurrence), then any
/// inserted Steiner points. `points` may contain vertices no triangle uses.
#[derive(Debug, Clone, Default)]
pub struct SolverOutput {
    pub points: Vec<Point2>,
    pub triangles: Vec<[usize; 3]>,
}

/// The far end of a raw Voronoi edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeEnd {
    /// A finite Voronoi vertex.
    Vertex(usize),
    /// An unbounded ray leaving the start vertex along this unit normal.
    Ray(Vector2),
}

/// A raw Voronoi edge as produced by the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoronoiEdge {
    pub start: usize,
    pub end: EdgeEnd,
}

/// Raw Voronoi output: one vertex per Delaunay triangle, one edge per
/// Delaunay edge.
#[derive(Debug, Clone, Default)]
pub struct VoronoiOutput {
    pub points: Vec<Point2>,
    pub edges: Vec<VoronoiEdge>,
}

/// A constrained-Delaunay triangulation and Voronoi backend.
pub trait Solver {
    /// Triangulates `input` as described by `flags`.
    ///
    /// # Errors
    ///
    /// Returns `SolverError::Failed` if the input cannot be triangulated
    /// (e.g. crossing segments).
    fn triangulate(&self, input: &SolverInput, flags: &SolverFlags) -> Result<SolverOutput>;

    /// Builds the Voronoi diagram dual to the Delaunay triangulation of
    /// `points`.
    ///
    /// # Errors
    ///
    /// Returns `SolverError::Failed` if the points cannot be triangulated.
    fn voronoi(&self, points: &[Point2], flags: &SolverFlags) -> Result<VoronoiOutput>;
}
