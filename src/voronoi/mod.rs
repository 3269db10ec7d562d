//! Voronoi diagrams dual to a Delaunay triangulation.
//!
//! Unbounded Voronoi edges (rays) are stored as finite segments: a synthetic
//! vertex is placed `far_distance` units along the ray's outward normal.
//! This only makes the ray drawable as a long segment. The true cell is still
//! unbounded and nothing is clipped against a bounding box or against the
//! originating polygon.

use crate::error::{InputError, Result, SolverError};
use crate::geometry::Segment;
use crate::math::Point2;
use crate::solver::{EdgeEnd, Solver, SolverInput, VoronoiOutput};
use crate::triangulation::SolverFlags;

/// Length used to represent unbounded Voronoi edges.
pub const DEFAULT_FAR_DISTANCE: f64 = 250.0;

/// Parameters for Voronoi generation.
#[derive(Debug, Clone, Copy)]
pub struct VoronoiParams {
    /// Distance from a ray's origin to its synthetic far vertex.
    pub far_distance: f64,
}

impl Default for VoronoiParams {
    fn default() -> Self {
        Self {
            far_distance: DEFAULT_FAR_DISTANCE,
        }
    }
}

impl VoronoiParams {
    /// Sets the length used for unbounded edges.
    #[must_use]
    pub fn with_far_distance(mut self, far_distance: f64) -> Self {
        self.far_distance = far_distance;
        self
    }
}

/// A Voronoi diagram with every ray replaced by a finite segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoronoiDiagram {
    /// Voronoi vertices followed by the synthetic far vertices.
    pub points: Vec<Point2>,
    /// Edges as index pairs into `points`.
    pub segments: Vec<Segment>,
    unbounded: Vec<bool>,
}

impl VoronoiDiagram {
    /// Returns `true` if the diagram has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether segment `index` stands in for an unbounded ray. Its `end`
    /// is then a synthetic far vertex.
    #[must_use]
    pub fn is_unbounded(&self, index: usize) -> bool {
        self.unbounded.get(index).copied().unwrap_or(false)
    }

    /// Number of segments that stand in for rays.
    #[must_use]
    pub fn ray_count(&self) -> usize {
        self.unbounded.iter().filter(|u| **u).count()
    }

    /// Removes every point and segment.
    pub fn clear(&mut self) {
        self.points.clear();
        self.segments.clear();
        self.unbounded.clear();
    }

    /// Replaces each ray of the raw solver output by a segment ending at a
    /// new vertex `origin + normal * far_distance`.
    ///
    /// # Errors
    ///
    /// Returns `SolverError::Failed` if an edge references a vertex the
    /// solver did not output.
    pub fn from_solver_output(output: VoronoiOutput, far_distance: f64) -> Result<Self> {
        let VoronoiOutput { mut points, edges } = output;
        let vertex_count = points.len();
        let dangling = |index: usize| {
            SolverError::Failed(format!(
                "Voronoi edge references vertex {index}, but only {vertex_count} were output"
            ))
        };

        let mut segments = Vec::with_capacity(edges.len());
        let mut unbounded = Vec::with_capacity(edges.len());
        for edge in edges {
            let origin = *points.get(edge.start).ok_or_else(|| dangling(edge.start))?;
            let end = match edge.end {
                EdgeEnd::Vertex(end) if end < vertex_count => {
                    unbounded.push(false);
                    end
                }
                EdgeEnd::Vertex(end) => return Err(dangling(end).into()),
                EdgeEnd::Ray(normal) => {
                    points.push(origin + normal * far_distance);
                    unbounded.push(true);
                    points.len() - 1
                }
            };
            segments.push(Segment::new(edge.start, end));
        }

        Ok(Self {
            points,
            segments,
            unbounded,
        })
    }
}

/// Builds the Voronoi diagram of a point set.
pub struct GenerateVoronoi<'a> {
    points: &'a [Point2],
    use_delaunay_basis: bool,
    params: VoronoiParams,
}

impl<'a> GenerateVoronoi<'a> {
    /// Creates a new `GenerateVoronoi` operation.
    #[must_use]
    pub fn new(points: &'a [Point2]) -> Self {
        Self {
            points,
            use_delaunay_basis: false,
            params: VoronoiParams::default(),
        }
    }

    /// Requests a conforming Delaunay triangulation as the dual basis.
    #[must_use]
    pub fn with_delaunay_basis(mut self, use_delaunay_basis: bool) -> Self {
        self.use_delaunay_basis = use_delaunay_basis;
        self
    }

    /// Sets custom Voronoi parameters.
    #[must_use]
    pub fn with_params(mut self, params: VoronoiParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns `InputError::TooFewPoints` for fewer than three points,
    /// `GeometryError::Degenerate` for collinear input and `SolverError` if
    /// the solver fails.
    pub fn execute<S: Solver + ?Sized>(&self, solver: &S) -> Result<VoronoiDiagram> {
        if self.points.len() < 3 {
            return Err(InputError::TooFewPoints {
                required: 3,
                found: self.points.len(),
            }
            .into());
        }
        let input = SolverInput::from_points(self.points)?;
        let flags = SolverFlags::for_voronoi(self.use_delaunay_basis);
        let output = solver.voronoi(&input.points, &flags)?;
        let diagram = VoronoiDiagram::from_solver_output(output, self.params.far_distance)?;

        tracing::debug!(
            points = diagram.points.len(),
            segments = diagram.segments.len(),
            rays = diagram.ray_count(),
            "Voronoi diagram built"
        );
        Ok(diagram)
    }
}
