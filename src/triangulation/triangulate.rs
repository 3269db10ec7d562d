use crate::error::{InputError, Result};
use crate::geometry::Polygon;
use crate::solver::{Solver, SolverInput};

use super::{compact, SolverFlags, TriMesh, TriangulationMode, TriangulationParams};

/// Triangulates a polygon into a compacted [`TriMesh`].
pub struct Triangulate<'a> {
    polygon: &'a Polygon,
    mode: TriangulationMode,
    params: TriangulationParams,
}

impl<'a> Triangulate<'a> {
    /// Creates a new `Triangulate` operation with default parameters.
    #[must_use]
    pub fn new(polygon: &'a Polygon, mode: TriangulationMode) -> Self {
        Self {
            polygon,
            mode,
            params: TriangulationParams::default(),
        }
    }

    /// Sets custom triangulation parameters.
    #[must_use]
    pub fn with_params(mut self, params: TriangulationParams) -> Self {
        self.params = params;
        self
    }

    /// The solver switches this operation will run with.
    #[must_use]
    pub fn flags(&self) -> SolverFlags {
        SolverFlags::for_mode(&self.mode, &self.params)
    }

    /// Executes the triangulation.
    ///
    /// Input that collapses to fewer than three distinct or only collinear
    /// points yields an empty mesh.
    ///
    /// # Errors
    ///
    /// Returns `InputError` for fewer than three points, out-of-range segment
    /// indices or non-finite coordinates, and `SolverError` if the solver
    /// rejects the input.
    pub fn execute<S: Solver + ?Sized>(&self, solver: &S) -> Result<TriMesh> {
        let polygon = self.polygon;
        if polygon.points.len() < 3 {
            return Err(InputError::TooFewPoints {
                required: 3,
                found: polygon.points.len(),
            }
            .into());
        }

        let flags = self.flags();
        let input = if flags.pslg {
            polygon.validate()?;
            SolverInput::from_polygon(polygon)?
        } else {
            polygon.validate_points()?;
            SolverInput::from_points(&polygon.points)?
        };

        tracing::debug!(
            %flags,
            points = input.points.len(),
            segments = input.segments.len(),
            holes = input.holes.len(),
            "triangulating"
        );

        let output = solver.triangulate(&input, &flags)?;
        compact(&output)
    }
}
