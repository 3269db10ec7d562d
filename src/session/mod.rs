mod store;

pub use store::{SessionId, SessionStore};

use crate::error::{InputError, Result, TrigonError};
use crate::geometry::Polygon;
use crate::hull::{ConvexHull, QuickHull};
use crate::math::Point2;
use crate::solver::{Solver, SpadeSolver};
use crate::triangulation::{TriMesh, Triangulate, TriangulationMode, TriangulationParams};
use crate::voronoi::{GenerateVoronoi, VoronoiDiagram, VoronoiParams};

/// What a session currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No mesh and no diagram.
    Empty,
    /// A mesh and no diagram.
    Triangulated,
    /// A Voronoi diagram (with or without a mesh).
    VoronoiReady,
}

/// Owns the output buffers of one triangulation session: the mesh, the
/// Voronoi diagram and the convex hull.
///
/// Each build replaces its buffer wholesale. A failed triangulation leaves an
/// empty mesh, never a mix of old and new data. Borrowed results are only
/// valid until the next build.
#[derive(Debug)]
pub struct TriangulationSession<S: Solver = SpadeSolver> {
    solver: S,
    triangulation_params: TriangulationParams,
    voronoi_params: VoronoiParams,
    trimesh: TriMesh,
    voronoi: VoronoiDiagram,
    hull: ConvexHull,
}

impl Default for TriangulationSession<SpadeSolver> {
    fn default() -> Self {
        Self::with_solver(SpadeSolver::default())
    }
}

impl TriangulationSession<SpadeSolver> {
    /// Creates an empty session backed by [`SpadeSolver`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Solver> TriangulationSession<S> {
    /// Creates an empty session backed by `solver`.
    #[must_use]
    pub fn with_solver(solver: S) -> Self {
        Self {
            solver,
            triangulation_params: TriangulationParams::default(),
            voronoi_params: VoronoiParams::default(),
            trimesh: TriMesh::default(),
            voronoi: VoronoiDiagram::default(),
            hull: ConvexHull::default(),
        }
    }

    /// Sets the parameters used by subsequent builds.
    #[must_use]
    pub fn with_params(
        mut self,
        triangulation_params: TriangulationParams,
        voronoi_params: VoronoiParams,
    ) -> Self {
        self.triangulation_params = triangulation_params;
        self.voronoi_params = voronoi_params;
        self
    }

    /// The current mesh.
    #[must_use]
    pub fn trimesh(&self) -> &TriMesh {
        &self.trimesh
    }

    /// The current Voronoi diagram.
    #[must_use]
    pub fn voronoi(&self) -> &VoronoiDiagram {
        &self.voronoi
    }

    /// The last computed convex hull.
    #[must_use]
    pub fn hull(&self) -> &ConvexHull {
        &self.hull
    }

    /// Derives the session state from the buffers it holds.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if !self.voronoi.is_empty() {
            SessionState::VoronoiReady
        } else if !self.trimesh.is_empty() {
            SessionState::Triangulated
        } else {
            SessionState::Empty
        }
    }

    /// Empties every buffer.
    pub fn clear(&mut self) {
        self.trimesh.clear();
        self.voronoi.clear();
        self.hull.points.clear();
    }

    /// Rebuilds the mesh from `polygon`.
    ///
    /// The previous diagram is dropped whether or not the build succeeds.
    ///
    /// # Errors
    ///
    /// Propagates the triangulation error; the mesh is left empty.
    pub fn triangulate(&mut self, polygon: &Polygon, mode: TriangulationMode) -> Result<&TriMesh> {
        tracing::debug!(?mode, points = polygon.points.len(), "triangulation requested");
        self.voronoi.clear();
        let result = Triangulate::new(polygon, mode)
            .with_params(self.triangulation_params)
            .execute(&self.solver);
        match result {
            Ok(mesh) => {
                tracing::info!(
                    triangles = mesh.triangle_count(),
                    points = mesh.points.len(),
                    "mesh published"
                );
                self.trimesh = mesh;
                Ok(&self.trimesh)
            }
            Err(err) => {
                self.trimesh.clear();
                tracing::warn!(error = %err, "triangulation failed; mesh cleared");
                Err(err)
            }
        }
    }

    /// Triangulates the segment boundary without inserting vertices.
    ///
    /// # Errors
    ///
    /// See [`Self::triangulate`].
    pub fn triangulate_simple(&mut self, polygon: &Polygon) -> Result<&TriMesh> {
        self.triangulate(polygon, TriangulationMode::Simple)
    }

    /// Triangulates the convex hull of the polygon's points.
    ///
    /// # Errors
    ///
    /// See [`Self::triangulate`].
    pub fn triangulate_convex_hull(&mut self, polygon: &Polygon) -> Result<&TriMesh> {
        self.triangulate(polygon, TriangulationMode::ConvexHull)
    }

    /// Triangulates the convex hull of a bare point set.
    ///
    /// # Errors
    ///
    /// See [`Self::triangulate`].
    pub fn triangulate_convex_hull_points(&mut self, points: &[Point2]) -> Result<&TriMesh> {
        let polygon = Polygon::from_points(points.to_vec());
        self.triangulate(&polygon, TriangulationMode::ConvexHull)
    }

    /// Conforming Delaunay triangulation.
    ///
    /// # Errors
    ///
    /// See [`Self::triangulate`].
    pub fn triangulate_delaunay(&mut self, polygon: &Polygon, add_vertices: bool) -> Result<&TriMesh> {
        self.triangulate(polygon, TriangulationMode::Delaunay { add_vertices })
    }

    /// Constrained Delaunay triangulation with optional quality constraints.
    ///
    /// # Errors
    ///
    /// See [`Self::triangulate`].
    pub fn triangulate_constrained_delaunay(
        &mut self,
        polygon: &Polygon,
        min_angle: Option<f64>,
        max_area: Option<f64>,
        add_vertices: bool,
    ) -> Result<&TriMesh> {
        self.triangulate(
            polygon,
            TriangulationMode::ConstrainedDelaunay {
                min_angle,
                max_area,
                add_vertices,
            },
        )
    }

    /// Triangulates the region enclosed by a closed polyline under optional
    /// quality constraints, keeping the boundary free of new vertices.
    ///
    /// # Errors
    ///
    /// See [`Self::triangulate`].
    pub fn triangulate_polyline(
        &mut self,
        contour: &[Point2],
        min_angle: Option<f64>,
        max_area: Option<f64>,
    ) -> Result<&TriMesh> {
        let polygon = Polygon::from_closed_polyline(contour);
        self.triangulate_constrained_delaunay(&polygon, min_angle, max_area, false)
    }

    /// Rebuilds the Voronoi diagram of `points`.
    ///
    /// With fewer than three points this is a no-op that reports
    /// `InputError::TooFewPoints` and keeps the previous diagram. Any other
    /// failure clears the diagram.
    ///
    /// # Errors
    ///
    /// Propagates the Voronoi error.
    pub fn generate_voronoi_diagram(
        &mut self,
        points: &[Point2],
        use_delaunay_basis: bool,
    ) -> Result<&VoronoiDiagram> {
        tracing::debug!(points = points.len(), use_delaunay_basis, "Voronoi diagram requested");
        let result = GenerateVoronoi::new(points)
            .with_delaunay_basis(use_delaunay_basis)
            .with_params(self.voronoi_params)
            .execute(&self.solver);
        self.publish_voronoi(result)
    }

    /// Rebuilds the Voronoi diagram from the current mesh points.
    ///
    /// # Errors
    ///
    /// Returns `InputError::EmptyMesh` if no mesh is available; otherwise
    /// behaves like [`Self::generate_voronoi_diagram`].
    pub fn generate_voronoi_from_mesh(&mut self) -> Result<&VoronoiDiagram> {
        if self.trimesh.points.is_empty() {
            return Err(InputError::EmptyMesh.into());
        }
        let result = GenerateVoronoi::new(&self.trimesh.points)
            .with_params(self.voronoi_params)
            .execute(&self.solver);
        self.publish_voronoi(result)
    }

    /// Computes and stores the convex hull of `points`.
    ///
    /// # Errors
    ///
    /// Propagates the hull error; the stored hull is cleared.
    pub fn compute_convex_hull(&mut self, points: &[Point2]) -> Result<&ConvexHull> {
        match QuickHull::new(points).execute() {
            Ok(hull) => {
                self.hull = hull;
                Ok(&self.hull)
            }
            Err(err) => {
                self.hull.points.clear();
                Err(err)
            }
        }
    }

    fn publish_voronoi(&mut self, result: Result<VoronoiDiagram>) -> Result<&VoronoiDiagram> {
        match result {
            Ok(diagram) => {
                tracing::info!(
                    points = diagram.points.len(),
                    segments = diagram.segments.len(),
                    "Voronoi diagram published"
                );
                self.voronoi = diagram;
                Ok(&self.voronoi)
            }
            Err(err @ TrigonError::Input(InputError::TooFewPoints { .. })) => Err(err),
            Err(err) => {
                self.voronoi.clear();
                tracing::warn!(error = %err, "Voronoi generation failed; diagram cleared");
                Err(err)
            }
        }
    }
}
