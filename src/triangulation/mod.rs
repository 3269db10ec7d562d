mod compact;
mod descriptor;
mod triangulate;

pub use compact::compact;
pub use descriptor::SolverFlags;
pub use triangulate::Triangulate;

use crate::math::polygon_2d::{triangle_area, triangle_centroid};
use crate::math::{lift, Point2, Point3};

/// Angle constraints above this value make refinement unreliable.
pub const DEFAULT_ANGLE_LIMIT: f64 = 34.0;

/// How a polygon is triangulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriangulationMode {
    /// Honor the segment boundary and holes, insert no new vertices.
    Simple,
    /// Triangulate the convex hull of the points, ignoring segments and holes.
    ConvexHull,
    /// Conforming Delaunay triangulation of points, segments and holes.
    Delaunay {
        /// Allow boundary segments to be split by new vertices.
        add_vertices: bool,
    },
    /// Constrained Delaunay triangulation refined to quality constraints.
    ConstrainedDelaunay {
        /// Minimum triangle angle in degrees; clamped to the angle limit.
        min_angle: Option<f64>,
        /// Maximum triangle area; non-positive values disable it.
        max_area: Option<f64>,
        /// Allow boundary segments to be split by new vertices.
        add_vertices: bool,
    },
}

/// Parameters shared by every triangulation.
#[derive(Debug, Clone, Copy)]
pub struct TriangulationParams {
    /// Upper bound applied to any requested minimum angle.
    pub angle_limit: f64,
}

impl Default for TriangulationParams {
    fn default() -> Self {
        Self {
            angle_limit: DEFAULT_ANGLE_LIMIT,
        }
    }
}

impl TriangulationParams {
    /// Sets the upper bound for minimum-angle constraints.
    #[must_use]
    pub fn with_angle_limit(mut self, angle_limit: f64) -> Self {
        self.angle_limit = angle_limit;
        self
    }
}

/// One output triangle: its corner coordinates and their indices into
/// [`TriMesh::points`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub coords: [Point2; 3],
    pub indices: [usize; 3],
}

impl Triangle {
    /// Unsigned area.
    #[must_use]
    pub fn area(&self) -> f64 {
        let [a, b, c] = &self.coords;
        triangle_area(a, b, c)
    }

    /// Barycenter of the three corners.
    #[must_use]
    pub fn centroid(&self) -> Point2 {
        let [a, b, c] = &self.coords;
        triangle_centroid(a, b, c)
    }
}

/// A compacted triangle mesh: every point is used by at least one triangle
/// and every triangle index addresses `points`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    pub points: Vec<Point2>,
    pub triangles: Vec<Triangle>,
}

impl TriMesh {
    /// Returns `true` if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Sum of all triangle areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Points lifted into 3D with `z = 0`.
    #[must_use]
    pub fn points_3d(&self) -> Vec<Point3> {
        self.points.iter().map(lift).collect()
    }

    /// Flat index buffer, three entries per triangle.
    #[must_use]
    pub fn index_buffer(&self) -> Vec<usize> {
        self.triangles.iter().flat_map(|t| t.indices).collect()
    }

    /// Removes every point and triangle.
    pub fn clear(&mut self) {
        self.points.clear();
        self.triangles.clear();
    }
}
