//! Planar computational geometry: QuickHull convex hulls, constrained
//! Delaunay triangulation with quality refinement, and Voronoi diagrams.
//!
//! Meshing and Voronoi construction go through the [`solver::Solver`] seam;
//! [`solver::SpadeSolver`] is the bundled implementation. Stateful callers
//! use a [`TriangulationSession`], which owns the most recent results.

pub mod error;
pub mod geometry;
pub mod hull;
pub mod io;
pub mod math;
pub mod session;
pub mod solver;
pub mod triangulation;
pub mod voronoi;

pub use error::{Result, TrigonError};
pub use geometry::{Polygon, Segment};
pub use hull::{ConvexHull, QuickHull};
pub use session::{SessionId, SessionState, SessionStore, TriangulationSession};
pub use triangulation::{TriMesh, Triangle, Triangulate, TriangulationMode, TriangulationParams};
pub use voronoi::{GenerateVoronoi, VoronoiDiagram, VoronoiParams};
