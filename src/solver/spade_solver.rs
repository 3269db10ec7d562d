use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{
    AngleLimit, ConstrainedDelaunayTriangulation, DelaunayTriangulation, InsertionError,
    Point2 as SpadePoint2, PositionInTriangulation, RefinementParameters, Triangulation,
};
use tracing::{debug, warn};

use crate::error::{GeometryError, Result, SolverError};
use crate::math::polygon_2d::left_normal;
use crate::math::{Point2, Vector2};
use crate::triangulation::SolverFlags;

use super::{EdgeEnd, Solver, SolverInput, SolverOutput, VoronoiEdge, VoronoiOutput};

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Lower bound of the default refinement budget.
const MIN_REFINEMENT_BUDGET: usize = 1_000;

/// [`Solver`] backed by the `spade` crate.
///
/// Segments become CDT constraint edges; quality constraints run spade's
/// Ruppert-style refinement.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpadeSolver {
    max_additional_vertices: Option<usize>,
}

impl SpadeSolver {
    /// Creates a solver whose refinement budget is derived from each request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of Steiner points a single refinement may insert.
    /// A request that needs more fails with `SolverError::Failed`.
    #[must_use]
    pub fn with_max_additional_vertices(mut self, limit: usize) -> Self {
        self.max_additional_vertices = Some(limit);
        self
    }

    /// Runs spade's Delaunay refinement, then splits any kept face that is
    /// still larger than the area limit.
    fn refine(&self, cdt: &mut Cdt, holes: &[Point2], flags: &SolverFlags) -> Result<()> {
        let remove_exterior = !flags.convex_hull;
        let budget = self
            .max_additional_vertices
            .unwrap_or_else(|| default_budget(cdt, flags.max_area));

        let angle = flags
            .min_angle
            .map_or_else(|| AngleLimit::from_deg(0.0), AngleLimit::from_deg);
        let mut params = RefinementParameters::<f64>::new()
            .with_angle_limit(angle)
            .exclude_outer_faces(remove_exterior)
            .with_max_additional_vertices(budget);
        if let Some(area) = flags.max_area {
            params = params.with_max_allowed_area(area);
        }
        if flags.no_boundary_steiner {
            params = params.keep_constraint_edges();
        }

        let before = cdt.num_vertices();
        let result = cdt.refine(params);
        let mut added = cdt.num_vertices() - before;
        if !result.refinement_complete {
            return Err(SolverError::Failed(format!(
                "refinement needs more than {budget} additional vertices"
            ))
            .into());
        }

        if let Some(max_area) = flags.max_area {
            added += split_oversized_faces(
                cdt,
                holes,
                remove_exterior,
                max_area,
                budget.saturating_sub(added),
            )?;
        }
        debug!(added, budget, "refinement complete");
        Ok(())
    }
}

impl Solver for SpadeSolver {
    fn triangulate(&self, input: &SolverInput, flags: &SolverFlags) -> Result<SolverOutput> {
        let mut cdt = Cdt::new();
        let handles = insert_points(&mut cdt, &input.points)?;

        if flags.pslg {
            insert_constraints(&mut cdt, &handles, &input.segments)?;
            if flags.needs_refinement() {
                self.refine(&mut cdt, &input.holes, flags)?;
            }
        }

        let removed = if flags.pslg {
            removed_faces(&cdt, &input.holes, !flags.convex_hull)
        } else {
            HashSet::new()
        };

        let points = cdt.vertices().map(|v| to_point(v.position())).collect();
        let triangles: Vec<[usize; 3]> = cdt
            .inner_faces()
            .filter(|f| !removed.contains(&f.fix().index()))
            .map(|f| f.vertices().map(|v| v.fix().index()))
            .collect();

        debug!(
            vertices = cdt.num_vertices(),
            faces = cdt.num_inner_faces(),
            removed = removed.len(),
            kept = triangles.len(),
            "spade triangulation finished"
        );

        Ok(SolverOutput { points, triangles })
    }

    fn voronoi(&self, points: &[Point2], flags: &SolverFlags) -> Result<VoronoiOutput> {
        // An unconstrained point set has a single Delaunay triangulation
        // (up to cocircular ties), so `conforming_delaunay` changes nothing.
        debug!(%flags, points = points.len(), "building Voronoi diagram");

        let mut dt = DelaunayTriangulation::<SpadePoint2<f64>>::new();
        insert_points(&mut dt, points)?;

        let mut output = VoronoiOutput::default();
        let mut face_ids: HashMap<usize, usize> = HashMap::new();
        for face in dt.inner_faces() {
            let center = to_point(face.circumcenter());
            if !center.x.is_finite() || !center.y.is_finite() {
                return Err(SolverError::Failed("circumcenter overflowed".into()).into());
            }
            face_ids.insert(face.fix().index(), output.points.len());
            output.points.push(center);
        }
        if output.points.is_empty() {
            return Err(GeometryError::Degenerate("points are collinear".into()).into());
        }

        for edge in dt.undirected_edges() {
            let d = edge.as_directed();
            let left = d.face().as_inner().map(|f| face_ids[&f.fix().index()]);
            let right = d.rev().face().as_inner().map(|f| face_ids[&f.fix().index()]);
            let from = to_point(d.from().position());
            let to = to_point(d.to().position());
            let voronoi_edge = match (left, right) {
                (Some(start), Some(end)) => VoronoiEdge {
                    start,
                    end: EdgeEnd::Vertex(end),
                },
                // The outer face lies left of `to -> from`.
                (Some(start), None) => VoronoiEdge {
                    start,
                    end: EdgeEnd::Ray(outward_normal(&to, &from)),
                },
                (None, Some(start)) => VoronoiEdge {
                    start,
                    end: EdgeEnd::Ray(outward_normal(&from, &to)),
                },
                (None, None) => continue,
            };
            output.edges.push(voronoi_edge);
        }

        Ok(output)
    }
}

fn to_point(p: SpadePoint2<f64>) -> Point2 {
    Point2::new(p.x, p.y)
}

/// Unit normal pointing left of `from -> to`.
fn outward_normal(from: &Point2, to: &Point2) -> Vector2 {
    left_normal(to - from).normalize()
}

/// Inserts every point and returns the solver handle of each input index.
/// Coincident points share a handle.
fn insert_points<T>(triangulation: &mut T, points: &[Point2]) -> Result<Vec<FixedVertexHandle>>
where
    T: Triangulation<Vertex = SpadePoint2<f64>>,
{
    let mut handles = Vec::new();
    handles
        .try_reserve_exact(points.len())
        .map_err(|e| SolverError::ResourceExhausted(e.to_string()))?;
    for (i, p) in points.iter().enumerate() {
        let h = triangulation
            .insert(SpadePoint2::new(p.x, p.y))
            .map_err(|e: InsertionError| SolverError::Failed(format!("insert point {i}: {e}")))?;
        handles.push(h);
    }
    Ok(handles)
}

/// Inserts every segment as a constraint edge.
fn insert_constraints(
    cdt: &mut Cdt,
    handles: &[FixedVertexHandle],
    segments: &[[usize; 2]],
) -> Result<()> {
    for (i, &[a, b]) in segments.iter().enumerate() {
        let (Some(&from), Some(&to)) = (handles.get(a), handles.get(b)) else {
            return Err(SolverError::Failed(format!("segment {i} references a missing point")).into());
        };
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(
                SolverError::Failed(format!("segment {i} crosses another segment")).into(),
            );
        }
        cdt.add_constraint(from, to);
    }
    Ok(())
}

/// Refinement budget used when none is configured: spade's own default of
/// ten vertices per input vertex, plus enough to reach the area limit over
/// the bounding box.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn default_budget(cdt: &Cdt, max_area: Option<f64>) -> usize {
    let base = cdt.num_vertices().saturating_mul(10).max(MIN_REFINEMENT_BUDGET);
    let Some(max_area) = max_area else {
        return base;
    };

    let (mut min, mut max) = (
        Point2::new(f64::INFINITY, f64::INFINITY),
        Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
    );
    for v in cdt.vertices() {
        let p = to_point(v.position());
        min = min.inf(&p);
        max = max.sup(&p);
    }
    let extent = max - min;
    // Float-to-int casts saturate, so a tiny limit yields usize::MAX.
    let estimate = (extent.x * extent.y / max_area * 4.0).ceil() as usize;
    base.saturating_add(estimate)
}

/// Inserts the center of every kept face larger than `max_area` until none
/// is left. Centers lie strictly inside their face, so constraint edges are
/// never split. Returns the number of inserted vertices.
fn split_oversized_faces(
    cdt: &mut Cdt,
    holes: &[Point2],
    remove_exterior: bool,
    max_area: f64,
    budget: usize,
) -> Result<usize> {
    let mut added = 0;
    loop {
        let removed = removed_faces(cdt, holes, remove_exterior);
        let centers: Vec<SpadePoint2<f64>> = cdt
            .inner_faces()
            .filter(|f| f.area() > max_area && !removed.contains(&f.fix().index()))
            .map(|f| f.center())
            .collect();
        if centers.is_empty() {
            return Ok(added);
        }
        added += centers.len();
        if added > budget {
            return Err(SolverError::Failed(format!(
                "area refinement needs more than {budget} additional vertices"
            ))
            .into());
        }
        for center in centers {
            cdt.insert(center)
                .map_err(|e| SolverError::Failed(format!("insert Steiner point: {e}")))?;
        }
    }
}

/// Collects the inner faces that lie outside the domain: every face
/// reachable from the unbounded region (if `remove_exterior`) or from a hole
/// point without crossing a constraint edge.
fn removed_faces(cdt: &Cdt, holes: &[Point2], remove_exterior: bool) -> HashSet<usize> {
    let mut removed = HashSet::new();
    let mut queue: VecDeque<FixedFaceHandle<InnerTag>> = VecDeque::new();

    if remove_exterior {
        let outer_fix = cdt.outer_face().fix();
        for edge in cdt.directed_edges() {
            if edge.face().fix() != outer_fix
                || cdt.is_constraint_edge(edge.as_undirected().fix())
            {
                continue;
            }
            if let Some(inner) = edge.rev().face().as_inner() {
                if removed.insert(inner.fix().index()) {
                    queue.push_back(inner.fix());
                }
            }
        }
    }

    for hole in holes {
        let seed = match cdt.locate(SpadePoint2::new(hole.x, hole.y)) {
            PositionInTriangulation::OnFace(face) => Some(face),
            PositionInTriangulation::OnEdge(edge) => {
                let edge = cdt.directed_edge(edge);
                edge.face()
                    .as_inner()
                    .or_else(|| edge.rev().face().as_inner())
                    .map(|f| f.fix())
            }
            _ => None,
        };
        match seed {
            Some(face) => {
                if removed.insert(face.index()) {
                    queue.push_back(face);
                }
            }
            None => warn!(x = hole.x, y = hole.y, "hole point is not inside any triangle; ignored"),
        }
    }

    // BFS flood-fill, stopped by constraint edges
    while let Some(face_fix) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                continue;
            }
            if let Some(neighbor) = edge.rev().face().as_inner() {
                if removed.insert(neighbor.fix().index()) {
                    queue.push_back(neighbor.fix());
                }
            }
        }
    }

    removed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TrigonError;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square_input() -> SolverInput {
        SolverInput {
            points: vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)],
            segments: vec![[0, 1], [1, 2], [2, 3], [3, 0]],
            holes: vec![],
        }
    }

    #[test]
    fn output_points_follow_input_order() {
        let out = SpadeSolver::new()
            .triangulate(&square_input(), &SolverFlags::base())
            .unwrap();
        assert_eq!(out.points, square_input().points);
        assert_eq!(out.triangles.len(), 2);
    }

    #[test]
    fn steiner_points_are_appended() {
        let flags = SolverFlags {
            pslg: true,
            max_area: Some(5.0),
            ..SolverFlags::base()
        };
        let out = SpadeSolver::new()
            .with_max_additional_vertices(1_000)
            .triangulate(&square_input(), &flags)
            .unwrap();
        assert!(out.points.len() > 4);
        assert_eq!(&out.points[..4], &square_input().points[..]);
    }

    #[test]
    fn pslg_removes_concavity_but_hull_flag_keeps_it() {
        let input = SolverInput {
            points: vec![p(0.0, 0.0), p(4.0, 0.0), p(2.0, 1.0), p(4.0, 4.0), p(0.0, 4.0)],
            segments: vec![[0, 1], [1, 2], [2, 3], [3, 4], [4, 0]],
            holes: vec![],
        };
        let pslg = SolverFlags {
            pslg: true,
            ..SolverFlags::base()
        };
        let hull = SolverFlags {
            convex_hull: true,
            ..pslg
        };
        let solver = SpadeSolver::new();
        assert_eq!(solver.triangulate(&input, &pslg).unwrap().triangles.len(), 3);
        assert_eq!(solver.triangulate(&input, &hull).unwrap().triangles.len(), 4);
    }

    #[test]
    fn rejects_non_finite_point() {
        let input = SolverInput {
            points: vec![p(0.0, 0.0), p(f64::NAN, 1.0), p(1.0, 0.0)],
            ..SolverInput::default()
        };
        let err = SpadeSolver::new()
            .triangulate(&input, &SolverFlags::base())
            .unwrap_err();
        assert!(matches!(err, TrigonError::Solver(SolverError::Failed(_))));
    }

    #[test]
    fn voronoi_of_square_has_four_rays() {
        let pts = vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(1.0, 1.0)];
        let out = SpadeSolver::new()
            .voronoi(&pts, &SolverFlags::for_voronoi(false))
            .unwrap();
        // Four triangles around the center point.
        assert_eq!(out.points.len(), 4);
        let rays: Vec<_> = out
            .edges
            .iter()
            .filter_map(|e| match e.end {
                EdgeEnd::Ray(n) => Some(n),
                EdgeEnd::Vertex(_) => None,
            })
            .collect();
        assert_eq!(rays.len(), 4);
        for n in rays {
            assert_abs_diff_eq!(n.norm(), 1.0, epsilon = 1e-12);
        }
        assert_eq!(out.edges.len(), 8);
    }

    #[test]
    fn voronoi_rays_point_away_from_hull() {
        let pts = vec![p(0.0, 0.0), p(4.0, 0.0), p(2.0, 3.0)];
        let out = SpadeSolver::new()
            .voronoi(&pts, &SolverFlags::for_voronoi(false))
            .unwrap();
        assert_eq!(out.points.len(), 1);
        assert_eq!(out.edges.len(), 3);
        let centroid = Vector2::new(2.0, 1.0);
        for e in &out.edges {
            let EdgeEnd::Ray(n) = e.end else {
                panic!("triangle Voronoi edges must all be rays");
            };
            // The ray runs away from the triangle it is dual to.
            let origin = out.points[e.start].coords;
            let far = origin + n * 100.0;
            assert!((far - centroid).norm() > (origin - centroid).norm());
        }
    }

    #[test]
    fn voronoi_of_collinear_points_is_degenerate() {
        let pts = vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)];
        let err = SpadeSolver::new()
            .voronoi(&pts, &SolverFlags::for_voronoi(false))
            .unwrap_err();
        assert!(matches!(err, TrigonError::Geometry(GeometryError::Degenerate(_))));
    }
}
