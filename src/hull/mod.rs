//! QuickHull convex hull extraction for planar point sets.

use crate::error::{GeometryError, InputError, Result};
use crate::geometry::ensure_finite;
use crate::math::polygon_2d::left_normal;
use crate::math::{Point2, TOLERANCE};

/// A convex hull as a closed polyline.
///
/// The first vertex is the lexicographically smallest input point (minimum x,
/// then minimum y) and is repeated as the last vertex. The chain runs along
/// the upper side to the largest point and back along the lower side, i.e.
/// clockwise in a y-up frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvexHull {
    pub points: Vec<Point2>,
}

impl ConvexHull {
    /// Number of distinct hull vertices (closing vertex excluded).
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Returns `true` if the hull holds no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct hull vertices without the closing duplicate.
    #[must_use]
    pub fn vertices(&self) -> &[Point2] {
        &self.points[..self.vertex_count()]
    }
}

/// Computes the convex hull of an unordered point set.
pub struct QuickHull<'a> {
    points: &'a [Point2],
}

impl<'a> QuickHull<'a> {
    /// Creates a new `QuickHull` operation.
    #[must_use]
    pub fn new(points: &'a [Point2]) -> Self {
        Self { points }
    }

    /// Executes the hull search.
    ///
    /// # Errors
    ///
    /// Returns `InputError::TooFewPoints` for fewer than 3 points,
    /// `InputError::NonFiniteCoordinate` for NaN or infinite coordinates and
    /// `GeometryError::Degenerate` when all points are coincident or
    /// collinear.
    pub fn execute(&self) -> Result<ConvexHull> {
        let points = self.points;
        if points.len() < 3 {
            return Err(InputError::TooFewPoints {
                required: 3,
                found: points.len(),
            }
            .into());
        }
        ensure_finite(points)?;

        let lexicographic = |a: &&Point2, b: &&Point2| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y));
        let (Some(&a), Some(&b)) = (
            points.iter().min_by(lexicographic),
            points.iter().max_by(lexicographic),
        ) else {
            return Err(GeometryError::Degenerate("empty point set".into()).into());
        };
        if (b - a).norm() < TOLERANCE {
            return Err(GeometryError::Degenerate("all points coincide".into()).into());
        }

        let mut hull = vec![a];
        find_hull_vertices(&a, &b, points, &mut hull);
        find_hull_vertices(&b, &a, points, &mut hull);

        if hull.len() < 4 {
            return Err(GeometryError::Degenerate("all points are collinear".into()).into());
        }

        tracing::debug!(
            input = points.len(),
            hull = hull.len() - 1,
            "convex hull computed"
        );
        Ok(ConvexHull { points: hull })
    }
}

/// Emits the hull vertices strictly after `p` up to and including `q`, using
/// only `candidates` on the left of the directed edge `p -> q`.
fn find_hull_vertices(p: &Point2, q: &Point2, candidates: &[Point2], hull: &mut Vec<Point2>) {
    let normal = left_normal(q - p).normalize();

    let mut outside = Vec::new();
    let mut farthest: Option<(Point2, f64)> = None;
    for c in candidates {
        let dist = (c - p).dot(&normal);
        if dist > TOLERANCE {
            outside.push(*c);
            if farthest.map_or(true, |(_, best)| dist > best) {
                farthest = Some((*c, dist));
            }
        }
    }

    let Some((far, _)) = farthest else {
        hull.push(*q);
        return;
    };
    if outside.len() == 1 && outside[0] == *q {
        hull.push(*q);
        return;
    }

    // A point outside p->q may lie outside only one of the two sub-edges.
    find_hull_vertices(p, &far, &outside, hull);
    find_hull_vertices(&far, q, &outside, hull);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TrigonError;
    use crate::math::polygon_2d::orient_2d;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn assert_strictly_convex(hull: &ConvexHull) {
        let v = hull.vertices();
        let n = v.len();
        for i in 0..n {
            let turn = orient_2d(&v[i], &v[(i + 1) % n], &v[(i + 2) % n]);
            assert!(turn < -TOLERANCE, "hull turns the wrong way at vertex {i}");
        }
    }

    #[test]
    fn square_with_interior_points() {
        let pts = vec![
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(5.0, 5.0),
            p(10.0, 10.0),
            p(2.0, 7.0),
            p(0.0, 10.0),
            p(5.0, 0.0),
        ];
        let hull = QuickHull::new(&pts).execute().unwrap();
        assert_eq!(hull.vertex_count(), 4);
        assert_eq!(hull.points.first(), hull.points.last());
        assert_eq!(hull.points[0], p(0.0, 0.0));
        assert_eq!(
            hull.vertices(),
            &[p(0.0, 0.0), p(0.0, 10.0), p(10.0, 10.0), p(10.0, 0.0)]
        );
        assert_strictly_convex(&hull);
    }

    #[test]
    fn every_point_inside_hull() {
        let pts: Vec<Point2> = (0..40)
            .map(|i| {
                let t = f64::from(i) * 0.7;
                p(t.cos() * (3.0 + (t * 1.3).sin()), t.sin() * (2.0 + (t * 0.4).cos()))
            })
            .collect();
        let hull = QuickHull::new(&pts).execute().unwrap();
        assert_strictly_convex(&hull);
        let v = hull.vertices();
        for q in &pts {
            for i in 0..v.len() {
                let side = orient_2d(&v[i], &v[(i + 1) % v.len()], q);
                assert!(side <= 1e-9, "point {q:?} lies outside the hull");
            }
        }
    }

    #[test]
    fn hull_vertices_are_input_points() {
        let pts = vec![p(1.0, 1.0), p(4.0, 2.0), p(3.0, 5.0), p(2.5, 2.5), p(0.0, 3.0)];
        let hull = QuickHull::new(&pts).execute().unwrap();
        for v in hull.vertices() {
            assert!(pts.contains(v));
        }
        assert_eq!(hull.vertex_count(), 4);
    }

    #[test]
    fn points_on_edges_are_not_hull_vertices() {
        let pts = vec![
            p(0.0, 0.0),
            p(2.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 4.0),
            p(0.0, 4.0),
            p(0.0, 2.0),
        ];
        let hull = QuickHull::new(&pts).execute().unwrap();
        assert_eq!(hull.vertex_count(), 4);
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let pts = vec![p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0), p(3.0, 3.0)];
        let err = QuickHull::new(&pts).execute().unwrap_err();
        assert!(matches!(err, TrigonError::Geometry(GeometryError::Degenerate(_))));
    }

    #[test]
    fn vertical_collinear_points_are_degenerate() {
        let pts = vec![p(1.0, 0.0), p(1.0, 3.0), p(1.0, 1.0), p(1.0, 2.0)];
        assert!(QuickHull::new(&pts).execute().is_err());
    }

    #[test]
    fn coincident_points_are_degenerate() {
        let pts = vec![p(2.0, 2.0); 5];
        let err = QuickHull::new(&pts).execute().unwrap_err();
        assert!(matches!(err, TrigonError::Geometry(GeometryError::Degenerate(_))));
    }

    #[test]
    fn nan_point_is_rejected() {
        let pts = vec![p(0.0, 0.0), p(4.0, 0.0), p(f64::NAN, 1.0), p(0.0, 4.0)];
        let err = QuickHull::new(&pts).execute().unwrap_err();
        assert!(matches!(
            err,
            TrigonError::Input(InputError::NonFiniteCoordinate { index: 2 })
        ));
        let inf = vec![p(0.0, 0.0), p(f64::INFINITY, 0.0), p(0.0, 4.0)];
        assert!(QuickHull::new(&inf).execute().unwrap_err().is_invalid_input());
    }

    #[test]
    fn too_few_points() {
        let err = QuickHull::new(&[p(0.0, 0.0), p(1.0, 0.0)])
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            TrigonError::Input(InputError::TooFewPoints { required: 3, found: 2 })
        ));
    }
}
