use crate::error::{InputError, Result};
use crate::math::{Point2, TOLERANCE};

/// An ordered pair of indices into a point buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    /// Creates a new segment from `start` to `end`.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<(usize, usize)> for Segment {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

/// A planar straight-line graph: points, boundary segments between them and
/// one representative point inside each hole.
///
/// Segments are expected to form closed loops. That is not checked here;
/// open or branching chains are handed to the solver unchanged and the
/// outcome is unspecified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point2>,
    pub segments: Vec<Segment>,
    pub holes: Vec<Point2>,
}

impl Polygon {
    /// Creates a polygon from its raw buffers.
    #[must_use]
    pub fn new(points: Vec<Point2>, segments: Vec<Segment>, holes: Vec<Point2>) -> Self {
        Self {
            points,
            segments,
            holes,
        }
    }

    /// Creates a polygon with points only (no boundary, no holes).
    #[must_use]
    pub fn from_points(points: Vec<Point2>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Builds a single-loop polygon from a closed polyline.
    ///
    /// Consecutive vertices become boundary segments and the last vertex
    /// wraps around to the first. If the polyline repeats its first vertex
    /// at the end, that duplicate is dropped.
    #[must_use]
    pub fn from_closed_polyline(polyline: &[Point2]) -> Self {
        let mut points = polyline.to_vec();
        if points.len() > 1 {
            let first = points[0];
            let last = points[points.len() - 1];
            if (first - last).norm() < TOLERANCE {
                points.pop();
            }
        }
        let n = points.len();
        let segments = (0..n).map(|i| Segment::new(i, (i + 1) % n)).collect();
        Self {
            points,
            segments,
            holes: Vec::new(),
        }
    }

    /// Adds a hole marker and returns the polygon.
    #[must_use]
    pub fn with_hole(mut self, hole: Point2) -> Self {
        self.holes.push(hole);
        self
    }

    /// Returns a copy with every point and hole scaled component-wise.
    #[must_use]
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        let scale = |p: &Point2| Point2::new(p.x * sx, p.y * sy);
        Self {
            points: self.points.iter().map(scale).collect(),
            segments: self.segments.clone(),
            holes: self.holes.iter().map(scale).collect(),
        }
    }

    /// Checks that every segment index addresses an existing point and that
    /// every coordinate is finite.
    ///
    /// # Errors
    ///
    /// Returns `InputError::SegmentOutOfRange` or
    /// `InputError::NonFiniteCoordinate`.
    pub fn validate(&self) -> Result<()> {
        self.validate_points()?;
        let len = self.points.len();
        for (segment, s) in self.segments.iter().enumerate() {
            for index in [s.start, s.end] {
                if index >= len {
                    return Err(InputError::SegmentOutOfRange {
                        segment,
                        index,
                        len,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Checks that every point coordinate is finite.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NonFiniteCoordinate` naming the first bad point.
    pub fn validate_points(&self) -> Result<()> {
        ensure_finite(&self.points)
    }

    /// Splits the segment list into boundary loops.
    ///
    /// A new loop starts whenever a segment does not continue from the end of
    /// the previous one, so loops are expected to be listed contiguously.
    /// Each loop is returned as its vertex sequence, closing vertex repeated
    /// when the chain returns to its start.
    #[must_use]
    pub fn boundary_loops(&self) -> Vec<Vec<Point2>> {
        let mut loops: Vec<Vec<Point2>> = Vec::new();
        let mut last_index: Option<usize> = None;
        for s in &self.segments {
            let (Some(&a), Some(&b)) = (self.points.get(s.start), self.points.get(s.end)) else {
                last_index = None;
                continue;
            };
            match loops.last_mut() {
                Some(current) if last_index == Some(s.start) => current.push(b),
                _ => loops.push(vec![a, b]),
            }
            last_index = Some(s.end);
        }
        loops
    }
}

/// Fails with `InputError::NonFiniteCoordinate` naming the first point with
/// a NaN or infinite coordinate.
pub(crate) fn ensure_finite(points: &[Point2]) -> Result<()> {
    match points
        .iter()
        .position(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        Some(index) => Err(InputError::NonFiniteCoordinate { index }.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TrigonError;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn closed_polyline_drops_duplicate_closing_vertex() {
        let mut pts = square();
        pts.push(pts[0]);
        let poly = Polygon::from_closed_polyline(&pts);
        assert_eq!(poly.points.len(), 4);
        assert_eq!(
            poly.segments,
            vec![
                Segment::new(0, 1),
                Segment::new(1, 2),
                Segment::new(2, 3),
                Segment::new(3, 0)
            ]
        );
    }

    #[test]
    fn closed_polyline_without_duplicate_wraps() {
        let poly = Polygon::from_closed_polyline(&square());
        assert_eq!(poly.points.len(), 4);
        assert_eq!(poly.segments.last(), Some(&Segment::new(3, 0)));
    }

    #[test]
    fn validate_rejects_out_of_range_segment() {
        let poly = Polygon::new(square(), vec![Segment::new(0, 4)], vec![]);
        let err = poly.validate().unwrap_err();
        assert!(matches!(
            err,
            TrigonError::Input(InputError::SegmentOutOfRange {
                segment: 0,
                index: 4,
                len: 4
            })
        ));
    }

    #[test]
    fn validate_rejects_nan() {
        let mut pts = square();
        pts[2].y = f64::NAN;
        let err = Polygon::from_points(pts).validate().unwrap_err();
        assert!(matches!(
            err,
            TrigonError::Input(InputError::NonFiniteCoordinate { index: 2 })
        ));
    }

    #[test]
    fn validate_accepts_well_formed() {
        Polygon::from_closed_polyline(&square()).validate().unwrap();
    }

    #[test]
    fn boundary_loops_splits_outer_and_inner() {
        let mut points = square();
        points.extend([
            Point2::new(3.0, 3.0),
            Point2::new(7.0, 3.0),
            Point2::new(7.0, 7.0),
            Point2::new(3.0, 7.0),
        ]);
        let segments = [(0, 1), (1, 2), (2, 3), (3, 0), (4, 5), (5, 6), (6, 7), (7, 4)]
            .into_iter()
            .map(Segment::from)
            .collect();
        let poly = Polygon::new(points, segments, vec![Point2::new(5.0, 5.0)]);
        let loops = poly.boundary_loops();
        assert_eq!(loops.len(), 2);
        assert_eq!(loops[0].len(), 5);
        assert_eq!(loops[0][0], loops[0][4]);
        assert_eq!(loops[1][0], Point2::new(3.0, 3.0));
    }

    #[test]
    fn scaled_flips_y() {
        let poly = Polygon::from_closed_polyline(&square())
            .with_hole(Point2::new(5.0, 5.0))
            .scaled(2.0, -1.0);
        assert_eq!(poly.points[2], Point2::new(20.0, -10.0));
        assert_eq!(poly.holes[0], Point2::new(10.0, -5.0));
    }
}
