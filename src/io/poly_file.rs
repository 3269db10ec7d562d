use std::path::Path;
use std::str::FromStr;

use crate::error::{PolyFileError, Result};
use crate::geometry::{Polygon, Segment};
use crate::math::Point2;

/// Reads a planar straight-line graph from a `.poly` file.
///
/// # Errors
///
/// Returns `PolyFileError::Io` if the file cannot be read, otherwise see
/// [`parse_poly`].
pub fn read_poly(path: impl AsRef<Path>) -> Result<Polygon> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(PolyFileError::Io)?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "reading .poly file");
    parse_poly(&source)
}

/// Parses the contents of a `.poly` file.
///
/// Layout, one record per line, `#` starts a comment:
///
/// ```text
/// <#vertices> <dim> <#attributes> <#markers>
/// <id> <x> <y> [attributes] [marker]        (per vertex)
/// <#segments> <#markers>
/// <id> <start> <end> [marker]               (per segment)
/// <#holes>
/// <id> <x> <y>                              (per hole)
/// ```
///
/// Vertex numbering may start at 0 or 1; the first vertex id decides.
/// Only the first two coordinates are read. Attributes, boundary markers and
/// a trailing regional attribute section are ignored. A missing hole section
/// reads as no holes.
///
/// # Errors
///
/// Returns `PolyFileError::Malformed` for unparsable records or segment
/// endpoints outside the vertex list, and `PolyFileError::UnexpectedEof`
/// when a section ends early.
pub fn parse_poly(source: &str) -> Result<Polygon> {
    let mut records = Records::new(source);

    let (line, header) = records.next_record("vertex header")?;
    let vertex_count: usize = field(&header, 0, line, "vertex count")?;
    if vertex_count == 0 {
        return Err(PolyFileError::Malformed {
            line,
            message: "vertices stored in a separate .node file are not supported".into(),
        }
        .into());
    }

    let mut points = Vec::with_capacity(vertex_count);
    let mut base = 0;
    for i in 0..vertex_count {
        let (line, rec) = records.next_record("vertices")?;
        let id: usize = field(&rec, 0, line, "vertex id")?;
        if i == 0 {
            base = id;
        }
        let x: f64 = field(&rec, 1, line, "x coordinate")?;
        let y: f64 = field(&rec, 2, line, "y coordinate")?;
        points.push(Point2::new(x, y));
    }

    let (line, rec) = records.next_record("segment header")?;
    let segment_count: usize = field(&rec, 0, line, "segment count")?;
    let mut segments = Vec::with_capacity(segment_count);
    for _ in 0..segment_count {
        let (line, rec) = records.next_record("segments")?;
        let start = endpoint(&rec, 1, line, base, vertex_count)?;
        let end = endpoint(&rec, 2, line, base, vertex_count)?;
        segments.push(Segment::new(start, end));
    }

    let mut holes = Vec::new();
    if let Some((line, rec)) = records.try_next() {
        let hole_count: usize = field(&rec, 0, line, "hole count")?;
        holes.reserve(hole_count);
        for _ in 0..hole_count {
            let (line, rec) = records.next_record("holes")?;
            let x: f64 = field(&rec, 1, line, "hole x coordinate")?;
            let y: f64 = field(&rec, 2, line, "hole y coordinate")?;
            holes.push(Point2::new(x, y));
        }
    }

    tracing::debug!(
        points = points.len(),
        segments = segments.len(),
        holes = holes.len(),
        base,
        ".poly parsed"
    );
    Ok(Polygon::new(points, segments, holes))
}

/// Non-empty, comment-stripped records with their 1-based line numbers.
struct Records<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Records<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().enumerate(),
        }
    }

    fn try_next(&mut self) -> Option<(usize, Vec<&'a str>)> {
        for (i, raw) in self.lines.by_ref() {
            let content = raw.split('#').next().unwrap_or_default();
            let fields: Vec<&str> = content.split_whitespace().collect();
            if !fields.is_empty() {
                return Some((i + 1, fields));
            }
        }
        None
    }

    fn next_record(&mut self, expected: &'static str) -> Result<(usize, Vec<&'a str>)> {
        self.try_next()
            .ok_or_else(|| PolyFileError::UnexpectedEof { expected }.into())
    }
}

fn field<T: FromStr>(fields: &[&str], index: usize, line: usize, what: &str) -> Result<T> {
    let raw = fields.get(index).ok_or_else(|| PolyFileError::Malformed {
        line,
        message: format!("missing {what}"),
    })?;
    raw.parse().map_err(|_| {
        PolyFileError::Malformed {
            line,
            message: format!("invalid {what} `{raw}`"),
        }
        .into()
    })
}

fn endpoint(fields: &[&str], index: usize, line: usize, base: usize, len: usize) -> Result<usize> {
    let id: usize = field(fields, index, line, "segment endpoint")?;
    id.checked_sub(base)
        .filter(|i| *i < len)
        .ok_or_else(|| {
            PolyFileError::Malformed {
                line,
                message: format!("segment endpoint {id} is not a vertex id"),
            }
            .into()
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TrigonError;

    const SQUARE_WITH_HOLE: &str = "\
# square with a square hole
8 2 0 1
1 0 0 1
2 10 0 1
3 10 10 1
4 0 10 1
5 4 4 0
6 6 4 0
7 6 6 0
8 4 6 0
8 1
1 1 2 1
2 2 3 1
3 3 4 1
4 4 1 1
5 5 6 0
6 6 7 0
7 7 8 0
8 8 5 0
1
1 5 5
";

    #[test]
    fn one_based_file() {
        let poly = parse_poly(SQUARE_WITH_HOLE).unwrap();
        assert_eq!(poly.points.len(), 8);
        assert_eq!(poly.points[2], Point2::new(10.0, 10.0));
        assert_eq!(poly.segments[0], Segment::new(0, 1));
        assert_eq!(poly.segments[7], Segment::new(7, 4));
        assert_eq!(poly.holes, vec![Point2::new(5.0, 5.0)]);
        assert!(poly.validate().is_ok());
    }

    #[test]
    fn zero_based_without_holes_section() {
        let src = "3 2 0 0\n0 0 0\n1 1 0  # comment\n\n2 0 1\n3 0\n0 0 1\n1 1 2\n2 2 0\n";
        let poly = parse_poly(src).unwrap();
        assert_eq!(poly.points.len(), 3);
        assert_eq!(poly.segments[2], Segment::new(2, 0));
        assert!(poly.holes.is_empty());
    }

    #[test]
    fn bad_endpoint_is_malformed() {
        let src = "3 2 0 0\n0 0 0\n1 1 0\n2 0 1\n1 0\n0 0 3\n";
        let err = parse_poly(src).unwrap_err();
        assert!(matches!(
            err,
            TrigonError::PolyFile(PolyFileError::Malformed { line: 6, .. })
        ));
    }

    #[test]
    fn bad_number_is_malformed() {
        let err = parse_poly("3 2 0 0\n0 0 zero\n").unwrap_err();
        assert!(matches!(
            err,
            TrigonError::PolyFile(PolyFileError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn truncated_file() {
        let err = parse_poly("4 2 0 0\n0 0 0\n1 1 0\n").unwrap_err();
        assert!(matches!(
            err,
            TrigonError::PolyFile(PolyFileError::UnexpectedEof { expected: "vertices" })
        ));
    }

    #[test]
    fn node_file_reference_is_rejected() {
        assert!(parse_poly("0 2 0 0\n0 0\n0\n").is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_poly("/nonexistent/trigon/missing.poly").unwrap_err();
        assert!(matches!(err, TrigonError::PolyFile(PolyFileError::Io(_))));
    }

    #[test]
    fn demo_data_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/data/plate.poly");
        let poly = read_poly(path).unwrap();
        assert!(poly.validate().is_ok());
        assert_eq!(poly.holes.len(), 1);
    }
}
