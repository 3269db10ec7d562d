use std::collections::BTreeMap;

use crate::error::{Result, SolverError};
use crate::solver::SolverOutput;

use super::{TriMesh, Triangle};

/// Drops every solver point no triangle references and remaps triangle
/// indices onto the retained points.
///
/// Retained points keep the relative order of their solver indices, so the
/// result is deterministic for a given solver output.
///
/// # Errors
///
/// Returns `SolverError::Failed` if a triangle references a point the
/// solver did not output.
pub fn compact(output: &SolverOutput) -> Result<TriMesh> {
    // Solver index -> new index, ordered by solver index.
    let mut remap: BTreeMap<usize, usize> = BTreeMap::new();
    for tri in &output.triangles {
        for &index in tri {
            remap.insert(index, 0);
        }
    }

    let mut points = Vec::with_capacity(remap.len());
    for (new_index, (&old_index, slot)) in remap.iter_mut().enumerate() {
        let point = output.points.get(old_index).ok_or_else(|| {
            SolverError::Failed(format!(
                "triangle references point {old_index}, but only {} points were output",
                output.points.len()
            ))
        })?;
        *slot = new_index;
        points.push(*point);
    }

    let triangles = output
        .triangles
        .iter()
        .map(|tri| {
            let indices = tri.map(|old| remap[&old]);
            Triangle {
                coords: indices.map(|i| points[i]),
                indices,
            }
        })
        .collect();

    tracing::debug!(
        solver_points = output.points.len(),
        kept_points = points.len(),
        triangles = output.triangles.len(),
        "compacted solver output"
    );

    Ok(TriMesh { points, triangles })
}

#[cfg(test)]
#[allow(clippy::cast_precision_loss, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TrigonError;
    use crate::math::Point2;

    fn output(points: usize, triangles: Vec<[usize; 3]>) -> SolverOutput {
        SolverOutput {
            points: (0..points).map(|i| Point2::new(i as f64, 0.0)).collect(),
            triangles,
        }
    }

    #[test]
    fn drops_unreferenced_points() {
        let mesh = compact(&output(6, vec![[1, 3, 5], [5, 3, 4]])).unwrap();
        assert_eq!(mesh.points.len(), 4);
        assert_eq!(
            mesh.points,
            vec![
                Point2::new(1.0, 0.0),
                Point2::new(3.0, 0.0),
                Point2::new(4.0, 0.0),
                Point2::new(5.0, 0.0)
            ]
        );
        assert_eq!(mesh.triangles[0].indices, [0, 1, 3]);
        assert_eq!(mesh.triangles[1].indices, [3, 1, 2]);
    }

    #[test]
    fn coords_match_remapped_indices() {
        let mesh = compact(&output(8, vec![[7, 2, 6], [2, 0, 6]])).unwrap();
        for tri in &mesh.triangles {
            for k in 0..3 {
                assert_eq!(tri.coords[k], mesh.points[tri.indices[k]]);
            }
        }
    }

    #[test]
    fn every_point_is_referenced() {
        let mesh = compact(&output(10, vec![[9, 4, 2], [4, 8, 2], [8, 9, 4]])).unwrap();
        let mut used = vec![false; mesh.points.len()];
        for tri in &mesh.triangles {
            for &i in &tri.indices {
                assert!(i < mesh.points.len());
                used[i] = true;
            }
        }
        assert!(used.iter().all(|u| *u));
    }

    #[test]
    fn empty_output_gives_empty_mesh() {
        let mesh = compact(&output(5, vec![])).unwrap();
        assert!(mesh.is_empty());
        assert!(mesh.points.is_empty());
    }

    #[test]
    fn dangling_index_is_a_solver_failure() {
        let err = compact(&output(3, vec![[0, 1, 7]])).unwrap_err();
        assert!(matches!(err, TrigonError::Solver(SolverError::Failed(_))));
    }
}
