use std::fmt;

use super::{TriangulationMode, TriangulationParams};

/// Orthogonal switches handed to the solver.
///
/// Renders through [`fmt::Display`] as the equivalent switch string of
/// Shewchuk's Triangle (`zQpYq30a100`, `zQc`, ...), which is what gets
/// logged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolverFlags {
    /// Output indices start at zero (`z`).
    pub zero_based: bool,
    /// No diagnostic output (`Q`).
    pub quiet: bool,
    /// Input is a planar straight-line graph whose segments must be kept
    /// and whose exterior and holes are removed (`p`).
    pub pslg: bool,
    /// Boundary segments may not be split by inserted vertices (`Y`).
    pub no_boundary_steiner: bool,
    /// Minimum angle in degrees (`q`).
    pub min_angle: Option<f64>,
    /// Maximum triangle area (`a`).
    pub max_area: Option<f64>,
    /// Keep the whole convex hull triangulated (`c`).
    pub convex_hull: bool,
    /// Conforming Delaunay: split segments until no segment is encroached
    /// (`D`).
    pub conforming_delaunay: bool,
    /// Produce the dual Voronoi diagram (`v`).
    pub voronoi: bool,
}

impl SolverFlags {
    /// The switches every call carries: zero-based and quiet.
    #[must_use]
    pub fn base() -> Self {
        Self {
            zero_based: true,
            quiet: true,
            ..Self::default()
        }
    }

    /// Derives the switches for a triangulation mode.
    ///
    /// Non-positive or NaN constraints are dropped; the angle constraint is
    /// clamped to `params.angle_limit`.
    #[must_use]
    pub fn for_mode(mode: &TriangulationMode, params: &TriangulationParams) -> Self {
        let base = Self::base();
        match *mode {
            TriangulationMode::Simple => Self {
                pslg: true,
                no_boundary_steiner: true,
                ..base
            },
            TriangulationMode::ConvexHull => Self {
                convex_hull: true,
                ..base
            },
            TriangulationMode::Delaunay { add_vertices } => Self {
                pslg: true,
                conforming_delaunay: true,
                no_boundary_steiner: !add_vertices,
                ..base
            },
            TriangulationMode::ConstrainedDelaunay {
                min_angle,
                max_area,
                add_vertices,
            } => Self {
                pslg: true,
                min_angle: min_angle
                    .filter(|a| *a > 0.0)
                    .map(|a| a.min(params.angle_limit)),
                max_area: max_area.filter(|a| *a > 0.0),
                no_boundary_steiner: !add_vertices,
                ..base
            },
        }
    }

    /// Switches for a Voronoi run over a bare point set.
    #[must_use]
    pub fn for_voronoi(use_delaunay_basis: bool) -> Self {
        Self {
            voronoi: true,
            conforming_delaunay: use_delaunay_basis,
            ..Self::base()
        }
    }

    /// Whether the solver has to insert Steiner points after the constrained
    /// triangulation is built.
    #[must_use]
    pub fn needs_refinement(&self) -> bool {
        self.pslg && (self.min_angle.is_some() || self.max_area.is_some() || self.conforming_delaunay)
    }
}

impl fmt::Display for SolverFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.zero_based {
            f.write_str("z")?;
        }
        if self.quiet {
            f.write_str("Q")?;
        }
        if self.pslg {
            f.write_str("p")?;
        }
        if self.convex_hull {
            f.write_str("c")?;
        }
        if self.voronoi {
            f.write_str("v")?;
        }
        if self.conforming_delaunay {
            f.write_str("D")?;
        }
        if let Some(angle) = self.min_angle {
            write!(f, "q{angle}")?;
        }
        if let Some(area) = self.max_area {
            write!(f, "a{area}")?;
        }
        if self.no_boundary_steiner {
            f.write_str("Y")?;
        }
        Ok(())
    }
}
