//! Trigon demo: meshes a `.poly` file and prints summary statistics.
//!
//! Usage:
//! ```text
//! cargo run --example poly_demo                          # demos/data/plate.poly
//! cargo run --example poly_demo -- path/to/input.poly
//! cargo run --example poly_demo -- path/to/input.poly 28 0.5
//! ```
//!
//! The optional trailing arguments are the minimum angle in degrees and the
//! maximum triangle area.

use trigon::{SessionState, TriMesh, TriangulationSession, TrigonError};

fn main() -> Result<(), TrigonError> {
    // Default: WARN for everything, INFO for trigon.
    // Override with RUST_LOG env var (e.g. RUST_LOG=trigon=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("poly_demo=info".parse().unwrap_or_default())
        .add_directive("trigon=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/demos/data/plate.poly").into());
    let min_angle = args.next().and_then(|a| a.parse::<f64>().ok()).or(Some(28.0));
    let max_area = args.next().and_then(|a| a.parse::<f64>().ok());

    let polygon = trigon::io::read_poly(&path)?;
    tracing::info!(%path, points = polygon.points.len(), "loaded");

    let mut session = TriangulationSession::new();

    let hull = session.compute_convex_hull(&polygon.points)?;
    println!("convex hull: {} vertices", hull.vertex_count());

    let simple = summary(session.triangulate_simple(&polygon)?);
    println!("simple:      {simple}");

    let quality =
        summary(session.triangulate_constrained_delaunay(&polygon, min_angle, max_area, true)?);
    println!("quality:     {quality}");

    let diagram = session.generate_voronoi_from_mesh()?;
    println!(
        "voronoi:     {} vertices, {} edges ({} unbounded)",
        diagram.points.len(),
        diagram.segments.len(),
        diagram.ray_count()
    );
    debug_assert_eq!(session.state(), SessionState::VoronoiReady);

    Ok(())
}

fn summary(mesh: &TriMesh) -> String {
    format!(
        "{} points, {} triangles, area {:.3}, {} vertices / {} indices for upload",
        mesh.points.len(),
        mesh.triangle_count(),
        mesh.area(),
        mesh.points_3d().len(),
        mesh.index_buffer().len()
    )
}
