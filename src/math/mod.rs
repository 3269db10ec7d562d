pub mod polygon_2d;

/// 2D point type. Every vertex handled by the crate is one of these.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type, used only when lifting planar results (z = 0).
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Lifts a planar point into 3D with `z = 0`.
#[must_use]
pub fn lift(p: &Point2) -> Point3 {
    Point3::new(p.x, p.y, 0.0)
}
