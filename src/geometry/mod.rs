mod polygon;

pub(crate) use polygon::ensure_finite;
pub use polygon::{Polygon, Segment};
