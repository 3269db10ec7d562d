//! Reading planar straight-line graphs from `.poly` files.

mod poly_file;

pub use poly_file::{parse_poly, read_poly};
