//! Planar and camera-space geometry primitives.

/// Infinite 2D lines with side-of-line queries
pub mod line;

pub use line::{Line, Side};

/// Point in raster (pixel) space, or a `(depth, height)` pair on the curve
pub type Point2D = nalgebra::Point2<f64>;

/// Point in camera space, meters (x lateral, y height, z depth)
pub type Point3D = nalgebra::Point3<f64>;

/// Whether two points coincide within `eps` on both axes
#[must_use]
pub fn approx_eq(a: &Point2D, b: &Point2D, eps: f64) -> bool {
    (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps
}

/// Whether both coordinates are finite
#[must_use]
pub fn is_finite(p: &Point2D) -> bool {
    p.x.is_finite() && p.y.is_finite()
}
