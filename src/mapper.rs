//! Coordinate mapping between camera space and the depth raster.
//!
//! The sensor SDK normally provides this mapping; the classifier only depends
//! on the [`CoordinateMapper`] trait. [`PinholeMapper`] is a plain pinhole
//! model of the depth camera, used for replaying synthetic frames.

use crate::config::SensorConfig;
use crate::constants::{DEPTH_CX, DEPTH_CY, DEPTH_FX, DEPTH_FY, MILLIMETERS_PER_METER};
use crate::geometry::{Point2D, Point3D};

/// Mapping operations the classifier needs from the sensor
pub trait CoordinateMapper {
    /// Project camera space points into the depth raster, one output per input
    fn map_camera_points_to_depth_space(&self, points: &[Point3D]) -> Vec<Point2D>;

    /// Unproject a depth raster pixel with its depth (millimetres) into camera space
    fn map_depth_point_to_camera_space(&self, pixel: Point2D, depth: u16) -> Point3D;
}

/// Pinhole model of the depth camera (x right, y up, z away from the sensor)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinholeMapper {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl PinholeMapper {
    #[must_use]
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self { fx, fy, cx, cy }
    }

    #[must_use]
    pub fn from_config(sensor: &SensorConfig) -> Self {
        Self::new(sensor.fx, sensor.fy, sensor.cx, sensor.cy)
    }

    /// Project a single camera space point; points at or behind the sensor map to -inf
    #[must_use]
    pub fn project(&self, point: &Point3D) -> Point2D {
        if point.z <= 0.0 {
            return Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        }
        Point2D::new(
            self.cx + self.fx * point.x / point.z,
            self.cy - self.fy * point.y / point.z,
        )
    }
}

impl Default for PinholeMapper {
    fn default() -> Self {
        Self::new(DEPTH_FX, DEPTH_FY, DEPTH_CX, DEPTH_CY)
    }
}

impl CoordinateMapper for PinholeMapper {
    fn map_camera_points_to_depth_space(&self, points: &[Point3D]) -> Vec<Point2D> {
        points.iter().map(|point| self.project(point)).collect()
    }

    fn map_depth_point_to_camera_space(&self, pixel: Point2D, depth: u16) -> Point3D {
        if depth == 0 {
            // No depth reading: undefined, reported the way the sensor does
            return Point3D::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        }
        let z = f64::from(depth) / MILLIMETERS_PER_METER;
        Point3D::new(
            (pixel.x - self.cx) * z / self.fx,
            (self.cy - pixel.y) * z / self.fy,
            z,
        )
    }
}
