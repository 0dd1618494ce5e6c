//! Constants used throughout the library

/// Tolerance for all coordinate comparisons
pub const EPSILON: f64 = 1e-6;

/// Distance between a line's anchor point and its derived second reference point
pub const REFERENCE_POINT_OFFSET: f64 = 10.0;

/// Number of joints a body must have tracked for back detection
pub const REQUIRED_JOINT_COUNT: usize = 5;

/// Maximum number of bodies the sensor tracks; body-index values below this are players
pub const BODY_COUNT: u8 = 6;

/// Fraction of the spine base to spine shoulder separation the hip boundary is moved up by
pub const DEFAULT_HIP_OFFSET_FRACTION: f64 = 0.15;

/// Neighbour count of the row filter (half of it is used as the forward window)
pub const DEFAULT_NEIGHBOR_COUNT: usize = 12;

/// Mean depth distance (meters) below which a row candidate counts as dense
pub const DEFAULT_DENSITY_THRESHOLD: f64 = 0.005;

/// Known tilt of the sensor mount, in degrees
pub const DEFAULT_SENSOR_TILT_DEGREES: f64 = -14.0;

/// Depth sensor raster size
pub const DEPTH_WIDTH: usize = 512;
pub const DEPTH_HEIGHT: usize = 424;

/// Depth camera intrinsics (pixels) for the 512x424 raster
pub const DEPTH_FX: f64 = 365.456;
pub const DEPTH_FY: f64 = 365.456;
pub const DEPTH_CX: f64 = 254.878;
pub const DEPTH_CY: f64 = 205.395;

/// Depth values are reported in millimetres
pub const MILLIMETERS_PER_METER: f64 = 1000.0;

/// Default frames per second of the sensor stream
pub const DEFAULT_FPS: u32 = 30;

/// Rounding step applied to the plotted curve bounds
pub const DEFAULT_PLOT_ROUND_FACTOR: f64 = 0.3;

/// Tolerance of the bound rounding helpers
pub const ROUNDING_EPSILON: f64 = 1e-5;
