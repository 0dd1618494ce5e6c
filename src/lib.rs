//! Back curve detection from depth and body-index sensor frames.
//!
//! This library extracts the curve of a person's spine, seen from behind, from
//! the frames of a depth sensor with skeletal tracking:
//! - Five tracked joints span a quadrilateral back region in the depth raster
//! - Every raster row inside the region is reduced to one spine point
//! - A density based row filter rejects sensor speckle
//!
//! The per-frame pipeline consists of:
//! 1. Gating on exactly one tracked body with all back joints tracked
//! 2. Building the back region from the projected joints
//! 3. Scanning the body-index raster row by row, unprojecting back pixels
//! 4. Reducing each row to a `(depth, height)` point with the row filter
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use back_curve_detector::{
//!     classifier::FrameClassifier, config::ClassifierConfig, mapper::PinholeMapper,
//!     synthetic::SyntheticScene,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = FrameClassifier::from_config(&ClassifierConfig::default())?;
//! let mapper = PinholeMapper::default();
//!
//! // Render a frame of one person standing two meters from the sensor
//! let frame = SyntheticScene::default().with_distance(2.0).render(0);
//! let curve = classifier.extract_back_curve(&frame.bodies, &frame.depth_frame()?, &mapper)?;
//!
//! for point in curve.iter() {
//!     println!("row {}: depth {:.3} m, height {:.3} m", point.row, point.point.x, point.point.y);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Row Filters
//!
//! ```no_run
//! use back_curve_detector::filters::{create_filter, sort_row, RowFilter};
//! use back_curve_detector::geometry::Point2D;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let filter = create_filter("spine:12:0.005")?;
//!
//! let mut row: Vec<Point2D> = (0..20i32).map(|i| Point2D::new(1.5 + 0.001 * f64::from(i), 1.2)).collect();
//! row.push(Point2D::new(1.2, 1.2));
//! sort_row(&mut row);
//!
//! // The isolated candidate in front of the back is rejected
//! if let Some(point) = filter.select(&row) {
//!     println!("Spine point at depth {:.3} m", point.x);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Replaying Frames
//!
//! ```no_run
//! use back_curve_detector::{app::BackTrackerApp, config::Config, synthetic::SyntheticScene};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut app = BackTrackerApp::from_config(&config)?;
//! let mut source = SyntheticScene::default().with_noise(42).replay(30);
//!
//! let stats = app.run(&mut source, |index, curve| {
//!     println!("Frame {}: {} spine points", index, curve.len());
//! })?;
//! println!("{} of {} frames produced a curve", stats.curves, stats.frames);
//! # Ok(())
//! # }
//! ```

/// Line primitives and point types of the depth raster
pub mod geometry;

/// Joints, bodies and tracking state of the skeletal stream
pub mod skeleton;

/// Depth and body-index raster buffers
pub mod frame;

/// Camera space to depth raster mapping
pub mod mapper;

/// Back region spanned by the tracked joints
pub mod back_region;

/// Row filters reducing back pixels to spine points
pub mod filters;

/// Per-frame back curve extraction
pub mod classifier;

/// Fitting back curves into a plot viewport
pub mod plot;

/// Synthetic sensor frames for replay and testing
pub mod synthetic;

/// Rounding and casting helpers
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
