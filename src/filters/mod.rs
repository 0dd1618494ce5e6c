//! Row filters reducing one raster row of back candidates to a single spine point.
//!
//! Candidates are `(depth, height)` pairs sorted ascending by depth. A filter
//! picks the point that best represents the back surface for that row, or
//! reports that none of them is trustworthy.

/// Local-density spine point filter
pub mod spine_row;

use crate::constants::{DEFAULT_DENSITY_THRESHOLD, DEFAULT_NEIGHBOR_COUNT, DEFAULT_SENSOR_TILT_DEGREES};
use crate::geometry::Point2D;
use crate::{Error, Result};
use spine_row::SpineRowFilter;

/// Trait for all row filters
pub trait RowFilter: Send + Sync {
    /// Pick the spine point of a row sorted ascending by `x`, if any candidate qualifies
    fn select(&self, row: &[Point2D]) -> Option<Point2D>;

    /// Get filter name
    fn name(&self) -> &str;
}

/// Takes the nearest candidate without any noise rejection
pub struct NoFilter;

impl RowFilter for NoFilter {
    fn select(&self, row: &[Point2D]) -> Option<Point2D> {
        row.first().copied()
    }

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Sort a row of candidates ascending by `x` (depth); non-finite values sort deterministically
pub fn sort_row(row: &mut [Point2D]) {
    row.sort_by(|a, b| a.x.total_cmp(&b.x));
}

fn parse_param<T: std::str::FromStr>(filter_type: &str, value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::FilterError(format!("Invalid {what} '{value}' for filter {filter_type}")))
}

/// Parameters for spine filters whose name carries none of its own
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpineDefaults {
    pub neighbor_count: usize,
    pub threshold: f64,
    /// Sensor tilt in degrees, `None` for raw points
    pub tilt_degrees: Option<f64>,
}

impl Default for SpineDefaults {
    fn default() -> Self {
        Self {
            neighbor_count: DEFAULT_NEIGHBOR_COUNT,
            threshold: DEFAULT_DENSITY_THRESHOLD,
            tilt_degrees: Some(DEFAULT_SENSOR_TILT_DEGREES),
        }
    }
}

/// Create a row filter by type name with the built-in spine parameters.
///
/// Accepted forms: `none`, `spine`, `spine:<neighbor_count>:<threshold>`.
///
/// # Errors
///
/// Returns [`Error::FilterError`] for unknown names or invalid parameters.
pub fn create_filter(filter_type: &str) -> Result<Box<dyn RowFilter>> {
    create_filter_with(filter_type, &SpineDefaults::default())
}

/// Create a row filter by type name (case insensitive).
///
/// A bare `spine` takes its neighbor count and threshold from `defaults`;
/// `spine:<k>:<threshold>` overrides both. The tilt setting of `defaults`
/// applies to every spine filter.
///
/// # Errors
///
/// Returns [`Error::FilterError`] for unknown names or invalid parameters.
pub fn create_filter_with(filter_type: &str, defaults: &SpineDefaults) -> Result<Box<dyn RowFilter>> {
    let lower = filter_type.trim().to_lowercase();
    let mut parts = lower.split(':');
    let name = parts.next().unwrap_or_default();
    let params: Vec<&str> = parts.collect();

    let (neighbor_count, threshold) = match (name, params.as_slice()) {
        ("none" | "nofilter", []) => return Ok(Box::new(NoFilter)),
        ("spine" | "density", []) => (defaults.neighbor_count, defaults.threshold),
        ("spine" | "density", [neighbors, threshold]) => (
            parse_param(filter_type, neighbors, "neighbor count")?,
            parse_param(filter_type, threshold, "threshold")?,
        ),
        _ => return Err(Error::FilterError(format!("Unknown filter type: {filter_type}"))),
    };

    let filter = SpineRowFilter::try_new(neighbor_count, threshold)?;
    Ok(Box::new(match defaults.tilt_degrees {
        Some(tilt_degrees) => filter.with_tilt_correction(tilt_degrees),
        None => filter.without_tilt_correction(),
    }))
}
