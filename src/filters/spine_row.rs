use super::RowFilter;
use crate::constants::{DEFAULT_DENSITY_THRESHOLD, DEFAULT_NEIGHBOR_COUNT, DEFAULT_SENSOR_TILT_DEGREES};
use crate::geometry::Point2D;
use crate::utils::safe_cast::usize_to_f64;
use crate::{Error, Result};
use nalgebra::Rotation2;

/// Spine point selector based on local candidate density.
///
/// Walking the depth-sorted row, the first candidate whose mean depth distance
/// to the following `neighbor_count / 2` window (itself included) is below the
/// threshold is taken. Points on the back surface have many close neighbours;
/// isolated sensor noise does not.
#[derive(Debug, Clone)]
pub struct SpineRowFilter {
    neighbor_count: usize,
    threshold: f64,
    tilt_correction: Option<Rotation2<f64>>,
}

impl SpineRowFilter {
    /// Create a new spine row filter with the default sensor tilt correction
    ///
    /// # Panics
    ///
    /// Panics if `neighbor_count` is below 2 or `threshold` is not positive
    #[must_use]
    pub fn new(neighbor_count: usize, threshold: f64) -> Self {
        assert!(neighbor_count >= 2, "Neighbor count must be at least 2, got {}", neighbor_count);
        assert!(threshold > 0.0, "Threshold must be positive, got {}", threshold);
        Self {
            neighbor_count,
            threshold,
            tilt_correction: Some(Self::tilt_rotation(DEFAULT_SENSOR_TILT_DEGREES)),
        }
    }

    /// Fallible variant of [`SpineRowFilter::new`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::FilterError`] for the inputs [`SpineRowFilter::new`] panics on.
    pub fn try_new(neighbor_count: usize, threshold: f64) -> Result<Self> {
        if neighbor_count < 2 {
            return Err(Error::FilterError(format!(
                "Neighbor count must be at least 2, got {neighbor_count}"
            )));
        }
        if !(threshold > 0.0 && threshold.is_finite()) {
            return Err(Error::FilterError(format!("Threshold must be positive, got {threshold}")));
        }
        Ok(Self::new(neighbor_count, threshold))
    }

    /// Rotate accepted points by the given sensor tilt (degrees)
    #[must_use]
    pub fn with_tilt_correction(mut self, tilt_degrees: f64) -> Self {
        self.tilt_correction = Some(Self::tilt_rotation(tilt_degrees));
        self
    }

    /// Return accepted points unrotated
    #[must_use]
    pub fn without_tilt_correction(mut self) -> Self {
        self.tilt_correction = None;
        self
    }

    // (x cos a + y sin a, -x sin a + y cos a) is a rotation by -a
    fn tilt_rotation(tilt_degrees: f64) -> Rotation2<f64> {
        Rotation2::new(-tilt_degrees.to_radians())
    }

    // Mean depth distance between candidate `index` and its forward window; None past the row end
    fn density(&self, row: &[Point2D], index: usize) -> Option<f64> {
        let depth = row.get(index)?.x;
        let end = row.len().min(index + self.neighbor_count / 2);
        let window = row.get(index..end)?;
        Some(window.iter().map(|p| (depth - p.x).abs()).sum::<f64>() / usize_to_f64(window.len()))
    }

    #[must_use]
    pub fn neighbor_count(&self) -> usize {
        self.neighbor_count
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for SpineRowFilter {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBOR_COUNT, DEFAULT_DENSITY_THRESHOLD)
    }
}

impl RowFilter for SpineRowFilter {
    fn select(&self, row: &[Point2D]) -> Option<Point2D> {
        let point = (0..row.len())
            .find(|&i| self.density(row, i).is_some_and(|d| d < self.threshold))
            .and_then(|i| row.get(i).copied())?;
        Some(match &self.tilt_correction {
            Some(rotation) => rotation * point,
            None => point,
        })
    }

    fn name(&self) -> &str {
        "SpineRowFilter"
    }
}
