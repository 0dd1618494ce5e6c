//! Fitting a back curve into a raster viewport.
//!
//! Depth runs along the horizontal axis and height along the vertical axis,
//! both with the same scale so the plotted curve keeps its shape.

use crate::classifier::BackCurve;
use crate::utils::safe_cast::{f64_to_usize_clamp, usize_to_f64};
use crate::utils::{lower_bound, upper_bound};
use crate::{Error, Result};
use serde::Serialize;

/// Back curve fitted into a `width` x `height` raster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurvePlot {
    pub width: usize,
    pub height: usize,
    /// Rounded depth range `(min, max)` in meters
    pub depth_range: (f64, f64),
    /// Rounded height range `(min, max)` in meters
    pub height_range: (f64, f64),
    /// Pixels per meter on both axes
    pub scale: f64,
    /// One `(column, row)` pixel per curve point, in curve order
    pub pixels: Vec<(usize, usize)>,
}

impl CurvePlot {
    /// Fit `curve` into the viewport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty viewport or a curve
    /// without finite points
    pub fn fit(curve: &BackCurve, width: usize, height: usize, round_factor: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!("Empty plot viewport {width}x{height}")));
        }

        let finite = || {
            curve
                .iter()
                .map(|p| p.point)
                .filter(|p| p.x.is_finite() && p.y.is_finite())
        };
        let (mut min_z, mut max_z) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_h, mut max_h) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in finite() {
            min_z = min_z.min(p.x);
            max_z = max_z.max(p.x);
            min_h = min_h.min(p.y);
            max_h = max_h.max(p.y);
        }
        if min_z > max_z {
            return Err(Error::InvalidInput("Curve has no finite points to plot".to_string()));
        }

        let depth_range = (lower_bound(min_z, round_factor), upper_bound(max_z, round_factor));
        let height_range = (lower_bound(min_h, round_factor), upper_bound(max_h, round_factor));
        let width_f = usize_to_f64(width);
        let height_f = usize_to_f64(height);

        let scale = [
            axis_scale(height_f, height_range),
            axis_scale(width_f, depth_range),
        ]
        .into_iter()
        .flatten()
        .reduce(f64::min)
        .unwrap_or(1.0);

        let pixels = finite()
            .map(|p| {
                let column = scale * (p.x - depth_range.0);
                let row = height_f - 1.0 - scale * (p.y - height_range.0);
                (
                    f64_to_usize_clamp(column, width - 1),
                    f64_to_usize_clamp(row, height - 1),
                )
            })
            .collect();

        Ok(Self {
            width,
            height,
            depth_range,
            height_range,
            scale,
            pixels,
        })
    }

    /// Text rendering, one character per pixel (`#` on the curve, `.` elsewhere)
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut grid = vec![vec!['.'; self.width]; self.height];
        for &(column, row) in &self.pixels {
            grid[row][column] = '#';
        }
        grid.into_iter()
            .map(|line| line.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Pixels per meter fitting `range` into `extent`, `None` for a collapsed range
fn axis_scale(extent: f64, range: (f64, f64)) -> Option<f64> {
    let span = range.1 - range.0;
    (span > 0.0).then(|| extent / span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::CurvePoint;
    use crate::geometry::Point2D;

    fn curve(points: &[(f64, f64)]) -> BackCurve {
        BackCurve {
            points: points
                .iter()
                .enumerate()
                .map(|(row, &(z, y))| CurvePoint {
                    row,
                    point: Point2D::new(z, y),
                })
                .collect(),
            skipped_rows: Vec::new(),
        }
    }

    #[test]
    fn test_uniform_scale() {
        // Depth 1.9..2.0 rounds to 1.3..2.3, height 0.5..1.45 rounds to 0.3..2.0
        let plot = CurvePlot::fit(&curve(&[(1.95, 1.45), (1.9, 1.0), (2.0, 0.5)]), 100, 85, 0.3).unwrap();
        assert!((plot.depth_range.0 - 1.3).abs() < 1e-12);
        assert!((plot.depth_range.1 - 2.3).abs() < 1e-12);
        assert!((plot.height_range.0 - 0.3).abs() < 1e-12);
        assert!((plot.height_range.1 - 2.0).abs() < 1e-12);
        // min(85 / 1.7, 100 / 1.0)
        assert!((plot.scale - 50.0).abs() < 1e-9);
        assert_eq!(plot.pixels.len(), 3);
        assert_eq!(plot.pixels[0], (32, 26));
    }

    #[test]
    fn test_pixels_stay_inside_viewport() {
        let plot = CurvePlot::fit(&curve(&[(0.1, -0.4), (3.9, 2.7), (1.0, 1.0)]), 16, 9, 0.3).unwrap();
        for &(column, row) in &plot.pixels {
            assert!(column < 16);
            assert!(row < 9);
        }
    }

    #[test]
    fn test_single_point() {
        let plot = CurvePlot::fit(&curve(&[(1.3, 1.3)]), 10, 10, 0.3).unwrap();
        assert_eq!(plot.scale, 1.0);
        assert_eq!(plot.pixels, vec![(0, 9)]);
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(CurvePlot::fit(&BackCurve::default(), 10, 10, 0.3).is_err());
        assert!(CurvePlot::fit(&curve(&[(1.0, 1.0)]), 0, 10, 0.3).is_err());
        let undefined = curve(&[(f64::NEG_INFINITY, f64::NEG_INFINITY)]);
        assert!(CurvePlot::fit(&undefined, 10, 10, 0.3).is_err());
    }

    #[test]
    fn test_ascii() {
        let plot = CurvePlot::fit(&curve(&[(1.3, 1.3)]), 3, 2, 0.3).unwrap();
        assert_eq!(plot.to_ascii(), "...\n#..");
    }
}
