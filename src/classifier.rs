//! Per-frame back curve extraction.
//!
//! [`FrameClassifier::extract_back_curve`] is the single entry point per frame:
//! it checks the tracking preconditions, builds the frame's [`BackRegion`],
//! scans the body-index raster row by row and reduces every row's back pixels
//! to one spine point with the configured [`RowFilter`].

use crate::back_region::{BackLandmarks, BackRegion};
use crate::config::{ClassifierConfig, RowPolicy};
use crate::constants::{BODY_COUNT, DEFAULT_HIP_OFFSET_FRACTION};
use crate::filters::{create_filter_with, sort_row, spine_row::SpineRowFilter, RowFilter, SpineDefaults};
use crate::frame::DepthFrame;
use crate::geometry::Point2D;
use crate::mapper::CoordinateMapper;
use crate::skeleton::{select_tracked_body, shoulder_rotation, Body, JointType};
use crate::{Error, Result};
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

/// Spine point of one raster row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Raster row the point was extracted from
    pub row: usize,
    /// `(depth, height)` in meters, tilt corrected if configured
    pub point: Point2D,
}

/// Back curve of one frame, one point per qualifying row in ascending row order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BackCurve {
    pub points: Vec<CurvePoint>,
    /// Rows that had back pixels but no candidate passed the row filter
    pub skipped_rows: Vec<usize>,
}

impl BackCurve {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurvePoint> {
        self.points.iter()
    }
}

/// Back classifier for single frames
pub struct FrameClassifier {
    filter: Box<dyn RowFilter>,
    hip_offset_fraction: f64,
    body_count: u8,
    row_policy: RowPolicy,
}

impl FrameClassifier {
    /// Classifier with the given row filter and default region parameters
    #[must_use]
    pub fn new(filter: Box<dyn RowFilter>) -> Self {
        Self {
            filter,
            hip_offset_fraction: DEFAULT_HIP_OFFSET_FRACTION,
            body_count: BODY_COUNT,
            row_policy: RowPolicy::Skip,
        }
    }

    /// Create a classifier from configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] for invalid classification parameters, or
    /// [`Error::FilterError`] if the configured row filter cannot be created
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let defaults = SpineDefaults {
            neighbor_count: config.neighbor_count,
            threshold: config.density_threshold,
            tilt_degrees: config.adjust_for_sensor_tilt.then_some(config.sensor_tilt_degrees),
        };
        let filter = create_filter_with(&config.row_filter, &defaults)?;
        info!(
            "Frame classifier using {} (row policy {:?})",
            filter.name(),
            config.row_policy
        );

        Ok(Self {
            filter,
            hip_offset_fraction: config.hip_offset_fraction,
            body_count: config.body_count,
            row_policy: config.row_policy,
        })
    }

    #[must_use]
    pub fn with_row_policy(mut self, row_policy: RowPolicy) -> Self {
        self.row_policy = row_policy;
        self
    }

    #[must_use]
    pub fn with_hip_offset(mut self, hip_offset_fraction: f64) -> Self {
        self.hip_offset_fraction = hip_offset_fraction;
        self
    }

    #[must_use]
    pub fn row_policy(&self) -> RowPolicy {
        self.row_policy
    }

    #[must_use]
    pub fn filter_name(&self) -> &str {
        self.filter.name()
    }

    /// Extract the back curve of one frame.
    ///
    /// # Errors
    ///
    /// - [`Error::AmbiguousBody`] if more than one body is tracked
    /// - [`Error::InsufficientTracking`] if no body or not all back joints are tracked
    /// - [`Error::DegenerateInput`] if the projected landmarks cannot span a region
    /// - [`Error::NoRowCandidate`] under [`RowPolicy::Abort`]
    pub fn extract_back_curve<M: CoordinateMapper + ?Sized>(
        &self,
        bodies: &[Body],
        frame: &DepthFrame<'_>,
        mapper: &M,
    ) -> Result<BackCurve> {
        let body = select_tracked_body(bodies)?;
        if !body.is_back_tracked() {
            return Err(Error::InsufficientTracking {
                tracked: body.tracked_joint_count(),
            });
        }

        if let Some(rotation) = shoulder_rotation(
            &body.joint(JointType::ShoulderLeft).position,
            &body.joint(JointType::ShoulderRight).position,
        ) {
            trace!("Shoulder rotation {:.1} deg", rotation.degrees());
        }

        let region = self.back_region(body, mapper)?;
        let curve = self.scan(&region, frame, mapper)?;
        debug!(
            "Back curve: {} points, {} skipped rows",
            curve.len(),
            curve.skipped_rows.len()
        );
        Ok(curve)
    }

    /// Back region of a tracked body.
    ///
    /// # Errors
    ///
    /// Returns an error if the landmarks cannot be projected or are degenerate
    pub fn back_region<M: CoordinateMapper + ?Sized>(&self, body: &Body, mapper: &M) -> Result<BackRegion> {
        let landmarks = BackLandmarks::project(body, mapper)?;
        BackRegion::with_hip_offset(&landmarks, self.hip_offset_fraction)
    }

    /// Single row-major pass over the frame collecting one spine point per row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRowCandidate`] under [`RowPolicy::Abort`]
    pub fn scan<M: CoordinateMapper + ?Sized>(
        &self,
        region: &BackRegion,
        frame: &DepthFrame<'_>,
        mapper: &M,
    ) -> Result<BackCurve> {
        let mut curve = BackCurve::default();
        let mut candidates: Vec<Point2D> = Vec::with_capacity(frame.width());

        for (row, players, depths) in frame.rows() {
            for (column, (&player, &depth)) in players.iter().zip(depths).enumerate() {
                if player >= self.body_count {
                    continue;
                }
                let (x, y) = DepthFrame::pixel_position(column, row);
                let pixel = Point2D::new(x, y);
                if !region.contains(&pixel) {
                    continue;
                }
                let camera = mapper.map_depth_point_to_camera_space(pixel, depth);
                // (depth, height): the row filter measures distances along x
                candidates.push(Point2D::new(camera.z, camera.y));
            }

            if !candidates.is_empty() {
                self.reduce_row(row, &mut candidates, &mut curve)?;
            }
        }

        Ok(curve)
    }

    fn reduce_row(&self, row: usize, candidates: &mut Vec<Point2D>, curve: &mut BackCurve) -> Result<()> {
        sort_row(candidates);
        let selected = self.filter.select(candidates);
        let count = candidates.len();
        candidates.clear();

        match (selected, self.row_policy) {
            (Some(point), _) => curve.points.push(CurvePoint { row, point }),
            (None, RowPolicy::Skip) => {
                trace!("Row {} skipped: none of {} candidates passed the filter", row, count);
                curve.skipped_rows.push(row);
            }
            (None, RowPolicy::Abort) => return Err(Error::NoRowCandidate { row }),
        }
        Ok(())
    }
}

impl Default for FrameClassifier {
    fn default() -> Self {
        Self::new(Box::new(SpineRowFilter::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::NoFilter;
    use crate::geometry::Point3D;
    use crate::skeleton::{Joint, JointType, TrackingState};

    /// Orthographic mapper: one raster unit is 0.1 m laterally and 0.2 m vertically
    struct GridMapper;

    impl CoordinateMapper for GridMapper {
        fn map_camera_points_to_depth_space(&self, points: &[Point3D]) -> Vec<Point2D> {
            points
                .iter()
                .map(|p| Point2D::new(2.0 + p.x * 10.0, (1.8 - p.y) * 5.0))
                .collect()
        }

        fn map_depth_point_to_camera_space(&self, pixel: Point2D, depth: u16) -> Point3D {
            Point3D::new((pixel.x - 2.0) / 10.0, 1.8 - pixel.y / 5.0, f64::from(depth) / 1000.0)
        }
    }

    fn body() -> Body {
        Body::from_positions([
            Point3D::new(-0.2, 1.5, 0.1),
            Point3D::new(0.2, 1.5, 0.1),
            Point3D::new(0.0, 0.9, 0.0),
            Point3D::new(0.0, 1.4, 0.05),
            Point3D::new(0.0, 1.7, 0.05),
        ])
    }

    fn raw_classifier() -> FrameClassifier {
        FrameClassifier::new(Box::new(SpineRowFilter::default().without_tilt_correction()))
    }

    #[test]
    fn test_single_row_curve() {
        let mut body_index = vec![255u8; 16];
        body_index[8..12].fill(0);
        let depth = vec![1500u16; 16];
        let frame = DepthFrame::new(4, 4, &body_index, &depth).unwrap();

        let curve = raw_classifier().extract_back_curve(&[body()], &frame, &GridMapper).unwrap();
        assert_eq!(curve.len(), 1);
        assert_eq!(curve.points[0].row, 2);
        assert!((curve.points[0].point - Point2D::new(1.5, 1.4)).norm() < 1e-12);
        assert!(curve.skipped_rows.is_empty());
    }

    #[test]
    fn test_pixels_outside_region_are_ignored() {
        // Row 0 lies above the neck line
        let body_index = vec![0u8; 4].into_iter().chain(vec![255u8; 12]).collect::<Vec<_>>();
        let depth = vec![1500u16; 16];
        let frame = DepthFrame::new(4, 4, &body_index, &depth).unwrap();

        let curve = raw_classifier().extract_back_curve(&[body()], &frame, &GridMapper).unwrap();
        assert!(curve.is_empty());
    }

    #[test]
    fn test_untracked_joint_gates_frame() {
        let mut tracked = body();
        let spine = tracked.joint(JointType::SpineShoulder).position;
        tracked.set_joint(JointType::SpineShoulder, Joint::new(spine, TrackingState::NotTracked));
        let body_index = vec![0u8; 16];
        let depth = vec![1500u16; 16];
        let frame = DepthFrame::new(4, 4, &body_index, &depth).unwrap();

        let result = raw_classifier().extract_back_curve(&[tracked], &frame, &GridMapper);
        assert!(matches!(result, Err(Error::InsufficientTracking { tracked: 4 })));
    }

    #[test]
    fn test_row_policy() {
        // Undefined depth readings never pass the density filter
        let mut body_index = vec![255u8; 16];
        body_index[4..12].fill(0);
        let mut depth = vec![1500u16; 16];
        depth[4..8].fill(0);
        let frame = DepthFrame::new(4, 4, &body_index, &depth).unwrap();

        struct UndefinedAtZero;
        impl CoordinateMapper for UndefinedAtZero {
            fn map_camera_points_to_depth_space(&self, points: &[Point3D]) -> Vec<Point2D> {
                GridMapper.map_camera_points_to_depth_space(points)
            }
            fn map_depth_point_to_camera_space(&self, pixel: Point2D, depth: u16) -> Point3D {
                if depth == 0 {
                    return Point3D::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
                }
                GridMapper.map_depth_point_to_camera_space(pixel, depth)
            }
        }

        let curve = raw_classifier()
            .extract_back_curve(&[body()], &frame, &UndefinedAtZero)
            .unwrap();
        assert_eq!(curve.len(), 1);
        assert_eq!(curve.points[0].row, 2);
        assert_eq!(curve.skipped_rows, vec![1]);

        let abort = raw_classifier().with_row_policy(RowPolicy::Abort);
        assert!(matches!(
            abort.extract_back_curve(&[body()], &frame, &UndefinedAtZero),
            Err(Error::NoRowCandidate { row: 1 })
        ));
    }

    #[test]
    fn test_no_filter_takes_nearest_candidate() {
        let mut body_index = vec![255u8; 16];
        body_index[8..12].fill(1);
        let depth = vec![2000u16, 1900, 1800, 1700, 2000, 1900, 1800, 1700, 1300, 1200, 1100, 1600, 0, 0, 0, 0];
        let frame = DepthFrame::new(4, 4, &body_index, &depth).unwrap();

        let classifier = FrameClassifier::new(Box::new(NoFilter));
        let curve = classifier.extract_back_curve(&[body()], &frame, &GridMapper).unwrap();
        assert_eq!(curve.len(), 1);
        assert!((curve.points[0].point.x - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_from_config() {
        let config = ClassifierConfig {
            row_filter: "none".to_string(),
            row_policy: RowPolicy::Abort,
            ..ClassifierConfig::default()
        };
        let classifier = FrameClassifier::from_config(&config).unwrap();
        assert_eq!(classifier.filter_name(), "NoFilter");
        assert_eq!(classifier.row_policy(), RowPolicy::Abort);

        let classifier = FrameClassifier::from_config(&ClassifierConfig::default()).unwrap();
        assert_eq!(classifier.filter_name(), "SpineRowFilter");

        let config = ClassifierConfig {
            row_filter: "median".to_string(),
            ..ClassifierConfig::default()
        };
        assert!(FrameClassifier::from_config(&config).is_err());
    }
}
