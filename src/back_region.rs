//! Per-frame "is this pixel on the person's back" region test.
//!
//! The region is bounded by four lines built from five landmarks projected
//! into the depth raster:
//! - two lines parallel to the spine through the shoulders,
//! - a hip line perpendicular to the spine, slightly above the spine base,
//! - a neck line perpendicular to the spine through the head.
//!
//! Perpendicular lines have no inherent inside, so the side the spine
//! shoulder falls on is cached for each of them at construction time.

use crate::constants::DEFAULT_HIP_OFFSET_FRACTION;
use crate::geometry::{is_finite, Line, Point2D, Side};
use crate::mapper::CoordinateMapper;
use crate::skeleton::{Body, JointType};
use crate::{Error, Result};

/// The five back landmarks in raster space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackLandmarks {
    pub shoulder_left: Point2D,
    pub shoulder_right: Point2D,
    pub spine_base: Point2D,
    pub spine_shoulder: Point2D,
    pub head: Point2D,
}

impl BackLandmarks {
    /// Project the body's back joints into the depth raster with a single batch mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the mapper does not return one point per joint.
    pub fn project<M: CoordinateMapper + ?Sized>(body: &Body, mapper: &M) -> Result<Self> {
        let projected = mapper.map_camera_points_to_depth_space(&body.positions());
        match projected.as_slice() {
            &[shoulder_left, shoulder_right, spine_base, spine_shoulder, head] => Ok(Self {
                shoulder_left,
                shoulder_right,
                spine_base,
                spine_shoulder,
                head,
            }),
            other => Err(Error::InvalidInput(format!(
                "Mapper returned {} points for {} joints",
                other.len(),
                JointType::COUNT
            ))),
        }
    }

    fn all(&self) -> [Point2D; JointType::COUNT] {
        [
            self.shoulder_left,
            self.shoulder_right,
            self.spine_base,
            self.spine_shoulder,
            self.head,
        ]
    }
}

/// Four-line back region of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackRegion {
    left_shoulder_line: Line,
    right_shoulder_line: Line,
    hip_line: Line,
    neck_line: Line,
    spine_hip_side: Side,
    spine_neck_side: Side,
}

impl BackRegion {
    /// Build the region with the default hip offset.
    ///
    /// # Errors
    ///
    /// See [`BackRegion::with_hip_offset`].
    pub fn new(landmarks: &BackLandmarks) -> Result<Self> {
        Self::with_hip_offset(landmarks, DEFAULT_HIP_OFFSET_FRACTION)
    }

    /// Build the region, moving the hip boundary from the spine base towards the
    /// spine shoulder by `hip_offset_fraction` of their vertical separation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateInput`] if a landmark is not finite or the
    /// spine base and spine shoulder coincide.
    pub fn with_hip_offset(landmarks: &BackLandmarks, hip_offset_fraction: f64) -> Result<Self> {
        if let Some(bad) = landmarks.all().iter().find(|p| !is_finite(p)) {
            return Err(Error::DegenerateInput(format!(
                "Landmark outside the depth raster: ({}, {})",
                bad.x, bad.y
            )));
        }

        let base = landmarks.spine_base;
        let shoulder = landmarks.spine_shoulder;
        let spine_line = Line::new(base, shoulder)?;

        let hip_anchor = Point2D::new(base.x, base.y + hip_offset_fraction * (shoulder.y - base.y));
        let hip_line = spine_line.perpendicular_through(hip_anchor);
        let neck_line = spine_line.perpendicular_through(landmarks.head);

        Ok(Self {
            left_shoulder_line: spine_line.parallel_through(landmarks.shoulder_left),
            right_shoulder_line: spine_line.parallel_through(landmarks.shoulder_right),
            spine_hip_side: hip_line.side_of(&shoulder),
            spine_neck_side: neck_line.side_of(&shoulder),
            hip_line,
            neck_line,
        })
    }

    /// Whether `p` lies inside the region; points on a boundary line are inside.
    #[must_use]
    pub fn contains(&self, p: &Point2D) -> bool {
        let inside = |side: Side, wanted: Side| side == wanted || side == Side::OnLine;

        inside(self.left_shoulder_line.side_of(p), Side::Right)
            && inside(self.right_shoulder_line.side_of(p), Side::Left)
            && inside(self.hip_line.side_of(p), self.spine_hip_side)
            && inside(self.neck_line.side_of(p), self.spine_neck_side)
    }

    #[must_use]
    pub fn left_shoulder_line(&self) -> &Line {
        &self.left_shoulder_line
    }

    #[must_use]
    pub fn right_shoulder_line(&self) -> &Line {
        &self.right_shoulder_line
    }

    #[must_use]
    pub fn hip_line(&self) -> &Line {
        &self.hip_line
    }

    #[must_use]
    pub fn neck_line(&self) -> &Line {
        &self.neck_line
    }

    /// Side of the hip line that counts as inside
    #[must_use]
    pub fn spine_hip_side(&self) -> Side {
        self.spine_hip_side
    }

    /// Side of the neck line that counts as inside
    #[must_use]
    pub fn spine_neck_side(&self) -> Side {
        self.spine_neck_side
    }
}
