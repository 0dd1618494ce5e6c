//! Skeletal tracking data consumed from the sensor's body stream.

use crate::constants::{EPSILON, REQUIRED_JOINT_COUNT};
use crate::geometry::Point3D;
use crate::{Error, Result};

/// Joints used to build the back region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointType {
    ShoulderLeft = 0,
    ShoulderRight = 1,
    SpineBase = 2,
    SpineShoulder = 3,
    Head = 4,
}

impl JointType {
    pub const COUNT: usize = REQUIRED_JOINT_COUNT;

    /// All joints, in the order they are stored and projected
    pub const ALL: [JointType; REQUIRED_JOINT_COUNT] = [
        Self::ShoulderLeft,
        Self::ShoulderRight,
        Self::SpineBase,
        Self::SpineShoulder,
        Self::Head,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Tracking quality reported for a joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    #[default]
    NotTracked,
    /// Position estimated from neighbouring joints; not trusted for back detection
    Inferred,
    Tracked,
}

/// Single joint: camera space position and tracking state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub position: Point3D,
    pub tracking_state: TrackingState,
}

impl Joint {
    #[must_use]
    pub fn new(position: Point3D, tracking_state: TrackingState) -> Self {
        Self {
            position,
            tracking_state,
        }
    }

    /// Joint in `Tracked` state
    #[must_use]
    pub fn tracked(position: Point3D) -> Self {
        Self::new(position, TrackingState::Tracked)
    }

    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.tracking_state == TrackingState::Tracked
    }
}

impl Default for Joint {
    fn default() -> Self {
        Self::new(Point3D::origin(), TrackingState::NotTracked)
    }
}

/// One body slot of the skeletal stream
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    is_tracked: bool,
    joints: [Joint; JointType::COUNT],
}

impl Body {
    #[must_use]
    pub fn new(is_tracked: bool, joints: [Joint; JointType::COUNT]) -> Self {
        Self { is_tracked, joints }
    }

    /// Tracked body with every joint tracked at the given positions (in [`JointType::ALL`] order)
    #[must_use]
    pub fn from_positions(positions: [Point3D; JointType::COUNT]) -> Self {
        Self::new(true, positions.map(Joint::tracked))
    }

    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.is_tracked
    }

    #[must_use]
    pub fn joint(&self, joint_type: JointType) -> &Joint {
        &self.joints[joint_type.index()]
    }

    pub fn set_joint(&mut self, joint_type: JointType, joint: Joint) {
        self.joints[joint_type.index()] = joint;
    }

    /// Number of back joints in `Tracked` state
    #[must_use]
    pub fn tracked_joint_count(&self) -> usize {
        self.joints.iter().filter(|joint| joint.is_tracked()).count()
    }

    /// Whether all five back joints are tracked
    #[must_use]
    pub fn is_back_tracked(&self) -> bool {
        self.tracked_joint_count() == JointType::COUNT
    }

    /// Joint positions in [`JointType::ALL`] order
    #[must_use]
    pub fn positions(&self) -> [Point3D; JointType::COUNT] {
        self.joints.map(|joint| joint.position)
    }
}

/// The single tracked body of a frame.
///
/// # Errors
///
/// - [`Error::InsufficientTracking`] if no body is tracked
/// - [`Error::AmbiguousBody`] if more than one body is tracked
pub fn select_tracked_body(bodies: &[Body]) -> Result<&Body> {
    let mut tracked = bodies.iter().filter(|body| body.is_tracked());
    let Some(body) = tracked.next() else {
        return Err(Error::InsufficientTracking { tracked: 0 });
    };
    let others = tracked.count();
    if others > 0 {
        return Err(Error::AmbiguousBody { count: others + 1 });
    }
    Ok(body)
}

/// Rotation of the shoulder line about the vertical axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShoulderRotation {
    /// `-dz / dx` of the left-to-right shoulder vector
    pub tan: f64,
    /// `dx / |(dx, dz)|`
    pub cos: f64,
}

impl ShoulderRotation {
    /// Signed rotation angle in degrees
    #[must_use]
    pub fn degrees(&self) -> f64 {
        self.tan.atan().to_degrees()
    }
}

/// How far the body is turned away from facing the sensor squarely.
///
/// Returns `None` when the shoulders are aligned with the depth axis.
#[must_use]
pub fn shoulder_rotation(left: &Point3D, right: &Point3D) -> Option<ShoulderRotation> {
    let dz = right.z - left.z;
    let dx = right.x - left.x;
    if dx.abs() < EPSILON {
        return None;
    }
    Some(ShoulderRotation {
        tan: -dz / dx,
        cos: dx / dx.hypot(dz),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn back_body() -> Body {
        Body::from_positions([
            Point3D::new(-0.2, 1.5, 0.1),
            Point3D::new(0.2, 1.5, 0.1),
            Point3D::new(0.0, 0.9, 0.0),
            Point3D::new(0.0, 1.4, 0.05),
            Point3D::new(0.0, 1.7, 0.05),
        ])
    }

    #[test]
    fn test_back_tracked() {
        let mut body = back_body();
        assert!(body.is_back_tracked());
        assert_eq!(body.joint(JointType::SpineBase).position, Point3D::new(0.0, 0.9, 0.0));

        let head = body.joint(JointType::Head).position;
        body.set_joint(JointType::Head, Joint::new(head, TrackingState::Inferred));
        assert!(!body.is_back_tracked());
        assert_eq!(body.tracked_joint_count(), 4);
    }

    #[test]
    fn test_select_tracked_body() {
        let bodies = vec![Body::default(), back_body(), Body::default()];
        assert_eq!(select_tracked_body(&bodies).unwrap(), &bodies[1]);

        assert!(matches!(
            select_tracked_body(&[Body::default()]),
            Err(Error::InsufficientTracking { tracked: 0 })
        ));
        assert!(matches!(
            select_tracked_body(&[]),
            Err(Error::InsufficientTracking { tracked: 0 })
        ));
        assert!(matches!(
            select_tracked_body(&[back_body(), Body::default(), back_body(), back_body()]),
            Err(Error::AmbiguousBody { count: 3 })
        ));
    }

    #[test]
    fn test_shoulder_rotation() {
        let square = shoulder_rotation(&Point3D::new(-0.2, 1.5, 2.0), &Point3D::new(0.2, 1.5, 2.0)).unwrap();
        assert_eq!(square.tan, 0.0);
        assert_eq!(square.cos, 1.0);

        let turned = shoulder_rotation(&Point3D::new(-0.2, 1.5, 2.0), &Point3D::new(0.2, 1.5, 2.4)).unwrap();
        assert!((turned.tan + 1.0).abs() < 1e-12);
        assert!((turned.cos - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!((turned.degrees() + 45.0).abs() < 1e-9);

        assert!(shoulder_rotation(&Point3D::new(0.0, 1.5, 2.0), &Point3D::new(0.0, 1.5, 2.4)).is_none());
    }
}
