//! Synthetic sensor frames of people seen from behind.
//!
//! Renders body-index and depth rasters plus skeletons for replay through the
//! back tracker without a sensor attached. Rendering is deterministic for a
//! given scene and frame index, speckle noise included.

use crate::app::FrameSource;
use crate::constants::{BODY_COUNT, DEPTH_HEIGHT, DEPTH_WIDTH, MILLIMETERS_PER_METER};
use crate::frame::SensorFrame;
use crate::geometry::Point3D;
use crate::mapper::PinholeMapper;
use crate::skeleton::Body;
use crate::utils::safe_cast::{f64_to_u16_clamp, usize_to_f64};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Body-index value of pixels that belong to no player
pub const NO_PLAYER: u8 = 255;

/// Depth of the wall behind the players (meters)
const BACKGROUND_DEPTH: f64 = 4.0;

// Torso geometry relative to the camera (meters, y up)
const SHOULDER_HALF_WIDTH: f64 = 0.2;
const TORSO_HALF_WIDTH: f64 = 0.22;
const NECK_HALF_WIDTH: f64 = 0.09;
const SHOULDER_Y: f64 = 0.25;
const SPINE_SHOULDER_Y: f64 = 0.2;
const SPINE_BASE_Y: f64 = -0.35;
const HEAD_Y: f64 = 0.5;
const TORSO_BOTTOM_Y: f64 = -0.45;
const TORSO_TOP_Y: f64 = 0.3;
const HEAD_TOP_Y: f64 = 0.62;

/// Lateral distance between neighbouring players
const BODY_SPACING: f64 = 0.9;
const SWAY_AMPLITUDE: f64 = 0.03;

/// Probability of a speckle outlier per player pixel
const SPECKLE_PROBABILITY: f64 = 0.02;

/// Synthetic scene description
#[derive(Debug, Clone)]
pub struct SyntheticScene {
    width: usize,
    height: usize,
    mapper: PinholeMapper,
    distance: f64,
    back_curvature: f64,
    shoulder_bulge: f64,
    tracked_bodies: usize,
    noise: bool,
    seed: u64,
}

impl Default for SyntheticScene {
    fn default() -> Self {
        Self {
            width: DEPTH_WIDTH,
            height: DEPTH_HEIGHT,
            mapper: PinholeMapper::default(),
            distance: 2.0,
            back_curvature: 0.04,
            shoulder_bulge: 0.06,
            tracked_bodies: 1,
            noise: false,
            seed: 0x5EED,
        }
    }
}

impl SyntheticScene {
    /// Scene rendered with the given raster size and mapper
    #[must_use]
    pub fn new(width: usize, height: usize, mapper: PinholeMapper) -> Self {
        Self {
            width,
            height,
            mapper,
            ..Self::default()
        }
    }

    /// Distance from the sensor to the spine (meters)
    #[must_use]
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Depth of the spine curve between hip and shoulders (meters)
    #[must_use]
    pub fn with_back_curvature(mut self, back_curvature: f64) -> Self {
        self.back_curvature = back_curvature;
        self
    }

    /// Number of tracked players, clamped to the body slot count
    #[must_use]
    pub fn with_tracked_bodies(mut self, tracked_bodies: usize) -> Self {
        self.tracked_bodies = tracked_bodies.min(usize::from(BODY_COUNT));
        self
    }

    /// Enable speckle noise seeded with `seed`
    #[must_use]
    pub fn with_noise(mut self, seed: u64) -> Self {
        self.noise = true;
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn mapper(&self) -> &PinholeMapper {
        &self.mapper
    }

    /// Lateral position of player `slot` in frame `index`
    fn body_center(&self, slot: usize, index: u64) -> f64 {
        let phase = usize_to_f64(usize::try_from(index % 3600).unwrap_or(0)) * 0.2;
        usize_to_f64(slot) * BODY_SPACING + SWAY_AMPLITUDE * phase.sin()
    }

    /// Joint positions of player `slot` in frame `index` (shoulder left, shoulder right, spine base, spine shoulder, head)
    #[must_use]
    pub fn joint_positions(&self, slot: usize, index: u64) -> [Point3D; 5] {
        let x = self.body_center(slot, index);
        let z = self.distance;
        [
            Point3D::new(x - SHOULDER_HALF_WIDTH, SHOULDER_Y, z),
            Point3D::new(x + SHOULDER_HALF_WIDTH, SHOULDER_Y, z),
            Point3D::new(x, SPINE_BASE_Y, z),
            Point3D::new(x, SPINE_SHOULDER_Y, z),
            Point3D::new(x, HEAD_Y, z),
        ]
    }

    /// Back surface depth of a player at lateral offset `dx` and height `y`, or `None` off the body
    fn surface_depth(&self, dx: f64, y: f64) -> Option<f64> {
        let half_width = if (TORSO_BOTTOM_Y..=TORSO_TOP_Y).contains(&y) {
            TORSO_HALF_WIDTH
        } else if y > TORSO_TOP_Y && y <= HEAD_TOP_Y {
            NECK_HALF_WIDTH
        } else {
            return None;
        };
        if dx.abs() > half_width {
            return None;
        }

        let along_spine = ((y - TORSO_BOTTOM_Y) / (HEAD_TOP_Y - TORSO_BOTTOM_Y)).clamp(0.0, 1.0);
        let spine = self.distance - self.back_curvature * (PI * along_spine).sin();
        let across = dx / half_width;
        Some(spine - self.shoulder_bulge * (1.0 - across * across))
    }

    /// Render frame `index`
    #[must_use]
    pub fn render(&self, index: u64) -> SensorFrame {
        let pixels = self.width * self.height;
        let mut body_index = vec![NO_PLAYER; pixels];
        let background = f64_to_u16_clamp(BACKGROUND_DEPTH * MILLIMETERS_PER_METER);
        let mut depth = vec![background; pixels];
        let mut rng = StdRng::seed_from_u64(self.seed ^ index);

        let centers: Vec<f64> = (0..self.tracked_bodies)
            .map(|slot| self.body_center(slot, index))
            .collect();

        for row in 0..self.height {
            for column in 0..self.width {
                // Ray through the pixel at the player distance
                let x = (usize_to_f64(column) - self.mapper.cx) * self.distance / self.mapper.fx;
                let y = (self.mapper.cy - usize_to_f64(row)) * self.distance / self.mapper.fy;

                let hit = centers
                    .iter()
                    .enumerate()
                    .find_map(|(slot, center)| self.surface_depth(x - center, y).map(|z| (slot, z)));
                let Some((slot, mut z)) = hit else {
                    continue;
                };

                if self.noise && rng.gen_bool(SPECKLE_PROBABILITY) {
                    z -= rng.gen_range(0.08..0.4);
                }

                let offset = row * self.width + column;
                body_index[offset] = u8::try_from(slot).unwrap_or(NO_PLAYER);
                depth[offset] = f64_to_u16_clamp(z * MILLIMETERS_PER_METER);
            }
        }

        let mut bodies = vec![Body::default(); usize::from(BODY_COUNT)];
        for (slot, body) in bodies.iter_mut().enumerate().take(self.tracked_bodies) {
            *body = Body::from_positions(self.joint_positions(slot, index));
        }

        SensorFrame {
            index,
            width: self.width,
            height: self.height,
            bodies,
            body_index,
            depth,
        }
    }

    /// Replay of `frames` consecutive frames of this scene
    #[must_use]
    pub fn replay(self, frames: u64) -> SyntheticReplay {
        SyntheticReplay {
            scene: self,
            next: 0,
            frames,
        }
    }
}

/// Finite frame source over a synthetic scene
#[derive(Debug, Clone)]
pub struct SyntheticReplay {
    scene: SyntheticScene,
    next: u64,
    frames: u64,
}

impl FrameSource for SyntheticReplay {
    fn next_frame(&mut self) -> Option<SensorFrame> {
        if self.next >= self.frames {
            return None;
        }
        let frame = self.scene.render(self.next);
        self.next += 1;
        Some(frame)
    }
}
