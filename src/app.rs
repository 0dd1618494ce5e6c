//! Main application logic: per-frame driver of the back tracker

use crate::classifier::{BackCurve, FrameClassifier};
use crate::config::Config;
use crate::frame::SensorFrame;
use crate::mapper::{CoordinateMapper, PinholeMapper};
use crate::{Error, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Source of sensor frames (live sensor, recording or synthetic replay)
pub trait FrameSource {
    /// Next frame, or `None` once the source is exhausted
    fn next_frame(&mut self) -> Option<SensorFrame>;
}

/// Receiver of the user facing tracking status
pub trait StatusSink {
    fn set_status(&mut self, status: &str);
}

/// Status sink writing status changes to the log
#[derive(Debug, Default)]
pub struct LogStatus {
    current: Option<String>,
}

impl LogStatus {
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl StatusSink for LogStatus {
    fn set_status(&mut self, status: &str) {
        if self.current.as_deref() != Some(status) {
            warn!("Status: {}", status);
            self.current = Some(status.to_string());
        }
    }
}

/// Frame counters of a driver run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FrameStats {
    /// Frames handed to the driver
    pub frames: u64,
    /// Frames that produced a back curve
    pub curves: u64,
    /// Frames dropped for tracking or data quality reasons
    pub skipped: u64,
}

/// Back tracker application
pub struct BackTrackerApp<M = PinholeMapper, S = LogStatus> {
    classifier: FrameClassifier,
    mapper: M,
    status: S,
    frame_budget: Duration,
    stats: FrameStats,
}

impl BackTrackerApp {
    /// Application with a pinhole mapper from the sensor section and a logging status sink
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config, PinholeMapper::from_config(&config.sensor), LogStatus::default())
    }
}

impl<M: CoordinateMapper, S: StatusSink> BackTrackerApp<M, S> {
    /// Create a new back tracker application
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the row filter cannot be created
    pub fn new(config: &Config, mapper: M, status: S) -> Result<Self> {
        info!("Initializing back tracker");
        config.validate()?;

        let classifier = FrameClassifier::from_config(&config.classifier)?;
        let frame_budget = Duration::from_secs_f64(1.0 / f64::from(config.sensor.fps));
        info!(
            "Sensor {}x{} at {} fps ({:.1} ms per frame)",
            config.sensor.width,
            config.sensor.height,
            config.sensor.fps,
            frame_budget.as_secs_f64() * 1000.0
        );

        Ok(Self {
            classifier,
            mapper,
            status,
            frame_budget,
            stats: FrameStats::default(),
        })
    }

    /// Process a single frame.
    ///
    /// Frames that cannot yield a curve (tracking preconditions, degenerate
    /// landmarks, malformed buffers, rejected rows under the abort policy)
    /// produce `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Only unexpected geometry failures ([`Error::InvalidAxisQuery`] and
    /// configuration level errors) are returned.
    pub fn process_frame(&mut self, frame: &SensorFrame) -> Result<Option<BackCurve>> {
        let started = Instant::now();
        self.stats.frames += 1;

        let outcome = frame
            .depth_frame()
            .and_then(|view| self.classifier.extract_back_curve(&frame.bodies, &view, &self.mapper));

        let curve = match outcome {
            Ok(curve) => {
                self.stats.curves += 1;
                Some(curve)
            }
            Err(e) if e.is_frame_skip() => {
                if let Some(status) = e.status_text() {
                    self.status.set_status(status);
                }
                debug!("Frame {} skipped: {}", frame.index, e);
                self.stats.skipped += 1;
                None
            }
            Err(e @ (Error::DegenerateInput(_) | Error::NoRowCandidate { .. } | Error::InvalidInput(_))) => {
                warn!("Frame {} dropped: {}", frame.index, e);
                self.stats.skipped += 1;
                None
            }
            Err(e) => return Err(e),
        };

        self.record_timing(frame.index, started.elapsed());
        Ok(curve)
    }

    /// Run the main loop until the source is exhausted
    ///
    /// # Errors
    ///
    /// Propagates the hard failures of [`BackTrackerApp::process_frame`]
    pub fn run<F>(&mut self, source: &mut dyn FrameSource, mut on_curve: F) -> Result<FrameStats>
    where
        F: FnMut(u64, &BackCurve),
    {
        info!("Starting main application loop");

        while let Some(frame) = source.next_frame() {
            if let Some(curve) = self.process_frame(&frame)? {
                on_curve(frame.index, &curve);
            }
        }

        info!(
            "Processed {} frames: {} curves, {} skipped",
            self.stats.frames, self.stats.curves, self.stats.skipped
        );
        Ok(self.stats)
    }

    fn record_timing(&self, index: u64, elapsed: Duration) {
        let seconds = elapsed.as_secs_f64();
        let fps = if seconds > 0.0 { 1.0 / seconds } else { f64::INFINITY };
        debug!("Frame {}: {:.2} ms ({:.1} fps)", index, seconds * 1000.0, fps);

        if elapsed > self.frame_budget {
            warn!(
                "Frame {} took {:.2} ms, over the {:.2} ms budget",
                index,
                seconds * 1000.0,
                self.frame_budget.as_secs_f64() * 1000.0
            );
        }
    }

    #[must_use]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    #[must_use]
    pub fn status(&self) -> &S {
        &self.status
    }

    #[must_use]
    pub fn classifier(&self) -> &FrameClassifier {
        &self.classifier
    }

    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }
}
