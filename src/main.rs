//! Back curve detector: replays synthetic sensor frames through the back tracker.

use anyhow::{Context, Result};
use back_curve_detector::app::BackTrackerApp;
use back_curve_detector::classifier::BackCurve;
use back_curve_detector::config::Config;
use back_curve_detector::mapper::PinholeMapper;
use back_curve_detector::plot::CurvePlot;
use back_curve_detector::synthetic::SyntheticScene;
use clap::Parser;
use log::{info, warn};
use serde::Serialize;

/// Size of the text plot printed with `--plot`
const ASCII_COLUMNS: usize = 64;
const ASCII_ROWS: usize = 24;

/// Speckle noise seed of the replay
const NOISE_SEED: u64 = 42;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Number of frames to replay
    #[arg(short = 'n', long, default_value = "30")]
    frames: u64,

    /// Distance of the person from the sensor in meters
    #[arg(long, default_value = "2.0")]
    distance: f64,

    /// Add speckle noise to the depth frames
    #[arg(long)]
    noise: bool,

    /// Number of tracked bodies in the scene
    #[arg(short, long, default_value = "1")]
    bodies: usize,

    /// Print each curve as a text plot instead of YAML
    #[arg(short, long)]
    plot: bool,

    /// Report curves without sensor tilt correction
    #[arg(long)]
    raw: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    dump_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

/// One frame of YAML output
#[derive(Serialize)]
struct CurveRecord<'a> {
    frame: u64,
    curve: &'a BackCurve,
    /// Curve pixels in the configured plot viewport
    pixels: Vec<(usize, usize)>,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Back Curve Detector");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    if args.raw {
        config.classifier.adjust_for_sensor_tilt = false;
    }

    if args.dump_config {
        print!("{}", serde_yaml::to_string(&config).context("Failed to serialize configuration")?);
        return Ok(());
    }

    let mapper = PinholeMapper::from_config(&config.sensor);
    let mut scene = SyntheticScene::new(config.sensor.width, config.sensor.height, mapper)
        .with_distance(args.distance)
        .with_tracked_bodies(args.bodies);
    if args.noise {
        scene = scene.with_noise(NOISE_SEED);
    }

    // Create and run application
    let mut app = BackTrackerApp::from_config(&config)?;
    let mut source = scene.replay(args.frames);
    let plot_config = config.plot.clone();

    let stats = app.run(&mut source, |frame, curve| {
        if args.plot {
            match CurvePlot::fit(curve, ASCII_COLUMNS, ASCII_ROWS, plot_config.round_factor) {
                Ok(plot) => println!("Frame {} ({} points)\n{}\n", frame, curve.len(), plot.to_ascii()),
                Err(e) => warn!("Frame {}: cannot plot curve: {}", frame, e),
            }
            return;
        }

        let pixels = CurvePlot::fit(curve, plot_config.width, plot_config.height, plot_config.round_factor)
            .map(|plot| plot.pixels)
            .unwrap_or_default();
        let record = CurveRecord { frame, curve, pixels };
        match serde_yaml::to_string(&record) {
            Ok(yaml) => print!("---\n{}", yaml),
            Err(e) => warn!("Frame {}: failed to serialize curve: {}", frame, e),
        }
    })?;

    info!(
        "Done: {} of {} frames produced a curve ({} skipped)",
        stats.curves, stats.frames, stats.skipped
    );

    Ok(())
}
