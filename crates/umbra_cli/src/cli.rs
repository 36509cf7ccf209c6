use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use umbra_core::{builtin, CameraDescription, SceneDescription};

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Scenes that ship with the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BuiltinScene {
    /// Random field of small spheres with motion blur
    BouncingSpheres,
    /// Two checker-textured spheres
    CheckeredSpheres,
    /// One gray sphere, viewed head-on
    SingleSphere,
}

impl BuiltinScene {
    /// Scene description for this built-in; `seed` drives random layouts.
    pub fn description(self, seed: u64) -> SceneDescription {
        match self {
            BuiltinScene::BouncingSpheres => builtin::bouncing_spheres(seed),
            BuiltinScene::CheckeredSpheres => builtin::checkered_spheres(),
            BuiltinScene::SingleSphere => builtin::single_sphere(),
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Debug, Parser)]
#[command(name = "umbra")]
#[command(about = "An offline Monte Carlo path tracer")]
pub struct Args {
    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// JSON scene description to render (overrides --builtin)
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Built-in scene to render when no scene file is given
    #[arg(short, long, value_enum, default_value = "bouncing-spheres")]
    pub builtin: BuiltinScene,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image aspect ratio (width / height)
    #[arg(long)]
    pub aspect_ratio: Option<f32>,

    /// Number of samples per pixel
    #[arg(long, short = 'n')]
    pub samples: Option<u32>,

    /// Maximum number of rays along one path
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for sampling and for random built-in layouts
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Worker threads (0 = all available cores)
    #[arg(short, long, default_value_t = 0)]
    pub workers: usize,

    /// Render on the calling thread only
    #[arg(long)]
    pub serial: bool,

    /// Output file path (.png or .ppm)
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Print the resolved scene as JSON and exit without rendering
    #[arg(long)]
    pub dump_scene: bool,
}

impl Args {
    /// Apply command line overrides on top of a scene's camera settings.
    pub fn apply_overrides(&self, camera: &mut CameraDescription) {
        if let Some(width) = self.width {
            camera.image_width = width;
        }
        if let Some(aspect_ratio) = self.aspect_ratio {
            camera.aspect_ratio = aspect_ratio;
        }
        if let Some(samples) = self.samples {
            camera.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            camera.max_depth = max_depth;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["umbra"]).unwrap();

        assert_eq!(args.builtin, BuiltinScene::BouncingSpheres);
        assert_eq!(args.seed, 0);
        assert_eq!(args.workers, 0);
        assert_eq!(args.output, PathBuf::from("output.png"));
        assert!(args.scene.is_none());
        assert!(!args.serial);
    }

    #[test]
    fn test_overrides_only_touch_given_fields() {
        let args = Args::try_parse_from([
            "umbra",
            "--builtin",
            "single-sphere",
            "--width",
            "64",
            "-n",
            "8",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let mut camera = args.builtin.description(args.seed).camera;
        let before = camera.clone();
        args.apply_overrides(&mut camera);

        assert_eq!(camera.image_width, 64);
        assert_eq!(camera.samples_per_pixel, 8);
        assert_eq!(camera.max_depth, before.max_depth);
        assert_eq!(camera.aspect_ratio, before.aspect_ratio);
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
    }

    #[test]
    fn test_rejects_unknown_builtin() {
        assert!(Args::try_parse_from(["umbra", "--builtin", "teapot"]).is_err());
    }
}
