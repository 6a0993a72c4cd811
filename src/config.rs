//! Command-line flags and the settings derived from them.

use std::path::PathBuf;

use clap::Parser;

use crate::error::ConfigError;
use crate::model::clock::{MAX_SPEED, MIN_SPEED};
use crate::model::{MotionPolicy, Registry};

/// Interactive 3D solar system.
#[derive(Debug, Parser)]
#[command(name = "rust-orrery", about = "Interactive 3D solar system viewer")]
pub struct CliArgs {
    /// RON file describing the bodies. Defaults to the built-in solar system.
    #[arg(long)]
    pub bodies: Option<PathBuf>,

    /// How orbital positions advance each frame.
    #[arg(long, value_enum)]
    pub policy: Option<MotionPolicy>,

    /// Initial speed multiplier, 1 to 50.
    #[arg(long)]
    pub speed: Option<u32>,

    /// Days of orbit per second at speed 1, for bodies with a period.
    #[arg(long)]
    pub days_per_second: Option<f64>,

    /// Number of background stars.
    #[arg(long)]
    pub stars: Option<usize>,

    /// Directory holding body textures. Missing files fall back to flat colors.
    #[arg(long)]
    pub textures: Option<PathBuf>,

    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Log filter (error, warn, info, debug, trace, or a full directive).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bodies: Option<PathBuf>,
    pub policy: MotionPolicy,
    pub speed: u32,
    pub days_per_second: f64,
    pub stars: usize,
    // Stars are scattered through a cube this far out along each axis
    pub star_spread: f32,
    pub textures: PathBuf,
    pub width: u32,
    pub height: u32,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bodies: None,
            policy: MotionPolicy::AbsolutePhase,
            speed: 1,
            days_per_second: 1.0,
            stars: 10_000,
            star_spread: 1000.0,
            textures: PathBuf::from("assets/textures"),
            width: 1280,
            height: 800,
            log_level: String::from("info"),
        }
    }
}

impl AppConfig {
    /// Defaults, overridden by whatever flags were given.
    pub fn from_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = AppConfig::default();
        config.apply_cli_overrides(args);
        config.validate()?;
        Ok(config)
    }

    fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref path) = args.bodies {
            self.bodies = Some(path.clone());
        }
        if let Some(policy) = args.policy {
            self.policy = policy;
        }
        if let Some(speed) = args.speed {
            self.speed = speed;
        }
        if let Some(days) = args.days_per_second {
            self.days_per_second = days;
        }
        if let Some(stars) = args.stars {
            self.stars = stars;
        }
        if let Some(ref dir) = args.textures {
            self.textures = dir.clone();
        }
        if let Some(w) = args.width {
            self.width = w;
        }
        if let Some(h) = args.height {
            self.height = h;
        }
        if let Some(ref level) = args.log_level {
            self.log_level = level.clone();
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.speed) {
            return Err(ConfigError::SpeedOutOfRange(self.speed));
        }
        if self.days_per_second <= 0.0 || !self.days_per_second.is_finite() {
            return Err(ConfigError::NonPositiveTimeScale(self.days_per_second));
        }
        Ok(())
    }

    pub fn days_per_ms(&self) -> f64 {
        self.days_per_second / 1000.0
    }

    /// The registry named on the command line, or the built-in one.
    pub fn load_registry(&self) -> Result<Registry, ConfigError> {
        match &self.bodies {
            Some(path) => Registry::load(path),
            None => Ok(Registry::solar_system()?),
        }
    }
}
