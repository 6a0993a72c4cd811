use std::path::PathBuf;

/// A registry that fails validation. Every variant names the body it tripped on.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry has no planets")]
    NoPlanets,

    #[error("body name {0:?} appears more than once")]
    DuplicateName(String),

    #[error("body {name:?} has non-positive or non-finite display size {size}")]
    NonPositiveSize { name: String, size: f32 },

    #[error("planet {0:?} has no orbit distance")]
    MissingDistance(String),

    #[error("body {name:?} has non-positive or non-finite orbit distance {distance}")]
    NonPositiveDistance { name: String, distance: f64 },

    #[error(
        "body {name:?} orbits at distance {distance}, which doesn't exceed the previous orbit at {previous}"
    )]
    NonIncreasingDistance {
        name: String,
        distance: f64,
        previous: f64,
    },

    #[error("body {name:?} has non-positive or non-finite orbital period {days} days")]
    NonPositivePeriod { name: String, days: f64 },

    #[error("central body {0:?} can't have an orbit distance or period")]
    FixedBodyWithOrbit(String),

    #[error("body {name:?} has invalid color {color:?}, expected six hex digits")]
    InvalidColor { name: String, color: String },
}

/// Anything that can go wrong while turning command-line flags and files into a
/// runnable configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("speed multiplier {0} is outside [{min}, {max}]", min = crate::model::clock::MIN_SPEED, max = crate::model::clock::MAX_SPEED)]
    SpeedOutOfRange(u32),

    #[error("time scale must be positive, got {0} days per second")]
    NonPositiveTimeScale(f64),
}
