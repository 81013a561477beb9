use thiserror::Error;

/// Invalid construction parameters. Raised once, at build time, never while
/// a session is rendering.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("particle count must not be negative (got {0})")]
    NegativeParticleCount(i64),
    #[error("particle speed range {min}..{max} must be finite and non-negative")]
    InvalidSpeed { min: f32, max: f32 },
    #[error("{name} range {min}..{max} is inverted or not finite")]
    InvalidRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("variant {variant} is out of range for mode {mode} (max {max})")]
    VariantOutOfRange { mode: usize, variant: usize, max: usize },
    #[error("mode index {0} is out of range")]
    ModeOutOfRange(usize),
    #[error("canvas size {width}x{height} must be positive")]
    InvalidCanvas { width: f32, height: f32 },
    #[error("clock poll interval must be positive")]
    ZeroPollInterval,
}

/// Failures reported by a tilt sensor implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    #[error("no orientation sensor available")]
    Unavailable,
    #[error("sensor registration failed: {0}")]
    Register(String),
    #[error("sensor unregistration failed: {0}")]
    Unregister(String),
}

/// Lifecycle errors surfaced to the host display surface.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to start clock polling thread: {0}")]
    ClockThread(#[source] std::io::Error),
}
