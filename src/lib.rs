//! Time-driven animation and rendering core for an ambient clock display.
//!
//! A host attaches a [`DreamSession`] to its surface, calls
//! [`DreamSession::frame`] once per display refresh and draws the returned
//! [`Frame`]: background uniforms for [`BACKGROUND_WGSL`], instanced quads
//! for [`SPRITES_WGSL`] and the card frosting pass for [`GLASS_WGSL`].

pub mod background;
pub mod color;
pub mod compositor;
pub mod constants;
pub mod controller;
pub mod error;
pub mod fluid;
pub mod modes;
pub mod particles;
pub mod rain;
pub mod session;
pub mod slot;
pub mod spring;
pub mod tilt;
pub mod time;

pub use compositor::{Frame, LayerId, SpriteInstance};
pub use controller::{Gesture, HapticEvent, HapticSink, ModeConfig, Settings, UiState};
pub use error::{ConfigError, SensorError, SessionError};
pub use modes::{ClockMode, ModeVisual};
pub use session::{DreamSession, SessionConfig};
pub use tilt::{TiltPublisher, TiltSensor, TiltVector};
pub use time::{ClockSource, TimeSample};

pub static BACKGROUND_WGSL: &str = include_str!("../shaders/background.wgsl");
pub static SPRITES_WGSL: &str = include_str!("../shaders/sprites.wgsl");
pub static GLASS_WGSL: &str = include_str!("../shaders/glass.wgsl");
