//! Device tilt input.
//!
//! A [`TiltSensor`] delivers raw accelerometer readings on its own schedule and
//! writes them through a [`TiltPublisher`]. [`TiltSource`] owns the sensor
//! registration and exposes the latest normalised [`TiltVector`]; consumers that
//! want physical motion run it through a [`TiltSpring`].

use crate::constants::STANDARD_GRAVITY;
use crate::error::SensorError;
use crate::slot::LatestSlot;
use crate::spring::{Spring, SpringProfile};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TiltVector {
    pub pitch: f32,
    pub roll: f32,
}

impl TiltVector {
    pub const ZERO: Self = Self {
        pitch: 0.0,
        roll: 0.0,
    };

    /// Both components clamped to `[-1, 1]`; NaN becomes 0.
    pub fn new(pitch: f32, roll: f32) -> Self {
        Self {
            pitch: clamp_unit(pitch),
            roll: clamp_unit(roll),
        }
    }

    /// Lateral acceleration drives roll, longitudinal drives pitch.
    pub fn from_acceleration(lateral: f32, longitudinal: f32) -> Self {
        Self::new(longitudinal / STANDARD_GRAVITY, lateral / STANDARD_GRAVITY)
    }

    pub fn magnitude(&self) -> f32 {
        (self.pitch * self.pitch + self.roll * self.roll).sqrt()
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-1.0, 1.0)
    }
}

/// Write end handed to a sensor on registration.
#[derive(Clone)]
pub struct TiltPublisher {
    slot: LatestSlot<TiltVector>,
}

impl TiltPublisher {
    pub fn publish_acceleration(&self, lateral: f32, longitudinal: f32) {
        self.slot
            .publish(TiltVector::from_acceleration(lateral, longitudinal));
    }

    pub fn publish(&self, tilt: TiltVector) {
        self.slot.publish(TiltVector::new(tilt.pitch, tilt.roll));
    }
}

/// An orientation sensor the host can plug in.
pub trait TiltSensor: Send {
    fn register(&mut self, publisher: TiltPublisher) -> Result<(), SensorError>;
    fn unregister(&mut self) -> Result<(), SensorError>;
}

pub struct TiltSource {
    slot: LatestSlot<TiltVector>,
    sensor: Option<Box<dyn TiltSensor>>,
    registered: bool,
}

impl TiltSource {
    /// `None` models a device without an accelerometer: tilt stays at zero.
    pub fn new(sensor: Option<Box<dyn TiltSensor>>) -> Self {
        Self {
            slot: LatestSlot::new(TiltVector::ZERO),
            sensor,
            registered: false,
        }
    }

    pub fn start(&mut self) {
        if self.registered {
            return;
        }
        let Some(sensor) = self.sensor.as_mut() else {
            log::info!("[tilt] no sensor; tilt effects stay at rest");
            return;
        };
        let publisher = TiltPublisher {
            slot: self.slot.clone(),
        };
        match sensor.register(publisher) {
            Ok(()) => {
                self.registered = true;
                log::info!("[tilt] sensor registered");
            }
            Err(e) => log::warn!("[tilt] {e}; continuing without tilt"),
        }
    }

    /// Release the sensor listener. Calling this again is a no-op.
    pub fn stop(&mut self) {
        if !self.registered {
            return;
        }
        self.registered = false;
        if let Some(sensor) = self.sensor.as_mut() {
            match sensor.unregister() {
                Ok(()) => log::info!("[tilt] sensor unregistered"),
                Err(e) => log::warn!("[tilt] ignoring {e}"),
            }
        }
        self.slot.publish(TiltVector::ZERO);
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn current_tilt(&self) -> TiltVector {
        self.slot.latest()
    }
}

impl Drop for TiltSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Two-axis spring smoothing of the raw tilt.
#[derive(Clone, Copy, Debug)]
pub struct TiltSpring {
    pitch: Spring,
    roll: Spring,
}

impl Default for TiltSpring {
    fn default() -> Self {
        Self::new(SpringProfile::TILT)
    }
}

impl TiltSpring {
    pub fn new(profile: SpringProfile) -> Self {
        Self {
            pitch: Spring::new(profile, 0.0),
            roll: Spring::new(profile, 0.0),
        }
    }

    pub fn step(&mut self, target: TiltVector, dt_sec: f32) -> TiltVector {
        self.pitch.step(target.pitch, dt_sec);
        self.roll.step(target.roll, dt_sec);
        self.value()
    }

    /// Current smoothed value. May briefly leave `[-1, 1]` while overshooting.
    pub fn value(&self) -> TiltVector {
        TiltVector {
            pitch: self.pitch.value,
            roll: self.roll.value,
        }
    }
}
