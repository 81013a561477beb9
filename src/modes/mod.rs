//! The nine clock encodings.
//!
//! Every renderer is a pure function of its inputs. Variant selection is
//! passed in; the few pieces of per-mode memory (Berlin thud edge detection,
//! binary column readout, synesthesia colour tween) live in small state types
//! owned by the session.

pub mod berlin;
pub mod binary;
pub mod hex;
pub mod hourglass;
pub mod solar;
pub mod standard;
pub mod swatch;
pub mod synesthesia;
pub mod unix;

use crate::color::{ModePalette, Rgb, MODE_PALETTES};
use crate::tilt::TiltVector;
use crate::time::TimeSample;

pub use berlin::{BerlinThud, BerlinVisual};
pub use binary::{BinaryReveal, BinaryVisual};
pub use hex::HexVisual;
pub use hourglass::HourglassVisual;
pub use solar::{SolarPhase, SolarVisual};
pub use standard::{StandardLayout, StandardVisual};
pub use swatch::SwatchVisual;
pub use synesthesia::{SynesthesiaAnimator, SynesthesiaVisual};
pub use unix::UnixVisual;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClockMode {
    Standard = 0,
    Hex = 1,
    Berlin = 2,
    Binary = 3,
    Swatch = 4,
    Unix = 5,
    Synesthesia = 6,
    Solar = 7,
    Hourglass = 8,
}

impl ClockMode {
    pub const COUNT: usize = 9;
    pub const ALL: [Self; Self::COUNT] = [
        Self::Standard,
        Self::Hex,
        Self::Berlin,
        Self::Binary,
        Self::Swatch,
        Self::Unix,
        Self::Synesthesia,
        Self::Solar,
        Self::Hourglass,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn max_variants(self) -> usize {
        match self {
            Self::Standard => 3,
            Self::Hex | Self::Swatch | Self::Unix => 2,
            _ => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Hex => "HEXADECIMAL",
            Self::Berlin => "BERLIN UHR",
            Self::Binary => "BINARY",
            Self::Swatch => "SWATCH .BEATS",
            Self::Unix => "UNIX EPOCH",
            Self::Synesthesia => "SYNÄSTHESIE",
            Self::Solar => "SOLAR DIAL",
            Self::Hourglass => "FLUID HOURGLASS",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            Self::Standard => "Zeit in Bewegung",
            Self::Hex => "Die Farbe der Zeit",
            Self::Berlin => "Mengenlehre seit 1975",
            Self::Binary => "True Nerd Mode",
            Self::Swatch => "Keine Zeitzonen. @beats.",
            Self::Unix => "Sekunden seit 1970",
            Self::Synesthesia => "Jede Ziffer hat ihre Farbe",
            Self::Solar => "Folge der Sonne",
            Self::Hourglass => "Der Tag fließt dahin",
        }
    }

    pub fn palette(self) -> &'static ModePalette {
        &MODE_PALETTES[self.index()]
    }
}

/// Everything a renderer may read for one frame. Built once per frame from
/// the frame's single `TimeSample`.
#[derive(Clone, Debug, PartialEq)]
pub struct ModeInputs {
    pub time: TimeSample,
    /// Spring-smoothed tilt.
    pub tilt: TiltVector,
    pub variant: usize,
    /// Content area of the glass card, px.
    pub canvas: [f32; 2],
    pub phases: [f64; 3],
    pub bubble_count: usize,
    pub binary_reveal: Option<usize>,
    /// Animated slot colours; `None` renders the palette targets directly.
    pub synesthesia_colors: Option<[Rgb; 6]>,
}

impl ModeInputs {
    pub fn new(time: TimeSample) -> Self {
        Self {
            time,
            tilt: TiltVector::ZERO,
            variant: 0,
            canvas: [260.0, 320.0],
            phases: [0.0; 3],
            bubble_count: crate::constants::BUBBLE_COUNT,
            binary_reveal: None,
            synesthesia_colors: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ModeVisual {
    Standard(StandardVisual),
    Hex(HexVisual),
    Berlin(BerlinVisual),
    Binary(BinaryVisual),
    Swatch(SwatchVisual),
    Unix(UnixVisual),
    Synesthesia(SynesthesiaVisual),
    Solar(SolarVisual),
    Hourglass(HourglassVisual),
}

impl ModeVisual {
    pub fn mode(&self) -> ClockMode {
        match self {
            Self::Standard(_) => ClockMode::Standard,
            Self::Hex(_) => ClockMode::Hex,
            Self::Berlin(_) => ClockMode::Berlin,
            Self::Binary(_) => ClockMode::Binary,
            Self::Swatch(_) => ClockMode::Swatch,
            Self::Unix(_) => ClockMode::Unix,
            Self::Synesthesia(_) => ClockMode::Synesthesia,
            Self::Solar(_) => ClockMode::Solar,
            Self::Hourglass(_) => ClockMode::Hourglass,
        }
    }

    /// One-line text form of the visual, used for window titles and logs.
    pub fn headline(&self) -> String {
        match self {
            Self::Standard(v) => v.headline(),
            Self::Hex(v) => v.text.clone(),
            Self::Berlin(v) => v.headline(),
            Self::Binary(v) => v.headline(),
            Self::Swatch(v) => v.text.clone(),
            Self::Unix(v) => v.text.clone(),
            Self::Synesthesia(v) => v.headline(),
            Self::Solar(v) => v.headline(),
            Self::Hourglass(v) => v.headline(),
        }
    }
}

/// Render `mode` for this frame. The variant is clamped, never wrapped.
pub fn render(mode: ClockMode, inputs: &ModeInputs) -> ModeVisual {
    let variant = inputs.variant.min(mode.max_variants() - 1);
    let t = &inputs.time;
    match mode {
        ClockMode::Standard => ModeVisual::Standard(standard::render(t, variant)),
        ClockMode::Hex => ModeVisual::Hex(hex::render(t, variant)),
        ClockMode::Berlin => ModeVisual::Berlin(berlin::render(t)),
        ClockMode::Binary => ModeVisual::Binary(binary::render(t, inputs.binary_reveal)),
        ClockMode::Swatch => ModeVisual::Swatch(swatch::render(t, variant)),
        ClockMode::Unix => ModeVisual::Unix(unix::render(t, variant)),
        ClockMode::Synesthesia => {
            ModeVisual::Synesthesia(synesthesia::render(t, inputs.synesthesia_colors))
        }
        ClockMode::Solar => ModeVisual::Solar(solar::render(t)),
        ClockMode::Hourglass => ModeVisual::Hourglass(hourglass::render(
            t,
            inputs.tilt,
            inputs.phases,
            inputs.canvas,
            inputs.bubble_count,
        )),
    }
}
