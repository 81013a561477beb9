//! Solar dial. Phases come from fixed hour bands and the sun moves linearly
//! over a half circle from 06:00 to 18:00; no ephemeris.

use crate::color::Rgb;
use crate::time::TimeSample;

pub const HOUR_MARKERS: [u32; 5] = [6, 9, 12, 15, 18];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolarPhase {
    Night,
    BlueHourDawn,
    GoldenHourDawn,
    Day,
    GoldenHourDusk,
    BlueHourDusk,
}

impl SolarPhase {
    /// Half-open hour bands: [0,5) night, [5,6) blue, [6,7) golden, [7,17)
    /// day, [17,18) golden, [18,19) blue, [19,24) night.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=4 => Self::Night,
            5 => Self::BlueHourDawn,
            6 => Self::GoldenHourDawn,
            7..=16 => Self::Day,
            17 => Self::GoldenHourDusk,
            18 => Self::BlueHourDusk,
            _ => Self::Night,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Night => "Nacht",
            Self::BlueHourDawn | Self::BlueHourDusk => "Blaue Stunde",
            Self::GoldenHourDawn | Self::GoldenHourDusk => "Goldene Stunde",
            Self::Day => "Tag",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Night => "Die Sterne regieren",
            Self::BlueHourDawn => "Magisches Licht vor Sonnenaufgang",
            Self::GoldenHourDawn => "Perfektes Licht zum Fotografieren",
            Self::Day => "Die Sonne steht hoch",
            Self::GoldenHourDusk => "Das magische Abendlicht",
            Self::BlueHourDusk => "Der Übergang zur Nacht",
        }
    }

    /// `(phase, sun, sky top, sky bottom)`
    fn colors(self) -> [u32; 4] {
        match self {
            Self::Night => [0x1A1A2E, 0xCCCCCC, 0x0A0A15, 0x1A1A2E],
            Self::BlueHourDawn => [0x4A90D9, 0xFFE4B5, 0x1A3A5C, 0x4A90D9],
            Self::GoldenHourDawn => [0xFFB347, 0xFFD700, 0x4A90D9, 0xFFB347],
            Self::Day => [0x87CEEB, 0xFFFF00, 0x4A90D9, 0x87CEEB],
            Self::GoldenHourDusk => [0xFF8C42, 0xFF6B35, 0xFF8C42, 0xFFB347],
            Self::BlueHourDusk => [0x4169E1, 0xFFB6C1, 0x4169E1, 0x1A1A4E],
        }
    }

    pub fn color(self) -> Rgb {
        Rgb::from_u32(self.colors()[0])
    }

    pub fn sun_color(self) -> Rgb {
        Rgb::from_u32(self.colors()[1])
    }

    pub fn sky(self) -> (Rgb, Rgb) {
        let c = self.colors();
        (Rgb::from_u32(c[2]), Rgb::from_u32(c[3]))
    }
}

/// Degrees along the arc, 0 at sunrise (06:00) and 180 at sunset (18:00).
pub fn sun_angle(hour: u32, minute: u32) -> f32 {
    let decimal = hour as f32 + minute as f32 / 60.0;
    ((decimal - 6.0) / 12.0 * 180.0).clamp(0.0, 180.0)
}

/// Point on a unit half circle (y up) for an arc angle in degrees.
pub fn arc_point(angle_deg: f32) -> [f32; 2] {
    let rad = (180.0 - angle_deg).to_radians();
    [rad.cos(), rad.sin()]
}

/// Full-screen sky behind the solar page, `(top, bottom)`.
pub fn background_sky(hour: u32) -> (Rgb, Rgb) {
    let pair = match hour {
        0..=5 => (0x0A0A15, 0x1A1A2E),
        6..=7 => (0x4A90D9, 0xFFB347),
        8..=16 => (0x4A90D9, 0x87CEEB),
        17..=18 => (0xFF8C42, 0x4169E1),
        _ => (0x0A0A15, 0x1A1A2E),
    };
    (Rgb::from_u32(pair.0), Rgb::from_u32(pair.1))
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolarVisual {
    pub phase: SolarPhase,
    pub sun_angle: f32,
    pub sun: [f32; 2],
    pub markers: [(u32, [f32; 2]); 5],
}

impl SolarVisual {
    pub fn headline(&self) -> String {
        format!("{} {:.0}°", self.phase.display_name(), self.sun_angle)
    }
}

pub fn render(t: &TimeSample) -> SolarVisual {
    let angle = sun_angle(t.hour, t.minute);
    SolarVisual {
        phase: SolarPhase::from_hour(t.hour),
        sun_angle: angle,
        sun: arc_point(angle),
        markers: HOUR_MARKERS.map(|h| (h, arc_point((h as f32 - 6.0) / 12.0 * 180.0))),
    }
}
