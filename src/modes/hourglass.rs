use crate::fluid::{compute_surface, FluidSurface};
use crate::tilt::TiltVector;
use crate::time::{TimeSample, SECONDS_PER_DAY};

#[derive(Clone, Debug, PartialEq)]
pub struct HourglassVisual {
    pub surface: FluidSurface,
    pub percent: u32,
    /// `(hours, minutes)` shown in the readout.
    pub remaining: (u32, u32),
}

impl HourglassVisual {
    pub fn remaining_text(&self) -> String {
        format!("{:02}:{:02}", self.remaining.0, self.remaining.1)
    }

    pub fn headline(&self) -> String {
        format!("{}% · {} verbleibend", self.percent, self.remaining_text())
    }
}

/// Field-wise `(23 - hour, 59 - minute)`. At hh:00 this reads one minute
/// short of the true remainder; see [`true_remaining`].
pub fn naive_remaining(t: &TimeSample) -> (u32, u32) {
    (23 - t.hour.min(23), 59 - t.minute.min(59))
}

/// Exact `(hours, minutes, seconds)` until the next midnight.
pub fn true_remaining(t: &TimeSample) -> (u32, u32, u32) {
    let left = SECONDS_PER_DAY - t.seconds_since_midnight().min(SECONDS_PER_DAY);
    (left / 3600, left % 3600 / 60, left % 60)
}

pub fn render(
    t: &TimeSample,
    smoothed_tilt: TiltVector,
    phases: [f64; 3],
    canvas: [f32; 2],
    bubble_count: usize,
) -> HourglassVisual {
    let surface = compute_surface(t, smoothed_tilt, phases, canvas[0], canvas[1], bubble_count);
    HourglassVisual {
        percent: surface.percent(),
        surface,
        remaining: naive_remaining(t),
    }
}
