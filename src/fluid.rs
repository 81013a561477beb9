//! Wave surface and bubble field for the fluid hourglass.
//!
//! Nothing here is stored between frames except the three phase accumulators;
//! the surface is a pure function of time, smoothed tilt and phases.

use crate::constants::{
    BUBBLE_DRIFT_GAIN, BUBBLE_JITTER_PX, FLUID_PHASE_PERIODS_SEC, FLUID_SAMPLE_STEP,
    FLUID_TILT_GAIN, FLUID_TILT_LIMIT, FLUID_WAVES, FLUID_WAVE_DAMPING,
};
use crate::tilt::TiltVector;
use crate::time::TimeSample;
use std::f64::consts::TAU;

/// Three unbounded, monotonically increasing wave phases (radians).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseAccumulators {
    phases: [f64; 3],
}

impl PhaseAccumulators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each phase gains one full turn per its period.
    pub fn advance(&mut self, dt_sec: f64) {
        if dt_sec.is_nan() || dt_sec <= 0.0 {
            return;
        }
        for (phase, period) in self.phases.iter_mut().zip(FLUID_PHASE_PERIODS_SEC) {
            *phase += dt_sec * TAU / period;
        }
    }

    pub fn phases(&self) -> [f64; 3] {
        self.phases
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bubble {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FluidSurface {
    pub width: f32,
    pub height: f32,
    pub day_progress: f32,
    /// Flat fill line before tilt and waves.
    pub fluid_top: f32,
    pub tilt_influence: f32,
    /// Surface y at `x = i * FLUID_SAMPLE_STEP`, the last sample pinned to `width`.
    pub samples: Vec<f32>,
    pub bubbles: Vec<Bubble>,
}

impl FluidSurface {
    pub fn sample_x(&self, i: usize) -> f32 {
        (i as f32 * FLUID_SAMPLE_STEP).min(self.width)
    }

    /// Surface y at any `x`, interpolated between samples.
    pub fn top_y(&self, x: f32) -> f32 {
        let Some(&last) = self.samples.last() else {
            return self.fluid_top;
        };
        let x = x.clamp(0.0, self.width);
        let pos = x / FLUID_SAMPLE_STEP;
        let i = pos.floor() as usize;
        if i + 1 >= self.samples.len() {
            return last;
        }
        let (x0, x1) = (self.sample_x(i), self.sample_x(i + 1));
        let t = if x1 > x0 { (x - x0) / (x1 - x0) } else { 0.0 };
        self.samples[i] + (self.samples[i + 1] - self.samples[i]) * t
    }

    /// Percentage of the day shown in the readout.
    pub fn percent(&self) -> u32 {
        (self.day_progress * 100.0) as u32
    }
}

pub fn tilt_influence(smoothed: TiltVector) -> f32 {
    (smoothed.roll * FLUID_TILT_GAIN).clamp(-FLUID_TILT_LIMIT, FLUID_TILT_LIMIT)
}

pub fn compute_surface(
    time: &TimeSample,
    smoothed: TiltVector,
    phases: [f64; 3],
    width: f32,
    height: f32,
    bubble_count: usize,
) -> FluidSurface {
    let width = width.max(0.0);
    let height = height.max(0.0);
    let day_progress = time.day_progress();
    let fluid_top = height - height * day_progress;
    let ti = tilt_influence(smoothed);
    let attenuation = 1.0 - FLUID_WAVE_DAMPING * smoothed.roll.abs().min(1.0);

    let n = (width / FLUID_SAMPLE_STEP).ceil() as usize + 1;
    let mut samples = Vec::with_capacity(n);
    for i in 0..n {
        let x = (i as f32 * FLUID_SAMPLE_STEP).min(width);
        let u = if width > 0.0 { x / width } else { 0.0 };
        let slope = (fluid_top + ti) + ((fluid_top - ti) - (fluid_top + ti)) * u;
        let mut wave = 0.0;
        for ((amp, freq), phase) in FLUID_WAVES.iter().zip(phases) {
            wave += (wrap(phase) + x * freq).sin() * amp;
        }
        samples.push(slope + wave * attenuation);
    }

    let bubbles = bubble_field(bubble_count, phases, width, height, fluid_top, ti);

    FluidSurface {
        width,
        height,
        day_progress,
        fluid_top,
        tilt_influence: ti,
        samples,
        bubbles,
    }
}

fn bubble_field(
    count: usize,
    phases: [f64; 3],
    width: f32,
    height: f32,
    fluid_top: f32,
    ti: f32,
) -> Vec<Bubble> {
    let depth = height - fluid_top;
    let cycles = phases[2] / TAU;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let rate = 1.0 + (i % 3) as f64 * 0.5;
        let offset = ((i * 7) % count.max(1)) as f64 / count.max(1) as f64;
        let p = (cycles * rate + offset).rem_euclid(1.0) as f32;
        let y = height - p * depth;
        if !(y > fluid_top && y <= height) {
            continue;
        }
        // 1 at the bottom, 0 at the surface
        let depth_weight = if depth > 0.0 { (y - fluid_top) / depth } else { 0.0 };
        let base = width * (i as f32 + 0.5) / count as f32;
        let jitter = (wrap(phases[0]) + i as f32).sin() * BUBBLE_JITTER_PX;
        out.push(Bubble {
            x: base + ti * depth_weight * BUBBLE_DRIFT_GAIN + jitter,
            y,
            radius: 4.0 + (i % 5) as f32 * 2.0,
            alpha: 0.3,
        });
    }
    out
}

// Reduce before narrowing so long sessions keep f32 precision.
fn wrap(phase: f64) -> f32 {
    phase.rem_euclid(TAU) as f32
}

/// Hourglass outline as a closed polygon in canvas coordinates.
pub fn hourglass_outline(width: f32, height: f32) -> [[f32; 2]; 8] {
    [
        [width * 0.1, 0.0],
        [width * 0.9, 0.0],
        [width * 0.55, height * 0.45],
        [width * 0.55, height * 0.55],
        [width * 0.9, height],
        [width * 0.1, height],
        [width * 0.45, height * 0.55],
        [width * 0.45, height * 0.45],
    ]
}
