use crate::constants::{
    MATRIX_ALPHA_RANGE, MATRIX_RESPAWN_Y, MATRIX_SPEED_RANGE, MATRIX_TICK_MS,
    MATRIX_TRAIL_LEN, MATRIX_TRAIL_SPACING,
};
use crate::color::{Rgb, MATRIX_DARK_GREEN, MATRIX_GREEN};
use crate::particles::{ParticleInstance, ParticleShape};
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RainDrop {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub alpha: f32,
}

/// Falling green drops behind the leet-mode terminal.
#[derive(Clone, Debug)]
pub struct MatrixRain {
    drops: Vec<RainDrop>,
    width: f32,
    height: f32,
    rng: StdRng,
}

impl MatrixRain {
    pub fn new(count: usize, width: f32, height: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let drops = (0..count)
            .map(|_| RainDrop {
                x: rng.gen::<f32>() * width,
                y: rng.gen::<f32>() * height,
                speed: MATRIX_SPEED_RANGE.0
                    + rng.gen::<f32>() * (MATRIX_SPEED_RANGE.1 - MATRIX_SPEED_RANGE.0),
                alpha: MATRIX_ALPHA_RANGE.0
                    + rng.gen::<f32>() * (MATRIX_ALPHA_RANGE.1 - MATRIX_ALPHA_RANGE.0),
            })
            .collect();
        Self {
            drops,
            width,
            height,
            rng,
        }
    }

    pub fn drops(&self) -> &[RainDrop] {
        &self.drops
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Drops fall `speed` px per 50 ms step and wrap to the top with a new
    /// column once they pass the bottom.
    pub fn tick(&mut self, dt_sec: f32) {
        if dt_sec.is_nan() || dt_sec <= 0.0 {
            return;
        }
        let steps = dt_sec * 1000.0 / MATRIX_TICK_MS as f32;
        for d in &mut self.drops {
            d.y += d.speed * steps;
            if d.y > self.height {
                d.y = MATRIX_RESPAWN_Y;
                d.x = self.rng.gen::<f32>() * self.width;
            }
        }
    }

    /// Bright head dot plus a fading darker trail above it.
    pub fn render(&self) -> Vec<ParticleInstance> {
        let mut out = Vec::with_capacity(self.drops.len() * (MATRIX_TRAIL_LEN + 1));
        for d in &self.drops {
            out.push(dot(d.x, d.y, 6.0, MATRIX_GREEN, d.alpha));
            for i in 1..=MATRIX_TRAIL_LEN {
                let fade = 1.0 - i as f32 / (MATRIX_TRAIL_LEN + 1) as f32;
                let y = d.y - i as f32 * MATRIX_TRAIL_SPACING;
                out.push(dot(d.x, y, 4.0, MATRIX_DARK_GREEN, d.alpha * fade));
            }
        }
        out
    }
}

fn dot(x: f32, y: f32, diameter: f32, color: Rgb, alpha: f32) -> ParticleInstance {
    ParticleInstance {
        center: [x, y],
        size: diameter,
        rotation: 0.0,
        color: color.to_rgba(alpha),
        shape: ParticleShape::Circle as u32,
        _pad: [0; 3],
    }
}
