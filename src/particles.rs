//! Particle pools for the mid (background) and foreground layers.
//!
//! A pool has a fixed number of slots for its whole lifetime. Particles drift
//! upward; a particle that leaves the top is re-randomised in place, keeping
//! its slot id. `tick` consumes a pool and returns the advanced one so the
//! simulation can be stepped in tests with synthetic deltas.

use crate::constants::*;
use crate::error::ConfigError;
use bytemuck::{Pod, Zeroable};
use rand::prelude::*;

#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleShape {
    Circle = 0,
    Ring = 1,
    Triangle = 2,
    Hexagon = 3,
    Diamond = 4,
    Line = 5,
    DotCluster = 6,
}

impl ParticleShape {
    pub const ALL: [Self; 7] = [
        Self::Circle,
        Self::Ring,
        Self::Triangle,
        Self::Hexagon,
        Self::Diamond,
        Self::Line,
        Self::DotCluster,
    ];
    /// Small sharp shapes that read well in front of the glass.
    pub const FOREGROUND: [Self; 3] = [Self::Circle, Self::DotCluster, Self::Diamond];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Background,
    Foreground,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub alpha: f32,
    /// Upward px per nominal frame.
    pub speed: f32,
    /// Degrees.
    pub rotation: f32,
    pub rotation_speed: f32,
    pub shape: ParticleShape,
    /// Straight RGBA; the alpha channel is a tint multiplier.
    pub color: [f32; 4],
}

pub type SpawnColor = fn(&mut StdRng) -> [f32; 4];

pub fn background_spawn_color(rng: &mut StdRng) -> [f32; 4] {
    const COLORS: [[f32; 4]; 4] = [
        [0.0, 240.0 / 255.0, 1.0, 0.6],         // neon blue
        [1.0, 0.0, 110.0 / 255.0, 0.4],         // neon pink
        [123.0 / 255.0, 47.0 / 255.0, 1.0, 0.5], // purple
        [0.0, 1.0, 136.0 / 255.0, 0.3],         // green
    ];
    COLORS[rng.gen_range(0..COLORS.len())]
}

pub fn foreground_spawn_color(rng: &mut StdRng) -> [f32; 4] {
    const COLORS: [[f32; 4]; 3] = [
        [1.0, 1.0, 1.0, 0.7],
        [0.0, 240.0 / 255.0, 1.0, 0.6],
        [1.0, 0.0, 110.0 / 255.0, 0.5],
    ];
    COLORS[rng.gen_range(0..COLORS.len())]
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleConfig {
    pub kind: LayerKind,
    pub count: usize,
    pub width: f32,
    pub height: f32,
    pub size_range: (f32, f32),
    pub speed_range: (f32, f32),
    pub rotation_speed_range: (f32, f32),
    pub alpha_range: (f32, f32),
}

impl ParticleConfig {
    pub fn background(count: usize, width: f32, height: f32) -> Self {
        Self {
            kind: LayerKind::Background,
            count,
            width,
            height,
            size_range: BG_SIZE_RANGE,
            speed_range: BG_SPEED_RANGE,
            rotation_speed_range: BG_ROTATION_SPEED_RANGE,
            alpha_range: BG_ALPHA_RANGE,
        }
    }

    pub fn foreground(count: usize, width: f32, height: f32) -> Self {
        Self {
            kind: LayerKind::Foreground,
            count,
            width,
            height,
            size_range: FG_SIZE_RANGE,
            speed_range: FG_SPEED_RANGE,
            rotation_speed_range: FG_ROTATION_SPEED_RANGE,
            alpha_range: FG_ALPHA_RANGE,
        }
    }

    /// Set the count from a signed value, rejecting negatives.
    pub fn with_signed_count(mut self, count: i64) -> Result<Self, ConfigError> {
        self.count = usize::try_from(count).map_err(|_| ConfigError::NegativeParticleCount(count))?;
        Ok(self)
    }

    pub fn with_speed_range(mut self, min: f32, max: f32) -> Self {
        self.speed_range = (min, max);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (smin, smax) = self.speed_range;
        if !(smin.is_finite() && smax.is_finite()) || smin < 0.0 || smax < smin {
            return Err(ConfigError::InvalidSpeed {
                min: smin,
                max: smax,
            });
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::InvalidCanvas {
                width: self.width,
                height: self.height,
            });
        }
        for (name, (min, max)) in [
            ("size", self.size_range),
            ("rotation speed", self.rotation_speed_range),
            ("alpha", self.alpha_range),
        ] {
            if !(min.is_finite() && max.is_finite()) || max < min {
                return Err(ConfigError::InvalidRange { name, min, max });
            }
        }
        Ok(())
    }

    pub fn respawn_threshold(&self) -> f32 {
        match self.kind {
            LayerKind::Background => BG_RESPAWN_Y,
            LayerKind::Foreground => FG_RESPAWN_Y,
        }
    }

    fn spawn_jitter(&self) -> f32 {
        match self.kind {
            LayerKind::Background => BG_SPAWN_Y_JITTER,
            LayerKind::Foreground => FG_SPAWN_Y_JITTER,
        }
    }

    fn shapes(&self) -> &'static [ParticleShape] {
        match self.kind {
            LayerKind::Background => &ParticleShape::ALL,
            LayerKind::Foreground => &ParticleShape::FOREGROUND,
        }
    }
}

#[derive(Clone)]
pub struct Pool {
    config: ParticleConfig,
    particles: Vec<Particle>,
    rng: StdRng,
    spawn_color: SpawnColor,
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("kind", &self.config.kind)
            .field("len", &self.particles.len())
            .finish()
    }
}

impl Pool {
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Adopt a new canvas size. Existing particles keep flying; only future
    /// spawns use the new bounds.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.config.width = width;
            self.config.height = height;
        }
    }

    fn spawn(&mut self, id: usize) -> Particle {
        let c = &self.config;
        let rng = &mut self.rng;
        let shapes = c.shapes();
        Particle {
            id,
            x: rng.gen::<f32>() * c.width,
            y: c.height + rng.gen::<f32>() * c.spawn_jitter(),
            size: sample(rng, c.size_range),
            alpha: sample(rng, c.alpha_range),
            speed: sample(rng, c.speed_range),
            rotation: rng.gen::<f32>() * 360.0,
            rotation_speed: sample(rng, c.rotation_speed_range),
            shape: shapes[rng.gen_range(0..shapes.len())],
            color: (self.spawn_color)(rng),
        }
    }
}

fn sample(rng: &mut StdRng, (min, max): (f32, f32)) -> f32 {
    min + rng.gen::<f32>() * (max - min)
}

/// Build a pool with `config.count` particles spawned below the visible area.
pub fn init_pool(
    config: ParticleConfig,
    seed: u64,
    spawn_color: SpawnColor,
) -> Result<Pool, ConfigError> {
    config.validate()?;
    let count = config.count;
    let mut pool = Pool {
        config,
        particles: Vec::with_capacity(count),
        rng: StdRng::seed_from_u64(seed),
        spawn_color,
    };
    for id in 0..count {
        let p = pool.spawn(id);
        pool.particles.push(p);
    }
    log::debug!("[particles] {:?} pool of {count}", pool.config.kind);
    Ok(pool)
}

/// Advance every particle by `dt_sec`, measured in nominal 16 ms frames.
pub fn tick(mut pool: Pool, dt_sec: f32) -> Pool {
    pool.advance(dt_sec);
    pool
}

impl Pool {
    /// In-place form of [`tick`].
    pub fn advance(&mut self, dt_sec: f32) {
        let frames = if dt_sec.is_finite() && dt_sec > 0.0 {
            dt_sec * 1000.0 / FRAME_INTERVAL_MS as f32
        } else {
            0.0
        };
        if frames == 0.0 {
            return;
        }
        let kind = self.config.kind;
        let threshold = self.config.respawn_threshold();
        let fg_decay = FG_ALPHA_DECAY.powf(frames);
        for i in 0..self.particles.len() {
            let p = &mut self.particles[i];
            // drift uses the pre-move height
            let drift = (p.y / FG_DRIFT_WAVELENGTH).sin() * FG_DRIFT_AMPLITUDE * frames;
            p.y -= p.speed * frames;
            p.rotation = (p.rotation + p.rotation_speed * frames).rem_euclid(360.0);
            match kind {
                LayerKind::Background => {
                    p.alpha = ((p.y / BG_ALPHA_WAVELENGTH).sin() * 0.3 + 0.4)
                        .clamp(BG_ALPHA_RANGE.0, BG_ALPHA_RANGE.1);
                }
                LayerKind::Foreground => {
                    p.x += drift;
                    p.alpha = (p.alpha * fg_decay).clamp(FG_ALPHA_FLOOR, FG_ALPHA_RANGE.1);
                }
            }
            if p.y < threshold {
                let id = p.id;
                self.particles[i] = self.spawn(id);
            }
        }
    }
}

/// One quad per particle, ready for an instance buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub center: [f32; 2],
    pub size: f32,
    /// Radians.
    pub rotation: f32,
    pub color: [f32; 4],
    pub shape: u32,
    pub _pad: [u32; 3],
}

/// `pulse_scale` multiplies sizes in the output only.
pub fn render(pool: &Pool, pulse_scale: f32) -> Vec<ParticleInstance> {
    pool.particles
        .iter()
        .map(|p| ParticleInstance {
            center: [p.x, p.y],
            size: p.size * pulse_scale,
            rotation: p.rotation.to_radians(),
            color: [p.color[0], p.color[1], p.color[2], p.color[3] * p.alpha],
            shape: p.shape as u32,
            _pad: [0; 3],
        })
        .collect()
}

/// Pulse target for a layer: enlarged on even seconds.
pub fn pulse_target(kind: LayerKind, even_second: bool) -> f32 {
    match (kind, even_second) {
        (LayerKind::Background, true) => BG_PULSE_SCALE,
        (LayerKind::Foreground, true) => FG_PULSE_SCALE,
        (_, false) => 1.0,
    }
}
