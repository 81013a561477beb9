//! Procedural background generator.
//!
//! Two interchangeable strategies behind [`BackgroundRenderer`]:
//! [`MeshGradient`] is a CPU evaluation of the same mesh-gradient the GPU runs
//! from `shaders/background.wgsl`, and [`LayeredGradient`] is the cheap
//! three-radial-gradient fallback. Both are pure functions of
//! `(colors, time, breath)` and the pixel position.

use crate::color::{ping_pong, Rgb, DEEP_BACKGROUND};
use crate::constants::{
    BRIGHTNESS_BOOST, BREATH_BASE, BREATH_SPAN, GRADIENT_DRIFT_X, GRADIENT_DRIFT_Y,
    SATURATION_BOOST,
};
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Inputs shared by both strategies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundParams {
    pub colors: [Rgb; 3],
    /// Continuously increasing animation time in shader units.
    pub time: f32,
    pub breath: f32,
}

/// One breathing cycle per minute, phase-locked to the wall-clock second.
pub fn breath_scale(second: u32, millisecond: u32) -> f32 {
    let s = second as f32 + millisecond as f32 / 1000.0;
    BREATH_BASE + BREATH_SPAN * (TAU * s / 60.0).sin()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackgroundAlgorithm {
    #[default]
    Shader,
    Gradient,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackgroundFrame {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8.
    pub pixels: Vec<[u8; 4]>,
}

impl BackgroundFrame {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }
}

pub trait BackgroundRenderer {
    /// Colour at pixel centre `(x, y)` of a `width` x `height` canvas.
    fn sample(&self, x: f32, y: f32, width: f32, height: f32, params: &BackgroundParams) -> Rgb;

    fn render(&self, params: &BackgroundParams, width: u32, height: u32) -> BackgroundFrame {
        let (w, h) = (width as f32, height as f32);
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for py in 0..height {
            for px in 0..width {
                let c = self
                    .sample(px as f32 + 0.5, py as f32 + 0.5, w, h, params)
                    .clamped();
                pixels.push([to_u8(c.r), to_u8(c.g), to_u8(c.b), 255]);
            }
        }
        BackgroundFrame {
            width,
            height,
            pixels,
        }
    }
}

fn to_u8(v: f32) -> u8 {
    (v * 255.0).round() as u8
}

pub fn renderer_for(algorithm: BackgroundAlgorithm) -> Box<dyn BackgroundRenderer + Send + Sync> {
    match algorithm {
        BackgroundAlgorithm::Shader => Box::new(MeshGradient),
        BackgroundAlgorithm::Gradient => Box::new(LayeredGradient),
    }
}

pub fn render_background(
    renderer: &dyn BackgroundRenderer,
    colors: [Rgb; 3],
    time: f32,
    breath: f32,
    width: u32,
    height: u32,
) -> BackgroundFrame {
    renderer.render(
        &BackgroundParams {
            colors,
            time,
            breath,
        },
        width,
        height,
    )
}

// ---------------------------------------------------------------------------
// Mesh gradient

#[derive(Clone, Copy, Debug, Default)]
pub struct MeshGradient;

/// `(base point, orbit angular speeds, orbit radius)` per mesh centre.
const MESH_CENTERS: [([f32; 2], [f32; 2], f32); 4] = [
    ([0.15, 0.25], [0.35, 0.25], 0.15),
    ([0.85, 0.75], [0.3, 0.4], 0.15),
    ([0.5, 0.5], [0.25, 0.35], 0.08),
    ([0.7, 0.2], [0.2, 0.3], 0.1),
];

impl MeshGradient {
    /// Centre positions in uv space for the given time and breath.
    pub fn centers(time: f32, breath: f32) -> [Vec2; 4] {
        let orbit = |i: usize, sin_first: bool| {
            let (base, speed, radius) = MESH_CENTERS[i];
            let (a, b) = (time * speed[0], time * speed[1]);
            let d = if sin_first {
                Vec2::new(a.sin(), b.cos())
            } else {
                Vec2::new(a.cos(), b.sin())
            };
            Vec2::from(base) + d * radius * breath
        };
        [orbit(0, true), orbit(1, false), orbit(2, true), orbit(3, false)]
    }
}

impl BackgroundRenderer for MeshGradient {
    fn sample(&self, x: f32, y: f32, width: f32, height: f32, p: &BackgroundParams) -> Rgb {
        let uv = Vec2::new(x / width.max(1.0), y / height.max(1.0));
        let t = p.time;
        let n1 = snoise(uv * 2.0 + Vec2::splat(t * 0.12)) * 0.5 + 0.5;
        let n2 = snoise(uv * 3.0 - Vec2::splat(t * 0.18)) * 0.5 + 0.5;
        let n3 = snoise(uv * 1.5 + Vec2::splat(t * 0.1)) * 0.5 + 0.5;
        let n4 = snoise(uv * 4.0 + Vec2::splat(t * 0.08)) * 0.5 + 0.5;

        let c = Self::centers(t, p.breath);
        let mut w1 = smoothstep(1.2, 0.0, uv.distance(c[0]) * 1.3) * (0.6 + n1 * 0.4);
        let mut w2 = smoothstep(1.2, 0.0, uv.distance(c[1]) * 1.3) * (0.6 + n2 * 0.4);
        let mut w3 = smoothstep(1.0, 0.0, uv.distance(c[2]) * 1.4) * (0.7 + n3 * 0.3);
        let mut w4 = smoothstep(0.8, 0.0, uv.distance(c[3]) * 1.5) * (0.5 + n4 * 0.5);
        let total = w1 + w2 + w3 + w4 + 0.001;
        w1 /= total;
        w2 /= total;
        w3 /= total;
        w4 /= total;

        let [c1, c2, c3] = p.colors.map(|c| Vec3::from(c.to_array()));
        let mut color = c1 * w1 + c2 * w2 + c3 * w3;
        let accent = c1.lerp(c2, 0.5) * 1.3;
        color = color.lerp(accent, w4 * 0.3);

        let gray = color.dot(Vec3::new(0.299, 0.587, 0.114));
        color = Vec3::splat(gray).lerp(color, SATURATION_BOOST);

        let vignette = 1.0 - smoothstep(0.5, 1.1, (uv - Vec2::splat(0.5)).length());
        color *= 0.75 + vignette * 0.25;
        color *= BRIGHTNESS_BOOST;
        Rgb::new(color.x, color.y, color.z)
    }
}

/// GLSL-style smoothstep; also valid with `e0 > e1`.
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn floor3(v: Vec3) -> Vec3 {
    Vec3::new(v.x.floor(), v.y.floor(), v.z.floor())
}

fn mod289_3(x: Vec3) -> Vec3 {
    x - floor3(x * (1.0 / 289.0)) * 289.0
}

fn mod289_2(x: Vec2) -> Vec2 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

fn permute(x: Vec3) -> Vec3 {
    mod289_3((x * 34.0 + Vec3::ONE) * x)
}

/// 2D simplex noise in roughly `[-1, 1]`.
pub fn snoise(v: Vec2) -> f32 {
    const C: [f32; 4] = [
        0.211_324_87, // (3 - sqrt(3)) / 6
        0.366_025_4,  // (sqrt(3) - 1) / 2
        -0.577_350_26,
        0.024_390_243, // 1 / 41
    ];
    let i = (v + Vec2::splat(v.dot(Vec2::splat(C[1])))).floor();
    let x0 = v - i + Vec2::splat(i.dot(Vec2::splat(C[0])));
    let i1 = if x0.x > x0.y {
        Vec2::new(1.0, 0.0)
    } else {
        Vec2::new(0.0, 1.0)
    };
    let x12_xy = x0 + Vec2::splat(C[0]) - i1;
    let x12_zw = x0 + Vec2::splat(C[2]);
    let i = mod289_2(i);
    let p = permute(
        permute(Vec3::splat(i.y) + Vec3::new(0.0, i1.y, 1.0))
            + Vec3::splat(i.x)
            + Vec3::new(0.0, i1.x, 1.0),
    );
    let mut m = (Vec3::splat(0.5)
        - Vec3::new(x0.dot(x0), x12_xy.dot(x12_xy), x12_zw.dot(x12_zw)))
    .max(Vec3::ZERO);
    m = m * m;
    m = m * m;
    let pw = p * C[3];
    let x = (pw - floor3(pw)) * 2.0 - Vec3::ONE;
    let h = x.abs() - Vec3::splat(0.5);
    let ox = floor3(x + Vec3::splat(0.5));
    let a0 = x - ox;
    m *= Vec3::splat(1.792_842_9) - (a0 * a0 + h * h) * 0.853_734_7;
    let g = Vec3::new(
        a0.x * x0.x + h.x * x0.y,
        a0.y * x12_xy.x + h.y * x12_xy.y,
        a0.z * x12_zw.x + h.z * x12_zw.y,
    );
    130.0 * m.dot(g)
}

// ---------------------------------------------------------------------------
// Layered radial fallback

#[derive(Clone, Copy, Debug, Default)]
pub struct LayeredGradient;

/// `(centre, radius, alpha)` in pixels for each layer, bottom first.
pub type GradientLayer = ([f32; 2], f32, f32);

impl LayeredGradient {
    /// Drift offsets sweep back and forth (0..100 px over 20 s, 0..80 px over
    /// 15 s), driven by the same time scalar as the mesh gradient.
    pub fn layers(width: f32, height: f32, p: &BackgroundParams) -> [GradientLayer; 3] {
        let secs = f64::from(p.time) / crate::constants::BACKGROUND_TIME_PER_SEC;
        let off_x = GRADIENT_DRIFT_X.0 * ping_pong(secs, GRADIENT_DRIFT_X.1);
        let off_y = GRADIENT_DRIFT_Y.0 * ping_pong(secs, GRADIENT_DRIFT_Y.1);
        let max_dim = width.max(height);
        [
            (
                [width * 0.2 + off_x, height * 0.3 + off_y],
                max_dim * 0.8,
                0.8 * p.breath,
            ),
            (
                [width * 0.8 - off_x, height * 0.7 - off_y],
                max_dim * 0.7,
                0.6 * p.breath,
            ),
            ([width * 0.5, height * 0.5], max_dim * 0.6, 0.5 * p.breath),
        ]
    }
}

impl BackgroundRenderer for LayeredGradient {
    fn sample(&self, x: f32, y: f32, width: f32, height: f32, p: &BackgroundParams) -> Rgb {
        let mut out = DEEP_BACKGROUND;
        for (color, (center, radius, alpha)) in
            p.colors.iter().zip(Self::layers(width, height, p))
        {
            let d = Vec2::new(x, y).distance(Vec2::from(center));
            let falloff = if radius > 0.0 {
                (1.0 - d / radius).max(0.0)
            } else {
                0.0
            };
            out = color.over(out, (alpha * falloff).clamp(0.0, 1.0));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Mode-specific fills and GPU uniforms

/// What the background layer paints for the active mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BackgroundFill {
    /// Procedural mesh gradient (or its fallback) from a palette.
    Mesh([Rgb; 3]),
    /// Flat colour at the given opacity over the deep background.
    Solid { color: Rgb, alpha: f32 },
    /// Top-to-bottom sky gradient.
    Vertical { top: Rgb, bottom: Rgb },
    /// Leet mode: plain black under the matrix rain.
    Black,
}

impl BackgroundFill {
    pub fn kind_index(&self) -> u32 {
        match self {
            Self::Mesh(_) => 0,
            Self::Solid { .. } => 1,
            Self::Vertical { .. } => 2,
            Self::Black => 3,
        }
    }
}

/// Uniform block consumed by `shaders/background.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BackgroundUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub breath: f32,
    pub color1: [f32; 4],
    pub color2: [f32; 4],
    pub color3: [f32; 4],
    pub offset: [f32; 2],
    pub alpha: f32,
    pub fill: u32,
}

impl BackgroundUniforms {
    pub fn new(
        fill: &BackgroundFill,
        time: f32,
        breath: f32,
        resolution: [f32; 2],
        offset: [f32; 2],
        alpha: f32,
    ) -> Self {
        let (c1, c2, c3) = match *fill {
            BackgroundFill::Mesh([a, b, c]) => (a.to_rgba(1.0), b.to_rgba(1.0), c.to_rgba(1.0)),
            BackgroundFill::Solid { color, alpha: a } => {
                (color.to_rgba(a), DEEP_BACKGROUND.to_rgba(1.0), [0.0; 4])
            }
            BackgroundFill::Vertical { top, bottom } => {
                (top.to_rgba(1.0), bottom.to_rgba(1.0), [0.0; 4])
            }
            BackgroundFill::Black => ([0.0, 0.0, 0.0, 1.0], [0.0; 4], [0.0; 4]),
        };
        Self {
            resolution,
            time,
            breath,
            color1: c1,
            color2: c2,
            color3: c3,
            offset,
            alpha,
            fill: fill.kind_index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_bounded() {
        for i in 0..200 {
            let v = Vec2::new(i as f32 * 0.37 - 20.0, i as f32 * 0.11 + 3.0);
            let n = snoise(v);
            assert!((-1.05..=1.05).contains(&n), "snoise({v}) = {n}");
        }
    }

    #[test]
    fn uniforms_are_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<BackgroundUniforms>() % 16, 0);
    }
}
