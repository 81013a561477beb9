//! Glass compositor.
//!
//! Stacks one frame's layers in a fixed back-to-front order and flattens
//! them into screen-space [`SpriteInstance`]s for `shaders/sprites.wgsl`.
//! The background layer is not a sprite; it travels as
//! [`BackgroundUniforms`] to `shaders/background.wgsl`.

use bytemuck::{Pod, Zeroable};
use smallvec::SmallVec;
use std::f32::consts::FRAC_PI_6;

use crate::background::{
    BackgroundAlgorithm, BackgroundFill, BackgroundParams, BackgroundUniforms, LayeredGradient,
};
use crate::color::{
    fast_out_slow_in, parse_hex_or_neutral, ping_pong, Rgb, BERLIN_OFF, BINARY_OFF, BINARY_ON,
    DEEP_BACKGROUND, FLUID_DEEP, FLUID_LIGHT, SWATCH_GREEN,
};
use crate::constants::*;
use crate::controller::UiState;
use crate::modes::berlin::Lamp;
use crate::modes::solar::background_sky;
use crate::modes::{hex, swatch, ClockMode, ModeVisual};
use crate::particles::{ParticleInstance, ParticleShape};
use crate::tilt::TiltVector;
use crate::time::TimeSample;

pub const TITLE: &str = "CHRONOTIME";
pub const TITLE_LEET: &str = "ROOT@CHRONOTIME:~#";
pub const SUBTITLE: &str = "TIME IN MOTION";

/// Shape codes understood by `fs_sprite` beyond the particle shapes.
pub mod shape {
    pub const ROUNDED_RECT: u32 = 7;
    pub const GLOW: u32 = 8;
    pub const SHEEN: u32 = 9;
}

/// One instanced quad. Field order matches the vertex buffer layout of
/// `vs_sprite` (locations 1..=7).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub center: [f32; 2],
    pub half_extent: [f32; 2],
    pub color: [f32; 4],
    /// Radians.
    pub rotation: f32,
    pub shape: u32,
    /// Px; only read by rounded rects.
    pub corner_radius: f32,
    /// Px border width; only read by rounded rects.
    pub border: f32,
}

impl SpriteInstance {
    pub fn rect(
        center: [f32; 2],
        half_extent: [f32; 2],
        color: [f32; 4],
        corner_radius: f32,
    ) -> Self {
        Self {
            center,
            half_extent,
            color,
            shape: shape::ROUNDED_RECT,
            corner_radius,
            ..Self::default()
        }
    }

    pub fn disc(center: [f32; 2], radius: f32, color: [f32; 4]) -> Self {
        Self::rect(center, [radius, radius], color, radius)
    }

    pub fn glow(center: [f32; 2], half_extent: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            center,
            half_extent,
            color,
            shape: shape::GLOW,
            ..Self::default()
        }
    }

    /// Particle sizes are diameters.
    pub fn from_particle(p: &ParticleInstance, offset: [f32; 2]) -> Self {
        let half = p.size * 0.5;
        Self {
            center: [p.center[0] + offset[0], p.center[1] + offset[1]],
            half_extent: [half, half],
            color: p.color,
            rotation: p.rotation,
            shape: p.shape,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Layers

/// Back-to-front stacking order. Declaration order is the paint order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerId {
    Background,
    MidParticles,
    Reflection,
    GlassCard,
    ForegroundParticles,
    Chrome,
}

impl LayerId {
    pub const ORDER: [Self; 6] = [
        Self::Background,
        Self::MidParticles,
        Self::Reflection,
        Self::GlassCard,
        Self::ForegroundParticles,
        Self::Chrome,
    ];

    /// Layers the glass card frosts. Foreground particles and chrome stay
    /// sharp on top of it.
    pub fn is_behind_glass(self) -> bool {
        self < Self::GlassCard
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    /// Parallax translation already applied to `sprites`.
    pub offset: [f32; 2],
    pub sprites: Vec<SpriteInstance>,
}

// ---------------------------------------------------------------------------
// Glass

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GlassStyle {
    Plain,
    /// Dark card with a coloured hairline border.
    Neon { border: Rgb },
    /// Frosted card with a coloured glow behind it.
    Liquid { glow: Rgb },
}

pub fn glass_style_for(mode: ClockMode) -> GlassStyle {
    match mode {
        ClockMode::Unix => GlassStyle::Neon {
            border: Rgb::from_u32(0x00FF00),
        },
        ClockMode::Swatch => GlassStyle::Neon {
            border: SWATCH_GREEN,
        },
        other => GlassStyle::Liquid {
            glow: other.palette().primary,
        },
    }
}

/// Worst-case (brightest) colour the card can sit on for a given fill.
pub fn backdrop_estimate(fill: &BackgroundFill) -> Rgb {
    let base = match *fill {
        BackgroundFill::Mesh(colors) => colors
            .into_iter()
            .max_by(|a, b| a.relative_luminance().total_cmp(&b.relative_luminance()))
            .unwrap_or(DEEP_BACKGROUND)
            .scale(BRIGHTNESS_BOOST * SATURATION_BOOST)
            .clamped(),
        BackgroundFill::Solid { color, alpha } => color.over(DEEP_BACKGROUND, alpha),
        BackgroundFill::Vertical { top, bottom } => {
            if top.relative_luminance() > bottom.relative_luminance() {
                top
            } else {
                bottom
            }
        }
        BackgroundFill::Black => Rgb::BLACK,
    };
    // particles and sheen add a little light
    Rgb::WHITE.over(base, 0.1)
}

/// Resolved card surface for one backdrop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlassCard {
    pub style: GlassStyle,
    /// Opacity of the dark scrim over the frosted backdrop.
    pub scrim: f32,
    pub blur_radius: f32,
}

impl GlassCard {
    /// Raise the scrim until white content clears the minimum contrast.
    pub fn resolve(style: GlassStyle, backdrop: Rgb) -> Self {
        let (mut scrim, blur_radius) = match style {
            GlassStyle::Neon { .. } => (NEON_GLASS_SCRIM, NEON_BLUR_RADIUS),
            GlassStyle::Liquid { .. } => (LIQUID_GLASS_SCRIM, LIQUID_BLUR_RADIUS),
            GlassStyle::Plain => (LIQUID_GLASS_SCRIM, 0.0),
        };
        while scrim < 1.0
            && Self::surface_at(backdrop, scrim).contrast_ratio(Rgb::WHITE) < GLASS_MIN_CONTRAST
        {
            scrim = (scrim + GLASS_SCRIM_STEP).min(1.0);
        }
        Self {
            style,
            scrim,
            blur_radius,
        }
    }

    fn surface_at(backdrop: Rgb, scrim: f32) -> Rgb {
        let frosted = Rgb::WHITE.over(backdrop, GLASS_FROST);
        DEEP_BACKGROUND.over(frosted, scrim)
    }

    /// Colour of the card body over `backdrop`.
    pub fn surface(&self, backdrop: Rgb) -> Rgb {
        Self::surface_at(backdrop, self.scrim)
    }

    /// Contrast of white content against the card body.
    pub fn content_contrast(&self, backdrop: Rgb) -> f32 {
        self.surface(backdrop).contrast_ratio(Rgb::WHITE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardRect {
    pub center: [f32; 2],
    pub half_extent: [f32; 2],
}

impl CardRect {
    pub fn for_canvas(canvas: [f32; 2]) -> Self {
        let w = (canvas[0] * 0.86).min(CARD_MAX_SIZE[0]);
        let h = (canvas[1] * 0.5).min(CARD_MAX_SIZE[1]);
        Self {
            center: [canvas[0] * 0.5, canvas[1] * 0.5],
            half_extent: [w * 0.5, h * 0.5],
        }
    }

    /// Size of the area inside the padding, handed to the mode renderers.
    pub fn content_size(&self) -> [f32; 2] {
        [
            (self.half_extent[0] * 2.0 - CARD_PADDING * 2.0).max(1.0),
            (self.half_extent[1] * 2.0 - CARD_PADDING * 2.0).max(1.0),
        ]
    }

    pub fn content_origin(&self) -> [f32; 2] {
        [
            self.center[0] - self.half_extent[0] + CARD_PADDING,
            self.center[1] - self.half_extent[1] + CARD_PADDING,
        ]
    }

    fn translated(self, by: [f32; 2]) -> Self {
        Self {
            center: [self.center[0] + by[0], self.center[1] + by[1]],
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// Motion

/// Card transform while the pager is between pages. `offset` is the signed
/// page fraction in `[-1, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageTransform {
    pub scale: f32,
    pub scale_y: f32,
    pub alpha: f32,
    /// Degrees.
    pub rotation: f32,
    pub translate_y: f32,
}

impl Default for PageTransform {
    fn default() -> Self {
        Self::from_offset(0.0)
    }
}

impl PageTransform {
    pub fn from_offset(offset: f32) -> Self {
        let offset = if offset.is_finite() {
            offset.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let a = offset.abs();
        let scale = 1.0 - PAGE_SCALE_SHRINK * a;
        Self {
            scale,
            scale_y: scale + PAGE_STRETCH_Y * a,
            alpha: 1.0 - PAGE_FADE * a,
            rotation: PAGE_ROTATION_DEG * offset,
            translate_y: PAGE_TRANSLATE_Y * a,
        }
    }

    /// Apply around `pivot`, with an extra uniform `card_scale`.
    pub fn apply(&self, pivot: [f32; 2], card_scale: f32, s: SpriteInstance) -> SpriteInstance {
        let sx = self.scale * card_scale;
        let sy = self.scale_y * card_scale;
        let rad = self.rotation.to_radians();
        let (sin, cos) = rad.sin_cos();
        let dx = (s.center[0] - pivot[0]) * sx;
        let dy = (s.center[1] - pivot[1]) * sy;
        let mut color = s.color;
        color[3] *= self.alpha;
        SpriteInstance {
            center: [
                pivot[0] + dx * cos - dy * sin,
                pivot[1] + dx * sin + dy * cos + self.translate_y,
            ],
            half_extent: [s.half_extent[0] * sx, s.half_extent[1] * sy],
            rotation: s.rotation + rad,
            corner_radius: s.corner_radius * sx.min(sy),
            color,
            ..s
        }
    }
}

/// Per-layer parallax translations, px.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Parallax {
    pub background: [f32; 2],
    pub mid: [f32; 2],
    pub card: [f32; 2],
    pub foreground: [f32; 2],
}

pub fn is_compact(canvas: [f32; 2]) -> bool {
    canvas[0] < COMPACT_WIDTH || canvas[1] < COMPACT_HEIGHT
}

pub fn parallax(tilt: TiltVector, canvas: [f32; 2]) -> Parallax {
    let gain = if is_compact(canvas) {
        PARALLAX_GAIN_COMPACT
    } else {
        PARALLAX_GAIN
    };
    let base = [tilt.roll * gain, tilt.pitch * gain];
    let scaled = |k: f32| [base[0] * k, base[1] * k];
    Parallax {
        background: base,
        mid: scaled(0.5),
        card: scaled(-0.5),
        foreground: scaled(-1.0 / 3.0),
    }
}

/// Moving sheen on the glass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reflection {
    pub offset: [f32; 2],
    /// Eased 0..1 sweep, one way every three seconds.
    pub shimmer: f32,
    pub alpha: f32,
}

pub fn reflection(tilt: TiltVector, clock_sec: f64) -> Reflection {
    let shimmer = fast_out_slow_in(ping_pong(clock_sec, REFLECTION_SHIMMER_PERIOD_SEC));
    Reflection {
        offset: [tilt.roll * REFLECTION_GAIN, tilt.pitch * REFLECTION_GAIN],
        shimmer,
        alpha: 0.06 + 0.06 * shimmer,
    }
}

fn reflection_sprites(r: &Reflection, card: CardRect) -> Vec<SpriteInstance> {
    let [hw, hh] = card.half_extent;
    let sweep = (r.shimmer - 0.5) * hw * 2.0;
    let white = |a: f32| Rgb::WHITE.to_rgba(a);
    vec![
        SpriteInstance {
            center: [
                card.center[0] + r.offset[0] + sweep,
                card.center[1] + r.offset[1],
            ],
            half_extent: [hw * 1.4, hh * 0.18],
            color: white(r.alpha),
            rotation: -FRAC_PI_6,
            shape: shape::SHEEN,
            ..SpriteInstance::default()
        },
        SpriteInstance::glow(
            [
                card.center[0] - hw * 0.6 + r.offset[0] * 0.5,
                card.center[1] - hh * 0.6 + r.offset[1] * 0.5,
            ],
            [hw * 0.5, hw * 0.5],
            white(r.alpha * 1.5),
        ),
        SpriteInstance::glow(
            [
                card.center[0] + hw * 0.7 - r.offset[0] * 0.3,
                card.center[1] + hh * 0.7 - r.offset[1] * 0.3,
            ],
            [hw * 0.3, hw * 0.3],
            white(r.alpha),
        ),
    ]
}

// ---------------------------------------------------------------------------
// Backgrounds per mode

pub fn background_fill_for(mode: ClockMode, t: &TimeSample, leet: bool) -> BackgroundFill {
    if leet {
        return BackgroundFill::Black;
    }
    match mode {
        ClockMode::Hex => BackgroundFill::Solid {
            color: parse_hex_or_neutral(&hex::hex_string(t)),
            alpha: 0.7,
        },
        ClockMode::Solar => {
            let (top, bottom) = background_sky(t.hour);
            BackgroundFill::Vertical { top, bottom }
        }
        other => BackgroundFill::Mesh(other.palette().gradient),
    }
}

// ---------------------------------------------------------------------------
// Card content

fn lamp_color(l: &Lamp) -> [f32; 4] {
    if l.on {
        l.color.to_rgba(1.0)
    } else {
        BERLIN_OFF.to_rgba(0.6)
    }
}

/// Shapes drawn inside the card; text is left to the host.
pub fn content_sprites(visual: &ModeVisual, card: CardRect) -> Vec<SpriteInstance> {
    let [ox, oy] = card.content_origin();
    let [w, h] = card.content_size();
    let mut out = Vec::new();
    match visual {
        ModeVisual::Standard(v) => {
            if let Some(p) = v.progress {
                let bar_w = w * 0.5;
                out.push(SpriteInstance::rect(
                    [ox + w * 0.5, oy + h * 0.8],
                    [bar_w, 2.0],
                    [1.0, 1.0, 1.0, 0.2],
                    2.0,
                ));
                let fill = bar_w * p.clamp(0.0, 1.0);
                out.push(SpriteInstance::rect(
                    [ox + w * 0.5 - bar_w + fill, oy + h * 0.8],
                    [fill.max(0.5), 2.0],
                    ClockMode::Standard.palette().primary.to_rgba(0.9),
                    2.0,
                ));
            }
        }
        ModeVisual::Hex(v) => {
            out.push(SpriteInstance::glow(
                [ox + w * 0.5, oy + h * 0.5],
                [w * 0.4, h * 0.4],
                v.color.to_rgba(0.5),
            ));
        }
        ModeVisual::Berlin(v) => {
            let row_h = h / 6.0;
            out.push(SpriteInstance::disc(
                [ox + w * 0.5, oy + row_h * 0.5],
                row_h * 0.4,
                lamp_color(&v.seconds),
            ));
            let rows: [&[Lamp]; 4] = [&v.five_hours, &v.hours, &v.five_minutes, &v.minutes];
            for (r, lamps) in rows.iter().enumerate() {
                let cell = w / lamps.len() as f32;
                let cy = oy + row_h * (r as f32 + 1.5);
                for (i, lamp) in lamps.iter().enumerate() {
                    out.push(SpriteInstance::rect(
                        [ox + cell * (i as f32 + 0.5), cy],
                        [cell * 0.42, row_h * 0.38],
                        lamp_color(lamp),
                        4.0,
                    ));
                }
            }
        }
        ModeVisual::Binary(v) => {
            let col_w = w / 6.0;
            let cell_h = h / 5.0;
            let radius = col_w.min(cell_h) * 0.3;
            for (c, col) in v.columns.iter().enumerate() {
                let skip = 4 - col.bits.len();
                for (b, &on) in col.bits.iter().enumerate() {
                    let color = if on {
                        BINARY_ON.to_rgba(1.0)
                    } else {
                        BINARY_OFF.to_rgba(0.8)
                    };
                    out.push(SpriteInstance::disc(
                        [
                            ox + col_w * (c as f32 + 0.5),
                            oy + cell_h * ((skip + b) as f32 + 1.5),
                        ],
                        radius,
                        color,
                    ));
                }
            }
        }
        ModeVisual::Swatch(v) => {
            let seg = w / swatch::BAR_SEGMENTS as f32;
            for i in 0..swatch::BAR_SEGMENTS {
                let color = if i < v.filled_segments {
                    SWATCH_GREEN.to_rgba(0.9)
                } else {
                    SWATCH_GREEN.to_rgba(0.15)
                };
                out.push(SpriteInstance::rect(
                    [ox + seg * (i as f32 + 0.5), oy + h * 0.8],
                    [seg * 0.4, 6.0],
                    color,
                    2.0,
                ));
            }
        }
        ModeVisual::Unix(_) => {}
        ModeVisual::Synesthesia(v) => {
            let cell = w / 6.0;
            for (i, c) in v.colors.iter().enumerate() {
                out.push(SpriteInstance::rect(
                    [ox + cell * (i as f32 + 0.5), oy + h * 0.5],
                    [cell * 0.4, h * 0.25],
                    c.to_rgba(0.85),
                    8.0,
                ));
            }
        }
        ModeVisual::Solar(v) => {
            let radius = (w * 0.45).min(h * 0.7);
            let base = [ox + w * 0.5, oy + h * 0.8];
            let at = |p: [f32; 2]| [base[0] + p[0] * radius, base[1] - p[1] * radius];
            for (_, p) in &v.markers {
                out.push(SpriteInstance::disc(at(*p), 3.0, [1.0, 1.0, 1.0, 0.5]));
            }
            let sun = at(v.sun);
            out.push(SpriteInstance::glow(sun, [28.0, 28.0], v.phase.sun_color().to_rgba(0.6)));
            out.push(SpriteInstance::disc(sun, 10.0, v.phase.sun_color().to_rgba(1.0)));
        }
        ModeVisual::Hourglass(v) => {
            let s = &v.surface;
            let sx = w / s.width.max(1.0);
            let sy = h / s.height.max(1.0);
            for (i, &top) in s.samples.iter().enumerate() {
                let x = s.sample_x(i);
                let depth = (s.height - top).max(0.0);
                let t = if s.height > 0.0 { depth / s.height } else { 0.0 };
                out.push(SpriteInstance::rect(
                    [ox + x * sx, oy + (top + depth * 0.5) * sy],
                    [FLUID_SAMPLE_STEP * 0.5 * sx + 0.5, depth * 0.5 * sy],
                    FLUID_LIGHT.lerp(FLUID_DEEP, t).to_rgba(0.75),
                    0.0,
                ));
            }
            for b in &s.bubbles {
                out.push(SpriteInstance {
                    center: [ox + b.x * sx, oy + b.y * sy],
                    half_extent: [b.radius, b.radius],
                    color: Rgb::WHITE.to_rgba(b.alpha),
                    shape: ParticleShape::Ring as u32,
                    ..SpriteInstance::default()
                });
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Chrome

#[derive(Clone, Debug, PartialEq)]
pub struct Chrome {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub page_count: usize,
    pub active_page: usize,
    pub mode_name: &'static str,
    pub tagline: &'static str,
    /// `(active, count)` when the mode has more than one variant.
    pub variant: Option<(usize, usize)>,
    pub swipe_hint: bool,
}

impl Chrome {
    pub fn new(mode: ClockMode, variant: usize, ui: &UiState) -> Self {
        let max = mode.max_variants();
        Self {
            title: if ui.leet_mode_active { TITLE_LEET } else { TITLE },
            subtitle: SUBTITLE,
            page_count: ClockMode::COUNT,
            active_page: mode.index(),
            mode_name: mode.name(),
            tagline: mode.tagline(),
            variant: (max > 1).then_some((variant.min(max - 1), max)),
            swipe_hint: !ui.has_swiped,
        }
    }

    fn sprites(&self, canvas: [f32; 2], card: CardRect) -> Vec<SpriteInstance> {
        let mut out = Vec::with_capacity(self.page_count + 4);
        let spacing = 14.0;
        let y = canvas[1] - 40.0;
        let x0 = canvas[0] * 0.5 - spacing * (self.page_count as f32 - 1.0) * 0.5;
        for i in 0..self.page_count {
            let active = i == self.active_page;
            let half = if active { [9.0, 3.0] } else { [3.0, 3.0] };
            let alpha = if active { 0.9 } else { 0.3 };
            out.push(SpriteInstance::rect(
                [x0 + spacing * i as f32, y],
                half,
                Rgb::WHITE.to_rgba(alpha),
                3.0,
            ));
        }
        if let Some((active, count)) = self.variant {
            let vy = card.center[1] + card.half_extent[1] + 20.0;
            let vx0 = canvas[0] * 0.5 - 10.0 * (count as f32 - 1.0) * 0.5;
            for i in 0..count {
                let alpha = if i == active { 0.8 } else { 0.25 };
                out.push(SpriteInstance::disc(
                    [vx0 + 10.0 * i as f32, vy],
                    2.5,
                    Rgb::WHITE.to_rgba(alpha),
                ));
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Frame

/// Everything the compositor reads for one frame.
#[derive(Clone, Debug)]
pub struct Scene {
    pub canvas: [f32; 2],
    pub time: TimeSample,
    pub variant: usize,
    pub visual: ModeVisual,
    pub fill: BackgroundFill,
    pub algorithm: BackgroundAlgorithm,
    pub background_time: f32,
    pub breath: f32,
    pub pulse_alpha: f32,
    pub mid: Vec<ParticleInstance>,
    pub foreground: Vec<ParticleInstance>,
    /// Spring-smoothed.
    pub tilt: TiltVector,
    /// Seconds since attach, for the shimmer.
    pub clock_sec: f64,
    pub page_offset: f32,
    pub card_scale: f32,
    pub ui: UiState,
}

#[derive(Clone, Debug)]
pub struct Frame {
    pub time: TimeSample,
    pub mode: ClockMode,
    pub visual: ModeVisual,
    pub background: BackgroundUniforms,
    pub fill: BackgroundFill,
    pub card: GlassCard,
    pub card_rect: CardRect,
    pub page: PageTransform,
    pub reflection: Reflection,
    /// Painted back to front.
    pub layers: SmallVec<[Layer; 6]>,
    /// `None` when the card style does not frost.
    pub blur: Option<GlassBlur>,
    /// `None` in focus mode.
    pub chrome: Option<Chrome>,
    pub focus_indicator: bool,
}

impl Frame {
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_ids(&self) -> SmallVec<[LayerId; 6]> {
        self.layers.iter().map(|l| l.id).collect()
    }

    /// Sprite layers flattened in paint order.
    pub fn sprites(&self) -> Vec<SpriteInstance> {
        self.sprites_where(|_| true)
    }

    /// What the card frosts: everything painted before it.
    pub fn sprites_behind_glass(&self) -> Vec<SpriteInstance> {
        self.sprites_where(LayerId::is_behind_glass)
    }

    /// The card itself and everything drawn sharp on top of it.
    pub fn sprites_over_glass(&self) -> Vec<SpriteInstance> {
        self.sprites_where(|id| !id.is_behind_glass())
    }

    fn sprites_where(&self, keep: impl Fn(LayerId) -> bool) -> Vec<SpriteInstance> {
        self.layers
            .iter()
            .filter(|l| keep(l.id))
            .flat_map(|l| l.sprites.iter().copied())
            .collect()
    }

    pub fn headline(&self) -> String {
        self.visual.headline()
    }
}

/// Frosting pass for the glass card. The host renders `layers` (the
/// background uniforms plus their sprites) offscreen, blurs the result by
/// `radius` px and samples it inside `mask` before drawing the card body.
#[derive(Clone, Debug, PartialEq)]
pub struct GlassBlur {
    pub radius: f32,
    /// Card outline after the page transform; `color[3]` is the page fade.
    pub mask: SpriteInstance,
    pub layers: SmallVec<[LayerId; 3]>,
}

impl GlassBlur {
    fn for_card(
        card: &GlassCard,
        rect: CardRect,
        page: &PageTransform,
        card_scale: f32,
        layers: &[Layer],
    ) -> Option<Self> {
        if card.blur_radius <= 0.0 {
            return None;
        }
        let outline =
            SpriteInstance::rect(rect.center, rect.half_extent, [1.0; 4], GLASS_CORNER_RADIUS);
        Some(Self {
            radius: card.blur_radius,
            mask: page.apply(rect.center, card_scale, outline),
            layers: layers
                .iter()
                .map(|l| l.id)
                .filter(|id| id.is_behind_glass())
                .collect(),
        })
    }
}

fn gradient_sprites(
    params: &BackgroundParams,
    canvas: [f32; 2],
    offset: [f32; 2],
    alpha: f32,
) -> Vec<SpriteInstance> {
    params
        .colors
        .iter()
        .zip(LayeredGradient::layers(canvas[0], canvas[1], params))
        .map(|(color, (center, radius, a))| SpriteInstance {
            center: [center[0] + offset[0], center[1] + offset[1]],
            half_extent: [radius, radius],
            color: color.to_rgba((a * alpha).clamp(0.0, 1.0)),
            shape: ParticleShape::Circle as u32,
            ..SpriteInstance::default()
        })
        .collect()
}

fn particle_layer(id: LayerId, particles: &[ParticleInstance], offset: [f32; 2]) -> Layer {
    Layer {
        id,
        offset,
        sprites: particles
            .iter()
            .map(|p| SpriteInstance::from_particle(p, offset))
            .collect(),
    }
}

fn card_sprites(card: &GlassCard, rect: CardRect) -> Vec<SpriteInstance> {
    let mut out = Vec::with_capacity(3);
    if let GlassStyle::Liquid { glow } = card.style {
        out.push(SpriteInstance::glow(
            rect.center,
            [rect.half_extent[0] * 1.15, rect.half_extent[1] * 1.15],
            glow.to_rgba(0.25),
        ));
    }
    out.push(SpriteInstance::rect(
        rect.center,
        rect.half_extent,
        Rgb::WHITE.to_rgba(GLASS_FROST),
        GLASS_CORNER_RADIUS,
    ));
    let mut body = SpriteInstance::rect(
        rect.center,
        rect.half_extent,
        DEEP_BACKGROUND.to_rgba(card.scrim),
        GLASS_CORNER_RADIUS,
    );
    body.border = 1.0;
    out.push(body);
    if let GlassStyle::Neon { border } = card.style {
        let mut edge = SpriteInstance::rect(
            rect.center,
            rect.half_extent,
            border.to_rgba(0.0),
            GLASS_CORNER_RADIUS,
        );
        edge.border = 2.0;
        out.push(edge);
    }
    out
}

/// Build one frame. Layers come out in [`LayerId::ORDER`]; focus mode
/// drops the particle layers and the chrome.
pub fn compose(scene: Scene) -> Frame {
    let mode = scene.visual.mode();
    let parallax = parallax(scene.tilt, scene.canvas);
    let page = PageTransform::from_offset(scene.page_offset);
    let style = if scene.ui.leet_mode_active {
        GlassStyle::Plain
    } else {
        glass_style_for(mode)
    };
    let card = GlassCard::resolve(style, backdrop_estimate(&scene.fill));
    let rect = CardRect::for_canvas(scene.canvas).translated(parallax.card);
    let refl = reflection(scene.tilt, scene.clock_sec);
    let focus = scene.ui.focus_mode;

    // The fallback paints its radial layers as sprites over a flat base.
    let (gpu_fill, background_sprites) = match (scene.algorithm, scene.fill) {
        (BackgroundAlgorithm::Gradient, BackgroundFill::Mesh(colors)) => {
            let params = BackgroundParams {
                colors,
                time: scene.background_time,
                breath: scene.breath,
            };
            (
                BackgroundFill::Solid {
                    color: DEEP_BACKGROUND,
                    alpha: 1.0,
                },
                gradient_sprites(&params, scene.canvas, parallax.background, scene.pulse_alpha),
            )
        }
        (_, fill) => (fill, Vec::new()),
    };
    let background = BackgroundUniforms::new(
        &gpu_fill,
        scene.background_time,
        scene.breath,
        scene.canvas,
        parallax.background,
        scene.pulse_alpha,
    );

    let mut layers: SmallVec<[Layer; 6]> = SmallVec::new();
    layers.push(Layer {
        id: LayerId::Background,
        offset: parallax.background,
        sprites: background_sprites,
    });
    if !focus {
        layers.push(particle_layer(LayerId::MidParticles, &scene.mid, parallax.mid));
    }
    layers.push(Layer {
        id: LayerId::Reflection,
        offset: refl.offset,
        sprites: reflection_sprites(&refl, rect),
    });
    let mut card_layer = card_sprites(&card, rect);
    card_layer.extend(content_sprites(&scene.visual, rect));
    layers.push(Layer {
        id: LayerId::GlassCard,
        offset: parallax.card,
        sprites: card_layer
            .into_iter()
            .map(|s| page.apply(rect.center, scene.card_scale, s))
            .collect(),
    });
    if !focus {
        layers.push(particle_layer(
            LayerId::ForegroundParticles,
            &scene.foreground,
            parallax.foreground,
        ));
    }
    let blur = GlassBlur::for_card(&card, rect, &page, scene.card_scale, &layers);
    let chrome = (!focus).then(|| Chrome::new(mode, scene.variant, &scene.ui));
    if let Some(c) = &chrome {
        layers.push(Layer {
            id: LayerId::Chrome,
            offset: [0.0; 2],
            sprites: c.sprites(scene.canvas, rect),
        });
    }

    Frame {
        time: scene.time,
        mode,
        visual: scene.visual,
        background,
        fill: scene.fill,
        card,
        card_rect: rect,
        page,
        reflection: refl,
        layers,
        blur,
        chrome,
        focus_indicator: focus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_instance_matches_vertex_layout() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 48);
    }

    #[test]
    fn page_transform_at_rest_is_identity() {
        let p = PageTransform::from_offset(0.0);
        let s = SpriteInstance::disc([10.0, 20.0], 4.0, [1.0; 4]);
        assert_eq!(p.apply([0.0, 0.0], 1.0, s), s);
    }
}
