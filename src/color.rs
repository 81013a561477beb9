//! Colour values, palettes and easing curves shared by the renderers.

use bytemuck::{Pod, Zeroable};

/// Linear-ish sRGB triple in `[0, 1]`, with straight alpha carried separately
/// where needed.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// Substituted whenever a computed colour cannot be parsed.
    pub const NEUTRAL: Self = Self::new(0.5, 0.5, 0.5);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB`; any alpha byte above bit 24 is ignored.
    pub const fn from_u32(argb: u32) -> Self {
        Self {
            r: ((argb >> 16) & 0xFF) as f32 / 255.0,
            g: ((argb >> 8) & 0xFF) as f32 / 255.0,
            b: (argb & 0xFF) as f32 / 255.0,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn scale(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }

    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }

    /// Alpha-composite `self` (with `alpha`) over `base`.
    pub fn over(self, base: Self, alpha: f32) -> Self {
        base.lerp(self, alpha)
    }

    /// WCAG relative luminance.
    pub fn relative_luminance(self) -> f32 {
        fn lin(c: f32) -> f32 {
            let c = c.clamp(0.0, 1.0);
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * lin(self.r) + 0.7152 * lin(self.g) + 0.0722 * lin(self.b)
    }

    /// WCAG contrast ratio, always `>= 1`.
    pub fn contrast_ratio(self, other: Self) -> f32 {
        let a = self.relative_luminance();
        let b = other.relative_luminance();
        let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
        (hi + 0.05) / (lo + 0.05)
    }
}

/// Parse `#RRGGBB` (or `RRGGBB`).
pub fn parse_hex(s: &str) -> Option<Rgb> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let v = u32::from_str_radix(digits, 16).ok()?;
    Some(Rgb::from_u32(v))
}

/// [`parse_hex`] that never fails: malformed input renders as
/// [`Rgb::NEUTRAL`].
pub fn parse_hex_or_neutral(s: &str) -> Rgb {
    parse_hex(s).unwrap_or_else(|| {
        log::warn!("[color] could not parse {s:?}; using neutral");
        Rgb::NEUTRAL
    })
}

pub const DEEP_BACKGROUND: Rgb = Rgb::from_u32(0x050510);
pub const MATRIX_GREEN: Rgb = Rgb::from_u32(0x00FF00);
pub const MATRIX_DARK_GREEN: Rgb = Rgb::from_u32(0x00AA00);
pub const BERLIN_RED: Rgb = Rgb::from_u32(0xFF4444);
pub const BERLIN_YELLOW: Rgb = Rgb::from_u32(0xFFDD00);
pub const BERLIN_OFF: Rgb = Rgb::from_u32(0x333333);
pub const BINARY_ON: Rgb = Rgb::from_u32(0x00E5FF);
pub const BINARY_OFF: Rgb = Rgb::from_u32(0x1A1A2E);
pub const SWATCH_GREEN: Rgb = Rgb::from_u32(0x00F260);
pub const FLUID_LIGHT: Rgb = Rgb::from_u32(0x00D2FF);
pub const FLUID_DEEP: Rgb = Rgb::from_u32(0x3A7BD5);

/// Digit to colour mapping for the synesthesia mode.
pub const DIGIT_PALETTE: [Rgb; 10] = [
    Rgb::from_u32(0xFFFFFF), // white
    Rgb::from_u32(0x00BFFF), // sky blue
    Rgb::from_u32(0xFFD700), // gold
    Rgb::from_u32(0xFF6B6B), // coral
    Rgb::from_u32(0x4ECDC4), // turquoise
    Rgb::from_u32(0x9B59B6), // purple
    Rgb::from_u32(0xFF8C00), // orange
    Rgb::from_u32(0x2ECC71), // emerald
    Rgb::from_u32(0x3498DB), // blue
    Rgb::from_u32(0xE74C3C), // red
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModePalette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub gradient: [Rgb; 3],
}

const fn palette(primary: u32, secondary: u32, gradient: [u32; 3]) -> ModePalette {
    ModePalette {
        primary: Rgb::from_u32(primary),
        secondary: Rgb::from_u32(secondary),
        gradient: [
            Rgb::from_u32(gradient[0]),
            Rgb::from_u32(gradient[1]),
            Rgb::from_u32(gradient[2]),
        ],
    }
}

/// Indexed by mode.
pub const MODE_PALETTES: [ModePalette; 9] = [
    palette(0x00F0FF, 0xFF006E, [0x0F2A35, 0x1E4A5A, 0x2C6E7E]),
    palette(0xFFFFFF, 0xCCCCCC, [0x152535, 0x253545, 0x355565]),
    palette(0xFF6B6B, 0xFFE66D, [0x2A1A3E, 0x26315E, 0x1F4580]),
    palette(0x00E5FF, 0x00FF88, [0x0A0A12, 0x1A2A3E, 0x0F1F2A]),
    palette(0x00F260, 0x0575E6, [0x0F2A35, 0x254555, 0x3C6575]),
    palette(0x00FF00, 0x00AA00, [0x000508, 0x0A1510, 0x001810]),
    palette(0xFF6B6B, 0x9B59B6, [0x2A1A3E, 0x3D2D5A, 0x2A1A3E]),
    palette(0xFFB347, 0x4A90D9, [0x1A4A6C, 0x5A9AE9, 0x97DEFF]),
    palette(0x00D2FF, 0x3A7BD5, [0x0F2A35, 0x254A5A, 0x3C6A7A]),
];

// Easing

/// Cubic bezier `(0.4, 0, 0.2, 1)`, solved for `x` by Newton iteration.
pub fn fast_out_slow_in(t: f32) -> f32 {
    cubic_bezier(0.4, 0.0, 0.2, 1.0, t)
}

pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    let x = t.clamp(0.0, 1.0);
    if x == 0.0 || x == 1.0 {
        return x;
    }
    let bez = |p1: f32, p2: f32, s: f32| {
        let u = 1.0 - s;
        3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s
    };
    let d_bez = |p1: f32, p2: f32, s: f32| {
        let u = 1.0 - s;
        3.0 * u * u * p1 + 6.0 * u * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
    };
    let mut s = x;
    for _ in 0..8 {
        let err = bez(x1, x2, s) - x;
        let d = d_bez(x1, x2, s);
        if err.abs() < 1e-6 || d.abs() < 1e-6 {
            break;
        }
        s = (s - err / d).clamp(0.0, 1.0);
    }
    bez(y1, y2, s)
}

/// Triangle wave in `[0, 1]`: rises for `half_period_sec`, then falls.
pub fn ping_pong(time_sec: f64, half_period_sec: f64) -> f32 {
    if half_period_sec <= 0.0 {
        return 0.0;
    }
    let cycle = (time_sec / half_period_sec).rem_euclid(2.0);
    (if cycle <= 1.0 { cycle } else { 2.0 - cycle }) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bezier_endpoints_and_monotonic() {
        assert_eq!(fast_out_slow_in(0.0), 0.0);
        assert_eq!(fast_out_slow_in(1.0), 1.0);
        let mut prev = 0.0;
        for i in 1..=20 {
            let v = fast_out_slow_in(i as f32 / 20.0);
            assert!(v >= prev - 1e-5, "not monotonic at {i}");
            prev = v;
        }
        // fast out: ahead of linear at the midpoint
        assert!(fast_out_slow_in(0.5) > 0.5);
    }

    #[test]
    fn ping_pong_reverses() {
        assert!((ping_pong(0.0, 10.0) - 0.0).abs() < 1e-6);
        assert!((ping_pong(10.0, 10.0) - 1.0).abs() < 1e-6);
        assert!((ping_pong(15.0, 10.0) - 0.5).abs() < 1e-6);
        assert!((ping_pong(20.0, 10.0) - 0.0).abs() < 1e-6);
    }
}
