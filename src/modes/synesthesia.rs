use crate::color::{fast_out_slow_in, Rgb, DIGIT_PALETTE};
use crate::time::TimeSample;

pub const TWEEN_SEC: f32 = 0.3;

#[derive(Clone, Debug, PartialEq)]
pub struct SynesthesiaVisual {
    pub digits: [u8; 6],
    /// Palette colour each slot is heading for.
    pub targets: [Rgb; 6],
    /// Colour actually shown this frame.
    pub colors: [Rgb; 6],
}

impl SynesthesiaVisual {
    pub fn headline(&self) -> String {
        let d = self.digits;
        format!("{}{}:{}{}:{}{}", d[0], d[1], d[2], d[3], d[4], d[5])
    }
}

pub fn digit_color(digit: u8) -> Rgb {
    DIGIT_PALETTE
        .get(usize::from(digit))
        .copied()
        .unwrap_or(Rgb::NEUTRAL)
}

pub fn target_colors(t: &TimeSample) -> [Rgb; 6] {
    t.digits().map(digit_color)
}

pub fn render(t: &TimeSample, animated: Option<[Rgb; 6]>) -> SynesthesiaVisual {
    let targets = target_colors(t);
    SynesthesiaVisual {
        digits: t.digits(),
        targets,
        colors: animated.unwrap_or(targets),
    }
}

/// Per-slot colour tween. A slot whose digit changes starts a fresh
/// 300 ms ease from whatever colour it currently shows.
#[derive(Clone, Debug, Default)]
pub struct SynesthesiaAnimator {
    slots: Option<[Slot; 6]>,
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    from: Rgb,
    to: Rgb,
    elapsed: f32,
}

impl Slot {
    fn current(&self) -> Rgb {
        let t = (self.elapsed / TWEEN_SEC).clamp(0.0, 1.0);
        self.from.lerp(self.to, fast_out_slow_in(t))
    }
}

impl SynesthesiaAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, t: &TimeSample, dt_sec: f32) -> [Rgb; 6] {
        let targets = target_colors(t);
        let dt = if dt_sec > 0.0 { dt_sec } else { 0.0 };
        let slots = self.slots.get_or_insert_with(|| {
            targets.map(|c| Slot {
                from: c,
                to: c,
                elapsed: TWEEN_SEC,
            })
        });
        for (slot, target) in slots.iter_mut().zip(targets) {
            if slot.to != target {
                *slot = Slot {
                    from: slot.current(),
                    to: target,
                    elapsed: 0.0,
                };
            }
            slot.elapsed += dt;
        }
        slots.map(|s| s.current())
    }
}
