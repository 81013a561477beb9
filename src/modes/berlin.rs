//! Mengenlehreuhr: a seconds lamp and four rows of lamps.

use crate::color::{Rgb, BERLIN_RED, BERLIN_YELLOW};
use crate::time::TimeSample;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lamp {
    pub on: bool,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BerlinVisual {
    /// Lit on even seconds.
    pub seconds: Lamp,
    pub five_hours: [Lamp; 4],
    pub hours: [Lamp; 4],
    /// Every third lamp is red (quarter hours).
    pub five_minutes: [Lamp; 11],
    pub minutes: [Lamp; 4],
}

impl BerlinVisual {
    /// Active lamps per row, top to bottom.
    pub fn counts(&self) -> [usize; 4] {
        fn lit(row: &[Lamp]) -> usize {
            row.iter().filter(|l| l.on).count()
        }
        [
            lit(&self.five_hours),
            lit(&self.hours),
            lit(&self.five_minutes),
            lit(&self.minutes),
        ]
    }

    pub fn headline(&self) -> String {
        let row = |lamps: &[Lamp]| -> String {
            lamps
                .iter()
                .map(|l| if l.on { '●' } else { '○' })
                .collect()
        };
        format!(
            "{} {} {} {} {}",
            if self.seconds.on { '●' } else { '○' },
            row(&self.five_hours),
            row(&self.hours),
            row(&self.five_minutes),
            row(&self.minutes)
        )
    }
}

fn row<const N: usize>(active: u32, color: impl Fn(usize) -> Rgb) -> [Lamp; N] {
    std::array::from_fn(|i| Lamp {
        on: (i as u32) < active,
        color: color(i),
    })
}

pub fn render(t: &TimeSample) -> BerlinVisual {
    BerlinVisual {
        seconds: Lamp {
            on: t.is_even_second(),
            color: BERLIN_YELLOW,
        },
        five_hours: row(t.hour / 5, |_| BERLIN_RED),
        hours: row(t.hour % 5, |_| BERLIN_RED),
        five_minutes: row(t.minute / 5, |i| {
            if (i + 1) % 3 == 0 {
                BERLIN_RED
            } else {
                BERLIN_YELLOW
            }
        }),
        minutes: row(t.minute % 5, |_| BERLIN_YELLOW),
    }
}

/// Edge detector for the five-hour row. The first observation only records
/// the count, so mounting the view never thuds.
#[derive(Clone, Copy, Debug, Default)]
pub struct BerlinThud {
    previous: Option<u32>,
}

impl BerlinThud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the five-hour count changed to a nonzero value.
    pub fn observe(&mut self, t: &TimeSample) -> bool {
        let count = t.hour / 5;
        let fired = matches!(self.previous, Some(prev) if prev != count && count > 0);
        self.previous = Some(count);
        fired
    }

    /// Forget the last count, e.g. when the Berlin page is left.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}
