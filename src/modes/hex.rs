use crate::color::{parse_hex_or_neutral, Rgb};
use crate::time::TimeSample;

#[derive(Clone, Debug, PartialEq)]
pub struct HexVisual {
    pub text: String,
    /// The same tuple read back as a colour; painted behind the card.
    pub color: Rgb,
    /// Variant 1 shows the fields as decimal digits instead of hex bytes.
    pub decimal: bool,
}

/// `#RRGGBB` with r = hour, g = minute, b = second, each a raw (unscaled)
/// two-digit hex byte.
pub fn hex_string(t: &TimeSample) -> String {
    format!(
        "#{:02X}{:02X}{:02X}",
        t.hour.min(23),
        t.minute.min(59),
        t.second.min(59)
    )
}

/// `#HHMMSS` using decimal digits.
pub fn decimal_string(t: &TimeSample) -> String {
    format!(
        "#{:02}{:02}{:02}",
        t.hour.min(23),
        t.minute.min(59),
        t.second.min(59)
    )
}

pub fn render(t: &TimeSample, variant: usize) -> HexVisual {
    let decimal = variant == 1;
    let text = if decimal {
        decimal_string(t)
    } else {
        hex_string(t)
    };
    HexVisual {
        color: parse_hex_or_neutral(&text),
        text,
        decimal,
    }
}
