use crate::time::TimeSample;
use smallvec::SmallVec;

/// Bits per digit column: hour tens only reaches 2, minute/second tens 5.
pub const BIT_COUNTS: [u8; 6] = [2, 4, 3, 4, 3, 4];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryColumn {
    pub digit: u8,
    /// Most significant bit first (top to bottom).
    pub bits: SmallVec<[bool; 4]>,
    /// Decimal readout shown above the column.
    pub revealed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryVisual {
    pub columns: [BinaryColumn; 6],
}

impl BinaryVisual {
    pub fn headline(&self) -> String {
        let mut out = String::new();
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                out.push(if i % 2 == 0 { ':' } else { ' ' });
            }
            out.extend(col.bits.iter().map(|&b| if b { '1' } else { '0' }));
        }
        out
    }
}

pub fn digit_bits(digit: u8, width: u8) -> SmallVec<[bool; 4]> {
    (0..width).rev().map(|bit| (digit >> bit) & 1 == 1).collect()
}

pub fn render(t: &TimeSample, revealed: Option<usize>) -> BinaryVisual {
    let digits = t.digits();
    BinaryVisual {
        columns: std::array::from_fn(|i| BinaryColumn {
            digit: digits[i],
            bits: digit_bits(digits[i], BIT_COUNTS[i]),
            revealed: revealed == Some(i),
        }),
    }
}

/// Which column, if any, shows its decimal value. Tapping the open column
/// closes it; tapping another moves the readout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BinaryReveal {
    column: Option<usize>,
}

impl BinaryReveal {
    pub fn toggle(&mut self, column: usize) {
        if column >= BIT_COUNTS.len() {
            return;
        }
        self.column = if self.column == Some(column) {
            None
        } else {
            Some(column)
        };
    }

    pub fn column(&self) -> Option<usize> {
        self.column
    }
}
