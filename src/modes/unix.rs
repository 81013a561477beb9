use crate::time::TimeSample;

pub const LABEL: &str = "EPOCH_TIMESTAMP";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnixVisual {
    pub label: &'static str,
    pub text: String,
    pub millis: bool,
}

/// Whole seconds since the epoch, floor-divided.
pub fn epoch_seconds(epoch_millis: i64) -> i64 {
    epoch_millis.div_euclid(1000)
}

pub fn render(t: &TimeSample, variant: usize) -> UnixVisual {
    let millis = variant == 1;
    let text = if millis {
        t.epoch_millis.to_string()
    } else {
        epoch_seconds(t.epoch_millis).to_string()
    };
    UnixVisual {
        label: LABEL,
        text,
        millis,
    }
}
