//! Swatch Internet Time. One beat is 86.4 s of Biel Mean Time (UTC+1).

use crate::time::TimeSample;
use chrono::{DateTime, FixedOffset, Timelike};

pub const BAR_SEGMENTS: usize = 20;
const BMT_OFFSET_SECS: i32 = 3600;
const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Clone, Debug, PartialEq)]
pub struct SwatchVisual {
    pub beats: f64,
    pub text: String,
    pub filled_segments: usize,
}

/// Milliseconds since BMT midnight.
pub fn bmt_millis(epoch_millis: i64) -> i64 {
    let bmt = FixedOffset::east_opt(BMT_OFFSET_SECS)
        .and_then(|tz| DateTime::from_timestamp_millis(epoch_millis).map(|d| d.with_timezone(&tz)));
    match bmt {
        Some(d) => {
            i64::from(d.num_seconds_from_midnight()) * 1000
                + i64::from(d.timestamp_subsec_millis().min(999))
        }
        // outside chrono's range: same arithmetic by hand
        None => (epoch_millis + i64::from(BMT_OFFSET_SECS) * 1000).rem_euclid(MILLIS_PER_DAY),
    }
}

/// Beats in `[0, 1000)`: BMT seconds past midnight / 86.4. Divides whole
/// milliseconds by 86 400 so round values such as noon come out exact.
pub fn beats(epoch_millis: i64) -> f64 {
    bmt_millis(epoch_millis) as f64 / 86_400.0
}

/// `@NNN`, truncated: 999.99 shows `@999`, midnight shows `@000`.
pub fn format_beats(beats: f64) -> String {
    format!("@{:03}", (beats.floor() as i64).rem_euclid(1000))
}

/// `@NNN.NN`, truncated to centibeats.
pub fn format_centibeats(beats: f64) -> String {
    let cb = ((beats * 100.0).floor() as i64).rem_euclid(100_000);
    format!("@{:03}.{:02}", cb / 100, cb % 100)
}

pub fn filled_segments(beats: f64) -> usize {
    let fill = (beats / 1000.0).clamp(0.0, 1.0);
    ((fill * BAR_SEGMENTS as f64) as usize).min(BAR_SEGMENTS)
}

pub fn render(t: &TimeSample, variant: usize) -> SwatchVisual {
    let beats = beats(t.epoch_millis);
    let text = if variant == 1 {
        format_centibeats(beats)
    } else {
        format_beats(beats)
    };
    SwatchVisual {
        beats,
        text,
        filled_segments: filled_segments(beats),
    }
}
