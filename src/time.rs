//! Wall-clock sampling.
//!
//! `ClockSource` polls the OS clock on its own thread and publishes an
//! immutable `TimeSample` into a [`LatestSlot`]. The render thread copies one
//! sample per frame and hands that same value to every consumer.

use crate::constants::CLOCK_POLL_INTERVAL_MS;
use crate::error::{ConfigError, SessionError};
use crate::slot::LatestSlot;
use chrono::{DateTime, Local, TimeZone, Timelike};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const SECONDS_PER_DAY: u32 = 86_400;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TimeSample {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
    pub epoch_millis: i64,
}

impl TimeSample {
    /// Fields are clamped into their civil ranges.
    pub fn new(hour: u32, minute: u32, second: u32, millisecond: u32, epoch_millis: i64) -> Self {
        Self {
            hour: hour.min(23),
            minute: minute.min(59),
            second: second.min(59),
            millisecond: millisecond.min(999),
            epoch_millis,
        }
    }

    /// Local time-of-day `h:m:s` on 1970-01-01 UTC. Handy for tests and demos
    /// that only care about the displayed fields.
    pub fn at(hour: u32, minute: u32, second: u32) -> Self {
        let mut s = Self::new(hour, minute, second, 0, 0);
        s.epoch_millis = i64::from(s.seconds_since_midnight()) * 1000;
        s
    }

    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        // chrono reports a leap second as nanosecond >= 1e9; fold it into :59.999
        let millis = dt.nanosecond() / 1_000_000;
        Self::new(
            dt.hour(),
            dt.minute(),
            dt.second(),
            millis,
            dt.timestamp_millis(),
        )
    }

    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn seconds_since_midnight(&self) -> u32 {
        self.hour * 3600 + self.minute * 60 + self.second
    }

    /// Fraction of the local day elapsed, clamped to `[0, 1]`.
    pub fn day_progress(&self) -> f32 {
        (self.seconds_since_midnight() as f32 / SECONDS_PER_DAY as f32).clamp(0.0, 1.0)
    }

    /// Seconds within the minute including the millisecond fraction.
    pub fn fractional_second(&self) -> f32 {
        self.second as f32 + self.millisecond as f32 / 1000.0
    }

    pub fn is_even_second(&self) -> bool {
        self.second % 2 == 0
    }

    /// The six display digits `H H M M S S`.
    pub fn digits(&self) -> [u8; 6] {
        [
            (self.hour / 10) as u8,
            (self.hour % 10) as u8,
            (self.minute / 10) as u8,
            (self.minute % 10) as u8,
            (self.second / 10) as u8,
            (self.second % 10) as u8,
        ]
    }
}

/// The single time authority. Owns the polling thread (if any) and the slot
/// it publishes into.
pub struct ClockSource {
    slot: LatestSlot<TimeSample>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ClockSource {
    /// Start polling the local clock every `interval`.
    pub fn start(interval: Duration) -> Result<Self, SessionError> {
        if interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval.into());
        }
        let slot = LatestSlot::new(TimeSample::now());
        let stop = Arc::new(AtomicBool::new(false));
        let handle = {
            let slot = slot.clone();
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name("clock-source".into())
                .spawn(move || {
                    while !stop.load(Ordering::Acquire) {
                        slot.publish(TimeSample::now());
                        thread::park_timeout(interval);
                    }
                })
                .map_err(SessionError::ClockThread)?
        };
        log::info!("[clock] polling every {} ms", interval.as_millis());
        Ok(Self {
            slot,
            stop,
            handle: Some(handle),
        })
    }

    pub fn start_default() -> Result<Self, SessionError> {
        Self::start(Duration::from_millis(CLOCK_POLL_INTERVAL_MS))
    }

    /// A clock with no polling thread; the owner drives it through
    /// [`ClockSource::publish`].
    pub fn manual(initial: TimeSample) -> Self {
        Self {
            slot: LatestSlot::new(initial),
            stop: Arc::new(AtomicBool::new(true)),
            handle: None,
        }
    }

    pub fn publish(&self, sample: TimeSample) {
        self.slot.publish(sample);
    }

    pub fn current_sample(&self) -> TimeSample {
        self.slot.latest()
    }

    pub fn is_polling(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop and join the polling thread. Safe to call repeatedly.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.stop.store(true, Ordering::Release);
        handle.thread().unpark();
        if handle.join().is_err() {
            log::warn!("[clock] polling thread panicked");
        }
        log::info!("[clock] stopped");
    }
}

impl Drop for ClockSource {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    #[test]
    fn leap_second_folds_into_last_millisecond() {
        let dt = NaiveDate::from_ymd_opt(2016, 12, 31)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 1_500)
            .unwrap()
            .and_utc();
        let s = TimeSample::from_datetime(&dt);
        assert_eq!((s.hour, s.minute, s.second, s.millisecond), (23, 59, 59, 999));
    }

    #[test]
    fn from_datetime_uses_local_fields_and_utc_epoch() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let dt = tz.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let s = TimeSample::from_datetime(&dt);
        assert_eq!(s.epoch_millis, 1_700_000_000_123);
        assert_eq!(s.millisecond, 123);
        // 1_700_000_000 s = 2023-11-14T22:13:20Z
        assert_eq!((s.hour, s.minute, s.second), (23, 13, 20));
    }
}
