//! Time keeping for the watch face engine.

use chrono::{Datelike, NaiveDateTime, Timelike};

/// Source of wall-clock time in milliseconds since the Unix epoch.
///
/// Implemented by the host platform (RTC, companion-phone sync, OS clock);
/// injected into the engine so rendering stays testable without hardware.
pub trait TimeSource {
    /// Current UTC time in milliseconds since the Unix epoch.
    fn now_utc_ms(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_utc_ms(&self) -> u64 {
        (**self).now_utc_ms()
    }
}

/// Wall-clock time decomposed into the fields the face renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockSnapshot {
    /// Hour of day (0-23).
    pub hour: u8,
    /// Minute (0-59).
    pub minute: u8,
    /// Second (0-59).
    pub second: u8,
    /// Day of week, 0 = Sunday.
    pub weekday: u8,
    /// Month index, 0 = January.
    pub month: u8,
    /// Day of month (1-31).
    pub day: u8,
}

impl ClockSnapshot {
    fn from_datetime(time: NaiveDateTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            second: time.second() as u8,
            weekday: time.weekday().num_days_from_sunday() as u8,
            month: time.month0() as u8,
            day: time.day() as u8,
        }
    }
}

/// Local wall clock: a UTC time source plus the zone's UTC offset.
pub struct WallClock<T: TimeSource> {
    source: T,
    utc_offset_secs: i32,
    snapshot: ClockSnapshot,
}

impl<T: TimeSource> WallClock<T> {
    /// Create a clock in UTC and take an initial snapshot.
    pub fn new(source: T) -> Self {
        let mut clock = Self {
            source,
            utc_offset_secs: 0,
            snapshot: ClockSnapshot::from_datetime(NaiveDateTime::UNIX_EPOCH),
        };
        clock.refresh();
        clock
    }

    /// Raw UTC epoch milliseconds, used for tick alignment.
    pub fn now_ms(&self) -> u64 {
        self.source.now_utc_ms()
    }

    /// Replace the UTC offset (seconds east of UTC) and re-snapshot.
    pub fn set_offset(&mut self, utc_offset_secs: i32) {
        self.utc_offset_secs = utc_offset_secs;
        self.refresh();
    }

    /// Recompute the snapshot from the current instant.
    pub fn refresh(&mut self) -> ClockSnapshot {
        let local_ms = self.source.now_utc_ms() as i64 + i64::from(self.utc_offset_secs) * 1_000;
        // A timestamp outside chrono's range falls back to the epoch
        // instead of panicking.
        let local =
            NaiveDateTime::from_timestamp_millis(local_ms).unwrap_or(NaiveDateTime::UNIX_EPOCH);
        self.snapshot = ClockSnapshot::from_datetime(local);
        self.snapshot
    }

    /// The snapshot taken by the last [`refresh`](Self::refresh).
    pub fn snapshot(&self) -> ClockSnapshot {
        self.snapshot
    }
}

#[cfg(test)]
pub(crate) struct ManualTime(core::cell::Cell<u64>);

#[cfg(test)]
impl ManualTime {
    pub(crate) fn new(ms: u64) -> Self {
        Self(core::cell::Cell::new(ms))
    }

    pub(crate) fn set(&self, ms: u64) {
        self.0.set(ms);
    }
}

#[cfg(test)]
impl TimeSource for ManualTime {
    fn now_utc_ms(&self) -> u64 {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn epoch_ms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> u64 {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
            .timestamp_millis() as u64
    }

    #[test]
    fn snapshot_decomposes_wall_clock() {
        // 2014-01-05 was a Sunday.
        let time = ManualTime::new(epoch_ms(2014, 1, 5, 3, 30, 15));
        let clock = WallClock::new(&time);

        assert_eq!(
            clock.snapshot(),
            ClockSnapshot {
                hour: 3,
                minute: 30,
                second: 15,
                weekday: 0,
                month: 0,
                day: 5,
            }
        );
    }

    #[test]
    fn refresh_tracks_the_source() {
        let time = ManualTime::new(epoch_ms(2014, 1, 5, 3, 30, 15));
        let mut clock = WallClock::new(&time);

        time.set(epoch_ms(2014, 1, 5, 3, 30, 16));
        assert_eq!(clock.snapshot().second, 15);
        assert_eq!(clock.refresh().second, 16);
    }

    #[test]
    fn utc_offset_shifts_the_snapshot() {
        let time = ManualTime::new(epoch_ms(2014, 1, 5, 23, 30, 0));
        let mut clock = WallClock::new(&time);

        // One hour east rolls into Monday the 6th.
        clock.set_offset(3_600);
        let snapshot = clock.snapshot();
        assert_eq!(snapshot.hour, 0);
        assert_eq!(snapshot.minute, 30);
        assert_eq!(snapshot.weekday, 1);
        assert_eq!(snapshot.day, 6);

        // Half an hour west of UTC.
        clock.set_offset(-1_800);
        assert_eq!(clock.snapshot().hour, 23);
        assert_eq!(clock.snapshot().minute, 0);
        assert_eq!(clock.snapshot().day, 5);
    }
}
