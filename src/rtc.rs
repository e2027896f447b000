//! # Real-Time Clock
//!
//! Calendar time as the watch sees it, behind a trait so faces can be driven
//! from the host clock, a settable virtual clock in tests, or (eventually) a
//! hardware RTC peripheral. Also home to the calendar utilities the faces
//! share: weekday lookup, unix-time conversion and the time-zone table.

use chrono::{Datelike, Local, NaiveDate, Timelike};
use std::cell::RefCell;
use std::rc::Rc;

/// A broken-down calendar timestamp, matching the registers a hardware RTC
/// exposes. Always local time; zone conversion happens explicitly through
/// [`date_time_to_unix_time`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateTime {
    /// Full year, e.g. 2026.
    pub year: u16,
    /// 1..=12.
    pub month: u8,
    /// 1..=31.
    pub day: u8,
    /// 0..=23.
    pub hour: u8,
    /// 0..=59.
    pub minute: u8,
    /// 0..=59.
    pub second: u8,
}

impl DateTime {
    /// Day of week, 0 = Sunday .. 6 = Saturday (Sakamoto's method).
    pub fn weekday(&self) -> u8 {
        const T: [u16; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
        let mut y = self.year as i32;
        if self.month < 3 {
            y -= 1;
        }
        let m = (self.month as usize).clamp(1, 12) - 1;
        let dow = y + y / 4 - y / 100 + y / 400 + T[m] as i32 + self.day as i32;
        (dow.rem_euclid(7)) as u8
    }

    /// Two-letter weekday code for the top line of the display.
    pub fn weekday_code(&self) -> &'static str {
        const CODES: [&str; 7] = ["SU", "MO", "TU", "WE", "TH", "FR", "SA"];
        CODES[self.weekday() as usize]
    }
}

/// Clock source seam.
pub trait Rtc {
    /// The current local date and time.
    fn now(&self) -> DateTime;
}

/// RTC backed by the host's clock, for the simulator.
#[derive(Debug, Default)]
pub struct SystemRtc;

impl Rtc for SystemRtc {
    fn now(&self) -> DateTime {
        let now = Local::now();
        DateTime {
            year: now.year().clamp(0, u16::MAX as i32) as u16,
            month: now.month() as u8,
            day: now.day() as u8,
            hour: now.hour() as u8,
            minute: now.minute() as u8,
            second: now.second() as u8,
        }
    }
}

/// Settable clock for tests and scripted simulator runs. Clones share the
/// same underlying time, so the harness can keep a handle while the watch
/// owns its boxed copy.
#[derive(Clone, Debug)]
pub struct VirtualRtc(Rc<RefCell<DateTime>>);

impl VirtualRtc {
    /// A virtual clock frozen at the given time.
    pub fn new(start: DateTime) -> Self {
        Self(Rc::new(RefCell::new(start)))
    }

    /// Jump to an arbitrary time.
    pub fn set(&self, date_time: DateTime) {
        *self.0.borrow_mut() = date_time;
    }

    /// Step forward by whole seconds, rolling minutes, hours and the date.
    pub fn advance_seconds(&self, seconds: u32) {
        let current = *self.0.borrow();
        let offset = date_time_to_unix_time(&current, 0) + seconds as i64;
        if let Some(next) = unix_time_to_date_time(offset, 0) {
            *self.0.borrow_mut() = next;
        }
    }
}

impl Rtc for VirtualRtc {
    fn now(&self) -> DateTime {
        *self.0.borrow()
    }
}

/// UTC offsets in minutes for the settable time-zone index, UTC first,
/// eastward positives before the westward negatives.
pub const TIMEZONE_OFFSETS_MINUTES: [i16; 41] = [
    0, 60, 120, 180, 210, 240, 270, 300, 330, 345, 360, 390, 420, 480, 525, 540, 570, 600, 630,
    660, 690, 720, 765, 780, 840, -60, -120, -180, -210, -240, -270, -300, -330, -360, -420, -480,
    -540, -570, -600, -660, -720,
];

/// UTC offset in seconds for a zone index; out-of-range indexes fall back
/// to UTC.
pub fn timezone_offset_seconds(index: usize) -> i32 {
    TIMEZONE_OFFSETS_MINUTES
        .get(index)
        .map(|minutes| *minutes as i32 * 60)
        .unwrap_or(0)
}

/// Seconds since the unix epoch for a local timestamp at the given UTC
/// offset. Invalid calendar dates collapse to the epoch.
pub fn date_time_to_unix_time(date_time: &DateTime, utc_offset_seconds: i32) -> i64 {
    NaiveDate::from_ymd_opt(
        date_time.year as i32,
        date_time.month as u32,
        date_time.day as u32,
    )
    .and_then(|date| {
        date.and_hms_opt(
            date_time.hour as u32,
            date_time.minute as u32,
            date_time.second as u32,
        )
    })
    .map(|naive| naive.and_utc().timestamp() - utc_offset_seconds as i64)
    .unwrap_or(0)
}

/// Inverse of [`date_time_to_unix_time`]; `None` for timestamps outside the
/// representable calendar.
pub fn unix_time_to_date_time(timestamp: i64, utc_offset_seconds: i32) -> Option<DateTime> {
    let local = chrono::DateTime::from_timestamp(timestamp + utc_offset_seconds as i64, 0)?;
    let naive = local.naive_utc();
    Some(DateTime {
        year: u16::try_from(naive.year()).ok()?,
        month: naive.month() as u8,
        day: naive.day() as u8,
        hour: naive.hour() as u8,
        minute: naive.minute() as u8,
        second: naive.second() as u8,
    })
}

/// A span of time broken down for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatchDuration {
    pub days: u32,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

/// Break a second count into display units.
pub fn seconds_to_duration(total: u32) -> WatchDuration {
    WatchDuration {
        days: total / 86_400,
        hours: ((total / 3_600) % 24) as u8,
        minutes: ((total / 60) % 60) as u8,
        seconds: (total % 60) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> DateTime {
        DateTime { year, month, day, hour, minute, second }
    }

    #[test]
    fn weekday_codes_are_correct() {
        // 2026-08-31 is a Monday.
        assert_eq!(dt(2026, 8, 31, 0, 0, 0).weekday_code(), "MO");
        // 2000-01-01 was a Saturday.
        assert_eq!(dt(2000, 1, 1, 12, 0, 0).weekday_code(), "SA");
        // Leap-day handling: 2024-02-29 was a Thursday.
        assert_eq!(dt(2024, 2, 29, 0, 0, 0).weekday_code(), "TH");
    }

    #[test]
    fn unix_round_trip() {
        let original = dt(2026, 8, 31, 16, 59, 59);
        let stamp = date_time_to_unix_time(&original, 0);
        assert_eq!(unix_time_to_date_time(stamp, 0), Some(original));
    }

    #[test]
    fn utc_offset_shifts_the_timestamp() {
        let local = dt(2026, 1, 1, 1, 0, 0);
        let utc = date_time_to_unix_time(&local, 0);
        // One hour east of UTC means the same local time happened earlier.
        let east = date_time_to_unix_time(&local, 3600);
        assert_eq!(utc - east, 3600);
    }

    #[test]
    fn invalid_dates_do_not_panic() {
        assert_eq!(date_time_to_unix_time(&dt(2026, 2, 30, 0, 0, 0), 0), 0);
    }

    #[test]
    fn virtual_rtc_rolls_over_midnight() {
        let rtc = VirtualRtc::new(dt(2026, 8, 31, 23, 59, 58));
        rtc.advance_seconds(3);
        assert_eq!(rtc.now(), dt(2026, 9, 1, 0, 0, 1));
    }

    #[test]
    fn clones_share_the_clock() {
        let rtc = VirtualRtc::new(dt(2026, 1, 1, 0, 0, 0));
        let other = rtc.clone();
        rtc.advance_seconds(60);
        assert_eq!(other.now().minute, 1);
    }

    #[test]
    fn timezone_table_starts_at_utc() {
        assert_eq!(timezone_offset_seconds(0), 0);
        assert_eq!(timezone_offset_seconds(1), 3600);
        assert_eq!(timezone_offset_seconds(usize::MAX), 0);
    }

    #[test]
    fn duration_breakdown() {
        let duration = seconds_to_duration(90_061);
        assert_eq!(
            duration,
            WatchDuration { days: 1, hours: 1, minutes: 1, seconds: 1 }
        );
    }
}
