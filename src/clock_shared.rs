//! # Shared Clock-Face Machinery
//!
//! The pieces every time-of-day face needs: tiered redraw decisions,
//! standard time formatting for the ten-position layout, the periodic
//! battery check and the alert-indicator resync. Factored out so the
//! standard and inverted clock faces render identically apart from style.

use crate::config::ClockSettings;
use crate::dispatcher::Watch;
use crate::display::Indicator;
use crate::peripherals::LOW_BATTERY_THRESHOLD_MV;
use crate::rtc::DateTime;

/// How much of the display a clock face must rewrite for a new timestamp.
/// Each tier is a strict subset of the electrodes of the next, and almost
/// every tick lands in the cheapest one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedrawTier {
    /// Only the seconds digits changed (positions 8 and 9).
    Seconds,
    /// Minutes and seconds changed (positions 6 through 9).
    Minutes,
    /// Hour, date or weekday changed; rewrite the whole line.
    Full,
}

/// Decide the redraw tier by comparing against the previously rendered
/// timestamp. No previous timestamp means a full redraw.
pub fn redraw_tier(previous: Option<DateTime>, current: DateTime) -> RedrawTier {
    let Some(prev) = previous else {
        return RedrawTier::Full;
    };
    let same_date = prev.year == current.year
        && prev.month == current.month
        && prev.day == current.day;
    if same_date && prev.hour == current.hour {
        if prev.minute == current.minute {
            RedrawTier::Seconds
        } else {
            RedrawTier::Minutes
        }
    } else {
        RedrawTier::Full
    }
}

/// A formatted time line plus which mode indicators it needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormattedTime {
    /// Exactly ten characters: weekday code, day of month, HH, MM, SS.
    pub line: String,
    /// Light the PM indicator (12-hour mode, afternoon).
    pub pm: bool,
    /// Light the 24H indicator.
    pub hour24: bool,
}

/// Format a timestamp for the standard layout: two-letter weekday and
/// space-padded day on the top positions, HHMMSS on the main line. Respects
/// the 12/24-hour mode and the 24-hour leading-zero preference.
pub fn format_time(date_time: &DateTime, clock: &ClockSettings) -> FormattedTime {
    let (hour_text, pm) = hour_text(date_time.hour, clock);
    FormattedTime {
        line: format!(
            "{}{:2}{}{:02}{:02}",
            date_time.weekday_code(),
            date_time.day,
            hour_text,
            date_time.minute,
            date_time.second
        ),
        pm,
        hour24: clock.mode_24h,
    }
}

/// Low-energy variant: the seconds positions are blanked because nothing
/// refreshes them while the watch sleeps.
pub fn format_time_lp(date_time: &DateTime, clock: &ClockSettings) -> FormattedTime {
    let mut formatted = format_time(date_time, clock);
    formatted.line.truncate(8);
    formatted.line.push_str("  ");
    formatted
}

fn hour_text(hour: u8, clock: &ClockSettings) -> (String, bool) {
    if clock.mode_24h {
        if clock.leading_zero_24h {
            (format!("{:02}", hour), false)
        } else {
            (format!("{:2}", hour), false)
        }
    } else {
        let pm = hour >= 12;
        let hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        (format!("{:2}", hour), pm)
    }
}

/// Apply a [`FormattedTime`]'s mode indicators.
pub fn sync_mode_indicators(watch: &mut Watch, formatted: &FormattedTime) {
    if formatted.pm {
        watch.display.set_indicator(Indicator::Pm);
    } else {
        watch.display.clear_indicator(Indicator::Pm);
    }
    if formatted.hour24 {
        watch.display.set_indicator(Indicator::Hour24);
    } else {
        watch.display.clear_indicator(Indicator::Hour24);
    }
}

/// Bring the bell and signal indicators in line with the current alert
/// settings. Cheap when nothing changed (idempotent pixel writes), so the
/// clock faces call it on activation and again on each full redraw in case
/// a settings screen changed the flags behind their back.
pub fn sync_alert_indicators(watch: &mut Watch) {
    let alarm = watch.settings.alerts.alarm_enabled;
    let chime = watch.settings.alerts.hourly_chime;
    if alarm {
        watch.display.set_indicator(Indicator::Bell);
    } else {
        watch.display.clear_indicator(Indicator::Bell);
    }
    if chime {
        watch.display.set_indicator(Indicator::Signal);
    } else {
        watch.display.clear_indicator(Indicator::Signal);
    }
}

/// Alert flags survive power cycles through the storage adapter.
const ALERTS_FILE: &str = "alerts.cfg";

/// Persist the alert flags. Best effort; a failed write loses nothing but
/// the flags' next power cycle.
pub fn persist_alerts(watch: &Watch) {
    if let Some(storage) = &watch.storage {
        let contents = format!(
            "alarm={}\nchime={}\n",
            u8::from(watch.settings.alerts.alarm_enabled),
            u8::from(watch.settings.alerts.hourly_chime)
        );
        let _ = storage.write(ALERTS_FILE, contents.as_bytes());
    }
}

/// Restore the alert flags written by [`persist_alerts`]. Unknown lines and
/// missing files leave the current settings untouched.
pub fn restore_alerts(watch: &mut Watch) {
    let Some(storage) = &watch.storage else {
        return;
    };
    let Ok(text) = storage.read_string(ALERTS_FILE) else {
        return;
    };
    for line in text.lines() {
        match line.trim() {
            "alarm=1" => watch.settings.alerts.alarm_enabled = true,
            "alarm=0" => watch.settings.alerts.alarm_enabled = false,
            "chime=1" => watch.settings.alerts.hourly_chime = true,
            "chime=0" => watch.settings.alerts.hourly_chime = false,
            _ => {}
        }
    }
}

/// Periodic low-battery check. Measuring the battery costs power itself
/// (the ADC has to be powered up), so the faces measure on activation and
/// then roughly weekly: on the first tick of a day of month divisible by
/// seven.
#[derive(Debug, Default)]
pub struct BatteryMonitor {
    low: bool,
    last_check_day: Option<u8>,
}

impl BatteryMonitor {
    /// Measure now.
    pub fn check_now(&mut self, watch: &mut Watch, date_time: &DateTime) {
        self.low = watch.battery.voltage_mv() < LOW_BATTERY_THRESHOLD_MV;
        self.last_check_day = Some(date_time.day);
    }

    /// Measure again only when due; call on every tick, cheap when not due.
    pub fn check_if_due(&mut self, watch: &mut Watch, date_time: &DateTime) {
        let due = match self.last_check_day {
            None => true,
            Some(day) => day != date_time.day && date_time.day % 7 == 0,
        };
        if due {
            self.check_now(watch, date_time);
        }
    }

    /// Whether the last measurement was below the threshold.
    pub fn low(&self) -> bool {
        self.low
    }

    /// Drive the battery icon from the last measurement. The inverted face
    /// lights the icon when the battery is healthy.
    pub fn apply(&self, watch: &mut Watch, inverted: bool) {
        if self.low != inverted {
            watch.display.set_indicator(Indicator::Battery);
        } else {
            watch.display.clear_indicator(Indicator::Battery);
        }
    }
}
