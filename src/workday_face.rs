//! # Workday Clock Face
//!
//! The default screen. Outside working hours it is a standard clock:
//! weekday and day of month up top, HH:MM:SS on the main line. From 09:00
//! to 16:59:59 it flips into a countdown to 17:00, and at exactly 17:00:00
//! it sounds a short beep. Long-pressing the alarm button toggles the
//! hourly chime, which this face also services as a background task.
//!
//! Redraws are tiered: a normal tick rewrites only the seconds digits, a
//! minute rollover rewrites four digits, and everything else is a full
//! line rewrite.

use crate::clock_shared::{
    format_time, format_time_lp, persist_alerts, redraw_tier, restore_alerts,
    sync_alert_indicators, sync_mode_indicators, BatteryMonitor, RedrawTier,
};
use crate::dispatcher::{default_event_handler, Face, Watch};
use crate::display::DigitStyle;
use crate::peripherals::BuzzerNote;
use crate::rtc::{
    date_time_to_unix_time, seconds_to_duration, timezone_offset_seconds, DateTime, WatchDuration,
};
use crate::{Event, EventType};

/// Local time the workday ends, and the countdown target.
const END_OF_WORKDAY_HOUR: u8 = 17;

pub struct WorkdayFace {
    previous: Option<DateTime>,
    battery: BatteryMonitor,
}

impl WorkdayFace {
    pub fn new() -> Self {
        Self {
            previous: None,
            battery: BatteryMonitor::default(),
        }
    }

    fn in_countdown_window(date_time: &DateTime) -> bool {
        date_time.hour >= 9 && date_time.hour < END_OF_WORKDAY_HOUR
    }

    /// Time left until 17:00 today. Adjusted down by one second so the
    /// final minute reads 00:00:59..00:00:00 rather than 00:01:00..00:00:01.
    fn remaining(date_time: &DateTime, watch: &Watch) -> WatchDuration {
        let tz = timezone_offset_seconds(watch.settings.clock.time_zone as usize);
        let now_ts = date_time_to_unix_time(date_time, tz);
        let target = DateTime {
            hour: END_OF_WORKDAY_HOUR,
            minute: 0,
            second: 0,
            ..*date_time
        };
        let target_ts = date_time_to_unix_time(&target, tz);
        let diff = if now_ts < target_ts {
            (target_ts - now_ts) as u32
        } else {
            0
        };
        let diff_adj = diff.saturating_sub(1);
        seconds_to_duration(diff_adj)
    }

    fn update(&mut self, watch: &mut Watch, low_energy: bool) {
        let now = watch.rtc.now();
        let previous = self.previous.replace(now);

        // One short celebratory beep at exactly 17:00:00, once.
        if now.hour == END_OF_WORKDAY_HOUR
            && now.minute == 0
            && now.second == 0
            && previous.map_or(true, |p| p.second != 0)
        {
            watch.buzzer.beep(BuzzerNote::C8, 150);
        }

        self.battery.check_if_due(watch, &now);

        let countdown = Self::in_countdown_window(&now);
        let tier = if low_energy {
            RedrawTier::Full
        } else {
            redraw_tier(previous, now)
        };

        match tier {
            RedrawTier::Seconds => {
                let second = if countdown {
                    Self::remaining(&now, watch).seconds
                } else {
                    now.second
                };
                watch.display.display_character_lp_seconds(
                    (b'0' + second / 10) as char,
                    8,
                    DigitStyle::Normal,
                );
                watch.display.display_character_lp_seconds(
                    (b'0' + second % 10) as char,
                    9,
                    DigitStyle::Normal,
                );
            }
            RedrawTier::Minutes => {
                let (minute, second) = if countdown {
                    let left = Self::remaining(&now, watch);
                    (left.minutes, left.seconds)
                } else {
                    (now.minute, now.second)
                };
                let text = format!("{:02}{:02}", minute, second);
                watch.display.display_string(&text, 6, DigitStyle::Normal);
            }
            RedrawTier::Full => {
                if low_energy && !watch.scheduler.tick_animation_running() {
                    watch.scheduler.start_tick_animation(500);
                }
                let line = if countdown {
                    Self::format_countdown(&now, watch, low_energy)
                } else {
                    let formatted = if low_energy {
                        format_time_lp(&now, &watch.settings.clock)
                    } else {
                        format_time(&now, &watch.settings.clock)
                    };
                    sync_mode_indicators(watch, &formatted);
                    formatted.line
                };
                watch.display.display_string(&line, 0, DigitStyle::Normal);
                sync_alert_indicators(watch);
                self.battery.apply(watch, false);
            }
        }
    }

    /// Countdown layout: weekday and day positions blanked, HH MM SS of
    /// time remaining on the main line. Hours are bounded to two digits.
    fn format_countdown(date_time: &DateTime, watch: &Watch, low_energy: bool) -> String {
        let left = Self::remaining(date_time, watch);
        let hours_total = left.hours as u32 + left.days * 24;
        let hours = hours_total.min(99);
        if low_energy {
            format!("    {:02}{:02}  ", hours, left.minutes)
        } else {
            format!("    {:02}{:02}{:02}", hours, left.minutes, left.seconds)
        }
    }
}

impl Default for WorkdayFace {
    fn default() -> Self {
        Self::new()
    }
}

impl Face for WorkdayFace {
    fn name(&self) -> &'static str {
        "workday"
    }

    fn setup(&mut self, watch: &mut Watch) {
        restore_alerts(watch);
    }

    fn activate(&mut self, watch: &mut Watch) {
        watch.scheduler.stop_tick_animation();
        watch.display.set_colon();
        sync_alert_indicators(watch);
        self.previous = None;
    }

    fn on_event(&mut self, event: Event, watch: &mut Watch) -> bool {
        match event.event_type {
            EventType::Activate | EventType::Tick => {
                self.update(watch, false);
                true
            }
            EventType::LowEnergyUpdate => {
                self.update(watch, true);
                true
            }
            EventType::AlarmLongPress => {
                watch.settings.alerts.hourly_chime = !watch.settings.alerts.hourly_chime;
                sync_alert_indicators(watch);
                persist_alerts(watch);
                true
            }
            EventType::BackgroundTask => {
                // Top of the hour while some other face is up.
                watch.buzzer.beep(BuzzerNote::C7, 75);
                true
            }
            _ => default_event_handler(event, watch),
        }
    }

    fn wants_background_task(&mut self, watch: &mut Watch) -> bool {
        watch.settings.alerts.hourly_chime && watch.rtc.now().minute == 0
    }
}
