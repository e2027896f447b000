//! # Inverted Clock Face
//!
//! The standard clock rendered in negative: every segment a digit would
//! light is dark and every segment it would leave dark is lit, including
//! the extra descender pixels. The indicators follow the same joke, so the
//! 24H icon is lit in 12-hour mode, the PM icon in the morning, and the
//! battery icon while the battery is healthy. The colon blinks at 1 Hz.
//!
//! Shares the tiered-redraw machinery with the workday face; only the
//! style and indicator polarity differ.

use crate::clock_shared::{
    format_time, format_time_lp, persist_alerts, redraw_tier, BatteryMonitor, FormattedTime,
    RedrawTier,
};
use crate::dispatcher::{default_event_handler, Face, Watch};
use crate::display::{DigitStyle, Indicator};
use crate::peripherals::BuzzerNote;
use crate::rtc::DateTime;
use crate::{Event, EventType};

pub struct InverseFace {
    previous: Option<DateTime>,
    battery: BatteryMonitor,
}

impl InverseFace {
    pub fn new() -> Self {
        Self {
            previous: None,
            battery: BatteryMonitor::default(),
        }
    }

    fn sync_inverted_alerts(watch: &mut Watch) {
        if watch.settings.alerts.alarm_enabled {
            watch.display.clear_indicator(Indicator::Bell);
        } else {
            watch.display.set_indicator(Indicator::Bell);
        }
        if watch.settings.alerts.hourly_chime {
            watch.display.clear_indicator(Indicator::Signal);
        } else {
            watch.display.set_indicator(Indicator::Signal);
        }
    }

    fn sync_inverted_modes(watch: &mut Watch, formatted: &FormattedTime) {
        if formatted.pm {
            watch.display.clear_indicator(Indicator::Pm);
        } else {
            watch.display.set_indicator(Indicator::Pm);
        }
        if formatted.hour24 {
            watch.display.clear_indicator(Indicator::Hour24);
        } else {
            watch.display.set_indicator(Indicator::Hour24);
        }
    }

    fn update(&mut self, watch: &mut Watch, low_energy: bool) {
        let now = watch.rtc.now();
        let previous = self.previous.replace(now);

        // 1 Hz colon blink while awake; frozen while asleep.
        if !low_energy {
            if now.second % 2 == 0 {
                watch.display.set_colon();
            } else {
                watch.display.clear_colon();
            }
        }

        self.battery.check_if_due(watch, &now);

        let tier = if low_energy {
            RedrawTier::Full
        } else {
            redraw_tier(previous, now)
        };

        match tier {
            RedrawTier::Seconds => {
                watch.display.display_character_lp_seconds(
                    (b'0' + now.second / 10) as char,
                    8,
                    DigitStyle::Inverted,
                );
                watch.display.display_character_lp_seconds(
                    (b'0' + now.second % 10) as char,
                    9,
                    DigitStyle::Inverted,
                );
            }
            RedrawTier::Minutes => {
                let text = format!("{:02}{:02}", now.minute, now.second);
                watch.display.display_string(&text, 6, DigitStyle::Inverted);
            }
            RedrawTier::Full => {
                if low_energy && !watch.scheduler.tick_animation_running() {
                    watch.scheduler.start_tick_animation(500);
                }
                let formatted = if low_energy {
                    format_time_lp(&now, &watch.settings.clock)
                } else {
                    format_time(&now, &watch.settings.clock)
                };
                Self::sync_inverted_modes(watch, &formatted);
                watch
                    .display
                    .display_string(&formatted.line, 0, DigitStyle::Inverted);
                Self::sync_inverted_alerts(watch);
                self.battery.apply(watch, true);
            }
        }
    }
}

impl Default for InverseFace {
    fn default() -> Self {
        Self::new()
    }
}

impl Face for InverseFace {
    fn name(&self) -> &'static str {
        "inverse"
    }

    fn activate(&mut self, watch: &mut Watch) {
        watch.scheduler.stop_tick_animation();
        watch.display.clear_colon();
        Self::sync_inverted_alerts(watch);
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
                Self::sync_inverted_alerts(watch);
                persist_alerts(watch);
                true
            }
            EventType::BackgroundTask => {
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
