//! # Scanning Face
//!
//! Renders the time the way a plotter would draw it: one segment per frame,
//! left to right across all six digits, at 32 frames per second. A trailing
//! window of at most fifteen lit segments follows the "pen", so the time is
//! readable only by watching the sweep. One full pass takes two seconds,
//! and a new pass starts on every second change.
//!
//! Idles at 4 Hz between passes so the second change is caught promptly,
//! and drops back to it a few frames after the pass completes.

use crate::charset::{MAIN_LINE, SegPin};
use crate::dispatcher::{default_event_handler, Face, Watch};
use crate::display::DigitStyle;
use crate::tick::TickFrequency;
use crate::{Event, EventType};

const FRAMES_PER_DIGIT: usize = 8;
const MAX_ILLUMINATED_SEGMENTS: usize = 16;
// 8 frames per digit * 6 digits + the trailing drain window.
const TOTAL_FRAMES: usize = FRAMES_PER_DIGIT * 6 + MAX_ILLUMINATED_SEGMENTS;

// Stroke order per digit, A..G segments with X as a rest frame: vaguely how
// a pen would draw the figure, pausing at corners and crossings.
const SEGMENT_MAP: [&[u8; 8]; 10] = [
    b"AXFBDEXC", // 0
    b"BXXXCXXX", // 1
    b"ABGEXXXD", // 2
    b"ABGXXXCD", // 3
    b"FXGBXXXC", // 4
    b"AXFXGXCD", // 5
    b"AXFEDCXG", // 6
    b"AXXBXXCX", // 7
    b"AFGCDEXB", // 8
    b"AFGBXXCD", // 9
];

// Suppressed tens-of-hours in 12-hour mode: all rest frames.
const BLANK_SEGMENTS: &[u8; 8] = b"XXXXXXXX";

/// Marker for a blank digit in the `digits` array.
const BLANK_DIGIT: u8 = 10;

pub struct ScanFace {
    animate: bool,
    animation: usize,
    start: usize,
    end: usize,
    // Ring buffer of recently lit pins; `None` entries are rest frames.
    illuminated: [Option<SegPin>; MAX_ILLUMINATED_SEGMENTS],
    digits: [u8; 6],
    last_second: Option<u8>,
    frequency_switch_delay: u8,
}

impl ScanFace {
    pub fn new() -> Self {
        Self {
            animate: false,
            animation: 0,
            start: 0,
            end: 0,
            illuminated: [None; MAX_ILLUMINATED_SEGMENTS],
            digits: [0; 6],
            last_second: None,
            frequency_switch_delay: 0,
        }
    }

    fn hour_digits(hour: u8, mode_24h: bool) -> (u8, u8) {
        if mode_24h {
            (hour / 10, hour % 10)
        } else {
            let hour = match hour % 12 {
                0 => 12,
                h => h,
            };
            if hour < 10 {
                (BLANK_DIGIT, hour)
            } else {
                (hour / 10, hour % 10)
            }
        }
    }

    fn step_animation(&mut self, watch: &mut Watch) {
        // Window full: retire the oldest pin before lighting a new one.
        if (self.end + 1) % MAX_ILLUMINATED_SEGMENTS == self.start {
            if let Some((com, seg)) = self.illuminated[self.start] {
                watch.display.clear_pixel(com, seg);
            }
            self.start = (self.start + 1) % MAX_ILLUMINATED_SEGMENTS;
        }

        if self.animation < TOTAL_FRAMES - MAX_ILLUMINATED_SEGMENTS {
            let position = (self.animation / FRAMES_PER_DIGIT) % 6;
            let frame = self.animation % FRAMES_PER_DIGIT;
            let strokes = if self.digits[position] == BLANK_DIGIT {
                BLANK_SEGMENTS
            } else {
                SEGMENT_MAP[self.digits[position] as usize]
            };
            let code = strokes[frame];
            if code == b'X' {
                self.illuminated[self.end] = None;
            } else {
                let pin = MAIN_LINE[position][(code - b'A') as usize];
                watch.display.set_pixel(pin.0, pin.1);
                self.illuminated[self.end] = Some(pin);
            }
            self.end = (self.end + 1) % MAX_ILLUMINATED_SEGMENTS;
        } else if self.animation < TOTAL_FRAMES {
            // Drain: let the window empty itself past the last digit.
            self.end = (self.end + 1) % MAX_ILLUMINATED_SEGMENTS;
        } else {
            self.animate = false;
            // A few more frames at 32 Hz so the colon settles before the
            // rate drops.
            self.frequency_switch_delay = 4;
        }
        self.animation += 1;
    }

    fn tick(&mut self, watch: &mut Watch) {
        let now = watch.rtc.now();

        // Colon alternates whole seconds.
        if now.second % 2 == 0 {
            watch.display.clear_colon();
        } else {
            watch.display.set_colon();
        }

        if !self.animate && self.last_second != Some(now.second) {
            self.last_second = Some(now.second);
            watch.scheduler.request_tick_frequency(TickFrequency::Hz32);
            self.start = 0;
            self.end = 0;
            self.animation = 0;
            self.animate = true;
            let (tens, ones) = Self::hour_digits(now.hour, watch.settings.clock.mode_24h);
            self.digits = [
                tens,
                ones,
                now.minute / 10,
                now.minute % 10,
                now.second / 10,
                now.second % 10,
            ];
        } else {
            // Mid-pass, keep the hour digits honest if the mode changed.
            let (tens, ones) = Self::hour_digits(now.hour, watch.settings.clock.mode_24h);
            self.digits[0] = tens;
            self.digits[1] = ones;
        }

        if self.animate {
            self.step_animation(watch);
        }

        if !self.animate && self.frequency_switch_delay > 0 {
            self.frequency_switch_delay -= 1;
            if self.frequency_switch_delay == 0 {
                watch.scheduler.request_tick_frequency(TickFrequency::Hz4);
            }
        }
    }

    fn update_low_energy(&mut self, watch: &mut Watch) {
        self.animate = false;
        watch.scheduler.request_tick_frequency(TickFrequency::Hz1);
        watch.display.set_colon();

        let now = watch.rtc.now();
        let hour = if watch.settings.clock.mode_24h {
            now.hour
        } else {
            match now.hour % 12 {
                0 => 12,
                h => h,
            }
        };
        let text = format!("{:2}{:02}  ", hour, now.minute);
        watch.display.display_string(&text, 4, DigitStyle::Normal);

        if !watch.scheduler.tick_animation_running() {
            watch.scheduler.start_tick_animation(500);
        }
    }
}

impl Default for ScanFace {
    fn default() -> Self {
        Self::new()
    }
}

impl Face for ScanFace {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn activate(&mut self, watch: &mut Watch) {
        watch.scheduler.stop_tick_animation();
        // Fast enough to catch second changes, cheap enough to idle at.
        watch.scheduler.request_tick_frequency(TickFrequency::Hz4);
        self.animate = false;
        self.animation = 0;
        self.start = 0;
        self.end = 0;
        self.last_second = None;
        self.frequency_switch_delay = 0;
    }

    fn on_event(&mut self, event: Event, watch: &mut Watch) -> bool {
        match event.event_type {
            EventType::Activate => true,
            EventType::Tick => {
                self.tick(watch);
                true
            }
            EventType::LowEnergyUpdate => {
                self.update_low_energy(watch);
                true
            }
            _ => default_event_handler(event, watch),
        }
    }

    fn resign(&mut self, watch: &mut Watch) {
        watch.scheduler.request_tick_frequency(TickFrequency::Hz1);
        watch.scheduler.stop_tick_animation();
    }
}
