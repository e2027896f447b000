//! # Analog Face
//!
//! A faux analog clock on a seven-segment display. The outlines of the four
//! HH:MM digits form a twelve-step ring; the hour fills the ring clockwise
//! from the top, one step per hour, so 3 o'clock lights three steps and
//! midnight or noon the full ring. The minute hand is a single inner
//! segment stepping through twelve five-minute buckets, blinking in time
//! with the colon.
//!
//! Two ring steps reuse an electrode that also drives another step's
//! segment, so at the hours where that would mislead (1-5 and 8-10) the
//! ambiguous segment blinks at 2 Hz as a tell. Those hours run at 4 Hz;
//! all others at 1 Hz.

use crate::charset::{MAIN_LINE, SegPin};
use crate::dispatcher::{default_event_handler, Face, Watch};
use crate::tick::TickFrequency;
use crate::{Event, EventType};

// (digit, slot) pairs into the four HH:MM rows of MAIN_LINE; slots A..F.
// Clockwise from the top of the third digit.
const RING_ORDER: [(usize, usize); 12] = [
    (2, 0),
    (3, 0),
    (3, 1),
    (3, 2),
    (3, 3),
    (2, 3),
    (1, 3),
    (0, 3),
    (0, 4),
    (0, 5),
    (0, 0),
    (1, 0),
];

// Inner segments for the twelve five-minute buckets of the minute hand.
const MINUTE_ORDER: [(usize, usize); 12] = [
    (2, 5), // 00-04
    (2, 1), // 05-09
    (3, 5), // 10-14
    (3, 6), // 15-19
    (3, 4), // 20-24
    (2, 2), // 25-29
    (1, 2), // 30-34
    (1, 4), // 35-39
    (0, 2), // 40-44
    (0, 6), // 45-49
    (0, 1), // 50-54
    (0, 6), // 55-59, paired with the second digit's centre
];

// Hours 1-5 and 8-10 have an ambiguous tied segment in the ring.
const BLINK_HOURS_MASK: u16 = 0x073E;

const SLOT_G: usize = 6;

fn pin(digit: usize, slot: usize) -> SegPin {
    MAIN_LINE[digit][slot]
}

pub struct AnalogFace {
    last_minute: Option<u8>,
    high_freq: bool,
}

impl AnalogFace {
    pub fn new() -> Self {
        Self {
            last_minute: None,
            high_freq: false,
        }
    }

    fn segment_should_blink(hour_12: u8, digit: usize, slot: usize) -> bool {
        // Top of the third digit shares its electrode with that digit's
        // bottom; bottom of the first digit likewise with its top.
        match (digit, slot) {
            (2, 0) => matches!(hour_12, 1..=5 | 10),
            (0, 3) => matches!(hour_12, 8..=10),
            _ => false,
        }
    }

    fn clear_ring(watch: &mut Watch) {
        for digit in 0..4 {
            for slot in 0..6 {
                let (com, seg) = pin(digit, slot);
                watch.display.clear_pixel(com, seg);
            }
        }
    }

    fn clear_all_centres(watch: &mut Watch) {
        for digit in 0..4 {
            let (com, seg) = pin(digit, SLOT_G);
            watch.display.clear_pixel(com, seg);
        }
    }

    fn render_hour_ring(watch: &mut Watch, hour_12: u8, subsecond: u8, enable_blink: bool) {
        let steps = if hour_12 == 0 { 12 } else { hour_12 as usize };
        Self::clear_ring(watch);
        for &(digit, slot) in RING_ORDER.iter().take(steps) {
            let blinking = enable_blink && Self::segment_should_blink(hour_12, digit, slot);
            // ~2 Hz on a 4 Hz tick.
            let visible = !blinking || subsecond % 2 == 0;
            if visible {
                let (com, seg) = pin(digit, slot);
                watch.display.set_pixel(com, seg);
            }
        }
    }

    /// The companion centre segment some buckets light so the hand reads as
    /// a diagonal rather than a lone sliver.
    fn companion_centre(bucket: usize) -> Option<(usize, usize)> {
        match bucket {
            1 | 3 | 5 => Some((2, SLOT_G)),
            7 | 9 | 11 => Some((1, SLOT_G)),
            _ => None,
        }
    }

    fn render_minute_indicator(watch: &mut Watch, minute: u8, visible: bool) {
        let bucket = (minute / 5).min(11) as usize;
        let mut pins = vec![MINUTE_ORDER[bucket]];
        if let Some(extra) = Self::companion_centre(bucket) {
            pins.push(extra);
        }
        for (digit, slot) in pins {
            let (com, seg) = pin(digit, slot);
            if visible {
                watch.display.set_pixel(com, seg);
            } else {
                watch.display.clear_pixel(com, seg);
            }
        }
    }

    fn update(&mut self, watch: &mut Watch, subsecond: u8) {
        let now = watch.rtc.now();
        let hour_12 = now.hour % 12;

        let should_blink = BLINK_HOURS_MASK & (1 << hour_12) != 0;
        if should_blink != self.high_freq {
            watch.scheduler.request_tick_frequency(if should_blink {
                TickFrequency::Hz4
            } else {
                TickFrequency::Hz1
            });
            self.high_freq = should_blink;
        }

        // The ring only needs a wipe when the minute hand moves.
        if self.last_minute != Some(now.minute) {
            if let Some(last) = self.last_minute {
                Self::render_minute_indicator(watch, last, false);
            }
            self.last_minute = Some(now.minute);
            Self::clear_ring(watch);
        }

        // Colon cadence is 1 Hz regardless of tick rate; the minute hand
        // blinks in step with it.
        let colon_on = if self.high_freq {
            subsecond % 4 == 0
        } else {
            now.second % 2 == 0
        };
        if colon_on {
            watch.display.set_colon();
        } else {
            watch.display.clear_colon();
        }

        let ring_subsecond = if self.high_freq { subsecond } else { 0 };
        Self::render_hour_ring(watch, hour_12, ring_subsecond, self.high_freq);

        Self::render_minute_indicator(watch, now.minute, false);
        if colon_on {
            Self::render_minute_indicator(watch, now.minute, true);
        }
    }

    fn update_low_energy(&mut self, watch: &mut Watch) {
        watch.scheduler.stop_tick_animation();
        watch.scheduler.request_tick_frequency(TickFrequency::Hz1);
        self.high_freq = false;
        watch.display.clear_display();
        watch.display.set_colon();

        let now = watch.rtc.now();
        Self::render_hour_ring(watch, now.hour % 12, 0, false);
        Self::clear_all_centres(watch);
        Self::render_minute_indicator(watch, now.minute, true);
        self.last_minute = Some(now.minute);
    }
}

impl Default for AnalogFace {
    fn default() -> Self {
        Self::new()
    }
}

impl Face for AnalogFace {
    fn name(&self) -> &'static str {
        "analog"
    }

    fn activate(&mut self, watch: &mut Watch) {
        watch.scheduler.stop_tick_animation();
        watch.scheduler.request_tick_frequency(TickFrequency::Hz1);
        self.last_minute = None;
        self.high_freq = false;
    }

    fn on_event(&mut self, event: Event, watch: &mut Watch) -> bool {
        match event.event_type {
            EventType::Activate | EventType::Tick => {
                self.update(watch, event.subsecond);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtc::{DateTime, VirtualRtc};

    fn dt(hour: u8, minute: u8, second: u8) -> DateTime {
        DateTime { year: 2026, month: 8, day: 31, hour, minute, second }
    }

    fn activated(start: DateTime) -> (AnalogFace, Watch, VirtualRtc) {
        let rtc = VirtualRtc::new(start);
        let mut watch = Watch::new(Box::new(rtc.clone()));
        let mut face = AnalogFace::new();
        face.activate(&mut watch);
        face.on_event(Event::of(EventType::Activate, 0), &mut watch);
        (face, watch, rtc)
    }

    fn ring_step_lit(watch: &Watch, step: usize) -> bool {
        let (digit, slot) = RING_ORDER[step];
        let (com, seg) = pin(digit, slot);
        watch.display.pixel(com, seg)
    }

    #[test]
    fn hour_fills_the_ring_clockwise() {
        // Hour 7 does not blink, so every lit step is steady.
        let (_face, watch, _rtc) = activated(dt(7, 2, 0));
        for step in 0..7 {
            assert!(ring_step_lit(&watch, step), "step {step} should be lit");
        }
        for step in 7..12 {
            assert!(!ring_step_lit(&watch, step), "step {step} should be dark");
        }
    }

    #[test]
    fn midnight_lights_the_full_ring() {
        let (_face, watch, _rtc) = activated(dt(0, 2, 0));
        for step in 0..12 {
            assert!(ring_step_lit(&watch, step));
        }
    }

    #[test]
    fn blink_hours_run_at_four_hertz() {
        let (_face, watch, _rtc) = activated(dt(3, 0, 0));
        assert_eq!(watch.scheduler.frequency(), TickFrequency::Hz4);
        let (_face, watch, _rtc) = activated(dt(7, 0, 0));
        assert_eq!(watch.scheduler.frequency(), TickFrequency::Hz1);
        // Full ring at 12 has nothing ambiguous to blink.
        let (_face, watch, _rtc) = activated(dt(12, 0, 0));
        assert_eq!(watch.scheduler.frequency(), TickFrequency::Hz1);
    }

    #[test]
    fn ambiguous_segment_blinks_at_three_o_clock() {
        let (mut face, mut watch, _rtc) = activated(dt(3, 0, 0));
        // Subsecond 0: visible phase.
        face.on_event(Event::tick(0), &mut watch);
        assert!(ring_step_lit(&watch, 0));
        // Subsecond 1: hidden phase for the tied segment, steady for others.
        face.on_event(Event::tick(1), &mut watch);
        assert!(!ring_step_lit(&watch, 0));
        assert!(ring_step_lit(&watch, 1));
        assert!(ring_step_lit(&watch, 2));
    }

    #[test]
    fn minute_hand_steps_every_five_minutes() {
        // 17 past: bucket 3, the fourth digit's centre plus its companion.
        let (_face, watch, _rtc) = activated(dt(7, 17, 0));
        let (com, seg) = pin(3, SLOT_G);
        assert!(watch.display.pixel(com, seg));
        let (com, seg) = pin(2, SLOT_G);
        assert!(watch.display.pixel(com, seg));
        // Colon shares the 1 Hz cadence and second 0 is the visible phase.
        assert!(watch.display.colon());
    }

    #[test]
    fn minute_hand_blinks_with_the_colon() {
        let (mut face, mut watch, rtc) = activated(dt(7, 17, 0));
        rtc.advance_seconds(1);
        face.on_event(Event::tick(0), &mut watch);
        assert!(!watch.display.colon());
        let (com, seg) = pin(3, SLOT_G);
        assert!(!watch.display.pixel(com, seg));
    }

    #[test]
    fn minute_rollover_clears_the_old_hand() {
        let (mut face, mut watch, rtc) = activated(dt(7, 4, 58));
        rtc.advance_seconds(2);
        face.on_event(Event::tick(0), &mut watch);
        // Bucket 0 hand gone, bucket 1 hand present (second 0, visible).
        let (com, seg) = pin(2, 5);
        assert!(!watch.display.pixel(com, seg));
        let (com, seg) = pin(2, 1);
        assert!(watch.display.pixel(com, seg));
    }

    #[test]
    fn low_energy_renders_a_static_frame() {
        let (mut face, mut watch, _rtc) = activated(dt(3, 22, 0));
        face.on_event(Event::of(EventType::LowEnergyUpdate, 0), &mut watch);
        assert_eq!(watch.scheduler.frequency(), TickFrequency::Hz1);
        assert!(watch.display.colon());
        // Three steady ring steps, no blinking even at a blink hour.
        for step in 0..3 {
            assert!(ring_step_lit(&watch, step));
        }
        let first = watch.display.render_ascii();
        face.on_event(Event::of(EventType::LowEnergyUpdate, 0), &mut watch);
        assert_eq!(watch.display.render_ascii(), first);
    }
}
