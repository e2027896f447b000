//! # Timeline Face
//!
//! Shows how far through the day you are, with no digits at all. The 24
//! hours map onto twelve two-hour buckets, one per side of the six main
//! digit positions: the left vertical segments (F and E) for even buckets,
//! the right pair (B and C) for odd ones. A single lit bar crawls from the
//! leftmost digit's left edge at midnight to the rightmost digit's right
//! edge by late evening.
//!
//! Runs at 1 Hz but does its bucket check only when the minute changes;
//! the bar moves every two hours, so even that is generous.

use crate::charset::MAIN_LINE;
use crate::dispatcher::{default_event_handler, Face, Watch};
use crate::tick::TickFrequency;
use crate::{Event, EventType};

// Slot indices into a MAIN_LINE row: A=0, B=1, C=2, D=3, E=4, F=5, G=6.
const RIGHT_SLOTS: [usize; 2] = [1, 2];
const LEFT_SLOTS: [usize; 2] = [5, 4];

pub struct TimelineFace {
    last_bucket: Option<u8>,
    last_digit: Option<usize>,
    last_minute: Option<u8>,
}

impl TimelineFace {
    pub fn new() -> Self {
        Self {
            last_bucket: None,
            last_digit: None,
            last_minute: None,
        }
    }

    fn clear_side_segments(watch: &mut Watch, digit: usize) {
        for slot in LEFT_SLOTS.iter().chain(RIGHT_SLOTS.iter()) {
            let (com, seg) = MAIN_LINE[digit][*slot];
            watch.display.clear_pixel(com, seg);
        }
    }

    fn clear_all_side_segments(watch: &mut Watch) {
        for digit in 0..MAIN_LINE.len() {
            Self::clear_side_segments(watch, digit);
        }
    }

    fn set_side_segments(watch: &mut Watch, digit: usize, left_side: bool) {
        let slots = if left_side { LEFT_SLOTS } else { RIGHT_SLOTS };
        for slot in slots {
            let (com, seg) = MAIN_LINE[digit][slot];
            watch.display.set_pixel(com, seg);
        }
    }

    fn update(&mut self, watch: &mut Watch, skip_same_minute: bool) {
        let now = watch.rtc.now();
        if skip_same_minute && self.last_minute == Some(now.minute) {
            return;
        }
        self.last_minute = Some(now.minute);

        // 00:00-01:59 is bucket 0, 22:00-23:59 is bucket 11.
        let bucket = now.hour / 2;
        if self.last_bucket == Some(bucket) {
            return;
        }
        self.last_bucket = Some(bucket);

        // Clear only the bar's previous home.
        if let Some(digit) = self.last_digit {
            Self::clear_side_segments(watch, digit);
        }

        let digit = (bucket / 2) as usize;
        let left_side = bucket % 2 == 0;
        self.last_digit = Some(digit);
        Self::set_side_segments(watch, digit, left_side);
    }
}

impl Default for TimelineFace {
    fn default() -> Self {
        Self::new()
    }
}

impl Face for TimelineFace {
    fn name(&self) -> &'static str {
        "timeline"
    }

    fn activate(&mut self, watch: &mut Watch) {
        watch.scheduler.stop_tick_animation();
        watch.scheduler.request_tick_frequency(TickFrequency::Hz1);
        self.last_bucket = None;
        self.last_minute = None;
        Self::clear_all_side_segments(watch);
    }

    fn on_event(&mut self, event: Event, watch: &mut Watch) -> bool {
        match event.event_type {
            EventType::Activate | EventType::LowEnergyUpdate => {
                self.update(watch, false);
                true
            }
            EventType::Tick => {
                self.update(watch, true);
                true
            }
            _ => default_event_handler(event, watch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtc::{DateTime, VirtualRtc};

    fn dt(hour: u8, minute: u8, second: u8) -> DateTime {
        DateTime { year: 2026, month: 8, day: 31, hour, minute, second }
    }

    fn activated(start: DateTime) -> (TimelineFace, Watch, VirtualRtc) {
        let rtc = VirtualRtc::new(start);
        let mut watch = Watch::new(Box::new(rtc.clone()));
        let mut face = TimelineFace::new();
        face.activate(&mut watch);
        face.on_event(Event::of(EventType::Activate, 0), &mut watch);
        (face, watch, rtc)
    }

    fn lit_side_pairs(watch: &Watch) -> Vec<(usize, bool)> {
        let mut pairs = Vec::new();
        for digit in 0..MAIN_LINE.len() {
            for (left, slots) in [(true, LEFT_SLOTS), (false, RIGHT_SLOTS)] {
                let lit = slots.iter().all(|slot| {
                    let (com, seg) = MAIN_LINE[digit][*slot];
                    watch.display.pixel(com, seg)
                });
                if lit {
                    pairs.push((digit, left));
                }
            }
        }
        pairs
    }

    #[test]
    fn exactly_one_bar_is_lit() {
        for hour in 0..24 {
            let (_face, watch, _rtc) = activated(dt(hour, 30, 0));
            let pairs = lit_side_pairs(&watch);
            let bucket = hour / 2;
            let expected = ((bucket / 2) as usize, bucket % 2 == 0);
            assert_eq!(pairs, vec![expected], "hour {hour}");
        }
    }

    #[test]
    fn midnight_is_the_far_left_edge() {
        let (_face, watch, _rtc) = activated(dt(0, 0, 0));
        assert_eq!(lit_side_pairs(&watch), vec![(0, true)]);
        let (_face, watch, _rtc) = activated(dt(23, 59, 59));
        assert_eq!(lit_side_pairs(&watch), vec![(5, false)]);
    }

    #[test]
    fn bar_advances_on_the_bucket_boundary() {
        let (mut face, mut watch, rtc) = activated(dt(1, 59, 0));
        assert_eq!(lit_side_pairs(&watch), vec![(0, true)]);
        // Ticks inside the same minute are skipped entirely.
        face.on_event(Event::tick(0), &mut watch);
        assert_eq!(lit_side_pairs(&watch), vec![(0, true)]);

        rtc.set(dt(2, 0, 0));
        face.on_event(Event::tick(0), &mut watch);
        assert_eq!(lit_side_pairs(&watch), vec![(0, false)]);
    }

    #[test]
    fn runs_at_one_hertz() {
        let (_face, watch, _rtc) = activated(dt(12, 0, 0));
        assert_eq!(watch.scheduler.frequency(), TickFrequency::Hz1);
    }
}
