//! # Entropy Face
//!
//! An anti-clock. Over the course of each hour the display dissolves into
//! noise: every ten minutes another sixth of the LCD's segments joins a
//! shuffled active set, and each active segment blinks at its own randomly
//! assigned rate and phase. On the hour everything goes dark and a fresh
//! shuffle begins.
//!
//! The tick rate is adaptive: 8 Hz while any segment is blinking, 1 Hz in
//! the quiet first moments of the hour and always in low-energy mode, where
//! the face degrades to a static snapshot of the active set.

use crate::charset::{
    SegPin, COLON, DIGIT_SEGMENTS, EXTRA_POS0, EXTRA_POS1, EXTRA_POS1_T, INDICATOR_SEGMENTS,
    POSITION_COUNT,
};
use crate::dispatcher::{default_event_handler, Face, Watch};
use crate::rtc::DateTime;
use crate::tick::TickFrequency;
use crate::{Event, EventType};

/// Per-segment blink assignment: a divisor of the 8 Hz base rate, a phase
/// offset, and a random inversion so segments with the same rate do not
/// march in lockstep.
#[derive(Clone, Copy, Debug, Default)]
struct BlinkSlot {
    /// Ticks per half-period at 8 Hz: 2, 4 or 8 (4, 2 and 1 Hz blink).
    divisor: u8,
    /// 0..=3 tick phase offset.
    phase: u8,
    /// Invert the on/off sense.
    invert: bool,
}

pub struct EntropyFace {
    segments: Vec<SegPin>,
    order: Vec<usize>,
    blink: Vec<BlinkSlot>,
    current_on: Vec<bool>,
    cumulative_counts: [usize; 6],
    last_hour: Option<u8>,
}

fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// The RTC register image the activation seed mixes in.
fn pack_date_time(date_time: &DateTime) -> u32 {
    ((date_time.year.wrapping_sub(2020) as u32 & 0x3F) << 26)
        | ((date_time.month as u32) << 22)
        | ((date_time.day as u32) << 17)
        | ((date_time.hour as u32) << 12)
        | ((date_time.minute as u32) << 6)
        | date_time.second as u32
}

/// Every physical electrode pair on the LCD, deduplicated: the ten digit
/// positions (which share electrodes), the colon, the five indicators and
/// the three extra descender pixels.
fn build_unique_segments() -> Vec<SegPin> {
    let mut seen = [[false; 24]; 3];
    let mut segments = Vec::new();
    let mut push = |pin: SegPin, segments: &mut Vec<SegPin>| {
        let (com, seg) = pin;
        if !seen[com as usize][seg as usize] {
            seen[com as usize][seg as usize] = true;
            segments.push(pin);
        }
    };
    for position in 0..POSITION_COUNT {
        for pin in DIGIT_SEGMENTS[position].iter().flatten() {
            push(*pin, &mut segments);
        }
    }
    push(COLON, &mut segments);
    for pin in INDICATOR_SEGMENTS.iter() {
        push(*pin, &mut segments);
    }
    for pin in [EXTRA_POS0, EXTRA_POS1, EXTRA_POS1_T] {
        push(pin, &mut segments);
    }
    segments
}

impl EntropyFace {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            order: Vec::new(),
            blink: Vec::new(),
            current_on: Vec::new(),
            cumulative_counts: [0; 6],
            last_hour: None,
        }
    }

    fn shuffle_order(&mut self, rng: &mut u32) {
        let n = self.segments.len();
        self.order = (0..n).collect();
        for i in (2..=n).rev() {
            let j = (xorshift32(rng) % i as u32) as usize;
            self.order.swap(i - 1, j);
        }
    }

    fn assign_blink_rates(&mut self, rng: &mut u32) {
        let n = self.segments.len();
        self.blink.clear();
        self.current_on = vec![false; n];
        for _ in 0..n {
            // Only rates that divide 8 Hz evenly: 1, 2 or 4 Hz.
            let divisor = match xorshift32(rng) % 3 {
                0 => 8,
                1 => 4,
                _ => 2,
            };
            let phase = (xorshift32(rng) & 0x03) as u8;
            let invert = xorshift32(rng) & 0x01 != 0;
            self.blink.push(BlinkSlot { divisor, phase, invert });
        }
    }

    /// One sixth of the segment count per ten-minute chunk, remainders
    /// spread over the earliest chunks so the six counts sum exactly.
    fn compute_chunk_counts(&mut self) {
        let n = self.segments.len();
        let base = n / 6;
        let rem = n % 6;
        let mut sum = 0;
        for (k, cumulative) in self.cumulative_counts.iter_mut().enumerate() {
            sum += base + usize::from(k < rem);
            *cumulative = sum;
        }
    }

    fn reseed(&mut self, mut seed: u32) {
        self.shuffle_order(&mut seed);
        self.assign_blink_rates(&mut seed);
        self.compute_chunk_counts();
    }

    fn turn_off_all(&mut self, watch: &mut Watch) {
        for (i, (com, seg)) in self.segments.iter().enumerate() {
            watch.display.clear_pixel(*com, *seg);
            self.current_on[i] = false;
        }
    }

    fn active_target(&self, minute: u8) -> usize {
        let chunk = (minute / 10).min(5) as usize;
        self.cumulative_counts[chunk]
    }

    fn apply_activation_and_blink(&mut self, watch: &mut Watch, subsecond: u8, target: usize) {
        for idx in 0..self.order.len() {
            let seg_index = self.order[idx];
            let (com, seg) = self.segments[seg_index];
            if idx >= target {
                if self.current_on[seg_index] {
                    watch.display.clear_pixel(com, seg);
                    self.current_on[seg_index] = false;
                }
                continue;
            }
            let slot = self.blink[seg_index];
            let mut on = ((subsecond + slot.phase) / slot.divisor) & 1 == 0;
            if slot.invert {
                on = !on;
            }
            if on != self.current_on[seg_index] {
                if on {
                    watch.display.set_pixel(com, seg);
                } else {
                    watch.display.clear_pixel(com, seg);
                }
                self.current_on[seg_index] = on;
            }
        }
    }

    /// Static snapshot: the active set fully lit, nothing blinking.
    fn apply_snapshot(&mut self, watch: &mut Watch, target: usize) {
        for idx in 0..self.order.len() {
            let seg_index = self.order[idx];
            let (com, seg) = self.segments[seg_index];
            let should_on = idx < target;
            if should_on != self.current_on[seg_index] {
                if should_on {
                    watch.display.set_pixel(com, seg);
                } else {
                    watch.display.clear_pixel(com, seg);
                }
                self.current_on[seg_index] = should_on;
            }
        }
    }

    fn update(&mut self, watch: &mut Watch, subsecond: u8, low_energy: bool) {
        let now = watch.rtc.now();

        // Hour rollover: darkness, then a fresh shuffle.
        if self.last_hour != Some(now.hour) {
            self.turn_off_all(watch);
            let seed = (pack_date_time(&now) ^ 0xC3C3_C3C3).wrapping_add(
                (now.second as u32)
                    .wrapping_mul(1_103_515_245)
                    .wrapping_add(12_345),
            );
            self.reseed(seed);
            self.last_hour = Some(now.hour);
        }

        let target = self.active_target(now.minute);

        if low_energy {
            watch.scheduler.request_tick_frequency(TickFrequency::Hz1);
            self.apply_snapshot(watch, target);
        } else {
            if target > 0 {
                watch.scheduler.request_tick_frequency(TickFrequency::Hz8);
            } else {
                watch.scheduler.request_tick_frequency(TickFrequency::Hz1);
            }
            let subsecond = if watch.scheduler.frequency() == TickFrequency::Hz8 {
                subsecond & 0x07
            } else {
                0
            };
            self.apply_activation_and_blink(watch, subsecond, target);
        }
    }
}

impl Default for EntropyFace {
    fn default() -> Self {
        Self::new()
    }
}

impl Face for EntropyFace {
    fn name(&self) -> &'static str {
        "entropy"
    }

    fn setup(&mut self, _watch: &mut Watch) {
        self.segments = build_unique_segments();
        self.current_on = vec![false; self.segments.len()];
    }

    fn activate(&mut self, watch: &mut Watch) {
        watch.scheduler.stop_tick_animation();
        watch.scheduler.request_tick_frequency(TickFrequency::Hz1);
        watch.display.clear_display();

        let now = watch.rtc.now();
        let seed = (pack_date_time(&now) ^ 0xA5A5_A5A5).wrapping_add(
            (now.second as u32)
                .wrapping_mul(1_664_525)
                .wrapping_add(1_013_904_223),
        );
        self.reseed(seed);
        self.last_hour = Some(now.hour);
        self.current_on = vec![false; self.segments.len()];
    }

    fn on_event(&mut self, event: Event, watch: &mut Watch) -> bool {
        match event.event_type {
            EventType::Activate | EventType::Tick => {
                self.update(watch, event.subsecond, false);
                true
            }
            EventType::LowEnergyUpdate => {
                self.update(watch, 0, true);
                true
            }
            _ => default_event_handler(event, watch),
        }
    }

    fn resign(&mut self, watch: &mut Watch) {
        watch.scheduler.request_tick_frequency(TickFrequency::Hz1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtc::VirtualRtc;

    fn dt(hour: u8, minute: u8, second: u8) -> DateTime {
        DateTime { year: 2026, month: 8, day: 31, hour, minute, second }
    }

    fn activated(start: DateTime) -> (EntropyFace, Watch, VirtualRtc) {
        let rtc = VirtualRtc::new(start);
        let mut watch = Watch::new(Box::new(rtc.clone()));
        let mut face = EntropyFace::new();
        face.setup(&mut watch);
        face.activate(&mut watch);
        face.on_event(Event::of(EventType::Activate, 0), &mut watch);
        (face, watch, rtc)
    }

    #[test]
    fn covers_every_electrode_exactly_once() {
        let segments = build_unique_segments();
        assert_eq!(segments.len(), 72);
        let mut sorted = segments.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), segments.len());
    }

    #[test]
    fn chunk_counts_are_monotone_and_cover_everything() {
        let (face, _watch, _rtc) = activated(dt(10, 0, 0));
        let counts = face.cumulative_counts;
        assert_eq!(counts, [12, 24, 36, 48, 60, 72]);
        assert_eq!(face.active_target(0), 12);
        assert_eq!(face.active_target(9), 12);
        assert_eq!(face.active_target(10), 24);
        assert_eq!(face.active_target(59), 72);
    }

    #[test]
    fn same_seed_gives_the_same_chaos() {
        let start = dt(14, 25, 42);
        let (mut a, mut watch_a, _rtc_a) = activated(start);
        let (mut b, mut watch_b, _rtc_b) = activated(start);
        for subsecond in 0..8 {
            a.on_event(Event::tick(subsecond), &mut watch_a);
            b.on_event(Event::tick(subsecond), &mut watch_b);
            for com in 0..3 {
                for seg in 0..24 {
                    assert_eq!(
                        watch_a.display.pixel(com, seg),
                        watch_b.display.pixel(com, seg),
                        "({com},{seg}) diverged at subsecond {subsecond}"
                    );
                }
            }
        }
        assert!(watch_a.display.lit_count() > 0);
    }

    #[test]
    fn lit_segments_never_exceed_the_active_target() {
        let (mut face, mut watch, _rtc) = activated(dt(9, 35, 7));
        for subsecond in 0..8 {
            face.on_event(Event::tick(subsecond), &mut watch);
            assert!(watch.display.lit_count() <= face.active_target(35));
        }
    }

    #[test]
    fn adaptive_frequency_follows_the_active_set() {
        // Mid-hour there is always something to blink.
        let (_face, watch, _rtc) = activated(dt(9, 35, 7));
        assert_eq!(watch.scheduler.frequency(), TickFrequency::Hz8);
    }

    #[test]
    fn hour_rollover_reshuffles() {
        let (mut face, mut watch, rtc) = activated(dt(10, 59, 59));
        face.on_event(Event::tick(0), &mut watch);
        assert!(watch.display.lit_count() > 0);
        rtc.set(dt(11, 0, 0));
        face.on_event(Event::tick(0), &mut watch);
        // Top of the new hour: only the first chunk is active again.
        assert!(watch.display.lit_count() <= 12);
        assert_eq!(face.last_hour, Some(11));
    }

    #[test]
    fn low_energy_snapshot_is_static_and_slow() {
        let (mut face, mut watch, _rtc) = activated(dt(9, 45, 0));
        face.on_event(Event::of(EventType::LowEnergyUpdate, 0), &mut watch);
        assert_eq!(watch.scheduler.frequency(), TickFrequency::Hz1);
        assert_eq!(watch.display.lit_count(), face.active_target(45));
        let first = watch.display.render_ascii();
        face.on_event(Event::of(EventType::LowEnergyUpdate, 0), &mut watch);
        assert_eq!(watch.display.render_ascii(), first);
    }

    #[test]
    fn resign_drops_back_to_one_hertz() {
        let (mut face, mut watch, _rtc) = activated(dt(9, 45, 0));
        assert_eq!(watch.scheduler.frequency(), TickFrequency::Hz8);
        face.resign(&mut watch);
        assert_eq!(watch.scheduler.frequency(), TickFrequency::Hz1);
    }
}
