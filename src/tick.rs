//! # Tick Scheduler
//!
//! Owns the periodic-interrupt rate the active face runs at, and the
//! one-shot tick animation used as a "still alive" indicator while the
//! watch sleeps. Only the four hardware-supported rates exist; anything a
//! face wants beyond 1 Hz costs battery, so the dispatcher drops the rate
//! back to 1 Hz whenever the active face changes.

/// The periodic tick rates the hardware timer can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TickFrequency {
    /// One tick per second, the idle baseline.
    Hz1,
    /// Four ticks per second.
    Hz4,
    /// Eight ticks per second.
    Hz8,
    /// Thirty-two ticks per second, for scanning animation only.
    Hz32,
}

impl TickFrequency {
    /// Ticks per second.
    pub fn hz(self) -> u8 {
        match self {
            TickFrequency::Hz1 => 1,
            TickFrequency::Hz4 => 4,
            TickFrequency::Hz8 => 8,
            TickFrequency::Hz32 => 32,
        }
    }
}

/// Scheduler state: the current tick rate plus the sleep animation flag.
#[derive(Debug)]
pub struct TickScheduler {
    frequency: TickFrequency,
    animation_period_ms: Option<u32>,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler {
    /// A scheduler idling at 1 Hz with no animation running.
    pub fn new() -> Self {
        Self {
            frequency: TickFrequency::Hz1,
            animation_period_ms: None,
        }
    }

    /// Request a new periodic tick rate. Takes effect from the next tick.
    pub fn request_tick_frequency(&mut self, frequency: TickFrequency) {
        self.frequency = frequency;
    }

    /// The rate ticks are currently delivered at.
    pub fn frequency(&self) -> TickFrequency {
        self.frequency
    }

    /// Start the hardware tick animation with the given period. Restarting
    /// replaces the period of an already running animation.
    pub fn start_tick_animation(&mut self, period_ms: u32) {
        self.animation_period_ms = Some(period_ms);
    }

    /// Stop the tick animation. Idempotent.
    pub fn stop_tick_animation(&mut self) {
        self.animation_period_ms = None;
    }

    /// Whether the tick animation is running.
    pub fn tick_animation_running(&self) -> bool {
        self.animation_period_ms.is_some()
    }

    /// Back to the idle baseline: 1 Hz, no animation.
    pub fn reset(&mut self) {
        self.frequency = TickFrequency::Hz1;
        self.stop_tick_animation();
    }

    /// Subsecond counter values a full second spans at the current rate:
    /// `0..hz()`.
    pub fn subseconds(&self) -> std::ops::Range<u8> {
        0..self.frequency.hz()
    }
}
