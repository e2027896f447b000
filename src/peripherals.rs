//! # Auxiliary Peripherals
//!
//! The battery monitor and the piezo buzzer, behind traits so the faces can
//! be exercised against recorded doubles. The host implementations are what
//! the terminal simulator wires in.

use std::cell::RefCell;
use std::rc::Rc;

/// Battery voltage source.
pub trait Battery {
    /// Current battery voltage in millivolts.
    fn voltage_mv(&self) -> u16;
}

/// Below this the clock faces show the low-battery icon.
pub const LOW_BATTERY_THRESHOLD_MV: u16 = 2200;

/// A battery that always reads the same voltage. The simulator uses a
/// healthy 3000 mV; tests construct it near the threshold.
#[derive(Clone, Copy, Debug)]
pub struct FixedBattery(pub u16);

impl Default for FixedBattery {
    fn default() -> Self {
        FixedBattery(3000)
    }
}

impl Battery for FixedBattery {
    fn voltage_mv(&self) -> u16 {
        self.0
    }
}

/// The notes the piezo buzzer is driven at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuzzerNote {
    /// 880 Hz, the button-press chirp.
    A5,
    /// 2093 Hz, the hourly chime.
    C7,
    /// 4186 Hz, the end-of-day beep.
    C8,
}

impl BuzzerNote {
    /// Drive frequency in hertz.
    pub fn frequency_hz(self) -> u16 {
        match self {
            BuzzerNote::A5 => 880,
            BuzzerNote::C7 => 2093,
            BuzzerNote::C8 => 4186,
        }
    }
}

/// Piezo buzzer.
pub trait Buzzer {
    /// Sound one note for the given duration. Fire and forget; the watch
    /// does not block on the buzzer.
    fn beep(&mut self, note: BuzzerNote, duration_ms: u16);
}

/// Buzzer that announces beeps on stderr, for the simulator.
#[derive(Debug, Default)]
pub struct ConsoleBuzzer;

impl Buzzer for ConsoleBuzzer {
    fn beep(&mut self, note: BuzzerNote, duration_ms: u16) {
        eprintln!("beep: {} Hz for {} ms", note.frequency_hz(), duration_ms);
    }
}

/// Buzzer double that records every beep for assertion.
#[derive(Debug, Default)]
pub struct RecordingBuzzer {
    log: BeepLog,
}

/// Shared handle onto the beeps a [`RecordingBuzzer`] has sounded.
#[derive(Clone, Debug, Default)]
pub struct BeepLog(Rc<RefCell<Vec<(BuzzerNote, u16)>>>);

impl BeepLog {
    /// Snapshot of all beeps so far.
    pub fn beeps(&self) -> Vec<(BuzzerNote, u16)> {
        self.0.borrow().clone()
    }

    /// Number of beeps so far.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// True if nothing has beeped.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl RecordingBuzzer {
    /// Create the recorder and the handle used to inspect it later.
    pub fn new() -> (Self, BeepLog) {
        let log = BeepLog::default();
        (Self { log: log.clone() }, log)
    }
}

impl Buzzer for RecordingBuzzer {
    fn beep(&mut self, note: BuzzerNote, duration_ms: u16) {
        self.log.0.borrow_mut().push((note, duration_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_battery_reads_back() {
        assert_eq!(FixedBattery(2100).voltage_mv(), 2100);
        assert!(FixedBattery::default().voltage_mv() > LOW_BATTERY_THRESHOLD_MV);
    }

    #[test]
    fn recording_buzzer_captures_beeps() {
        let (mut buzzer, log) = RecordingBuzzer::new();
        assert!(log.is_empty());
        buzzer.beep(BuzzerNote::C8, 150);
        assert_eq!(log.beeps(), vec![(BuzzerNote::C8, 150)]);
    }

    #[test]
    fn note_frequencies() {
        assert_eq!(BuzzerNote::C8.frequency_hz(), 4186);
        assert!(BuzzerNote::A5.frequency_hz() < BuzzerNote::C7.frequency_hz());
    }
}
