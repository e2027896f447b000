//! # Segment LCD Display Driver
//!
//! The only component that touches hardware pins. Everything here is built on
//! two infallible primitives, set-pixel and clear-pixel over a bounded
//! (common, segment) address space, forwarded to an injected
//! [`SegmentHardware`] sink so tests can swap in a recorder and assert on the
//! exact writes a face issued.
//!
//! On top of the primitives sit the indicator/colon toggles and the legacy
//! string renderer, which decodes ASCII into per-position segment patterns
//! through the character set table. The renderer applies per-position
//! *character substitution rules* for glyphs the irregular digit wiring
//! cannot show faithfully; visual correctness depends on those rules
//! bit-for-bit, in both the normal and the inverted digit style.
//!
//! The driver keeps a shadow of the segment-enable state (the equivalent of
//! the LCD controller's registers) so the simulator and tests can read back
//! what is lit. Faces do not use the shadow for diffing; each face tracks its
//! own previously rendered values, because a redundant `set_pixel` still
//! costs a hardware write.

use crate::charset::{
    char_segments, SegPin, COLON, DIGIT_SEGMENTS, EXTRA_POS0, EXTRA_POS1, EXTRA_POS1_T,
    INDICATOR_SEGMENTS, POSITION_COUNT,
};
use std::cell::RefCell;
use std::rc::Rc;

/// The injected hardware seam: one physical pin-state change per call.
///
/// Implementations must be infallible; there is nothing a caller could do
/// with a failed segment write.
pub trait SegmentHardware {
    /// Drive the electrode pair on.
    fn set_segment(&mut self, com: u8, seg: u8);
    /// Drive the electrode pair off.
    fn clear_segment(&mut self, com: u8, seg: u8);
}

/// Sink for running without a physical LCD controller attached.
#[derive(Debug, Default)]
pub struct NullHardware;

impl SegmentHardware for NullHardware {
    fn set_segment(&mut self, _com: u8, _seg: u8) {}
    fn clear_segment(&mut self, _com: u8, _seg: u8) {}
}

/// One recorded hardware write, for assertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentWrite {
    /// true for set, false for clear.
    pub on: bool,
    /// Common pin.
    pub com: u8,
    /// Segment pin.
    pub seg: u8,
}

/// Shared handle onto the writes a [`RecordingHardware`] has seen.
#[derive(Clone, Debug, Default)]
pub struct WriteLog(Rc<RefCell<Vec<SegmentWrite>>>);

impl WriteLog {
    /// Snapshot of all writes so far.
    pub fn writes(&self) -> Vec<SegmentWrite> {
        self.0.borrow().clone()
    }

    /// Number of writes so far.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Test double that records every (com, seg) write for assertion.
#[derive(Debug, Default)]
pub struct RecordingHardware {
    log: WriteLog,
}

impl RecordingHardware {
    /// Create the recorder and the handle used to inspect it later.
    pub fn new() -> (Self, WriteLog) {
        let log = WriteLog::default();
        (
            Self { log: log.clone() },
            log,
        )
    }
}

impl SegmentHardware for RecordingHardware {
    fn set_segment(&mut self, com: u8, seg: u8) {
        self.log.0.borrow_mut().push(SegmentWrite { on: true, com, seg });
    }

    fn clear_segment(&mut self, com: u8, seg: u8) {
        self.log.0.borrow_mut().push(SegmentWrite { on: false, com, seg });
    }
}

/// The fixed-purpose icon segments around the digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indicator {
    /// Hourly chime indicator.
    Signal,
    /// Alarm-set bell.
    Bell,
    /// PM indicator for 12-hour mode.
    Pm,
    /// 24-hour mode indicator.
    Hour24,
    /// The LAP icon; the clock faces reuse it as a battery warning.
    Lap,
    /// Battery warning; falls back to the LAP icon on this LCD.
    Battery,
    /// Sleep indicator; this LCD has no segment for it (use the tick
    /// animation to indicate sleep instead).
    Sleep,
}

impl Indicator {
    fn pin(self) -> Option<SegPin> {
        match self {
            Indicator::Signal => Some(INDICATOR_SEGMENTS[0]),
            Indicator::Bell => Some(INDICATOR_SEGMENTS[1]),
            Indicator::Pm => Some(INDICATOR_SEGMENTS[2]),
            Indicator::Hour24 => Some(INDICATOR_SEGMENTS[3]),
            Indicator::Lap | Indicator::Battery => Some(INDICATOR_SEGMENTS[4]),
            Indicator::Sleep => None,
        }
    }
}

/// Digit rendering style: lit-on-dark, or the inverted face's dark-on-lit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigitStyle {
    /// Glyph segments on, background segments off.
    Normal,
    /// Glyph segments off, background segments on.
    Inverted,
}

/// The segment LCD driver.
pub struct Display {
    hw: Box<dyn SegmentHardware>,
    // Shadow of the controller's segment-enable state, for readback only.
    pixels: [[bool; 24]; 3],
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl Display {
    /// A display with no physical controller attached.
    pub fn new() -> Self {
        Self::with_hardware(Box::new(NullHardware))
    }

    /// A display forwarding every write to the given hardware sink.
    pub fn with_hardware(hw: Box<dyn SegmentHardware>) -> Self {
        Self {
            hw,
            pixels: [[false; 24]; 3],
        }
    }

    fn in_range(com: u8, seg: u8) -> bool {
        debug_assert!(com <= 2 && seg <= 23, "pixel out of range: ({com},{seg})");
        com <= 2 && seg <= 23
    }

    /// Turn one electrode pair on. Idempotent, always succeeds; out-of-range
    /// addresses are a programmer error and are dropped after an assert in
    /// debug builds.
    pub fn set_pixel(&mut self, com: u8, seg: u8) {
        if Self::in_range(com, seg) {
            self.pixels[com as usize][seg as usize] = true;
            self.hw.set_segment(com, seg);
        }
    }

    /// Turn one electrode pair off.
    pub fn clear_pixel(&mut self, com: u8, seg: u8) {
        if Self::in_range(com, seg) {
            self.pixels[com as usize][seg as usize] = false;
            self.hw.clear_segment(com, seg);
        }
    }

    /// Current on/off state of one electrode pair.
    pub fn pixel(&self, com: u8, seg: u8) -> bool {
        com <= 2 && seg <= 23 && self.pixels[com as usize][seg as usize]
    }

    /// How many electrode pairs are currently on.
    pub fn lit_count(&self) -> usize {
        self.pixels
            .iter()
            .flat_map(|row| row.iter())
            .filter(|on| **on)
            .count()
    }

    /// Clear every segment, indicator and the colon.
    pub fn clear_display(&mut self) {
        for com in 0..3u8 {
            for seg in 0..24u8 {
                if self.pixels[com as usize][seg as usize] {
                    self.clear_pixel(com, seg);
                }
            }
        }
    }

    /// Turn an indicator icon on.
    pub fn set_indicator(&mut self, indicator: Indicator) {
        if let Some((com, seg)) = indicator.pin() {
            self.set_pixel(com, seg);
        }
    }

    /// Turn an indicator icon off.
    pub fn clear_indicator(&mut self, indicator: Indicator) {
        if let Some((com, seg)) = indicator.pin() {
            self.clear_pixel(com, seg);
        }
    }

    /// Current state of an indicator icon.
    pub fn indicator(&self, indicator: Indicator) -> bool {
        indicator.pin().is_some_and(|(com, seg)| self.pixel(com, seg))
    }

    /// Turn the colon between hours and minutes on.
    pub fn set_colon(&mut self) {
        self.set_pixel(COLON.0, COLON.1);
    }

    /// Turn the colon off.
    pub fn clear_colon(&mut self) {
        self.clear_pixel(COLON.0, COLON.1);
    }

    /// Current colon state.
    pub fn colon(&self) -> bool {
        self.pixel(COLON.0, COLON.1)
    }

    /// Display a string starting at the given position (0..=9). A space in
    /// any position blanks that digit (or fills it, in the inverted style).
    /// Positions past 9 are dropped. Does not clear other positions.
    pub fn display_string(&mut self, string: &str, position: u8, style: DigitStyle) {
        for (i, character) in string.chars().enumerate() {
            let position = position as usize + i;
            if position >= POSITION_COUNT {
                break;
            }
            self.display_character(character, position as u8, style);
        }
    }

    /// Display one character at one position, applying the per-position
    /// substitution rules and the extra descender pixels.
    pub fn display_character(&mut self, character: char, position: u8, style: DigitStyle) {
        let position = (position as usize).min(POSITION_COUNT - 1);
        let character = substitute(character, position);

        // Reset the extra pixels to the style's background before drawing.
        let background: fn(&mut Display, u8, u8) = match style {
            DigitStyle::Normal => Display::clear_pixel,
            DigitStyle::Inverted => Display::set_pixel,
        };
        if position == 0 {
            background(self, EXTRA_POS0.0, EXTRA_POS0.1);
        } else if position == 1 {
            background(self, EXTRA_POS1.0, EXTRA_POS1.1);
            background(self, EXTRA_POS1_T.0, EXTRA_POS1_T.1);
        }

        self.draw_pattern(char_segments(character), position, style);

        // Extra segments the plain seven cannot express.
        let foreground: fn(&mut Display, u8, u8) = match style {
            DigitStyle::Normal => Display::set_pixel,
            DigitStyle::Inverted => Display::clear_pixel,
        };
        if character == 'T' && position == 1 {
            foreground(self, EXTRA_POS1_T.0, EXTRA_POS1_T.1);
        } else if position == 0 && matches!(character, 'B' | 'D' | '@') {
            foreground(self, EXTRA_POS0.0, EXTRA_POS0.1);
        } else if position == 1 && matches!(character, 'B' | 'D' | '@') {
            foreground(self, EXTRA_POS1.0, EXTRA_POS1.1);
        }
    }

    /// Partial low-power update of the seconds digits (positions 8 and 9
    /// only): a raw pattern render with no substitution and no extra pixels,
    /// so a seconds-only refresh touches the minimum number of electrodes.
    pub fn display_character_lp_seconds(&mut self, character: char, position: u8, style: DigitStyle) {
        let position = (position as usize).min(POSITION_COUNT - 1);
        self.draw_pattern(char_segments(character), position, style);
    }

    fn draw_pattern(&mut self, pattern: u8, position: usize, style: DigitStyle) {
        for (slot, pin) in DIGIT_SEGMENTS[position].iter().enumerate() {
            let Some((com, seg)) = *pin else { continue };
            let mut on = (pattern >> slot) & 1 == 1;
            if style == DigitStyle::Inverted {
                on = !on;
            }
            if on {
                self.set_pixel(com, seg);
            } else {
                self.clear_pixel(com, seg);
            }
        }
    }

    /// Render the current LCD state as ASCII art for the terminal simulator.
    ///
    /// Weekday and day-of-month digits on the first band, the six main-line
    /// digits (with the colon) on the second, active indicators below.
    pub fn render_ascii(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.render_band(&[0, 1, 2, 3], None));
        out.push_str(&self.render_band(&[4, 5, 6, 7, 8, 9], Some(2)));
        let mut icons: Vec<&str> = Vec::new();
        for (indicator, name) in [
            (Indicator::Signal, "SIG"),
            (Indicator::Bell, "BELL"),
            (Indicator::Pm, "PM"),
            (Indicator::Hour24, "24H"),
            (Indicator::Lap, "LAP"),
        ] {
            if self.indicator(indicator) {
                icons.push(name);
            }
        }
        out.push_str(&format!("[{}]\n", icons.join(" ")));
        out
    }

    fn render_band(&self, positions: &[usize], colon_after: Option<usize>) -> String {
        let mut rows = [String::new(), String::new(), String::new()];
        for (idx, &position) in positions.iter().enumerate() {
            let slot_on = |slot: usize| -> bool {
                DIGIT_SEGMENTS[position][slot]
                    .map(|(com, seg)| self.pixel(com, seg))
                    .unwrap_or(false)
            };
            rows[0].push(' ');
            rows[0].push(if slot_on(0) { '_' } else { ' ' });
            rows[0].push(' ');
            rows[1].push(if slot_on(5) { '|' } else { ' ' });
            rows[1].push(if slot_on(6) { '_' } else { ' ' });
            rows[1].push(if slot_on(1) { '|' } else { ' ' });
            rows[2].push(if slot_on(4) { '|' } else { ' ' });
            rows[2].push(if slot_on(3) { '_' } else { ' ' });
            rows[2].push(if slot_on(2) { '|' } else { ' ' });
            if colon_after == Some(idx) {
                let colon = if self.colon() { ':' } else { ' ' };
                rows[0].push(' ');
                rows[1].push(colon);
                rows[2].push(colon);
            } else {
                for row in rows.iter_mut() {
                    row.push(' ');
                }
            }
        }
        format!("{}\n{}\n{}\n", rows[0], rows[1], rows[2])
    }
}

/// Per-position character substitution for glyphs the digit wiring cannot
/// show as-is. The rules are position-dependent because the positions are
/// wired differently (shared electrodes, missing segments, the extra eighth
/// segment of position 0). Preserved exactly; rendering correctness of
/// several faces depends on each remap.
fn substitute(mut character: char, position: usize) -> char {
    if position == 4 || position == 6 {
        character = match character {
            '7' => '&',
            'A' => 'a',
            'o' => 'O',
            'L' => '!',
            'M' | 'm' | 'N' => 'n',
            'c' => 'C',
            'J' => 'j',
            't' | 'T' => '+',
            'y' | 'Y' => '4',
            'v' | 'V' | 'U' | 'W' | 'w' => 'u',
            other => other,
        };
    } else {
        character = match character {
            'u' => 'v',
            'j' => 'J',
            other => other,
        };
    }
    if position > 1 && character == 'T' {
        character = 't';
    }
    if position == 1 {
        character = match character {
            'a' => 'A',
            'o' => 'O',
            'i' => 'l',
            'n' => 'N',
            'r' => 'R',
            'd' => 'D',
            'v' | 'V' | 'u' => 'U',
            'b' => 'B',
            'c' => 'C',
            other => other,
        };
    } else if character == 'R' {
        character = 'r';
    }
    if position != 0 && character == 'I' {
        character = 'l';
    }
    character
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::MAIN_LINE;

    #[test]
    fn set_and_clear_round_trip() {
        let mut display = Display::new();
        assert!(!display.pixel(1, 18));
        display.set_pixel(1, 18);
        assert!(display.pixel(1, 18));
        display.clear_pixel(1, 18);
        assert!(!display.pixel(1, 18));
    }

    #[test]
    fn writes_are_forwarded_to_hardware() {
        let (hw, log) = RecordingHardware::new();
        let mut display = Display::with_hardware(Box::new(hw));
        display.set_pixel(0, 5);
        display.clear_pixel(0, 5);
        assert_eq!(
            log.writes(),
            vec![
                SegmentWrite { on: true, com: 0, seg: 5 },
                SegmentWrite { on: false, com: 0, seg: 5 },
            ]
        );
    }

    #[test]
    fn clear_display_clears_indicators_and_colon() {
        let mut display = Display::new();
        display.set_colon();
        display.set_indicator(Indicator::Bell);
        display.display_string("12", 8, DigitStyle::Normal);
        display.clear_display();
        assert_eq!(display.lit_count(), 0);
        assert!(!display.colon());
        assert!(!display.indicator(Indicator::Bell));
    }

    #[test]
    fn battery_indicator_falls_back_to_lap() {
        let mut display = Display::new();
        display.set_indicator(Indicator::Battery);
        assert!(display.indicator(Indicator::Lap));
        // Sleep has no segment on this LCD; setting it must not light anything.
        display.clear_display();
        display.set_indicator(Indicator::Sleep);
        assert_eq!(display.lit_count(), 0);
    }

    #[test]
    fn digit_one_lights_only_b_and_c() {
        let mut display = Display::new();
        display.display_character('1', 9, DigitStyle::Normal);
        let row = &MAIN_LINE[5];
        assert!(display.pixel(row[1].0, row[1].1)); // B
        assert!(display.pixel(row[2].0, row[2].1)); // C
        assert!(!display.pixel(row[0].0, row[0].1)); // A
        assert!(!display.pixel(row[6].0, row[6].1)); // G
    }

    #[test]
    fn inverted_style_complements_normal() {
        let mut normal = Display::new();
        let mut inverted = Display::new();
        normal.display_character('5', 8, DigitStyle::Normal);
        inverted.display_character('5', 8, DigitStyle::Inverted);
        for pin in MAIN_LINE[4].iter() {
            assert_ne!(
                normal.pixel(pin.0, pin.1),
                inverted.pixel(pin.0, pin.1),
                "segment {:?} should differ between styles",
                pin
            );
        }
    }

    #[test]
    fn substitution_is_position_dependent() {
        // '7' becomes the lowercase-seven ampersand glyph only where the
        // digit shares its A/D electrode.
        assert_eq!(substitute('7', 4), '&');
        assert_eq!(substitute('7', 5), '7');
        // Ambiguous glyph remaps.
        assert_eq!(substitute('o', 4), 'O');
        assert_eq!(substitute('a', 1), 'A');
        assert_eq!(substitute('T', 4), '+');
        assert_eq!(substitute('T', 5), 't');
        assert_eq!(substitute('W', 6), 'u');
        assert_eq!(substitute('I', 5), 'l');
        assert_eq!(substitute('I', 0), 'I');
        assert_eq!(substitute('R', 3), 'r');
        assert_eq!(substitute('r', 1), 'R');
    }

    #[test]
    fn descender_pixels_follow_style() {
        let mut display = Display::new();
        display.display_character('B', 0, DigitStyle::Normal);
        assert!(display.pixel(EXTRA_POS0.0, EXTRA_POS0.1));
        display.display_character('1', 0, DigitStyle::Normal);
        assert!(!display.pixel(EXTRA_POS0.0, EXTRA_POS0.1));

        let mut inverted = Display::new();
        inverted.display_character('B', 0, DigitStyle::Inverted);
        assert!(!inverted.pixel(EXTRA_POS0.0, EXTRA_POS0.1));
        inverted.display_character('1', 0, DigitStyle::Inverted);
        assert!(inverted.pixel(EXTRA_POS0.0, EXTRA_POS0.1));
    }

    #[test]
    fn capital_t_in_position_one_uses_the_crossbar() {
        let mut display = Display::new();
        display.display_character('T', 1, DigitStyle::Normal);
        assert!(display.pixel(EXTRA_POS1_T.0, EXTRA_POS1_T.1));
    }

    #[test]
    fn string_render_stops_at_the_last_position() {
        let mut display = Display::new();
        // Five characters starting at 8 would run off the end; only two land.
        display.display_string("12345", 8, DigitStyle::Normal);
        let mut other = Display::new();
        other.display_string("12", 8, DigitStyle::Normal);
        assert_eq!(display.lit_count(), other.lit_count());
    }

    #[test]
    fn ascii_render_mentions_active_indicators() {
        let mut display = Display::new();
        display.set_indicator(Indicator::Bell);
        display.set_indicator(Indicator::Hour24);
        let art = display.render_ascii();
        assert!(art.contains("BELL"));
        assert!(art.contains("24H"));
        assert!(!art.contains("LAP"));
    }
}
