//! # Segment Table
//!
//! Static mapping from (digit position, segment slot) to the physical
//! (common, segment) electrode pair, plus the ASCII character set used by the
//! string renderer and the fixed addresses of the colon, the indicator icons,
//! and the three "extra" pixels the character renderer borrows for descenders.
//!
//! The display has ten character positions: the day-of-week digits are
//! positions 0 and 1, the day-of-month digits are positions 2 and 3, and the
//! main clock line occupies positions 4–9. Per-position mappings are
//! irregular: some positions share electrodes between two segments (one pair
//! drives both), and some positions are missing a segment entirely.
//!
//! The board routing behind this table is fixed hardware; nothing in this
//! module is configurable at runtime.

/// One physical LCD electrode pair: common pin 0..=2, segment pin 0..=23.
pub type SegPin = (u8, u8);

/// Number of character positions on the display.
pub const POSITION_COUNT: usize = 10;

/// Segment slots per position. Slots 0..=6 are the classic seven segments
/// A..G; slot 7 is the extra eighth segment only position 0 has.
pub const SLOTS_PER_POSITION: usize = 8;

/// Per-position segment addresses, `None` where the position has no such
/// segment. Character set bit `i` lights slot `i` of the addressed position.
///
/// Shared electrodes appear as repeated pairs (e.g. position 4 drives A and D
/// from one pair); the driver treats a repeated pair as one pixel.
pub const DIGIT_SEGMENTS: [[Option<SegPin>; SLOTS_PER_POSITION]; POSITION_COUNT] = [
    // Position 0: weekday left. Eight real segments plus the out-of-band
    // ninth pixel EXTRA_POS0 handled by the character renderer.
    [
        Some((0, 13)), // A
        Some((1, 13)), // B
        Some((2, 13)), // C
        Some((2, 14)), // D
        Some((1, 14)), // E
        Some((0, 14)), // F
        Some((1, 15)), // G
        Some((2, 15)), // extra
    ],
    // Position 1: weekday right. B and C shared, as are E and F.
    [
        Some((0, 9)), // A
        Some((1, 9)), // B
        Some((1, 9)), // C (shared with B)
        Some((2, 9)), // D
        Some((2, 8)), // E
        Some((2, 8)), // F (shared with E)
        Some((1, 8)), // G
        None,
    ],
    // Position 2: day-of-month tens. A, D and G shared; missing segment F.
    [
        Some((1, 7)), // A
        Some((0, 7)), // B
        Some((2, 7)), // C
        Some((1, 7)), // D (shared with A)
        Some((2, 6)), // E
        None,         // F does not exist
        Some((1, 7)), // G (shared with A)
        None,
    ],
    // Position 3: day-of-month ones. A and G shared.
    [
        Some((0, 11)), // A
        Some((1, 11)), // B
        Some((2, 12)), // C
        Some((2, 11)), // D
        Some((0, 10)), // E
        Some((0, 8)),  // F
        Some((0, 11)), // G (shared with A)
        None,
    ],
    // Position 4: clock hours tens. A and D shared.
    [
        Some((1, 18)), // A
        Some((2, 19)), // B
        Some((0, 19)), // C
        Some((1, 18)), // D (shared with A)
        Some((0, 18)), // E
        Some((2, 18)), // F
        Some((1, 19)), // G
        None,
    ],
    // Position 5: clock hours ones.
    [
        Some((2, 20)), // A
        Some((2, 21)), // B
        Some((1, 21)), // C
        Some((0, 21)), // D
        Some((0, 20)), // E
        Some((1, 17)), // F
        Some((1, 20)), // G
        None,
    ],
    // Position 6: clock minutes tens. A and D shared.
    [
        Some((0, 22)), // A
        Some((2, 23)), // B
        Some((0, 23)), // C
        Some((0, 22)), // D (shared with A)
        Some((1, 22)), // E
        Some((2, 22)), // F
        Some((1, 23)), // G
        None,
    ],
    // Position 7: clock minutes ones.
    [
        Some((2, 1)),  // A
        Some((2, 10)), // B
        Some((0, 1)),  // C
        Some((0, 0)),  // D
        Some((1, 0)),  // E
        Some((2, 0)),  // F
        Some((1, 1)),  // G
        None,
    ],
    // Position 8: clock seconds tens.
    [
        Some((2, 2)), // A
        Some((2, 3)), // B
        Some((0, 4)), // C
        Some((0, 3)), // D
        Some((0, 2)), // E
        Some((1, 2)), // F
        Some((1, 3)), // G
        None,
    ],
    // Position 9: clock seconds ones.
    [
        Some((2, 4)), // A
        Some((2, 5)), // B
        Some((1, 6)), // C
        Some((0, 6)), // D
        Some((0, 5)), // E
        Some((1, 4)), // F
        Some((1, 5)), // G
        None,
    ],
];

/// A..G addresses for the six main-line positions (display positions 4..9),
/// indexed `[position - 4][segment 0..=6]`. This is the view of
/// [`DIGIT_SEGMENTS`] the scanning, analog-ring and timeline faces address
/// segments through when they draw shapes instead of characters.
pub const MAIN_LINE: [[SegPin; 7]; 6] = [
    [(1, 18), (2, 19), (0, 19), (1, 18), (0, 18), (2, 18), (1, 19)],
    [(2, 20), (2, 21), (1, 21), (0, 21), (0, 20), (1, 17), (1, 20)],
    [(0, 22), (2, 23), (0, 23), (0, 22), (1, 22), (2, 22), (1, 23)],
    [(2, 1), (2, 10), (0, 1), (0, 0), (1, 0), (2, 0), (1, 1)],
    [(2, 2), (2, 3), (0, 4), (0, 3), (0, 2), (1, 2), (1, 3)],
    [(2, 4), (2, 5), (1, 6), (0, 6), (0, 5), (1, 4), (1, 5)],
];

/// The colon between the hours and minutes digits.
pub const COLON: SegPin = (1, 16);

/// Indicator icon addresses, in [`crate::display::Indicator`] declaration
/// order: Signal, Bell, PM, 24H, LAP.
pub const INDICATOR_SEGMENTS: [SegPin; 5] = [(0, 17), (0, 16), (2, 17), (2, 16), (1, 10)];

/// The "funky ninth segment" of position 0; set for B/D/@ descenders there.
pub const EXTRA_POS0: SegPin = (0, 15);
/// The descender pixel of position 1, set for B/D/@ there.
pub const EXTRA_POS1: SegPin = (0, 12);
/// The crossbar pixel used only for a capital T in position 1.
pub const EXTRA_POS1_T: SegPin = (1, 12);

/// Segment patterns for ASCII 0x20..0x7F. Bit `i` lights slot `i` of the
/// position the character is drawn at (A=0x01 .. G=0x40, extra=0x80).
///
/// Several glyphs are approximations forced by the seven-segment geometry;
/// the per-position substitution rules in the display driver paper over the
/// worst of them (e.g. 'M' only reads as such in the 8-segment position 0).
pub const CHARACTER_SET: [u8; 96] = [
    0b00000000, //
    0b01100000, // ! (upper half of L)
    0b00100010, // "
    0b01100011, // # (degree symbol; a true hash does not fit)
    0b00101101, // $ (S without the center segment)
    0b00000000, // % (unused)
    0b01000100, // & ("lowercase 7" for positions 4 and 6)
    0b00100000, // '
    0b00111001, // (
    0b00001111, // )
    0b00000000, // * (unused)
    0b11000000, // + (only works in position 0)
    0b00000100, // ,
    0b01000000, // -
    0b01000000, // . (same as -; most useful rendering)
    0b00010010, // /
    0b00111111, // 0
    0b00000110, // 1
    0b01011011, // 2
    0b01001111, // 3
    0b01100110, // 4
    0b01101101, // 5
    0b01111101, // 6
    0b00000111, // 7
    0b01111111, // 8
    0b01101111, // 9
    0b00000000, // : (use the colon segment instead)
    0b00000000, // ;
    0b01011000, // <
    0b01001000, // =
    0b01001100, // >
    0b01010011, // ?
    0b11111111, // @ (all segments on)
    0b01110111, // A
    0b01111111, // B (8 with descender pixel in positions 0 and 1)
    0b00111001, // C
    0b00111111, // D (0 with descender pixel in positions 0 and 1)
    0b01111001, // E
    0b01110001, // F
    0b00111101, // G
    0b01110110, // H
    0b10001001, // I (only works in position 0)
    0b00001110, // J
    0b01110101, // K
    0b00111000, // L
    0b10110111, // M (only works in position 0)
    0b00110111, // N
    0b00111111, // O
    0b01110011, // P
    0b01100111, // Q
    0b11110111, // R (only works in position 0)
    0b01101101, // S
    0b10000001, // T (only works in position 0; capital T uses the extra)
    0b00111110, // U
    0b00111110, // V (same as U)
    0b10111110, // W (only works in position 0)
    0b01111110, // X
    0b01101110, // Y
    0b00011011, // Z
    0b00111001, // [
    0b00100100, // backslash
    0b00001111, // ]
    0b00100011, // ^
    0b00001000, // _
    0b00000010, // `
    0b01011111, // a
    0b01111100, // b
    0b01011000, // c
    0b01011110, // d
    0b01111011, // e
    0b01110001, // f (same as F)
    0b01101111, // g (same as 9)
    0b01110100, // h
    0b00010000, // i
    0b01000010, // j
    0b01110101, // k (same as K)
    0b00110000, // l
    0b10110111, // m (same as M)
    0b01010100, // n
    0b01011100, // o
    0b01110011, // p (same as P)
    0b01100111, // q (same as Q)
    0b01010000, // r
    0b01101101, // s (same as S)
    0b01111000, // t
    0b00011100, // u
    0b00011100, // v (same as u)
    0b10011100, // w (only works in position 0)
    0b01111110, // x (same as X)
    0b01101110, // y (same as Y)
    0b00011011, // z (same as Z)
    0b00111001, // {
    0b00110000, // |
    0b00001111, // }
    0b00000001, // ~
    0b00000000, // DEL
];

/// Segment pattern for one ASCII character, blank for anything non-ASCII.
pub fn char_segments(character: char) -> u8 {
    let code = character as u32;
    if (0x20..0x80).contains(&code) {
        CHARACTER_SET[(code - 0x20) as usize]
    } else {
        0
    }
}
