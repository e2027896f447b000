//! # Segment Watch Core Library
//!
//! This library is the face/event core of a low-power digital wristwatch
//! firmware: pluggable "face" modules receive time-base and button events,
//! compute what should be visible, and translate that into individual LCD
//! segment set/clear operations on a 3-common × 24-segment display.
//!
//! ## Design Philosophy
//!
//! ### Power Efficiency
//! - **Incremental diffing**: the display is not a framebuffer but ~72
//!   individually controlled electrode pairs; every segment toggle costs
//!   power, so each face tracks its own previously rendered values and only
//!   issues the driver calls that changed (seconds-only / minutes / full
//!   redraw cost tiers).
//! - **Cooperative tick budget**: faces negotiate a shared hardware wake
//!   frequency (1/4/8/32 Hz), raising it only while an animation needs it and
//!   restoring 1 Hz on hand-off.
//! - **Autonomous animations**: the tick-tock animation runs in hardware
//!   without CPU involvement and is modeled as fire-and-forget state.
//!
//! ### Testability
//! - The display driver takes an injected [`display::SegmentHardware`] sink,
//!   so tests swap in a recorder and assert on exact (com, seg) writes.
//! - The RTC, battery, and buzzer collaborators are trait objects with
//!   virtual implementations that make a whole face run deterministic.
//!
//! ## Core Types
//!
//! The library root exports the event taxonomy consumed by every face:
//! - [`EventType`]: the tagged event kinds produced by the timer/button layer
//! - [`Event`]: one event instance plus its `subsecond` phase counter

// Module declarations
pub mod analog_face;
pub mod charset;
pub mod clock_shared;
pub mod config;
pub mod dispatcher;
pub mod display;
pub mod entropy_face;
pub mod inverse_face;
pub mod peripherals;
pub mod rtc;
pub mod scan_face;
pub mod storage;
pub mod tick;
pub mod timeline_face;
pub mod workday_face;

/// The kinds of events the dispatcher can route to a face.
///
/// Events are produced by the hardware timer and button ISR layer, serialized
/// into a single stream, and consumed exactly once per loop iteration by the
/// active face. Tags a face does not special-case must fall through to
/// [`dispatcher::default_event_handler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventType {
    /// The face just became visible; treat as a forced full redraw.
    Activate,
    /// Periodic wake at the currently requested tick frequency.
    Tick,
    /// Reduced-rate update fired during deep power saving; minimize work.
    LowEnergyUpdate,
    /// Fired to an *inactive* face whose `wants_background_task` returned true.
    BackgroundTask,
    /// Timeout with no user interaction; the shell may return to face 0.
    Timeout,
    /// Mode button released; the default handler advances to the next face.
    ModeButtonUp,
    /// Mode button held.
    ModeLongPress,
    /// Light button pressed.
    LightButtonDown,
    /// Light button released.
    LightButtonUp,
    /// Alarm button released.
    AlarmButtonUp,
    /// Alarm button held; clock faces toggle the hourly chime on this.
    AlarmLongPress,
}

/// A single event instance.
///
/// `subsecond` is the phase counter within the current second: when the tick
/// frequency is f Hz, TICK events carry 0..f-1 in order. At 1 Hz it is
/// always 0.
///
/// # Example
/// ```
/// use watch_core_lib::{Event, EventType};
///
/// let tick = Event::tick(3);
/// assert_eq!(tick.event_type, EventType::Tick);
/// assert_eq!(tick.subsecond, 3);
/// assert_eq!(Event::of(EventType::Activate, 0).subsecond, 0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    /// What happened.
    pub event_type: EventType,
    /// Phase within the current second (0..frequency-1).
    pub subsecond: u8,
}

impl Event {
    /// An event at the given subsecond phase.
    pub const fn of(event_type: EventType, subsecond: u8) -> Self {
        Self {
            event_type,
            subsecond,
        }
    }

    /// A TICK event at the given subsecond phase.
    pub const fn tick(subsecond: u8) -> Self {
        Self {
            event_type: EventType::Tick,
            subsecond,
        }
    }
}
