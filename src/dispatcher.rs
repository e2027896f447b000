//! # Face Dispatcher
//!
//! The event loop's brain: owns the ordered list of watch faces, routes
//! events to whichever face is active, rotates through faces on the mode
//! button, and polls inactive faces for background work. The shared
//! peripherals live in [`Watch`], which is threaded through every face
//! callback so a face never holds a peripheral across events.
//!
//! Power discipline is enforced here rather than trusted to each face:
//! whenever a face resigns, the scheduler is forced back to the 1 Hz
//! baseline and any tick animation is stopped, so a buggy face cannot leak
//! a 32 Hz tick request into its successor.

use crate::config::Settings;
use crate::display::Display;
use crate::peripherals::{Battery, Buzzer, ConsoleBuzzer, FixedBattery};
use crate::rtc::Rtc;
use crate::storage::Storage;
use crate::tick::TickScheduler;
use crate::{Event, EventType};

/// The peripherals and state every face callback receives.
pub struct Watch {
    /// The segment LCD.
    pub display: Display,
    /// Tick rate and sleep animation control.
    pub scheduler: TickScheduler,
    /// Clock source.
    pub rtc: Box<dyn Rtc>,
    /// Battery monitor.
    pub battery: Box<dyn Battery>,
    /// Piezo buzzer.
    pub buzzer: Box<dyn Buzzer>,
    /// Wearer settings.
    pub settings: Settings,
    /// Optional persistent store; absent when running without one.
    pub storage: Option<Storage>,
}

impl Watch {
    /// A watch around the given clock with default peripherals: a null
    /// display sink, a healthy fixed battery, the console buzzer, default
    /// settings and no storage.
    pub fn new(rtc: Box<dyn Rtc>) -> Self {
        Self {
            display: Display::new(),
            scheduler: TickScheduler::new(),
            rtc,
            battery: Box::new(FixedBattery::default()),
            buzzer: Box::new(ConsoleBuzzer),
            settings: Settings::default(),
            storage: None,
        }
    }
}

/// A screen of the watch. Faces are state machines fed by the dispatcher;
/// they draw through `watch.display` and ask for tick rates through
/// `watch.scheduler`.
pub trait Face {
    /// Short name for logs and the simulator banner.
    fn name(&self) -> &'static str;

    /// One-time setup, called before the first activation only. Allocate
    /// and load persisted state here, not in `activate`.
    fn setup(&mut self, _watch: &mut Watch) {}

    /// The face is becoming the active screen. Request a tick rate and draw
    /// the initial frame.
    fn activate(&mut self, watch: &mut Watch);

    /// Handle one event. Return `true` to remain active, `false` to let the
    /// dispatcher move on to the next face. Unhandled events should fall
    /// through to [`default_event_handler`].
    fn on_event(&mut self, event: Event, watch: &mut Watch) -> bool;

    /// The face is leaving the screen. Drop any resource only the active
    /// face may hold; the dispatcher resets the tick rate itself.
    fn resign(&mut self, _watch: &mut Watch) {}

    /// Polled while inactive; return `true` to receive one
    /// [`EventType::BackgroundTask`] event.
    fn wants_background_task(&mut self, _watch: &mut Watch) -> bool {
        false
    }
}

/// Fallback event handling a face delegates to for events it has no opinion
/// on: the mode button advances to the next face, everything else keeps the
/// current face active.
pub fn default_event_handler(event: Event, _watch: &mut Watch) -> bool {
    !matches!(event.event_type, EventType::ModeButtonUp)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FaceState {
    Uninitialized,
    Inactive,
    Active,
}

/// Routes events to the active face and rotates the face list.
pub struct Dispatcher {
    faces: Vec<Box<dyn Face>>,
    states: Vec<FaceState>,
    active: usize,
}

impl Dispatcher {
    /// A dispatcher over a non-empty, ordered face list. The first face
    /// becomes active once [`start`](Self::start) runs.
    pub fn new(faces: Vec<Box<dyn Face>>) -> Self {
        assert!(!faces.is_empty(), "a watch needs at least one face");
        let states = vec![FaceState::Uninitialized; faces.len()];
        Self { faces, states, active: 0 }
    }

    /// Index of the active face.
    pub fn active_face_index(&self) -> usize {
        self.active
    }

    /// Name of the active face.
    pub fn active_face_name(&self) -> &'static str {
        self.faces[self.active].name()
    }

    /// Number of faces on the watch.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Activate the first face. Must run once before any dispatch.
    pub fn start(&mut self, watch: &mut Watch) {
        self.activate(self.active, watch);
    }

    /// Feed one event to the active face; if the face declines to stay
    /// active, rotate to the next.
    pub fn dispatch(&mut self, event: Event, watch: &mut Watch) {
        let stay = self.faces[self.active].on_event(event, watch);
        if !stay {
            self.next_face(watch);
        }
    }

    /// Resign the active face and activate the next one, wrapping at the
    /// end of the list.
    pub fn next_face(&mut self, watch: &mut Watch) {
        let next = (self.active + 1) % self.faces.len();
        self.go_to_face(next, watch);
    }

    /// Resign the active face and activate the one at `index`.
    pub fn go_to_face(&mut self, index: usize, watch: &mut Watch) {
        if index >= self.faces.len() {
            return;
        }
        self.resign_active(watch);
        self.activate(index, watch);
    }

    /// Ask every inactive face whether it has background work, delivering
    /// one background event to each that does. The clock loop calls this on
    /// minute boundaries.
    pub fn poll_background_tasks(&mut self, watch: &mut Watch) {
        for index in 0..self.faces.len() {
            if index == self.active || self.states[index] == FaceState::Uninitialized {
                continue;
            }
            if self.faces[index].wants_background_task(watch) {
                self.faces[index].on_event(Event::of(EventType::BackgroundTask, 0), watch);
            }
        }
    }

    fn activate(&mut self, index: usize, watch: &mut Watch) {
        if self.states[index] == FaceState::Uninitialized {
            self.faces[index].setup(watch);
        }
        self.states[index] = FaceState::Active;
        self.active = index;
        // Faces draw incrementally; they get a blank slate to start from.
        watch.display.clear_display();
        self.faces[index].activate(watch);
        self.faces[index].on_event(Event::of(EventType::Activate, 0), watch);
    }

    fn resign_active(&mut self, watch: &mut Watch) {
        self.faces[self.active].resign(watch);
        self.states[self.active] = FaceState::Inactive;
        // No face may hand its successor an elevated tick rate or a
        // running animation.
        watch.scheduler.reset();
    }
}
