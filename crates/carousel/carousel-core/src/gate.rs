//! Interaction gate: arbitration of the signals that pause autoplay.

use serde::{Deserialize, Serialize};

/// Independent reasons for the user to be interacting with the track.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Hover,
    Focus,
    PointerDown,
}

/// Input events observed on the track.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    PointerEnter,
    PointerLeave,
    FocusIn,
    FocusOut,
    PointerDown,
    PointerUp,
}

impl Interaction {
    /// The signal this event drives and its new value.
    pub fn signal(self) -> (Signal, bool) {
        match self {
            Interaction::PointerEnter => (Signal::Hover, true),
            Interaction::PointerLeave => (Signal::Hover, false),
            Interaction::FocusIn => (Signal::Focus, true),
            Interaction::FocusOut => (Signal::Focus, false),
            Interaction::PointerDown => (Signal::PointerDown, true),
            Interaction::PointerUp => (Signal::PointerDown, false),
        }
    }
}

/// Combined interaction state. `reduced_motion` is fixed at construction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionGate {
    hover: bool,
    focus: bool,
    pointer_down: bool,
    reduced_motion: bool,
}

impl InteractionGate {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            reduced_motion,
            ..Self::default()
        }
    }

    pub fn set(&mut self, signal: Signal, on: bool) {
        match signal {
            Signal::Hover => self.hover = on,
            Signal::Focus => self.focus = on,
            Signal::PointerDown => self.pointer_down = on,
        }
    }

    pub fn is_set(&self, signal: Signal) -> bool {
        match signal {
            Signal::Hover => self.hover,
            Signal::Focus => self.focus,
            Signal::PointerDown => self.pointer_down,
        }
    }

    pub fn interacting(&self) -> bool {
        self.hover || self.focus || self.pointer_down
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Whether autoplay may run right now.
    pub fn may_run(&self) -> bool {
        !self.interacting() && !self.reduced_motion
    }
}
