use crate::app::modal::DismissReason;
use crate::prefs::motion_mode::MotionMode;
use crate::runaway::button::{ButtonGeometry, Proximity};

/// Input the host forwards to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Scroll listener fired: current offset and maximum offset.
    Scroll { pos: f32, max: f32 },
    /// Viewport resized or rotated.
    Viewport { width: f32, height: f32 },
    /// Envelope measured. Non-positive sizes mean "not laid out yet".
    EnvelopeSize { width: f32, height: f32 },
    EnvelopeClick,
    SkipIntro,
    Yes,
    /// Proximity signal on either runaway instance, with fresh geometry.
    Runaway {
        signal: Proximity,
        geometry: ButtonGeometry,
    },
    /// Expand or collapse a choice card.
    ToggleChoice { choice_id: String },
    SelectChoice { choice_id: String },
    /// `focused` is the element holding focus right before opening.
    OpenPs { focused: Option<String> },
    DismissPs(DismissReason),
    SetMotionMode(MotionMode),
    ReducedMotionChanged(bool),
}

/// A queue of input events.
/// The host pushes as events happen; the session drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events, in receipt order.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_keeps_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Scroll { pos: 10.0, max: 20.0 });
        q.push(InputEvent::EnvelopeClick);
        assert_eq!(q.len(), 2);
        let events = q.drain();
        let scroll = InputEvent::Scroll {
            pos: 10.0,
            max: 20.0,
        };
        assert_eq!(events, vec![scroll, InputEvent::EnvelopeClick]);
        assert!(q.is_empty());
    }
}
