//! Timed input: scripted button events keyed to frame numbers.
//!
//! Hosts queue press/release events ahead of time; the system applies the
//! due ones to controller 1 at the start of each frame. Useful for
//! reproducible input in tests and headless runs.

use std::collections::VecDeque;

use crate::controller::{Button, Controller};

/// A button change scheduled for a frame.
#[derive(Debug, Clone)]
pub struct InputEvent {
    /// Frame number at which this event fires.
    pub frame: u64,
    pub button: Button,
    /// True for press, false for release.
    pub pressed: bool,
}

/// Queue of scheduled button events, ordered by frame.
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Insert an event, keeping the queue sorted by frame.
    pub fn push(&mut self, event: InputEvent) {
        let pos = self
            .events
            .iter()
            .position(|e| e.frame > event.frame)
            .unwrap_or(self.events.len());
        self.events.insert(pos, event);
    }

    /// Schedule a press at `at_frame` and a release `hold_frames` later.
    pub fn enqueue_button(&mut self, button: Button, at_frame: u64, hold_frames: u64) {
        self.push(InputEvent {
            frame: at_frame,
            button,
            pressed: true,
        });
        self.push(InputEvent {
            frame: at_frame + hold_frames,
            button,
            pressed: false,
        });
    }

    /// Apply every event due at or before `frame` to the controller.
    pub fn process(&mut self, frame: u64, controller: &mut Controller) {
        while let Some(event) = self.events.front() {
            if event.frame > frame {
                break;
            }
            let event = self.events.pop_front().expect("front was Some");
            controller.set_button(event.button, event.pressed);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
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
    fn enqueue_creates_press_and_release() {
        let mut queue = InputQueue::new();
        queue.enqueue_button(Button::A, 10, 3);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn events_apply_in_frame_order() {
        let mut queue = InputQueue::new();
        let mut controller = Controller::new();

        queue.enqueue_button(Button::A, 5, 3);

        queue.process(4, &mut controller);
        assert_eq!(controller.buttons() & Button::A.mask(), 0);

        queue.process(5, &mut controller);
        assert_ne!(controller.buttons() & Button::A.mask(), 0);

        queue.process(8, &mut controller);
        assert_eq!(controller.buttons() & Button::A.mask(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn out_of_order_pushes_are_sorted() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent {
            frame: 9,
            button: Button::B,
            pressed: true,
        });
        queue.push(InputEvent {
            frame: 2,
            button: Button::A,
            pressed: true,
        });

        let mut controller = Controller::new();
        queue.process(2, &mut controller);
        assert_eq!(controller.buttons(), Button::A.mask());
        assert_eq!(queue.len(), 1);
    }
}
