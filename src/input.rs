/// Discrete input events and the bounded per-tick queue they travel through.

use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Quit,
    PauseToggle,
    /// Play-area coordinates in pixels.
    Click { x: f32, y: f32 },
}

/// Events beyond this many per tick are dropped (newest first).
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// FIFO of pending events, drained once at the top of every tick.
#[derive(Debug)]
pub struct EventQueue {
    events: VecDeque<InputEvent>,
    capacity: usize,
    dropped: u64,
}

impl EventQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Returns `false` if the queue was full and the event was discarded.
    /// `Quit` is always accepted so a flood of clicks cannot block exit.
    pub fn push(&mut self, event: InputEvent) -> bool {
        if self.events.len() >= self.capacity && event != InputEvent::Quit {
            self.dropped += 1;
            return false;
        }
        self.events.push_back(event);
        true
    }

    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

/// Anything that can deliver input for the coming tick.
pub trait InputSource {
    /// Move every event that arrived since the last call into `queue`,
    /// preserving arrival order.
    fn poll(&mut self, queue: &mut EventQueue);
}

/// Pre-recorded input: tick `n` receives `script[n]`.  Ticks past the end
/// receive nothing.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(script: Vec<Vec<InputEvent>>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, queue: &mut EventQueue) {
        if let Some(batch) = self.script.pop_front() {
            for event in batch {
                queue.push(event);
            }
        }
    }
}
