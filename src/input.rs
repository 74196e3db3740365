//! Per-frame input snapshot
//!
//! Platform shells translate their native events into `InputEvent`s and
//! hand the game one `InputSnapshot` per rendered frame.

use glam::Vec2;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Up,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Self {
        match code {
            "Space" => Key::Space,
            "ArrowUp" | "KeyW" => Key::Up,
            "Escape" | "KeyP" => Key::Escape,
            _ => Key::Other,
        }
    }

    #[inline]
    pub fn is_jump(self) -> bool {
        matches!(self, Key::Space | Key::Up)
    }
}

/// Discrete input event, in logical 1280x720 coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    PointerMoved(Vec2),
    /// Left button press
    PointerClicked(Vec2),
}

/// Everything that happened since the previous frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub events: Vec<InputEvent>,
    /// Last known pointer position
    pub pointer: Option<Vec2>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        if let InputEvent::PointerMoved(pos) | InputEvent::PointerClicked(pos) = event {
            self.pointer = Some(pos);
        }
        self.events.push(event);
    }

    pub fn key(key: Key) -> Self {
        let mut snapshot = Self::new();
        snapshot.push(InputEvent::KeyDown(key));
        snapshot
    }

    pub fn click(pos: Vec2) -> Self {
        let mut snapshot = Self::new();
        snapshot.push(InputEvent::PointerClicked(pos));
        snapshot
    }

    /// Hand the events over, keeping the pointer for the next frame
    pub fn take(&mut self) -> InputSnapshot {
        InputSnapshot {
            events: std::mem::take(&mut self.events),
            pointer: self.pointer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("Space"), Key::Space);
        assert_eq!(Key::from_code("ArrowUp"), Key::Up);
        assert_eq!(Key::from_code("Escape"), Key::Escape);
        assert_eq!(Key::from_code("KeyZ"), Key::Other);
        assert!(Key::Up.is_jump());
        assert!(!Key::Escape.is_jump());
    }

    #[test]
    fn test_take_keeps_pointer() {
        let mut pending = InputSnapshot::new();
        pending.push(InputEvent::PointerMoved(Vec2::new(10.0, 20.0)));
        pending.push(InputEvent::KeyDown(Key::Space));
        let frame = pending.take();
        assert_eq!(frame.events.len(), 2);
        assert!(pending.events.is_empty());
        assert_eq!(pending.pointer, Some(Vec2::new(10.0, 20.0)));
    }
}
