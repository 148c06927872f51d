//! Toolkit-independent keyboard commands and pointer events.

use glam::{Vec2, Vec3};

use crate::scene::SceneMode;

/// Keys the application responds to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
}

/// Discrete actions triggered from the keyboard
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    SelectMode(SceneMode),
    ToggleSolidObject,
    ResetCamera,
    Screenshot,
    Quit,
    /// Shift the camera by a fixed offset
    Nudge(Vec3),
}

impl Command {
    /// Map a key to its command; arrow keys move by `nudge_step`
    pub fn from_key(key: Key, nudge_step: f32) -> Option<Self> {
        let command = match key {
            Key::Char('1') => Command::SelectMode(SceneMode::Lake),
            Key::Char('2') => Command::SelectMode(SceneMode::Ocean),
            Key::Char('3') => Command::SelectMode(SceneMode::Trampoline),
            Key::Char('t') => Command::ToggleSolidObject,
            Key::Char('r') => Command::ResetCamera,
            Key::Char('s') => Command::Screenshot,
            Key::Char('q') => Command::Quit,
            Key::Char(_) => return None,
            Key::ArrowLeft => Command::Nudge(Vec3::new(-nudge_step, 0.0, 0.0)),
            Key::ArrowRight => Command::Nudge(Vec3::new(nudge_step, 0.0, 0.0)),
            Key::ArrowDown => Command::Nudge(Vec3::new(0.0, -nudge_step, 0.0)),
            Key::ArrowUp => Command::Nudge(Vec3::new(0.0, nudge_step, 0.0)),
        };
        Some(command)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Other,
}

/// Pointer input in window pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Pressed { button: PointerButton, x: f32, y: f32 },
    Released { button: PointerButton, x: f32, y: f32 },
    Moved { x: f32, y: f32 },
}

/// Remembers the held button and last cursor sample for camera drags
#[derive(Debug, Default)]
pub struct PointerTracker {
    button: Option<PointerButton>,
    previous: Option<Vec2>,
}

impl PointerTracker {
    pub fn button(&self) -> Option<PointerButton> {
        self.button
    }

    pub fn press(&mut self, button: PointerButton) {
        self.button = match button {
            PointerButton::Left | PointerButton::Right => Some(button),
            PointerButton::Other => None,
        };
    }

    /// Forget the last sample so the next motion re-anchors
    pub fn release(&mut self) {
        self.previous = None;
    }

    /// Movement since the last sample; `None` on the first sample after a release
    pub fn motion(&mut self, x: f32, y: f32) -> Option<Vec2> {
        let current = Vec2::new(x, y);
        self.previous.replace(current).map(|previous| current - previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_keys() {
        assert_eq!(
            Command::from_key(Key::Char('1'), 0.2),
            Some(Command::SelectMode(SceneMode::Lake))
        );
        assert_eq!(
            Command::from_key(Key::Char('3'), 0.2),
            Some(Command::SelectMode(SceneMode::Trampoline))
        );
        assert_eq!(
            Command::from_key(Key::Char('t'), 0.2),
            Some(Command::ToggleSolidObject)
        );
        assert_eq!(Command::from_key(Key::Char('x'), 0.2), None);
    }

    #[test]
    fn test_arrow_keys_nudge_in_plane_of_view() {
        assert_eq!(
            Command::from_key(Key::ArrowLeft, 0.2),
            Some(Command::Nudge(Vec3::new(-0.2, 0.0, 0.0)))
        );
        assert_eq!(
            Command::from_key(Key::ArrowUp, 0.5),
            Some(Command::Nudge(Vec3::new(0.0, 0.5, 0.0)))
        );
    }

    #[test]
    fn test_first_motion_only_anchors() {
        let mut pointer = PointerTracker::default();
        pointer.press(PointerButton::Left);

        assert_eq!(pointer.motion(10.0, 10.0), None);
        assert_eq!(pointer.motion(14.0, 7.0), Some(Vec2::new(4.0, -3.0)));

        pointer.release();
        assert_eq!(pointer.motion(100.0, 100.0), None);
    }

    #[test]
    fn test_other_buttons_clear_held_button() {
        let mut pointer = PointerTracker::default();
        pointer.press(PointerButton::Right);
        assert_eq!(pointer.button(), Some(PointerButton::Right));

        pointer.press(PointerButton::Other);
        assert_eq!(pointer.button(), None);
    }
}
